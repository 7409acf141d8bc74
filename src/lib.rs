//! Attendance Computation Engine
//!
//! This crate turns raw biometric clock punches into per-day attendance
//! (selected punches, lateness minutes, day credit) and period totals,
//! reconciled against an employee's shift schedule and approved exception
//! records. An axum HTTP surface exposes the computation.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
