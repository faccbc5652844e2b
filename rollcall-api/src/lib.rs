//! Attendance backend API client
//!
//! An async client for the attendance web backend: period scheduling and
//! status, per-period attendance, student enrollment, training images and
//! teacher assignment.

pub mod api;
pub mod error;
pub mod model;

mod client;

pub use client::*;
pub use error::ApiError;
