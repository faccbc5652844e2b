//! Attendance dashboard glue
//!
//! Wires the `rollcall` widgets of one dashboard page to the attendance
//! backend: table filters, today's periods, attendance rosters, pending
//! enrollments, student image galleries and toasts.

pub mod config;
pub mod dashboard;
pub mod enrollment;
pub mod filter;
pub mod gallery;
pub mod layout;
pub mod paths;
pub mod periods;
pub mod roster;
pub mod toast;

pub use config::{ColumnIndices, ConfigError, DashboardConfig, Role};
pub use dashboard::{Action, Dashboard};
pub use filter::{reset_filters, AttendanceFilter, FilterKey};
pub use gallery::Gallery;
pub use periods::{BoardError, PeriodsBoard};
pub use roster::Roster;
pub use toast::{Notifier, Toast, ToastLevel};
