//! Backend endpoints, grouped by resource.
//!
//! Each module adds `async` methods to [`RollcallClient`](crate::RollcallClient).

mod images;
mod periods;
mod students;
mod teachers;
