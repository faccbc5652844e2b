//! Headless custom form widgets for the attendance dashboard.
//!
//! Native `<select>` controls marked `js-custom-dropdown` become custom
//! dropdowns, `.calendar-wrapper` blocks become month-grid date pickers and
//! `.js-time-picker` blocks mirror an hour/minute pair into one hidden value.
//! Everything is rendered into a [`pagedom::Element`] tree owned by a [`Page`],
//! which routes events to the owning widget.

pub mod calendar;
pub mod dropdown;
pub mod error;
pub mod events;
pub mod overlay;
pub mod page;
pub mod time_picker;

pub use calendar::CalendarInstance;
pub use dropdown::{DropdownInstance, DropdownOption};
pub use error::TransformError;
pub use events::{Commit, CommitCallback, WidgetEvent};
pub use overlay::{Overlay, OverlayRegistry};
pub use page::{Page, Scan};
pub use time_picker::TimePicker;
