//! The page-wide "currently open overlay" slots.

/// An overlay that can be shown on top of the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// A dropdown option list, by dropdown instance id.
    Dropdown(String),
    /// A calendar panel, by calendar wrapper id.
    Calendar(String),
}

/// Tracks which dropdown list and which calendar panel are open.
///
/// There is one slot per overlay kind, so at most one dropdown and at most one
/// calendar can be open at a time. Opening a dropdown also displaces the open
/// calendar; opening a calendar only displaces other calendars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayRegistry {
    dropdown: Option<String>,
    calendar: Option<String>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `overlay` as open and return the overlays it displaced.
    ///
    /// Re-opening the overlay that is already open displaces nothing of its
    /// own kind.
    pub fn open_exclusive(&mut self, overlay: Overlay) -> Vec<Overlay> {
        let mut displaced = Vec::new();
        match overlay {
            Overlay::Dropdown(id) => {
                if let Some(prev) = self.dropdown.take() {
                    if prev != id {
                        displaced.push(Overlay::Dropdown(prev));
                    }
                }
                if let Some(cal) = self.calendar.take() {
                    displaced.push(Overlay::Calendar(cal));
                }
                self.dropdown = Some(id);
            }
            Overlay::Calendar(id) => {
                if let Some(prev) = self.calendar.take() {
                    if prev != id {
                        displaced.push(Overlay::Calendar(prev));
                    }
                }
                self.calendar = Some(id);
            }
        }
        displaced
    }

    /// Close `overlay` if it is the open one. Returns whether it was open.
    pub fn close(&mut self, overlay: &Overlay) -> bool {
        let slot = match overlay {
            Overlay::Dropdown(id) => (&mut self.dropdown, id),
            Overlay::Calendar(id) => (&mut self.calendar, id),
        };
        if slot.0.as_deref() == Some(slot.1.as_str()) {
            *slot.0 = None;
            true
        } else {
            false
        }
    }

    /// Close everything and return what was open.
    pub fn close_all(&mut self) -> Vec<Overlay> {
        let mut closed = Vec::new();
        if let Some(id) = self.dropdown.take() {
            closed.push(Overlay::Dropdown(id));
        }
        if let Some(id) = self.calendar.take() {
            closed.push(Overlay::Calendar(id));
        }
        closed
    }

    pub fn is_open(&self, overlay: &Overlay) -> bool {
        match overlay {
            Overlay::Dropdown(id) => self.dropdown.as_deref() == Some(id.as_str()),
            Overlay::Calendar(id) => self.calendar.as_deref() == Some(id.as_str()),
        }
    }

    pub fn open_dropdown(&self) -> Option<&str> {
        self.dropdown.as_deref()
    }

    pub fn open_calendar(&self) -> Option<&str> {
        self.calendar.as_deref()
    }
}
