use std::time::{Duration, Instant};

use pagedom::element::find_element_mut;
use pagedom::Element;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// ID of the page element toasts are shown in.
pub const TOAST_ID: &str = "toast";

/// Toast category, rendered as a class on the toast element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A toast notification.
///
/// # Example
///
/// ```ignore
/// notifier.show(Toast::success("Status updated"));
/// notifier.show(Toast::error("Failed to load periods").with_duration(Duration::from_secs(8)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    /// How long to show the toast.
    pub duration: Duration,
}

impl Toast {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    /// Set a custom duration for this toast.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Build the toast's element for rendering.
    pub fn element(&self) -> Element {
        Element::div()
            .id(TOAST_ID)
            .class("toast")
            .class(self.level.as_str())
            .class("show")
            .text(&self.message)
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}

/// The page's single toast slot. A new toast replaces the visible one.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<(Toast, Instant)>,
    default_duration: Option<Duration>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `duration` for toasts that kept the default duration.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = Some(duration);
        self
    }

    pub fn show(&mut self, toast: impl Into<Toast>) {
        self.show_at(toast, Instant::now());
    }

    pub fn show_at(&mut self, toast: impl Into<Toast>, now: Instant) {
        let mut toast = toast.into();
        if let Some(duration) = self.default_duration {
            if toast.duration == DEFAULT_TOAST_DURATION {
                toast.duration = duration;
            }
        }
        log::debug!("toast [{}] {}", toast.level.as_str(), toast.message);
        self.current = Some((toast, now));
    }

    /// The visible toast, if any.
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref().map(|(toast, _)| toast)
    }

    /// Drop the toast once its duration has elapsed. Returns whether it was
    /// dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|(toast, shown)| now.saturating_duration_since(*shown) >= toast.duration);
        if expired {
            self.current = None;
        }
        expired
    }

    /// Write the toast slot into the page's `#toast` element.
    pub fn render(&self, root: &mut Element) {
        let Some(slot) = find_element_mut(root, TOAST_ID) else {
            return;
        };
        match self.current() {
            Some(toast) => *slot = toast.element(),
            None => {
                slot.remove_class("show");
            }
        }
    }
}
