/// Page events with element targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer click. `target` is the innermost element hit, `None` when the
    /// click landed on the page background.
    Click { target: Option<String> },
    /// A native form control committed a new value.
    Change { target: String, value: String },
}

impl Event {
    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: Some(target.into()),
        }
    }

    /// Click on the page background, outside every element.
    pub fn click_background() -> Self {
        Self::Click { target: None }
    }

    pub fn change(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Change {
            target: target.into(),
            value: value.into(),
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Click { target } => target.as_deref(),
            Self::Change { target, .. } => Some(target),
        }
    }
}
