//! Time picker - an hour select and a minute select mirrored into one hidden
//! `HH:MM` value.

use pagedom::element::{find_element, find_element_mut};
use pagedom::{Element, Selector};

use crate::events::WidgetEvent;

/// Class of the element that marks a time picker block.
pub const WRAPPER_CLASS: &str = "js-time-picker";

const DEFAULT_TIME: &str = "00:00";

/// Hour choices, `00` to `23`.
pub fn hour_choices() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}")).collect()
}

/// Minute choices in five-minute steps, `00` to `55`.
pub fn minute_choices() -> Vec<String> {
    (0..60).step_by(5).map(|m| format!("{m:02}")).collect()
}

/// The combined hidden value.
pub fn combine(hour: &str, minute: &str) -> String {
    format!("{hour}:{minute}")
}

/// A bound time picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePicker {
    hour_id: String,
    minute_id: String,
    hidden_id: String,
    hour: String,
    minute: String,
}

impl TimePicker {
    /// Bind the picker described by a `.js-time-picker` element's
    /// `data-hour-id`, `data-minute-id` and `data-hidden-id` attributes.
    pub fn from_wrapper(root: &mut Element, wrapper_id: &str) -> Option<Self> {
        let wrapper = find_element(root, wrapper_id)?;
        let (Some(hour_id), Some(minute_id), Some(hidden_id)) = (
            wrapper.get_data("hour-id").map(str::to_string),
            wrapper.get_data("minute-id").map(str::to_string),
            wrapper.get_data("hidden-id").map(str::to_string),
        ) else {
            log::warn!("time picker {wrapper_id} is missing its data-*-id attributes");
            return None;
        };
        Self::bind(root, &hour_id, &minute_id, &hidden_id)
    }

    /// Populate the two selects, seed them from the hidden value and write the
    /// combined value back.
    ///
    /// A seed part that is not one of the choices leaves that select on its
    /// first choice.
    pub fn bind(root: &mut Element, hour_id: &str, minute_id: &str, hidden_id: &str) -> Option<Self> {
        let exists = |id: &str| find_element(root, id).is_some();
        if !exists(hour_id) || !exists(minute_id) || !exists(hidden_id) {
            log::warn!(
                "failed to initialize time picker: missing elements for ids {hour_id}, {minute_id} or {hidden_id}"
            );
            return None;
        }

        let seed = find_element(root, hidden_id)
            .map(|el| el.value())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_TIME)
            .to_string();
        let (seed_hour, seed_minute) = seed.split_once(':').unwrap_or((seed.as_str(), ""));

        let hours = hour_choices();
        let minutes = minute_choices();
        let hour = pick(&hours, seed_hour);
        let minute = pick(&minutes, seed_minute);

        populate(root, hour_id, &hours, &hour);
        populate(root, minute_id, &minutes, &minute);

        let picker = Self {
            hour_id: hour_id.to_string(),
            minute_id: minute_id.to_string(),
            hidden_id: hidden_id.to_string(),
            hour,
            minute,
        };
        picker.write_hidden(root);
        Some(picker)
    }

    pub fn hour_id(&self) -> &str {
        &self.hour_id
    }

    pub fn minute_id(&self) -> &str {
        &self.minute_id
    }

    pub fn hidden_id(&self) -> &str {
        &self.hidden_id
    }

    pub fn hour(&self) -> &str {
        &self.hour
    }

    pub fn minute(&self) -> &str {
        &self.minute
    }

    pub fn value(&self) -> String {
        combine(&self.hour, &self.minute)
    }

    /// Whether `id` is this picker's hour or minute control.
    pub fn owns(&self, id: &str) -> bool {
        id == self.hour_id || id == self.minute_id
    }

    /// Apply a new choice from the control `source_id`.
    pub(crate) fn apply(&mut self, root: &mut Element, source_id: &str, value: &str) -> Option<WidgetEvent> {
        if source_id == self.hour_id {
            self.hour = value.to_string();
        } else if source_id == self.minute_id {
            self.minute = value.to_string();
        } else {
            return None;
        }
        self.write_hidden(root);
        Some(WidgetEvent::TimeChanged {
            hidden_id: self.hidden_id.clone(),
            value: self.value(),
        })
    }

    fn write_hidden(&self, root: &mut Element) {
        if let Some(hidden) = find_element_mut(root, &self.hidden_id) {
            hidden.set_value(self.value());
        }
    }
}

fn pick(choices: &[String], wanted: &str) -> String {
    choices
        .iter()
        .find(|c| c.as_str() == wanted)
        .or_else(|| choices.first())
        .cloned()
        .unwrap_or_default()
}

/// Append one `<option>` per choice, marking `selected`.
fn populate(root: &mut Element, select_id: &str, choices: &[String], selected: &str) {
    let Some(select) = find_element_mut(root, select_id) else {
        return;
    };
    for choice in choices {
        let mut option = Element::option(choice, choice).id(format!("{select_id}-{choice}"));
        if choice == selected {
            option = option.attr("selected", "");
        }
        select.push_child(option);
    }
    select.set_value(selected);
}

/// Mark `value` as the selected option of a native select.
pub(crate) fn select_native(select: &mut Element, value: &str) {
    let option = Selector::tag("option");
    for child in select.child_elements_mut() {
        if option.matches(child) {
            if child.value() == value {
                child.set_attr("selected", "");
            } else {
                child.remove_attr("selected");
            }
        }
    }
    select.set_value(value);
}
