//! Custom dropdown - a native select rebuilt as trigger, option list and
//! hidden value field.

mod transform;

pub use transform::{adopt_dropdown, transform_select};

use pagedom::element::{find_element, find_element_mut};
use pagedom::Element;

use crate::events::{Commit, CommitCallback, WidgetEvent};

/// Class of the trigger button.
pub const TRIGGER_CLASS: &str = "custom-select";
/// Class of the option list.
pub const LIST_CLASS: &str = "options-list";
/// Class of one option in the list.
pub const OPTION_CLASS: &str = "option-item";
/// Class of the wrapper around the three parts.
pub const WRAPPER_CLASS: &str = "custom-select-wrapper";

/// One choice of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A transformed (or adopted) custom dropdown.
///
/// The instance only holds element ids; the markup lives in the page tree and
/// every operation takes the tree root. Open/closed state is owned by the
/// page's [`OverlayRegistry`](crate::OverlayRegistry).
pub struct DropdownInstance {
    id: String,
    wrapper_id: String,
    trigger_id: String,
    list_id: String,
    hidden_id: String,
    options: Vec<DropdownOption>,
    current_value: String,
    on_commit: Option<CommitCallback>,
}

impl std::fmt::Debug for DropdownInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropdownInstance")
            .field("id", &self.id)
            .field("wrapper_id", &self.wrapper_id)
            .field("options", &self.options.len())
            .field("current_value", &self.current_value)
            .field("on_commit", &self.on_commit.is_some())
            .finish()
    }
}

impl DropdownInstance {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn wrapper_id(&self) -> &str {
        &self.wrapper_id
    }

    pub fn trigger_id(&self) -> &str {
        &self.trigger_id
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn hidden_id(&self) -> &str {
        &self.hidden_id
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn current_value(&self) -> &str {
        &self.current_value
    }

    /// Label of the option matching the current value.
    pub fn current_label(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == self.current_value)
            .map(|o| o.label.as_str())
    }

    /// Replace the commit callback.
    pub fn set_on_commit(&mut self, on_commit: Option<CommitCallback>) {
        self.on_commit = on_commit;
    }

    /// Show or hide the option list and mark the trigger accordingly.
    pub(crate) fn set_visible(&self, root: &mut Element, open: bool) {
        match find_element_mut(root, &self.list_id) {
            Some(list) => list.set_class("show", open),
            None => {
                log::warn!("dropdown {}: option list {} not found", self.id, self.list_id);
                return;
            }
        }
        if let Some(trigger) = find_element_mut(root, &self.trigger_id) {
            trigger.set_class("active", open);
        }
    }

    /// Commit `value`, writing the hidden field and notifying the callback.
    ///
    /// Re-selecting the current value only refreshes the trigger label; the
    /// hidden field and callback are left alone. The caller closes the list.
    pub(crate) fn select(&mut self, root: &mut Element, value: &str) -> Option<WidgetEvent> {
        let Some(option) = self.options.iter().find(|o| o.value == value).cloned() else {
            log::warn!("dropdown {}: no option with value {value:?}", self.id);
            return None;
        };
        if find_element(root, &self.hidden_id).is_none() {
            log::warn!("dropdown {}: hidden field {} not found", self.id, self.hidden_id);
            return None;
        }

        if option.value == self.current_value {
            self.write_trigger_label(root, &option.label);
            return None;
        }

        self.current_value = option.value.clone();
        self.write_hidden(root);
        if let Some(on_commit) = self.on_commit.as_mut() {
            if let Some(hidden) = find_element(root, &self.hidden_id) {
                on_commit(&Commit {
                    value: &option.value,
                    hidden,
                    instance_id: &self.id,
                });
            }
        }
        self.write_trigger_label(root, &option.label);

        log::debug!("dropdown {}: committed {:?}", self.id, option.value);
        Some(WidgetEvent::Committed {
            instance_id: self.id.clone(),
            value: option.value,
        })
    }

    /// Restore the first option without notifying anyone.
    pub(crate) fn reset(&mut self, root: &mut Element) {
        let Some(first) = self.options.first().cloned() else {
            return;
        };
        self.current_value = first.value;
        self.write_hidden(root);
        self.write_trigger_label(root, &first.label);
    }

    fn write_hidden(&self, root: &mut Element) {
        match find_element_mut(root, &self.hidden_id) {
            Some(hidden) => hidden.set_value(self.current_value.clone()),
            None => log::warn!("dropdown {}: hidden field {} not found", self.id, self.hidden_id),
        }
    }

    fn write_trigger_label(&self, root: &mut Element, label: &str) {
        if let Some(trigger) = find_element_mut(root, &self.trigger_id) {
            trigger.set_children(trigger_content(&self.trigger_id, label));
        }
    }
}

/// Label and arrow shown inside a trigger. Pre-rendered dropdowns use the
/// same markup so a commit does not change the trigger's shape.
pub fn trigger_content(trigger_id: &str, label: &str) -> Vec<Element> {
    vec![
        Element::span()
            .id(format!("{trigger_id}-label"))
            .class("select-label")
            .text(label),
        Element::span()
            .id(format!("{trigger_id}-arrow"))
            .class("select-arrow"),
    ]
}
