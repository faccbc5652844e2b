//! Outward notifications and commit callbacks.

use pagedom::Element;

/// A committed dropdown selection, handed to the commit callback.
#[derive(Debug, Clone, Copy)]
pub struct Commit<'a> {
    /// The newly committed value.
    pub value: &'a str,
    /// The hidden field that now holds `value`.
    pub hidden: &'a Element,
    /// ID of the dropdown instance (the source select's id).
    pub instance_id: &'a str,
}

/// Callback invoked after a dropdown commits a new value.
///
/// Callbacks observe the commit; effects on the page go through the
/// [`WidgetEvent`]s returned by `Page::dispatch`.
pub type CommitCallback = Box<dyn FnMut(&Commit<'_>)>;

/// Notifications emitted by widgets while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// A dropdown committed a value different from its previous one.
    Committed { instance_id: String, value: String },
    /// A calendar selected (or cleared, with an empty `date`) its date.
    DateSelected { input_id: String, date: String },
    /// A time picker recomputed its combined `HH:MM` value.
    TimeChanged { hidden_id: String, value: String },
}
