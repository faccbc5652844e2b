//! The page controller: owns the element tree, every widget instance and the
//! overlay registry, and routes events to the widget they belong to.

use chrono::NaiveDate;
use pagedom::element::{contains, find_element, find_element_mut, path_to};
use pagedom::{query_ids, Element, Event, Selector};

use crate::calendar::{self, CalendarInstance};
use crate::dropdown::{self, adopt_dropdown, transform_select, DropdownInstance};
use crate::error::TransformError;
use crate::events::{CommitCallback, WidgetEvent};
use crate::overlay::{Overlay, OverlayRegistry};
use crate::time_picker::{self, select_native, TimePicker};

/// Marker class of native selects that the scan transforms.
pub const DROPDOWN_MARKER: &str = "js-custom-dropdown";

type CallbackFactory = Box<dyn FnMut(&Element) -> Option<CommitCallback>>;

/// Options for the one-time page scan.
///
/// # Example
///
/// ```ignore
/// let scan = Scan::new()
///     .skip_within("add-class-modal")
///     .callbacks(|select| match select.id.as_str() {
///         "roleSelect" => Some(Box::new(|commit: &Commit<'_>| log::info!("role {}", commit.value))),
///         _ => None,
///     });
/// page.init(scan);
/// ```
#[derive(Default)]
pub struct Scan {
    skip_within: Vec<String>,
    callbacks: Option<CallbackFactory>,
}

impl Scan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave selects inside the element `id` untouched.
    pub fn skip_within(mut self, id: impl Into<String>) -> Self {
        self.skip_within.push(id.into());
        self
    }

    /// Choose a commit callback for each select, given the select element.
    pub fn callbacks(mut self, factory: impl FnMut(&Element) -> Option<CommitCallback> + 'static) -> Self {
        self.callbacks = Some(Box::new(factory));
        self
    }
}

/// A page of widgets.
#[derive(Debug)]
pub struct Page {
    root: Element,
    dropdowns: Vec<DropdownInstance>,
    calendars: Vec<CalendarInstance>,
    time_pickers: Vec<TimePicker>,
    overlays: OverlayRegistry,
    today: NaiveDate,
}

impl Page {
    /// Wrap a page tree. Nothing is transformed until [`Page::init`].
    pub fn new(root: Element) -> Self {
        Self {
            root,
            dropdowns: Vec::new(),
            calendars: Vec::new(),
            time_pickers: Vec::new(),
            overlays: OverlayRegistry::new(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override the date calendars treat as today.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Scan the page once: bind time pickers, transform marked selects, bind
    /// calendars.
    ///
    /// Time pickers go first so their selects are populated before they are
    /// transformed. Selects that fail to transform are logged and skipped;
    /// their errors are returned.
    pub fn init(&mut self, mut scan: Scan) -> Vec<TransformError> {
        for wrapper_id in query_ids(&self.root, &Selector::class(time_picker::WRAPPER_CLASS)) {
            if let Some(picker) = TimePicker::from_wrapper(&mut self.root, &wrapper_id) {
                self.time_pickers.push(picker);
            }
        }

        let mut errors = Vec::new();
        let marked = Selector::tag("select").and(Selector::class(DROPDOWN_MARKER));
        for id in query_ids(&self.root, &marked) {
            let skipped = path_to(&self.root, &id)
                .is_some_and(|path| path.iter().any(|p| scan.skip_within.contains(p)));
            if skipped {
                log::debug!("scan: leaving select {id} untouched");
                continue;
            }

            let on_commit = match (scan.callbacks.as_mut(), find_element(&self.root, &id)) {
                (Some(factory), Some(select)) => factory(select),
                _ => None,
            };
            if let Err(e) = self.transform(&id, on_commit) {
                log::warn!("scan: {e}");
                errors.push(e);
            }
        }

        for wrapper_id in query_ids(&self.root, &Selector::class(calendar::WRAPPER_CLASS)) {
            self.bind_calendar(&wrapper_id);
        }

        log::debug!(
            "scan: {} dropdowns, {} calendars, {} time pickers",
            self.dropdowns.len(),
            self.calendars.len(),
            self.time_pickers.len()
        );
        errors
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Transform the native select `id` into a dropdown.
    pub fn transform(&mut self, id: &str, on_commit: Option<CommitCallback>) -> Result<&DropdownInstance, TransformError> {
        let instance = transform_select(&mut self.root, id, on_commit)?;
        self.dropdowns.push(instance);
        Ok(&self.dropdowns[self.dropdowns.len() - 1])
    }

    /// Bind a pre-rendered dropdown wrapper, replacing any stale instance
    /// with the same id.
    pub fn adopt(&mut self, wrapper_id: &str, on_commit: Option<CommitCallback>) -> Result<&DropdownInstance, TransformError> {
        let instance = adopt_dropdown(&self.root, wrapper_id, on_commit)?;
        self.dropdowns.retain(|d| d.id() != wrapper_id);
        self.dropdowns.push(instance);
        Ok(&self.dropdowns[self.dropdowns.len() - 1])
    }

    /// Bind the calendar in `wrapper_id`. Returns whether it was bound.
    pub fn bind_calendar(&mut self, wrapper_id: &str) -> bool {
        match CalendarInstance::bind(&mut self.root, wrapper_id, self.today) {
            Some(cal) => {
                self.calendars.retain(|c| c.wrapper_id() != wrapper_id);
                self.calendars.push(cal);
                true
            }
            None => false,
        }
    }

    /// Drop instances whose markup is no longer in the tree.
    pub fn prune(&mut self) {
        let before = self.dropdowns.len() + self.calendars.len() + self.time_pickers.len();
        let root = &self.root;
        self.dropdowns.retain(|d| find_element(root, d.wrapper_id()).is_some());
        self.calendars.retain(|c| find_element(root, c.wrapper_id()).is_some());
        self.time_pickers.retain(|t| find_element(root, t.hidden_id()).is_some());

        if let Some(id) = self.overlays.open_dropdown().map(str::to_string) {
            if !self.dropdowns.iter().any(|d| d.id() == id) {
                self.overlays.close(&Overlay::Dropdown(id));
            }
        }
        if let Some(id) = self.overlays.open_calendar().map(str::to_string) {
            if !self.calendars.iter().any(|c| c.wrapper_id() == id) {
                self.overlays.close(&Overlay::Calendar(id));
            }
        }

        let after = self.dropdowns.len() + self.calendars.len() + self.time_pickers.len();
        if before != after {
            log::debug!("prune: removed {} widgets", before - after);
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the tree. Call [`Page::prune`] after removing widget
    /// markup.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    pub fn dropdowns(&self) -> &[DropdownInstance] {
        &self.dropdowns
    }

    pub fn dropdown(&self, id: &str) -> Option<&DropdownInstance> {
        self.dropdowns.iter().find(|d| d.id() == id)
    }

    pub fn dropdown_mut(&mut self, id: &str) -> Option<&mut DropdownInstance> {
        self.dropdowns.iter_mut().find(|d| d.id() == id)
    }

    pub fn calendars(&self) -> &[CalendarInstance] {
        &self.calendars
    }

    pub fn calendar(&self, wrapper_id: &str) -> Option<&CalendarInstance> {
        self.calendars.iter().find(|c| c.wrapper_id() == wrapper_id)
    }

    pub fn time_pickers(&self) -> &[TimePicker] {
        &self.time_pickers
    }

    pub fn time_picker(&self, hidden_id: &str) -> Option<&TimePicker> {
        self.time_pickers.iter().find(|t| t.hidden_id() == hidden_id)
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn is_dropdown_open(&self, id: &str) -> bool {
        self.overlays.is_open(&Overlay::Dropdown(id.to_string()))
    }

    pub fn is_calendar_open(&self, wrapper_id: &str) -> bool {
        self.overlays.is_open(&Overlay::Calendar(wrapper_id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Dropdown controller
    // -------------------------------------------------------------------------

    fn dropdown_index(&self, id: &str) -> Option<usize> {
        let index = self.dropdowns.iter().position(|d| d.id() == id);
        if index.is_none() {
            log::warn!("no dropdown with id {id}");
        }
        index
    }

    /// Open the dropdown `id`, closing every other dropdown and any calendar.
    pub fn open_dropdown(&mut self, id: &str) {
        let Some(index) = self.dropdown_index(id) else {
            return;
        };
        let displaced = self.overlays.open_exclusive(Overlay::Dropdown(id.to_string()));
        self.hide(&displaced);
        self.dropdowns[index].set_visible(&mut self.root, true);
    }

    pub fn close_dropdown(&mut self, id: &str) {
        let Some(index) = self.dropdown_index(id) else {
            return;
        };
        self.overlays.close(&Overlay::Dropdown(id.to_string()));
        self.dropdowns[index].set_visible(&mut self.root, false);
    }

    /// Open the dropdown if closed, close it if open. Other overlays are
    /// swept closed either way.
    pub fn toggle_dropdown(&mut self, id: &str) {
        if self.dropdown_index(id).is_none() {
            return;
        }
        if self.is_dropdown_open(id) {
            let mut swept = self.overlays.close_all();
            swept.retain(|o| *o != Overlay::Dropdown(id.to_string()));
            self.hide(&swept);
            self.close_dropdown(id);
        } else {
            self.open_dropdown(id);
        }
    }

    /// Commit `value` on dropdown `id` and close its list.
    ///
    /// Re-selecting the current value only refreshes the label and closes.
    /// A commit on a dropdown built from a time picker's select also updates
    /// the picker.
    pub fn select_option(&mut self, id: &str, value: &str) -> Vec<WidgetEvent> {
        let Some(index) = self.dropdown_index(id) else {
            return Vec::new();
        };
        let mut events: Vec<WidgetEvent> = self.dropdowns[index].select(&mut self.root, value).into_iter().collect();
        self.close_dropdown(id);

        if !events.is_empty() {
            for picker in self.time_pickers.iter_mut().filter(|t| t.owns(id)) {
                events.extend(picker.apply(&mut self.root, id, value));
            }
        }
        events
    }

    /// Restore the first option. Silent: no callback and no event.
    ///
    /// A time picker fed by this dropdown is brought back in line with it.
    pub fn reset_dropdown(&mut self, id: &str) {
        if let Some(index) = self.dropdowns.iter().position(|d| d.id() == id) {
            self.dropdowns[index].reset(&mut self.root);
            self.sync_time_pickers(index);
        } else {
            log::warn!("no dropdown with id {id}");
        }
    }

    /// Rewrite the pickers fed by dropdown `index` from its current value,
    /// dropping the `TimeChanged` notification.
    fn sync_time_pickers(&mut self, index: usize) {
        let dropdown = &self.dropdowns[index];
        let (id, value) = (dropdown.id(), dropdown.current_value());
        for picker in self.time_pickers.iter_mut().filter(|t| t.owns(id)) {
            let _ = picker.apply(&mut self.root, id, value);
        }
    }

    // -------------------------------------------------------------------------
    // Calendar controller
    // -------------------------------------------------------------------------

    fn calendar_index(&self, wrapper_id: &str) -> Option<usize> {
        let index = self.calendars.iter().position(|c| c.wrapper_id() == wrapper_id);
        if index.is_none() {
            log::warn!("no calendar with wrapper {wrapper_id}");
        }
        index
    }

    /// Show the calendar panel, closing any other calendar.
    pub fn open_calendar(&mut self, wrapper_id: &str) {
        let Some(index) = self.calendar_index(wrapper_id) else {
            return;
        };
        let displaced = self.overlays.open_exclusive(Overlay::Calendar(wrapper_id.to_string()));
        self.hide(&displaced);
        self.calendars[index].set_visible(&mut self.root, true);
    }

    pub fn close_calendar(&mut self, wrapper_id: &str) {
        let Some(index) = self.calendar_index(wrapper_id) else {
            return;
        };
        self.overlays.close(&Overlay::Calendar(wrapper_id.to_string()));
        self.calendars[index].set_visible(&mut self.root, false);
    }

    pub fn toggle_calendar(&mut self, wrapper_id: &str) {
        if self.is_calendar_open(wrapper_id) {
            self.close_calendar(wrapper_id);
        } else {
            self.open_calendar(wrapper_id);
        }
    }

    /// Move the visible month by `direction` (wrapping across years).
    pub fn navigate_calendar(&mut self, wrapper_id: &str, direction: i32) {
        if let Some(index) = self.calendar_index(wrapper_id) {
            self.calendars[index].navigate(&mut self.root, direction);
        }
    }

    /// Select a date (zero-based `month`) and close the panel.
    pub fn select_date(&mut self, wrapper_id: &str, day: u32, month: u32, year: i32) -> Option<WidgetEvent> {
        let index = self.calendar_index(wrapper_id)?;
        let event = self.calendars[index].select_date(&mut self.root, day, month, year)?;
        self.close_calendar(wrapper_id);
        Some(event)
    }

    /// Clear the calendar. Unlike a dropdown reset this announces the empty
    /// date so dependent filters clear too.
    pub fn reset_calendar(&mut self, wrapper_id: &str) -> Option<WidgetEvent> {
        let index = self.calendar_index(wrapper_id)?;
        self.calendars[index].reset(&mut self.root)
    }

    // -------------------------------------------------------------------------
    // Shared
    // -------------------------------------------------------------------------

    /// Close every open overlay.
    pub fn close_all(&mut self) {
        let closed = self.overlays.close_all();
        self.hide(&closed);
    }

    /// Reset every dropdown and calendar inside `container_id`.
    ///
    /// Returns the calendars' empty-date notifications.
    pub fn reset_within(&mut self, container_id: &str) -> Vec<WidgetEvent> {
        let root = &mut self.root;
        let mut reset = Vec::new();
        for (index, d) in self.dropdowns.iter_mut().enumerate() {
            if contains(root, container_id, d.wrapper_id()) {
                d.reset(root);
                reset.push(index);
            }
        }
        for index in reset {
            self.sync_time_pickers(index);
        }

        let root = &mut self.root;
        let mut events = Vec::new();
        for c in self.calendars.iter_mut() {
            if contains(root, container_id, c.wrapper_id()) {
                events.extend(c.reset(root));
            }
        }
        events
    }

    fn hide(&mut self, overlays: &[Overlay]) {
        for overlay in overlays {
            match overlay {
                Overlay::Dropdown(id) => {
                    if let Some(d) = self.dropdowns.iter().find(|d| d.id() == id.as_str()) {
                        d.set_visible(&mut self.root, false);
                    }
                }
                Overlay::Calendar(id) => {
                    if let Some(c) = self.calendars.iter().find(|c| c.wrapper_id() == id.as_str()) {
                        c.set_visible(&mut self.root, false);
                    }
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Event dispatch
    // -------------------------------------------------------------------------

    /// Route one event to the widgets and return their notifications.
    pub fn dispatch(&mut self, event: &Event) -> Vec<WidgetEvent> {
        match event {
            Event::Click { target: None } => {
                self.close_all();
                Vec::new()
            }
            Event::Click { target: Some(target) } => self.dispatch_click(target),
            Event::Change { target, value } => self.dispatch_change(target, value),
        }
    }

    fn dispatch_click(&mut self, target: &str) -> Vec<WidgetEvent> {
        let Some(path) = path_to(&self.root, target) else {
            self.close_all();
            return Vec::new();
        };
        let on_path = |id: &str| path.iter().any(|p| p == id);

        // Triggers and calendar inputs stop propagation: the outside-click
        // sweep must not see them.
        if let Some(id) = self.dropdowns.iter().find(|d| on_path(d.trigger_id())).map(|d| d.id().to_string()) {
            self.toggle_dropdown(&id);
            return Vec::new();
        }
        if let Some(wrapper) = self
            .calendars
            .iter()
            .find(|c| on_path(c.input_id()))
            .map(|c| c.wrapper_id().to_string())
        {
            self.toggle_calendar(&wrapper);
            return Vec::new();
        }

        let mut events = Vec::new();

        let chosen = self.dropdowns.iter().find(|d| on_path(d.list_id())).and_then(|d| {
            path.iter()
                .filter_map(|id| find_element(&self.root, id))
                .find(|el| el.has_class(dropdown::OPTION_CLASS))
                .map(|item| (d.id().to_string(), item.get_data("value").unwrap_or_default().to_string()))
        });
        if let Some((id, value)) = chosen {
            events.extend(self.select_option(&id, &value));
        }

        let calendar_hit = self.calendars.iter().find(|c| on_path(c.wrapper_id())).map(|c| {
            let day = path
                .iter()
                .filter_map(|id| find_element(&self.root, id))
                .find(|el| el.has_class("day-cell") && !el.has_class("empty"))
                .and_then(|el| el.get_data("day"))
                .and_then(|d| d.parse::<u32>().ok());
            (
                c.wrapper_id().to_string(),
                on_path(c.prev_id()),
                on_path(c.next_id()),
                day.map(|d| (d, c.visible_month(), c.visible_year())),
            )
        });
        if let Some((wrapper, prev, next, day)) = calendar_hit {
            if prev {
                self.navigate_calendar(&wrapper, -1);
            } else if next {
                self.navigate_calendar(&wrapper, 1);
            } else if let Some((day, month, year)) = day {
                events.extend(self.select_date(&wrapper, day, month, year));
            }
        }

        self.close_outside(&path);
        events
    }

    /// Close open overlays whose wrapper does not contain the click path.
    fn close_outside(&mut self, path: &[String]) {
        let on_path = |id: &str| path.iter().any(|p| p == id);

        if let Some(id) = self.overlays.open_dropdown().map(str::to_string) {
            let inside = self.dropdown(&id).is_some_and(|d| on_path(d.wrapper_id()));
            if !inside {
                self.close_dropdown(&id);
            }
        }
        if let Some(wrapper) = self.overlays.open_calendar().map(str::to_string) {
            if !on_path(&wrapper) {
                self.close_calendar(&wrapper);
            }
        }
    }

    fn dispatch_change(&mut self, target: &str, value: &str) -> Vec<WidgetEvent> {
        match find_element_mut(&mut self.root, target) {
            Some(select) if select.tag == "select" => select_native(select, value),
            Some(other) => other.set_value(value),
            None => {
                log::warn!("change event for missing element {target}");
                return Vec::new();
            }
        }

        let mut events = Vec::new();
        for picker in self.time_pickers.iter_mut().filter(|t| t.owns(target)) {
            events.extend(picker.apply(&mut self.root, target, value));
        }
        events
    }
}
