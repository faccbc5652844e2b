//! Calendar widget - a month-grid date picker bound to a text input.

pub mod month;

use chrono::{Datelike, NaiveDate};
use pagedom::element::{find_element, find_element_mut};
use pagedom::{query_first, Element, Selector};

use crate::events::WidgetEvent;

/// Class of the element that marks a calendar block.
pub const WRAPPER_CLASS: &str = "calendar-wrapper";

/// A calendar bound to one `.calendar-wrapper`.
///
/// `today` is captured when the calendar is bound and never re-evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarInstance {
    wrapper_id: String,
    input_id: String,
    container_id: String,
    month_year_id: String,
    grid_id: String,
    prev_id: String,
    next_id: String,
    day_input_id: Option<String>,
    visible_month: u32,
    visible_year: i32,
    selected: Option<NaiveDate>,
    today: NaiveDate,
}

impl CalendarInstance {
    /// Bind the calendar inside `wrapper_id` and render the current month.
    ///
    /// Returns `None` (after logging) when a required part is missing.
    pub fn bind(root: &mut Element, wrapper_id: &str, today: NaiveDate) -> Option<Self> {
        let Some(wrapper) = find_element(root, wrapper_id) else {
            log::warn!("calendar wrapper {wrapper_id} not found");
            return None;
        };
        let part = |class: &str| query_first(wrapper, &Selector::class(class)).map(|el| el.id.clone());

        let (Some(input_id), Some(container_id), Some(month_year_id), Some(grid_id), Some(prev_id), Some(next_id)) = (
            part("date-input"),
            part("calendar-container"),
            part("month-year"),
            part("calendar-grid"),
            part("prev-month-btn"),
            part("next-month-btn"),
        ) else {
            log::warn!("calendar {wrapper_id} is missing required elements, skipping");
            return None;
        };
        let day_input_id = part("day-input");

        let mut calendar = Self {
            wrapper_id: wrapper_id.to_string(),
            input_id,
            container_id,
            month_year_id,
            grid_id,
            prev_id,
            next_id,
            day_input_id,
            visible_month: today.month0(),
            visible_year: today.year(),
            selected: None,
            today,
        };
        calendar.render_month(root, today.month0(), today.year());
        Some(calendar)
    }

    pub fn wrapper_id(&self) -> &str {
        &self.wrapper_id
    }

    pub fn input_id(&self) -> &str {
        &self.input_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn grid_id(&self) -> &str {
        &self.grid_id
    }

    pub fn prev_id(&self) -> &str {
        &self.prev_id
    }

    pub fn next_id(&self) -> &str {
        &self.next_id
    }

    pub fn day_input_id(&self) -> Option<&str> {
        self.day_input_id.as_deref()
    }

    /// Zero-based month currently shown.
    pub fn visible_month(&self) -> u32 {
        self.visible_month
    }

    pub fn visible_year(&self) -> i32 {
        self.visible_year
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// ID of the grid cell for `day` in the visible month.
    pub fn day_cell_id(&self, day: u32) -> String {
        format!("{}-day-{day}", self.grid_id)
    }

    /// Redraw the header and grid for a zero-based `month` of `year`.
    ///
    /// A month past December is rejected and nothing changes.
    pub fn render_month(&mut self, root: &mut Element, month: u32, year: i32) {
        if month > month::DECEMBER {
            log::warn!("calendar {}: invalid month {month}", self.wrapper_id);
            return;
        }
        self.visible_month = month;
        self.visible_year = year;

        if let Some(header) = find_element_mut(root, &self.month_year_id) {
            header.set_text(format!("{} {year}", month::month_name(month)));
        }

        let Some(grid) = find_element_mut(root, &self.grid_id) else {
            log::warn!("calendar {}: grid {} not found", self.wrapper_id, self.grid_id);
            return;
        };

        let offset = month::first_weekday(month, year);
        let days = month::days_in_month(month, year);
        let mut cells = Vec::with_capacity(7 + (offset + days) as usize);

        for (i, label) in month::DAY_LABELS.iter().enumerate() {
            cells.push(
                Element::div()
                    .id(format!("{}-label-{i}", self.grid_id))
                    .class("day-label")
                    .text(*label),
            );
        }
        for i in 0..offset {
            cells.push(
                Element::div()
                    .id(format!("{}-pad-{i}", self.grid_id))
                    .classes("day-cell empty"),
            );
        }
        for day in 1..=days {
            let mut cell = Element::div()
                .id(self.day_cell_id(day))
                .class("day-cell")
                .data("day", day.to_string())
                .text(day.to_string());
            if day == self.today.day() && month == self.today.month0() && year == self.today.year() {
                cell.add_class("today");
            }
            cells.push(cell);
        }

        grid.set_children(cells);
        log::debug!("calendar {}: rendered {month}/{year}", self.wrapper_id);
    }

    /// Move the visible month by `direction` and redraw.
    pub fn navigate(&mut self, root: &mut Element, direction: i32) {
        let (month, year) = month::step(self.visible_month, self.visible_year, direction);
        self.render_month(root, month, year);
    }

    /// Show or hide the panel.
    pub(crate) fn set_visible(&self, root: &mut Element, open: bool) {
        match find_element_mut(root, &self.container_id) {
            Some(container) => container.set_class("show", open),
            None => log::warn!("calendar {}: panel not found", self.wrapper_id),
        }
    }

    /// Write the date into the input (and weekday into the day field).
    ///
    /// `month` is zero-based. Returns the `DateSelected` notification, or
    /// `None` when the date does not exist. The caller closes the panel.
    pub(crate) fn select_date(
        &mut self,
        root: &mut Element,
        day: u32,
        month: u32,
        year: i32,
    ) -> Option<WidgetEvent> {
        let date = (month <= month::DECEMBER)
            .then(|| NaiveDate::from_ymd_opt(year, month + 1, day))
            .flatten();
        let Some(date) = date else {
            log::warn!("calendar {}: invalid date {day}/{month}/{year}", self.wrapper_id);
            return None;
        };
        let formatted = month::format_date(date);

        match find_element_mut(root, &self.input_id) {
            Some(input) => input.set_value(formatted.clone()),
            None => {
                log::warn!("calendar {}: input {} not found", self.wrapper_id, self.input_id);
                return None;
            }
        }
        if let Some(day_input) = self
            .day_input_id
            .as_deref()
            .and_then(|id| find_element_mut(root, id))
        {
            day_input.set_value(month::weekday_name(date));
        }
        self.selected = Some(date);

        Some(WidgetEvent::DateSelected {
            input_id: self.input_id.clone(),
            date: formatted,
        })
    }

    /// Clear the input and day field, then announce the empty date.
    pub(crate) fn reset(&mut self, root: &mut Element) -> Option<WidgetEvent> {
        self.selected = None;
        if let Some(day_input) = self
            .day_input_id
            .as_deref()
            .and_then(|id| find_element_mut(root, id))
        {
            day_input.set_value("");
        }
        let input = find_element_mut(root, &self.input_id)?;
        input.set_value("");
        Some(WidgetEvent::DateSelected {
            input_id: self.input_id.clone(),
            date: String::new(),
        })
    }
}
