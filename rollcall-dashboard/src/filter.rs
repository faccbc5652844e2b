//! Attendance table filtering.
//!
//! Filter dropdowns and the date calendar narrow the rows of the attendance
//! table. Every active filter must match for a row to stay visible.

use std::collections::BTreeMap;

use pagedom::element::{find_element, find_element_mut};
use pagedom::{query_ids, Element, Selector};
use rollcall::{Page, WidgetEvent};

use crate::config::ColumnIndices;

/// A filterable attendance column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Class,
    Student,
    Subject,
    Date,
    Day,
    Status,
}

impl FilterKey {
    /// The filter a control drives, by the control's id.
    pub fn from_control(id: &str) -> Option<Self> {
        match id {
            "class_filter" => Some(Self::Class),
            "student_filter" => Some(Self::Student),
            "subject_filter" | "st_subject_filter" => Some(Self::Subject),
            "date_filter" | "st_date_filter" | "filterDateInput" | "stFilterDateInput" => Some(Self::Date),
            "day_filter" => Some(Self::Day),
            "status_filter" => Some(Self::Status),
            _ => None,
        }
    }

    fn column(self, columns: &ColumnIndices) -> Option<usize> {
        match self {
            Self::Class => columns.class,
            Self::Student => columns.name,
            Self::Subject => Some(columns.subject),
            Self::Date => Some(columns.date),
            Self::Day => Some(columns.day),
            Self::Status => Some(columns.status),
        }
    }

    /// Dates compare exactly; text columns ignore case.
    fn matches(self, cell: &str, wanted: &str) -> bool {
        let cell = cell.trim();
        match self {
            Self::Date => cell == wanted.trim(),
            _ => cell.to_lowercase() == wanted.trim().to_lowercase(),
        }
    }
}

/// The active filter values for one attendance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceFilter {
    table_id: String,
    columns: ColumnIndices,
    values: BTreeMap<FilterKey, String>,
}

impl AttendanceFilter {
    pub fn new(table_id: impl Into<String>, columns: ColumnIndices) -> Self {
        Self {
            table_id: table_id.into(),
            columns,
            values: BTreeMap::new(),
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn value(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Set a filter value. An empty value clears the filter.
    pub fn set(&mut self, key: FilterKey, value: &str) {
        if value.trim().is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Update the filter from a widget notification. Returns whether the
    /// notification was for one of the filter controls.
    pub fn observe(&mut self, event: &WidgetEvent) -> bool {
        let (control, value) = match event {
            WidgetEvent::Committed { instance_id, value } => (instance_id.as_str(), value.as_str()),
            WidgetEvent::DateSelected { input_id, date } => (input_id.as_str(), date.as_str()),
            WidgetEvent::TimeChanged { .. } => return false,
        };
        match FilterKey::from_control(control) {
            Some(key) => {
                self.set(key, value);
                true
            }
            None => false,
        }
    }

    /// Whether a row's cell texts pass every active filter.
    ///
    /// Returns `None` for rows too short to be attendance rows.
    pub fn matches(&self, cells: &[String]) -> Option<bool> {
        if cells.len() < self.columns.min_cells() {
            return None;
        }
        let pass = self.values.iter().all(|(key, wanted)| match key.column(&self.columns) {
            Some(index) => cells.get(index).is_some_and(|cell| key.matches(cell, wanted)),
            None => true,
        });
        Some(pass)
    }

    /// Show or hide the table's body rows. Rows too short to judge keep their
    /// current visibility. Returns the number of visible rows.
    pub fn apply(&self, root: &mut Element) -> usize {
        let Some(rows) = body_rows(root, &self.table_id) else {
            log::debug!("filter: table {} not on this page", self.table_id);
            return 0;
        };

        let mut visible = 0;
        for row in rows {
            let cells: Vec<String> = row.child_elements().iter().map(Element::text_content).collect();
            if let Some(pass) = self.matches(&cells) {
                row.hidden = !pass;
            }
            if !row.hidden {
                visible += 1;
            }
        }
        log::debug!("filter: {visible} rows visible in {}", self.table_id);
        visible
    }
}

/// Mutable body rows (`#{table} tbody tr`).
fn body_rows<'a>(root: &'a mut Element, table_id: &str) -> Option<impl Iterator<Item = &'a mut Element>> {
    let table = find_element_mut(root, table_id)?;
    let tbody = table
        .child_elements_mut()
        .iter_mut()
        .find(|child| child.tag.eq_ignore_ascii_case("tbody"))?;
    Some(
        tbody
            .child_elements_mut()
            .iter_mut()
            .filter(|row| row.tag.eq_ignore_ascii_case("tr")),
    )
}

/// Clear every filter inside `container_id`.
///
/// Unhides all rows of the table named by the container's `data-table-id`,
/// empties native date inputs, resets calendars (which announce the empty
/// date) and dropdowns (silently). Returns the calendars' notifications.
pub fn reset_filters(page: &mut Page, container_id: &str) -> Vec<WidgetEvent> {
    let Some(container) = find_element(page.root(), container_id) else {
        log::warn!("reset_filters: container {container_id} not found");
        return Vec::new();
    };
    let table_id = container.get_data("table-id").map(str::to_string);
    let date_inputs = query_ids(
        container,
        &Selector::tag("input").and(Selector::attr("type", "date")),
    );

    if let Some(table_id) = table_id {
        if let Some(rows) = body_rows(page.root_mut(), &table_id) {
            for row in rows {
                row.hidden = false;
            }
        }
    }
    for id in date_inputs {
        if let Some(input) = find_element_mut(page.root_mut(), &id) {
            input.set_value("");
        }
    }

    page.reset_within(container_id)
}
