//! Page skeletons for each role.
//!
//! The binary drives these when no page is supplied. They carry the same ids
//! and marker classes the server-rendered dashboards use.

use pagedom::Element;

use crate::config::Role;
use crate::dashboard::RESET_FILTERS_CLASS;
use crate::periods::{NO_PERIODS, PERIODS_BODY, PERIODS_TABLE};
use crate::roster::{ROSTER_BODY, ROSTER_MODAL};
use crate::toast::TOAST_ID;

/// Id of the attendance filter block.
pub const FILTERS_ID: &str = "attendance-filters";

/// The dashboard skeleton for `role`, with an attendance table `table_id`.
pub fn page_for(role: Role, table_id: &str) -> Element {
    let mut root = Element::div()
        .id("dashboard")
        .child(Element::div().id(TOAST_ID).class("toast"));

    if role != Role::Admin {
        root = root.child(periods_section(role)).child(roster_modal());
    }
    root.child(filters(role, table_id)).child(attendance_table(role, table_id))
}

fn periods_section(role: Role) -> Element {
    let headers: &[&str] = match role {
        Role::Teacher => &["Class", "Subject", "Start", "End", "Status", ""],
        _ => &["Subject", "Start", "End", "Status"],
    };
    Element::div()
        .id("periods-section")
        .child(
            Element::table()
                .id(PERIODS_TABLE)
                .child(Element::thead().child(Element::tr().children(headers.iter().map(|h| Element::th(*h)))))
                .child(Element::tbody().id(PERIODS_BODY)),
        )
        .child(Element::div().id(NO_PERIODS).hidden(true))
}

fn roster_modal() -> Element {
    Element::div()
        .id(ROSTER_MODAL)
        .class("modal")
        .hidden(true)
        .child(Element::table().child(Element::tbody().id(ROSTER_BODY)))
        .child(Element::button("Close").id("closePeriodModal").attr("data-close", ROSTER_MODAL))
}

fn filter_select(id: &str, label: &str, choices: &[&str]) -> Element {
    Element::select()
        .id(id)
        .class("js-custom-dropdown")
        .child(Element::option("", label))
        .children(choices.iter().map(|c| Element::option(*c, *c)))
}

fn date_filter() -> Element {
    Element::div()
        .id("date-filter-wrapper")
        .class("calendar-wrapper")
        .child(Element::input("text").id("date_filter").class("date-input").attr("readonly", ""))
        .child(
            Element::div()
                .id("date-filter-calendar")
                .class("calendar-container")
                .child(Element::button("‹").id("date-filter-prev").class("prev-month-btn"))
                .child(Element::span().id("date-filter-title").class("month-year"))
                .child(Element::button("›").id("date-filter-next").class("next-month-btn"))
                .child(Element::div().id("date-filter-grid").class("calendar-grid")),
        )
}

fn filters(role: Role, table_id: &str) -> Element {
    const DAYS: [&str; 6] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
    const STATUSES: [&str; 2] = ["Present", "Absent"];

    let mut block = Element::div().id(FILTERS_ID).data("table-id", table_id);
    if role == Role::Admin {
        block = block.child(filter_select("class_filter", "All classes", &[]));
    }
    if role != Role::Student {
        block = block.child(filter_select("student_filter", "All students", &[]));
    }
    block
        .child(filter_select("subject_filter", "All subjects", &[]))
        .child(date_filter())
        .child(filter_select("day_filter", "All days", &DAYS))
        .child(filter_select("status_filter", "All statuses", &STATUSES))
        .child(
            Element::button("Reset")
                .id("reset-attendance-filters")
                .class(RESET_FILTERS_CLASS)
                .data("container", FILTERS_ID),
        )
}

fn attendance_table(role: Role, table_id: &str) -> Element {
    let headers: &[&str] = match role {
        Role::Admin => &["Class", "Name", "Roll No", "Date", "Subject", "Day", "Status"],
        Role::Teacher => &["Name", "Roll No", "Date", "Subject", "Day", "Status"],
        Role::Student => &["Date", "Subject", "Day", "Status"],
    };
    Element::table()
        .id(table_id)
        .child(Element::thead().child(Element::tr().children(headers.iter().map(|h| Element::th(*h)))))
        .child(Element::tbody().id(format!("{table_id}-body")))
}
