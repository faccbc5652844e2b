use chrono::NaiveDate;
use pagedom::element::find_element;
use pagedom::{query_all, Element, Event, Selector};
use rollcall::{Page, Scan, WidgetEvent};
use rollcall_dashboard::{reset_filters, AttendanceFilter, ColumnIndices, FilterKey};

fn row(cells: &[&str]) -> Element {
    Element::tr().children(cells.iter().map(|c| Element::td(*c)))
}

fn select(id: &str, choices: &[&str]) -> Element {
    Element::select()
        .id(id)
        .class("js-custom-dropdown")
        .child(Element::option("", "All"))
        .children(choices.iter().map(|c| Element::option(*c, *c)))
}

fn teacher_page() -> Page {
    let filters = Element::div()
        .id("attendance-filters")
        .data("table-id", "attendance-table")
        .child(select("subject_filter", &["Math", "Physics"]))
        .child(select("status_filter", &["Present", "Absent"]))
        .child(
            Element::div()
                .id("date-wrapper")
                .class("calendar-wrapper")
                .child(Element::input("text").id("date_filter").class("date-input"))
                .child(
                    Element::div()
                        .id("date-panel")
                        .class("calendar-container")
                        .child(Element::button("<").id("date-prev").class("prev-month-btn"))
                        .child(Element::span().id("date-title").class("month-year"))
                        .child(Element::button(">").id("date-next").class("next-month-btn"))
                        .child(Element::div().id("date-grid").class("calendar-grid")),
                ),
        )
        .child(Element::input("date").id("native-date").attr("value", "2024-03-15"));

    let table = Element::table()
        .id("attendance-table")
        .child(Element::thead().child(row(&["Name", "Roll", "Date", "Subject", "Day", "Status"])))
        .child(
            Element::tbody()
                .child(row(&["Asha", "R1", "15/03/2024", "Math", "Friday", "Present"]).id("r-asha"))
                .child(row(&["Ben", "R2", "15/03/2024", "Physics", "Friday", "Absent"]).id("r-ben"))
                .child(row(&["Chen", "R3", "14/03/2024", " math ", "Thursday", "absent"]).id("r-chen"))
                .child(row(&["No records found"]).id("r-empty")),
        );

    let mut page = Page::new(Element::div().id("root").child(filters).child(table))
        .with_today(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert!(page.init(Scan::new()).is_empty());
    page
}

fn visible(page: &Page) -> Vec<String> {
    let table = find_element(page.root(), "attendance-table").unwrap();
    query_all(table, &Selector::tag("tr"))
        .into_iter()
        .filter(|r| !r.hidden && r.id.starts_with("r-"))
        .map(|r| r.id.clone())
        .collect()
}

fn apply_events(filter: &mut AttendanceFilter, page: &mut Page, events: &[WidgetEvent]) {
    for event in events {
        if filter.observe(event) {
            filter.apply(page.root_mut());
        }
    }
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_subject_filter_ignores_case_and_whitespace() {
    let mut page = teacher_page();
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);

    let events = page.select_option("subject_filter", "Math");
    apply_events(&mut filter, &mut page, &events);

    assert_eq!(filter.value(FilterKey::Subject), Some("Math"));
    assert_eq!(visible(&page), vec!["r-asha", "r-chen", "r-empty"]);
}

#[test]
fn test_filters_combine() {
    let mut page = teacher_page();
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);

    let events = page.select_option("subject_filter", "Math");
    apply_events(&mut filter, &mut page, &events);
    let events = page.select_option("status_filter", "Absent");
    apply_events(&mut filter, &mut page, &events);

    assert_eq!(visible(&page), vec!["r-chen", "r-empty"]);
}

#[test]
fn test_calendar_date_filters_exactly() {
    let mut page = teacher_page();
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);

    page.dispatch(&Event::click("date_filter"));
    let events = page.select_date("date-wrapper", 15, 2, 2024).into_iter().collect::<Vec<_>>();
    apply_events(&mut filter, &mut page, &events);

    assert_eq!(filter.value(FilterKey::Date), Some("15/03/2024"));
    assert_eq!(visible(&page), vec!["r-asha", "r-ben", "r-empty"]);
}

#[test]
fn test_choosing_all_clears_the_filter() {
    let mut page = teacher_page();
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);

    let events = page.select_option("status_filter", "Present");
    apply_events(&mut filter, &mut page, &events);
    assert_eq!(visible(&page), vec!["r-asha", "r-empty"]);

    let events = page.select_option("status_filter", "");
    apply_events(&mut filter, &mut page, &events);
    assert_eq!(filter.value(FilterKey::Status), None);
    assert_eq!(visible(&page).len(), 4);
}

#[test]
fn test_unrelated_commit_is_not_observed() {
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);
    let observed = filter.observe(&WidgetEvent::Committed {
        instance_id: "classStudents4".into(),
        value: "3".into(),
    });
    assert!(!observed);
    assert!(!filter.observe(&WidgetEvent::TimeChanged {
        hidden_id: "start_time".into(),
        value: "09:00".into(),
    }));
}

#[test]
fn test_missing_table_shows_nothing() {
    let mut page = teacher_page();
    let filter = AttendanceFilter::new("other-table", ColumnIndices::TEACHER);
    assert_eq!(filter.apply(page.root_mut()), 0);
    assert_eq!(visible(&page).len(), 4);
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_filters_restores_everything() {
    let mut page = teacher_page();
    let mut filter = AttendanceFilter::new("attendance-table", ColumnIndices::TEACHER);

    let events = page.select_option("subject_filter", "Physics");
    apply_events(&mut filter, &mut page, &events);
    let events: Vec<_> = page.select_date("date-wrapper", 15, 2, 2024).into_iter().collect();
    apply_events(&mut filter, &mut page, &events);
    assert_eq!(visible(&page), vec!["r-ben", "r-empty"]);

    let events = reset_filters(&mut page, "attendance-filters");

    assert_eq!(
        events,
        vec![WidgetEvent::DateSelected {
            input_id: "date_filter".into(),
            date: String::new(),
        }]
    );
    assert_eq!(visible(&page).len(), 4);
    assert_eq!(page.dropdown("subject_filter").unwrap().current_value(), "");
    assert_eq!(find_element(page.root(), "native-date").unwrap().value(), "");
    assert_eq!(find_element(page.root(), "date_filter").unwrap().value(), "");
}

#[test]
fn test_reset_unknown_container_is_a_no_op() {
    let mut page = teacher_page();
    assert!(reset_filters(&mut page, "nowhere").is_empty());
}
