use chrono::NaiveDate;
use pagedom::element::find_element;
use pagedom::{query_all, Element, Event, Selector};
use rollcall::{CalendarInstance, Page, Scan, WidgetEvent};

fn calendar_block(prefix: &str, with_day_input: bool) -> Element {
    let mut wrapper = Element::div()
        .id(format!("{prefix}-wrapper"))
        .class("calendar-wrapper")
        .child(Element::input("text").id(format!("{prefix}-input")).class("date-input"))
        .child(
            Element::div()
                .id(format!("{prefix}-panel"))
                .class("calendar-container")
                .child(Element::button("<").id(format!("{prefix}-prev")).class("prev-month-btn"))
                .child(Element::span().id(format!("{prefix}-title")).class("month-year"))
                .child(Element::button(">").id(format!("{prefix}-next")).class("next-month-btn"))
                .child(Element::div().id(format!("{prefix}-grid")).class("calendar-grid")),
        );
    if with_day_input {
        wrapper = wrapper.child(Element::input("text").id(format!("{prefix}-day")).class("day-input"));
    }
    wrapper
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn page_with(blocks: Vec<Element>) -> Page {
    let mut page = Page::new(Element::div().id("root").children(blocks)).with_today(today());
    page.init(Scan::new());
    page
}

fn title(page: &Page, prefix: &str) -> String {
    find_element(page.root(), &format!("{prefix}-title")).unwrap().text_content()
}

fn panel_open(page: &Page, prefix: &str) -> bool {
    find_element(page.root(), &format!("{prefix}-panel")).unwrap().has_class("show")
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_initial_render_shows_current_month() {
    let page = page_with(vec![calendar_block("cal", true)]);
    let calendar = page.calendar("cal-wrapper").unwrap();
    assert_eq!(calendar.visible_month(), 2);
    assert_eq!(calendar.visible_year(), 2024);
    assert_eq!(title(&page, "cal"), "March 2024");

    let grid = find_element(page.root(), "cal-grid").unwrap();
    let labels = query_all(grid, &Selector::class("day-label"));
    assert_eq!(labels.len(), 7);
    assert_eq!(labels[0].text_content(), "Sun");

    // 1 March 2024 is a Friday: five padding cells.
    let pads = query_all(grid, &Selector::class("empty"));
    assert_eq!(pads.len(), 5);
    let days = query_all(grid, &Selector::class("day-cell").and(Selector::has_attr("data-day")));
    assert_eq!(days.len(), 31);

    let today_cells = query_all(grid, &Selector::class("today"));
    assert_eq!(today_cells.len(), 1);
    assert_eq!(today_cells[0].get_data("day"), Some("10"));
}

#[test]
fn test_missing_parts_are_skipped() {
    let broken = Element::div()
        .id("broken")
        .class("calendar-wrapper")
        .child(Element::input("text").class("date-input"));
    let page = page_with(vec![broken, calendar_block("ok", false)]);
    assert_eq!(page.calendars().len(), 1);
    assert!(page.calendar("broken").is_none());
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_navigate_wraps_years() {
    let mut page = page_with(vec![calendar_block("cal", false)]);

    for _ in 0..9 {
        page.navigate_calendar("cal-wrapper", 1);
    }
    assert_eq!(title(&page, "cal"), "December 2024");

    page.navigate_calendar("cal-wrapper", 1);
    let calendar = page.calendar("cal-wrapper").unwrap();
    assert_eq!((calendar.visible_month(), calendar.visible_year()), (0, 2025));
    assert_eq!(title(&page, "cal"), "January 2025");

    page.navigate_calendar("cal-wrapper", -1);
    assert_eq!(title(&page, "cal"), "December 2024");
}

#[test]
fn test_today_marker_only_in_current_month() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    page.navigate_calendar("cal-wrapper", -1);
    assert_eq!(title(&page, "cal"), "February 2024");

    let grid = find_element(page.root(), "cal-grid").unwrap();
    assert!(query_all(grid, &Selector::class("today")).is_empty());
    let days = query_all(grid, &Selector::has_attr("data-day"));
    assert_eq!(days.len(), 29);
}

#[test]
fn test_prev_next_buttons_keep_panel_open() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    page.dispatch(&Event::click("cal-input"));
    assert!(page.is_calendar_open("cal-wrapper"));

    page.dispatch(&Event::click("cal-next"));
    page.dispatch(&Event::click("cal-next"));
    assert_eq!(title(&page, "cal"), "May 2024");
    page.dispatch(&Event::click("cal-prev"));
    assert_eq!(title(&page, "cal"), "April 2024");
    assert!(page.is_calendar_open("cal-wrapper"));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_date_formats_and_sets_weekday() {
    let mut page = page_with(vec![calendar_block("cal", true)]);
    page.open_calendar("cal-wrapper");

    let event = page.select_date("cal-wrapper", 15, 2, 2024);
    assert_eq!(
        event,
        Some(WidgetEvent::DateSelected {
            input_id: "cal-input".into(),
            date: "15/03/2024".into(),
        })
    );
    assert_eq!(find_element(page.root(), "cal-input").unwrap().value(), "15/03/2024");
    assert_eq!(find_element(page.root(), "cal-day").unwrap().value(), "Friday");
    assert_eq!(
        page.calendar("cal-wrapper").unwrap().selected(),
        NaiveDate::from_ymd_opt(2024, 3, 15)
    );
    assert!(!page.is_calendar_open("cal-wrapper"));
    assert!(!panel_open(&page, "cal"));
}

#[test]
fn test_day_cell_click_selects() {
    let mut page = page_with(vec![calendar_block("cal", true)]);
    page.dispatch(&Event::click("cal-input"));
    page.dispatch(&Event::click("cal-next"));

    let events = page.dispatch(&Event::click("cal-grid-day-1"));
    assert_eq!(
        events,
        vec![WidgetEvent::DateSelected {
            input_id: "cal-input".into(),
            date: "01/04/2024".into(),
        }]
    );
    assert_eq!(find_element(page.root(), "cal-day").unwrap().value(), "Monday");
    assert!(!page.is_calendar_open("cal-wrapper"));
}

#[test]
fn test_padding_click_selects_nothing() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    page.dispatch(&Event::click("cal-input"));
    let events = page.dispatch(&Event::click("cal-grid-pad-0"));
    assert!(events.is_empty());
    assert!(page.is_calendar_open("cal-wrapper"));
    assert_eq!(find_element(page.root(), "cal-input").unwrap().value(), "");
}

#[test]
fn test_invalid_date_is_rejected() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    assert_eq!(page.select_date("cal-wrapper", 30, 1, 2024), None);
    assert_eq!(find_element(page.root(), "cal-input").unwrap().value(), "");
}

#[test]
fn test_month_past_december_is_rejected() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    assert_eq!(page.select_date("cal-wrapper", 15, 12, 2024), None);
    assert_eq!(page.select_date("cal-wrapper", 1, u32::MAX, 2024), None);
    assert_eq!(find_element(page.root(), "cal-input").unwrap().value(), "");
}

#[test]
fn test_render_month_past_december_keeps_grid() {
    let mut root = Element::div().id("root").child(calendar_block("cal", false));
    let mut calendar = CalendarInstance::bind(&mut root, "cal-wrapper", today()).unwrap();

    calendar.render_month(&mut root, 12, 2024);
    calendar.render_month(&mut root, u32::MAX, 2024);

    assert_eq!(calendar.visible_month(), 2);
    assert_eq!(find_element(&root, "cal-title").unwrap().text_content(), "March 2024");
    assert!(find_element(&root, "cal-grid-day-31").is_some());
    assert!(find_element(&root, "cal-grid-day-32").is_none());
}

#[test]
fn test_reset_announces_empty_date() {
    let mut page = page_with(vec![calendar_block("cal", true)]);
    page.select_date("cal-wrapper", 15, 2, 2024);

    let event = page.reset_calendar("cal-wrapper");
    assert_eq!(
        event,
        Some(WidgetEvent::DateSelected {
            input_id: "cal-input".into(),
            date: String::new(),
        })
    );
    assert_eq!(find_element(page.root(), "cal-input").unwrap().value(), "");
    assert_eq!(find_element(page.root(), "cal-day").unwrap().value(), "");
    assert_eq!(page.calendar("cal-wrapper").unwrap().selected(), None);
}

// ============================================================================
// Open / close
// ============================================================================

#[test]
fn test_only_one_calendar_open() {
    let mut page = page_with(vec![calendar_block("from", false), calendar_block("to", false)]);

    page.dispatch(&Event::click("from-input"));
    page.dispatch(&Event::click("to-input"));
    assert!(!page.is_calendar_open("from-wrapper"));
    assert!(page.is_calendar_open("to-wrapper"));
    assert!(!panel_open(&page, "from"));
    assert!(panel_open(&page, "to"));

    page.dispatch(&Event::click("to-input"));
    assert!(!page.is_calendar_open("to-wrapper"));
    assert!(!panel_open(&page, "to"));
}

#[test]
fn test_outside_click_closes_calendar() {
    let mut page = page_with(vec![calendar_block("cal", false)]);
    page.dispatch(&Event::click("cal-input"));
    page.dispatch(&Event::click("root"));
    assert!(!page.is_calendar_open("cal-wrapper"));

    page.dispatch(&Event::click("cal-input"));
    page.dispatch(&Event::click_background());
    assert!(!panel_open(&page, "cal"));
}
