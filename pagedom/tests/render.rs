use pagedom::render::escape;
use pagedom::{to_html, Element, Event};

#[test]
fn test_render_nested_markup() {
    let el = Element::ul()
        .id("list-x")
        .class("options-list")
        .child(Element::li().id("opt").class("option-item").data("value", "a").text("A"));

    assert_eq!(
        to_html(&el),
        r#"<ul id="list-x" class="options-list"><li id="opt" class="option-item" data-value="a">A</li></ul>"#
    );
}

#[test]
fn test_render_void_and_hidden() {
    let el = Element::hidden_input("09:05").id("time").attr("name", "start");
    assert_eq!(
        to_html(&el),
        r#"<input id="time" name="start" type="hidden" value="09:05" />"#
    );

    let row = Element::tr().id("r").hidden(true);
    assert_eq!(to_html(&row), r#"<tr id="r" hidden></tr>"#);
}

#[test]
fn test_render_escapes_text_and_attrs() {
    let el = Element::td("<script>alert('x')</script>")
        .id("c")
        .attr("title", "a \"quoted\" & value");
    let html = to_html(&el);
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    assert!(html.contains(r#"title="a &quot;quoted&quot; &amp; value""#));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_escape_passthrough() {
    assert_eq!(escape("Plain text 15/03/2024"), "Plain text 15/03/2024");
}

#[test]
fn test_event_target() {
    assert_eq!(Event::click("btn").target(), Some("btn"));
    assert_eq!(Event::click_background().target(), None);
    assert_eq!(Event::change("hour", "10").target(), Some("hour"));
}
