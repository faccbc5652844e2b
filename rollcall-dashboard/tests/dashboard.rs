//! End-to-end glue tests against a scripted loopback backend.

use chrono::NaiveDate;
use pagedom::element::find_element;
use pagedom::{Element, Event};
use rollcall::Page;
use rollcall_dashboard::layout::page_for;
use rollcall_dashboard::periods::{NO_PERIODS, PERIODS_BODY, PERIODS_TABLE};
use rollcall_dashboard::{Dashboard, DashboardConfig, Role, ToastLevel};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as the backend saw it.
struct Captured {
    request_line: String,
    body: Vec<u8>,
}

impl Captured {
    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Answer one request per scripted `(status, body)` pair, in order.
async fn backend(script: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in script {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers were complete");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let length = head
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            while buf.len() < head_end + length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            seen.push(Captured {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: buf[head_end..].to_vec(),
            });
        }
        seen
    });

    (base, handle)
}

fn ok(body: serde_json::Value) -> (&'static str, String) {
    ("200 OK", body.to_string())
}

fn dashboard(role: Role, base: &str, root: Element) -> Dashboard {
    let config = DashboardConfig::new(role).base_url(base);
    let page = Page::new(root).with_today(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    Dashboard::new(config, page).unwrap()
}

fn toast(dashboard: &Dashboard) -> Option<(ToastLevel, String)> {
    dashboard.notifier().current().map(|t| (t.level, t.message.clone()))
}

fn teacher_periods(first_status: &str) -> serde_json::Value {
    json!([
        {"id": 1, "class_name": "10-A", "subject_name": "Math", "start_time": "09:00", "end_time": "09:45", "status": first_status},
        {"id": 2, "class_name": "10-B", "subject_name": "Physics", "start_time": "10:00", "end_time": "10:45", "status": "running"}
    ])
}

// ============================================================================
// Periods board
// ============================================================================

#[tokio::test]
async fn test_teacher_start_renders_periods() {
    let (base, server) = backend(vec![ok(teacher_periods("scheduled"))]).await;
    let mut dash = dashboard(Role::Teacher, &base, page_for(Role::Teacher, "attendance-table"));

    assert!(dash.start().await.is_empty());
    let seen = server.await.unwrap();
    assert_eq!(seen[0].request_line, "GET /teacher/api/periods/today HTTP/1.1");

    let root = dash.page().root();
    let body = find_element(root, PERIODS_BODY).unwrap();
    assert_eq!(body.child_elements().len(), 2);
    assert!(body.child_elements()[0].has_class("status-scheduled"));
    assert!(!find_element(root, PERIODS_TABLE).unwrap().hidden);
    assert!(find_element(root, NO_PERIODS).unwrap().hidden);

    assert!(dash.page().dropdown("status-wrapper-1").is_some());
    assert_eq!(dash.page().dropdown("status-wrapper-2").unwrap().current_value(), "running");
    assert!(find_element(root, "view-students-1").is_none());
    assert!(find_element(root, "view-students-2").is_some());
}

#[tokio::test]
async fn test_status_change_posts_and_refreshes() {
    let (base, server) = backend(vec![
        ok(teacher_periods("scheduled")),
        ok(json!({"message": "Status updated"})),
        ok(teacher_periods("running")),
    ])
    .await;
    let mut dash = dashboard(Role::Teacher, &base, page_for(Role::Teacher, "attendance-table"));
    dash.start().await;

    dash.handle(&Event::click("statusSelectButton-1")).await;
    assert!(dash.page().is_dropdown_open("status-wrapper-1"));
    dash.handle(&Event::click("status-1-running")).await;

    let seen = server.await.unwrap();
    assert_eq!(seen[1].request_line, "POST /api/periods/1/status HTTP/1.1");
    assert_eq!(seen[1].json(), json!({"status": "running"}));
    assert_eq!(seen[2].request_line, "GET /teacher/api/periods/today HTTP/1.1");

    let row = find_element(dash.page().root(), "period-row-1").unwrap();
    assert!(row.has_class("status-running"));
    assert!(find_element(dash.page().root(), "view-students-1").is_some());
    assert!(!dash.page().is_dropdown_open("status-wrapper-1"));
}

#[tokio::test]
async fn test_failed_status_change_shows_error() {
    let (base, server) = backend(vec![
        ok(teacher_periods("scheduled")),
        ("500 Internal Server Error", json!({"error": "db down"}).to_string()),
    ])
    .await;
    let mut dash = dashboard(Role::Teacher, &base, page_for(Role::Teacher, "attendance-table"));
    dash.start().await;

    dash.handle(&Event::click("status-1-cancelled")).await;
    server.await.unwrap();

    assert_eq!(
        toast(&dash),
        Some((ToastLevel::Error, "Failed to update status. Please try again.".into()))
    );
    let toast_el = find_element(dash.page().root(), "toast").unwrap();
    assert!(toast_el.has_class("error"));
}

#[tokio::test]
async fn test_student_rows_and_empty_message() {
    let (base, server) = backend(vec![ok(json!([
        {"subject_name": "Math", "start_time": "09:00", "end_time": "09:45", "status": "Completed"}
    ]))])
    .await;
    let mut dash = dashboard(Role::Student, &base, page_for(Role::Student, "attendance-table"));
    dash.start().await;
    assert_eq!(server.await.unwrap()[0].request_line, "GET /student/api/periods/today HTTP/1.1");

    let body = find_element(dash.page().root(), PERIODS_BODY).unwrap();
    let row = &body.child_elements()[0];
    assert!(row.has_class("status-completed"));
    assert_eq!(row.child_elements()[3].text_content(), "COMPLETED");

    let (base, server) = backend(vec![ok(json!([]))]).await;
    let mut dash = dashboard(Role::Student, &base, page_for(Role::Student, "attendance-table"));
    dash.start().await;
    server.await.unwrap();

    let root = dash.page().root();
    assert!(find_element(root, PERIODS_TABLE).unwrap().hidden);
    let message = find_element(root, NO_PERIODS).unwrap();
    assert!(!message.hidden);
    assert_eq!(message.text_content(), "No periods scheduled for today.");
}

#[tokio::test]
async fn test_period_load_failure_message() {
    let (base, server) = backend(vec![("503 Service Unavailable", "{}".to_string())]).await;
    let mut dash = dashboard(Role::Teacher, &base, page_for(Role::Teacher, "attendance-table"));
    dash.start().await;
    server.await.unwrap();

    let message = find_element(dash.page().root(), NO_PERIODS).unwrap();
    assert!(!message.hidden);
    assert_eq!(message.text_content(), "Failed to load periods.");
}

#[tokio::test]
async fn test_admin_skips_periods() {
    // Nothing listens here; any request would fail.
    let mut dash = dashboard(Role::Admin, "http://127.0.0.1:9", page_for(Role::Admin, "attendance-table"));
    dash.start().await;
    assert!(dash.board().periods().is_empty());
    assert!(toast(&dash).is_none());
}

// ============================================================================
// Roster
// ============================================================================

#[tokio::test]
async fn test_roster_view_and_mark() {
    let students = |asha: &str| {
        json!([
            {"id": 5, "roll_no": "R5", "name": "Asha", "status": asha},
            {"id": 6, "roll_no": 6, "name": "Ben", "status": "present"}
        ])
    };
    let (base, server) = backend(vec![
        ok(teacher_periods("scheduled")),
        ok(students("absent")),
        ok(json!({"message": "Attendance added"})),
        ok(students("present")),
    ])
    .await;
    let mut dash = dashboard(Role::Teacher, &base, page_for(Role::Teacher, "attendance-table"));
    dash.start().await;

    dash.handle(&Event::click("view-students-2")).await;
    let root = dash.page().root();
    assert!(!find_element(root, "periodModal").unwrap().hidden);
    assert!(find_element(root, "add-attendance-2-5").is_some());
    assert!(find_element(root, "remove-attendance-2-6").is_some());

    dash.handle(&Event::click("add-attendance-2-5")).await;
    let seen = server.await.unwrap();
    assert_eq!(seen[1].request_line, "GET /api/periods/2/students HTTP/1.1");
    assert_eq!(seen[2].request_line, "POST /api/periods/2/students/5 HTTP/1.1");
    assert_eq!(toast(&dash), Some((ToastLevel::Success, "Attendance added".into())));
    assert!(find_element(dash.page().root(), "remove-attendance-2-5").is_some());

    dash.handle(&Event::click("closePeriodModal")).await;
    assert!(find_element(dash.page().root(), "periodModal").unwrap().hidden);
}

// ============================================================================
// Enrollment
// ============================================================================

fn pending_card() -> Element {
    Element::div().id("root").child(Element::div().id("toast")).child(
        Element::div()
            .id("card-4")
            .class("student-card")
            .child(
                Element::select()
                    .id("classStudents4")
                    .class("js-custom-dropdown")
                    .child(Element::option("", "Pick a class"))
                    .child(Element::option("3", "10-A")),
            )
            .child(Element::button("Enroll").id("enroll-4").class("enroll-btn").data("id", "4"))
            .child(Element::button("Reject").id("reject-4").class("reject-btn").data("id", "4")),
    )
}

#[tokio::test]
async fn test_enroll_uses_chosen_class() {
    let (base, server) = backend(vec![ok(json!({"message": "Student enrolled"}))]).await;
    let mut dash = dashboard(Role::Admin, &base, pending_card());
    dash.start().await;

    dash.handle(&Event::click("list-classStudents4-opt-1")).await;
    let button = find_element(dash.page().root(), "enroll-4").unwrap();
    assert_eq!(button.get_data("class-id"), Some("3"));

    dash.handle(&Event::click("enroll-4")).await;
    let seen = server.await.unwrap();
    assert_eq!(seen[0].request_line, "POST /admin/api/student/enroll HTTP/1.1");
    assert_eq!(seen[0].json(), json!({"student_id": 4, "class_id": 3}));
    assert!(find_element(dash.page().root(), "card-4").is_none());
    assert!(dash.page().dropdown("classStudents4").is_none());
    assert_eq!(toast(&dash), Some((ToastLevel::Success, "Student enrolled".into())));
}

#[tokio::test]
async fn test_reject_failure_keeps_card() {
    let (base, server) = backend(vec![("400 Bad Request", json!({"error": "nope"}).to_string())]).await;
    let mut dash = dashboard(Role::Admin, &base, pending_card());
    dash.start().await;

    dash.handle(&Event::click("reject-4")).await;
    server.await.unwrap();
    assert!(find_element(dash.page().root(), "card-4").is_some());
    assert_eq!(toast(&dash), Some((ToastLevel::Error, "Reject failed".into())));
}

#[tokio::test]
async fn test_enroll_without_class_fails_locally() {
    let mut dash = dashboard(Role::Admin, "http://127.0.0.1:9", pending_card());
    dash.start().await;
    dash.handle(&Event::click("enroll-4")).await;
    assert_eq!(toast(&dash), Some((ToastLevel::Error, "Enroll failed".into())));
}

#[tokio::test]
async fn test_assign_teacher_validation() {
    let root = Element::div()
        .id("root")
        .child(Element::hidden_input("").id("value-teacherSelect"))
        .child(Element::hidden_input("").id("value-teacherClass"))
        .child(Element::hidden_input("").id("value-teacherSubject"))
        .child(Element::button("Assign").id("assignTeacherBtn"));
    let mut dash = dashboard(Role::Admin, "http://127.0.0.1:9", root);
    dash.start().await;

    dash.handle(&Event::click("assignTeacherBtn")).await;
    assert_eq!(toast(&dash), Some((ToastLevel::Error, "Please select a teacher".into())));
}

// ============================================================================
// Gallery
// ============================================================================

fn gallery_page() -> Element {
    Element::div()
        .id("root")
        .child(Element::div().id("toast"))
        .child(
            Element::button("Images")
                .id("images-7")
                .class("view-images-btn")
                .data("student-id", "7")
                .data("student-name", "Asha"),
        )
        .child(
            Element::div()
                .id("imagesModal")
                .hidden(true)
                .child(Element::span().id("imagesModalTitle"))
                .child(Element::span().id("totalImagesCount"))
                .child(Element::span().id("encodedImagesCount"))
                .child(Element::tbody().id("imagesList"))
                .child(Element::button("Show").id("showImagesBtn")),
        )
        .child(
            Element::div()
                .id("imageViewerModal")
                .hidden(true)
                .child(Element::new("img").id("imageViewerImg"))
                .child(Element::span().id("imageViewerName"))
                .child(Element::button("<").id("imageNavPrev"))
                .child(Element::button(">").id("imageNavNext")),
        )
}

fn image_list(count: usize) -> serde_json::Value {
    let images: Vec<_> = (0..count)
        .map(|i| json!({"id": 20 + i, "file_name": format!("img{i}.jpg"), "has_encoding": i == 0}))
        .collect();
    json!({"total_images": count, "encoded_images": count.min(1), "images": images})
}

#[tokio::test]
async fn test_gallery_viewer_navigation() {
    let (base, server) = backend(vec![ok(image_list(2)), ok(image_list(2))]).await;
    let mut dash = dashboard(Role::Admin, &base, gallery_page());
    dash.start().await;

    dash.handle(&Event::click("images-7")).await;
    let root = dash.page().root();
    assert!(!find_element(root, "imagesModal").unwrap().hidden);
    assert_eq!(find_element(root, "imagesModalTitle").unwrap().text_content(), "Asha's Images");
    assert_eq!(find_element(root, "totalImagesCount").unwrap().text_content(), "2");
    assert!(find_element(root, "delete-image-21").is_some());

    dash.handle(&Event::click("showImagesBtn")).await;
    let seen = server.await.unwrap();
    assert_eq!(seen[1].request_line, "GET /admin/api/students/7/images HTTP/1.1");

    let root = dash.page().root();
    assert!(!find_element(root, "imageViewerModal").unwrap().hidden);
    assert!(!find_element(root, "imageNavNext").unwrap().hidden);
    assert_eq!(find_element(root, "imageViewerName").unwrap().text_content(), "img0.jpg (1/2)");

    dash.handle(&Event::click("imageNavNext")).await;
    dash.handle(&Event::click("imageNavNext")).await;
    dash.handle(&Event::click("imageNavPrev")).await;
    let root = dash.page().root();
    assert_eq!(find_element(root, "imageViewerName").unwrap().text_content(), "img1.jpg (2/2)");
    assert_eq!(
        find_element(root, "imageViewerImg").unwrap().get_attr("src"),
        Some("/admin/api/students/7/images/21/view")
    );
}

#[tokio::test]
async fn test_gallery_without_images() {
    let (base, server) = backend(vec![ok(image_list(0)), ok(image_list(0))]).await;
    let mut dash = dashboard(Role::Admin, &base, gallery_page());
    dash.start().await;

    dash.handle(&Event::click("images-7")).await;
    assert_eq!(
        find_element(dash.page().root(), "imagesList").unwrap().text_content(),
        "No images yet"
    );
    dash.handle(&Event::click("showImagesBtn")).await;
    server.await.unwrap();

    assert_eq!(toast(&dash), Some((ToastLevel::Info, "No images to display".into())));
    assert!(find_element(dash.page().root(), "imageViewerModal").unwrap().hidden);
}

#[tokio::test]
async fn test_show_images_needs_a_student() {
    let mut dash = dashboard(Role::Admin, "http://127.0.0.1:9", gallery_page());
    dash.start().await;
    dash.handle(&Event::click("showImagesBtn")).await;
    assert_eq!(toast(&dash), Some((ToastLevel::Error, "No student selected".into())));
}

// ============================================================================
// Filters through the dashboard
// ============================================================================

#[tokio::test]
async fn test_reset_button_clears_filters() {
    let mut root = page_for(Role::Student, "attendance-table");
    if let Some(body) = pagedom::element::find_element_mut(&mut root, "attendance-table-body") {
        body.push_child(Element::tr().id("row-1").children(
            ["15/03/2024", "Math", "Friday", "Present"].map(Element::td),
        ));
        body.push_child(Element::tr().id("row-2").children(
            ["16/03/2024", "Math", "Saturday", "Absent"].map(Element::td),
        ));
    }
    let (base, server) = backend(vec![ok(json!([]))]).await;
    let mut dash = dashboard(Role::Student, &base, root);
    dash.start().await;
    server.await.unwrap();

    dash.handle(&Event::click("list-status_filter-opt-2")).await;
    assert!(find_element(dash.page().root(), "row-1").unwrap().hidden);
    assert!(!find_element(dash.page().root(), "row-2").unwrap().hidden);

    dash.handle(&Event::click("reset-attendance-filters")).await;
    assert!(!find_element(dash.page().root(), "row-1").unwrap().hidden);
    assert!(dash.filter().value(rollcall_dashboard::FilterKey::Status).is_none());
    assert_eq!(dash.page().dropdown("status_filter").unwrap().current_value(), "");
}
