//! The dashboard: one page of widgets plus the glue that reacts to them.
//!
//! [`Dashboard::handle`] runs one page event through the widget engine, feeds
//! the resulting notifications to the filter, periods board and enrollment
//! glue, then runs any button the click landed on. Failures are logged and
//! shown as error toasts; nothing is retried.

use std::time::Instant;

use chrono::NaiveDate;
use pagedom::element::{closest, find_element, find_element_mut};
use pagedom::{query_first, Element, Event, Selector};
use rollcall::{Page, TransformError, WidgetEvent};
use rollcall_api::model::NewPeriod;
use rollcall_api::{ApiError, RollcallClient};

use crate::config::DashboardConfig;
use crate::enrollment::{self, card_button, read_assignment, run_card_action, CardAction};
use crate::filter::{reset_filters, AttendanceFilter};
use crate::gallery::{self, Gallery, GalleryError};
use crate::periods::{self, PeriodsBoard};
use crate::roster::{Roster, RosterAction, ADD_CLASS, REMOVE_CLASS};
use crate::toast::{Notifier, Toast};

/// Buttons that clear a filter block carry this class and a
/// `data-container` naming the block.
pub const RESET_FILTERS_CLASS: &str = "reset-filters-btn";
/// Buttons with `data-close="{id}"` hide the element `id`.
pub const CLOSE_ATTR: &str = "data-close";
pub const VIEW_IMAGES_CLASS: &str = "view-images-btn";
pub const SHOW_IMAGES_BUTTON: &str = "showImagesBtn";
pub const ENCODINGS_BUTTON: &str = "generateEncodingsBtn";
pub const ASSIGN_TEACHER_BUTTON: &str = "assignTeacherBtn";

pub const ADD_PERIOD_MODAL: &str = "add-class-modal";
pub const ADD_PERIOD_SUBMIT: &str = "addClassSubmit";

/// A clickable control the glue reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ResetFilters { container: String },
    Close { target: String },
    ViewRoster { period_id: u64 },
    Mark(RosterAction),
    Card { button: String, action: CardAction },
    AssignTeacher,
    OpenImages { student_id: u64, name: String },
    ShowImages,
    PrevImage,
    NextImage,
    DeleteImage { image_id: u64 },
    GenerateEncodings,
    SchedulePeriod,
}

impl Action {
    /// The action of the nearest actionable element at or above `target`.
    pub fn resolve(root: &Element, target: &str) -> Option<Self> {
        let actionable = closest(root, target, |el| Self::of(root, el).is_some())?;
        Self::of(root, actionable)
    }

    fn of(root: &Element, el: &Element) -> Option<Self> {
        let id_data = |key: &str| el.get_data(key).and_then(|v| v.trim().parse::<u64>().ok());

        if el.has_class(RESET_FILTERS_CLASS) {
            return el.get_data("container").map(|c| Self::ResetFilters { container: c.to_string() });
        }
        if let Some(target) = el.get_attr(CLOSE_ATTR) {
            return Some(Self::Close { target: target.to_string() });
        }
        if el.has_class(periods::VIEW_STUDENTS_CLASS) {
            return id_data("period-id").map(|period_id| Self::ViewRoster { period_id });
        }
        if el.has_class(ADD_CLASS) || el.has_class(REMOVE_CLASS) {
            return RosterAction::from_button(el).map(Self::Mark);
        }
        if let Some(action) = CardAction::of(el) {
            return card_button(root, &el.id).map(|(button, _)| Self::Card { button, action });
        }
        if el.has_class(VIEW_IMAGES_CLASS) {
            let name = el.get_data("student-name").unwrap_or_default().to_string();
            return id_data("student-id").map(|student_id| Self::OpenImages { student_id, name });
        }
        if el.has_class(gallery::DELETE_CLASS) {
            return id_data("image-id").map(|image_id| Self::DeleteImage { image_id });
        }
        match el.id.as_str() {
            ASSIGN_TEACHER_BUTTON => Some(Self::AssignTeacher),
            SHOW_IMAGES_BUTTON => Some(Self::ShowImages),
            ENCODINGS_BUTTON => Some(Self::GenerateEncodings),
            ADD_PERIOD_SUBMIT => Some(Self::SchedulePeriod),
            gallery::NAV_PREV => Some(Self::PrevImage),
            gallery::NAV_NEXT => Some(Self::NextImage),
            _ => None,
        }
    }
}

/// The page, its widgets and the glue state of one session.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    client: RollcallClient,
    page: Page,
    filter: AttendanceFilter,
    board: PeriodsBoard,
    roster: Roster,
    gallery: Gallery,
    notifier: Notifier,
}

impl Dashboard {
    /// Build a dashboard over `page`. Widgets are not bound until
    /// [`Dashboard::start`].
    pub fn new(config: DashboardConfig, page: Page) -> Result<Self, ApiError> {
        let client = config.client()?;
        Ok(Self {
            filter: AttendanceFilter::new(config.attendance_table.clone(), config.column_indices()),
            board: PeriodsBoard::new(config.role),
            roster: Roster::new(),
            gallery: Gallery::new(),
            notifier: Notifier::new().with_default_duration(config.toast_duration()),
            client,
            page,
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn client(&self) -> &RollcallClient {
        &self.client
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn filter(&self) -> &AttendanceFilter {
        &self.filter
    }

    pub fn board(&self) -> &PeriodsBoard {
        &self.board
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Scan the page and load today's periods.
    ///
    /// Returns the selects that could not be transformed.
    pub async fn start(&mut self) -> Vec<TransformError> {
        let errors = self.page.init(self.config.scan());
        if let Err(e) = self.board.refresh(&self.client, &mut self.page).await {
            log::error!("initial periods load: {e}");
        }
        log::info!(
            "dashboard started for {} with {} dropdowns",
            self.config.role.as_str(),
            self.page.dropdowns().len()
        );
        errors
    }

    /// Handle one page event to completion. Returns the widget notifications
    /// it produced.
    pub async fn handle(&mut self, event: &Event) -> Vec<WidgetEvent> {
        let events = self.page.dispatch(event);
        for widget_event in &events {
            self.on_widget_event(widget_event).await;
        }

        if let Event::Click { target: Some(target) } = event {
            if let Some(action) = Action::resolve(self.page.root(), target) {
                self.run(action).await;
            }
        }

        self.notifier.render(self.page.root_mut());
        events
    }

    /// Expire the visible toast if its time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.notifier.expire(now) {
            self.notifier.render(self.page.root_mut());
        }
    }

    fn toast(&mut self, toast: Toast) {
        self.notifier.show(toast);
    }

    async fn on_widget_event(&mut self, event: &WidgetEvent) {
        if self.filter.observe(event) {
            self.filter.apply(self.page.root_mut());
            return;
        }

        match event {
            WidgetEvent::Committed { instance_id, value } => {
                if periods::period_for(instance_id).is_some() {
                    let result = self
                        .board
                        .update_status(&self.client, &mut self.page, instance_id, value)
                        .await;
                    if let Err(e) = result {
                        log::error!("status update for {instance_id}: {e}");
                        self.toast(Toast::error("Failed to update status. Please try again."));
                    }
                } else if instance_id == enrollment::ROLE_SELECT {
                    enrollment::toggle_student_fields(self.page.root_mut(), value);
                } else {
                    enrollment::record_class(self.page.root_mut(), instance_id, value);
                }
            }
            WidgetEvent::DateSelected { input_id, date } => {
                log::debug!("date {input_id} = {date:?}");
            }
            WidgetEvent::TimeChanged { hidden_id, value } => {
                log::debug!("time {hidden_id} = {value}");
            }
        }
    }

    async fn run(&mut self, action: Action) {
        log::debug!("action {action:?}");
        match action {
            Action::ResetFilters { container } => {
                for event in reset_filters(&mut self.page, &container) {
                    self.filter.observe(&event);
                }
                self.filter.clear();
            }
            Action::Close { target } => {
                if let Some(el) = find_element_mut(self.page.root_mut(), &target) {
                    el.hidden = true;
                }
            }
            Action::ViewRoster { period_id } => {
                if let Err(e) = self.roster.view(&self.client, self.page.root_mut(), period_id).await {
                    log::error!("roster of period {period_id}: {e}");
                    self.toast(Toast::error("Failed to load students"));
                }
            }
            Action::Mark(mark) => {
                let result = self.roster.apply(&self.client, self.page.root_mut(), mark).await;
                match result {
                    Ok(ack) => self.toast(Toast::success(ack.message)),
                    Err(e) => {
                        log::error!("attendance change {mark:?}: {e}");
                        self.toast(Toast::error("Failed to update attendance"));
                    }
                }
            }
            Action::Card { button, action } => {
                let result = run_card_action(&self.client, self.page.root_mut(), &button, action).await;
                match result {
                    Ok(ack) if ack.message.is_empty() => self.toast(Toast::success(action.fallback())),
                    Ok(ack) => self.toast(Toast::success(ack.message)),
                    Err(e) => {
                        log::error!("{button}: {e}");
                        self.toast(Toast::error(action.failure()));
                    }
                }
                self.page.prune();
            }
            Action::AssignTeacher => self.assign_teacher().await,
            Action::OpenImages { student_id, name } => {
                self.gallery.open(self.page.root_mut(), student_id, &name);
                if let Err(e) = self.gallery.load(&self.client, self.page.root_mut()).await {
                    log::error!("images of student {student_id}: {e}");
                }
            }
            Action::ShowImages => {
                let result = self.gallery.show_viewer(&self.client, self.page.root_mut()).await;
                match result {
                    Ok(true) => {}
                    Ok(false) => self.toast(Toast::info("No images to display")),
                    Err(GalleryError::NoStudent) => self.toast(Toast::error("No student selected")),
                    Err(e) => {
                        log::error!("image viewer: {e}");
                        self.toast(Toast::error("Failed to load images"));
                    }
                }
            }
            Action::PrevImage => {
                self.gallery.prev();
                self.gallery.render_viewer(self.page.root_mut());
            }
            Action::NextImage => {
                self.gallery.next();
                self.gallery.render_viewer(self.page.root_mut());
            }
            Action::DeleteImage { image_id } => {
                let result = self.gallery.delete(&self.client, self.page.root_mut(), image_id).await;
                match result {
                    Ok(ack) => self.toast(Toast::success(ack.message)),
                    Err(e) => {
                        log::error!("delete image {image_id}: {e}");
                        self.toast(Toast::error("Failed to delete image"));
                    }
                }
            }
            Action::GenerateEncodings => {
                let result = self.gallery.generate_encodings(&self.client, self.page.root_mut()).await;
                match result {
                    Ok(report) => self.toast(Toast::success(report.message)),
                    Err(e) => {
                        log::error!("encodings: {e}");
                        let message = match e {
                            GalleryError::Api(ApiError::Http { message, .. }) => format!("Error: {message}"),
                            other => other.to_string(),
                        };
                        self.toast(Toast::error(message));
                    }
                }
            }
            Action::SchedulePeriod => self.schedule_period().await,
        }
    }

    async fn assign_teacher(&mut self) {
        let (teacher, class, subject) = match read_assignment(self.page.root()) {
            Ok(choice) => choice,
            Err(e) => {
                self.toast(Toast::error(e.to_string()));
                return;
            }
        };
        let result = self.client.assign_teacher(teacher, class, subject).await;
        match result {
            Ok(ack) => self.toast(Toast::success(ack.message)),
            Err(e) => {
                log::error!("assign teacher {teacher}: {e}");
                self.toast(Toast::error("Failed to assign teacher"));
            }
        }
    }

    async fn schedule_period(&mut self) {
        let period = match read_new_period(self.page.root()) {
            Ok(period) => period,
            Err(message) => {
                self.toast(Toast::error(message));
                return;
            }
        };
        self.toast(Toast::info("Saving..."));

        let result = self.client.schedule_period(&period).await;
        match result {
            Ok(ack) => {
                self.toast(Toast::success(ack.message));
                if let Some(modal) = find_element_mut(self.page.root_mut(), ADD_PERIOD_MODAL) {
                    modal.hidden = true;
                }
                if let Err(e) = self.board.refresh(&self.client, &mut self.page).await {
                    log::error!("periods refresh: {e}");
                }
            }
            Err(e) => {
                log::error!("schedule period: {e}");
                let message = match e {
                    ApiError::Http { message, .. } if !message.is_empty() => message,
                    _ => "Failed to add class.".to_string(),
                };
                self.toast(Toast::error(message));
            }
        }
    }
}

/// Value of the form field named `name` inside `form`. Selects report their
/// committed value, else their selected or first option.
fn field_value(form: &Element, name: &str) -> Option<String> {
    let field = query_first(form, &Selector::attr("name", name))?;
    if field.tag != "select" || field.get_attr("value").is_some() {
        return Some(field.value().trim().to_string());
    }
    query_first(field, &Selector::tag("option").and(Selector::has_attr("selected")))
        .or_else(|| query_first(field, &Selector::tag("option")))
        .map(|option| option.value().trim().to_string())
}

/// Read the add-period form. The error is the toast to show.
fn read_new_period(root: &Element) -> Result<NewPeriod, String> {
    let form = find_element(root, ADD_PERIOD_MODAL).ok_or_else(|| "Add class form not found".to_string())?;
    let field = |name: &str| field_value(form, name).unwrap_or_default();

    let teacher_subject_id = field("ts_id")
        .parse::<u64>()
        .map_err(|_| "Please select a subject".to_string())?;
    let date = NaiveDate::parse_from_str(&field("date"), "%d/%m/%Y").map_err(|_| "Please select a date".to_string())?;
    let (start_time, end_time) = (field("start_time"), field("end_time"));
    if start_time.is_empty() || end_time.is_empty() {
        return Err("Please select start and end times".to_string());
    }

    Ok(NewPeriod {
        teacher_subject_id,
        date,
        start_time,
        end_time,
        status: None,
    })
}
