//! Today's periods table.

use pagedom::element::{closest, find_element, find_element_mut};
use pagedom::Element;
use rollcall::dropdown::{trigger_content, LIST_CLASS, OPTION_CLASS, TRIGGER_CLASS, WRAPPER_CLASS};
use rollcall::Page;
use rollcall_api::model::{Period, PeriodStatus, UnknownStatus};
use rollcall_api::{ApiError, RollcallClient};
use thiserror::Error;

use crate::config::Role;

pub const PERIODS_TABLE: &str = "periods-table";
pub const PERIODS_BODY: &str = "periods-body";
pub const NO_PERIODS: &str = "no-periods-message";

/// Prefix of the status dropdown wrapper ids, followed by the period id.
pub const STATUS_WRAPPER_PREFIX: &str = "status-wrapper-";
/// Class of the button that opens a period's attendance roster.
pub const VIEW_STUDENTS_CLASS: &str = "view-students";

const EMPTY_TEXT: &str = "No periods scheduled for today.";
const FAILED_TEXT: &str = "Failed to load periods.";

#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("element `{0}` is not on this page")]
    MissingElement(String),

    #[error("`{0}` does not name a period")]
    InvalidId(String),

    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
}

/// The period id behind a status dropdown instance id.
pub fn period_for(instance_id: &str) -> Option<u64> {
    instance_id.strip_prefix(STATUS_WRAPPER_PREFIX)?.parse().ok()
}

/// Renders today's periods for teachers and students.
#[derive(Debug, Clone)]
pub struct PeriodsBoard {
    role: Role,
    periods: Vec<Period>,
}

impl PeriodsBoard {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            periods: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The periods shown after the last successful refresh.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Whether this page has the periods table at all.
    pub fn is_present(&self, page: &Page) -> bool {
        [PERIODS_TABLE, PERIODS_BODY, NO_PERIODS]
            .iter()
            .all(|id| find_element(page.root(), id).is_some())
    }

    /// Fetch today's periods and re-render the table.
    ///
    /// Admins have no periods table, and pages without one are left alone;
    /// both return `Ok(0)`. Teacher rows get a status dropdown, which is
    /// bound to the page after rendering. Returns the number of rows.
    pub async fn refresh(&mut self, client: &RollcallClient, page: &mut Page) -> Result<usize, BoardError> {
        if self.role == Role::Admin {
            log::debug!("periods: skipped for admin");
            return Ok(0);
        }
        if !self.is_present(page) {
            return Ok(0);
        }

        show(page.root_mut(), NO_PERIODS, false);
        let fetched = match self.role {
            Role::Teacher => client.teacher_periods_today().await,
            _ => client.student_periods_today().await,
        };
        let periods = match fetched {
            Ok(periods) => periods,
            Err(e) => {
                log::error!("periods: {e}");
                self.render(page, &[]);
                set_text(page.root_mut(), NO_PERIODS, FAILED_TEXT);
                return Err(e.into());
            }
        };

        self.render(page, &periods);
        self.periods = periods;
        log::debug!("periods: {} rows for {}", self.periods.len(), self.role.as_str());
        Ok(self.periods.len())
    }

    fn render(&self, page: &mut Page, periods: &[Period]) {
        let rows: Vec<Element> = periods
            .iter()
            .map(|period| match self.role {
                Role::Teacher => teacher_row(period),
                _ => student_row(period),
            })
            .collect();

        let root = page.root_mut();
        if let Some(body) = find_element_mut(root, PERIODS_BODY) {
            body.set_children(rows);
        }
        show(root, PERIODS_TABLE, !periods.is_empty());
        show(root, NO_PERIODS, periods.is_empty());
        set_text(root, NO_PERIODS, EMPTY_TEXT);

        page.prune();
        if self.role == Role::Teacher {
            for period in periods {
                let wrapper_id = format!("{STATUS_WRAPPER_PREFIX}{}", period.id);
                if let Err(e) = page.adopt(&wrapper_id, None) {
                    log::warn!("periods: {e}");
                }
            }
        }
    }

    /// Send a status change for the period behind `instance_id`, restyle its
    /// row and refresh the table.
    pub async fn update_status(
        &mut self,
        client: &RollcallClient,
        page: &mut Page,
        instance_id: &str,
        status: &str,
    ) -> Result<usize, BoardError> {
        let period_id = period_for(instance_id).ok_or_else(|| BoardError::InvalidId(instance_id.to_string()))?;
        let status: PeriodStatus = status.parse()?;

        let row_id = row_of(page.root(), instance_id).ok_or_else(|| BoardError::MissingElement(instance_id.to_string()))?;

        client.update_period_status(period_id, status).await?;
        if let Some(row) = find_element_mut(page.root_mut(), &row_id) {
            row.classes.clear();
            row.add_class(status_class(status.as_str()));
        }
        log::debug!("periods: {period_id} is now {status}");
        self.refresh(client, page).await
    }
}

/// `status-{status}` with the status lowercased.
pub fn status_class(status: &str) -> String {
    format!("status-{}", status.trim().to_lowercase())
}

fn row_id(period: &Period) -> String {
    format!("period-row-{}", period.id)
}

/// The id of the table row holding `id`.
fn row_of(root: &Element, id: &str) -> Option<String> {
    closest(root, id, |el| el.tag.eq_ignore_ascii_case("tr")).map(|row| row.id.clone())
}

fn teacher_row(period: &Period) -> Element {
    let view_cell = match period.parsed_status() {
        Some(status) if status.has_attendance() => Element::new("td").child(
            Element::button("View students")
                .id(format!("view-students-{}", period.id))
                .class(VIEW_STUDENTS_CLASS)
                .data("period-id", period.id.to_string()),
        ),
        _ => Element::new("td"),
    };

    Element::tr()
        .id(row_id(period))
        .class(status_class(&period.status))
        .data("period-id", period.id.to_string())
        .child(Element::td(&period.class_name))
        .child(Element::td(&period.subject_name))
        .child(Element::td(&period.start_time))
        .child(Element::td(&period.end_time))
        .child(Element::new("td").child(status_dropdown(period.id, &period.status)))
        .child(view_cell)
}

fn student_row(period: &Period) -> Element {
    Element::tr()
        .class(status_class(&period.status))
        .child(Element::td(&period.subject_name))
        .child(Element::td(&period.start_time))
        .child(Element::td(&period.end_time))
        .child(Element::td(period.status.to_uppercase()))
}

/// Custom-form status dropdown for one period.
fn status_dropdown(period_id: u64, status: &str) -> Element {
    let trigger_id = format!("statusSelectButton-{period_id}");
    let label = status.parse::<PeriodStatus>().map_or(status, |s| s.label());
    let items = PeriodStatus::ALL.iter().map(|s| {
        Element::li()
            .id(format!("status-{period_id}-{}", s.as_str()))
            .class(OPTION_CLASS)
            .data("value", s.as_str())
            .text(s.label())
    });

    Element::div()
        .id(format!("{STATUS_WRAPPER_PREFIX}{period_id}"))
        .classes(WRAPPER_CLASS)
        .child(
            Element::hidden_input(status)
                .id(format!("statusValue-{period_id}"))
                .attr("name", format!("status-{period_id}")),
        )
        .child(
            Element::div()
                .id(&trigger_id)
                .class(TRIGGER_CLASS)
                .children(trigger_content(&trigger_id, label)),
        )
        .child(
            Element::ul()
                .id(format!("statusOptionsList-{period_id}"))
                .class(LIST_CLASS)
                .children(items),
        )
}

fn show(root: &mut Element, id: &str, visible: bool) {
    if let Some(el) = find_element_mut(root, id) {
        el.hidden = !visible;
    }
}

fn set_text(root: &mut Element, id: &str, text: &str) {
    if let Some(el) = find_element_mut(root, id) {
        el.set_text(text);
    }
}
