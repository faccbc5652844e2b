//! Attendance roster of one period, shown in the period modal.

use pagedom::element::find_element_mut;
use pagedom::Element;
use rollcall_api::model::{Ack, PeriodStudent};
use rollcall_api::{ApiError, RollcallClient};

pub const ROSTER_BODY: &str = "studentAttendanceList";
pub const ROSTER_MODAL: &str = "periodModal";

pub const ADD_CLASS: &str = "add-attendance";
pub const REMOVE_CLASS: &str = "remove-attendance";

/// A mark change requested from a roster button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterAction {
    Add { period_id: u64, student_id: u64 },
    Remove { period_id: u64, student_id: u64 },
}

impl RosterAction {
    /// Read the action off an add/remove button.
    pub fn from_button(button: &Element) -> Option<Self> {
        let period_id = button.get_data("period-id")?.parse().ok()?;
        let student_id = button.get_data("student-id")?.parse().ok()?;
        if button.has_class(ADD_CLASS) {
            Some(Self::Add { period_id, student_id })
        } else if button.has_class(REMOVE_CLASS) {
            Some(Self::Remove { period_id, student_id })
        } else {
            None
        }
    }

    pub fn period_id(self) -> u64 {
        match self {
            Self::Add { period_id, .. } | Self::Remove { period_id, .. } => period_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    period_id: Option<u64>,
    students: Vec<PeriodStudent>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The period currently shown, if the modal has been opened.
    pub fn period_id(&self) -> Option<u64> {
        self.period_id
    }

    pub fn students(&self) -> &[PeriodStudent] {
        &self.students
    }

    /// Load the period's students and open the modal.
    pub async fn view(&mut self, client: &RollcallClient, root: &mut Element, period_id: u64) -> Result<usize, ApiError> {
        let students = client.period_students(period_id).await?;
        self.period_id = Some(period_id);
        self.students = students;
        self.render(root);
        if let Some(modal) = find_element_mut(root, ROSTER_MODAL) {
            modal.hidden = false;
        }
        log::debug!("roster: period {period_id} has {} students", self.students.len());
        Ok(self.students.len())
    }

    /// Apply a mark change and reload the roster. Returns the backend's
    /// acknowledgement for the toast.
    pub async fn apply(&mut self, client: &RollcallClient, root: &mut Element, action: RosterAction) -> Result<Ack, ApiError> {
        let ack = match action {
            RosterAction::Add { period_id, student_id } => client.add_attendance(period_id, student_id).await?,
            RosterAction::Remove { period_id, student_id } => client.remove_attendance(period_id, student_id).await?,
        };
        self.view(client, root, action.period_id()).await?;
        Ok(ack)
    }

    pub fn close(&self, root: &mut Element) {
        if let Some(modal) = find_element_mut(root, ROSTER_MODAL) {
            modal.hidden = true;
        }
    }

    fn render(&self, root: &mut Element) {
        let Some(period_id) = self.period_id else {
            return;
        };
        let Some(body) = find_element_mut(root, ROSTER_BODY) else {
            log::warn!("roster: {ROSTER_BODY} not on this page");
            return;
        };
        body.set_children(self.students.iter().map(|s| student_row(period_id, s)).collect());
    }
}

/// Present students get a remove button after their mark, absent students
/// an add button before it.
fn student_row(period_id: u64, student: &PeriodStudent) -> Element {
    let button = |class: &str| {
        Element::button("")
            .id(format!("{class}-{period_id}-{}", student.id))
            .class(class)
            .data("period-id", period_id.to_string())
            .data("student-id", student.id.to_string())
    };

    let row = Element::tr()
        .child(Element::td(&student.roll_no))
        .child(Element::td(&student.name));
    if student.is_present() {
        row.child(Element::td("Present").class("present"))
            .child(Element::new("td").child(button(REMOVE_CLASS)))
    } else {
        row.child(Element::new("td").child(button(ADD_CLASS)))
            .child(Element::td("Absent").class("absent"))
    }
}
