//! Pending-student cards, the role switch of the add-user form and teacher
//! assignment.

use pagedom::element::{closest, find_element, find_element_mut, remove_element};
use pagedom::{query_first, Element, Selector};
use rollcall_api::model::Ack;
use rollcall_api::{ApiError, RollcallClient};
use thiserror::Error;

pub const STUDENT_CARD_CLASS: &str = "student-card";
pub const ENROLL_CLASS: &str = "enroll-btn";
pub const REJECT_CLASS: &str = "reject-btn";

/// Select id prefix of the per-card class choosers.
pub const CLASS_SELECT_PREFIX: &str = "classStudents";
pub const ROLE_SELECT: &str = "roleSelect";
pub const STUDENT_FIELDS: &str = "studentFields";

pub const TEACHER_VALUE: &str = "value-teacherSelect";
pub const TEACHER_CLASS_VALUE: &str = "value-teacherClass";
pub const TEACHER_SUBJECT_VALUE: &str = "value-teacherSubject";

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("button `{0}` has no student id")]
    NoStudent(String),

    #[error("no class chosen for student {0}")]
    NoClass(u64),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("Please select a teacher")]
    NoTeacher,

    #[error("Please select both class and subject")]
    NoClassOrSubject,
}

/// What a pending-student button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Enroll,
    Reject,
}

impl CardAction {
    pub fn of(button: &Element) -> Option<Self> {
        if button.has_class(ENROLL_CLASS) {
            Some(Self::Enroll)
        } else if button.has_class(REJECT_CLASS) {
            Some(Self::Reject)
        } else {
            None
        }
    }

    /// Toast text when the request fails.
    pub fn failure(self) -> &'static str {
        match self {
            Self::Enroll => "Enroll failed",
            Self::Reject => "Reject failed",
        }
    }

    /// Toast text when the backend acknowledges without a message.
    pub fn fallback(self) -> &'static str {
        match self {
            Self::Enroll => "Enrolled",
            Self::Reject => "Rejected",
        }
    }
}

/// The nearest enroll/reject button at or above `id`.
pub fn card_button(root: &Element, id: &str) -> Option<(String, CardAction)> {
    let button = closest(root, id, |el| CardAction::of(el).is_some())?;
    Some((button.id.clone(), CardAction::of(button)?))
}

fn card_of(root: &Element, id: &str) -> Option<String> {
    closest(root, id, |el| el.has_class(STUDENT_CARD_CLASS)).map(|card| card.id.clone())
}

fn data_id(el: &Element, key: &str) -> Option<u64> {
    el.get_data(key)?.trim().parse().ok()
}

/// Store a class choice on the enroll button of the same card.
///
/// `instance_id` is the class dropdown's id. Returns whether a button was
/// updated.
pub fn record_class(root: &mut Element, instance_id: &str, class_id: &str) -> bool {
    if !instance_id.starts_with(CLASS_SELECT_PREFIX) {
        return false;
    }
    let anchor = format!("wrapper-{instance_id}");
    let Some(card_id) = card_of(root, &anchor).or_else(|| card_of(root, instance_id)) else {
        log::debug!("enrollment: {instance_id} is not inside a student card");
        return false;
    };
    let Some(button_id) = find_element(root, &card_id)
        .and_then(|card| query_first(card, &Selector::class(ENROLL_CLASS)))
        .map(|button| button.id.clone())
    else {
        return false;
    };
    match find_element_mut(root, &button_id) {
        Some(button) => {
            button.set_attr("data-class-id", class_id);
            log::debug!("enrollment: {button_id} will enroll into class {class_id}");
            true
        }
        None => false,
    }
}

/// Show the student-only fields when `role` is `student`.
pub fn toggle_student_fields(root: &mut Element, role: &str) {
    if let Some(fields) = find_element_mut(root, STUDENT_FIELDS) {
        fields.hidden = role != "student";
    }
}

/// Run an enroll or reject button. On success the student's card is removed.
pub async fn run_card_action(
    client: &RollcallClient,
    root: &mut Element,
    button_id: &str,
    action: CardAction,
) -> Result<Ack, EnrollError> {
    let button = find_element(root, button_id).ok_or_else(|| EnrollError::NoStudent(button_id.to_string()))?;
    let student_id = data_id(button, "id").ok_or_else(|| EnrollError::NoStudent(button_id.to_string()))?;

    let ack = match action {
        CardAction::Enroll => {
            let class_id = data_id(button, "class-id").ok_or(EnrollError::NoClass(student_id))?;
            client.enroll_student(student_id, class_id).await?
        }
        CardAction::Reject => client.reject_student(student_id).await?,
    };

    if let Some(card_id) = card_of(root, button_id) {
        remove_element(root, &card_id);
    }
    Ok(ack)
}

/// The teacher, class and subject chosen in the assignment panel.
pub fn read_assignment(root: &Element) -> Result<(u64, u64, u64), AssignError> {
    let value = |id: &str| find_element(root, id).and_then(|el| el.value().trim().parse::<u64>().ok());

    let teacher = value(TEACHER_VALUE).ok_or(AssignError::NoTeacher)?;
    match (value(TEACHER_CLASS_VALUE), value(TEACHER_SUBJECT_VALUE)) {
        (Some(class), Some(subject)) => Ok((teacher, class, subject)),
        _ => Err(AssignError::NoClassOrSubject),
    }
}
