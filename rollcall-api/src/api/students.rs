//! Student enrollment

use crate::RollcallClient;
use crate::error::ApiError;
use crate::model::{Ack, ClassAssignment, Enrollment, Rejection};

impl RollcallClient {
    /// Approve a pending student into a class.
    pub async fn enroll_student(&self, student_id: u64, class_id: u64) -> Result<Ack, ApiError> {
        self.post_json("/admin/api/student/enroll", &Enrollment { student_id, class_id })
            .await
    }

    /// Reject (and delete) a pending student.
    pub async fn reject_student(&self, student_id: u64) -> Result<Ack, ApiError> {
        self.post_json("/admin/api/student/reject", &Rejection { student_id })
            .await
    }

    /// Move a student to another class.
    pub async fn set_student_class(&self, student_id: u64, class_id: u64) -> Result<Ack, ApiError> {
        self.post_json(&format!("/api/students/{student_id}/class"), &ClassAssignment { class_id })
            .await
    }
}
