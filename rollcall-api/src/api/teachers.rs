use crate::RollcallClient;
use crate::error::ApiError;
use crate::model::{Ack, TeacherAssignment};

impl RollcallClient {
    /// Assign a teacher to teach `subject_id` in `class_id`.
    ///
    /// The backend answers 400 when the assignment already exists.
    pub async fn assign_teacher(&self, teacher_id: u64, class_id: u64, subject_id: u64) -> Result<Ack, ApiError> {
        self.post_json(
            &format!("/api/teachers/{teacher_id}/assign"),
            &TeacherAssignment { class_id, subject_id },
        )
        .await
    }
}
