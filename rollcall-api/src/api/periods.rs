//! Periods and per-period attendance

use crate::RollcallClient;
use crate::error::ApiError;
use crate::model::{Ack, NewPeriod, Period, PeriodStatus, PeriodStudent, StatusUpdate};

impl RollcallClient {
    /// Today's periods of the signed-in teacher, ordered by start time.
    pub async fn teacher_periods_today(&self) -> Result<Vec<Period>, ApiError> {
        self.get_json("/teacher/api/periods/today").await
    }

    /// Today's periods of the signed-in student's class.
    pub async fn student_periods_today(&self) -> Result<Vec<Period>, ApiError> {
        self.get_json("/student/api/periods/today").await
    }

    /// `POST /api/periods/{id}/status`
    pub async fn update_period_status(&self, period_id: u64, status: PeriodStatus) -> Result<Ack, ApiError> {
        self.post_json(&format!("/api/periods/{period_id}/status"), &StatusUpdate { status })
            .await
    }

    /// Class roster of a period with each student's mark.
    pub async fn period_students(&self, period_id: u64) -> Result<Vec<PeriodStudent>, ApiError> {
        self.get_json(&format!("/api/periods/{period_id}/students")).await
    }

    /// Mark a student present for a period.
    pub async fn add_attendance(&self, period_id: u64, student_id: u64) -> Result<Ack, ApiError> {
        self.post_empty(&format!("/api/periods/{period_id}/students/{student_id}"))
            .await
    }

    /// Remove a student's mark for a period.
    pub async fn remove_attendance(&self, period_id: u64, student_id: u64) -> Result<Ack, ApiError> {
        self.delete_json(&format!("/api/periods/{period_id}/students/{student_id}"))
            .await
    }

    /// Schedule a period (admin).
    pub async fn schedule_period(&self, period: &NewPeriod) -> Result<Ack, ApiError> {
        self.post_json("/admin/api/periods", period).await
    }
}
