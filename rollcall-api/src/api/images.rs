//! Student training images
//!
//! Images are stored by the backend; these calls list, upload, delete and
//! fetch them, and ask the backend to compute face encodings.

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::RollcallClient;
use crate::error::ApiError;
use crate::model::{Ack, EncodingReport, ImageList, ImageUpload, UploadReport};

/// Multipart field the backend reads uploaded files from.
const UPLOAD_FIELD: &str = "images";

impl RollcallClient {
    pub async fn list_images(&self, student_id: u64) -> Result<ImageList, ApiError> {
        self.get_json(&Self::images_path(student_id)).await
    }

    /// Upload one or more images in a single multipart request.
    pub async fn upload_images(&self, student_id: u64, uploads: Vec<ImageUpload>) -> Result<UploadReport, ApiError> {
        let mut form = Form::new().text("student_id", student_id.to_string());
        for upload in uploads {
            form = form.part(UPLOAD_FIELD, Part::bytes(upload.bytes).file_name(upload.file_name));
        }
        let request = self
            .request(Method::POST, &Self::images_path(student_id))?
            .multipart(form);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    pub async fn delete_image(&self, student_id: u64, image_id: u64) -> Result<Ack, ApiError> {
        self.delete_json(&format!("{}/{image_id}", Self::images_path(student_id)))
            .await
    }

    /// Path of the authenticated image view, for use as an image source.
    pub fn image_view_path(student_id: u64, image_id: u64) -> String {
        format!("{}/{image_id}/view", Self::images_path(student_id))
    }

    /// Fetch the raw image bytes.
    pub async fn view_image(&self, student_id: u64, image_id: u64) -> Result<Vec<u8>, ApiError> {
        let request = self.request(Method::GET, &Self::image_view_path(student_id, image_id))?;
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Compute face encodings for the student's images.
    pub async fn generate_encodings(&self, student_id: u64) -> Result<EncodingReport, ApiError> {
        self.post_empty(&format!("/admin/api/students/{student_id}/generate-encodings"))
            .await
    }

    fn images_path(student_id: u64) -> String {
        format!("/admin/api/students/{student_id}/images")
    }
}
