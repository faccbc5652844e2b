//! Student training images: the images modal and the image viewer.

use pagedom::element::find_element_mut;
use pagedom::Element;
use rollcall_api::model::{Ack, EncodingReport, ImageList, StudentImage};
use rollcall_api::{ApiError, RollcallClient};
use thiserror::Error;

pub const IMAGES_MODAL: &str = "imagesModal";
pub const IMAGES_TITLE: &str = "imagesModalTitle";
pub const IMAGES_LIST: &str = "imagesList";
pub const TOTAL_COUNT: &str = "totalImagesCount";
pub const ENCODED_COUNT: &str = "encodedImagesCount";

pub const VIEWER_MODAL: &str = "imageViewerModal";
pub const VIEWER_IMG: &str = "imageViewerImg";
pub const VIEWER_NAME: &str = "imageViewerName";
pub const NAV_PREV: &str = "imageNavPrev";
pub const NAV_NEXT: &str = "imageNavNext";

/// Class of the per-image delete buttons in the images list.
pub const DELETE_CLASS: &str = "delete-image";

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("No student selected")]
    NoStudent,

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend answered but reported a failure in the body.
    #[error("Error: {0}")]
    Backend(String),
}

/// Images of the student whose modal is open, and the viewer position.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    student_id: Option<u64>,
    student_name: String,
    images: Vec<StudentImage>,
    index: usize,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student_id(&self) -> Option<u64> {
        self.student_id
    }

    pub fn images(&self) -> &[StudentImage] {
        &self.images
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&StudentImage> {
        self.images.get(self.index)
    }

    /// Replace the viewer's images and start at the first one.
    pub fn set_images(&mut self, images: Vec<StudentImage>) {
        self.images = images;
        self.index = 0;
    }

    /// Step forward, wrapping past the last image.
    pub fn next(&mut self) {
        if !self.images.is_empty() {
            self.index = (self.index + 1) % self.images.len();
        }
    }

    /// Step back, wrapping before the first image.
    pub fn prev(&mut self) {
        if !self.images.is_empty() {
            self.index = (self.index + self.images.len() - 1) % self.images.len();
        }
    }

    /// Authenticated view path of the current image.
    pub fn view_path(&self) -> Option<String> {
        let student_id = self.student_id?;
        let image = self.current()?;
        Some(RollcallClient::image_view_path(student_id, image.id))
    }

    /// `file.jpg (2/5)`.
    pub fn caption(&self) -> Option<String> {
        let image = self.current()?;
        Some(format!("{} ({}/{})", image.file_name, self.index + 1, self.images.len()))
    }

    // -------------------------------------------------------------------------
    // Images modal
    // -------------------------------------------------------------------------

    /// Open the images modal for a student.
    pub fn open(&mut self, root: &mut Element, student_id: u64, student_name: &str) {
        self.student_id = Some(student_id);
        self.student_name = student_name.to_string();
        self.images.clear();
        self.index = 0;

        set_text(root, IMAGES_TITLE, &format!("{student_name}'s Images"));
        show(root, IMAGES_MODAL, true);
    }

    pub fn close(&self, root: &mut Element) {
        show(root, IMAGES_MODAL, false);
    }

    /// Reload the image table and counters of the open student.
    pub async fn load(&self, client: &RollcallClient, root: &mut Element) -> Result<ImageList, GalleryError> {
        let student_id = self.student_id.ok_or(GalleryError::NoStudent)?;
        match client.list_images(student_id).await {
            Ok(list) => {
                render_list(root, student_id, &list);
                Ok(list)
            }
            Err(e) => {
                log::error!("images of student {student_id}: {e}");
                if let Some(table) = find_element_mut(root, IMAGES_LIST) {
                    table.set_children(vec![message_row("Failed to load images")]);
                }
                Err(e.into())
            }
        }
    }

    /// Delete one image and reload the table.
    pub async fn delete(&self, client: &RollcallClient, root: &mut Element, image_id: u64) -> Result<Ack, GalleryError> {
        let student_id = self.student_id.ok_or(GalleryError::NoStudent)?;
        let ack = client.delete_image(student_id, image_id).await?;
        self.load(client, root).await?;
        Ok(ack)
    }

    /// Ask the backend to encode the student's images.
    ///
    /// A failure reported in the reply body becomes [`GalleryError::Backend`].
    /// Per-image warnings are logged. On success the table is reloaded.
    pub async fn generate_encodings(&self, client: &RollcallClient, root: &mut Element) -> Result<EncodingReport, GalleryError> {
        let student_id = self.student_id.ok_or(GalleryError::NoStudent)?;
        let report = client.generate_encodings(student_id).await?;
        if !report.errors.is_empty() {
            log::warn!("encoding warnings for student {student_id}: {:?}", report.errors);
        }
        if let Some(error) = &report.error {
            return Err(GalleryError::Backend(error.clone()));
        }
        self.load(client, root).await?;
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Viewer
    // -------------------------------------------------------------------------

    /// Fetch the images and open the viewer on the first one.
    ///
    /// Returns `Ok(false)` without opening when the student has no images.
    pub async fn show_viewer(&mut self, client: &RollcallClient, root: &mut Element) -> Result<bool, GalleryError> {
        let student_id = self.student_id.ok_or(GalleryError::NoStudent)?;
        let list = client.list_images(student_id).await?;
        if list.images.is_empty() {
            return Ok(false);
        }
        self.set_images(list.images);
        self.render_viewer(root);
        show(root, VIEWER_MODAL, true);
        Ok(true)
    }

    pub fn close_viewer(&self, root: &mut Element) {
        show(root, VIEWER_MODAL, false);
    }

    /// Write the current image, its caption and the nav buttons.
    pub fn render_viewer(&self, root: &mut Element) {
        let (Some(path), Some(caption)) = (self.view_path(), self.caption()) else {
            return;
        };
        if let Some(img) = find_element_mut(root, VIEWER_IMG) {
            img.set_attr("src", path);
            img.set_attr("alt", &self.current().map(|i| i.file_name.clone()).unwrap_or_default());
        }
        set_text(root, VIEWER_NAME, &caption);

        let several = self.images.len() > 1;
        show(root, NAV_PREV, several);
        show(root, NAV_NEXT, several);
    }
}

fn render_list(root: &mut Element, student_id: u64, list: &ImageList) {
    set_text(root, TOTAL_COUNT, &list.total_images.to_string());
    set_text(root, ENCODED_COUNT, &list.encoded_images.to_string());

    let rows = if list.images.is_empty() {
        vec![message_row("No images yet")]
    } else {
        list.images.iter().map(|image| image_row(student_id, image)).collect()
    };
    if let Some(table) = find_element_mut(root, IMAGES_LIST) {
        table.set_children(rows);
    }
}

fn image_row(student_id: u64, image: &StudentImage) -> Element {
    let (badge, class) = if image.has_encoding {
        ("✓ Yes", "encoded")
    } else {
        ("✗ No", "not-encoded")
    };
    Element::tr()
        .child(Element::td(&image.file_name))
        .child(Element::new("td").child(Element::span().class(class).text(badge)))
        .child(
            Element::new("td").child(
                Element::button("Delete")
                    .id(format!("{DELETE_CLASS}-{}", image.id))
                    .class(DELETE_CLASS)
                    .data("student-id", student_id.to_string())
                    .data("image-id", image.id.to_string()),
            ),
        )
}

fn message_row(text: &str) -> Element {
    Element::tr().child(Element::td(text).attr("colspan", "3"))
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
