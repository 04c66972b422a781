// File: ./src/submission.rs
use crate::error::{LostFoundError, Result};
use crate::model::{Item, ItemFields, ItemType};
use crate::store::ItemStore;
use crate::upload::{ImageFile, ImageUploader, upload_image};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raw report form, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub image: Option<ImageFile>,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            kind: ItemType::Lost,
            title: String::new(),
            description: String::new(),
            category: String::new(),
            location: String::new(),
            contact_name: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            image: None,
        }
    }
}

impl ItemForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trims everything and checks the required fields. The image is not looked at.
    pub fn validate(&self) -> Result<ItemFields> {
        fn required(label: &str, value: &str) -> Result<String> {
            let value = value.trim();
            if value.is_empty() {
                return Err(LostFoundError::Validation(format!("{} is required", label)));
            }
            Ok(value.to_string())
        }

        let title = required("Title", &self.title)?;
        let description = required("Description", &self.description)?;
        let category = required("Category", &self.category)?;
        let location = required("Location", &self.location)?;
        let contact_name = required("Contact name", &self.contact_name)?;
        let contact_email = required("Contact email", &self.contact_email)?;
        if !contact_email.contains('@')
            || contact_email
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '?' | '&' | '#' | '<' | '>'))
        {
            return Err(LostFoundError::Validation(format!(
                "'{}' is not an email address",
                contact_email
            )));
        }
        let phone = self.contact_phone.trim();

        Ok(ItemFields {
            kind: self.kind,
            title,
            description,
            category,
            location,
            contact_name,
            contact_email,
            contact_phone: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Collecting,
    Submitting,
}

pub struct SubmissionPipeline {
    store: Arc<dyn ItemStore>,
    uploader: Arc<dyn ImageUploader>,
    in_flight: AtomicBool,
}

// Puts the pipeline back into Collecting on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SubmissionPipeline {
    pub fn new(store: Arc<dyn ItemStore>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            store,
            uploader,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SubmissionState {
        if self.in_flight.load(Ordering::SeqCst) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Collecting
        }
    }

    /// Validates, uploads the optional image, then adds the item.
    /// Nothing is stored unless every step succeeds; the form is never modified.
    pub async fn submit(&self, form: &ItemForm) -> Result<Item> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LostFoundError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let fields = form.validate()?;

        let image_url = match &form.image {
            Some(file) => Some(upload_image(self.uploader.as_ref(), file).await?),
            None => None,
        };

        let item = Item::new(fields, image_url);
        let stored = self.store.add(item).await?;
        log::info!("Reported {} item '{}' ({})", stored.kind, stored.title, stored.id);
        Ok(stored)
    }
}
