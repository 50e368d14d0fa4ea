//! Resident sign-up

use std::sync::Arc;

use log::warn;
use pgstay_auth::{AuthClient, Registration, Resident};
use pgstay_upload::ImageUploader;

use crate::app::documents::Document;
use crate::app::navigation::{Navigator, View};
use crate::error::Error;

pub const TERMS_NOT_ACCEPTED: &str = "Please accept the Terms and Conditions to continue.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please check your details.";

/// Registration form with document uploads
pub struct RegistrationForm {
    auth: AuthClient,
    uploader: Arc<dyn ImageUploader>,
    navigator: Navigator,
    pub details: Registration,
    pub accepted_terms: bool,
    error: Option<String>,
    uploading: Option<Document>,
    submitting: bool,
}

impl RegistrationForm {
    pub fn new(auth: AuthClient, uploader: Arc<dyn ImageUploader>, navigator: Navigator) -> Self {
        Self {
            auth,
            uploader,
            navigator,
            details: Registration::default(),
            accepted_terms: false,
            error: None,
            uploading: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn uploading(&self) -> Option<Document> {
        self.uploading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Upload a document image and remember its URL. On failure any URL
    /// from an earlier upload is kept.
    pub async fn attach(
        &mut self,
        document: Document,
        contents: Vec<u8>,
        file_name: &str,
    ) -> Result<String, Error> {
        self.uploading = Some(document);
        let result = self.uploader.upload(contents, file_name).await;
        self.uploading = None;

        match result {
            Ok(url) => {
                match document {
                    Document::Photo => self.details.photo_url = url.clone(),
                    Document::AadharPhoto => self.details.aadhar_photo_url = url.clone(),
                }
                Ok(url)
            }
            Err(e) => {
                warn!("{:?} upload failed: {}", document, e);
                self.error = Some(document.failure_message().to_string());
                Err(e.into())
            }
        }
    }

    pub async fn attach_photo(&mut self, contents: Vec<u8>, file_name: &str) -> Result<String, Error> {
        self.attach(Document::Photo, contents, file_name).await
    }

    pub async fn attach_aadhar_photo(
        &mut self,
        contents: Vec<u8>,
        file_name: &str,
    ) -> Result<String, Error> {
        self.attach(Document::AadharPhoto, contents, file_name).await
    }

    /// The first required field left blank, by its label
    pub fn missing_field(&self) -> Option<&'static str> {
        let details = &self.details;
        [
            ("first name", &details.first_name),
            ("last name", &details.last_name),
            ("email", &details.email),
            ("password", &details.password),
            ("mobile number", &details.mobile),
            ("father's name", &details.father_name),
            ("Aadhar number", &details.aadhar),
            ("address", &details.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
    }

    /// Create the account, sign in and go to the dashboard.
    pub async fn submit(&mut self) -> Result<Resident, Error> {
        if let Some(field) = self.missing_field() {
            let message = format!("Please enter your {}.", field);
            self.error = Some(message.clone());
            return Err(Error::Validation(message));
        }
        if !self.accepted_terms {
            self.error = Some(TERMS_NOT_ACCEPTED.to_string());
            return Err(Error::validation(TERMS_NOT_ACCEPTED));
        }

        self.submitting = true;
        self.error = None;
        let result = self.auth.register(&self.details).await;
        self.submitting = false;

        match result {
            Ok(resident) => {
                self.navigator.navigate(View::Dashboard);
                Ok(resident)
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.error = Some(REGISTRATION_FAILED.to_string());
                Err(e.into())
            }
        }
    }
}
