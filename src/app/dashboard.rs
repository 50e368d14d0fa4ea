//! Resident dashboard

use std::sync::Arc;

use log::warn;
use pgstay_auth::{AuthClient, Resident};
use pgstay_upload::ImageUploader;

use crate::app::documents::Document;
use crate::app::navigation::{Navigator, Route, View};
use crate::error::Error;

pub struct Dashboard {
    auth: AuthClient,
    uploader: Arc<dyn ImageUploader>,
    navigator: Navigator,
    uploading: Option<Document>,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(auth: AuthClient, uploader: Arc<dyn ImageUploader>, navigator: Navigator) -> Self {
        Self {
            auth,
            uploader,
            navigator,
            uploading: None,
            error: None,
        }
    }

    /// Enter the dashboard; signed-out visitors are sent to login.
    pub fn open(&self) -> Route {
        self.navigator.navigate(View::Dashboard)
    }

    pub fn resident(&self) -> Option<Resident> {
        self.auth.session().current_identity()
    }

    /// Avatar placeholder when there is no photo
    pub fn initials(&self) -> String {
        self.resident()
            .map(|resident| resident.initials())
            .unwrap_or_default()
    }

    pub fn uploading(&self) -> Option<Document> {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Upload a new image for `document` and save it on the profile. The
    /// session identity only changes if both steps succeed.
    pub async fn replace(
        &mut self,
        document: Document,
        contents: Vec<u8>,
        file_name: &str,
    ) -> Result<Resident, Error> {
        self.uploading = Some(document);
        self.error = None;
        let result = self.upload_and_save(document, contents, file_name).await;
        self.uploading = None;

        if let Err(e) = &result {
            warn!("Replacing {:?} failed: {}", document, e);
            self.error = Some(document.failure_message().to_string());
        }
        result
    }

    pub async fn replace_photo(&mut self, contents: Vec<u8>, file_name: &str) -> Result<Resident, Error> {
        self.replace(Document::Photo, contents, file_name).await
    }

    pub async fn replace_aadhar_photo(
        &mut self,
        contents: Vec<u8>,
        file_name: &str,
    ) -> Result<Resident, Error> {
        self.replace(Document::AadharPhoto, contents, file_name).await
    }

    async fn upload_and_save(
        &self,
        document: Document,
        contents: Vec<u8>,
        file_name: &str,
    ) -> Result<Resident, Error> {
        let url = self.uploader.upload(contents, file_name).await?;
        let resident = self.auth.update_profile(&document.profile_update(&url)).await?;
        Ok(resident)
    }
}
