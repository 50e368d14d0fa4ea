//! Identity documents residents upload

use pgstay_auth::ProfileUpdate;

/// An image a resident attaches to their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Photo,
    AadharPhoto,
}

impl Document {
    /// Shown when uploading or saving the document fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Document::Photo => "Photo upload failed. Please try again.",
            Document::AadharPhoto => "Aadhar photo upload failed. Please try again.",
        }
    }

    pub(crate) fn profile_update(&self, url: &str) -> ProfileUpdate {
        match self {
            Document::Photo => ProfileUpdate::new().with_photo_url(url),
            Document::AadharPhoto => ProfileUpdate::new().with_aadhar_photo_url(url),
        }
    }
}
