//! Wire types for the resident endpoints

use serde::{Deserialize, Serialize};

/// A registered resident as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: i64,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub father_name: String,
    /// Aadhar number
    #[serde(default)]
    pub aadhar: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_resident: bool,
    /// Whether the backend lists this resident's email among the admins
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub aadhar_photo_url: Option<String>,
}

impl Resident {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Upper-cased first letters of the first and last name, used as an avatar
    /// placeholder when no photo has been uploaded.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Profile photo URL; the backend stores blanks as empty strings.
    pub fn photo(&self) -> Option<&str> {
        non_blank(self.photo_url.as_deref())
    }

    pub fn aadhar_photo(&self) -> Option<&str> {
        non_blank(self.aadhar_photo_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Registration request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub aadhar: String,
    pub address: String,
    pub photo_url: String,
    pub aadhar_photo_url: String,
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Response of the register and login endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: Resident,
    /// Bearer credential for subsequent requests
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Partial profile update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhar_photo_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo_url(mut self, url: &str) -> Self {
        self.photo_url = Some(url.to_string());
        self
    }

    pub fn with_aadhar_photo_url(mut self, url: &str) -> Self {
        self.aadhar_photo_url = Some(url.to_string());
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn with_mobile(mut self, mobile: &str) -> Self {
        self.mobile = Some(mobile.to_string());
        self
    }
}

/// Proof that authorizes a password reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResetConfirmation {
    /// Email plus the one-time code mailed to it
    Otp { email: String, otp: String },
    /// uid/token pair from an emailed reset link
    Link { uid: String, token: String },
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetConfirmRequest<'a> {
    #[serde(flatten)]
    pub confirmation: &'a ResetConfirmation,
    pub new_password: &'a str,
}
