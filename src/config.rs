//! Configuration options for the portal client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Configuration options for the portal client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the backend API, e.g. `https://pg.example.com/api`
    pub api_url: String,

    /// Base URL of the image host API
    pub image_host_url: String,

    /// Image host account the uploads go to
    pub cloud_name: String,

    /// Unsigned upload preset configured on the image host
    pub upload_preset: String,

    /// Where the credential is persisted; in memory when unset
    pub credential_path: Option<PathBuf>,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// How long the password reset success screen stays up before going to login
    pub redirect_delay: Duration,

    /// How long the lead form's success/error banner stays up
    pub banner_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            image_host_url: pgstay_upload::DEFAULT_HOST.to_string(),
            cloud_name: String::new(),
            upload_preset: String::new(),
            credential_path: None,
            request_timeout: Some(Duration::from_secs(30)),
            redirect_delay: Duration::from_secs(2),
            banner_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientOptions {
    /// Load options from the environment, reading a `.env` file first if one
    /// exists.
    ///
    /// `PGSTAY_API_URL` is required. `PGSTAY_CLOUDINARY_CLOUD_NAME`,
    /// `PGSTAY_CLOUDINARY_UPLOAD_PRESET`, `PGSTAY_CREDENTIAL_PATH` and
    /// `PGSTAY_REQUEST_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let api_url = env::var("PGSTAY_API_URL")
            .map_err(|_| Error::config("PGSTAY_API_URL environment variable not found"))?;

        let mut options = Self::default().with_api_url(&api_url)?;

        if let Ok(cloud_name) = env::var("PGSTAY_CLOUDINARY_CLOUD_NAME") {
            options.cloud_name = cloud_name;
        }
        if let Ok(preset) = env::var("PGSTAY_CLOUDINARY_UPLOAD_PRESET") {
            options.upload_preset = preset;
        }
        if let Ok(path) = env::var("PGSTAY_CREDENTIAL_PATH") {
            options.credential_path = Some(PathBuf::from(path));
        }
        if let Ok(secs) = env::var("PGSTAY_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(format!("PGSTAY_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            options.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(options)
    }

    /// Set the backend base URL. Fails if it does not parse.
    pub fn with_api_url(mut self, value: &str) -> Result<Self, Error> {
        Url::parse(value)?;
        self.api_url = value.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the image host base URL
    pub fn with_image_host_url(mut self, value: &str) -> Self {
        self.image_host_url = value.to_string();
        self
    }

    /// Set the image host account and upload preset
    pub fn with_image_host(mut self, cloud_name: &str, upload_preset: &str) -> Self {
        self.cloud_name = cloud_name.to_string();
        self.upload_preset = upload_preset.to_string();
        self
    }

    /// Persist the credential to this file
    pub fn with_credential_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(value.into());
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    pub fn with_redirect_delay(mut self, value: Duration) -> Self {
        self.redirect_delay = value;
        self
    }

    pub fn with_banner_timeout(mut self, value: Duration) -> Self {
        self.banner_timeout = value;
        self
    }
}
