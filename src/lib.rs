//! PG Stay portal client
//!
//! A client for the paying-guest accommodation portal: visitors leave an
//! inquiry, residents register with their identity documents and manage their
//! profile, admins review leads and residents, and anyone can recover a
//! forgotten password by emailed OTP.
//!
//! [`Portal`] wires the backend clients, the session and the navigator
//! together and hands out page models from [`app`].

pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod leads;
pub mod residents;

use std::sync::Arc;

use log::info;
use pgstay_auth::{AuthClient, CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionStore};
use pgstay_upload::{ImageHostClient, ImageUploader};
use reqwest::Client;

use crate::app::{
    AdminPanel, Dashboard, LeadCaptureForm, LoginForm, Navigator, PasswordRecoveryPage,
    RegistrationForm,
};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::leads::LeadsClient;
use crate::residents::ResidentsClient;

pub use pgstay_auth as auth;
pub use pgstay_upload as upload;

/// The main entry point for the portal client
pub struct Portal {
    options: ClientOptions,
    session: SessionStore,
    auth: AuthClient,
    leads: LeadsClient,
    residents: ResidentsClient,
    uploader: Arc<dyn ImageUploader>,
    navigator: Navigator,
}

impl Portal {
    /// Create a portal client. The session is persisted to
    /// `options.credential_path` when set, otherwise it lives in memory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pgstay::{Portal, config::ClientOptions};
    ///
    /// # async fn run() -> Result<(), pgstay::error::Error> {
    /// let options = ClientOptions::default().with_api_url("https://pg.example.com/api")?;
    /// let portal = Portal::new(options)?;
    /// portal.start().await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        let credentials: Arc<dyn CredentialStore> = match &options.credential_path {
            Some(path) => Arc::new(FileCredentialStore::new(path.clone())),
            None => Arc::new(MemoryCredentialStore::new()),
        };
        Self::with_credential_store(options, credentials)
    }

    /// Create a portal client persisting its session to `credentials`
    pub fn with_credential_store(
        options: ClientOptions,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let session = SessionStore::new(credentials);
        let auth = AuthClient::new(&options.api_url, http_client.clone(), session.clone());
        let leads = LeadsClient::new(&options.api_url, http_client.clone(), session.clone());
        let residents = ResidentsClient::new(&options.api_url, http_client, session.clone());
        // Uploads go straight to the image host, without the session credential
        let uploader: Arc<dyn ImageUploader> = Arc::new(
            ImageHostClient::new(&options.cloud_name, &options.upload_preset)
                .with_host(&options.image_host_url),
        );
        let navigator = Navigator::new(session.clone());

        Ok(Self {
            options,
            session,
            auth,
            leads,
            residents,
            uploader,
            navigator,
        })
    }

    /// Replace the image uploader
    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    /// Restore a persisted session. Returns true when a resident is signed in
    /// afterwards.
    pub async fn start(&self) -> bool {
        let restored = self.auth.restore_session().await;
        if restored {
            info!("Session restored");
        }
        restored
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn leads(&self) -> &LeadsClient {
        &self.leads
    }

    pub fn residents(&self) -> &ResidentsClient {
        &self.residents
    }

    pub fn uploader(&self) -> Arc<dyn ImageUploader> {
        self.uploader.clone()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn lead_form(&self) -> LeadCaptureForm {
        LeadCaptureForm::new(self.leads.clone(), self.options.banner_timeout)
    }

    pub fn registration_form(&self) -> RegistrationForm {
        RegistrationForm::new(self.auth.clone(), self.uploader(), self.navigator.clone())
    }

    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(self.auth.clone(), self.navigator.clone())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.auth.clone(), self.uploader(), self.navigator.clone())
    }

    pub fn admin_panel(&self) -> AdminPanel {
        AdminPanel::new(
            self.leads.clone(),
            self.residents.clone(),
            self.navigator.clone(),
        )
    }

    pub fn password_recovery(&self) -> PasswordRecoveryPage {
        PasswordRecoveryPage::new(
            self.auth.clone(),
            self.navigator.clone(),
            self.options.redirect_delay,
        )
    }

    /// Sign out and return to the home page
    pub fn logout(&self) {
        self.auth.logout();
        self.navigator.navigate(app::View::Home);
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::app::*;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::leads::{Lead, NewLead};
    pub use crate::Portal;
    pub use pgstay_auth::{Registration, Resident, SessionStore};
}
