//! Resident authentication for the PG portal backend
//!
//! This crate owns the session lifecycle (login, logout, restoring a persisted
//! credential at startup), the resident profile endpoints and the three-step
//! password recovery flow.

mod credentials;
mod error;
pub mod recovery;
mod session;
mod types;

use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

pub use credentials::*;
pub use error::*;
pub use recovery::{RecoveryError, RecoveryFlow, RecoveryState};
pub use session::*;
pub use types::*;

/// Client for the `/users/` endpoints
///
/// Authenticated calls take the credential from the [`SessionStore`] at the time
/// of the call.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http_client: Client,
    session: SessionStore,
}

impl AuthClient {
    pub fn new(base_url: &str, http_client: Client, session: SessionStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, AuthError> {
        let credential = self.session.credential().ok_or(AuthError::MissingSession)?;
        Ok(request.bearer_auth(credential))
    }

    /// Register a new resident and sign them in.
    pub async fn register(&self, registration: &Registration) -> Result<Resident, AuthError> {
        let url = self.endpoint("/users/register/");
        debug!("POST {}", url);

        let response = self.http_client.post(&url).json(registration).send().await?;
        let auth = parse_json::<AuthResponse>(response).await?;

        self.session.login(auth.access, auth.user.clone());
        Ok(auth.user)
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Resident, AuthError> {
        let url = self.endpoint("/users/login/");
        debug!("POST {}", url);

        let credentials = LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.http_client.post(&url).json(&credentials).send().await?;
        let auth = parse_json::<AuthResponse>(response).await?;

        self.session.login(auth.access, auth.user.clone());
        Ok(auth.user)
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Fetch the identity behind the current credential.
    pub async fn fetch_profile(&self) -> Result<Resident, AuthError> {
        let url = self.endpoint("/users/profile/");
        debug!("GET {}", url);

        let request = self.authorized(self.http_client.get(&url))?;
        parse_json(request.send().await?).await
    }

    /// Apply a partial profile update and refresh the session identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Resident, AuthError> {
        let url = self.endpoint("/users/profile/");
        debug!("PATCH {}", url);

        let credential = self.session.credential().ok_or(AuthError::MissingSession)?;
        let response = self
            .http_client
            .patch(&url)
            .bearer_auth(&credential)
            .json(update)
            .send()
            .await?;
        let resident = parse_json::<Resident>(response).await?;

        self.session.login(credential, resident.clone());
        Ok(resident)
    }

    /// Validate a credential left behind by an earlier run.
    ///
    /// Any failure is treated as an expired session: the stale credential is
    /// discarded and the session stays signed out. Returns whether a session
    /// was restored.
    pub async fn restore_session(&self) -> bool {
        let Some(credential) = self.session.persisted_credential() else {
            self.session.set_loading(false);
            return false;
        };

        self.session.set_loading(true);
        let restored = match self.fetch_profile_with(&credential).await {
            Ok(identity) => {
                self.session.login(credential, identity);
                true
            }
            Err(e) => {
                debug!("Discarding persisted credential: {}", e);
                self.session.logout();
                false
            }
        };
        self.session.set_loading(false);
        restored
    }

    async fn fetch_profile_with(&self, credential: &str) -> Result<Resident, AuthError> {
        let url = self.endpoint("/users/profile/");
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await?;
        parse_json(response).await
    }

    /// Ask the backend to mail a one-time code to `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let url = self.endpoint("/users/password-reset/");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        ensure_success(response).await
    }

    /// Check a one-time code without consuming it.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), AuthError> {
        let url = self.endpoint("/users/verify-otp/");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "email": email, "otp": otp }))
            .send()
            .await?;
        ensure_success(response).await
    }

    /// Set a new password using either an OTP or a reset link.
    pub async fn confirm_password_reset(
        &self,
        confirmation: &ResetConfirmation,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let url = self.endpoint("/users/password-reset-confirm/");
        debug!("POST {}", url);

        let body = ResetConfirmRequest {
            confirmation,
            new_password,
        };
        let response = self.http_client.post(&url).json(&body).send().await?;
        ensure_success(response).await
    }
}

async fn ensure_success(response: Response) -> Result<(), AuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::from_response(status, &body));
    }
    Ok(())
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::from_response(status, &body));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
