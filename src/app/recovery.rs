//! Forgot-password page

use std::time::Duration;

use log::debug;
use pgstay_auth::{AuthClient, RecoveryError, RecoveryFlow, RecoveryState};
use tokio::task::JoinHandle;

use crate::app::navigation::{Navigator, View};

pub const CODE_SENT: &str = "OTP sent to your email";
pub const CODE_VERIFIED: &str = "OTP verified successfully";
pub const PASSWORD_CHANGED: &str = "Your password has been changed successfully.";

/// Drives a [`RecoveryFlow`] and holds what the page shows: an info message,
/// an error and a busy flag. After the password is changed the page moves to
/// login once the redirect delay has passed.
pub struct PasswordRecoveryPage {
    flow: RecoveryFlow,
    navigator: Navigator,
    redirect_delay: Duration,
    message: Option<String>,
    error: Option<String>,
    loading: bool,
    redirect: Option<JoinHandle<()>>,
}

impl PasswordRecoveryPage {
    pub fn new(auth: AuthClient, navigator: Navigator, redirect_delay: Duration) -> Self {
        Self {
            flow: RecoveryFlow::new(auth),
            navigator,
            redirect_delay,
            message: None,
            error: None,
            loading: false,
            redirect: None,
        }
    }

    pub fn state(&self) -> &RecoveryState {
        self.flow.state()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn request_code(&mut self, email: &str) -> Result<(), RecoveryError> {
        self.begin();
        let result = self.flow.request_code(email).await;
        self.finish(result, CODE_SENT)
    }

    pub async fn verify_code(&mut self, code: &str) -> Result<(), RecoveryError> {
        self.begin();
        let result = self.flow.verify_code(code).await;
        self.finish(result, CODE_VERIFIED)
    }

    pub async fn set_new_password(
        &mut self,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), RecoveryError> {
        self.begin();
        let result = self.flow.set_new_password(new_password, confirmation).await;
        let result = self.finish(result, PASSWORD_CHANGED);
        if result.is_ok() {
            self.schedule_redirect();
        }
        result
    }

    /// "Resend OTP": back to the first step with the email kept.
    pub fn restart(&mut self) -> Result<(), RecoveryError> {
        self.flow.restart()?;
        self.message = None;
        self.error = None;
        Ok(())
    }

    /// Wait for a scheduled redirect to happen. Returns false if none was
    /// scheduled.
    pub async fn wait_for_redirect(&mut self) -> bool {
        match self.redirect.take() {
            Some(handle) => handle.await.is_ok(),
            None => false,
        }
    }

    fn begin(&mut self) {
        self.loading = true;
        self.message = None;
        self.error = None;
    }

    fn finish(
        &mut self,
        result: Result<(), RecoveryError>,
        success: &str,
    ) -> Result<(), RecoveryError> {
        self.loading = false;
        match &result {
            Ok(()) => self.message = Some(success.to_string()),
            Err(e) => self.error = Some(e.to_string()),
        }
        result
    }

    fn schedule_redirect(&mut self) {
        let navigator = self.navigator.clone();
        let delay = self.redirect_delay;
        debug!("Redirecting to login in {:?}", delay);
        self.redirect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(View::Login);
        }));
    }
}

impl Drop for PasswordRecoveryPage {
    fn drop(&mut self) {
        if let Some(handle) = self.redirect.take() {
            handle.abort();
        }
    }
}
