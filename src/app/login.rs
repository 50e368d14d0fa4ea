//! Email and password sign-in

use log::warn;
use pgstay_auth::{AuthClient, Resident};

use crate::app::navigation::{Navigator, View};
use crate::error::Error;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

pub struct LoginForm {
    auth: AuthClient,
    navigator: Navigator,
    pub email: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn new(auth: AuthClient, navigator: Navigator) -> Self {
        Self {
            auth,
            navigator,
            email: String::new(),
            password: String::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self) -> Result<Resident, Error> {
        self.submitting = true;
        self.error = None;
        let result = self.auth.login(self.email.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(resident) => {
                self.password.clear();
                self.navigator.navigate(View::Dashboard);
                Ok(resident)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                self.error = Some(e.user_message(LOGIN_FAILED));
                Err(e.into())
            }
        }
    }
}
