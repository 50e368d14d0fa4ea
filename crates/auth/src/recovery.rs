//! Three-step password recovery
//!
//! ```text
//! AwaitingCode --request_code--> AwaitingVerification --verify_code--> AwaitingNewPassword
//!      ^                               |                                   |
//!      +------------restart------------+-----------------------------------+
//!                                                        set_new_password -> Completed
//! ```
//!
//! A step advances only when the backend acknowledges it. Failed calls leave the
//! state untouched. Nothing is retried.

use log::debug;
use thiserror::Error;

use crate::types::ResetConfirmation;
use crate::AuthClient;

pub const OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 6;

const SEND_CODE_FAILED: &str = "Failed to send OTP. Please try again.";
const INVALID_CODE: &str = "Invalid OTP";
const RESET_FAILED: &str = "Failed to reset password";

/// Where a recovery attempt currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryState {
    /// Waiting for the email to mail a code to. Keeps the email typed before a
    /// restart.
    AwaitingCode { email: Option<String> },
    /// A code was mailed to `email`
    AwaitingVerification { email: String },
    /// `code` was accepted for `email`
    AwaitingNewPassword { email: String, code: String },
    Completed { email: String },
}

impl RecoveryState {
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryState::AwaitingCode { .. } => "awaiting code",
            RecoveryState::AwaitingVerification { .. } => "awaiting verification",
            RecoveryState::AwaitingNewPassword { .. } => "awaiting new password",
            RecoveryState::Completed { .. } => "completed",
        }
    }

    /// 1-based position for progress display; `Completed` reports 4.
    pub fn step_number(&self) -> u8 {
        match self {
            RecoveryState::AwaitingCode { .. } => 1,
            RecoveryState::AwaitingVerification { .. } => 2,
            RecoveryState::AwaitingNewPassword { .. } => 3,
            RecoveryState::Completed { .. } => 4,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            RecoveryState::AwaitingCode { email } => email.as_deref(),
            RecoveryState::AwaitingVerification { email }
            | RecoveryState::AwaitingNewPassword { email, .. }
            | RecoveryState::Completed { email } => Some(email),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RecoveryState::Completed { .. })
    }
}

impl Default for RecoveryState {
    fn default() -> Self {
        RecoveryState::AwaitingCode { email: None }
    }
}

/// Why a recovery action did not advance the flow
///
/// The `Display` text is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter the 6-digit OTP")]
    IncompleteCode,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Cannot {action} while {state}")]
    WrongStep {
        action: &'static str,
        state: &'static str,
    },

    /// The backend refused, or could not be reached
    #[error("{0}")]
    Rejected(String),
}

impl RecoveryError {
    /// True for errors detected before any request was made
    pub fn is_local(&self) -> bool {
        !matches!(self, RecoveryError::Rejected(_))
    }
}

/// Keep digits only, at most [`OTP_LENGTH`] of them.
pub fn sanitize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(OTP_LENGTH)
        .collect()
}

/// Local checks run before a new password is sent anywhere.
pub fn validate_new_password(new_password: &str, confirmation: &str) -> Result<(), RecoveryError> {
    if new_password != confirmation {
        return Err(RecoveryError::PasswordMismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RecoveryError::PasswordTooShort);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<String, RecoveryError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(RecoveryError::InvalidEmail),
    }
}

/// A single recovery attempt. Not persisted anywhere.
pub struct RecoveryFlow {
    client: AuthClient,
    state: RecoveryState,
}

impl RecoveryFlow {
    pub fn new(client: AuthClient) -> Self {
        Self {
            client,
            state: RecoveryState::default(),
        }
    }

    pub fn state(&self) -> &RecoveryState {
        &self.state
    }

    fn wrong_step(&self, action: &'static str) -> RecoveryError {
        RecoveryError::WrongStep {
            action,
            state: self.state.name(),
        }
    }

    /// Mail a one-time code to `email`.
    pub async fn request_code(&mut self, email: &str) -> Result<(), RecoveryError> {
        if !matches!(self.state, RecoveryState::AwaitingCode { .. }) {
            return Err(self.wrong_step("request a code"));
        }
        let email = validate_email(email)?;

        match self.client.request_password_reset(&email).await {
            Ok(()) => {
                self.state = RecoveryState::AwaitingVerification { email };
                Ok(())
            }
            Err(e) => {
                debug!("Password reset request failed: {}", e);
                Err(RecoveryError::Rejected(SEND_CODE_FAILED.to_string()))
            }
        }
    }

    /// Check the code the user typed. Non-digits are dropped first.
    pub async fn verify_code(&mut self, raw_code: &str) -> Result<(), RecoveryError> {
        let email = match &self.state {
            RecoveryState::AwaitingVerification { email } => email.clone(),
            _ => return Err(self.wrong_step("verify a code")),
        };
        let code = sanitize_code(raw_code);
        if code.len() != OTP_LENGTH {
            return Err(RecoveryError::IncompleteCode);
        }

        match self.client.verify_otp(&email, &code).await {
            Ok(()) => {
                self.state = RecoveryState::AwaitingNewPassword { email, code };
                Ok(())
            }
            Err(e) => {
                debug!("OTP verification failed: {}", e);
                Err(RecoveryError::Rejected(e.user_message(INVALID_CODE)))
            }
        }
    }

    /// Set the new password for the verified email.
    pub async fn set_new_password(
        &mut self,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), RecoveryError> {
        let (email, code) = match &self.state {
            RecoveryState::AwaitingNewPassword { email, code } => (email.clone(), code.clone()),
            _ => return Err(self.wrong_step("set a new password")),
        };
        validate_new_password(new_password, confirmation)?;

        let confirmation = ResetConfirmation::Otp {
            email: email.clone(),
            otp: code,
        };
        match self
            .client
            .confirm_password_reset(&confirmation, new_password)
            .await
        {
            Ok(()) => {
                self.state = RecoveryState::Completed { email };
                Ok(())
            }
            Err(e) => {
                debug!("Password reset confirmation failed: {}", e);
                Err(RecoveryError::Rejected(e.user_message(RESET_FAILED)))
            }
        }
    }

    /// Go back to the first step, dropping any verified code. A new code has
    /// to be requested explicitly.
    pub fn restart(&mut self) -> Result<(), RecoveryError> {
        let email = match &self.state {
            RecoveryState::AwaitingCode { .. } => return Ok(()),
            RecoveryState::AwaitingVerification { email }
            | RecoveryState::AwaitingNewPassword { email, .. } => email.clone(),
            RecoveryState::Completed { .. } => return Err(self.wrong_step("restart")),
        };
        self.state = RecoveryState::AwaitingCode { email: Some(email) };
        Ok(())
    }
}

/// Complete a reset from an emailed `uid`/`token` link.
pub async fn reset_with_link(
    client: &AuthClient,
    uid: &str,
    token: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<(), RecoveryError> {
    validate_new_password(new_password, confirmation)?;

    let link = ResetConfirmation::Link {
        uid: uid.to_string(),
        token: token.to_string(),
    };
    client
        .confirm_password_reset(&link, new_password)
        .await
        .map_err(|e| {
            debug!("Link reset failed: {}", e);
            RecoveryError::Rejected(e.user_message(RESET_FAILED))
        })
}
