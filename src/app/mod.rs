//! Page models for the portal
//!
//! Each page keeps the state a screen would render (fields, flags, messages)
//! and talks to the backend through the shared clients. Pages never hold their
//! own copy of the session; they read it from the [`SessionStore`](pgstay_auth::SessionStore).

mod admin;
mod dashboard;
mod documents;
mod lead_capture;
mod login;
mod navigation;
mod recovery;
mod registration;

pub use admin::{AdminPanel, AdminTab};
pub use dashboard::Dashboard;
pub use documents::Document;
pub use lead_capture::{BannerKind, LeadCaptureForm, LEAD_ERROR_MESSAGE, LEAD_SUCCESS_MESSAGE};
pub use login::{LoginForm, LOGIN_FAILED};
pub use navigation::{Navigator, Route, View};
pub use recovery::{PasswordRecoveryPage, CODE_SENT, CODE_VERIFIED, PASSWORD_CHANGED};
pub use registration::{RegistrationForm, REGISTRATION_FAILED, TERMS_NOT_ACCEPTED};
