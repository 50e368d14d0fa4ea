//! Landing page inquiry form

use std::time::Duration;

use log::warn;
use tokio::time::Instant;

use crate::error::Error;
use crate::leads::{Lead, LeadsClient, NewLead};

pub const LEAD_SUCCESS_MESSAGE: &str = "Thank you! We will contact you soon.";
pub const LEAD_ERROR_MESSAGE: &str = "Error! Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn message(&self) -> &'static str {
        match self {
            BannerKind::Success => LEAD_SUCCESS_MESSAGE,
            BannerKind::Error => LEAD_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Banner {
    kind: BannerKind,
    shown_at: Instant,
}

/// Name and mobile form with an outcome banner
///
/// Fields are cleared only after a successful submission. The banner hides
/// itself once `banner_timeout` has passed, whatever the outcome.
pub struct LeadCaptureForm {
    client: LeadsClient,
    pub name: String,
    pub mobile: String,
    banner: Option<Banner>,
    banner_timeout: Duration,
    submitting: bool,
}

impl LeadCaptureForm {
    pub fn new(client: LeadsClient, banner_timeout: Duration) -> Self {
        Self {
            client,
            name: String::new(),
            mobile: String::new(),
            banner: None,
            banner_timeout,
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The banner currently on screen, if it has not timed out.
    pub fn banner(&self) -> Option<BannerKind> {
        self.banner
            .filter(|banner| banner.shown_at.elapsed() < self.banner_timeout)
            .map(|banner| banner.kind)
    }

    /// Checks made before anything is sent: a name, and a 10-digit mobile.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Please enter your name"));
        }
        if !is_mobile_number(self.mobile.trim()) {
            return Err(Error::validation("Please enter a 10-digit mobile number"));
        }
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<Lead, Error> {
        if let Err(e) = self.validate() {
            self.show_banner(BannerKind::Error);
            return Err(e);
        }

        self.submitting = true;
        self.banner = None;

        let lead = NewLead::new(self.name.trim(), self.mobile.trim());
        let result = self.client.create(&lead).await;

        let kind = match &result {
            Ok(_) => {
                self.name.clear();
                self.mobile.clear();
                BannerKind::Success
            }
            Err(e) => {
                warn!("Lead submission failed: {}", e);
                BannerKind::Error
            }
        };
        self.show_banner(kind);
        self.submitting = false;

        result
    }

    fn show_banner(&mut self, kind: BannerKind) {
        self.banner = Some(Banner {
            kind,
            shown_at: Instant::now(),
        });
    }
}

fn is_mobile_number(value: &str) -> bool {
    value.len() == 10 && value.chars().all(|c| c.is_ascii_digit())
}
