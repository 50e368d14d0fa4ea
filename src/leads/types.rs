//! Types for lead capture

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inquiry submitted from the landing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewLead {
    pub name: String,
    pub mobile: String,
}

impl NewLead {
    pub fn new(name: &str, mobile: &str) -> Self {
        Self {
            name: name.to_string(),
            mobile: mobile.to_string(),
        }
    }
}

/// A stored lead, newest first in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}
