//! Lead capture and the admin lead listing

mod types;

use pgstay_auth::SessionStore;
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for the `/leads/` endpoints
#[derive(Clone)]
pub struct LeadsClient {
    /// The backend base URL
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Source of the credential for admin calls
    session: SessionStore,
}

impl LeadsClient {
    /// Create a new LeadsClient
    pub(crate) fn new(url: &str, client: Client, session: SessionStore) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
        }
    }

    fn get_url(&self, path: &str) -> String {
        format!("{}/leads{}", self.url, path)
    }

    /// Submit an inquiry. No session needed.
    pub async fn create(&self, lead: &NewLead) -> Result<Lead, Error> {
        let url = self.get_url("/create/");

        let lead = Fetch::post(&self.client, &url)
            .json(lead)?
            .execute::<Lead>()
            .await?;

        Ok(lead)
    }

    /// All leads, newest first. Admin only.
    pub async fn list_all(&self) -> Result<Vec<Lead>, Error> {
        let url = self.get_url("/all/");

        let leads = Fetch::get(&self.client, &url)
            .session_auth(&self.session)?
            .execute::<Vec<Lead>>()
            .await?;

        Ok(leads)
    }
}
