//! Admin listing of registered residents

use pgstay_auth::{Resident, SessionStore};
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;

/// Client for the admin `/users/all/` endpoint
#[derive(Clone)]
pub struct ResidentsClient {
    url: String,
    client: Client,
    session: SessionStore,
}

impl ResidentsClient {
    pub(crate) fn new(url: &str, client: Client, session: SessionStore) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
        }
    }

    /// Every registered resident. Admin only.
    pub async fn list_all(&self) -> Result<Vec<Resident>, Error> {
        let url = format!("{}/users/all/", self.url);

        let residents = Fetch::get(&self.client, &url)
            .session_auth(&self.session)?
            .execute::<Vec<Resident>>()
            .await?;

        Ok(residents)
    }
}
