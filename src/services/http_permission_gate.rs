use color_eyre::eyre::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::{Capability, PermissionGate, StaffId, VenueId};

/// Permission gate backed by the platform's permission service. The
/// scheduling core only ever asks yes/no capability questions; evaluating
/// venue roles and grants stays on the other side of this client.
pub struct HttpPermissionGate {
    base_url: String,
    auth_token: Secret<String>,
    http_client: Client,
}

impl HttpPermissionGate {
    pub fn new(
        base_url: String,
        auth_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            base_url,
            auth_token,
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl PermissionGate for HttpPermissionGate {
    #[tracing::instrument(name = "Checking permission remotely", skip_all)]
    async fn check(
        &self,
        actor_id: &StaffId,
        venue_id: &VenueId,
        capability: Capability,
    ) -> Result<bool> {
        let url = format!("{}/permissions/check", self.base_url);

        let body = CheckPermissionRequest {
            actor_id: actor_id.as_ref().to_string(),
            venue_id: venue_id.as_ref().to_string(),
            capability: capability.as_str(),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.auth_token.expose_secret())
            .json(&body)
            .send()
            .await
            .wrap_err("failed to reach the permission service")?
            .error_for_status()
            .wrap_err("permission service returned an error status")?;

        let response: CheckPermissionResponse = response
            .json()
            .await
            .wrap_err("failed to parse permission service response")?;

        Ok(response.allowed)
    }
}

#[derive(Serialize)]
struct CheckPermissionRequest {
    #[serde(rename = "actorId")]
    actor_id: String,
    #[serde(rename = "venueId")]
    venue_id: String,
    capability: &'static str,
}

#[derive(Deserialize)]
struct CheckPermissionResponse {
    allowed: bool,
}
