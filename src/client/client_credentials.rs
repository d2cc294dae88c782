//! Contains the [ClientCredentialsFlow].
//!
//! The client credentials flow authenticates the application itself, not a user, so only endpoints that don't access
//! user information are available with its tokens. The tokens cannot be refreshed; request a new one instead.
//!
//! [Spotify documentation on the client credentials flow.](https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow)

use log::debug;
use serde_json::json;

use super::{
    base::ReadWriteClient,
    oauth::{self, AccessToken, Credentials},
    AccountsEndpoints,
};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ClientCredentialsFlow {
    credentials: Credentials,
    endpoints: AccountsEndpoints,
    client: ReadWriteClient,
}

impl ClientCredentialsFlow {
    pub(crate) fn new(credentials: Credentials, endpoints: AccountsEndpoints, client: ReadWriteClient) -> Self {
        Self {
            credentials,
            endpoints,
            client,
        }
    }

    /// Requests an access token for the application. Fails with
    /// [MissingClientSecret](crate::error::Error::MissingClientSecret) before sending anything if the client has no
    /// secret.
    pub async fn request_access_token(&self) -> Result<AccessToken> {
        let authorization = self.credentials.basic_authorization()?;
        debug!("Requesting access token for client credentials flow");

        let form = json!({ "grant_type": "client_credentials" });
        oauth::request_token(&self.client, &self.endpoints.token, form, Some(authorization)).await
    }
}
