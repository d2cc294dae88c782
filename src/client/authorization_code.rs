//! Contains the [AuthorizationCodeFlow].
//!
//! [Spotify documentation on the authorization code flow.](https://developer.spotify.com/documentation/web-api/tutorials/code-flow)
//!
//! # Usage
//!
//! ```no_run
//! # use spotwire::client::{AuthorizeOptions, SpotifyClientBuilder};
//! # use spotwire::scope::Scope;
//! # async fn foo() -> spotwire::error::Result<()> {
//! // build a new Spotify client that has the application secret
//! let spotify_client = SpotifyClientBuilder::new("application client ID")
//!     .client_secret("application client secret")
//!     .build()?;
//!
//! let flow = spotify_client.authorization_code();
//!
//! // generate an authorization URL for the user. this URL takes the user to a Spotify page where they are prompted to
//! // give the application access to their account and all the scopes specified here. the callback URL here should
//! // match one of the callback URLs specified in your Spotify application
//! let authorization = flow.authorization_url(
//!     "http://localhost/callback",
//!     AuthorizeOptions::new()
//!         .scopes([Scope::UserReadPlaybackState])
//!         .show_dialog(true),
//! );
//!
//! // the user should now be directed to authorization.url in some manner. when they accept, they are redirected to
//! // the callback URL, which will contain an authorization code (`code`) and a state (`state`) in the query
//! # let (code, state) = ("", "");
//! authorization.verify_state(state)?;
//!
//! let token = flow.exchange_code(code, "http://localhost/callback").await?;
//! spotify_client.set_bearer_token(&token.access_token);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use log::debug;
use serde_json::json;

use super::{
    base::ReadWriteClient,
    oauth::{self, AccessToken, AuthorizationUrl, AuthorizeOptions, Credentials, TokenRefresh},
    AccountsEndpoints,
};
use crate::error::Result;

/// The authorization code flow. Requires the application's client secret for every token request; see
/// [AuthorizationCodePkceFlow](crate::client::AuthorizationCodePkceFlow) for when the secret cannot be stored safely.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone)]
pub struct AuthorizationCodeFlow {
    credentials: Credentials,
    endpoints: AccountsEndpoints,
    client: ReadWriteClient,
}

impl AuthorizationCodeFlow {
    pub(crate) fn new(credentials: Credentials, endpoints: AccountsEndpoints, client: ReadWriteClient) -> Self {
        Self {
            credentials,
            endpoints,
            client,
        }
    }

    /// Returns an authorization URL the user should be directed to, and the state it was generated with.
    ///
    /// Once the user approves the application, they are redirected back to `redirect_uri` with `code` and `state`
    /// query parameters.
    pub fn authorization_url(&self, redirect_uri: &str, options: AuthorizeOptions) -> AuthorizationUrl {
        let (url, state) = oauth::build_authorize_url(
            &self.endpoints.authorize,
            self.credentials.client_id(),
            "code",
            redirect_uri,
            options,
            &[],
        );

        debug!("Generated authorization code flow URL: {url}");
        AuthorizationUrl { url, state }
    }

    /// Exchanges an authorization code from the redirect callback for an access token and a refresh token.
    ///
    /// `redirect_uri` must be the same one the authorization URL was generated with. Fails with
    /// [MissingClientSecret](crate::error::Error::MissingClientSecret) before sending anything if the client has no
    /// secret.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<AccessToken> {
        let authorization = self.credentials.basic_authorization()?;
        debug!("Requesting access and refresh tokens for authorization code flow");

        let form = json!({
            "code": code,
            "redirect_uri": redirect_uri,
            "grant_type": "authorization_code",
        });

        oauth::request_token(&self.client, &self.endpoints.token, form, Some(authorization)).await
    }
}

impl crate::private::Sealed for AuthorizationCodeFlow {}

#[async_trait]
impl TokenRefresh for AuthorizationCodeFlow {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken> {
        let authorization = self.credentials.basic_authorization()?;
        debug!("Refreshing authorization code flow access token");

        let form = json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        });

        oauth::request_token(&self.client, &self.endpoints.token, form, Some(authorization)).await
    }
}
