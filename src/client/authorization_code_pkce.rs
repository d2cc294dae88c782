//! Contains the [AuthorizationCodePkceFlow], the authorization code flow with the PKCE extension.
//!
//! In case the application's client secret cannot be safely stored in the environment, PKCE may still be used to
//! strongly authenticate the client with Spotify. None of the requests in this flow use the client secret.
//!
//! [Spotify documentation on the authorization code flow with PKCE.](https://developer.spotify.com/documentation/web-api/tutorials/code-pkce-flow)
//!
//! ```no_run
//! # use spotwire::client::{AuthorizeOptions, SpotifyClientBuilder};
//! # use spotwire::scope::Scope;
//! # async fn foo() -> spotwire::error::Result<()> {
//! // build a new Spotify client that doesn't have the application secret
//! let spotify_client = SpotifyClientBuilder::new("application client ID").build()?;
//! let flow = spotify_client.authorization_code_pkce();
//!
//! let authorization = flow.authorization_url(
//!     "http://localhost/callback",
//!     AuthorizeOptions::new().scopes([Scope::UserReadPlaybackState]),
//! );
//!
//! // keep authorization.code_verifier around while the user visits authorization.url, for example in a session
//! # let (code, state) = ("", "");
//! authorization.verify_state(state)?;
//!
//! let token = flow
//!     .exchange_code(code, &authorization.code_verifier, "http://localhost/callback")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};
use serde_json::json;

use super::{
    base::ReadWriteClient,
    oauth::{self, AccessToken, AuthorizeOptions, Credentials, PkceAuthorizationUrl, TokenRefresh},
    AccountsEndpoints,
};
use crate::{
    error::Result,
    pkce::{self, ChallengeDigest, CODE_CHALLENGE_METHOD},
};

/// The authorization code flow with PKCE. Only needs the application's client ID. See the
/// [module-level documentation](self) for more information.
#[derive(Debug, Clone)]
pub struct AuthorizationCodePkceFlow {
    credentials: Credentials,
    endpoints: AccountsEndpoints,
    digest: Arc<dyn ChallengeDigest>,
    client: ReadWriteClient,
}

impl AuthorizationCodePkceFlow {
    pub(crate) fn new(
        credentials: Credentials,
        endpoints: AccountsEndpoints,
        digest: Arc<dyn ChallengeDigest>,
        client: ReadWriteClient,
    ) -> Self {
        Self {
            credentials,
            endpoints,
            digest,
            client,
        }
    }

    /// Generates a fresh code verifier and returns an authorization URL carrying its challenge, along with the state,
    /// the verifier and the challenge.
    pub fn authorization_url(&self, redirect_uri: &str, options: AuthorizeOptions) -> PkceAuthorizationUrl {
        let code_verifier = pkce::code_verifier();
        let code_challenge = pkce::code_challenge_with(self.digest.as_ref(), &code_verifier);

        trace!("Using PKCE extension with challenge: {code_challenge}");

        let (url, state) = oauth::build_authorize_url(
            &self.endpoints.authorize,
            self.credentials.client_id(),
            "code",
            redirect_uri,
            options,
            &[
                ("code_challenge_method", CODE_CHALLENGE_METHOD),
                ("code_challenge", code_challenge.as_str()),
            ],
        );

        debug!("Generated authorization code flow with PKCE URL: {url}");

        PkceAuthorizationUrl {
            url,
            state,
            code_verifier,
            code_challenge,
        }
    }

    /// Exchanges an authorization code for an access token and a refresh token. `code_verifier` is the one from the
    /// [PkceAuthorizationUrl] the user was sent to.
    pub async fn exchange_code(&self, code: &str, code_verifier: &str, redirect_uri: &str) -> Result<AccessToken> {
        debug!("Requesting access and refresh tokens for authorization code flow with PKCE");

        let form = json!({
            "code": code,
            "code_verifier": code_verifier,
            "redirect_uri": redirect_uri,
            "grant_type": "authorization_code",
            "client_id": self.credentials.client_id(),
        });

        oauth::request_token(&self.client, &self.endpoints.token, form, None).await
    }
}

impl crate::private::Sealed for AuthorizationCodePkceFlow {}

#[async_trait]
impl TokenRefresh for AuthorizationCodePkceFlow {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken> {
        debug!("Refreshing authorization code flow with PKCE access token");

        let form = json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
            "client_id": self.credentials.client_id(),
        });

        oauth::request_token(&self.client, &self.endpoints.token, form, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::RequestEngine;

    fn flow() -> AuthorizationCodePkceFlow {
        let engine = Arc::new(RequestEngine::new(reqwest::Client::new(), crate::client::API_BASE_URL, None));

        AuthorizationCodePkceFlow::new(
            Credentials::new("client"),
            AccountsEndpoints::default(),
            Arc::new(pkce::Sha2Digest),
            ReadWriteClient::new(engine),
        )
    }

    #[test]
    fn challenge_matches_verifier() {
        let authorization = flow().authorization_url("http://localhost/callback", AuthorizeOptions::new());

        assert_eq!(authorization.code_verifier.len(), pkce::CODE_VERIFIER_LENGTH);
        assert_eq!(
            authorization.code_challenge,
            pkce::code_challenge_from_verifier(&authorization.code_verifier)
        );
        assert!(authorization
            .url
            .contains(&format!("code_challenge={}", authorization.code_challenge)));
        assert!(authorization.url.contains("code_challenge_method=S256"));
        assert!(authorization.url.contains("response_type=code"));
    }

    #[test]
    fn every_url_gets_a_new_verifier() {
        let flow = flow();
        let first = flow.authorization_url("http://localhost/callback", AuthorizeOptions::new());
        let second = flow.authorization_url("http://localhost/callback", AuthorizeOptions::new());

        assert_ne!(first.code_verifier, second.code_verifier);
        assert_ne!(first.state, second.state);
    }
}
