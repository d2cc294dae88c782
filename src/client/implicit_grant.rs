//! Contains the [ImplicitGrantFlow].
//!
//! # Note
//!
//! The implicit grant flow is not recommended for use. The access token is returned in the callback URL instead of
//! through a trusted channel, and the token cannot be refreshed. In an environment where the application's client
//! secret cannot be safely stored, use the [AuthorizationCodePkceFlow](crate::client::AuthorizationCodePkceFlow)
//! instead.
//!
//! # Usage
//!
//! ```no_run
//! # use spotwire::client::{AuthorizeOptions, SpotifyClientBuilder};
//! # use spotwire::scope::Scope;
//! # fn foo() -> spotwire::error::Result<()> {
//! let spotify_client = SpotifyClientBuilder::new("application client ID").build()?;
//! let flow = spotify_client.implicit_grant();
//!
//! let authorization = flow.authorization_url(
//!     "http://localhost/callback",
//!     AuthorizeOptions::new().scopes([Scope::UserReadPlaybackState]),
//! );
//!
//! // direct the user to authorization.url. when they accept, they are redirected to the callback URL with the access
//! // token in the URL fragment (the part after `#`)
//! # let fragment = "";
//! let token = flow.parse_callback_fragment(fragment, &authorization.state)?;
//! spotify_client.set_bearer_token(token.access_token);
//! # Ok(())
//! # }
//! ```

use log::debug;
use serde::Deserialize;

use super::{
    oauth::{self, AuthorizationUrl, AuthorizeOptions, Credentials},
    AccountsEndpoints,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ImplicitGrantFlow {
    credentials: Credentials,
    endpoints: AccountsEndpoints,
}

/// The access token returned in an implicit grant redirect fragment.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ImplicitGrantToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallbackError {
    error: String,
}

impl ImplicitGrantFlow {
    pub(crate) fn new(credentials: Credentials, endpoints: AccountsEndpoints) -> Self {
        Self {
            credentials,
            endpoints,
        }
    }

    /// Returns an authorization URL the user should be directed to, and the state it was generated with. No request is
    /// made; the token arrives directly in the redirect.
    pub fn authorization_url(&self, redirect_uri: &str, options: AuthorizeOptions) -> AuthorizationUrl {
        let (url, state) = oauth::build_authorize_url(
            &self.endpoints.authorize,
            self.credentials.client_id(),
            "token",
            redirect_uri,
            options,
            &[],
        );

        debug!("Generated implicit grant flow URL: {url}");
        AuthorizationUrl { url, state }
    }

    /// Parses the fragment of the URL the user was redirected to, with or without the leading `#`, and checks its
    /// state against the expected one.
    pub fn parse_callback_fragment(&self, fragment: &str, expected_state: &str) -> Result<ImplicitGrantToken> {
        let fragment = fragment.trim_start_matches('#');

        if let Ok(CallbackError { error }) = serde_urlencoded::from_str::<CallbackError>(fragment) {
            return Err(Error::InvalidCallback(format!("authorization was denied: {error}")));
        }

        let token: ImplicitGrantToken =
            serde_urlencoded::from_str(fragment).map_err(|err| Error::InvalidCallback(err.to_string()))?;

        oauth::verify_state(expected_state, token.state.as_deref().unwrap_or_default())?;
        Ok(token)
    }
}

impl std::fmt::Debug for ImplicitGrantToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplicitGrantToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    fn flow() -> ImplicitGrantFlow {
        ImplicitGrantFlow::new(Credentials::new("client"), AccountsEndpoints::default())
    }

    #[test]
    fn authorization_url() {
        let authorization = flow().authorization_url(
            "http://localhost/callback",
            AuthorizeOptions::new()
                .scopes([Scope::UserReadEmail, Scope::UserReadPrivate])
                .show_dialog(true),
        );

        assert!(authorization.url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(authorization.url.contains("response_type=token"));
        assert!(authorization.url.contains("client_id=client"));
        assert!(authorization.url.contains("scope=user-read-email%20user-read-private"));
        assert!(authorization.url.contains("show_dialog=true"));
        assert!(authorization.url.contains(&format!("state={}", authorization.state)));
    }

    #[test]
    fn parse_fragment() {
        let token = flow()
            .parse_callback_fragment(
                "#access_token=NwAExz&token_type=Bearer&expires_in=3600&state=123",
                "123",
            )
            .unwrap();

        assert_eq!(token.access_token, "NwAExz");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn parse_fragment_state_mismatch() {
        let result = flow().parse_callback_fragment(
            "access_token=NwAExz&token_type=Bearer&expires_in=3600&state=123",
            "456",
        );

        assert!(matches!(result, Err(Error::StateMismatch)));
    }

    #[test]
    fn parse_fragment_denied() {
        let result = flow().parse_callback_fragment("error=access_denied&state=123", "123");

        match result {
            Err(Error::InvalidCallback(message)) => assert!(message.contains("access_denied")),
            other => panic!("expected invalid callback, got {other:?}"),
        }
    }

    #[test]
    fn parse_fragment_garbage() {
        let result = flow().parse_callback_fragment("hello", "123");
        assert!(matches!(result, Err(Error::InvalidCallback(_))));
    }
}
