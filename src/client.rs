//! Contains the [SpotifyClient], its [builder](SpotifyClientBuilder), the OAuth2 grant flows and the endpoint wrappers.
//!
//! A [SpotifyClient] owns exactly one [request engine](request::RequestEngine), which holds the bearer token attached
//! to every API request. Everything handed out by the client (the grant flows, the endpoint wrappers and
//! [api](SpotifyClient::api)) shares that engine. Two separately built clients never share a token.
//!
//! # Usage
//!
//! ```no_run
//! # use spotwire::client::SpotifyClientBuilder;
//! # async fn foo() -> spotwire::error::Result<()> {
//! let spotify_client = SpotifyClientBuilder::new("application client ID")
//!     .client_secret("application client secret")
//!     .build()?;
//!
//! let token = spotify_client.client_credentials().request_access_token().await?;
//! spotify_client.set_bearer_token(token.access_token);
//!
//! let track: serde_json::Value = spotify_client.tracks().get("3mRM4NM8iO7UBqrSigCQFH", None).await?;
//! # Ok(())
//! # }
//! ```

pub mod authorization_code;
pub mod authorization_code_pkce;
pub mod base;
pub mod client_credentials;
pub mod endpoints;
pub mod implicit_grant;
pub mod oauth;
pub mod request;

pub use self::{
    authorization_code::AuthorizationCodeFlow,
    authorization_code_pkce::AuthorizationCodePkceFlow,
    base::{ReadOnlyClient, ReadWriteClient, RequestOptions},
    client_credentials::ClientCredentialsFlow,
    endpoints::{
        Albums, Artists, Browse, Episodes, FollowType, PageParams, Player, Playlists, RepeatState, Search,
        SearchBuilder, Shows, TimeRange, TopItemType, Tracks, Users,
    },
    implicit_grant::{ImplicitGrantFlow, ImplicitGrantToken},
    oauth::{AccessToken, AuthorizationUrl, AuthorizeOptions, Credentials, PkceAuthorizationUrl, TokenRefresh},
    request::{ApiResponse, RequestDescriptor, RequestEngine},
};

use std::sync::{Arc, OnceLock};

use const_format::concatcp;
use log::{debug, warn};

use crate::{
    error::{Error, Result},
    pkce::{ChallengeDigest, Sha2Digest},
};

pub const API_BASE_URL: &str = "https://api.spotify.com/v1";

pub const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
pub const ACCOUNTS_AUTHORIZE_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "/authorize");
pub const ACCOUNTS_API_TOKEN_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "/api/token");

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The accounts service endpoints the grant flows talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AccountsEndpoints {
    pub(crate) authorize: String,
    pub(crate) token: String,
}

/// The Spotify client façade. Build one with [SpotifyClientBuilder].
///
/// The grant flows are available right away; the endpoint wrappers are constructed on first access and the same
/// instance is returned afterwards.
#[derive(Debug)]
pub struct SpotifyClient {
    credentials: Credentials,
    engine: Arc<RequestEngine>,

    authorization_code: AuthorizationCodeFlow,
    authorization_code_pkce: AuthorizationCodePkceFlow,
    client_credentials: ClientCredentialsFlow,
    implicit_grant: ImplicitGrantFlow,

    albums: OnceLock<Albums>,
    artists: OnceLock<Artists>,
    browse: OnceLock<Browse>,
    episodes: OnceLock<Episodes>,
    player: OnceLock<Player>,
    playlists: OnceLock<Playlists>,
    search: OnceLock<Search>,
    shows: OnceLock<Shows>,
    tracks: OnceLock<Tracks>,
    users: OnceLock<Users>,
}

/// Builder for [SpotifyClient].
#[derive(Debug, Clone)]
pub struct SpotifyClientBuilder {
    client_id: String,
    client_secret: Option<String>,
    bearer_token: Option<String>,
    http_client: Option<reqwest::Client>,
    user_agent: Option<String>,
    api_base_url: String,
    accounts_base_url: String,
    challenge_digest: Arc<dyn ChallengeDigest>,
}

impl AccountsEndpoints {
    pub(crate) fn from_base_url(accounts_base_url: &str) -> Self {
        let base = accounts_base_url.trim_end_matches('/');

        Self {
            authorize: format!("{base}/authorize"),
            token: format!("{base}/api/token"),
        }
    }
}

impl Default for AccountsEndpoints {
    fn default() -> Self {
        Self {
            authorize: ACCOUNTS_AUTHORIZE_ENDPOINT.to_owned(),
            token: ACCOUNTS_API_TOKEN_ENDPOINT.to_owned(),
        }
    }
}

impl SpotifyClientBuilder {
    pub fn new<S>(client_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            bearer_token: None,
            http_client: None,
            user_agent: None,
            api_base_url: API_BASE_URL.to_owned(),
            accounts_base_url: ACCOUNTS_BASE_URL.to_owned(),
            challenge_digest: Arc::new(Sha2Digest),
        }
    }

    /// The application's client secret. Required by the [authorization code](AuthorizationCodeFlow) and
    /// [client credentials](ClientCredentialsFlow) flows.
    pub fn client_secret<S>(self, client_secret: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_secret: Some(client_secret.into()),
            ..self
        }
    }

    /// An access token to use from the start, for example one persisted from an earlier session.
    pub fn bearer_token<S>(self, bearer_token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            bearer_token: Some(bearer_token.into()),
            ..self
        }
    }

    /// Use an existing HTTP client instead of building a new one. [user_agent](SpotifyClientBuilder::user_agent) has
    /// no effect if this is set.
    pub fn http_client(self, http_client: reqwest::Client) -> Self {
        Self {
            http_client: Some(http_client),
            ..self
        }
    }

    pub fn user_agent<S>(self, user_agent: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            user_agent: Some(user_agent.into()),
            ..self
        }
    }

    /// Override the API base URL. Mostly useful for testing against a local server.
    pub fn api_base_url<S>(self, api_base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            api_base_url: api_base_url.into(),
            ..self
        }
    }

    /// Override the accounts service base URL the authorize and token endpoints are derived from.
    pub fn accounts_base_url<S>(self, accounts_base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            accounts_base_url: accounts_base_url.into(),
            ..self
        }
    }

    /// Use a custom SHA-256 implementation for PKCE code challenges.
    pub fn challenge_digest<D>(self, challenge_digest: D) -> Self
    where
        D: ChallengeDigest + 'static,
    {
        Self {
            challenge_digest: Arc::new(challenge_digest),
            ..self
        }
    }

    pub fn build(self) -> Result<SpotifyClient> {
        let http_client = match self.http_client {
            Some(http_client) => {
                if self.user_agent.is_some() {
                    warn!("Custom HTTP client given, ignoring the configured user agent");
                }

                http_client
            }

            None => reqwest::Client::builder()
                .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
                .build()
                .map_err(|err| Error::unexpected(&self.api_base_url, format!("failed to build HTTP client: {err}")))?,
        };

        let credentials = match self.client_secret {
            Some(client_secret) => Credentials::with_secret(self.client_id, client_secret),
            None => Credentials::new(self.client_id),
        };

        debug!(
            "Building Spotify client with API base URL {} and accounts base URL {}",
            self.api_base_url, self.accounts_base_url
        );

        let engine = Arc::new(RequestEngine::new(http_client, self.api_base_url, self.bearer_token));
        let endpoints = AccountsEndpoints::from_base_url(&self.accounts_base_url);
        let client = ReadWriteClient::new(Arc::clone(&engine));

        Ok(SpotifyClient {
            authorization_code: AuthorizationCodeFlow::new(credentials.clone(), endpoints.clone(), client.clone()),
            authorization_code_pkce: AuthorizationCodePkceFlow::new(
                credentials.clone(),
                endpoints.clone(),
                self.challenge_digest,
                client.clone(),
            ),
            client_credentials: ClientCredentialsFlow::new(credentials.clone(), endpoints.clone(), client),
            implicit_grant: ImplicitGrantFlow::new(credentials.clone(), endpoints),

            credentials,
            engine,

            albums: OnceLock::new(),
            artists: OnceLock::new(),
            browse: OnceLock::new(),
            episodes: OnceLock::new(),
            player: OnceLock::new(),
            playlists: OnceLock::new(),
            search: OnceLock::new(),
            shows: OnceLock::new(),
            tracks: OnceLock::new(),
            users: OnceLock::new(),
        })
    }
}

impl SpotifyClient {
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sets the bearer token attached to every subsequent API request made through this client.
    pub fn set_bearer_token<S>(&self, token: S)
    where
        S: Into<String>,
    {
        self.engine.set_bearer_token(token);
    }

    pub fn clear_bearer_token(&self) {
        self.engine.clear_bearer_token();
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.engine.bearer_token()
    }

    pub fn authorization_code(&self) -> &AuthorizationCodeFlow {
        &self.authorization_code
    }

    pub fn authorization_code_pkce(&self) -> &AuthorizationCodePkceFlow {
        &self.authorization_code_pkce
    }

    pub fn client_credentials(&self) -> &ClientCredentialsFlow {
        &self.client_credentials
    }

    pub fn implicit_grant(&self) -> &ImplicitGrantFlow {
        &self.implicit_grant
    }

    /// The raw `get`/`post`/`put`/`delete` primitives, for endpoints without a wrapper.
    pub fn api(&self) -> ReadWriteClient {
        ReadWriteClient::new(Arc::clone(&self.engine))
    }

    pub fn albums(&self) -> &Albums {
        self.albums.get_or_init(|| Albums::new(self.api()))
    }

    pub fn artists(&self) -> &Artists {
        self.artists.get_or_init(|| Artists::new(self.api()))
    }

    pub fn browse(&self) -> &Browse {
        self.browse.get_or_init(|| Browse::new(self.api()))
    }

    pub fn episodes(&self) -> &Episodes {
        self.episodes.get_or_init(|| Episodes::new(self.api()))
    }

    pub fn player(&self) -> &Player {
        self.player.get_or_init(|| Player::new(self.api()))
    }

    pub fn playlists(&self) -> &Playlists {
        self.playlists.get_or_init(|| Playlists::new(self.api()))
    }

    pub fn search(&self) -> &Search {
        self.search.get_or_init(|| Search::new(self.api()))
    }

    pub fn shows(&self) -> &Shows {
        self.shows.get_or_init(|| Shows::new(self.api()))
    }

    pub fn tracks(&self) -> &Tracks {
        self.tracks.get_or_init(|| Tracks::new(self.api()))
    }

    pub fn users(&self) -> &Users {
        self.users.get_or_init(|| Users::new(self.api()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_endpoints_from_base_url() {
        assert_eq!(AccountsEndpoints::from_base_url(ACCOUNTS_BASE_URL), AccountsEndpoints::default());
        assert_eq!(
            AccountsEndpoints::from_base_url("http://127.0.0.1:8080/"),
            AccountsEndpoints {
                authorize: "http://127.0.0.1:8080/authorize".to_owned(),
                token: "http://127.0.0.1:8080/api/token".to_owned(),
            }
        );
    }

    #[test]
    fn endpoint_wrappers_are_memoized() {
        let client = SpotifyClientBuilder::new("client").build().unwrap();

        assert!(std::ptr::eq(client.albums(), client.albums()));
        assert!(std::ptr::eq(client.search(), client.search()));
        assert!(std::ptr::eq(client.player(), client.player()));
    }

    #[test]
    fn wrappers_share_the_bearer_token() {
        let client = SpotifyClientBuilder::new("client").bearer_token("first").build().unwrap();
        let api = client.api();

        assert_eq!(api.engine().bearer_token().as_deref(), Some("first"));

        client.set_bearer_token("second");
        assert_eq!(api.engine().bearer_token().as_deref(), Some("second"));

        client.clear_bearer_token();
        assert_eq!(client.bearer_token(), None);
    }

    #[test]
    fn separate_clients_have_separate_tokens() {
        let first = SpotifyClientBuilder::new("client").build().unwrap();
        let second = SpotifyClientBuilder::new("client").build().unwrap();

        first.set_bearer_token("token");

        assert_eq!(first.bearer_token().as_deref(), Some("token"));
        assert_eq!(second.bearer_token(), None);
    }

    #[test]
    fn client_secret_is_optional() {
        let without = SpotifyClientBuilder::new("client").build().unwrap();
        let with = SpotifyClientBuilder::new("client").client_secret("secret").build().unwrap();

        assert!(!without.credentials().has_secret());
        assert_eq!(with.credentials().client_secret(), Some("secret"));
    }
}
