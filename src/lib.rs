//! An asynchronous client for the Spotify Web API.
//!
//! The [SpotifyClient](client::SpotifyClient) façade holds the application's credentials and a single request engine
//! that every API request goes through. It exposes the four OAuth2 grant flows and wrappers for the API's endpoints:
//!
//! - [client credentials](client::ClientCredentialsFlow): application-only access, requires the client secret
//! - [authorization code](client::AuthorizationCodeFlow): user access with a refresh token, requires the client secret
//! - [authorization code with PKCE](client::AuthorizationCodePkceFlow): user access with a refresh token, client ID
//!   only
//! - [implicit grant](client::ImplicitGrantFlow): user access without a refresh token, client ID only
//!
//! The grant flows return [access tokens](client::AccessToken); the library doesn't store or refresh them on its own.
//! Hand the access token to the client with [set_bearer_token](client::SpotifyClient::set_bearer_token) and it's
//! attached to every request from then on.
//!
//! ```no_run
//! use spotwire::client::SpotifyClientBuilder;
//!
//! # async fn foo() -> spotwire::error::Result<()> {
//! let spotify_client = SpotifyClientBuilder::new("application client ID")
//!     .client_secret("application client secret")
//!     .build()?;
//!
//! let token = spotify_client.client_credentials().request_access_token().await?;
//! spotify_client.set_bearer_token(token.access_token);
//!
//! let releases: serde_json::Value = spotify_client
//!     .browse()
//!     .new_releases(Default::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Failed requests return an [Error](error::Error): [API errors](error::ApiError) for non-2xx responses,
//! [network errors](error::NetworkError) when no response was received at all, and precondition errors like a
//! missing client secret before anything is sent.
//!
//! # Crate features
//!
//! - `native-tls` (default): use the platform's native TLS implementation.
//! - `rustls-tls`: use rustls instead.

pub mod client;
pub mod encoding;
pub mod error;
pub mod model;
pub mod pkce;
pub mod scope;

mod private {
    pub trait Sealed {}
}

/// Re-exports of the types most programs need.
pub mod prelude {
    pub use crate::client::{
        AccessToken, AuthorizeOptions, PageParams, ReadOnlyClient, ReadWriteClient, SpotifyClient, SpotifyClientBuilder,
        TokenRefresh,
    };
    pub use crate::error::{Error, Result};
    pub use crate::model::{page::Page, ItemType};
    pub use crate::scope::Scope;
}

pub use crate::client::{SpotifyClient, SpotifyClientBuilder};
