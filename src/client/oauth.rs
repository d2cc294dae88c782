//! Types shared by the OAuth2 grant flows.
//!
//! [Spotify documentation on authorization.](https://developer.spotify.com/documentation/web-api/concepts/authorization)

use async_trait::async_trait;
use log::debug;
use reqwest::header::{self, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{
    base::{ReadWriteClient, RequestOptions},
    request::CONTENT_TYPE_FORM,
};
use crate::{
    encoding::{base64_encode, QueryParams},
    error::{Error, Result},
    pkce,
    scope::ToScopesString,
};

/// The application's credentials. Immutable once the client is built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: Option<String>,
}

/// An access token from the token endpoint, as returned by every grant flow's token and refresh calls.
///
/// The library doesn't store or track these; keep the refresh token somewhere if you need to refresh later.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Optional parameters for an authorization URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorizeOptions {
    scope: Option<String>,
    state: Option<String>,
    show_dialog: bool,
}

/// An authorization URL along with the state it was generated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationUrl {
    pub url: String,
    pub state: String,
}

/// An authorization URL for the PKCE flow.
///
/// The code verifier has to be kept until the user is redirected back, since it's needed to
/// [exchange the code](crate::client::AuthorizationCodePkceFlow::exchange_code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceAuthorizationUrl {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
    pub code_challenge: String,
}

/// Grant flows that can refresh an access token with a refresh token.
///
/// These are [AuthorizationCodeFlow](crate::client::AuthorizationCodeFlow) and
/// [AuthorizationCodePkceFlow](crate::client::AuthorizationCodePkceFlow). The client credentials flow is simply
/// invoked again, and the implicit grant flow cannot refresh at all.
#[async_trait]
pub trait TokenRefresh: crate::private::Sealed {
    /// Requests a new access token with a refresh token. Spotify may or may not rotate the refresh token; if the
    /// returned token has none, keep using the old one.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken>;
}

impl Credentials {
    pub fn new<S>(client_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: None,
        }
    }

    pub fn with_secret<I, S>(client_id: I, client_secret: S) -> Self
    where
        I: Into<String>,
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: Some(client_secret.into()),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn has_secret(&self) -> bool {
        self.client_secret.is_some()
    }

    /// `Basic base64(client_id:client_secret)`, or [Error::MissingClientSecret] if there's no secret.
    pub(crate) fn basic_authorization(&self) -> Result<HeaderValue> {
        let client_secret = self.client_secret.as_deref().ok_or(Error::MissingClientSecret)?;
        let encoded = base64_encode(format!("{}:{}", self.client_id, client_secret));

        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            // this can only fail if the header value contains non-ASCII characters, which cannot happen since the
            // given header value is in base64
            .expect("failed to build basic authorization header");
        value.set_sensitive(true);

        Ok(value)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthorizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the [OAuth authorization scopes](crate::scope::Scope) that the user is asked to grant for the
    /// application. The scopes are joined with a single space. An empty list leaves the `scope` parameter out.
    pub fn scopes<T>(self, scopes: T) -> Self
    where
        T: ToScopesString,
    {
        let scope = scopes.to_scopes_string();

        Self {
            scope: if scope.is_empty() { None } else { Some(scope) },
            ..self
        }
    }

    /// Specify an already space-separated scope string. It is sent as-is.
    pub fn raw_scope<S>(self, scope: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }

    /// Use a given state instead of a random one.
    pub fn state<S>(self, state: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            state: Some(state.into()),
            ..self
        }
    }

    /// Set whether or not to force the user to approve the application again, if they've already done so.
    ///
    /// If false (default), a user who has already approved the application is automatically redirected to the
    /// specified redirect URL. If true, the user will not be automatically redirected and will have to approve the
    /// application again.
    pub fn show_dialog(self, show_dialog: bool) -> Self {
        Self { show_dialog, ..self }
    }
}

impl AuthorizationUrl {
    /// Compares the state returned in the redirect callback with the one this URL was generated with.
    pub fn verify_state(&self, returned_state: &str) -> Result<()> {
        verify_state(&self.state, returned_state)
    }
}

impl PkceAuthorizationUrl {
    /// Compares the state returned in the redirect callback with the one this URL was generated with.
    pub fn verify_state(&self, returned_state: &str) -> Result<()> {
        verify_state(&self.state, returned_state)
    }
}

pub(crate) fn verify_state(expected: &str, returned: &str) -> Result<()> {
    if expected != returned {
        return Err(Error::StateMismatch);
    }

    Ok(())
}

/// Builds an authorization URL's parameters. Extra parameters (such as the PKCE challenge) go after the common ones.
/// Returns the final URL and the state used.
pub(crate) fn build_authorize_url(
    authorize_endpoint: &str,
    client_id: &str,
    response_type: &str,
    redirect_uri: &str,
    options: AuthorizeOptions,
    extra: &[(&str, &str)],
) -> (String, String) {
    let state = options.state.unwrap_or_else(pkce::state);

    let mut params = QueryParams::new()
        .insert("client_id", client_id)
        .insert("response_type", response_type)
        .insert("redirect_uri", redirect_uri)
        .insert("scope", options.scope)
        .insert("state", state.as_str())
        // spotify's default for show_dialog is false if it's not specified
        .insert("show_dialog", options.show_dialog.then_some("true"));

    for (key, value) in extra {
        params = params.insert(*key, *value);
    }

    (format!("{authorize_endpoint}{}", params.to_query_string()), state)
}

/// Posts a form to the token endpoint. If `authorization` is given it's sent as the `Authorization` header; the form
/// content type keeps the request engine from adding its bearer token either way.
pub(crate) async fn request_token(
    client: &ReadWriteClient,
    token_endpoint: &str,
    form: serde_json::Value,
    authorization: Option<HeaderValue>,
) -> Result<AccessToken> {
    let mut options =
        RequestOptions::new().header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));

    if let Some(authorization) = authorization {
        options = options.header(header::AUTHORIZATION, authorization);
    }

    let token: AccessToken = client.post(token_endpoint, Some(form), Some(options)).await?;
    debug!("Got token response: {token:?}");

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    const AUTHORIZE: &str = "https://accounts.spotify.com/authorize";

    #[test]
    fn basic_authorization_header() {
        let credentials = Credentials::with_secret("client", "secret");
        assert_eq!(credentials.basic_authorization().unwrap(), "Basic Y2xpZW50OnNlY3JldA==");
    }

    #[test]
    fn basic_authorization_requires_secret() {
        let credentials = Credentials::new("client");
        assert!(matches!(
            credentials.basic_authorization(),
            Err(Error::MissingClientSecret)
        ));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let debug = format!("{:?}", Credentials::with_secret("client", "hunter2"));

        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn authorize_url_parameters() {
        let options = AuthorizeOptions::new()
            .scopes([Scope::UserReadEmail, Scope::UserTopRead])
            .state("abc")
            .show_dialog(true);

        let (url, state) = build_authorize_url(AUTHORIZE, "id", "code", "http://localhost/cb", options, &[]);

        assert_eq!(state, "abc");
        assert_eq!(
            url,
            "https://accounts.spotify.com/authorize?client_id=id&response_type=code&redirect_uri=http%3A%2F%2Flocalhost%2Fcb&scope=user-read-email%20user-top-read&state=abc&show_dialog=true"
        );
    }

    #[test]
    fn authorize_url_omits_absent_parameters() {
        let (url, state) = build_authorize_url(
            AUTHORIZE,
            "id",
            "token",
            "http://localhost/cb",
            AuthorizeOptions::new(),
            &[],
        );

        assert!(!url.contains("scope="));
        assert!(!url.contains("show_dialog"));
        assert!(url.contains(&format!("state={state}")));
        assert_eq!(state.len(), pkce::STATE_LENGTH);
    }

    #[test]
    fn show_dialog_false_is_omitted() {
        let options = AuthorizeOptions::new().show_dialog(false);
        let (url, _) = build_authorize_url(AUTHORIZE, "id", "code", "http://localhost/cb", options, &[]);

        assert!(!url.contains("show_dialog"));
    }

    #[test]
    fn empty_scopes_are_omitted() {
        let options = AuthorizeOptions::new().scopes(Vec::<Scope>::new());
        let (url, _) = build_authorize_url(AUTHORIZE, "id", "code", "http://localhost/cb", options, &[]);

        assert!(!url.contains("scope="));
    }

    #[test]
    fn raw_scope_passes_through() {
        let options = AuthorizeOptions::new().raw_scope("a b");
        let (url, _) = build_authorize_url(AUTHORIZE, "id", "code", "http://localhost/cb", options, &[]);

        assert!(url.contains("scope=a%20b"));
    }

    #[test]
    fn extra_parameters_are_appended() {
        let (url, _) = build_authorize_url(
            AUTHORIZE,
            "id",
            "code",
            "http://localhost/cb",
            AuthorizeOptions::new().state("s"),
            &[("code_challenge_method", "S256"), ("code_challenge", "xyz")],
        );

        assert!(url.ends_with("&state=s&code_challenge_method=S256&code_challenge=xyz"));
    }

    #[test]
    fn state_verification() {
        let url = AuthorizationUrl {
            url: String::new(),
            state: "abc".to_owned(),
        };

        assert!(url.verify_state("abc").is_ok());
        assert!(matches!(url.verify_state("abd"), Err(Error::StateMismatch)));
    }

    #[test]
    fn access_token_deserializes_without_optional_fields() {
        let token: AccessToken = serde_json::from_value(serde_json::json!({
            "access_token": "token",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .unwrap();

        assert_eq!(token.access_token, "token");
        assert_eq!(token.scope, None);
        assert_eq!(token.refresh_token, None);
    }
}
