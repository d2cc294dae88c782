//! The request engine: the single point where HTTP requests are built, sent, and their outcome classified.

use std::sync::RwLock;

use log::{debug, error, trace, warn};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, Error, NetworkError, Result},
    model::error::ErrorBody,
};

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// One outgoing request before it's sent.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL, or a path relative to the API base URL.
    pub url: String,
    /// The request's query parameters, kept for error reporting.
    pub params: Option<serde_json::Value>,
    pub data: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

/// A successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub headers: HeaderMap,
}

/// Sends requests to Spotify on behalf of a [SpotifyClient](crate::client::SpotifyClient) and everything built from it.
///
/// The engine holds the bearer token that is attached to every request by default. The token is replaced as a whole by
/// [set_bearer_token](RequestEngine::set_bearer_token); concurrent writers simply race and the last write wins.
#[derive(Debug)]
pub struct RequestEngine {
    http_client: reqwest::Client,
    api_base_url: String,
    bearer_token: RwLock<Option<String>>,
}

impl RequestDescriptor {
    pub fn new<S>(method: Method, url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            method,
            url: url.into(),
            params: None,
            data: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn params(self, params: serde_json::Value) -> Self {
        Self {
            params: Some(params),
            ..self
        }
    }

    pub fn data(self, data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..self
        }
    }

    /// Merges the given headers into the descriptor's, replacing existing values for the same names.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }

        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl RequestEngine {
    pub fn new<S>(http_client: reqwest::Client, api_base_url: S, bearer_token: Option<String>) -> Self
    where
        S: Into<String>,
    {
        Self {
            http_client,
            api_base_url: api_base_url.into(),
            bearer_token: RwLock::new(bearer_token),
        }
    }

    /// Sets the bearer token used for all subsequent requests.
    pub fn set_bearer_token<S>(&self, token: S)
    where
        S: Into<String>,
    {
        *self.bearer_token.write().expect("bearer token rwlock poisoned") = Some(token.into());
    }

    pub fn clear_bearer_token(&self) {
        *self.bearer_token.write().expect("bearer token rwlock poisoned") = None;
    }

    /// Returns a copy of the current bearer token.
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token.read().expect("bearer token rwlock poisoned").clone()
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Absolute URLs are returned as-is; anything else is joined to the API base URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_owned()
        } else {
            format!(
                "{}/{}",
                self.api_base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }

    /// Sends a request and classifies its outcome.
    ///
    /// A 2xx response is decoded as JSON into `T`; an empty body decodes as JSON `null`. Any other status results in
    /// an [API error](Error::Api), a failure to get a response at all in a [network error](Error::Network), and
    /// anything else in an [unexpected error](Error::Unexpected).
    pub async fn send<T>(&self, descriptor: RequestDescriptor) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let RequestDescriptor {
            method,
            url,
            params,
            data,
            headers,
        } = descriptor;

        let endpoint = self.resolve_url(&url);

        let headers = resolve_headers(&headers, self.bearer_token().as_deref())?;
        let body = serialize_body(&headers, data.as_ref()).map_err(|message| Error::unexpected(&endpoint, message))?;
        // form requests go to the token endpoint; their bodies and responses carry credentials
        let sensitive = is_form_content_type(&headers);
        let params = reported_params(params, data, sensitive);

        debug!("Sending {method} request to {endpoint}");

        let mut request = self.http_client.request(method.clone(), &endpoint).headers(headers);

        if let Some(body) = body {
            if !sensitive {
                trace!("Request body: {body}");
            }

            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| classify_transport_error(err, &method, &endpoint, &params))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        trace!("Response: {status} {response_headers:?}");

        let text = response
            .text()
            .await
            .map_err(|err| classify_transport_error(err, &method, &endpoint, &params))?;

        if !status.is_success() {
            let retry_after = extract_retry_after(&response_headers);
            let body = ErrorBody::parse(&text);

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Got rate limited from {method} {endpoint}, Retry-After: {retry_after:?}");
            } else {
                warn!("Got {status} from {method} {endpoint}: {}", body.message());
            }

            return Err(ApiError {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                method,
                endpoint,
                params,
                body,
                retry_after,
            }
            .into());
        }

        if !sensitive {
            trace!("Response body: {text}");
        }

        let data = parse_response_body(&text).map_err(|err| {
            error!("Failed to decode response body from {method} {endpoint}: {err}");
            Error::unexpected(&endpoint, format!("failed to decode response body: {err}"))
        })?;

        Ok(ApiResponse {
            data,
            headers: response_headers,
        })
    }
}

/// Builds the final request headers.
///
/// `Content-Type` defaults to JSON and is overridden by the caller's own. The default bearer authorization is added
/// only if there is a token, the caller didn't supply their own `Authorization` header, and the request isn't
/// form-encoded (token endpoint requests authenticate differently).
pub(crate) fn resolve_headers(custom: &HeaderMap, bearer_token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

    for (name, value) in custom.iter() {
        headers.insert(name.clone(), value.clone());
    }

    if !headers.contains_key(header::AUTHORIZATION) && !is_form_content_type(&headers) {
        if let Some(token) = bearer_token {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| Error::InvalidBearerToken)?;
            value.set_sensitive(true);

            headers.insert(header::AUTHORIZATION, value);
        }
    }

    Ok(headers)
}

pub(crate) fn is_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase().starts_with(CONTENT_TYPE_FORM))
        .unwrap_or(false)
}

/// Serializes the request body according to the final content type. Strings are sent as-is.
pub(crate) fn serialize_body(
    headers: &HeaderMap,
    data: Option<&serde_json::Value>,
) -> std::result::Result<Option<String>, String> {
    let data = match data {
        Some(data) => data,
        None => return Ok(None),
    };

    if let serde_json::Value::String(raw) = data {
        return Ok(Some(raw.clone()));
    }

    if is_form_content_type(headers) {
        let object = data
            .as_object()
            .ok_or_else(|| format!("form-encoded request body must be an object, got {data}"))?;

        let pairs = object
            .iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((key.as_str(), s.clone())),
                other => Some((key.as_str(), other.to_string())),
            })
            .collect::<Vec<_>>();

        serde_urlencoded::to_string(pairs)
            .map(Some)
            .map_err(|err| format!("failed to form-encode request body: {err}"))
    } else {
        serde_json::to_string(data)
            .map(Some)
            .map_err(|err| format!("failed to serialize request body: {err}"))
    }
}

fn parse_response_body<T>(text: &str) -> serde_json::Result<T>
where
    T: DeserializeOwned,
{
    if text.trim().is_empty() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_str(text)
    }
}

/// The params an error reports. Falls back to the request body, except for credential-carrying form bodies.
fn reported_params(
    params: Option<serde_json::Value>,
    data: Option<serde_json::Value>,
    sensitive: bool,
) -> Option<serde_json::Value> {
    match params {
        Some(params) => Some(params),
        None if sensitive => None,
        None => data,
    }
}

fn extract_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|header| header.to_str().ok())
        .and_then(|header_str| header_str.trim().parse::<u64>().ok())
}

/// Errors building the request are bugs on our side or the caller's, everything else means no usable response arrived.
fn classify_transport_error(
    err: reqwest::Error,
    method: &Method,
    endpoint: &str,
    params: &Option<serde_json::Value>,
) -> Error {
    if err.is_builder() {
        error!("Failed to build {method} request to {endpoint}: {err}");
        return Error::unexpected(endpoint, err);
    }

    error!("Network error during {method} {endpoint}: {err}");
    NetworkError {
        method: method.clone(),
        endpoint: endpoint.to_owned(),
        params: params.clone(),
        source: err,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn engine() -> RequestEngine {
        RequestEngine::new(reqwest::Client::new(), "https://api.spotify.com/v1", None)
    }

    fn form_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
        headers
    }

    #[test]
    fn default_headers_with_token() {
        let headers = resolve_headers(&HeaderMap::new(), Some("token")).unwrap();

        assert_eq!(headers[header::CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(headers[header::AUTHORIZATION], "Bearer token");
    }

    #[test]
    fn no_authorization_without_token() {
        let headers = resolve_headers(&HeaderMap::new(), None).unwrap();
        assert!(!headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn explicit_authorization_wins() {
        let mut custom = HeaderMap::new();
        custom.insert(header::AUTHORIZATION, HeaderValue::from_static("Foo"));

        let headers = resolve_headers(&custom, Some("token")).unwrap();

        assert_eq!(headers[header::AUTHORIZATION], "Foo");
        assert_eq!(headers.get_all(header::AUTHORIZATION).iter().count(), 1);
    }

    #[test]
    fn form_content_type_suppresses_bearer() {
        let headers = resolve_headers(&form_headers(), Some("token")).unwrap();

        assert_eq!(headers[header::CONTENT_TYPE], CONTENT_TYPE_FORM);
        assert!(!headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn explicit_content_type_overrides_default() {
        let mut custom = HeaderMap::new();
        custom.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg"));

        let headers = resolve_headers(&custom, Some("token")).unwrap();

        assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer token");
    }

    #[test]
    fn invalid_bearer_token() {
        let result = resolve_headers(&HeaderMap::new(), Some("bad\ntoken"));
        assert!(matches!(result, Err(Error::InvalidBearerToken)));
    }

    #[test]
    fn json_body() {
        let body = serialize_body(&HeaderMap::new(), Some(&json!({ "uris": ["a", "b"] }))).unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"uris":["a","b"]}"#));
    }

    #[test]
    fn raw_string_body() {
        let body = serialize_body(&HeaderMap::new(), Some(&json!("/9j/4AAQSkZJRg=="))).unwrap();
        assert_eq!(body.as_deref(), Some("/9j/4AAQSkZJRg=="));
    }

    #[test]
    fn no_body() {
        assert_eq!(serialize_body(&HeaderMap::new(), None).unwrap(), None);
    }

    #[test]
    fn form_body() {
        let data = json!({
            "grant_type": "authorization_code",
            "redirect_uri": "http://localhost/callback",
            "skipped": null,
            "count": 2,
        });

        let body = serialize_body(&form_headers(), Some(&data)).unwrap().unwrap();

        assert!(body.contains("grant_type=authorization_code"));
        assert!(body.contains("redirect_uri=http%3A%2F%2Flocalhost%2Fcallback"));
        assert!(body.contains("count=2"));
        assert!(!body.contains("skipped"));
    }

    #[test]
    fn form_body_must_be_object() {
        assert!(serialize_body(&form_headers(), Some(&json!([1, 2]))).is_err());
    }

    #[test]
    fn relative_and_absolute_urls() {
        let engine = engine();

        assert_eq!(engine.resolve_url("/me"), "https://api.spotify.com/v1/me");
        assert_eq!(engine.resolve_url("albums/1"), "https://api.spotify.com/v1/albums/1");
        assert_eq!(
            engine.resolve_url("https://accounts.spotify.com/api/token"),
            "https://accounts.spotify.com/api/token"
        );
    }

    #[test]
    fn bearer_token_last_write_wins() {
        let engine = engine();
        assert_eq!(engine.bearer_token(), None);

        engine.set_bearer_token("first");
        engine.set_bearer_token("second");
        assert_eq!(engine.bearer_token().as_deref(), Some("second"));

        engine.clear_bearer_token();
        assert_eq!(engine.bearer_token(), None);
    }

    #[test]
    fn retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_retry_after(&headers), None);

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(extract_retry_after(&headers), Some(30));

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(extract_retry_after(&headers), None);
    }

    #[test]
    fn form_body_not_reported_as_params() {
        let data = json!({ "grant_type": "refresh_token", "refresh_token": "secret" });

        assert_eq!(reported_params(None, Some(data.clone()), true), None);
        assert_eq!(reported_params(None, Some(data.clone()), false), Some(data));
        assert_eq!(
            reported_params(Some(json!({ "market": "FI" })), None, true),
            Some(json!({ "market": "FI" }))
        );
    }

    #[test]
    fn empty_response_body_is_null() {
        parse_response_body::<()>("").unwrap();

        let option: Option<u32> = parse_response_body("  ").unwrap();
        assert_eq!(option, None);
    }
}
