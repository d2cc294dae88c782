//! The `get`/`post`/`put`/`delete` primitives every endpoint wrapper and grant flow is built on.
//!
//! [ReadOnlyClient] only reads; [ReadWriteClient] dereferences to it and adds the writing methods. Both are cheap to
//! clone and share the same [RequestEngine], and with it the bearer token.

use std::{ops::Deref, sync::Arc};

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method,
};
use serde::de::DeserializeOwned;

use super::request::{ApiResponse, RequestDescriptor, RequestEngine};
use crate::{encoding::QueryParams, error::Result};

/// Per-call overrides merged into the request.
#[derive(Debug, Default, Clone)]
pub struct RequestOptions {
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
pub struct ReadOnlyClient {
    engine: Arc<RequestEngine>,
}

#[derive(Debug, Clone)]
pub struct ReadWriteClient {
    read: ReadOnlyClient,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl ReadOnlyClient {
    pub fn new(engine: Arc<RequestEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<RequestEngine> {
        &self.engine
    }

    /// Sends a `GET` request with `params` appended to `url` as a query string and returns the response body.
    pub async fn get<T>(&self, url: &str, params: Option<&QueryParams>, options: Option<RequestOptions>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.get_full_response(url, params, options)
            .await
            .map(|response| response.data)
    }

    /// Like [get](ReadOnlyClient::get), but returns the response headers along with the body.
    pub async fn get_full_response<T>(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        options: Option<RequestOptions>,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let mut descriptor = match params {
            Some(params) => RequestDescriptor::new(Method::GET, format!("{url}{}", params.to_query_string()))
                .params(params.to_json()),
            None => RequestDescriptor::new(Method::GET, url),
        };

        if let Some(options) = options {
            descriptor = descriptor.headers(options.headers);
        }

        self.engine.send(descriptor).await
    }
}

impl ReadWriteClient {
    pub fn new(engine: Arc<RequestEngine>) -> Self {
        Self {
            read: ReadOnlyClient::new(engine),
        }
    }

    pub async fn post<T>(
        &self,
        url: &str,
        data: Option<serde_json::Value>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::POST, url, data, options).await
    }

    pub async fn put<T>(&self, url: &str, data: Option<serde_json::Value>, options: Option<RequestOptions>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::PUT, url, data, options).await
    }

    pub async fn delete<T>(
        &self,
        url: &str,
        data: Option<serde_json::Value>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send_with_body(Method::DELETE, url, data, options).await
    }

    async fn send_with_body<T>(
        &self,
        method: Method,
        url: &str,
        data: Option<serde_json::Value>,
        options: Option<RequestOptions>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut descriptor = RequestDescriptor::new(method, url);

        if let Some(data) = data {
            descriptor = descriptor.data(data);
        }

        if let Some(options) = options {
            descriptor = descriptor.headers(options.headers);
        }

        self.read.engine.send(descriptor).await.map(|response| response.data)
    }
}

impl Deref for ReadWriteClient {
    type Target = ReadOnlyClient;

    fn deref(&self) -> &Self::Target {
        &self.read
    }
}

impl From<ReadWriteClient> for ReadOnlyClient {
    fn from(client: ReadWriteClient) -> Self {
        client.read
    }
}
