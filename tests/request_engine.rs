//! Tests for how requests are built, sent and their outcomes classified.
//!
//! These tests use mock servers to verify client behavior without requiring a connection to Spotify.

use reqwest::header::{self, HeaderValue};
use serde_json::{json, Value};
use spotwire::{
    client::{RequestOptions, SpotifyClient, SpotifyClientBuilder},
    encoding::QueryParams,
    error::Error,
    model::error::{ApiErrorMessage, ErrorBody},
};
use wiremock::{
    matchers::{body_json, header as header_matcher, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> SpotifyClient {
    SpotifyClientBuilder::new("client")
        .api_base_url(server.uri())
        .bearer_token("token")
        .build()
        .unwrap()
}

mod successful_responses {
    use super::*;

    #[tokio::test]
    async fn test_get_sends_bearer_and_json_content_type() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/albums/123"))
            .and(query_param("market", "FI"))
            .and(header_matcher("authorization", "Bearer token"))
            .and(header_matcher("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = QueryParams::new().insert("market", "FI");
        let album: Value = client.api().get("albums/123", Some(&params), None).await.unwrap();

        assert_eq!(album["id"], "123");
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/me/player/pause"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client_for(&server);

        client.api().put::<()>("me/player/pause", None, None).await.unwrap();
        let optional: Option<Value> = client.api().put("me/player/pause", None, None).await.unwrap();

        assert_eq!(optional, None);
    }

    #[tokio::test]
    async fn test_full_response_includes_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-custom", "yes")
                    .set_body_json(json!({ "id": "user" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.api().get_full_response::<Value>("me", None, None).await.unwrap();

        assert_eq!(response.data["id"], "user");
        assert_eq!(response.headers.get("x-custom").unwrap(), "yes");
    }

    #[tokio::test]
    async fn test_json_body_is_serialized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/users/me/playlists"))
            .and(body_json(json!({ "name": "mix", "public": false })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let playlist: Value = client
            .api()
            .post(
                "users/me/playlists",
                Some(json!({ "name": "mix", "public": false })),
                None,
            )
            .await
            .unwrap();

        assert_eq!(playlist["id"], "new");
    }

    #[tokio::test]
    async fn test_string_body_is_sent_raw() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/playlists/abc/images"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new().header(header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg"));

        client
            .api()
            .put::<()>("playlists/abc/images", Some(json!("aGVsbG8=")), Some(options))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, b"aGVsbG8=");
        assert_eq!(requests[0].headers.get("content-type").unwrap(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_absolute_url_is_used_as_is() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = SpotifyClientBuilder::new("client").build().unwrap();
        let found: bool = client
            .api()
            .get(&format!("{}/elsewhere", server.uri()), None, None)
            .await
            .unwrap();

        assert!(found);
    }
}

mod headers {
    use super::*;

    #[tokio::test]
    async fn test_form_content_type_suppresses_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/form"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new().header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        client
            .api()
            .post::<Value>("form", Some(json!({ "a": "b c", "skipped": null })), Some(options))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(requests[0].body, b"a=b+c");
    }

    #[tokio::test]
    async fn test_custom_authorization_wins() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header_matcher("authorization", "Bearer other"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new().header(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"));

        client.api().get::<Value>("me", None, Some(options)).await.unwrap();
    }

    #[tokio::test]
    async fn test_no_token_no_authorization() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "markets": [] })))
            .mount(&server)
            .await;

        let client = SpotifyClientBuilder::new("client")
            .api_base_url(server.uri())
            .build()
            .unwrap();

        client.api().get::<Value>("markets", None, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_bearer_token_change_applies_to_next_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let api = client.api();

        api.get::<Value>("me", None, None).await.unwrap();
        client.set_bearer_token("refreshed");
        api.get::<Value>("me", None, None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].headers.get("authorization").unwrap(), "Bearer token");
        assert_eq!(requests[1].headers.get("authorization").unwrap(), "Bearer refreshed");
    }

    #[tokio::test]
    async fn test_invalid_bearer_token() {
        let client = SpotifyClientBuilder::new("client")
            .bearer_token("line\nbreak")
            .build()
            .unwrap();

        let result = client.api().get::<Value>("me", None, None).await;
        assert!(matches!(result, Err(Error::InvalidBearerToken)));
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks/x"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": { "status": 400, "message": "bad" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = QueryParams::new().insert("market", "FI");
        let result = client.api().get::<Value>("tracks/x", Some(&params), None).await;

        match result {
            Err(Error::Api(err)) => {
                assert_eq!(err.status.as_u16(), 400);
                assert_eq!(err.status_text, "Bad Request");
                assert_eq!(err.method, reqwest::Method::GET);
                assert!(err.endpoint.ends_with("/tracks/x?market=FI"));
                assert_eq!(err.params, Some(json!({ "market": "FI" })));
                assert!(err.message().contains("bad"));
                assert_eq!(err.retry_after, None);
                assert!(err.to_string().contains("bad"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "5")
                    .set_body_json(json!({ "error": { "status": 429, "message": "API rate limit exceeded" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.api().get::<Value>("search", None, None).await.unwrap_err();

        assert_eq!(err.status(), Some(reqwest::StatusCode::TOO_MANY_REQUESTS));

        match err {
            Error::Api(err) => {
                assert!(err.is_rate_limited());
                assert_eq!(err.retry_after, Some(5));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_expired() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        match client.api().get::<Value>("me", None, None).await {
            Err(Error::Api(err)) => {
                assert!(err.is_token_expired());
                assert!(matches!(&err.body, ErrorBody::Api(object) if object.message == ApiErrorMessage::TokenExpired));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        match client.api().get::<Value>("me", None, None).await {
            Err(Error::Api(err)) => {
                assert_eq!(err.status.as_u16(), 502);
                assert_eq!(err.body, ErrorBody::Unparseable("<html>Bad Gateway</html>".to_owned()));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_params_default_to_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/me/tracks"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "error": { "status": 403, "message": "no" } })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let data = json!({ "ids": ["a", "b"] });

        match client.api().put::<()>("me/tracks", Some(data.clone()), None).await {
            Err(Error::Api(err)) => assert_eq!(err.params, Some(data)),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.api().get::<Value>("me", None, None).await;

        assert!(matches!(result, Err(Error::Unexpected { .. })));
    }

    #[tokio::test]
    async fn test_connection_to_unreachable_server() {
        let client = SpotifyClientBuilder::new("client")
            .api_base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        match client.api().get::<Value>("me", None, None).await {
            Err(Error::Network(err)) => {
                assert_eq!(err.method, reqwest::Method::GET);
                assert_eq!(err.endpoint, "http://127.0.0.1:1/me");
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
