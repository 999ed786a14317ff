//! Tests for the registration API client against a mock backend.

use pushbridge_backend::client::{BackendClient, BackendError};
use pushbridge_common::models::RegistrationParameters;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params_for(server: &MockServer) -> RegistrationParameters {
    RegistrationParameters::new("tenant-1", "secret-1", server.uri(), "com.example.app")
        .with_device_alias("kitchen-tablet")
        .with_tags(["beta", "eu"])
}

#[tokio::test]
async fn create_returns_device_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/registrations"))
        .and(body_partial_json(json!({
            "channel_token": "tok-1",
            "device_alias": "kitchen-tablet",
            "package_identity": "com.example.app",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "device_uuid": "dev-9" })))
        .mount(&server)
        .await;

    let client = BackendClient::new();
    let id = client
        .create_registration("tok-1", &params_for(&server))
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some("dev-9"));
}

#[tokio::test]
async fn create_normalizes_missing_and_empty_ids_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/registrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "device_uuid": "" })))
        .mount(&server)
        .await;

    let client = BackendClient::new();
    let id = client
        .create_registration("tok-1", &params_for(&server))
        .await
        .unwrap();
    assert_eq!(id, None);
}

#[tokio::test]
async fn update_puts_to_the_registration_resource() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/registrations/dev-9"))
        .and(body_partial_json(json!({ "channel_token": "tok-2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "device_uuid": "dev-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new();
    let id = client
        .update_registration("tok-2", "dev-9", &params_for(&server))
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some("dev-9"));
}

#[tokio::test]
async fn backend_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/registrations"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let client = BackendClient::new();
    let err = client
        .create_registration("tok-1", &params_for(&server))
        .await
        .unwrap_err();
    match err {
        BackendError::ApiError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad credentials");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/registrations/dev-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new();
    client
        .delete_registration("dev-9", &params_for(&server))
        .await
        .unwrap();
}
