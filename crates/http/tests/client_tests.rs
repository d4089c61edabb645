//! Integration tests for the HealthTrack HTTP client

use healthtrack_core::Role;
use healthtrack_http::types::{LoginRequest, RegisterRequest};
use healthtrack_http::{AuthenticatedApiClient, ClientError, PublicApiClient, TypedClientBuilder};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_body(role: &str) -> serde_json::Value {
    json!({
        "token": "jwt-123",
        "type": "Bearer",
        "id": 4,
        "email": "ana",
        "name": "Ana Lima",
        "role": role,
        "healthId": 98765,
    })
}

#[tokio::test]
async fn test_client_builder() {
    let client = TypedClientBuilder::new()
        .base_url("http://localhost:8080/")
        .build_public();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = TypedClientBuilder::new().build_public();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = TypedClientBuilder::new().build_authenticated("token");
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_posts_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "username": "ana",
            "password": "secret1",
            "userType": "USER",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("USER")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();
    let response = client
        .login(&LoginRequest::new("ana", "secret1").user_type(Role::User))
        .await
        .unwrap();

    assert_eq!(response.token, "jwt-123");
    assert_eq!(response.profile.role, Some(Role::User));
    assert_eq!(response.profile.health_id, Some(98765));
}

#[tokio::test]
async fn test_public_client_sends_no_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body("DOCTOR")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let authed = AuthenticatedApiClient::new(mock_server.uri(), "jwt-123").unwrap();
    let response = authed
        .to_public()
        .register(&RegisterRequest::new("house", "secret1", Role::Doctor))
        .await
        .unwrap();
    assert_eq!(response.profile.role, Some(Role::Doctor));
}

#[tokio::test]
async fn test_profile_uses_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "name": "Ana Lima",
            "username": "ana",
            "phone": "555-0100",
            "healthId": 98765,
            "role": "USER",
            "createdAt": "2024-03-01T10:00:00",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();
    let profile = client.authenticate("jwt-123").profile().await.unwrap();

    assert_eq!(profile.username.as_deref(), Some("ana"));
    assert_eq!(profile.phone.as_deref(), Some("555-0100"));
    assert_eq!(profile.extra["createdAt"], "2024-03-01T10:00:00");
}

#[tokio::test]
async fn test_roles_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/roles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "roles": ["USER", "DOCTOR"] })),
        )
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();
    let roles = client.roles().await.unwrap();
    assert_eq!(roles.roles, vec![Role::User, Role::Doctor]);
}

#[tokio::test]
async fn test_availability_checks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/check-username"))
        .and(query_param("username", "ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exists": true })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/check-health-id"))
        .and(query_param("healthId", "98765"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exists": false })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/check-phone"))
        .and(query_param("phone", "555-0100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exists": true })))
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();
    assert!(client.username_exists("ana").await.unwrap());
    assert!(!client.health_id_exists(98765).await.unwrap());
    assert!(client.phone_exists("555-0100").await.unwrap());
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Invalid credentials",
            "message": "Bad credentials",
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();

    let result = client.login(&LoginRequest::new("ana", "wrong")).await;
    match result {
        Err(ClientError::BadRequest(message)) => {
            assert_eq!(message, "Invalid credentials: Bad credentials");
        }
        other => panic!("expected bad request, got {other:?}"),
    }

    let result = client.authenticate("expired").profile().await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(ref m)) if m == "Unauthorized"));
}

#[tokio::test]
async fn test_invalid_json_is_a_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = PublicApiClient::new(mock_server.uri()).unwrap();
    let err = client.roles().await.unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
    assert_eq!(err.status(), None);
}
