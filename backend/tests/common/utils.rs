use axum::response::Response;
use http::StatusCode;
use http_body_util::BodyExt;
use rand::RngCore;
use serde_json::json;
use uuid::Uuid;

use super::test_setup::TestSetup;

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Generates a unique test email address
pub fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Generate random image-like bytes of the specified size
pub fn generate_test_photo(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

/// Registers a user and returns an access token for it
pub async fn register_and_login(context: &TestSetup, email: &str) -> String {
    let response = context
        .send_post_request(
            "/v1/users",
            json!({
                "email": email,
                "password": TEST_PASSWORD,
                "name": "Test User",
            }),
            None,
        )
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = context
        .send_post_request(
            "/v1/auth/token",
            json!({
                "email": email,
                "password": TEST_PASSWORD,
            }),
            None,
        )
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    body["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// Creates a perfume for the given token and returns its ID
pub async fn create_perfume(
    context: &TestSetup,
    token: &str,
    payload: serde_json::Value,
) -> String {
    let response = context
        .send_post_request("/v1/perfumes", payload, Some(token))
        .await
        .expect("Failed to send create perfume request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    body["id"].as_str().expect("id missing").to_string()
}
