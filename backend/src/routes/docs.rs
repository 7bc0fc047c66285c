use crate::types::Environment;
use aide::{axum::ApiRouter, openapi::OpenApi, scalar::Scalar};
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Extension, Json};

pub fn handler() -> ApiRouter {
    let scalar = Scalar::new("/openapi.json").with_title("Perfume Catalog API Docs");

    ApiRouter::new()
        .route("/docs", scalar.axum_route())
        .route("/openapi.json", get(openapi_schema))
        .layer(axum::middleware::from_fn(gate_docs))
}

/// Hides the docs UI and schema outside development/staging
async fn gate_docs(
    Extension(environment): Extension<Environment>,
    request: Request,
    next: Next,
) -> Response {
    if !environment.show_api_docs() {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

#[allow(clippy::unused_async)]
async fn openapi_schema(Extension(openapi): Extension<OpenApi>) -> impl IntoResponse {
    Json(openapi)
}
