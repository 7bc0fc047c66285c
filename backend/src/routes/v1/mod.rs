//! Version 1 API routes

/// Token issuance
pub mod auth;
/// Perfume catalog CRUD and list views
pub mod perfumes;
/// Perfume photo upload and retrieval
pub mod photos;
/// Registration and profile management
pub mod users;

use aide::axum::{
    routing::{get, post, put},
    ApiRouter,
};
use axum::{extract::DefaultBodyLimit, middleware};

use crate::middleware::auth::auth_middleware;

/// Creates the v1 API router with all v1 handler routes
pub fn handler() -> ApiRouter {
    let public_routes = ApiRouter::new()
        .api_route("/users", post(users::register))
        .api_route("/auth/token", post(auth::login));

    // Photo upload takes a raw image body, so it gets its own body limit
    let photo_routes = ApiRouter::new()
        .api_route(
            "/perfumes/{id}/photo",
            put(photos::upload_photo)
                .get(photos::get_photo)
                .delete(photos::delete_photo),
        )
        .layer(DefaultBodyLimit::max(photos::MAX_PHOTO_BYTES));

    let protected_routes = ApiRouter::new()
        .api_route(
            "/users/me",
            get(users::get_profile).patch(users::update_profile),
        )
        .api_route("/users/me/password", put(users::change_password))
        .api_route(
            "/perfumes",
            post(perfumes::create_perfume).get(perfumes::list_perfumes),
        )
        .api_route("/perfumes/designers", get(perfumes::list_designers))
        .api_route("/perfumes/notes", get(perfumes::list_notes))
        .api_route(
            "/perfumes/{id}",
            get(perfumes::get_perfume)
                .put(perfumes::update_perfume)
                .delete(perfumes::delete_perfume),
        )
        .merge(photo_routes)
        .layer(middleware::from_fn(auth_middleware));

    public_routes.merge(protected_routes)
}
