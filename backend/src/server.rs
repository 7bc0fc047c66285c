use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::Extension;
use catalog_storage::{perfume::PerfumeStorage, user_account::UserAccountStorage};
use tokio::net::TcpListener;

use crate::routes;
use crate::{jwt::JwtManager, photo_storage::PhotoStorage, types::Environment};

/// Starts the server with the given environment and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the port
pub async fn start(
    environment: Environment,
    user_account_storage: Arc<UserAccountStorage>,
    perfume_storage: Arc<PerfumeStorage>,
    photo_storage: Arc<PhotoStorage>,
    jwt_manager: Arc<JwtManager>,
) -> anyhow::Result<()> {
    let mut openapi = OpenApi::default();

    let router = routes::handler()
        .finish_api(&mut openapi)
        .layer(Extension(openapi))
        .layer(Extension(environment))
        .layer(Extension(user_account_storage))
        .layer(Extension(perfume_storage))
        .layer(Extension(photo_storage))
        .layer(Extension(jwt_manager))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::timeout::TimeoutLayer::new(
            std::time::Duration::from_secs(30),
        ));

    let addr = std::net::SocketAddr::from((
        [0, 0, 0, 0],
        std::env::var("PORT").map_or(Ok(8001), |p| p.parse())?,
    ));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Perfume Catalog Backend started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves when SIGINT or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
