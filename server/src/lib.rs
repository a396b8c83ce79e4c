//! HTTP surface for the todo service.
//!
//! # Design
//! Routing and extraction only: every route delegates to `TodoService` from
//! the core crate, and `ApiError` maps its errors onto status codes. The
//! router is generic over the store so tests can drive it with
//! `MemoryStore` while the binary uses SQLite.

use std::future::Future;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use todo_core::{TodoService, TodoStore};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
mod handlers;
pub mod telemetry;

pub use config::{Config, ConfigError, LogFormat, StorageMode};
pub use error::{ApiError, ErrorBody, ServerError};

/// Path prefix shared by every route.
pub const API_PREFIX: &str = "/api/v1";

pub fn app<S: TodoStore>(store: S) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::<S>))
        .route(
            "/todos",
            get(handlers::list_todos::<S>).post(handlers::create_todo::<S>),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo::<S>)
                .put(handlers::update_todo::<S>)
                .delete(handlers::delete_todo::<S>),
        )
        .with_state(TodoService::new(store));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(handlers::fallback)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C or SIGTERM, then close the store.
pub async fn run<S: TodoStore>(listener: TcpListener, store: S) -> Result<(), std::io::Error> {
    run_until(listener, store, shutdown_signal()).await
}

/// Serve until `shutdown` resolves, let in-flight requests finish, then
/// close the store.
pub async fn run_until<S, F>(listener: TcpListener, store: S, shutdown: F) -> Result<(), std::io::Error>
where
    S: TodoStore,
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store.clone()))
        .with_graceful_shutdown(shutdown)
        .await?;
    store.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
