//! HTTP surface: routes, shared state, and the server loop.

pub mod error;
pub mod handlers;
pub mod render;

use crate::db::Pool;
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub index_limit: usize,
}

impl AppState {
    pub fn new(pool: Pool, index_limit: usize) -> Self {
        Self { pool, index_limit }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/polls", get(handlers::index))
        .route("/polls/", get(handlers::index))
        .route("/polls/:question_id", get(handlers::detail))
        .route("/polls/:question_id/", get(handlers::detail))
        .route("/polls/:question_id/results", get(handlers::results))
        .route("/polls/:question_id/results/", get(handlers::results))
        .route("/polls/:question_id/vote", post(handlers::vote))
        .route("/polls/:question_id/vote/", post(handlers::vote))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "polls server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
