//! Router assembly and the serve loop.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use jokes_core::CoreError;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_jokes_page, health, home, like_post};
use crate::state::AppContext;
use crate::TOOL_PATH;

/// Builds the application router over `ctx`.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let static_dir = &ctx.config.static_dir;
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route_service(TOOL_PATH, index.clone())
        .route_service(&format!("{TOOL_PATH}/"), index)
        .route("/get_jokes_page/:page_num", get(get_jokes_page))
        .route("/like/:post_id", post(like_post))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// The HTTP server.
pub struct Server {
    ctx: Arc<AppContext>,
}

impl Server {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Serves until Ctrl+C or SIGTERM, then closes the counter store.
    pub async fn run(self) -> Result<(), CoreError> {
        let address = self.ctx.config.bind_address();
        tracing::info!("Binding to {address}");

        let listener = TcpListener::bind(&address).await?;
        tracing::info!(
            addr = %address,
            jokes = self.ctx.dataset.len(),
            page_size = self.ctx.config.page_size,
            "Server running"
        );

        axum::serve(listener, router(self.ctx.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.ctx.database.close().await;
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
}
