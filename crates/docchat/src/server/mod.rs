//! HTTP server for the document Q&A pipeline

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::pipeline::RagPipeline;

/// Shared handler state: the pipeline behind every route
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
}

/// Document Q&A HTTP server
pub struct DocChatServer {
    config: ServerConfig,
    state: AppState,
}

impl DocChatServer {
    pub fn new(config: ServerConfig, pipeline: Arc<RagPipeline>) -> Self {
        Self {
            config,
            state: AppState { pipeline },
        }
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        let router = routes::api_routes(self.config.max_upload_size)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {e}")))?;

        let router = self.build_router();

        tracing::info!("starting docchat server on http://{addr}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind {addr}: {e}")))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Config(format!("server error: {e}")))?;

        Ok(())
    }

    /// Listen address as host:port
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}
