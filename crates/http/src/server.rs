//! HTTP server that binds the transport adapter to a TCP socket.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use liupan_mcp::McpRouter;

use crate::error::HttpError;
use crate::router::{AppState, build_router};

/// Listener configuration supplied by the embedding host.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Fixed public base URL for deployed content. When unset the adapter
    /// derives scheme and host from request headers.
    pub public_base_url: Option<String>,
}

/// Axum-based HTTP server for the JSON-RPC tool endpoint.
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ServerConfig, router: Arc<McpRouter>) -> Self {
        let state = AppState {
            router,
            public_base_url: config.public_base_url.clone(),
        };
        Self { config, state }
    }

    /// Starts the server and blocks until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), HttpError> {
        let listener = TcpListener::bind(self.config.bind)
            .await
            .map_err(|source| HttpError::Bind {
                addr: self.config.bind.to_string(),
                source,
            })?;

        tracing::info!(addr = %self.config.bind, "MCP HTTP endpoint ready");

        axum::serve(listener, build_router(self.state))
            .await
            .map_err(|error| HttpError::Serve(error.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use liupan_common::{
        ChartResult, ContentStore, DeployError, DivinationEngine, DivinationError, Gender,
        YearFate,
    };

    use super::*;

    struct NullStore;

    #[async_trait::async_trait]
    impl ContentStore for NullStore {
        async fn deploy(&self, _content: &str, base_url: &str) -> Result<String, DeployError> {
            Ok(base_url.to_string())
        }
    }

    struct NullEngine;

    impl DivinationEngine for NullEngine {
        fn chart(&self, _at: NaiveDateTime) -> Result<ChartResult, DivinationError> {
            Err(DivinationError::new("not available"))
        }

        fn year_fate(
            &self,
            _birth: NaiveDateTime,
            _gender: Gender,
        ) -> Result<YearFate, DivinationError> {
            Ok(YearFate::default())
        }
    }

    fn make_server(config: ServerConfig) -> HttpServer {
        let router = Arc::new(McpRouter::new(Arc::new(NullStore), Arc::new(NullEngine)));
        HttpServer::new(config, router)
    }

    #[test]
    fn new_keeps_bind_address() {
        let server = make_server(ServerConfig {
            bind: "127.0.0.1:3000".parse().unwrap(),
            public_base_url: None,
        });
        assert_eq!(server.config.bind.port(), 3000);
        assert!(server.state.public_base_url.is_none());
    }

    #[test]
    fn new_threads_public_base_url_into_state() {
        let server = make_server(ServerConfig {
            bind: "0.0.0.0:8080".parse().unwrap(),
            public_base_url: Some("https://pages.example".to_string()),
        });
        assert_eq!(
            server.state.public_base_url.as_deref(),
            Some("https://pages.example")
        );
    }
}
