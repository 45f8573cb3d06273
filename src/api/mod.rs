//! REST API server.
//!
//! Generic over [`Database`]; the binary picks the concrete backend.

mod handlers;
pub mod routes;
mod state;
pub mod v1;


use std::net::{IpAddr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

pub use state::AppState;

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Number of -v flags; selects the default log level
    pub verbosity: u8,
    /// Serve OpenAPI docs at /docs
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3737,
            verbosity: 0,
            enable_docs: false,
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(estate::api::bind),
        help("Is another process using this port? Try --port with a free one.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(estate::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Default log filter for a given number of -v flags.
pub(crate) fn log_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("estate={level},tower_http={level}")
}

/// Initialize tracing; `RUST_LOG` overrides the verbosity-derived filter.
fn init_tracing(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(verbosity).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the API server with the given configuration
pub async fn run<D: Database>(config: Config, db: D) -> Result<(), ApiError> {
    init_tracing(config.verbosity);

    let state = AppState::new(db);
    let app = routes::create_router(state, config.enable_docs).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
