//! Passthrough proxy for the SunPath calculation backend
//!
//! A page served over HTTPS cannot call an HTTP backend directly. This
//! service accepts `{prefix}/*path` and forwards it to `{backend}/{path}`,
//! turning upstream failures into JSON bodies the client can show.
//!
//! # Example
//!
//! ```rust,no_run
//! use sunpath_core::config::Config;
//! use sunpath_proxy::{serve, ProxySettings};
//!
//! # async fn demo() -> Result<(), sunpath_proxy::ProxyError> {
//! let settings = ProxySettings::from_config(&Config::load(None)?)?;
//! serve(settings).await
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ProxyError;
pub use router::create_router;
pub use state::{ProxySettings, ProxyState};

use tokio::net::TcpListener;
use tracing::info;

/// Bind, serve until Ctrl-C, then drain in-flight requests
pub async fn serve(settings: ProxySettings) -> Result<(), ProxyError> {
    let bind = settings.bind;
    let state = ProxyState::new(settings)?;
    let app = create_router(state.clone());

    let listener = TcpListener::bind(bind).await.map_err(ProxyError::Bind)?;
    let local = listener.local_addr().map_err(ProxyError::Bind)?;
    info!(
        addr = %local,
        prefix = %state.prefix(),
        backend = %state.backend_url(),
        "Proxy listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ProxyError::Bind)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down proxy");
    }
}
