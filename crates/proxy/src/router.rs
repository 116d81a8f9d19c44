//! Route table

use crate::handlers;
use crate::state::ProxyState;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// `GET /healthz` plus every forwarded method under `{prefix}/*path`
pub fn create_router(state: ProxyState) -> Router {
    let forwarded = format!("{}/*path", state.prefix());

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            &forwarded,
            get(handlers::forward)
                .post(handlers::forward)
                .put(handlers::forward)
                .patch(handlers::forward)
                .delete(handlers::forward)
                .options(handlers::forward),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
