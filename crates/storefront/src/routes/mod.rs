//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Menu
//! GET    /api/menu                - Menu listing (?category=&dietary=&sort=)
//! GET    /api/menu/{id}           - Single menu item
//!
//! # Cart
//! GET    /api/cart                - Cart with order summary
//! DELETE /api/cart                - Clear cart
//! POST   /api/cart/items          - Add one unit ({"id": "..."})
//! PATCH  /api/cart/items/{id}     - Set quantity ({"quantity": n})
//! DELETE /api/cart/items/{id}     - Remove line
//! GET    /api/cart/events         - Cart updates (Server-Sent Events)
//! ```

pub mod cart;
pub mod menu;

use axum::{
    Router,
    http::Request,
    middleware::from_fn,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{REQUEST_ID_HEADER, request_id_middleware};
use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::index))
        .route("/{id}", get(menu::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
        .route("/events", get(cart::events))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/menu", menu_routes())
        .nest("/api/cart", cart_routes())
}

/// Build the complete application router with tracing and request IDs.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default();
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                upstream_request_id = request_id,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
