//! Integration tests for Tavola.
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! so no server or network port is needed.
//!
//! ```bash
//! cargo test -p tavola-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart API, persistence and live updates
//! - `storefront_menu` - Menu listing, filters and request plumbing

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use futures::StreamExt;
use serde_json::Value;
use tavola_core::Price;
use tavola_storefront::menu::MenuCatalog;
use tavola_storefront::routes;
use tavola_storefront::state::AppState;
use tavola_storefront::storage::{CART_STORAGE_KEY, CartStorage, MemoryStorage};
use tavola_storefront::store::CartStore;
use tower::ServiceExt;

/// How long to wait for a streamed event before failing.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Path to the menu bundled with the storefront.
#[must_use]
pub fn bundled_menu_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/content/menu.json")
}

/// A storefront app wired to the bundled menu and the given cart storage.
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub storage: Arc<dyn CartStorage>,
}

impl TestContext {
    /// Storefront with an empty in-memory cart slot.
    ///
    /// # Panics
    ///
    /// Panics if the bundled menu cannot be loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()))
    }

    /// Storefront whose cart store is opened (rehydrated) from `storage`.
    ///
    /// # Panics
    ///
    /// Panics if the bundled menu cannot be loaded.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn CartStorage>) -> Self {
        let menu = MenuCatalog::load(&bundled_menu_path()).expect("bundled menu loads");
        let cart = CartStore::open(Arc::clone(&storage), CART_STORAGE_KEY);
        let state = AppState::with_defaults(cart, menu);

        Self {
            app: routes::app(state.clone()),
            state,
            storage,
        }
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which it never does for valid requests.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET` a path and return the status and JSON body.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).expect("valid request");
        json_response(self.send(request).await).await
    }

    /// Send a JSON body with the given method and return the status and JSON body.
    pub async fn send_json(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        json_response(self.send(request).await).await
    }

    /// `DELETE` a path and return the status and JSON body.
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::delete(uri).body(Body::empty()).expect("valid request");
        json_response(self.send(request).await).await
    }

    /// Raw contents of the cart slot.
    ///
    /// # Panics
    ///
    /// Panics if the storage read fails.
    #[must_use]
    pub fn stored_cart(&self) -> Option<Value> {
        self.storage
            .read(CART_STORAGE_KEY)
            .expect("storage readable")
            .map(|raw| serde_json::from_str(&raw).expect("stored cart is JSON"))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a response into its status and JSON body.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_response(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, body)
}

/// Read a money field from a JSON body.
///
/// # Panics
///
/// Panics if the value is not a JSON number.
#[must_use]
pub fn money(value: &Value) -> Price {
    serde_json::from_value(value.clone()).expect("money is a JSON number")
}

/// Reads named Server-Sent Events from a response body.
pub struct EventReader {
    stream: axum::body::BodyDataStream,
    buffer: String,
}

impl EventReader {
    #[must_use]
    pub fn new(response: Response) -> Self {
        Self {
            stream: response.into_body().into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Wait for the next event and return its name and JSON data.
    ///
    /// Keep-alive comments are skipped.
    ///
    /// # Panics
    ///
    /// Panics if no event arrives within [`EVENT_TIMEOUT`] or the stream ends.
    pub async fn next_event(&mut self) -> (String, Value) {
        tokio::time::timeout(EVENT_TIMEOUT, self.read_event())
            .await
            .expect("event arrives in time")
    }

    async fn read_event(&mut self) -> (String, Value) {
        loop {
            while let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                if let Some(event) = parse_event(&block) {
                    return event;
                }
            }

            let chunk = self
                .stream
                .next()
                .await
                .expect("stream still open")
                .expect("body chunk readable");
            self.buffer.push_str(std::str::from_utf8(&chunk).expect("events are UTF-8"));
        }
    }
}

fn parse_event(block: &str) -> Option<(String, Value)> {
    let mut name = None;
    let mut data = String::new();
    for line in block.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push_str(value.trim_start());
        }
    }

    let name = name?;
    let data = serde_json::from_str(&data).expect("event data is JSON");
    Some((name, data))
}
