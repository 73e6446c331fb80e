//! Cart route handlers.
//!
//! Every handler issues one command to the shared [`CartStore`] and answers
//! with the resulting cart. Unknown item IDs on update/remove are not errors:
//! the unchanged cart is returned.
//!
//! Commands write the storage slot synchronously, so they run on the blocking
//! thread pool rather than on the async workers.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tavola_core::{CartItem, CartLine, CartState, MenuItemId, OrderSummary, Price};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::CartStore;

/// Cart line as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub id: MenuItemId,
    pub name: String,
    pub image: String,
    pub price: Price,
    pub quantity: u32,
    pub subtotal: Price,
    /// Preformatted `price × quantity`, e.g. `"$49.98"`.
    pub subtotal_display: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let subtotal = line.subtotal();
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price,
            quantity: line.quantity,
            subtotal,
            subtotal_display: subtotal.to_string(),
        }
    }
}

/// Cart plus its order summary.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Price,
    pub summary: OrderSummary,
}

impl CartView {
    /// Build the view for a cart at the given tax rate.
    #[must_use]
    pub fn new(cart: &CartState, tax_rate: Decimal) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            total: cart.total(),
            summary: OrderSummary::for_cart(cart, tax_rate),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub id: MenuItemId,
}

/// Update quantity request body.
///
/// Zero or negative quantities remove the line.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Run one store command on the blocking pool.
async fn run_command<F>(state: &AppState, command: F) -> Result<CartState>
where
    F: FnOnce(&CartStore) -> CartState + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || command(state.cart()))
        .await
        .map_err(|e| AppError::Internal(format!("cart command did not complete: {e}")))
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::new(&state.cart().current(), state.tax_rate()))
}

/// Add one unit of a menu item.
///
/// The item is looked up in the menu so clients cannot set their own prices.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let item = state
        .menu()
        .get(&request.id)
        .map(CartItem::from)
        .ok_or_else(|| AppError::NotFound(format!("menu item {}", request.id)))?;

    add_breadcrumb("cart", "Added item to cart", Some(&[("item_id", item.id.as_str())]));
    let cart = run_command(&state, move |store| store.add_item(item)).await?;

    Ok(Json(CartView::new(&cart, state.tax_rate())))
}

/// Set the quantity of a cart line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity;
    let cart = run_command(&state, move |store| store.update_quantity(id, quantity)).await?;
    Ok(Json(CartView::new(&cart, state.tax_rate())))
}

/// Remove a cart line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Json<CartView>> {
    let cart = run_command(&state, move |store| store.remove_item(id)).await?;
    Ok(Json(CartView::new(&cart, state.tax_rate())))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<CartView>> {
    let cart = run_command(&state, CartStore::clear).await?;
    Ok(Json(CartView::new(&cart, state.tax_rate())))
}

/// Stream cart updates as Server-Sent Events.
///
/// Sends the current cart immediately, then a `cart` event carrying the
/// latest state whenever the store publishes. Commands that land while a
/// subscriber is still catching up collapse into one event with the newest
/// cart; intermediate states are not replayed.
#[instrument(skip(state))]
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let receiver = state.cart().subscribe();
    let tax_rate = state.tax_rate();

    let updates = stream::unfold((receiver, true), move |(mut receiver, first)| async move {
        if !first && receiver.changed().await.is_err() {
            // Store dropped; the server is shutting down.
            return None;
        }

        let view = CartView::new(&receiver.borrow_and_update(), tax_rate);
        match Event::default().event("cart").json_data(&view) {
            Ok(event) => Some((Ok(event), (receiver, false))),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode cart event");
                None
            }
        }
    });

    Sse::new(updates).keep_alive(KeepAlive::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::menu::MenuCatalog;
    use crate::storage::{CART_STORAGE_KEY, MemoryStorage};

    fn state() -> AppState {
        let cart = CartStore::empty(Arc::new(MemoryStorage::new()), CART_STORAGE_KEY);
        AppState::with_defaults(cart, MenuCatalog::new(Vec::new()).unwrap())
    }

    #[tokio::test]
    async fn test_run_command_returns_new_cart() {
        let state = state();
        let item = CartItem::new("1", "Wagyu Burger", Price::from_cents(2499));

        let cart = run_command(&state, move |store| store.add_item(item))
            .await
            .unwrap();

        assert_eq!(cart.total(), Price::from_cents(2499));
        assert_eq!(state.cart().current(), cart);
    }

    #[tokio::test]
    async fn test_failed_command_is_internal_error() {
        let state = state();

        let err = run_command(&state, |_: &CartStore| -> CartState { panic!("store crashed") })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_view_includes_line_subtotals() {
        let item = CartItem::new("1", "Wagyu Burger", Price::from_cents(2499));
        let cart = CartState::default()
            .apply(tavola_core::CartCommand::AddItem(item.clone()))
            .apply(tavola_core::CartCommand::AddItem(item));

        let view = CartView::new(&cart, tavola_core::DEFAULT_TAX_RATE);
        assert_eq!(view.items[0].subtotal_display, "$49.98");
        assert_eq!(view.summary.item_count, 2);
    }
}
