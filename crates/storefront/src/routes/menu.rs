//! Menu route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tavola_core::{MenuItem, MenuItemId, MenuQuery};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Raw query-string filters. `"all"` or a missing value means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct MenuParams {
    pub category: Option<String>,
    pub dietary: Option<String>,
    pub sort: Option<String>,
}

/// Menu listing response.
#[derive(Debug, Serialize)]
pub struct MenuListing {
    pub query: MenuQuery,
    pub items: Vec<MenuItem>,
}

/// List the menu, filtered and sorted.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<MenuParams>,
) -> Result<Json<MenuListing>> {
    let query = MenuQuery::parse(
        params.category.as_deref(),
        params.dietary.as_deref(),
        params.sort.as_deref(),
    )?;

    let items = state.menu().query(&query).into_iter().cloned().collect();
    Ok(Json(MenuListing { query, items }))
}

/// Show a single menu item.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<MenuItemId>) -> Result<Json<MenuItem>> {
    state
        .menu()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))
}
