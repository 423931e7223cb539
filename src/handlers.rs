// src/handlers.rs
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum_extra::extract::{Query as MultiQuery, QueryRejection as MultiQueryRejection};
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::filters::{ProductListingParams, compile};
use crate::models::{Product, ShoppingCart};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CartLookupParams {
    #[serde(default)]
    #[validate(length(min = 1, message = "ip_address query parameter is required"))]
    pub ip_address: String,
}

/// GET /products
pub async fn list_products(
    State(app_state): State<AppState>,
    params: Result<MultiQuery<ProductListingParams>, MultiQueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let MultiQuery(params) = params?;
    tracing::info!("GET /products with {:?}", params);

    let spec = compile(&params);
    let products = app_state.products.find(&spec).await?;
    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get_product(
    State(app_state): State<AppState>,
    product_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, AppError> {
    let Path(product_id) = product_id?;
    let product = app_state.products.find_by_id(product_id).await?;
    Ok(Json(product))
}

/// GET /shopping_carts?ip_address=
pub async fn get_shopping_cart(
    State(app_state): State<AppState>,
    params: Result<Query<CartLookupParams>, QueryRejection>,
) -> Result<Json<ShoppingCart>, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let cart = app_state.carts.get(&params.ip_address).await?;
    Ok(Json(cart))
}

/// POST /shopping_carts
pub async fn upsert_shopping_cart(
    State(app_state): State<AppState>,
    payload: Result<Json<ShoppingCart>, JsonRejection>,
) -> Result<Json<ShoppingCart>, AppError> {
    let Json(cart) = payload?;
    tracing::info!("Upserting cart for {:?}", cart.ip_address);

    let saved = app_state.carts.upsert(cart).await?;
    Ok(Json(saved))
}
