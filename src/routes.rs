// src/routes.rs
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router, routing::get};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::handlers::{get_product, get_shopping_cart, list_products, upsert_shopping_cart};
use crate::state::AppState;

/// Builds the application router.
///
/// Requests running past `request_timeout` are dropped, which cancels any
/// in-flight store call, and answered with an execution failure.
pub fn create_router(app_state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route(
            "/shopping_carts",
            get(get_shopping_cart).post(upsert_shopping_cart),
        )
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

// The wrapped router never fails, so the only error here is the elapsed deadline.
async fn handle_timeout_error(err: BoxError) -> AppError {
    tracing::warn!("Request aborted: {}", err);
    AppError::Timeout
}
