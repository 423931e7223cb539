// src/state.rs

use std::sync::Arc;

use crate::cart_cache::CartCache;
use crate::repository::ProductRepository;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub carts: CartCache,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>, carts: CartCache) -> Self {
        Self { products, carts }
    }
}
