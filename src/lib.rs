// src/lib.rs
//! Product catalog read service with a TTL cart cache.

pub mod array_codec;
pub mod cart_cache;
pub mod config;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;

pub use errors::AppError;
pub use state::AppState;
