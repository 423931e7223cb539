// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use product_catalog::cart_cache::{CartCache, CartStore, MemoryCartStore, RedisCartStore};
use product_catalog::config::Config;
use product_catalog::repository::PgProductRepository;
use product_catalog::routes::create_router;
use product_catalog::state::AppState;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    // --- Database pool ---
    let pool = match PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(config.db_idle_timeout)
        .max_lifetime(config.db_max_lifetime)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("Could not connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    // --- Cart store ---
    let cart_store: Arc<dyn CartStore> = match config.redis_url.as_deref() {
        Some(redis_url) => match RedisCartStore::connect(redis_url).await {
            Ok(store) => {
                tracing::info!("Connected to Redis");
                Arc::new(store)
            }
            Err(err) => {
                tracing::error!("Could not connect to Redis: {}", err);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("REDIS_URL not set, carts are kept in process memory");
            Arc::new(MemoryCartStore::default())
        }
    };

    let app_state = AppState::new(
        Arc::new(PgProductRepository::new(pool)),
        CartCache::new(cart_store),
    );
    let app = create_router(app_state, config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Could not bind {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
