//! Mock UKG REST API and union entitlements service.
//!
//! All state lives in memory behind a `tokio` `RwLock` and is lost on
//! restart. Every UKG route except the token endpoint requires a bearer
//! token issued by that endpoint.

pub mod auth;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod resource;
pub mod routes;
pub mod seed;
pub mod store;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use resource::Resource;
pub use store::{Record, Store};

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Db,
    pub token_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(store: Store, token_ttl: chrono::Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            token_ttl,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Store::default(), chrono::Duration::hours(1))
    }
}

/// UKG API router over an empty store.
pub fn app() -> Router {
    routes::router(AppState::default())
}

/// UKG API router over a store pre-loaded with the sample data.
pub fn seeded_app() -> Router {
    let mut store = Store::default();
    seed::seed(&mut store);
    routes::router(AppState::new(store, chrono::Duration::hours(1)))
}

/// Entitlements service router over its sample tables.
pub fn entitlements_app() -> Router {
    entitlements::router(entitlements::sample_db())
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, routes::router(state)).await
}

pub async fn run_entitlements(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, entitlements_app()).await
}
