use std::sync::Arc;

use reel_core::store::MovieStore;
use tokio_util::sync::CancellationToken;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Movie catalog store (PostgreSQL in production).
    pub store: Arc<dyn MovieStore>,
    /// Cancelled when the server starts shutting down. Handlers derive a
    /// child token per request from it.
    pub shutdown: CancellationToken,
}
