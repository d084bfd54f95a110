//! REST API over a live system configuration.
//!
//! Endpoints:
//! - `GET /state`: current system state with derived metrics
//! - `POST /events`: apply one input event
//! - `GET /compatibility`: whole-system checklist
//! - `POST /simulate`: simulate a day with the current system
//! - `GET /catalog`: reference data

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::sim::clock::wall_clock_hour;
use crate::system::SystemState;

pub use types::{ErrorResponse, EventResponse, SimulateQuery};

/// Interval between `currentGenerationW` refreshes.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Application state shared across request handlers and the refresh task.
///
/// The catalog is read-only; the system state is replaced whole on each
/// event under the lock.
pub struct AppState {
    /// Reference data the state resolves against.
    pub catalog: Catalog,
    /// Current system configuration.
    pub system: Mutex<SystemState>,
}

impl AppState {
    pub fn new(catalog: Catalog, system: SystemState) -> Self {
        Self {
            catalog,
            system: Mutex::new(system),
        }
    }

    /// Locks the system state, recovering it if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, SystemState> {
        self.system.lock().unwrap_or_else(|poisoned| {
            warn!("system state lock was poisoned");
            poisoned.into_inner()
        })
    }

    /// Refreshes the live generation reading for the current wall-clock hour.
    pub fn refresh_now(&self) {
        let hour = wall_clock_hour();
        let mut system = self.lock();
        system.refresh(hour, &mut rand::rng());
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/events", post(handlers::post_event))
        .route("/compatibility", get(handlers::get_compatibility))
        .route("/simulate", post(handlers::post_simulate))
        .route("/catalog", get(handlers::get_catalog))
        .with_state(state)
}

/// Spawns the periodic refresh task.
///
/// The first refresh runs immediately. The task runs until aborted.
pub fn spawn_refresh(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            state.refresh_now();
        }
    })
}

/// Binds to the given address and serves the API until Ctrl-C.
///
/// The refresh task is aborted once the server stops.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let refresh = spawn_refresh(Arc::clone(&state), REFRESH_PERIOD);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    refresh.abort();
    info!("API server stopped");
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
