//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::system::{Output, SystemState};

/// Result of a successfully applied event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// What the event produced.
    pub output: Output,
    /// State after the event.
    pub state: SystemState,
}

/// Optional query parameters for the simulate endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateQuery {
    /// Seed for a reproducible day; a fresh random source otherwise.
    pub seed: Option<u64>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
