//! API module for the Lungcare service
//!
//! This module contains all API-related functionality.

pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::{configure, configure_docs, configure_with};

use crate::config::FailurePolicy;
use crate::core::PredictionService;

/// Shared, read-only state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub predictions: PredictionService,
    pub on_failure: FailurePolicy,
}

impl AppState {
    pub fn new(predictions: PredictionService, on_failure: FailurePolicy) -> Self {
        Self {
            predictions,
            on_failure,
        }
    }
}
