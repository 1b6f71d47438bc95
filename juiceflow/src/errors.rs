//! Error types for the juiceflow plant simulation.
//!
//! Only a few of these ever cross the public API. Waits on channels and
//! simulated work never surface errors; a stopped channel is reported through
//! return values instead.

use crate::core::{PlantState, Stage};
use thiserror::Error;

/// The main error type for juiceflow operations.
#[derive(Debug, Error)]
pub enum PlantError {
    /// An item was asked to advance past the terminal stage.
    ///
    /// This is an invariant violation in the orchestration, never a
    /// retryable condition.
    #[error("Invalid transition: item {item_id} is already at terminal stage {stage}")]
    InvalidTransition {
        /// The item's sequence number.
        item_id: u64,
        /// The stage the item was in.
        stage: Stage,
    },

    /// A lifecycle operation was called in the wrong state.
    #[error("Plant {plant_id}: cannot {operation} while {state}")]
    Lifecycle {
        /// The plant identifier.
        plant_id: usize,
        /// The operation attempted.
        operation: &'static str,
        /// The state the plant was in.
        state: PlantState,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A producer or worker thread panicked.
    #[error("Thread '{thread}' panicked: {message}")]
    ThreadPanicked {
        /// The thread name.
        thread: String,
        /// The panic payload, if it was a string.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlantError {
    /// Creates an invalid transition error.
    #[must_use]
    pub fn invalid_transition(item_id: u64, stage: Stage) -> Self {
        Self::InvalidTransition { item_id, stage }
    }

    /// Creates a lifecycle error.
    #[must_use]
    pub fn lifecycle(plant_id: usize, operation: &'static str, state: PlantState) -> Self {
        Self::Lifecycle {
            plant_id,
            operation,
            state,
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a thread panicked error from a join payload.
    #[must_use]
    pub fn thread_panicked(thread: impl Into<String>, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());

        Self::ThreadPanicked {
            thread: thread.into(),
            message,
        }
    }

    /// Returns true if this error indicates a defect rather than misuse or
    /// an environmental failure.
    #[must_use]
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. } | Self::ThreadPanicked { .. })
    }
}

/// Result alias for juiceflow operations.
pub type PlantResult<T> = Result<T, PlantError>;
