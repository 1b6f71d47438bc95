//! # Juiceflow
//!
//! A concurrent simulation of orange juice plants.
//!
//! Each plant is a chain of stage workers connected by single-slot blocking
//! channels:
//!
//! - **Single-slot handoff**: every stage boundary holds at most one orange,
//!   which gives backpressure without any explicit semaphore
//! - **Fixed stage progression**: oranges move forward one stage at a time and
//!   never past the terminal stage
//! - **Cooperative shutdown**: stopping a plant releases every blocked thread
//!   and lets workers drain before they exit
//! - **Independent plants**: a simulation runs several plants in parallel
//!   and sums their counters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use juiceflow::prelude::*;
//! use std::time::Duration;
//!
//! let config = SimulationConfig::new()
//!     .with_plants(2)
//!     .with_run_for(Duration::from_secs(1));
//!
//! let report = Simulation::new(config)?.run()?;
//! println!("{report}");
//! # Ok::<(), juiceflow::errors::PlantError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod errors;
pub mod mailbox;
pub mod observability;
pub mod pipeline;
pub mod simulation;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{DrainPolicy, PlantConfig, SimulationConfig};
    pub use crate::core::{PlantState, Stage, StageItem, StageTable};
    pub use crate::errors::{PlantError, PlantResult};
    pub use crate::mailbox::{Rejected, SingleSlotChannel};
    pub use crate::observability::{init_logging, LogFormat, SpanTimer};
    pub use crate::pipeline::{Plant, PlantReport};
    pub use crate::simulation::{Simulation, SimulationReport, SimulationTotals};
}
