//! Observability utilities.

mod logging;
mod timing;

pub use logging::{default_level, init_logging, LogFormat};
pub use timing::SpanTimer;
