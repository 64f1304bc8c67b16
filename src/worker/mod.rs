//! Command dispatch and per-command processing

pub mod dispatcher;
pub mod pipeline;
pub mod tracker;

// Re-export main types for convenience
pub use dispatcher::CommandDispatcher;
pub use pipeline::Pipeline;
pub use tracker::{InFlight, InFlightGuard};
