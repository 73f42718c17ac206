//! Business logic handlers
//!
//! The state handler is shared by the HTTP API and the one-shot
//! `--invoke` mode of the binary.

pub mod state;
pub mod types;

// Re-export commonly used types
pub use state::StateHandler;
pub use types::{Stage, StateRequest, StateResponse};
