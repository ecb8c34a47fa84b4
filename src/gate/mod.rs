//! Dispatch gate: decides, per inbound message, whether a command runs.

mod authorization;
mod config;
mod message;

pub use authorization::{AuthorizationGate, GateOutcome};
pub use config::{GateConfig, MAINTENANCE_NOTICE};
pub use message::Inbound;
