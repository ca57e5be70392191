//! Core types and service wiring for the recyfind recycling center locator.

/// Minutes-since-midnight clock values and their display format.
pub mod clock;
/// Location presenter deriving display strings and distances from raw records.
pub mod location;
/// Domain models and identifiers shared by all sources.
pub mod model;
/// Registry and helpers for plugging region-specific sources into the service.
pub mod plugin;
/// Traits describing the source interfaces.
pub mod ports;
/// Weekly schedule text parsing and evaluation.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;
/// Application state snapshots and the reducer that advances them.
pub mod state;

pub use clock::*;
pub use location::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use schedule::*;
pub use service::*;
pub use state::*;
