//! Per-tick systems.
//!
//! Systems are free functions over the registry and physics world. They keep
//! no state of their own beyond small timers owned by the session, and report
//! what happened by pushing `SessionEvent`s.

pub mod cleanup;
pub mod collision;
pub mod effects;
pub mod firing;
pub mod snapshot;
pub mod spawner;
