//! Simulation for the shooting gallery.
//!
//! Owns the rigid-body world and the hecs entity registry, runs the spawner,
//! fire, physics, collision and cleanup systems at a fixed tick rate, and
//! produces `SessionSnapshot`s for whatever front end drives it.

pub mod archetypes;
pub mod physics;
pub mod registry;
pub mod round;
pub mod session;
pub mod systems;

pub use gallery_core as core;
pub use registry::EntityRegistry;
pub use session::GameSession;
