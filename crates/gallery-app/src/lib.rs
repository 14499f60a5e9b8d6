//! Headless runner for the shooting gallery.
//!
//! Wires a `GameSession` to tracing-backed render/UI sinks and a scripted
//! auto-fire input, and drives it from a dedicated game loop thread.

pub mod error;
pub mod game_loop;
pub mod input;
pub mod sinks;
pub mod state;

pub use error::AppError;
pub use gallery_core as core;
