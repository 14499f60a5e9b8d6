//! Core types and definitions for the shooting-gallery simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! ids, transforms, components, configuration, commands, events, snapshots,
//! and the collaborator traits the simulation calls out through.
//! It has no dependency on any rendering or runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod ports;
pub mod state;
pub mod types;
