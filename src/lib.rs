//! tilerunner library.
//!
//! This module exposes the engine's components, resources, systems, events
//! and the game loop for use in integration tests and by the binary.

pub mod canvas;
pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod gameloop;
pub mod platform;
pub mod resources;
pub mod systems;
