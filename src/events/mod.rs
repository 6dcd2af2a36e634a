//! Event types and observers used by the engine.
//!
//! Events are triggered on the world and handled by global observers, which
//! keeps the physics and scene code free of callbacks.
//!
//! Submodules:
//! - [`clip`] – an entity was pushed back inside the scene bounds
//! - [`energy`] – an entity's energy reached zero
//! - [`scene`] – objects added to or removed from the scene
pub mod clip;
pub mod energy;
pub mod scene;
