//! Engine systems.
//!
//! The logic step is a [`Schedule`](bevy_ecs::schedule::Schedule) built by
//! [`logic_schedule`]; the remaining modules hold functions the game loop
//! calls directly with the world.
//!
//! Submodules overview
//! - [`animation`] – derive sprite mode and mirroring from physics state
//! - [`camera`] – keep the scene scroll on the followed entity
//! - [`energy`] – per-step energy drain and depletion events
//! - [`gamestate`] – switch between running and paused scene modes
//! - [`input`] – route logical key events into the world
//! - [`physics`] – gravity, lateral movement and scene clamping
//! - [`render`] – draw the current mode through a canvas
//! - [`time`] – publish loop time and step/frame counters

use bevy_ecs::prelude::*;

pub mod animation;
pub mod camera;
pub mod energy;
pub mod gamestate;
pub mod input;
pub mod physics;
pub mod render;
pub mod time;

/// One logic step: physics (player first, then objects by id), sprite mode
/// sync, energy drain, camera follow.
pub fn logic_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            physics::scene_physics,
            animation::sync_sprite_mode,
            energy::drain_energy,
            camera::camera_follow,
        )
            .chain(),
    );
    schedule
}
