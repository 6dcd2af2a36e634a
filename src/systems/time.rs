//! Loop time bookkeeping.
//!
//! Keeps the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource in step with the game loop's clocks.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Publish the platform time of this loop iteration.
pub fn update_world_time(world: &mut World, now_ms: u64) {
    world.get_resource_or_insert_with(WorldTime::default).now_ms = now_ms;
}

pub fn count_step(world: &mut World) {
    world.get_resource_or_insert_with(WorldTime::default).steps += 1;
}

pub fn count_frame(world: &mut World) {
    world.get_resource_or_insert_with(WorldTime::default).frames += 1;
}
