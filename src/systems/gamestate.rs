//! Mode bookkeeping that runs outside the logic schedule.
use bevy_ecs::prelude::*;
use log::info;

use crate::resources::gamestate::{GameState, GameStates, PauseSources};
use crate::resources::worldtime::WorldTime;

/// Switch between `Scene` and `ScenePaused` to match the pause sources.
pub fn sync_pause_state(world: &mut World) {
    let now = world
        .get_resource::<WorldTime>()
        .map(|t| t.now_ms)
        .unwrap_or_default();
    let paused = world
        .get_resource::<PauseSources>()
        .is_some_and(|p| p.is_paused());
    let Some(mut state) = world.get_resource_mut::<GameState>() else {
        return;
    };
    match (state.get(), paused) {
        (GameStates::Scene, true) => {
            info!("Scene paused");
            state.set(GameStates::ScenePaused, now);
        }
        (GameStates::ScenePaused, false) => {
            info!("Scene resumed");
            state.set(GameStates::Scene, now);
        }
        _ => {}
    }
}
