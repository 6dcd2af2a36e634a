//! Input handling.
//!
//! [`apply_key_event`] routes one logical key event into the world:
//!
//! - direction keys press/release the player's [`Physics`] directions while
//!   a scene is loaded (also while paused, so a key released during pause
//!   does not stay held); the player's sprite switches mode on the spot
//! - `Confirm` leaves the intro and starts the scene from the title
//! - `Menu` quits from the title and toggles the `"menu"` pause source in
//!   a scene
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::physics::Physics;
use crate::components::sceneobject::Player;
use crate::components::sprite::Sprite;
use crate::resources::gamestate::{
    GameState, GameStates, MENU_PAUSE_SOURCE, NextGameState, PauseSources, QuitRequested,
};
use crate::resources::input::{KeyEvent, LogicalKey};
use crate::systems::animation::apply_motion_mode;

pub fn apply_key_event(world: &mut World, event: KeyEvent) {
    let mode = world
        .get_resource::<GameState>()
        .map(|s| s.get())
        .unwrap_or_default();
    debug!("Key {:?} pressed={} in {:?}", event.key, event.pressed, mode);

    if let Some(direction) = event.key.direction() {
        if matches!(mode, GameStates::Scene | GameStates::ScenePaused) {
            let mut players =
                world.query_filtered::<(&mut Physics, Option<&mut Sprite>), With<Player>>();
            for (mut physics, sprite) in players.iter_mut(world) {
                if event.pressed {
                    physics.add_direction(direction);
                } else {
                    physics.remove_direction(direction);
                }
                if let Some(mut sprite) = sprite {
                    apply_motion_mode(&physics, &mut sprite);
                }
            }
        }
        return;
    }

    if !event.pressed {
        return;
    }
    match (event.key, mode) {
        (LogicalKey::Confirm, GameStates::Intro) => request_state(world, GameStates::Title),
        (LogicalKey::Confirm, GameStates::Title) => request_state(world, GameStates::Scene),
        (LogicalKey::Menu, GameStates::Title) => world.insert_resource(QuitRequested),
        (LogicalKey::Menu, GameStates::Scene | GameStates::ScenePaused) => {
            if let Some(mut pause) = world.get_resource_mut::<PauseSources>() {
                pause.toggle(MENU_PAUSE_SOURCE);
            }
        }
        _ => {}
    }
}

fn request_state(world: &mut World, state: GameStates) {
    if let Some(mut next) = world.get_resource_mut::<NextGameState>() {
        next.set(state);
    }
}
