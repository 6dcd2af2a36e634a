//! Scene membership components.
//!
//! Every entity spawned into a scene carries a [`SceneObject`] with a
//! scene-local id. Ids grow monotonically, so sorting by id gives insertion
//! order for logic and drawing. The [`Player`] marker selects the single
//! entity that input controls and that is drawn above all other objects.

use bevy_ecs::prelude::Component;

/// Scene-local id assigned on spawn.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneObject {
    pub id: u64,
}

/// Marker for the player-controlled entity.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Name of the template an object was spawned from.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct TemplateName(pub String);
