//! Scene bound clipping event.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::scene::Edge;

/// Fired once per edge when the physics step pushes an entity back inside
/// the scene bounds.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityClippedEvent {
    pub entity: Entity,
    pub edge: Edge,
}

pub fn observe_entity_clipped(trigger: On<EntityClippedEvent>) {
    let ev = trigger.event();
    debug!("Entity {:?} clipped at {:?} edge", ev.entity, ev.edge);
}
