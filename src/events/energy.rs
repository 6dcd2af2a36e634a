//! Energy depletion event.
//!
//! Triggered by the energy drain system the moment an entity's energy
//! reaches zero. It does not repeat while the value stays at zero.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::sceneobject::SceneObject;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyDepletedEvent {
    pub entity: Entity,
}

pub fn observe_energy_depleted(trigger: On<EnergyDepletedEvent>, objects: Query<&SceneObject>) {
    let entity = trigger.event().entity;
    match objects.get(entity) {
        Ok(obj) => info!("Scene object {} ran out of energy", obj.id),
        Err(_) => info!("Entity {:?} ran out of energy", entity),
    }
}
