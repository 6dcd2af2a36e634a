//! Energy drain system.
//!
//! Removes `drain_per_step` from every [`Energy`] once per logic step and
//! triggers [`EnergyDepletedEvent`] on the step the value reaches zero.
use bevy_ecs::prelude::*;

use crate::components::energy::Energy;
use crate::components::sceneobject::SceneObject;
use crate::events::energy::EnergyDepletedEvent;

pub fn drain_energy(mut query: Query<(Entity, &SceneObject, &mut Energy)>, mut commands: Commands) {
    let mut drained: Vec<(u64, Entity)> = Vec::new();
    for (entity, obj, mut energy) in query.iter_mut() {
        if energy.drain_per_step == 0 {
            continue;
        }
        let amount = energy.drain_per_step;
        if energy.deplete(amount) {
            drained.push((obj.id, entity));
        }
    }
    drained.sort_unstable();
    for (_, entity) in drained {
        commands.trigger(EnergyDepletedEvent { entity });
    }
}
