//! Game setup and scene lifecycle.
//!
//! Builds the world the game loop owns, registers the global observers and
//! moves scene objects in and out of the scene. Every entity that joins a
//! scene gets the next [`SceneObject`] id and triggers
//! [`ObjectAddedEvent`]; removing it triggers [`ObjectRemovedEvent`] before
//! the despawn.
use std::path::Path;

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::bodyrect::BodyRect;
use crate::components::camerafollow::CameraFollow;
use crate::components::energy::Energy;
use crate::components::physics::Physics;
use crate::components::sceneobject::{Player, SceneObject, TemplateName};
use crate::components::sprite::Sprite;
use crate::error::LoadError;
use crate::events::clip::observe_entity_clipped;
use crate::events::energy::observe_energy_depleted;
use crate::events::scene::{
    ObjectAddedEvent, ObjectRemovedEvent, observe_camera_follow_added, observe_object_removed,
};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, NextGameState, PauseSources};
use crate::resources::scene::Scene;
use crate::resources::screensize::ScreenSize;
use crate::resources::spritestore::SpriteStore;
use crate::resources::templates::{EntityTemplate, TemplateStore};
use crate::resources::tilemap::load_map_file;
use crate::resources::worldtime::WorldTime;

/// World with every resource the loop and its systems expect.
pub fn init_world(config: GameConfig, sprites: SpriteStore, templates: TemplateStore) -> World {
    let mut world = World::new();
    let (w, h) = config.render_size();
    world.insert_resource(ScreenSize::new(w, h));
    world.insert_resource(config);
    world.insert_resource(sprites);
    world.insert_resource(templates);
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());
    world.insert_resource(PauseSources::new());
    world.insert_resource(WorldTime::default());
    register_observers(&mut world);
    world
}

pub fn register_observers(world: &mut World) {
    world.add_observer(observe_camera_follow_added);
    world.add_observer(observe_object_removed);
    world.add_observer(observe_entity_clipped);
    world.add_observer(observe_energy_depleted);
    world.flush();
}

fn spawn_untriggered(world: &mut World, bundle: impl Bundle) -> Option<Entity> {
    let id = {
        let Some(mut scene) = world.get_resource_mut::<Scene>() else {
            warn!("Cannot spawn a scene object without a scene");
            return None;
        };
        scene.allocate_object_id()
    };
    Some(world.spawn((SceneObject { id }, bundle)).id())
}

/// Spawn `bundle` as the next scene object.
pub fn spawn_object(world: &mut World, bundle: impl Bundle) -> Option<Entity> {
    let entity = spawn_untriggered(world, bundle)?;
    world.trigger(ObjectAddedEvent { entity });
    Some(entity)
}

/// Spawn `bundle` as the player: a scene object the camera follows.
pub fn spawn_player(world: &mut World, bundle: impl Bundle) -> Option<Entity> {
    spawn_object(world, (Player, CameraFollow::default(), bundle))
}

/// Remove a scene object. Entities that are not scene objects are left alone.
pub fn remove_object(world: &mut World, entity: Entity) -> bool {
    if world.get::<SceneObject>(entity).is_none() {
        warn!("Entity {:?} is not a scene object, not removing it", entity);
        return false;
    }
    world.trigger(ObjectRemovedEvent { entity });
    world.despawn(entity)
}

/// Remove every scene object (in id order) and then the scene itself.
pub fn unload_scene(world: &mut World) {
    let mut query = world.query::<(Entity, &SceneObject)>();
    let mut objects: Vec<(u64, Entity)> = query.iter(world).map(|(e, o)| (o.id, e)).collect();
    objects.sort_unstable();
    for (_, entity) in &objects {
        remove_object(world, *entity);
    }
    if world.remove_resource::<Scene>().is_some() {
        info!("Unloaded scene ({} objects)", objects.len());
    }
}

/// Spawn an entity described by `template` with its box top-left at `(x, y)`.
pub fn spawn_from_template(
    world: &mut World,
    name: &str,
    template: &EntityTemplate,
    x: i32,
    y: i32,
) -> Option<Entity> {
    let default_momentum = world
        .get_resource::<GameConfig>()
        .map(|c| c.momentum)
        .unwrap_or_default();
    let sheet = match &template.sprite {
        Some(sprite) => {
            let sheet = world
                .get_resource::<SpriteStore>()
                .and_then(|store| store.get(sprite));
            if sheet.is_none() {
                warn!("Template '{}' uses unknown sprite '{}'", name, sprite);
            }
            sheet
        }
        None => None,
    };

    let entity = spawn_untriggered(
        world,
        (
            TemplateName(name.to_string()),
            BodyRect::new(x, y, template.width, template.height),
            Physics::new(
                template.momentum.unwrap_or(default_momentum),
                template.gravity,
            ),
        ),
    )?;
    let mut entity_mut = world.entity_mut(entity);
    if let Some(sheet) = sheet {
        entity_mut.insert(Sprite::new(sheet));
    }
    if let Some(max) = template.energy {
        entity_mut.insert(Energy::new(max).with_drain(template.energy_drain));
    }
    if template.player {
        entity_mut.insert((Player, CameraFollow::default()));
    }
    world.trigger(ObjectAddedEvent { entity });
    Some(entity)
}

/// Replace the current scene with the map at `map_path` and spawn its objects.
///
/// The previous scene is only unloaded once the new map parsed, so a broken
/// map leaves the world as it was.
pub fn load_scene_from_files(world: &mut World, map_path: &Path) -> Result<(), LoadError> {
    let (scene, spawns) = load_map_file(map_path)?;
    unload_scene(world);
    world.insert_resource(scene);

    let templates = world
        .get_resource::<TemplateStore>()
        .cloned()
        .unwrap_or_default();
    let mut spawned = 0usize;
    for request in spawns {
        match templates.get(&request.template) {
            Some(template) => {
                if spawn_from_template(world, &request.template, template, request.x, request.y)
                    .is_some()
                {
                    spawned += 1;
                }
            }
            None => warn!(
                "Map object at ({}, {}) uses unknown template '{}'",
                request.x, request.y, request.template
            ),
        }
    }
    info!("Scene {} ready with {} objects", map_path.display(), spawned);
    Ok(())
}
