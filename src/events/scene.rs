//! Scene membership events.
//!
//! [`ObjectAddedEvent`] fires right after an entity is spawned into the scene
//! and [`ObjectRemovedEvent`] right before it is despawned, so observers can
//! still read its components.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::bodyrect::BodyRect;
use crate::components::camerafollow::CameraFollow;
use crate::components::sceneobject::SceneObject;
use crate::resources::scene::Scene;
use crate::resources::screensize::ScreenSize;

#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectAddedEvent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectRemovedEvent {
    pub entity: Entity,
}

/// Camera-follow entities remember where they entered the scene and the
/// scroll jumps straight to them.
pub fn observe_camera_follow_added(
    trigger: On<ObjectAddedEvent>,
    mut followers: Query<(&BodyRect, &mut CameraFollow)>,
    scene: Option<ResMut<Scene>>,
    screen: Option<Res<ScreenSize>>,
) {
    let entity = trigger.event().entity;
    let Ok((rect, mut follow)) = followers.get_mut(entity) else {
        return;
    };
    follow.origin = Some((rect.x, rect.y));
    let (Some(mut scene), Some(screen)) = (scene, screen) else {
        warn!("Camera follow entity {:?} added without a scene or viewport", entity);
        return;
    };
    let (cx, cy) = rect.center();
    scene.scroll_x = cx - screen.w / 2;
    scene.scroll_y = cy - screen.h / 2;
    scene.clamp_scroll(screen.as_tuple());
    debug!(
        "Camera snapped to {:?} at scroll ({}, {})",
        entity, scene.scroll_x, scene.scroll_y
    );
}

pub fn observe_object_removed(
    trigger: On<ObjectRemovedEvent>,
    objects: Query<&SceneObject>,
) {
    let entity = trigger.event().entity;
    if let Ok(obj) = objects.get(entity) {
        debug!("Removing scene object {} ({:?})", obj.id, entity);
    }
}
