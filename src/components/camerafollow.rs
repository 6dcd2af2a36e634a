use bevy_ecs::prelude::Component;

/// The scene scroll follows this entity once it crosses the viewport center.
/// `origin` is captured when the entity is added to the scene.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraFollow {
    pub origin: Option<(i32, i32)>,
}
