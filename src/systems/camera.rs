//! Camera follow system.
//!
//! Centers the scene scroll on the entity carrying
//! [`CameraFollow`], clamped so the viewport never leaves the scene.
use bevy_ecs::prelude::*;

use crate::components::bodyrect::BodyRect;
use crate::components::camerafollow::CameraFollow;
use crate::resources::scene::Scene;
use crate::resources::screensize::ScreenSize;

pub fn camera_follow(
    followers: Query<&BodyRect, With<CameraFollow>>,
    scene: Option<ResMut<Scene>>,
    screen: Res<ScreenSize>,
) {
    let Some(mut scene) = scene else {
        return;
    };
    // first follower wins if there are several
    let Some(rect) = followers.iter().next() else {
        return;
    };
    let (cx, cy) = rect.center();
    scene.scroll_x = cx - screen.w / 2;
    scene.scroll_y = cy - screen.h / 2;
    scene.clamp_scroll(screen.as_tuple());
}
