//! Animation mode selection.
//!
//! The sprite's animation mode is derived from physics state after the
//! physics step, and right away when a key changes the player's directions:
//!
//! - falling shows `fall`
//! - a held horizontal direction shows `run`
//! - anything else shows `idle`
//!
//! Facing left mirrors the sprite. Frame advance itself is lazy and happens
//! when the sprite is drawn, see
//! [`AnimationClip::current_frame`](crate::components::animation::AnimationClip::current_frame).

use bevy_ecs::prelude::*;

use crate::components::physics::{Facing, Physics};
use crate::components::sprite::Sprite;

pub fn sync_sprite_mode(mut query: Query<(&Physics, &mut Sprite)>) {
    for (physics, mut sprite) in query.iter_mut() {
        apply_motion_mode(physics, &mut sprite);
    }
}

/// Point `sprite` at the mode and facing `physics` asks for.
pub fn apply_motion_mode(physics: &Physics, sprite: &mut Sprite) {
    sprite.set_mode(physics.motion_mode());
    sprite.flip_h = physics.facing == Facing::Left;
}
