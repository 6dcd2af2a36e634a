//! Per-step entity physics.
//!
//! [`scene_physics`] moves every scene object that has [`Physics`] once per
//! logic step, against the scene's collision map:
//!
//! 1. gravity pulls the box down by `gravity_rate * 4 * gravity` pixels, in
//!    sub-steps of at most one tile so it lands on the first solid row;
//! 2. a held horizontal direction moves it by its momentum, stopping flush
//!    against a solid column;
//! 3. the box is clamped to the scene bounds and an
//!    [`EntityClippedEvent`] fires for every edge it was pushed off.
//!
//! The player is processed first, then the other objects in id order.
use bevy_ecs::prelude::*;

use crate::components::bodyrect::BodyRect;
use crate::components::physics::{Direction, MotionState, Physics};
use crate::components::sceneobject::{Player, SceneObject};
use crate::events::clip::EntityClippedEvent;
use crate::resources::gameconfig::GameConfig;
use crate::resources::scene::{Edge, Scene};

/// Pixels fallen per step for a gravity factor of 1 at `gravity_rate` 1.
pub const FALL_PIXELS_PER_STEP: i32 = 4;

pub fn scene_physics(
    mut objects: Query<(Entity, &SceneObject, &mut BodyRect, &mut Physics, Has<Player>)>,
    scene: Option<Res<Scene>>,
    config: Res<GameConfig>,
    mut commands: Commands,
) {
    let Some(scene) = scene else {
        return;
    };

    let mut order: Vec<(bool, u64, Entity)> = objects
        .iter()
        .map(|(entity, obj, _, _, is_player)| (!is_player, obj.id, entity))
        .collect();
    order.sort_unstable();

    for (_, _, entity) in order {
        let Ok((_, _, mut rect, mut physics, _)) = objects.get_mut(entity) else {
            continue;
        };
        let clipped = step_body(&scene, &mut rect, &mut physics, config.gravity_rate);
        for edge in clipped {
            commands.trigger(EntityClippedEvent { entity, edge });
        }
    }
}

/// Advance one body by one step. Returns the scene edges it was clipped to.
pub fn step_body(
    scene: &Scene,
    rect: &mut BodyRect,
    physics: &mut Physics,
    gravity_rate: i32,
) -> Vec<Edge> {
    apply_gravity(scene, rect, physics, gravity_rate);
    apply_lateral(scene, rect, physics);
    scene.clamp_rect(rect)
}

fn apply_gravity(scene: &Scene, rect: &mut BodyRect, physics: &mut Physics, gravity_rate: i32) {
    if physics.gravity > 0 && !scene.collides_ground(rect) {
        physics.state = MotionState::Falling;
        let th = scene.tile_height as i32;
        let mut remaining = gravity_rate * FALL_PIXELS_PER_STEP * physics.gravity;
        while remaining > 0 && !scene.collides_ground(rect) {
            // never cross more than one row boundary per sub-step
            let to_boundary = th - rect.bottom().rem_euclid(th);
            let dy = remaining.min(to_boundary);
            rect.y += dy;
            remaining -= dy;
        }
    } else if physics.is_falling() {
        physics.state = MotionState::Grounded;
    }
}

fn apply_lateral(scene: &Scene, rect: &mut BodyRect, physics: &Physics) {
    if physics.momentum <= 0 {
        return;
    }
    let Some(direction) = physics.directions.horizontal() else {
        return;
    };
    let tw = scene.tile_width as i32;
    let mut remaining = physics.momentum;
    while remaining > 0 && !scene.collides_wall(direction, rect) {
        let to_boundary = match direction {
            Direction::Right => tw - rect.right().rem_euclid(tw),
            _ => match rect.x.rem_euclid(tw) {
                0 => tw,
                r => r,
            },
        };
        let dx = remaining.min(to_boundary);
        rect.x += if direction == Direction::Left { -dx } else { dx };
        remaining -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::scene::{TileCell, TileLayerKind};

    /// 8x4 tiles of 16px, bottom row solid, a wall block at column 5 row 2.
    fn scene() -> Scene {
        let mut scene = Scene::new(128, 64, 16, 16).unwrap();
        let mut gids = vec![0u32; 32];
        for x in 0..8 {
            gids[3 * 8 + x] = 1;
        }
        gids[2 * 8 + 5] = 1;
        scene
            .set_layer(
                TileLayerKind::Collision,
                gids.into_iter().map(TileCell::new).collect(),
            )
            .unwrap();
        scene
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let scene = scene();
        let mut rect = BodyRect::new(0, 20, 16, 16);
        let mut p = Physics::new(0, 1);
        // 8px per step with gravity_rate 2
        step_body(&scene, &mut rect, &mut p, 2);
        assert_eq!(rect.y, 28);
        assert!(p.is_falling());
        step_body(&scene, &mut rect, &mut p, 2);
        // floor top is y=48, box is 16 high
        assert_eq!(rect.y, 32);
        step_body(&scene, &mut rect, &mut p, 2);
        assert_eq!(rect.y, 32);
        assert_eq!(p.state, MotionState::Grounded);
    }

    #[test]
    fn test_large_fall_snaps_to_first_solid_row() {
        let scene = scene();
        let mut rect = BodyRect::new(0, 0, 16, 16);
        let mut p = Physics::new(0, 50);
        step_body(&scene, &mut rect, &mut p, 1);
        assert_eq!(rect.y, 32);
    }

    #[test]
    fn test_zero_gravity_never_falls() {
        let scene = scene();
        let mut rect = BodyRect::new(0, 0, 16, 16);
        let mut p = Physics::new(0, 0);
        step_body(&scene, &mut rect, &mut p, 1);
        assert_eq!(rect.y, 0);
        assert_eq!(p.state, MotionState::Grounded);
    }

    #[test]
    fn test_moves_until_flush_with_wall() {
        let scene = scene();
        let mut rect = BodyRect::new(60, 32, 16, 16);
        let mut p = Physics::new(5, 1);
        p.add_direction(Direction::Right);
        step_body(&scene, &mut rect, &mut p, 1);
        // wall column 5 starts at x=80
        assert_eq!(rect.x, 64);
        step_body(&scene, &mut rect, &mut p, 1);
        assert_eq!(rect.x, 64);
    }

    #[test]
    fn test_moves_left_across_tile_boundary() {
        let scene = scene();
        let mut rect = BodyRect::new(18, 32, 16, 16);
        let mut p = Physics::new(5, 1);
        p.add_direction(Direction::Left);
        step_body(&scene, &mut rect, &mut p, 1);
        assert_eq!(rect.x, 13);
    }

    #[test]
    fn test_clamped_at_scene_edge() {
        let scene = Scene::new(256, 64, 16, 16).unwrap();
        let mut rect = BodyRect::new(250, 0, 16, 16);
        let mut p = Physics::new(5, 0);
        p.add_direction(Direction::Right);
        let clipped = step_body(&scene, &mut rect, &mut p, 1);
        assert_eq!(rect.x, 240);
        assert_eq!(clipped, vec![Edge::Right]);
    }
}
