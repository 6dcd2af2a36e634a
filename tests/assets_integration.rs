//! Loads the bundled level, sprites and templates end to end.

use std::path::PathBuf;

use bevy_ecs::prelude::*;

use tilerunner::components::bodyrect::BodyRect;
use tilerunner::components::physics::{MotionState, Physics};
use tilerunner::components::sceneobject::{Player, SceneObject, TemplateName};
use tilerunner::components::sprite::Sprite;
use tilerunner::game::{init_world, load_scene_from_files};
use tilerunner::resources::gameconfig::GameConfig;
use tilerunner::resources::scene::{ParallaxSlot, Scene, TileLayerKind};
use tilerunner::resources::spritestore::SpriteStore;
use tilerunner::resources::templates::TemplateStore;
use tilerunner::systems::logic_schedule;

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn load_world() -> World {
    let mut config = GameConfig::with_path(asset("config.ini"));
    config.load_from_file().unwrap();
    let sprites = SpriteStore::load_from_file(asset("assets/sprites.json")).unwrap();
    let templates = TemplateStore::load_from_file(asset("assets/entities.json")).unwrap();
    templates.validate(&sprites).unwrap();

    let mut world = init_world(config, sprites, templates);
    load_scene_from_files(&mut world, &asset("assets/level1.json")).unwrap();
    world
}

#[test]
fn sample_config_matches_defaults() {
    let mut config = GameConfig::with_path(asset("config.ini"));
    config.load_from_file().unwrap();
    assert_eq!(config.step_ms, 300);
    assert_eq!(config.draw_interval_ms(), 33);
    assert_eq!(config.render_size(), (320, 240));
    assert_eq!(config.map_path, PathBuf::from("assets/level1.json"));
}

#[test]
fn sample_level_builds_every_layer() {
    let world = load_world();
    let scene = world.resource::<Scene>();
    assert_eq!(scene.grid_size(), (40, 15));
    for kind in [
        TileLayerKind::Background,
        TileLayerKind::Terrain,
        TileLayerKind::Collision,
        TileLayerKind::Objects,
        TileLayerKind::Foreground,
    ] {
        assert!(scene.layer(kind).is_some(), "missing layer {:?}", kind);
    }
    for slot in [ParallaxSlot::Back2, ParallaxSlot::Back1, ParallaxSlot::Fore] {
        assert!(scene.parallax(slot).is_some(), "missing parallax {:?}", slot);
    }
    assert!(scene.collision().is_solid(0, 14));
    assert!(scene.collision().is_solid(25, 12));
    assert!(!scene.collision().is_solid(0, 0));
    assert_eq!(scene.tilesets().len(), 2);
}

#[test]
fn sample_level_spawns_templates() {
    let mut world = load_world();
    let mut objects = world.query::<(&SceneObject, &TemplateName, Has<Player>)>();
    let mut spawned: Vec<(u64, String, bool)> = objects
        .iter(&world)
        .map(|(o, t, p)| (o.id, t.0.clone(), p))
        .collect();
    spawned.sort();
    assert_eq!(
        spawned,
        vec![
            (0, "hero".to_string(), true),
            (1, "slime".to_string(), false),
            (2, "slime".to_string(), false),
        ]
    );

    let mut players = world.query_filtered::<(&BodyRect, &Sprite), With<Player>>();
    let (rect, sprite) = players.single(&world).unwrap();
    assert_eq!(*rect, BodyRect::new(48, 150, 12, 22));
    assert_eq!(sprite.mode(), "idle");
}

#[test]
fn hero_falls_onto_the_floor() {
    let mut world = load_world();
    let mut schedule = logic_schedule();
    for _ in 0..20 {
        schedule.run(&mut world);
    }
    let mut players = world.query_filtered::<(&BodyRect, &Physics), With<Player>>();
    let (rect, physics) = players.single(&world).unwrap();
    // floor row 14 starts at y = 224
    assert_eq!(rect.bottom(), 224);
    assert_eq!(physics.state, MotionState::Grounded);
}
