//! Scene draw order and culling, checked through the recording canvas.

use std::sync::Arc;

use bevy_ecs::prelude::*;

use tilerunner::canvas::{DrawCall, Flip, RecordingCanvas, SrcRect};
use tilerunner::components::animation::{AnimationFrame, ClipDef};
use tilerunner::components::bodyrect::BodyRect;
use tilerunner::components::energy::Energy;
use tilerunner::components::sprite::Sprite;
use tilerunner::game::{init_world, spawn_object, spawn_player};
use tilerunner::resources::gameconfig::GameConfig;
use tilerunner::resources::gamestate::{GameState, GameStates};
use tilerunner::resources::scene::{
    ParallaxLayer, ParallaxSlot, Scene, TileCell, TileLayerKind, Tileset,
};
use tilerunner::resources::spritestore::{SpriteSheet, SpriteStore};
use tilerunner::resources::templates::TemplateStore;
use tilerunner::resources::worldtime::WorldTime;
use tilerunner::systems::render::{render_frame, render_scene};

const LAYERS: [(TileLayerKind, &str); 5] = [
    (TileLayerKind::Background, "background.png"),
    (TileLayerKind::Terrain, "terrain.png"),
    (TileLayerKind::Collision, "collision.png"),
    (TileLayerKind::Objects, "objects.png"),
    (TileLayerKind::Foreground, "foreground.png"),
];

const PARALLAX: [(ParallaxSlot, &str); 3] = [
    (ParallaxSlot::Back2, "back2.png"),
    (ParallaxSlot::Back1, "back1.png"),
    (ParallaxSlot::Fore, "fore.png"),
];

fn tileset(texture: &str, first_gid: u32) -> Tileset {
    Tileset {
        name: texture.to_string(),
        texture: texture.to_string(),
        first_gid,
        tile_count: 4,
        columns: 2,
        tile_width: 16,
        tile_height: 16,
    }
}

/// Scene of `width_px`x240 with every tile layer holding one tile at cell 0,
/// each layer drawing from its own tileset.
fn layered_scene(width_px: u32) -> Scene {
    let mut scene = Scene::new(width_px, 240, 16, 16).unwrap();
    let cells = scene.cell_count();
    for (i, (kind, texture)) in LAYERS.iter().enumerate() {
        let first_gid = 1 + i as u32 * 4;
        scene.add_tileset(tileset(texture, first_gid));
        let mut layer = vec![TileCell::default(); cells];
        layer[0] = TileCell::new(first_gid);
        scene.set_layer(*kind, layer).unwrap();
    }
    for (slot, texture) in PARALLAX {
        scene.set_parallax(
            slot,
            ParallaxLayer {
                texture: texture.to_string(),
                factor: slot.default_factor(),
            },
        );
    }
    scene
}

fn canvas() -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new(320, 240);
    for (_, texture) in LAYERS {
        canvas = canvas.with_texture(texture, 32, 32);
    }
    for (_, texture) in PARALLAX {
        canvas = canvas.with_texture(texture, 320, 240);
    }
    canvas
        .with_texture("npc_a.png", 16, 16)
        .with_texture("npc_b.png", 16, 16)
        .with_texture("player.png", 64, 24)
}

fn sheet(name: &str, w: u32, h: u32) -> Arc<SpriteSheet> {
    Arc::new(SpriteSheet::new(name, Some(format!("{name}.png")), w, h))
}

fn make_world(scene: Scene) -> World {
    let mut world = init_world(GameConfig::new(), SpriteStore::new(), TemplateStore::new());
    world.insert_resource(scene);
    world.resource_mut::<GameState>().set(GameStates::Scene, 0);
    world
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scene_draws_in_fixed_layer_order() {
    let mut world = make_world(layered_scene(320));
    // player added first, still drawn after every other object
    spawn_player(
        &mut world,
        (
            BodyRect::new(100, 200, 12, 20),
            Sprite::new(sheet("player", 16, 24)),
            Energy::new(10),
        ),
    );
    spawn_object(
        &mut world,
        (BodyRect::new(40, 40, 16, 16), Sprite::new(sheet("npc_a", 16, 16))),
    );
    spawn_object(
        &mut world,
        (
            BodyRect::new(60, 40, 16, 16),
            Sprite::new(sheet("npc_b", 16, 16)),
            Energy::new(4),
        ),
    );

    let mut canvas = canvas();
    render_frame(&mut world, &mut canvas);
    assert_eq!(
        canvas.texture_sequence(),
        strings(&[
            "back2.png",
            "back1.png",
            "background.png",
            "terrain.png",
            "collision.png",
            "objects.png",
            "npc_a.png",
            "npc_b.png",
            "player.png",
            "foreground.png",
            "fore.png",
        ])
    );

    // the player's energy is drawn last as a HUD, after every image
    let last_image = canvas
        .calls
        .iter()
        .rposition(|c| matches!(c, DrawCall::Image { .. }))
        .unwrap();
    assert!(canvas.calls[last_image + 1..].iter().any(|c| matches!(
        c,
        DrawCall::Rect { x: 4, y: 4, w: 60, .. }
    )));
    // npc_b's bar sits right above its box
    assert!(canvas.calls[..last_image].iter().any(|c| matches!(
        c,
        DrawCall::Rect { x: 60, y: 36, w: 16, h: 2, .. }
    )));
}

#[test]
fn sprites_anchor_bottom_center_on_body() {
    let mut world = make_world(layered_scene(320));
    spawn_player(
        &mut world,
        (
            BodyRect::new(100, 200, 12, 20),
            Sprite::new(sheet("player", 16, 24)),
        ),
    );
    let mut canvas = canvas();
    render_scene(&mut world, &mut canvas);
    let drawn = canvas
        .images()
        .find_map(|c| match c {
            DrawCall::Image {
                texture,
                dst_x,
                dst_y,
                src,
                ..
            } if texture == "player.png" => Some((*dst_x, *dst_y, *src)),
            _ => None,
        })
        .unwrap();
    assert_eq!(drawn, (98, 196, SrcRect::new(0, 0, 16, 24)));
}

#[test]
fn empty_cells_are_skipped() {
    let mut scene = Scene::new(320, 240, 16, 16).unwrap();
    scene.add_tileset(tileset("terrain.png", 1));
    let cells = vec![TileCell::default(); scene.cell_count()];
    scene.set_layer(TileLayerKind::Terrain, cells).unwrap();
    let mut world = make_world(scene);
    let mut canvas = canvas();
    render_scene(&mut world, &mut canvas);
    assert_eq!(canvas.images().count(), 0);
}

#[test]
fn tiles_outside_viewport_are_culled() {
    let mut scene = Scene::new(640, 240, 16, 16).unwrap();
    scene.add_tileset(tileset("terrain.png", 1));
    let (gw, _) = scene.grid_size();
    let mut cells = vec![TileCell::default(); scene.cell_count()];
    // column 30 of row 2, at x = 480
    cells[2 * gw as usize + 30] = TileCell::from_raw(2 | 0x8000_0000);
    scene.set_layer(TileLayerKind::Terrain, cells).unwrap();
    let mut world = make_world(scene);

    let mut canvas = canvas();
    render_scene(&mut world, &mut canvas);
    assert_eq!(canvas.images().count(), 0);

    world.resource_mut::<Scene>().scroll_x = 320;
    render_scene(&mut world, &mut canvas);
    let calls: Vec<_> = canvas.images().cloned().collect();
    assert_eq!(
        calls,
        vec![DrawCall::Image {
            texture: "terrain.png".to_string(),
            src: SrcRect::new(16, 0, 16, 16),
            dst_x: 160,
            dst_y: 32,
            flip: Flip::horizontal(),
        }]
    );
}

#[test]
fn parallax_scrolls_by_its_factor() {
    let mut scene = Scene::new(1280, 240, 16, 16).unwrap();
    scene.set_parallax(
        ParallaxSlot::Back1,
        ParallaxLayer {
            texture: "back1.png".to_string(),
            factor: 0.5,
        },
    );
    scene.scroll_x = 100;
    let mut world = make_world(scene);
    let mut canvas = canvas();
    render_scene(&mut world, &mut canvas);
    let xs: Vec<i32> = canvas
        .images()
        .filter_map(|c| match c {
            DrawCall::Image { dst_x, .. } => Some(*dst_x),
            _ => None,
        })
        .collect();
    // 320px wide image offset by 50, tiled across the viewport
    assert_eq!(xs, vec![-50, 270]);
}

#[test]
fn paused_scene_draws_overlay_on_top() {
    let mut world = make_world(layered_scene(320));
    world
        .resource_mut::<GameState>()
        .set(GameStates::ScenePaused, 0);
    let mut canvas = canvas();
    render_frame(&mut world, &mut canvas);
    assert!(canvas.images().count() > 0);
    assert!(matches!(
        canvas.calls.last(),
        Some(DrawCall::Text { text, .. }) if text == "PAUSED"
    ));
}

#[test]
fn title_draws_no_scene() {
    let mut world = make_world(layered_scene(320));
    world.resource_mut::<GameState>().set(GameStates::Title, 0);
    let mut canvas = canvas();
    render_frame(&mut world, &mut canvas);
    assert_eq!(canvas.images().count(), 0);
    assert!(canvas
        .calls
        .iter()
        .any(|c| matches!(c, DrawCall::Text { text, .. } if text == "TILERUNNER")));
}

#[test]
fn paused_scene_holds_animation_frames() {
    let mut world = make_world(layered_scene(320));
    let frames = vec![AnimationFrame::new(0, 100), AnimationFrame::new(1, 100)];
    let walker = SpriteSheet::new("player", Some("player.png".into()), 16, 24)
        .with_mode("idle", ClipDef::new(frames, true), true);
    let player = spawn_player(
        &mut world,
        (BodyRect::new(100, 200, 12, 20), Sprite::new(Arc::new(walker))),
    )
    .unwrap();

    let mut canvas = canvas();
    render_frame(&mut world, &mut canvas);
    assert_eq!(world.get::<Sprite>(player).unwrap().clip().index(), 0);

    world
        .resource_mut::<GameState>()
        .set(GameStates::ScenePaused, 0);
    world.resource_mut::<WorldTime>().now_ms = 500;
    render_frame(&mut world, &mut canvas);
    render_frame(&mut world, &mut canvas);
    assert_eq!(world.get::<Sprite>(player).unwrap().clip().index(), 0);

    world.resource_mut::<GameState>().set(GameStates::Scene, 0);
    render_frame(&mut world, &mut canvas);
    assert_eq!(world.get::<Sprite>(player).unwrap().clip().index(), 1);
}

#[test]
fn sprite_with_unloaded_texture_is_skipped() {
    let mut world = make_world(layered_scene(320));
    // ghost.png was never given to the canvas
    spawn_object(
        &mut world,
        (
            BodyRect::new(40, 40, 16, 16),
            Sprite::new(sheet("ghost", 16, 16)),
            Energy::new(4),
        ),
    )
    .unwrap();
    let mut canvas = canvas();
    render_frame(&mut world, &mut canvas);
    assert!(!canvas.texture_sequence().iter().any(|t| t == "ghost.png"));
    // the rest of the scene and the object's bar still draw
    assert_eq!(canvas.texture_sequence().len(), 8);
    assert!(canvas
        .calls
        .iter()
        .any(|c| matches!(c, DrawCall::Rect { x: 40, y: 36, w: 16, h: 2, .. })));
}
