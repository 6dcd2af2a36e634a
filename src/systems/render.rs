//! Scene rendering.
//!
//! Renders the world through a [`Canvas`] so the same code drives the raylib
//! window and the recording canvas used in tests. The draw order of a scene
//! is fixed:
//!
//! 1. `s_background2` and `s_background` parallax images
//! 2. `background`, `terrain`, `collision` and `objects` tile layers
//! 3. non-player scene objects in id order, each followed by its energy bar
//! 4. the player
//! 5. the `foreground` tile layer and the `s_foreground` parallax image
//! 6. the player's energy bar as a HUD
//!
//! Mode overlays (intro, title, paused) are drawn by [`render_frame`].
use bevy_ecs::prelude::*;
use log::warn;

use crate::canvas::{Canvas, Flip, Rgba, SrcRect};
use crate::components::bodyrect::BodyRect;
use crate::components::energy::Energy;
use crate::components::sceneobject::{Player, SceneObject};
use crate::components::sprite::Sprite;
use crate::resources::gamestate::{GameState, GameStates};
use crate::resources::scene::{ParallaxSlot, Scene, TileLayerKind};
use crate::resources::worldtime::WorldTime;

const TITLE_TEXT: &str = "TILERUNNER";
const PRESS_START_TEXT: &str = "press enter to start";
const PAUSED_TEXT: &str = "PAUSED";

const TEXT_COLOR: Rgba = [255, 255, 255, 255];
const DIM_COLOR: Rgba = [0, 0, 0, 140];
const BAR_BACK: Rgba = [40, 40, 40, 255];
const BAR_FRONT: Rgba = [220, 40, 40, 255];
const HUD_FRONT: Rgba = [60, 200, 60, 255];

/// Tile layers drawn below the scene objects, in order.
const LAYERS_BELOW_OBJECTS: [TileLayerKind; 4] = [
    TileLayerKind::Background,
    TileLayerKind::Terrain,
    TileLayerKind::Collision,
    TileLayerKind::Objects,
];

/// Draw whatever the current mode shows.
pub fn render_frame(world: &mut World, canvas: &mut dyn Canvas) {
    let mode = world
        .get_resource::<GameState>()
        .map(|s| s.get())
        .unwrap_or_default();
    let (vw, vh) = canvas.viewport_size();
    match mode {
        GameStates::None => {}
        GameStates::Intro => {
            draw_centered_text(canvas, TITLE_TEXT, vh / 2 - 10, 20);
        }
        GameStates::Title => {
            draw_centered_text(canvas, TITLE_TEXT, vh / 3, 20);
            draw_centered_text(canvas, PRESS_START_TEXT, vh / 3 + 40, 10);
        }
        GameStates::Scene => render_scene(world, canvas),
        GameStates::ScenePaused => {
            render_scene(world, canvas);
            canvas.fill_rect(0, 0, vw, vh, DIM_COLOR);
            draw_centered_text(canvas, PAUSED_TEXT, vh / 2 - 10, 20);
        }
    }
}

fn draw_centered_text(canvas: &mut dyn Canvas, text: &str, y: i32, size: i32) {
    let (vw, _) = canvas.viewport_size();
    // rough width estimate for the default raylib font
    let width = text.len() as i32 * size * 3 / 5;
    canvas.draw_text(text, (vw - width) / 2, y, size, TEXT_COLOR);
}

/// Draw the scene resource and its objects. No-op without a scene.
pub fn render_scene(world: &mut World, canvas: &mut dyn Canvas) {
    if !world.contains_resource::<Scene>() {
        warn!("render_scene called without a scene");
        return;
    }
    let now_ms = world
        .get_resource::<WorldTime>()
        .map(|t| t.now_ms)
        .unwrap_or_default();
    // animations hold their frame behind the pause overlay
    let clock = match world.get_resource::<GameState>().map(|s| s.get()) {
        Some(GameStates::ScenePaused) => None,
        _ => Some(now_ms),
    };

    world.resource_scope(|world, scene: Mut<Scene>| {
        draw_parallax(&scene, ParallaxSlot::Back2, canvas);
        draw_parallax(&scene, ParallaxSlot::Back1, canvas);
        for kind in LAYERS_BELOW_OBJECTS {
            draw_tile_layer(&scene, kind, canvas);
        }

        let mut objects = world.query::<(
            &SceneObject,
            &BodyRect,
            Option<&mut Sprite>,
            Option<&Energy>,
            Has<Player>,
        )>();
        let mut drawn: Vec<_> = objects.iter_mut(world).collect();
        drawn.sort_by_key(|(obj, _, _, _, is_player)| (*is_player, obj.id));

        let mut hud: Option<Energy> = None;
        for (_, rect, sprite, energy, is_player) in drawn {
            if let Some(mut sprite) = sprite {
                draw_sprite(&scene, rect, &mut sprite, canvas, clock);
            }
            match energy {
                Some(energy) if is_player => hud = Some(*energy),
                Some(energy) => draw_energy_bar(&scene, rect, energy, canvas),
                None => {}
            }
        }

        draw_tile_layer(&scene, TileLayerKind::Foreground, canvas);
        draw_parallax(&scene, ParallaxSlot::Fore, canvas);

        if let Some(energy) = hud {
            draw_hud(&energy, canvas);
        }
    });
}

fn draw_parallax(scene: &Scene, slot: ParallaxSlot, canvas: &mut dyn Canvas) {
    let Some(layer) = scene.parallax(slot) else {
        return;
    };
    let Some((tex_w, tex_h)) = canvas.texture_size(&layer.texture) else {
        return;
    };
    if tex_w <= 0 {
        return;
    }
    let (vw, _) = canvas.viewport_size();
    let offset = (scene.scroll_x as f32 * layer.factor) as i32;
    let mut x = -offset.rem_euclid(tex_w);
    let src = SrcRect::new(0, 0, tex_w, tex_h);
    while x < vw {
        canvas.draw_image(&layer.texture, src, x, 0, Flip::NONE);
        x += tex_w;
    }
}

fn draw_tile_layer(scene: &Scene, kind: TileLayerKind, canvas: &mut dyn Canvas) {
    let Some(layer) = scene.layer(kind) else {
        return;
    };
    let (gw, gh) = scene.grid_size();
    if gw == 0 || gh == 0 {
        return;
    }
    let (vw, vh) = canvas.viewport_size();
    let tw = scene.tile_width as i32;
    let th = scene.tile_height as i32;

    // visible cell range
    let x0 = (scene.scroll_x.div_euclid(tw)).max(0);
    let y0 = (scene.scroll_y.div_euclid(th)).max(0);
    let x1 = ((scene.scroll_x + vw - 1).div_euclid(tw)).min(gw as i32 - 1);
    let y1 = ((scene.scroll_y + vh - 1).div_euclid(th)).min(gh as i32 - 1);

    for gy in y0..=y1 {
        for gx in x0..=x1 {
            let cell = layer.cells[(gy as usize) * gw as usize + gx as usize];
            let Some((tileset, local)) = scene.resolve_gid(cell.gid) else {
                continue;
            };
            let src = SrcRect::grid_cell(
                local,
                tileset.columns,
                tileset.tile_width,
                tileset.tile_height,
            );
            // oversized tiles are anchored to the bottom of their cell
            let dst_x = gx * tw - scene.scroll_x;
            let dst_y = gy * th + th - tileset.tile_height as i32 - scene.scroll_y;
            canvas.draw_image(&tileset.texture, src, dst_x, dst_y, cell.flip);
        }
    }
}

/// Sprites are anchored bottom-center on their body box. Without a clock
/// the current frame is held.
fn draw_sprite(
    scene: &Scene,
    rect: &BodyRect,
    sprite: &mut Sprite,
    canvas: &mut dyn Canvas,
    clock: Option<u64>,
) {
    let fw = sprite.sheet.frame_width as i32;
    let fh = sprite.sheet.frame_height as i32;
    let x = rect.x + (rect.w - fw) / 2 - scene.scroll_x;
    let y = rect.y + rect.h - fh - scene.scroll_y;
    let flip = if sprite.flip_h {
        Flip::horizontal()
    } else {
        Flip::NONE
    };
    match clock {
        Some(now_ms) => sprite.render(canvas, x, y, flip, now_ms),
        None => sprite.render_held(canvas, x, y, flip),
    }
}

fn draw_energy_bar(scene: &Scene, rect: &BodyRect, energy: &Energy, canvas: &mut dyn Canvas) {
    let x = rect.x - scene.scroll_x;
    let y = rect.y - scene.scroll_y - 4;
    canvas.fill_rect(x, y, rect.w, 2, BAR_BACK);
    let filled = (rect.w as f32 * energy.ratio()).round() as i32;
    if filled > 0 {
        canvas.fill_rect(x, y, filled, 2, BAR_FRONT);
    }
}

fn draw_hud(energy: &Energy, canvas: &mut dyn Canvas) {
    const X: i32 = 4;
    const Y: i32 = 4;
    const W: i32 = 60;
    const H: i32 = 4;
    canvas.fill_rect(X, Y, W, H, BAR_BACK);
    let filled = (W as f32 * energy.ratio()).round() as i32;
    if filled > 0 {
        canvas.fill_rect(X, Y, filled, H, HUD_FRONT);
    }
}
