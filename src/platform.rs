//! raylib platform.
//!
//! [`RaylibPlatform`] opens the window, owns the textures and turns keyboard
//! and focus state into [`PlatformEvent`]s. Frames are drawn into a render
//! texture at the configured render resolution and scaled to the window with
//! letterboxing. [`RaylibCanvas`] is the [`Canvas`] implementation used for
//! that.
use std::time::Duration;

use bevy_ecs::prelude::World;
use log::{debug, error, info};
use raylib::prelude::*;

use crate::canvas::{Canvas, Flip, Rgba, SrcRect};
use crate::error::LoadError;
use crate::gameloop::{Platform, PlatformEvent};
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::scene::Scene;
use crate::resources::spritestore::SpriteStore;
use crate::resources::texturestore::TextureStore;
use crate::systems::render::render_frame;

/// Longest single sleep between loop iterations, so input stays responsive.
const MAX_IDLE_MS: u64 = 4;

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    target: RenderTexture2D,
    render_size: (u32, u32),
    textures: TextureStore,
    input: InputState,
    focused: bool,
}

impl RaylibPlatform {
    pub fn new(config: &GameConfig) -> Result<Self, String> {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .resizable()
            .title(&config.window_title)
            .build();
        // Escape is the menu key, not a quit shortcut
        rl.set_exit_key(None);

        let target = rl
            .load_render_texture(&thread, config.render_width, config.render_height)
            .map_err(|e| format!("Failed to create render texture: {}", e))?;
        unsafe {
            ffi::SetTextureFilter(
                target.texture,
                ffi::TextureFilter::TEXTURE_FILTER_POINT as i32,
            );
        }
        info!(
            "Window {}x{}, render {}x{}",
            config.window_width, config.window_height, config.render_width, config.render_height
        );

        Ok(Self {
            rl,
            thread,
            target,
            render_size: (config.render_width, config.render_height),
            textures: TextureStore::new(),
            input: InputState::default(),
            focused: true,
        })
    }

    fn load_texture(&mut self, key: &str) -> Result<(), LoadError> {
        if self.textures.contains(key) {
            return Ok(());
        }
        let texture = self
            .rl
            .load_texture(&self.thread, key)
            .map_err(|e| LoadError::Texture {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!("Loaded texture {} ({}x{})", key, texture.width, texture.height);
        self.textures.insert(key, texture);
        Ok(())
    }
}

impl Platform for RaylibPlatform {
    fn now_ms(&self) -> u64 {
        (self.rl.get_time() * 1000.0) as u64
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        // input is otherwise only refreshed at the end of a drawn frame
        unsafe {
            ffi::PollInputEvents();
        }
        let mut events = Vec::new();
        if self.rl.window_should_close() {
            events.push(PlatformEvent::CloseRequested);
        }
        let focused = self.rl.is_window_focused();
        if focused != self.focused {
            self.focused = focused;
            events.push(if focused {
                PlatformEvent::FocusGained
            } else {
                PlatformEvent::FocusLost
            });
        }
        let rl = &self.rl;
        events.extend(
            self.input
                .update(|key| rl.is_key_down(key))
                .into_iter()
                .map(PlatformEvent::Key),
        );
        events
    }

    fn prepare_scene(&mut self, scene: &Scene, sprites: &SpriteStore) -> Result<(), LoadError> {
        let mut keys = scene.texture_keys();
        keys.extend(sprites.texture_keys());
        keys.sort();
        keys.dedup();
        self.textures.retain_keys(&keys);
        // a missing image only blanks what uses it, the scene still runs
        for key in &keys {
            if let Err(e) = self.load_texture(key) {
                error!("{}", e);
            }
        }
        info!("{} of {} textures ready", self.textures.map.len(), keys.len());
        Ok(())
    }

    fn render(&mut self, world: &mut World) {
        let window = (self.rl.get_screen_width(), self.rl.get_screen_height());
        let dest = letterbox(window, self.render_size);
        let source = Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.render_size.0 as f32,
            height: -(self.render_size.1 as f32),
        };
        let size = (self.render_size.0 as i32, self.render_size.1 as i32);

        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);
        {
            let mut t = d.begin_texture_mode(&self.thread, &mut self.target);
            t.clear_background(Color::BLACK);
            let mut canvas = RaylibCanvas {
                d: &mut t,
                textures: &self.textures,
                size,
            };
            render_frame(world, &mut canvas);
        }
        d.draw_texture_pro(
            self.target.texture(),
            source,
            dest,
            Vector2::zero(),
            0.0,
            Color::WHITE,
        );
    }

    fn idle(&mut self, next_due_ms: u64) {
        let wait = next_due_ms.saturating_sub(self.now_ms()).min(MAX_IDLE_MS);
        if wait > 0 {
            std::thread::sleep(Duration::from_millis(wait));
        }
    }
}

/// Destination rectangle that fits `game` into `window` keeping its aspect.
fn letterbox(window: (i32, i32), game: (u32, u32)) -> Rectangle {
    let (window_w, window_h) = (window.0 as f32, window.1 as f32);
    let (game_w, game_h) = (game.0 as f32, game.1 as f32);
    if window_w / window_h > game_w / game_h {
        // pillarbox
        let scaled_w = game_w * window_h / game_h;
        Rectangle {
            x: (window_w - scaled_w) / 2.0,
            y: 0.0,
            width: scaled_w,
            height: window_h,
        }
    } else {
        let scaled_h = game_h * window_w / game_w;
        Rectangle {
            x: 0.0,
            y: (window_h - scaled_h) / 2.0,
            width: window_w,
            height: scaled_h,
        }
    }
}

/// [`Canvas`] over a raylib draw handle.
pub struct RaylibCanvas<'a, D: RaylibDraw> {
    d: &'a mut D,
    textures: &'a TextureStore,
    size: (i32, i32),
}

fn color(c: Rgba) -> Color {
    Color::new(c[0], c[1], c[2], c[3])
}

impl<D: RaylibDraw> Canvas for RaylibCanvas<'_, D> {
    fn viewport_size(&self) -> (i32, i32) {
        self.size
    }

    fn texture_size(&self, texture: &str) -> Option<(i32, i32)> {
        self.textures.size(texture)
    }

    fn draw_image(&mut self, texture: &str, src: SrcRect, dst_x: i32, dst_y: i32, flip: Flip) {
        let Some(tex) = self.textures.get(texture) else {
            return;
        };
        // negative source extents mirror the blit
        let source = Rectangle {
            x: src.x as f32,
            y: src.y as f32,
            width: (if flip.horizontal { -src.w } else { src.w }) as f32,
            height: (if flip.vertical { -src.h } else { src.h }) as f32,
        };
        self.d.draw_texture_rec(
            tex,
            source,
            Vector2::new(dst_x as f32, dst_y as f32),
            Color::WHITE,
        );
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        self.d.draw_rectangle(x, y, w, h, color(c));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, c: Rgba) {
        self.d.draw_text(text, x, y, size, color(c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_pillarbox() {
        let r = letterbox((1600, 600), (320, 240));
        assert_eq!(r.height, 600.0);
        assert_eq!(r.width, 800.0);
        assert_eq!(r.x, 400.0);
    }

    #[test]
    fn test_letterbox_bars_top_and_bottom() {
        let r = letterbox((640, 960), (320, 240));
        assert_eq!(r.width, 640.0);
        assert_eq!(r.height, 480.0);
        assert_eq!(r.y, 240.0);
    }
}
