//! Cooperative game loop.
//!
//! [`GameLoop`] owns the ECS [`World`] and drives it with two independent
//! [`LoopClock`]s: a logic clock (one scene step per `step_ms`) and a draw
//! clock (one frame per `1000 / fps` ms). A late clock fires once and resets
//! to the current time; missed steps are never caught up.
//!
//! Everything that touches the OS (time, input, textures, the window) goes
//! through the [`Platform`] trait. The raylib implementation lives in
//! [`crate::platform`]; tests drive the loop with a fake.
use bevy_ecs::prelude::*;
use log::{error, info, warn};

use crate::error::LoadError;
use crate::game::unload_scene;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{
    FOCUS_PAUSE_SOURCE, GameState, GameStates, NextGameState, PauseSources, QuitRequested,
};
use crate::resources::input::KeyEvent;
use crate::resources::scene::Scene;
use crate::resources::spritestore::SpriteStore;
use crate::systems::gamestate::sync_pause_state;
use crate::systems::input::apply_key_event;
use crate::systems::logic_schedule;
use crate::systems::time::{count_frame, count_step, update_world_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Key(KeyEvent),
    FocusLost,
    FocusGained,
    CloseRequested,
}

pub trait Platform {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;

    /// Input and window events since the last poll.
    fn poll_events(&mut self) -> Vec<PlatformEvent>;

    /// Load whatever the scene and its sprites need before the first step.
    fn prepare_scene(&mut self, scene: &Scene, sprites: &SpriteStore) -> Result<(), LoadError>;

    /// Draw one frame of the world.
    fn render(&mut self, world: &mut World);

    /// Called between iterations; `next_due_ms` is when the next clock fires.
    fn idle(&mut self, _next_due_ms: u64) {}
}

/// Fixed-interval clock without catch-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopClock {
    pub interval_ms: u64,
    last_ms: u64,
}

impl LoopClock {
    pub fn new(interval_ms: u64, start_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: start_ms,
        }
    }

    /// True once `interval_ms` has passed since the last fire. Firing resets
    /// the reference to `now_ms`, however late it is.
    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) >= self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn next_due_ms(&self) -> u64 {
        self.last_ms + self.interval_ms
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }
}

/// Loads the configured scene into the world.
pub type SceneLoader = Box<dyn FnMut(&mut World) -> Result<(), LoadError>>;

pub struct GameLoop<P: Platform> {
    world: World,
    platform: P,
    logic_clock: LoopClock,
    draw_clock: LoopClock,
    logic: Schedule,
    loader: SceneLoader,
    running: bool,
}

impl<P: Platform> GameLoop<P> {
    /// Clock intervals come from the world's [`GameConfig`].
    pub fn new(world: World, platform: P, loader: SceneLoader) -> Self {
        let (step_ms, draw_ms) = world
            .get_resource::<GameConfig>()
            .map(|c| (c.step_ms, c.draw_interval_ms()))
            .unwrap_or_else(|| {
                let c = GameConfig::new();
                (c.step_ms, c.draw_interval_ms())
            });
        let now = platform.now_ms();
        Self {
            world,
            platform,
            logic_clock: LoopClock::new(step_ms, now),
            draw_clock: LoopClock::new(draw_ms, now),
            logic: logic_schedule(),
            loader,
            running: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn mode(&self) -> GameStates {
        self.world
            .get_resource::<GameState>()
            .map(|s| s.get())
            .unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Enter the intro and arm both clocks.
    pub fn start(&mut self) {
        let now = self.platform.now_ms();
        update_world_time(&mut self.world, now);
        self.logic_clock.reset(now);
        self.draw_clock.reset(now);
        self.set_mode(GameStates::Intro, now);
        self.running = true;
    }

    /// Run until the window closes or [`Self::end`] is called.
    pub fn run(&mut self) {
        self.start();
        while self.iterate() {
            let next = self
                .logic_clock
                .next_due_ms()
                .min(self.draw_clock.next_due_ms());
            self.platform.idle(next);
        }
        unload_scene(&mut self.world);
        info!("Game loop finished");
    }

    /// Stop after the current iteration.
    pub fn end(&mut self) {
        self.running = false;
    }

    pub fn pause(&mut self, source: &str) {
        if let Some(mut pause) = self.world.get_resource_mut::<PauseSources>() {
            pause.pause(source);
        }
        sync_pause_state(&mut self.world);
    }

    pub fn unpause(&mut self, source: &str) {
        if let Some(mut pause) = self.world.get_resource_mut::<PauseSources>() {
            pause.unpause(source);
        }
        sync_pause_state(&mut self.world);
    }

    /// One loop iteration. Returns whether the loop should keep going.
    pub fn iterate(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let now = self.platform.now_ms();
        update_world_time(&mut self.world, now);

        for event in self.platform.poll_events() {
            self.handle_event(event);
        }
        if self.world.remove_resource::<QuitRequested>().is_some() {
            info!("Quit requested");
            self.running = false;
        }
        if !self.running {
            return false;
        }
        self.apply_transitions(now);
        sync_pause_state(&mut self.world);

        if self.logic_clock.due(now) {
            self.step(now);
        }
        if self.draw_clock.due(now) {
            self.platform.render(&mut self.world);
            count_frame(&mut self.world);
        }
        self.running
    }

    fn handle_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Key(key) => apply_key_event(&mut self.world, key),
            PlatformEvent::FocusLost => {
                if let Some(mut pause) = self.world.get_resource_mut::<PauseSources>() {
                    pause.pause(FOCUS_PAUSE_SOURCE);
                }
            }
            PlatformEvent::FocusGained => {
                if let Some(mut pause) = self.world.get_resource_mut::<PauseSources>() {
                    pause.unpause(FOCUS_PAUSE_SOURCE);
                }
            }
            PlatformEvent::CloseRequested => {
                info!("Window close requested");
                self.running = false;
            }
        }
    }

    fn step(&mut self, now: u64) {
        match self.mode() {
            GameStates::Intro => {
                let intro_ms = self
                    .world
                    .get_resource::<GameConfig>()
                    .map(|c| c.intro_ms)
                    .unwrap_or_default();
                let elapsed = self
                    .world
                    .get_resource::<GameState>()
                    .map(|s| s.time_in_state(now))
                    .unwrap_or_default();
                if elapsed >= intro_ms {
                    self.set_mode(GameStates::Title, now);
                }
            }
            GameStates::Scene => {
                self.logic.run(&mut self.world);
                count_step(&mut self.world);
            }
            GameStates::None | GameStates::Title | GameStates::ScenePaused => {}
        }
    }

    fn apply_transitions(&mut self, now: u64) {
        let Some(next) = self
            .world
            .get_resource_mut::<NextGameState>()
            .and_then(|mut n| n.take())
        else {
            return;
        };
        let current = self.mode();
        match (current, next) {
            (GameStates::Title, GameStates::Scene) => match self.enter_scene() {
                Ok(()) => {
                    self.set_mode(GameStates::Scene, now);
                    // the first step waits a full interval
                    self.logic_clock.reset(now);
                }
                Err(e) => {
                    error!("Failed to load scene: {}", e);
                    unload_scene(&mut self.world);
                }
            },
            (from, to) if from == to => {}
            (_, to) => self.set_mode(to, now),
        }
    }

    fn enter_scene(&mut self) -> Result<(), LoadError> {
        (self.loader)(&mut self.world)?;
        if let Some(mut pause) = self.world.get_resource_mut::<PauseSources>() {
            pause.clear();
        }
        let Some(scene) = self.world.get_resource::<Scene>() else {
            warn!("Scene loader finished without inserting a scene");
            return Ok(());
        };
        let empty = SpriteStore::new();
        let sprites = self.world.get_resource::<SpriteStore>().unwrap_or(&empty);
        self.platform.prepare_scene(scene, sprites)
    }

    fn set_mode(&mut self, mode: GameStates, now: u64) {
        if let Some(mut state) = self.world.get_resource_mut::<GameState>() {
            info!("Transitioning from {:?} to {:?}", state.get(), mode);
            state.set(mode, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_fires_once_without_catch_up() {
        let mut clock = LoopClock::new(300, 0);
        assert!(!clock.due(299));
        assert!(clock.due(1000));
        // three intervals were missed but only one step ran
        assert!(!clock.due(1000));
        assert!(!clock.due(1299));
        assert!(clock.due(1300));
    }

    #[test]
    fn test_next_due() {
        let mut clock = LoopClock::new(33, 10);
        assert_eq!(clock.next_due_ms(), 43);
        clock.due(50);
        assert_eq!(clock.next_due_ms(), 83);
    }
}
