//! Game loop integration tests driven by a fake platform with a settable
//! clock: mode flow, step and draw clocks, pause sources.

use bevy_ecs::prelude::*;

use tilerunner::canvas::{DrawCall, RecordingCanvas};
use tilerunner::components::bodyrect::BodyRect;
use tilerunner::components::physics::{Direction, Physics};
use tilerunner::error::LoadError;
use tilerunner::game::{init_world, spawn_player};
use tilerunner::gameloop::{GameLoop, Platform, PlatformEvent, SceneLoader};
use tilerunner::resources::gameconfig::GameConfig;
use tilerunner::resources::gamestate::{GameStates, PauseSources};
use tilerunner::resources::input::{KeyEvent, LogicalKey};
use tilerunner::resources::scene::Scene;
use tilerunner::resources::spritestore::SpriteStore;
use tilerunner::resources::templates::TemplateStore;
use tilerunner::resources::worldtime::WorldTime;
use tilerunner::systems::render::render_frame;

#[derive(Default)]
struct FakePlatform {
    now: u64,
    pending: Vec<PlatformEvent>,
    prepared: usize,
    last_frame: Vec<DrawCall>,
}

impl Platform for FakePlatform {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.pending)
    }

    fn prepare_scene(&mut self, _scene: &Scene, _sprites: &SpriteStore) -> Result<(), LoadError> {
        self.prepared += 1;
        Ok(())
    }

    fn render(&mut self, world: &mut World) {
        let mut canvas = RecordingCanvas::new(320, 240);
        render_frame(world, &mut canvas);
        self.last_frame = canvas.calls;
    }
}

fn scene_loader() -> SceneLoader {
    Box::new(|world: &mut World| {
        world.insert_resource(Scene::new(640, 240, 16, 16)?);
        spawn_player(world, (BodyRect::new(32, 100, 16, 16), Physics::new(4, 0)));
        Ok(())
    })
}

fn failing_loader() -> SceneLoader {
    Box::new(|_world: &mut World| {
        Err(LoadError::Io {
            path: "missing.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    })
}

fn make_loop(loader: SceneLoader) -> GameLoop<FakePlatform> {
    let world = init_world(GameConfig::new(), SpriteStore::new(), TemplateStore::new());
    let mut game = GameLoop::new(world, FakePlatform::default(), loader);
    game.start();
    game
}

fn at(game: &mut GameLoop<FakePlatform>, now: u64) -> bool {
    game.platform_mut().now = now;
    game.iterate()
}

fn send(game: &mut GameLoop<FakePlatform>, event: PlatformEvent) {
    game.platform_mut().pending.push(event);
}

fn press(game: &mut GameLoop<FakePlatform>, key: LogicalKey) {
    send(game, PlatformEvent::Key(KeyEvent::down(key)));
}

fn steps(game: &GameLoop<FakePlatform>) -> u64 {
    game.world().resource::<WorldTime>().steps
}

fn frames(game: &GameLoop<FakePlatform>) -> u64 {
    game.world().resource::<WorldTime>().frames
}

/// Loop sitting in `Scene` mode at t = 2000 with a fresh logic clock.
fn in_scene() -> GameLoop<FakePlatform> {
    let mut game = make_loop(scene_loader());
    at(&mut game, 2000);
    assert_eq!(game.mode(), GameStates::Title);
    press(&mut game, LogicalKey::Confirm);
    at(&mut game, 2000);
    assert_eq!(game.mode(), GameStates::Scene);
    game
}

fn drawn_texts(game: &GameLoop<FakePlatform>) -> Vec<String> {
    game.platform()
        .last_frame
        .iter()
        .filter_map(|c| match c {
            DrawCall::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn intro_then_title_after_intro_time() {
    let mut game = make_loop(scene_loader());
    assert_eq!(game.mode(), GameStates::Intro);
    assert!(at(&mut game, 1999));
    assert_eq!(game.mode(), GameStates::Intro);
    assert!(at(&mut game, 2400));
    assert_eq!(game.mode(), GameStates::Title);
    assert!(drawn_texts(&game).iter().any(|t| t == "press enter to start"));
}

#[test]
fn confirm_skips_intro() {
    let mut game = make_loop(scene_loader());
    press(&mut game, LogicalKey::Confirm);
    at(&mut game, 10);
    assert_eq!(game.mode(), GameStates::Title);
}

#[test]
fn confirm_on_title_loads_scene() {
    let game = in_scene();
    assert!(game.world().contains_resource::<Scene>());
    assert_eq!(game.platform().prepared, 1);
    assert_eq!(steps(&game), 0);
}

#[test]
fn failed_load_stays_on_title() {
    let mut game = make_loop(failing_loader());
    at(&mut game, 2000);
    press(&mut game, LogicalKey::Confirm);
    assert!(at(&mut game, 2000));
    assert_eq!(game.mode(), GameStates::Title);
    assert!(!game.world().contains_resource::<Scene>());
    assert_eq!(game.platform().prepared, 0);
}

#[test]
fn late_logic_clock_runs_one_step_without_catch_up() {
    let mut game = in_scene();
    // three intervals late
    at(&mut game, 3000);
    assert_eq!(steps(&game), 1);
    at(&mut game, 3000);
    assert_eq!(steps(&game), 1);
    at(&mut game, 3299);
    assert_eq!(steps(&game), 1);
    at(&mut game, 3300);
    assert_eq!(steps(&game), 2);
}

#[test]
fn draw_and_logic_clocks_are_independent() {
    let mut game = in_scene();
    let f0 = frames(&game);
    at(&mut game, 2010);
    assert_eq!(frames(&game), f0);
    at(&mut game, 2033);
    assert_eq!(frames(&game), f0 + 1);
    assert_eq!(steps(&game), 0);
    at(&mut game, 2300);
    assert_eq!(steps(&game), 1);
    assert_eq!(frames(&game), f0 + 2);
}

#[test]
fn pause_sources_release_independently() {
    let mut game = in_scene();
    game.pause("A");
    game.pause("B");
    assert_eq!(game.mode(), GameStates::ScenePaused);
    game.unpause("A");
    assert_eq!(game.mode(), GameStates::ScenePaused);
    // a source that never paused cannot resume
    game.unpause("C");
    assert_eq!(game.mode(), GameStates::ScenePaused);

    at(&mut game, 2600);
    assert_eq!(steps(&game), 0);
    assert!(drawn_texts(&game).iter().any(|t| t == "PAUSED"));

    game.unpause("B");
    assert_eq!(game.mode(), GameStates::Scene);
    at(&mut game, 2900);
    assert_eq!(steps(&game), 1);
}

#[test]
fn menu_key_toggles_pause_in_scene() {
    let mut game = in_scene();
    press(&mut game, LogicalKey::Menu);
    at(&mut game, 2001);
    assert_eq!(game.mode(), GameStates::ScenePaused);
    assert!(game.world().resource::<PauseSources>().holds("menu"));
    press(&mut game, LogicalKey::Menu);
    at(&mut game, 2002);
    assert_eq!(game.mode(), GameStates::Scene);
}

#[test]
fn focus_loss_pauses_until_focus_returns() {
    let mut game = in_scene();
    send(&mut game, PlatformEvent::FocusLost);
    at(&mut game, 2001);
    assert_eq!(game.mode(), GameStates::ScenePaused);

    // the menu source is separate from the focus source
    press(&mut game, LogicalKey::Menu);
    send(&mut game, PlatformEvent::FocusGained);
    at(&mut game, 2002);
    assert_eq!(game.mode(), GameStates::ScenePaused);
    press(&mut game, LogicalKey::Menu);
    at(&mut game, 2003);
    assert_eq!(game.mode(), GameStates::Scene);
}

#[test]
fn key_release_while_paused_reaches_player() {
    let mut game = in_scene();
    press(&mut game, LogicalKey::Right);
    press(&mut game, LogicalKey::Menu);
    at(&mut game, 2001);
    assert_eq!(game.mode(), GameStates::ScenePaused);
    send(&mut game, PlatformEvent::Key(KeyEvent::up(LogicalKey::Right)));
    at(&mut game, 2002);

    let world = game.world_mut();
    let mut players = world.query::<&Physics>();
    let physics = players.single(world).unwrap();
    assert!(!physics.directions.contains(Direction::Right));
    assert_eq!(physics.momentum, 0);
}

#[test]
fn entering_scene_clears_stale_pause_sources() {
    let mut game = make_loop(scene_loader());
    at(&mut game, 2000);
    game.pause("A");
    assert_eq!(game.mode(), GameStates::Title);
    press(&mut game, LogicalKey::Confirm);
    at(&mut game, 2000);
    assert_eq!(game.mode(), GameStates::Scene);
}

#[test]
fn menu_on_title_quits() {
    let mut game = make_loop(scene_loader());
    at(&mut game, 2000);
    press(&mut game, LogicalKey::Menu);
    assert!(!at(&mut game, 2010));
    assert!(!game.is_running());
}

#[test]
fn close_request_stops_loop() {
    let mut game = in_scene();
    send(&mut game, PlatformEvent::CloseRequested);
    assert!(!at(&mut game, 2001));
    assert!(!game.iterate());
}

#[test]
fn end_stops_loop() {
    let mut game = in_scene();
    game.end();
    assert!(!at(&mut game, 2500));
    assert_eq!(steps(&game), 0);
}
