use bevy::prelude::*;
use bevy::window::{PresentMode, WindowPlugin};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod asset_loader;
pub mod audio;
pub mod config;
pub mod runner;
pub mod theme;

use config::RunnerConfig;
use runner::session::RunnerSession;
use runner::RunnerPlugin;

// ---------------------------------------------------------------------------
// App-wide state machine
// ---------------------------------------------------------------------------

/// Top-level game state.
///
/// * `Init`     – title screen; waiting for a jump key or the start control.
/// * `Playing`  – the run is live; the whole sim pass executes each tick.
/// * `GameOver` – crashed; restart controls reveal after a delay and lead
///   straight back to `Playing`. There is no terminal state.
#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Init,
    Playing,
    GameOver,
}

// ---------------------------------------------------------------------------
// Resources shared between Bevy and JS
// ---------------------------------------------------------------------------

/// Bridge resource mirrored into JS globals every frame so the shell can
/// poll `get_score()` synchronously.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShellBridge {
    pub score: i32,
    pub obstacles_cleared: i32,
}

/// Final scoreboard returned by [`stop_game`].
#[derive(Serialize)]
struct FinalReport {
    score: i32,
    obstacles_cleared: i32,
}

// ---------------------------------------------------------------------------
// wasm-bindgen exports
// ---------------------------------------------------------------------------

/// Initialize the engine, targeting the `<canvas>` element whose DOM id
/// matches `canvas_id`. The game starts on its own title screen; there is
/// no separate "start" call. Gameplay tunables can be overridden by
/// setting the `__comet_config` JS global to a JSON object before calling
/// this.
#[wasm_bindgen]
pub fn init_engine(canvas_id: &str) {
    let selector = format!("#{}", canvas_id);

    let cfg = get_js_global("__comet_config")
        .and_then(|blob| RunnerConfig::from_json(&blob))
        .unwrap_or_default();

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Comet Dash".into(),
                    canvas: Some(selector),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            // Keep the browser console usable.
            .disable::<bevy::log::LogPlugin>(),
    );

    app.init_state::<AppState>();
    app.insert_resource(cfg);
    app.init_resource::<ShellBridge>();

    app.add_plugins(RunnerPlugin);
    app.add_plugins(asset_loader::AssetLoaderPlugin);

    app.add_systems(Startup, setup_camera);
    app.add_systems(Update, handle_shell_signals);

    // `app.run()` on WASM is non-blocking; it schedules
    // requestAnimationFrame callbacks internally.
    app.run();
}

/// Force the current run to end and return the final scoreboard as JSON,
/// e.g. `{"score":420,"obstacles_cleared":7}`.
#[wasm_bindgen]
pub fn stop_game() -> String {
    set_js_global("__comet_stop", "true");
    let report = FinalReport {
        score: read_global_i32("__comet_score"),
        obstacles_cleared: read_global_i32("__comet_cleared"),
    };
    serde_json::to_string(&report).unwrap_or_else(|_| "{}".into())
}

/// Current score of the running game (0 if no run is active).
#[wasm_bindgen]
pub fn get_score() -> i32 {
    read_global_i32("__comet_score")
}

// ---------------------------------------------------------------------------
// JS global helpers (communicate between free-fn exports and Bevy systems)
// ---------------------------------------------------------------------------

fn set_js_global(key: &str, value: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    js_sys::Reflect::set(&window, &JsValue::from_str(key), &JsValue::from_str(value)).ok();
}

fn get_js_global(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let val = js_sys::Reflect::get(&window, &JsValue::from_str(key)).ok()?;
    val.as_string()
}

fn delete_js_global(key: &str) {
    if let Some(window) = web_sys::window() {
        js_sys::Reflect::set(&window, &JsValue::from_str(key), &JsValue::UNDEFINED).ok();
    }
}

fn read_global_i32(key: &str) -> i32 {
    get_js_global(key)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Bevy systems
// ---------------------------------------------------------------------------

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Poll the JS globals for shell commands and mirror the live score out.
fn handle_shell_signals(
    session: Res<RunnerSession>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut bridge: ResMut<ShellBridge>,
) {
    if get_js_global("__comet_stop").as_deref() == Some("true") {
        delete_js_global("__comet_stop");
        if *state.get() == AppState::Playing {
            next_state.set(AppState::GameOver);
        }
    }

    bridge.score = session.score as i32;
    bridge.obstacles_cleared = session.obstacles_cleared as i32;
    set_js_global("__comet_score", &bridge.score.to_string());
    set_js_global("__comet_cleared", &bridge.obstacles_cleared.to_string());
}
