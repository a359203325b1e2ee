//! Shared harness for the headless sim tests: a Bevy app with
//! `MinimalPlugins` plus the runner sim, driven tick by tick.
#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use rand::rngs::StdRng;
use rand::SeedableRng;

use comet_dash::config::RunnerConfig;
use comet_dash::runner::input::InputSignals;
use comet_dash::runner::spawner::SpawnRng;
use comet_dash::runner::RunnerSimPlugin;
use comet_dash::AppState;

pub fn sim_app(cfg: RunnerConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.init_state::<AppState>();
    app.insert_resource(cfg);
    app.insert_resource(SpawnRng(StdRng::seed_from_u64(7)));
    app.add_plugins(RunnerSimPlugin);
    app
}

pub fn state(app: &App) -> AppState {
    app.world().resource::<State<AppState>>().get().clone()
}

pub fn press_jump(app: &mut App) {
    app.world_mut().resource_mut::<InputSignals>().jump_requested = true;
}

pub fn clear_signals(app: &mut App) {
    *app.world_mut().resource_mut::<InputSignals>() = InputSignals::default();
}

/// Drive the app from the title screen into a clean first playing tick:
/// one update that registers the start signal, one that applies the state
/// transition (with the signal already released).
pub fn start_run(app: &mut App) {
    press_jump(app);
    app.update();
    clear_signals(app);
    app.update();
    assert_eq!(state(app), AppState::Playing);
}

/// Run `n` plain ticks with no input.
pub fn run_ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Park a stationary meteor at the given position (world pixels).
pub fn spawn_meteor_at(app: &mut App, x: f32, y: f32, scale: f32) {
    use comet_dash::runner::collider;
    use comet_dash::runner::components::{Obstacle, ObstacleKind, Skin};

    app.world_mut().spawn((
        Obstacle {
            kind: ObstacleKind::Meteor,
            speed: 0.0,
            scored: false,
        },
        collider::meteor_colliders(),
        Transform::from_xyz(x, y, 0.5).with_scale(Vec3::splat(scale)),
        Visibility::Inherited,
        Skin::Meteor,
    ));
}

/// Park a stationary saucer at the given position (world pixels).
pub fn spawn_saucer_at(app: &mut App, x: f32, y: f32, scale: f32) {
    use comet_dash::runner::collider;
    use comet_dash::runner::components::{Obstacle, ObstacleKind, Skin};

    app.world_mut().spawn((
        Obstacle {
            kind: ObstacleKind::Saucer,
            speed: 0.0,
            scored: false,
        },
        collider::saucer_colliders(),
        Transform::from_xyz(x, y, 0.5).with_scale(Vec3::splat(scale)),
        Visibility::Inherited,
        Skin::Saucer,
    ));
}
