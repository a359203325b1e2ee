//! The runner scene: simulation systems and their scheduling.
//!
//! [`RunnerSimPlugin`] wires up everything the game logic needs and
//! nothing the renderer needs, so integration tests can drive it under
//! `MinimalPlugins`. The full app adds the theme, input polling and
//! audio layers on top via [`RunnerPlugin`].

pub mod collider;
pub mod collision;
pub mod companion;
pub mod components;
pub mod input;
pub mod physics;
pub mod scoring;
pub mod session;
pub mod spawner;

use bevy::prelude::*;

use crate::AppState;

/// Headless game logic. The app must have `init_state::<AppState>()`
/// called before this plugin is added.
pub struct RunnerSimPlugin;

impl Plugin for RunnerSimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<crate::config::RunnerConfig>()
            .init_resource::<session::RunnerSession>()
            .init_resource::<session::FrameClock>()
            .init_resource::<input::InputSignals>()
            .init_resource::<companion::JumpQueue>()
            .init_resource::<crate::audio::AudioDirector>()
            .init_resource::<spawner::SpawnRng>();

        app.add_systems(Startup, components::spawn_actors);

        app.add_systems(Update, session::advance_clock);
        app.add_systems(
            Update,
            session::start_on_signal
                .run_if(in_state(AppState::Init))
                .after(session::advance_clock),
        );
        // One fixed-order pass per tick: input-driven impulses, physics,
        // spawning, companion scheduling, collision, scoring.
        app.add_systems(
            Update,
            (
                physics::player_jump,
                physics::integrate_gravity,
                physics::scroll_ground,
                physics::move_obstacles,
                spawner::spawn_obstacles,
                companion::companion_update,
                collision::detect_collisions,
                scoring::accrue_score,
                scoring::ambient_audio,
            )
                .chain()
                .run_if(in_state(AppState::Playing))
                .after(session::advance_clock),
        );
        app.add_systems(
            Update,
            session::game_over_tick
                .run_if(in_state(AppState::GameOver))
                .after(session::advance_clock),
        );

        app.add_systems(OnEnter(AppState::Playing), session::reset_session);
        app.add_systems(OnExit(AppState::Playing), session::clear_jump_queue);
        app.add_systems(OnEnter(AppState::GameOver), session::enter_game_over);
    }
}

/// The full in-browser game: sim plus input polling, visuals and audio.
pub struct RunnerPlugin;

impl Plugin for RunnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RunnerSimPlugin);
        app.init_resource::<input::UiRegions>();
        app.add_systems(
            Update,
            input::poll_input.before(session::advance_clock),
        );
        app.add_plugins(crate::audio::AudioPlugin);
        app.add_plugins(crate::theme::ThemePlugin);
    }
}
