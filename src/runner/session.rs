//! The run session: score, frame clock, restart flow.
//!
//! [`RunnerSession`] is created once at startup and only ever reset
//! field-by-field, so entity handles and external references stay valid
//! across restarts. The restart-control reveal is an explicit deadline
//! checked against the clock each tick rather than a fire-and-forget
//! timer, which makes it idempotent across repeated game-overs and
//! trivially testable.

use bevy::prelude::*;

use crate::audio::{AudioDirector, CueId};
use crate::config::RunnerConfig;
use crate::runner::companion::JumpQueue;
use crate::runner::components::{
    Companion, Obstacle, Player, RestartControl, ScrollingGround, StartControl, VerticalVelocity,
};
use crate::runner::input::InputSignals;
use crate::AppState;

/// Monotonic tick counter plus the smoothed observed frame rate.
#[derive(Resource, Clone, Copy, Debug)]
pub struct FrameClock {
    pub frame: u64,
    /// Frames per second, exponentially smoothed. Deltas outside a
    /// plausible band (test harnesses spin much faster than a display)
    /// leave the estimate untouched.
    pub rate: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame: 0,
            rate: 60.0,
        }
    }
}

#[derive(Resource, Default, Debug)]
pub struct RunnerSession {
    pub score: u32,
    pub game_start_frame: u64,
    /// Obstacles that have scrolled past the player this run.
    pub obstacles_cleared: u32,
    /// Hundreds bucket of the last checkpoint cue (edge-trigger state).
    pub last_checkpoint: u32,
    /// Wall-clock deadline (seconds since app start) for the restart
    /// reveal; `None` while unarmed.
    pub restart_reveal_at: Option<f64>,
    /// The reveal has fired for the current game-over.
    pub reveal_done: bool,
}

/// First system of every frame: advance the tick counter and fold the
/// frame-time sample into the rate estimate.
pub fn advance_clock(time: Res<Time>, mut clock: ResMut<FrameClock>) {
    clock.frame += 1;
    let dt = time.delta_secs();
    if (1.0 / 240.0..=1.0 / 15.0).contains(&dt) {
        clock.rate = clock.rate * 0.9 + (1.0 / dt) * 0.1;
    }
}

/// `Init`: wait for a jump key or a press on the start control.
pub fn start_on_signal(
    signals: Res<InputSignals>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if signals.jump_requested || signals.start_pressed {
        next_state.set(AppState::Playing);
    }
}

/// Runs on every entry into `Playing` (first start and every restart):
/// put the world back into its initial shape. Safe to run any number of
/// times in a row.
pub fn reset_session(
    cfg: Res<RunnerConfig>,
    clock: Res<FrameClock>,
    mut session: ResMut<RunnerSession>,
    mut queue: ResMut<JumpQueue>,
    mut commands: Commands,
    obstacles: Query<Entity, With<Obstacle>>,
    mut players: Query<
        (&mut Transform, &mut VerticalVelocity, &mut Visibility),
        (With<Player>, Without<Companion>),
    >,
    mut dogs: Query<
        (&mut Transform, &mut VerticalVelocity, &mut Visibility),
        (With<Companion>, Without<Player>),
    >,
    mut start_controls: Query<
        &mut Visibility,
        (With<StartControl>, Without<Player>, Without<Companion>, Without<RestartControl>),
    >,
    mut restart_controls: Query<
        &mut Visibility,
        (With<RestartControl>, Without<Player>, Without<Companion>, Without<StartControl>),
    >,
) {
    info!("run starting at frame {}", clock.frame);

    session.score = 0;
    session.obstacles_cleared = 0;
    session.last_checkpoint = 0;
    session.restart_reveal_at = None;
    session.reveal_done = false;
    session.game_start_frame = clock.frame;

    queue.clear();

    for entity in &obstacles {
        commands.entity(entity).despawn();
    }

    for (mut tf, mut vel, mut vis) in &mut players {
        tf.translation.x = cfg.player_x;
        tf.translation.y = cfg.ground_y;
        vel.0 = 0.0;
        *vis = Visibility::Inherited;
    }
    for (mut tf, mut vel, mut vis) in &mut dogs {
        tf.translation.x = cfg.companion_x;
        tf.translation.y = cfg.ground_y;
        vel.0 = 0.0;
        *vis = Visibility::Inherited;
    }
    for mut vis in &mut start_controls {
        *vis = Visibility::Hidden;
    }
    for mut vis in &mut restart_controls {
        *vis = Visibility::Hidden;
    }
}

/// Leaving `Playing` for any reason empties the jump queue; queued dog
/// jumps must never fire outside a run.
pub fn clear_jump_queue(mut queue: ResMut<JumpQueue>) {
    queue.clear();
}

/// Entering `GameOver`: freeze the world and arm the restart reveal.
pub fn enter_game_over(
    cfg: Res<RunnerConfig>,
    time: Res<Time>,
    mut session: ResMut<RunnerSession>,
    mut audio: ResMut<AudioDirector>,
    mut obstacles: Query<&mut Obstacle>,
    mut grounds: Query<&mut ScrollingGround>,
) {
    for mut ob in &mut obstacles {
        ob.speed = 0.0;
    }
    for mut ground in &mut grounds {
        ground.speed = 0.0;
    }

    audio.stop(CueId::Ambient);
    audio.play(CueId::Die);

    if !session.reveal_done && session.restart_reveal_at.is_none() {
        session.restart_reveal_at = Some(time.elapsed_secs_f64() + cfg.restart_reveal_secs);
    }
}

/// Per-tick `GameOver` handling: hold the crashed pose, hover the dog
/// next to the player, reveal the restart controls once the deadline
/// passes, and accept a restart press afterwards.
pub fn game_over_tick(
    cfg: Res<RunnerConfig>,
    time: Res<Time>,
    signals: Res<InputSignals>,
    mut session: ResMut<RunnerSession>,
    mut audio: ResMut<AudioDirector>,
    mut next_state: ResMut<NextState<AppState>>,
    mut players: Query<
        (&Transform, &mut VerticalVelocity, &mut Visibility),
        (With<Player>, Without<Companion>),
    >,
    mut dogs: Query<(&mut Transform, &mut Visibility), (With<Companion>, Without<Player>)>,
    mut restart_controls: Query<
        &mut Visibility,
        (With<RestartControl>, Without<Player>, Without<Companion>),
    >,
) {
    // Hold the player still; the dog floats beside them, dropping below
    // when hovering above would cover the top banner.
    let player_pos = players
        .get_single()
        .map(|(tf, _, _)| tf.translation.truncate())
        .ok();
    if let Some(pos) = player_pos {
        for (_, mut vel, _) in &mut players {
            vel.0 = 0.0;
        }
        for (mut tf, _) in &mut dogs {
            tf.translation.x = pos.x;
            let above = pos.y + HOVER_DISTANCE;
            tf.translation.y = if above > BANNER_LIMIT_Y {
                pos.y - HOVER_DISTANCE
            } else {
                above
            };
        }
    }

    // Reveal once the armed deadline passes.
    if let Some(deadline) = session.restart_reveal_at {
        if !session.reveal_done && time.elapsed_secs_f64() >= deadline {
            session.reveal_done = true;
            audio.play(CueId::RestartJingle);
            for mut vis in &mut restart_controls {
                *vis = Visibility::Inherited;
            }
            for (_, _, mut vis) in &mut players {
                *vis = Visibility::Hidden;
            }
            for (_, mut vis) in &mut dogs {
                *vis = Visibility::Hidden;
            }
        }
    }

    if session.reveal_done && signals.restart_pressed {
        next_state.set(AppState::Playing);
    }
}

/// How far above (or below) the idle player the dog hovers.
const HOVER_DISTANCE: f32 = 160.0;
/// Hovering above this height would cover the banner; drop below instead.
const BANNER_LIMIT_Y: f32 = 120.0;
