//! Integration: the INIT → PLAY → END → PLAY loop, spawn cadence,
//! checkpoint cues and restart behavior.

mod common;

use bevy::prelude::*;

use comet_dash::audio::{AudioDirector, CueId};
use comet_dash::config::RunnerConfig;
use comet_dash::runner::companion::JumpQueue;
use comet_dash::runner::components::{Companion, Obstacle, Player};
use comet_dash::runner::input::InputSignals;
use comet_dash::runner::session::{FrameClock, RunnerSession};
use comet_dash::AppState;

use common::{
    clear_signals, press_jump, run_ticks, sim_app, spawn_meteor_at, spawn_saucer_at, start_run,
    state,
};

fn obstacle_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<Obstacle>>()
        .iter(app.world())
        .count()
}

fn session(app: &App) -> &RunnerSession {
    app.world().resource::<RunnerSession>()
}

#[test]
fn full_run_from_title_to_game_over() {
    let cfg = RunnerConfig::default();
    let player_x = cfg.player_x;
    let ground_y = cfg.ground_y;
    let scale = cfg.obstacle_scale;
    let mut app = sim_app(cfg);

    // Title screen until a jump signal arrives.
    app.update();
    assert_eq!(state(&app), AppState::Init);

    press_jump(&mut app);
    app.update();
    clear_signals(&mut app);
    app.update();
    assert_eq!(state(&app), AppState::Playing);
    let start_frame = session(&app).game_start_frame;
    assert!(start_frame > 0, "start frame recorded on transition");

    // 61 undisturbed ticks cross exactly one normal-rate boundary.
    let before = app.world().resource::<FrameClock>().frame;
    let crossings = ((before + 1)..=(before + 61))
        .filter(|f| f % 60 == 0)
        .count();
    assert_eq!(crossings, 1);
    run_ticks(&mut app, 61);
    assert_eq!(obstacle_count(&mut app), 1);

    // Park a meteor on the player: game over on the next tick.
    spawn_meteor_at(&mut app, player_x, ground_y, scale);
    run_ticks(&mut app, 2);
    assert_eq!(state(&app), AppState::GameOver);

    // Every obstacle is frozen and stays frozen.
    let positions = |app: &mut App| -> Vec<f32> {
        app.world_mut()
            .query::<(&Transform, &Obstacle)>()
            .iter(app.world())
            .map(|(tf, _)| tf.translation.x)
            .collect()
    };
    let frozen: Vec<f32> = app
        .world_mut()
        .query::<&Obstacle>()
        .iter(app.world())
        .map(|ob| ob.speed)
        .collect();
    assert!(frozen.iter().all(|&s| s == 0.0));
    let before = positions(&mut app);
    run_ticks(&mut app, 5);
    assert_eq!(positions(&mut app), before);

    // Crash audio: ambient stopped, die cue played once.
    let audio = app.world().resource::<AudioDirector>();
    assert!(!audio.is_playing(CueId::Ambient));
    assert_eq!(audio.plays_of(CueId::Die), 1);
}

#[test]
fn saucer_hull_ends_the_run_beyond_the_rider_circle() {
    let cfg = RunnerConfig::default();
    let player_x = cfg.player_x;
    let player_scale = cfg.player_scale;
    let ground_y = cfg.ground_y;
    let scale = cfg.obstacle_scale;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    // Park a saucer 100 px right of the player. At these scales the rider
    // circles reach 50 + 43.75 = 93.75 px, so the primary shapes miss;
    // only the wide hull rect (half-span 77.5 px) can touch the player.
    use comet_dash::runner::collider;
    let saucer_pos = Vec2::new(player_x + 100.0, ground_y);
    assert!(!collider::overlaps(
        &collider::player_colliders().primary,
        Vec2::new(player_x, ground_y),
        player_scale,
        &collider::saucer_colliders().primary,
        saucer_pos,
        scale,
    ));

    spawn_saucer_at(&mut app, saucer_pos.x, saucer_pos.y, scale);
    run_ticks(&mut app, 2);
    assert_eq!(
        state(&app),
        AppState::GameOver,
        "the hull region alone must end the run"
    );
}

#[test]
fn checkpoint_cue_is_edge_triggered_on_hundreds() {
    let mut cfg = RunnerConfig::default();
    cfg.max_live_obstacles = 0; // keep the run collision-free
    let mut app = sim_app(cfg);
    start_run(&mut app);

    assert!(session(&app).score >= 1, "score accrues every tick");

    // Up to 150: exactly one checkpoint (at 100), none at 150.
    while session(&app).score < 150 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<AudioDirector>().plays_of(CueId::Checkpoint),
        1
    );

    // Up to 250: one more (at 200), none at 250.
    while session(&app).score < 250 {
        app.update();
    }
    assert_eq!(
        app.world().resource::<AudioDirector>().plays_of(CueId::Checkpoint),
        2
    );
}

#[test]
fn spawner_noops_at_the_obstacle_cap() {
    let mut cfg = RunnerConfig::default();
    cfg.max_live_obstacles = 2;
    // Slow despawn: obstacles linger, so the cap binds quickly.
    cfg.obstacle_speed = -0.1;
    cfg.normal_rate = 10;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    run_ticks(&mut app, 200);
    assert_eq!(obstacle_count(&mut app), 2);
}

#[test]
fn restart_resets_the_session_and_is_idempotent() {
    let mut cfg = RunnerConfig::default();
    cfg.restart_reveal_secs = 0.0; // reveal immediately in tests
    let player_x = cfg.player_x;
    let companion_x = cfg.companion_x;
    let ground_y = cfg.ground_y;
    let scale = cfg.obstacle_scale;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    // Accrue some state, then crash.
    press_jump(&mut app);
    app.update();
    clear_signals(&mut app);
    run_ticks(&mut app, 10);
    assert!(session(&app).score > 0);
    spawn_meteor_at(&mut app, player_x, ground_y, scale);
    run_ticks(&mut app, 2);
    assert_eq!(state(&app), AppState::GameOver);

    // Let the reveal deadline pass, then press restart.
    run_ticks(&mut app, 2);
    assert_eq!(
        app.world()
            .resource::<AudioDirector>()
            .plays_of(CueId::RestartJingle),
        1
    );
    app.world_mut().resource_mut::<InputSignals>().restart_pressed = true;
    app.update();
    clear_signals(&mut app);
    app.update();
    assert_eq!(state(&app), AppState::Playing);

    // Post-reset state: fresh scoreboard, empty world, actors home.
    let s = session(&app);
    assert_eq!(s.obstacles_cleared, 0);
    assert_eq!(s.last_checkpoint, 0);
    assert!(s.restart_reveal_at.is_none());
    assert!(!s.reveal_done);
    assert_eq!(obstacle_count(&mut app), 0);
    assert!(app.world().resource::<JumpQueue>().is_empty());

    let (ptf, pvis) = {
        let mut q = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<Player>>();
        let (tf, vis) = q.single(app.world());
        (tf.translation.truncate(), *vis)
    };
    assert_eq!(ptf, Vec2::new(player_x, ground_y));
    assert_eq!(pvis, Visibility::Inherited);

    let ctf = {
        let mut q = app
            .world_mut()
            .query_filtered::<&Transform, With<Companion>>();
        q.single(app.world()).translation.truncate()
    };
    assert_eq!(ctf, Vec2::new(companion_x, ground_y));

    // Pressing restart again while already playing is a no-op.
    let score_before = session(&app).score;
    app.world_mut().resource_mut::<InputSignals>().restart_pressed = true;
    app.update();
    clear_signals(&mut app);
    assert_eq!(state(&app), AppState::Playing);
    assert!(session(&app).score >= score_before, "run keeps going");
}

#[test]
fn restart_ignored_before_the_reveal() {
    let cfg = RunnerConfig::default(); // 5 s reveal delay
    let player_x = cfg.player_x;
    let ground_y = cfg.ground_y;
    let scale = cfg.obstacle_scale;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    spawn_meteor_at(&mut app, player_x, ground_y, scale);
    run_ticks(&mut app, 2);
    assert_eq!(state(&app), AppState::GameOver);

    app.world_mut().resource_mut::<InputSignals>().restart_pressed = true;
    run_ticks(&mut app, 3);
    clear_signals(&mut app);
    assert_eq!(
        state(&app),
        AppState::GameOver,
        "restart only counts once the controls are revealed"
    );
    assert!(!session(&app).reveal_done);
}

#[test]
fn passed_obstacles_are_scored_once() {
    let mut cfg = RunnerConfig::default();
    cfg.max_live_obstacles = 0; // no organic spawns
    let player_x = cfg.player_x;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    // A fast meteor well above the player sails past without touching.
    let world = app.world_mut();
    {
        use comet_dash::runner::collider;
        use comet_dash::runner::components::{Obstacle, ObstacleKind, Skin};
        world.spawn((
            Obstacle {
                kind: ObstacleKind::Meteor,
                speed: -20.0,
                scored: false,
            },
            collider::meteor_colliders(),
            Transform::from_xyz(player_x + 100.0, 200.0, 0.5)
                .with_scale(Vec3::splat(0.25)),
            Visibility::Inherited,
            Skin::Meteor,
        ));
    }

    run_ticks(&mut app, 10);
    assert_eq!(state(&app), AppState::Playing);
    assert_eq!(session(&app).obstacles_cleared, 1);
}
