//! Integration: gravity, ground clamp and jump impulses on the live sim.

mod common;

use bevy::prelude::*;

use comet_dash::config::RunnerConfig;
use comet_dash::runner::components::{Companion, Player, VerticalVelocity};

use common::{clear_signals, press_jump, run_ticks, sim_app, start_run};

fn player_state(app: &mut App) -> (f32, f32) {
    let mut q = app
        .world_mut()
        .query_filtered::<(&Transform, &VerticalVelocity), With<Player>>();
    let (tf, vel) = q.single(app.world());
    (tf.translation.y, vel.0)
}

#[test]
fn gravity_accumulates_per_tick_until_ground_clamp() {
    let cfg = RunnerConfig::default();
    let gravity = cfg.gravity;
    let ground_y = cfg.ground_y;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    // Launch the player.
    press_jump(&mut app);
    app.update();
    clear_signals(&mut app);

    let (y0, v0) = player_state(&mut app);
    assert!(y0 > ground_y, "jump should lift the player off the ground");

    // While airborne, each tick adds exactly the gravity constant.
    let mut prev_v = v0;
    let mut prev_y = y0;
    loop {
        app.update();
        let (y, v) = player_state(&mut app);
        if y <= ground_y {
            break;
        }
        assert!((v - (prev_v + gravity)).abs() < 1e-4);
        assert!((y - (prev_y + v)).abs() < 1e-3);
        prev_v = v;
        prev_y = y;
    }

    // Ground clamp: resting exactly on the plane with zero velocity.
    let (y, v) = player_state(&mut app);
    assert_eq!(y, ground_y);
    assert_eq!(v, 0.0);

    // And it stays put under continued gravity.
    run_ticks(&mut app, 10);
    let (y, v) = player_state(&mut app);
    assert_eq!(y, ground_y);
    assert_eq!(v, 0.0);
}

#[test]
fn jump_impulse_overrides_current_velocity() {
    let cfg = RunnerConfig::default();
    let jump_velocity = cfg.jump_velocity;
    let gravity = cfg.gravity;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    press_jump(&mut app);
    app.update();
    clear_signals(&mut app);
    // The impulse sets velocity outright, then the same tick integrates.
    let (_, v) = player_state(&mut app);
    assert!((v - (jump_velocity + gravity)).abs() < 1e-4);

    // Re-jump mid-air while still below the ceiling: velocity resets to
    // the impulse again rather than adding to it.
    run_ticks(&mut app, 3);
    press_jump(&mut app);
    app.update();
    clear_signals(&mut app);
    let (_, v) = player_state(&mut app);
    assert!((v - (jump_velocity + gravity)).abs() < 1e-4);
}

#[test]
fn jump_rejected_above_ceiling() {
    let mut cfg = RunnerConfig::default();
    // Put the ceiling just above rest height so the first jump is legal
    // but an immediate re-jump is not.
    cfg.max_jump_y = cfg.ground_y + 10.0;
    let jump_velocity = cfg.jump_velocity;
    let mut app = sim_app(cfg);
    start_run(&mut app);

    press_jump(&mut app);
    app.update();
    let (_, v) = player_state(&mut app);
    assert!(v > 0.0, "first jump from the ground is legal");

    // Player is now well above max_jump_y; the held jump does nothing.
    run_ticks(&mut app, 2);
    let (_, v_before) = player_state(&mut app);
    app.update();
    let (_, v_after) = player_state(&mut app);
    assert!(v_after < v_before, "gravity keeps winning; no new impulse");
    assert!(v_after < jump_velocity - 1.0);
    clear_signals(&mut app);
}

#[test]
fn companion_is_subject_to_the_same_ground_clamp() {
    let cfg = RunnerConfig::default();
    let ground_y = cfg.ground_y;
    let mut app = sim_app(cfg);
    start_run(&mut app);
    run_ticks(&mut app, 5);

    let mut q = app
        .world_mut()
        .query_filtered::<(&Transform, &VerticalVelocity), With<Companion>>();
    let (tf, vel) = q.single(app.world());
    assert_eq!(tf.translation.y, ground_y);
    assert_eq!(vel.0, 0.0);
}
