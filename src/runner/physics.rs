//! Per-tick integration: gravity, ground contact, jump impulses, world
//! scroll. All constants are per-tick (the sim is tick-locked like the
//! original game, not dt-scaled), so one `Update` pass is one tick.

use bevy::prelude::*;

use crate::audio::{AudioDirector, CueId};
use crate::config::{CompanionMode, RunnerConfig};
use crate::runner::companion::JumpQueue;
use crate::runner::components::{Obstacle, Player, ScrollingGround, VerticalVelocity};
use crate::runner::input::InputSignals;
use crate::runner::session::{FrameClock, RunnerSession};

/// Apply the player's jump impulse. The impulse overrides the current
/// vertical velocity outright; it is the only way velocity turns upward.
/// Re-jumping mid-air is allowed as long as the player stays below the
/// jump ceiling (exact mimicry of the original feel).
pub fn player_jump(
    signals: Res<InputSignals>,
    cfg: Res<RunnerConfig>,
    clock: Res<FrameClock>,
    mut queue: ResMut<JumpQueue>,
    mut audio: ResMut<AudioDirector>,
    mut players: Query<(&Transform, &mut VerticalVelocity), With<Player>>,
) {
    if !signals.jump_requested {
        return;
    }
    for (tf, mut vel) in &mut players {
        if tf.translation.y > cfg.max_jump_y {
            continue;
        }
        vel.0 = cfg.jump_velocity;
        audio.play(CueId::Jump);

        if cfg.companion_mode == CompanionMode::Predictive {
            // The dog must jump when the obstacle the player just dodged
            // reaches the dog's x, i.e. after the ticks an obstacle needs
            // to travel the offset between the two.
            queue.push(clock.frame + cfg.companion_delay_ticks());
        }
    }
}

/// Gravity plus ground clamp for every airborne-capable actor.
pub fn integrate_gravity(
    cfg: Res<RunnerConfig>,
    mut actors: Query<(&mut Transform, &mut VerticalVelocity)>,
) {
    for (mut tf, mut vel) in &mut actors {
        vel.0 += cfg.gravity;
        tf.translation.y += vel.0;
        if tf.translation.y <= cfg.ground_y {
            tf.translation.y = cfg.ground_y;
            vel.0 = 0.0;
        }
    }
}

/// Advance obstacles by their own speed and drop the ones that have left
/// the screen. An obstacle crossing the player's x is marked scored once.
pub fn move_obstacles(
    cfg: Res<RunnerConfig>,
    mut session: ResMut<RunnerSession>,
    mut commands: Commands,
    mut obstacles: Query<(Entity, &mut Transform, &mut Obstacle)>,
) {
    let despawn_x = -cfg.half_width - 100.0;
    for (entity, mut tf, mut ob) in &mut obstacles {
        tf.translation.x += ob.speed;

        if !ob.scored && tf.translation.x < cfg.player_x {
            ob.scored = true;
            session.obstacles_cleared += 1;
        }

        if tf.translation.x < despawn_x {
            commands.entity(entity).despawn();
        }
    }
}

/// Loop the backdrop strip; it speeds up as the score climbs so the world
/// feels faster even though the difficulty ramp proper lives in the
/// spawner.
pub fn scroll_ground(
    cfg: Res<RunnerConfig>,
    session: Res<RunnerSession>,
    mut grounds: Query<(&mut Transform, &mut ScrollingGround)>,
) {
    for (mut tf, mut ground) in &mut grounds {
        ground.speed = cfg.ground_speed - 3.0 * session.score as f32 / 100.0;
        tf.translation.x += ground.speed;
        if tf.translation.x < -cfg.half_width {
            tf.translation.x = 0.0;
        }
    }
}
