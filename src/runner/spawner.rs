//! Obstacle generation and the difficulty ramp.
//!
//! Spawn cadence is frame-modulus based: the normal tier fires every 60
//! ticks from the start, and two faster tiers arm as the score crosses
//! its thresholds. However many tier conditions hold on a tick, exactly
//! one obstacle is produced.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RunnerConfig;
use crate::runner::collider;
use crate::runner::components::{Obstacle, ObstacleKind, Skin};
use crate::runner::session::{FrameClock, RunnerSession};

/// Shared randomness for obstacle type and altitude. Seeded from entropy
/// in the app; tests insert a fixed seed for reproducible runs.
#[derive(Resource)]
pub struct SpawnRng(pub StdRng);

impl Default for SpawnRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Whether the spawn cadence fires on frame `f` at score `s`.
pub fn spawn_due(cfg: &RunnerConfig, f: u64, s: u32) -> bool {
    f % cfg.normal_rate == 0
        || (s > cfg.medium_threshold && f % cfg.medium_rate == 0)
        || (s > cfg.fast_threshold && f % cfg.fast_rate == 0)
}

/// Leftward speed for an obstacle spawned at score `s`: the base speed
/// plus `speed_per_100` extra px/tick for every 100 points.
pub fn spawn_speed(cfg: &RunnerConfig, s: u32) -> f32 {
    cfg.obstacle_speed - cfg.speed_per_100 * s as f32 / 100.0
}

/// Evaluated once per tick while playing.
pub fn spawn_obstacles(
    cfg: Res<RunnerConfig>,
    clock: Res<FrameClock>,
    session: Res<RunnerSession>,
    mut rng: ResMut<SpawnRng>,
    mut commands: Commands,
    live: Query<(), With<Obstacle>>,
) {
    if !spawn_due(&cfg, clock.frame, session.score) {
        return;
    }
    if live.iter().count() >= cfg.max_live_obstacles {
        debug!("obstacle cap reached, skipping spawn");
        return;
    }

    let kind = if rng.0.gen_bool(0.5) {
        ObstacleKind::Meteor
    } else {
        ObstacleKind::Saucer
    };
    let altitude: f32 = rng.0.gen::<f32>() * cfg.spawn_altitude;
    let speed = spawn_speed(&cfg, session.score);

    spawn_obstacle(
        &mut commands,
        kind,
        Vec2::new(cfg.half_width + 60.0, cfg.ground_y + altitude),
        speed,
        cfg.obstacle_scale,
    );
}

/// Build one obstacle entity with its kind-appropriate collider set.
pub fn spawn_obstacle(
    commands: &mut Commands,
    kind: ObstacleKind,
    position: Vec2,
    speed: f32,
    scale: f32,
) -> Entity {
    let (colliders, skin) = match kind {
        ObstacleKind::Meteor => (collider::meteor_colliders(), Skin::Meteor),
        ObstacleKind::Saucer => (collider::saucer_colliders(), Skin::Saucer),
    };
    commands
        .spawn((
            Obstacle {
                kind,
                speed,
                scored: false,
            },
            colliders,
            Transform::from_xyz(position.x, position.y, 0.5).with_scale(Vec3::splat(scale)),
            Visibility::Inherited,
            skin,
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_tier_fires_every_60() {
        let cfg = RunnerConfig::default();
        assert!(spawn_due(&cfg, 60, 0));
        assert!(spawn_due(&cfg, 120, 0));
        assert!(!spawn_due(&cfg, 61, 0));
        assert!(!spawn_due(&cfg, 90, 0));
    }

    #[test]
    fn faster_tiers_gate_on_score() {
        let cfg = RunnerConfig::default();
        // Medium tier needs score strictly above 1000.
        assert!(!spawn_due(&cfg, 90, 1000));
        assert!(spawn_due(&cfg, 90, 1001));
        // Fast tier needs score strictly above 2000.
        assert!(!spawn_due(&cfg, 70, 1500));
        assert!(spawn_due(&cfg, 70, 2001));
    }

    #[test]
    fn spawn_speed_ramps_with_the_knob() {
        let mut cfg = RunnerConfig::default();
        // Default knob: speed stays flat no matter the score.
        assert_eq!(spawn_speed(&cfg, 0), -6.0);
        assert_eq!(spawn_speed(&cfg, 2500), -6.0);

        // 2 px/tick per 100 points, growing leftward (more negative).
        cfg.speed_per_100 = 2.0;
        assert_eq!(spawn_speed(&cfg, 0), -6.0);
        assert_eq!(spawn_speed(&cfg, 100), -8.0);
        assert_eq!(spawn_speed(&cfg, 350), -13.0);
    }

    #[test]
    fn overlapping_tiers_still_one_decision() {
        let cfg = RunnerConfig::default();
        // Frame 120 satisfies all three tiers at high score; the decision
        // is still a single boolean, not one spawn per tier.
        assert!(spawn_due(&cfg, 120, 5000));
    }
}
