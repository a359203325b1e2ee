//! Runtime tunables.
//!
//! All gameplay constants live in [`RunnerConfig`] so the embedding shell
//! can re-balance the game without a rebuild: `init_engine` reads the
//! `__comet_config` JS global (a JSON object mirroring this struct) and
//! any field it carries overrides the default. A malformed blob is logged
//! and ignored.
//!
//! Units: positions are world pixels (origin at canvas center, y-up),
//! velocities are pixels per simulation tick, gravity pixels per tick².

use bevy::prelude::*;
use serde::Deserialize;

/// Which autonomous behavior drives the dog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionMode {
    /// Mirror the player's jumps with a delay matched to the horizontal
    /// offset between the two, so the dog clears each obstacle at the same
    /// point in its travel that the player did.
    Predictive,
    /// Jump whenever an obstacle enters the dog's horizontal span.
    Reactive,
    /// Gravity only; no autonomous jumps.
    Passive,
}

#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    // -- Field layout -----------------------------------------------------
    /// Half the canvas width (canvas is 1280x600).
    pub half_width: f32,
    pub half_height: f32,
    /// Rest height of actor centers; also the floor for spawned obstacles.
    pub ground_y: f32,
    pub player_x: f32,
    pub companion_x: f32,
    pub player_scale: f32,
    pub companion_scale: f32,
    pub obstacle_scale: f32,

    // -- Physics ----------------------------------------------------------
    /// Added to vertical velocity every tick (negative = downward).
    pub gravity: f32,
    /// Vertical velocity set by a jump impulse.
    pub jump_velocity: f32,
    /// Jumps are only accepted while the player is at or below this height.
    pub max_jump_y: f32,
    /// Base leftward speed of the scrolling ground.
    pub ground_speed: f32,

    // -- Spawning / difficulty ramp ---------------------------------------
    pub normal_rate: u64,
    pub medium_rate: u64,
    pub fast_rate: u64,
    /// Score above which the medium spawn cadence kicks in.
    pub medium_threshold: u32,
    /// Score above which the fast spawn cadence kicks in.
    pub fast_threshold: u32,
    /// Leftward speed of a freshly spawned obstacle (negative).
    pub obstacle_speed: f32,
    /// Extra leftward px/tick per 100 points applied to new spawns.
    /// Zero keeps obstacle speed flat; the spawn cadence tiers above are
    /// the default difficulty ramp.
    pub speed_per_100: f32,
    /// Obstacles spawn between `ground_y` and `ground_y + spawn_altitude`.
    pub spawn_altitude: f32,
    /// Hard cap on live obstacles; the spawner no-ops at the cap.
    pub max_live_obstacles: usize,

    // -- Companion / restart flow -----------------------------------------
    pub companion_mode: CompanionMode,
    /// Wall-clock delay before the restart controls appear after a crash.
    pub restart_reveal_secs: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            half_width: 640.0,
            half_height: 300.0,
            ground_y: -250.0,
            player_x: -356.0,
            companion_x: -512.0,
            player_scale: 0.2,
            companion_scale: 0.2,
            obstacle_scale: 0.25,
            gravity: -0.8,
            jump_velocity: 12.0,
            max_jump_y: 100.0,
            ground_speed: -4.0,
            normal_rate: 60,
            medium_rate: 30,
            fast_rate: 10,
            medium_threshold: 1000,
            fast_threshold: 2000,
            obstacle_speed: -6.0,
            speed_per_100: 0.0,
            spawn_altitude: 350.0,
            max_live_obstacles: 24,
            companion_mode: CompanionMode::Predictive,
            restart_reveal_secs: 5.0,
        }
    }
}

impl RunnerConfig {
    /// Horizontal distance the dog trails the player by.
    pub fn companion_offset(&self) -> f32 {
        self.player_x - self.companion_x
    }

    /// Ticks an obstacle needs to travel the companion offset; this is the
    /// jump-mimicry delay.
    pub fn companion_delay_ticks(&self) -> u64 {
        (self.companion_offset() / self.obstacle_speed.abs()).round() as u64
    }

    /// Parse a JSON override blob; `None` on malformed input.
    pub fn from_json(blob: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(blob) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                warn!("ignoring malformed __comet_config: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_companion_delay_matches_layout() {
        let cfg = RunnerConfig::default();
        // 156 px offset at 6 px/tick -> 26 ticks.
        assert_eq!(cfg.companion_offset(), 156.0);
        assert_eq!(cfg.companion_delay_ticks(), 26);
    }

    #[test]
    fn json_override_is_partial() {
        let cfg = RunnerConfig::from_json(r#"{"obstacle_speed":-8.0,"companion_mode":"reactive"}"#)
            .unwrap();
        assert_eq!(cfg.obstacle_speed, -8.0);
        assert_eq!(cfg.companion_mode, CompanionMode::Reactive);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.normal_rate, 60);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(RunnerConfig::from_json("{not json").is_none());
    }
}
