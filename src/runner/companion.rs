//! The dog's autonomous behavior.
//!
//! Predictive mode (the default) replays the player's jump timing at the
//! dog's position: every player jump enqueues a target frame, and the dog
//! fires its own impulse when that frame arrives. Because jumps enqueue in
//! real time the queue is non-decreasing, and a player double-jumping
//! before the first delayed jump fires simply queues twice. FIFO, no
//! de-duplication, mid-air jumps allowed.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::config::{CompanionMode, RunnerConfig};
use crate::runner::collider::ColliderSet;
use crate::runner::components::{Companion, Obstacle, VerticalVelocity};
use crate::runner::session::FrameClock;

/// FIFO of frames at which the dog must jump.
#[derive(Resource, Default)]
pub struct JumpQueue {
    entries: VecDeque<u64>,
}

impl JumpQueue {
    pub fn push(&mut self, frame: u64) {
        debug_assert!(
            self.entries.back().map_or(true, |&last| frame >= last),
            "jump queue entries must be non-decreasing"
        );
        self.entries.push_back(frame);
    }

    /// Pop the front entry if it is due; `None` on an empty queue or a
    /// future entry.
    pub fn take_due(&mut self, frame: u64) -> Option<u64> {
        if self.entries.front().is_some_and(|&f| frame >= f) {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Run the configured behavior for the dog.
pub fn companion_update(
    cfg: Res<RunnerConfig>,
    clock: Res<FrameClock>,
    mut queue: ResMut<JumpQueue>,
    mut dogs: Query<(&mut Transform, &mut VerticalVelocity), With<Companion>>,
    obstacles: Query<(&Transform, &ColliderSet), (With<Obstacle>, Without<Companion>)>,
) {
    for (mut tf, mut vel) in &mut dogs {
        // The dog holds its lane regardless of behavior mode.
        tf.translation.x = cfg.companion_x;

        match cfg.companion_mode {
            CompanionMode::Predictive => {
                if queue.take_due(clock.frame).is_some() {
                    vel.0 = cfg.jump_velocity;
                }
            }
            CompanionMode::Reactive => {
                let grounded = tf.translation.y <= cfg.ground_y + f32::EPSILON;
                if grounded && obstacle_overhead(&obstacles, cfg.companion_x) {
                    vel.0 = cfg.jump_velocity;
                }
            }
            CompanionMode::Passive => {}
        }
    }
}

/// Whether any live obstacle's hit-region currently spans the given x.
/// The span comes from the obstacle's own collider set, so a saucer's
/// wide hull registers just as far out as it can actually hit.
fn obstacle_overhead(
    obstacles: &Query<(&Transform, &ColliderSet), (With<Obstacle>, Without<Companion>)>,
    x: f32,
) -> bool {
    obstacles.iter().any(|(tf, set)| {
        let (min, max) = set.x_extent(tf.translation.truncate(), tf.scale.x);
        (min..=max).contains(&x)
    })
}
