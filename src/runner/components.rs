//! ECS components for the runner scene, plus the actor spawner.
//!
//! Entities spawned here are logic-only: transform, velocity, colliders
//! and a [`Skin`] tag. The theme layer dresses skinned entities with
//! sprites when render assets exist, so the whole sim runs headless in
//! tests.

use bevy::prelude::*;

use crate::config::RunnerConfig;
use crate::runner::collider;

#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Companion;

/// Vertical velocity in px/tick for gravity-affected actors.
#[derive(Component, Default)]
pub struct VerticalVelocity(pub f32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Meteor,
    Saucer,
}

#[derive(Component)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Leftward px/tick; zeroed when the run ends.
    pub speed: f32,
    /// Set once the obstacle has passed the player.
    pub scored: bool,
}

/// Looping backdrop strip; speed ramps with score.
#[derive(Component)]
pub struct ScrollingGround {
    pub speed: f32,
}

/// Marker for the start control shown during `Init`.
#[derive(Component)]
pub struct StartControl;

/// Marker for the restart controls revealed after a crash.
#[derive(Component)]
pub struct RestartControl;

/// What an entity should look like, resolved by the theme layer.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skin {
    Player,
    Companion,
    Meteor,
    Saucer,
    Ground,
}

/// Spawn the persistent actors at startup. They exist across all states;
/// reset repositions them instead of respawning so external handles stay
/// valid.
pub fn spawn_actors(mut commands: Commands, cfg: Res<RunnerConfig>) {
    commands.spawn((
        Player,
        VerticalVelocity(0.0),
        collider::player_colliders(),
        Transform::from_xyz(cfg.player_x, cfg.ground_y, 1.0)
            .with_scale(Vec3::splat(cfg.player_scale)),
        Visibility::Hidden,
        Skin::Player,
    ));

    commands.spawn((
        Companion,
        VerticalVelocity(0.0),
        collider::companion_colliders(),
        Transform::from_xyz(cfg.companion_x, cfg.ground_y, 1.0)
            .with_scale(Vec3::splat(cfg.companion_scale)),
        Visibility::Hidden,
        Skin::Companion,
    ));

    commands.spawn((
        ScrollingGround { speed: cfg.ground_speed },
        Transform::from_xyz(0.0, 0.0, -1.0),
        Visibility::Inherited,
        Skin::Ground,
    ));
}
