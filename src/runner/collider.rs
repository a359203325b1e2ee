//! Hit-shapes and overlap tests.
//!
//! Every collidable entity carries a [`ColliderSet`]: a primary shape used
//! for the generic player-vs-obstacle test, plus an optional secondary
//! region for obstacle types whose visible silhouette sticks out past the
//! primary shape (the saucer's wide hull).
//!
//! Circle-circle pairs are tested exactly. Any pairing that involves a
//! rectangle is tested as AABB intersection with circles widened to their
//! enclosing box. That makes the effective hit-shape of a circle slightly
//! larger than the drawn body in the secondary-collider path; the original
//! game shipped with this behavior and players are tuned to it, so it is
//! kept as-is rather than corrected.

use bevy::prelude::*;

/// A single hit-shape, positioned relative to the owning entity's origin.
/// Offsets and extents are in unscaled sprite pixels; the owner's uniform
/// transform scale is applied at test time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Circle { offset: Vec2, radius: f32 },
    Rect { offset: Vec2, size: Vec2 },
}

/// Primary shape plus optional secondary region.
#[derive(Component, Clone, Debug)]
pub struct ColliderSet {
    pub primary: Collider,
    pub secondary: Option<Collider>,
}

impl ColliderSet {
    pub fn single(primary: Collider) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Horizontal extent `(min_x, max_x)` covered by every shape in the
    /// set when placed at `pos` with uniform `scale`.
    pub fn x_extent(&self, pos: Vec2, scale: f32) -> (f32, f32) {
        let b = bounds(&self.primary, pos, scale);
        let (mut min, mut max) = (b.min.x, b.max.x);
        if let Some(secondary) = &self.secondary {
            let b = bounds(secondary, pos, scale);
            min = min.min(b.min.x);
            max = max.max(b.max.x);
        }
        (min, max)
    }
}

/// Axis-aligned bounds of a shape placed at `pos` with uniform `scale`.
/// Circles report their enclosing box.
fn bounds(shape: &Collider, pos: Vec2, scale: f32) -> Rect {
    match *shape {
        Collider::Circle { offset, radius } => {
            let r = radius * scale;
            Rect::from_center_size(pos + offset * scale, Vec2::splat(r * 2.0))
        }
        Collider::Rect { offset, size } => {
            Rect::from_center_size(pos + offset * scale, size * scale)
        }
    }
}

/// Overlap test between two positioned, scaled shapes.
pub fn overlaps(
    a: &Collider,
    a_pos: Vec2,
    a_scale: f32,
    b: &Collider,
    b_pos: Vec2,
    b_scale: f32,
) -> bool {
    match (a, b) {
        (
            Collider::Circle {
                offset: ao,
                radius: ar,
            },
            Collider::Circle {
                offset: bo,
                radius: br,
            },
        ) => {
            let ca = a_pos + *ao * a_scale;
            let cb = b_pos + *bo * b_scale;
            let reach = ar * a_scale + br * b_scale;
            ca.distance_squared(cb) <= reach * reach
        }
        // Rectangle involved: plain AABB comparison, circle-as-box.
        _ => {
            let ra = bounds(a, a_pos, a_scale);
            let rb = bounds(b, b_pos, b_scale);
            !(ra.max.x < rb.min.x || ra.min.x > rb.max.x || ra.max.y < rb.min.y || ra.min.y > rb.max.y)
        }
    }
}

// ---------------------------------------------------------------------------
// Per-role collider tables (sprite-pixel space, y-up)
// ---------------------------------------------------------------------------

/// Tight circle around the astronaut's body.
pub fn player_colliders() -> ColliderSet {
    ColliderSet::single(Collider::Circle {
        offset: Vec2::ZERO,
        radius: 250.0,
    })
}

/// Box around the dog. The dog never collides with obstacles; the shape
/// is carried so every actor's hit-region lives in one table.
pub fn companion_colliders() -> ColliderSet {
    ColliderSet::single(Collider::Rect {
        offset: Vec2::new(60.0, -100.0),
        size: Vec2::new(400.0, 420.0),
    })
}

/// Meteor: circle over the rock core, shifted left so the flame trail
/// stays harmless.
pub fn meteor_colliders() -> ColliderSet {
    ColliderSet::single(Collider::Circle {
        offset: Vec2::new(-90.0, 0.0),
        radius: 140.0,
    })
}

/// Saucer: circle over the rider plus a wide secondary box covering the
/// hull, which the primary circle cannot reach.
pub fn saucer_colliders() -> ColliderSet {
    ColliderSet {
        primary: Collider::Circle {
            offset: Vec2::ZERO,
            radius: 175.0,
        },
        secondary: Some(Collider::Rect {
            offset: Vec2::new(0.0, 40.0),
            size: Vec2::new(620.0, 80.0),
        }),
    }
}
