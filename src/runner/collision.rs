//! Per-tick collision resolution.
//!
//! Linear scan over live obstacles; entity counts stay in the tens, so
//! no broad phase. The player's primary shape is tested against every
//! obstacle primary first, then against every declared secondary region;
//! the first hit ends the run and short-circuits the rest of the tick.

use bevy::prelude::*;

use crate::runner::collider::{overlaps, ColliderSet};
use crate::runner::components::{Obstacle, Player};
use crate::AppState;

pub fn detect_collisions(
    players: Query<(&Transform, &ColliderSet), With<Player>>,
    obstacles: Query<(&Transform, &ColliderSet), With<Obstacle>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Ok((ptf, pcol)) = players.get_single() else {
        return;
    };
    let ppos = ptf.translation.truncate();
    let pscale = ptf.scale.x;

    for (otf, ocol) in &obstacles {
        let hit = overlaps(
            &pcol.primary,
            ppos,
            pscale,
            &ocol.primary,
            otf.translation.truncate(),
            otf.scale.x,
        );
        if hit {
            info!("run ended: primary collider hit");
            next_state.set(AppState::GameOver);
            return;
        }
    }

    for (otf, ocol) in &obstacles {
        let Some(secondary) = &ocol.secondary else {
            continue;
        };
        let hit = overlaps(
            &pcol.primary,
            ppos,
            pscale,
            secondary,
            otf.translation.truncate(),
            otf.scale.x,
        );
        if hit {
            info!("run ended: secondary collider hit");
            next_state.set(AppState::GameOver);
            return;
        }
    }
}
