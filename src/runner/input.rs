//! Input polling seam.
//!
//! Raw keyboard/mouse/touch state is sampled once per frame into
//! [`InputSignals`]; every sim system reads only this resource. Multiple
//! physical presses within one frame collapse into one logical signal,
//! and tests drive the sim by writing the resource directly.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// One frame's worth of logical input.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct InputSignals {
    /// Jump was requested this frame (edge-detected).
    pub jump_requested: bool,
    /// The start control was clicked/tapped this frame.
    pub start_pressed: bool,
    /// The restart control was clicked/tapped this frame.
    pub restart_pressed: bool,
}

/// Screen-space hit regions for the clickable controls, in world
/// coordinates (origin at canvas center, y-up).
#[derive(Resource, Clone, Copy, Debug)]
pub struct UiRegions {
    pub start: Rect,
    pub restart: Rect,
    /// The big logo on the game-over screen doubles as a restart button.
    pub restart_logo: Rect,
}

impl Default for UiRegions {
    fn default() -> Self {
        Self {
            start: Rect::from_center_size(Vec2::new(0.0, -20.0), Vec2::new(280.0, 110.0)),
            restart: Rect::from_center_size(Vec2::new(0.0, -140.0), Vec2::new(180.0, 180.0)),
            restart_logo: Rect::from_center_size(Vec2::new(0.0, 140.0), Vec2::new(200.0, 200.0)),
        }
    }
}

impl UiRegions {
    /// Either of the two regions that count as a restart press.
    pub fn restart_hit(&self, point: Vec2) -> bool {
        self.restart.contains(point) || self.restart_logo.contains(point)
    }
}

/// Refresh [`InputSignals`] from the raw device state.
pub fn poll_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    regions: Res<UiRegions>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut signals: ResMut<InputSignals>,
) {
    let jump_key = keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::ArrowUp);
    let tap = mouse.just_pressed(MouseButton::Left) || touches.any_just_pressed();

    let cursor = windows
        .get_single()
        .ok()
        .and_then(|window| {
            let pos = window.cursor_position()?;
            // Window coordinates are y-down from the top-left corner.
            Some(Vec2::new(
                pos.x - window.width() / 2.0,
                window.height() / 2.0 - pos.y,
            ))
        });

    let over = |region: Rect| cursor.map(|c| region.contains(c)).unwrap_or(false);
    let restart_hit = cursor.map(|c| regions.restart_hit(c)).unwrap_or(false);

    *signals = InputSignals {
        jump_requested: jump_key || (tap && !over(regions.start) && !restart_hit),
        start_pressed: tap && over(regions.start),
        restart_pressed: tap && restart_hit,
    };
}
