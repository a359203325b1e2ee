//! Score accrual and the checkpoint cue.
//!
//! The per-tick increment is normalized by the observed frame rate so a
//! 120 Hz display does not score twice as fast as a 60 Hz one. The
//! checkpoint cue is edge-triggered on the hundreds
//! bucket: it fires on the tick the score enters a new multiple of 100
//! and never again while the score sits there.

use bevy::prelude::*;

use crate::audio::{AudioDirector, CueId};
use crate::runner::session::{FrameClock, RunnerSession};

pub fn accrue_score(
    clock: Res<FrameClock>,
    mut session: ResMut<RunnerSession>,
    mut audio: ResMut<AudioDirector>,
) {
    session.score += (clock.rate / 60.0).round() as u32;

    let bucket = session.score / 100;
    if session.score > 0 && bucket > session.last_checkpoint {
        session.last_checkpoint = bucket;
        audio.play(CueId::Checkpoint);
    }
}

/// Keep the looping theme running during play and silence the restart
/// jingle if a fresh run started while it was still playing.
pub fn ambient_audio(mut audio: ResMut<AudioDirector>) {
    if audio.is_playing(CueId::RestartJingle) {
        audio.stop(CueId::RestartJingle);
    }
    if !audio.is_playing(CueId::Ambient) {
        audio.play(CueId::Ambient);
    }
}
