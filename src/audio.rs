//! Audio cue bridge.
//!
//! The sim only knows the [`AudioDirector`] resource: `play` / `stop` /
//! `is_playing` over a fixed cue set. Commands accumulate in a queue that
//! [`drain_cues`] forwards to `HtmlAudioElement`s on wasm; on native the
//! queue is simply discarded, which keeps headless tests silent. Every
//! command is also appended to `history` so tests can assert cue timing.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CueId {
    Jump,
    Die,
    Checkpoint,
    /// Looping in-game music.
    Ambient,
    /// Looping invite jingle on the restart screen.
    RestartJingle,
}

impl CueId {
    fn source(self) -> &'static str {
        match self {
            CueId::Jump => "assets/audio/jump.mp3",
            CueId::Die => "assets/audio/die.mp3",
            CueId::Checkpoint => "assets/audio/checkpoint.mp3",
            CueId::Ambient => "assets/audio/theme.mp3",
            CueId::RestartJingle => "assets/audio/play_again.mp3",
        }
    }

    fn looping(self) -> bool {
        matches!(self, CueId::Ambient | CueId::RestartJingle)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCommand {
    Play(CueId),
    Stop(CueId),
}

#[derive(Resource, Default)]
pub struct AudioDirector {
    queued: Vec<AudioCommand>,
    active: Vec<CueId>,
    /// Full command log, oldest first.
    pub history: Vec<AudioCommand>,
}

impl AudioDirector {
    pub fn play(&mut self, cue: CueId) {
        self.queued.push(AudioCommand::Play(cue));
        self.history.push(AudioCommand::Play(cue));
        if !self.active.contains(&cue) {
            self.active.push(cue);
        }
    }

    pub fn stop(&mut self, cue: CueId) {
        self.queued.push(AudioCommand::Stop(cue));
        self.history.push(AudioCommand::Stop(cue));
        self.active.retain(|c| *c != cue);
    }

    /// Whether a cue has been started and not stopped since. One-shot cues
    /// count as playing until explicitly stopped; only the looping cues are
    /// ever queried in practice.
    pub fn is_playing(&self, cue: CueId) -> bool {
        self.active.contains(&cue)
    }

    pub fn plays_of(&self, cue: CueId) -> usize {
        self.history
            .iter()
            .filter(|c| **c == AudioCommand::Play(cue))
            .count()
    }
}

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioDirector>();
        app.add_systems(Update, drain_cues);
    }
}

fn drain_cues(mut director: ResMut<AudioDirector>) {
    if director.queued.is_empty() {
        return;
    }
    let commands: Vec<AudioCommand> = director.queued.drain(..).collect();
    for cmd in commands {
        playback::apply(cmd);
    }
}

#[cfg(target_arch = "wasm32")]
mod playback {
    use super::{AudioCommand, CueId};
    use bevy::prelude::warn;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use web_sys::HtmlAudioElement;

    thread_local! {
        static ELEMENTS: RefCell<HashMap<CueId, HtmlAudioElement>> = RefCell::new(HashMap::new());
    }

    pub fn apply(cmd: AudioCommand) {
        ELEMENTS.with(|cell| {
            let mut elements = cell.borrow_mut();
            match cmd {
                AudioCommand::Play(cue) => {
                    let element = match elements.get(&cue) {
                        Some(el) => el.clone(),
                        None => match HtmlAudioElement::new_with_src(cue.source()) {
                            Ok(el) => {
                                el.set_loop(cue.looping());
                                elements.insert(cue, el.clone());
                                el
                            }
                            Err(_) => {
                                warn!("could not create audio element for {cue:?}");
                                return;
                            }
                        },
                    };
                    element.set_current_time(0.0);
                    // The returned promise rejects until the user has
                    // interacted with the page; playback simply starts on
                    // the next cue after that.
                    let _ = element.play();
                }
                AudioCommand::Stop(cue) => {
                    if let Some(el) = elements.get(&cue) {
                        let _ = el.pause();
                    }
                }
            }
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod playback {
    use super::AudioCommand;

    pub fn apply(_cmd: AudioCommand) {}
}
