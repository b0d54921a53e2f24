//! Sound cues and the boundary to whatever actually plays them.
//!
//! The core only names cues. An [`AudioHost`] turns them into noise, and
//! [`AudioDirector`] sits in between: it preloads every cue once, remembers
//! which ones failed, forwards the music mute flag, and never lets an audio problem
//! stop the game.

use std::collections::HashSet;
use std::fmt;

use tracing::warn;

use crate::events::GameEvent;

pub const MUSIC_VOLUME: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Wave,
    SpeedPickup,
    SlowdownPickup,
    ShieldPickup,
    ObstacleShattered,
    Death,
    Pause,
}

impl Cue {
    pub const ALL: [Cue; 7] = [
        Cue::Wave,
        Cue::SpeedPickup,
        Cue::SlowdownPickup,
        Cue::ShieldPickup,
        Cue::ObstacleShattered,
        Cue::Death,
        Cue::Pause,
    ];

    pub fn volume(self) -> f32 {
        match self {
            Cue::Wave => 0.2,
            Cue::SpeedPickup => 1.0,
            Cue::SlowdownPickup => 0.8,
            Cue::ShieldPickup => 1.0,
            Cue::ObstacleShattered => 0.24,
            Cue::Death => 0.35,
            Cue::Pause => 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioError {
    NotLoaded(Cue),
    Unsupported(Cue),
    Device(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded(cue) => write!(f, "cue {cue:?} was never loaded"),
            Self::Unsupported(cue) => write!(f, "cue {cue:?} is not supported by this audio host"),
            Self::Device(msg) => write!(f, "audio device error: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait AudioHost {
    fn preload(&mut self, cue: Cue) -> Result<(), AudioError>;
    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError>;
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;
    fn stop_music(&mut self);
    fn set_muted(&mut self, muted: bool);
}

pub struct AudioDirector<A: AudioHost> {
    host: A,
    loaded: HashSet<Cue>,
    muted: bool,
}

impl<A: AudioHost> AudioDirector<A> {
    /// Preload every cue; failures are logged once and those cues are skipped
    /// from then on.
    pub fn new(mut host: A, muted: bool) -> Self {
        let mut loaded = HashSet::new();
        for cue in Cue::ALL {
            match host.preload(cue) {
                Ok(()) => {
                    loaded.insert(cue);
                }
                Err(e) => warn!("audio preload failed, cue will be silent: {e}"),
            }
        }
        host.set_muted(muted);
        Self { host, loaded, muted }
    }

    pub fn host(&self) -> &A {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut A {
        &mut self.host
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_loaded(&self, cue: Cue) -> bool {
        self.loaded.contains(&cue)
    }

    pub fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound(cue) => self.play(*cue),
            // The track always runs; mute only silences it.
            GameEvent::MusicStart => {
                if let Err(e) = self.host.start_music(MUSIC_VOLUME) {
                    warn!("background music unavailable: {e}");
                }
            }
            GameEvent::MusicStop => self.host.stop_music(),
            GameEvent::MusicMuted(muted) => {
                self.muted = *muted;
                self.host.set_muted(*muted);
            }
            _ => {}
        }
    }

    pub fn dispatch_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.dispatch(event);
        }
    }

    fn play(&mut self, cue: Cue) {
        if !self.loaded.contains(&cue) {
            return;
        }
        if let Err(e) = self.host.play(cue, cue.volume()) {
            warn!("failed to play {cue:?}: {e}");
        }
    }
}
