//! The only sound a plain terminal can make: BEL.

use tracing::debug;

use asteroid_dodger::audio::{AudioError, AudioHost, Cue};

/// Rings the terminal bell for deaths and new waves. Every other cue is
/// reported unsupported at preload so the director skips it.
#[derive(Debug, Default)]
pub struct BellAudio {
    muted: bool,
    pending: usize,
}

impl BellAudio {
    /// Bells queued since the last call; zero while muted.
    pub fn take_bells(&mut self) -> usize {
        let bells = if self.muted { 0 } else { self.pending };
        self.pending = 0;
        bells
    }
}

impl AudioHost for BellAudio {
    fn preload(&mut self, cue: Cue) -> Result<(), AudioError> {
        match cue {
            Cue::Death | Cue::Wave => Ok(()),
            other => Err(AudioError::Unsupported(other)),
        }
    }

    fn play(&mut self, cue: Cue, _volume: f32) -> Result<(), AudioError> {
        debug!(?cue, "bell");
        self.pending += 1;
        Ok(())
    }

    fn start_music(&mut self, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) {}

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
