//! Things that happened during a frame, queued for the host to react to
//! (sound, HUD flashes, logging).

use crate::audio::Cue;
use crate::effects::EffectKind;
use crate::entities::PowerUpKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Sound(Cue),
    MusicStart,
    MusicStop,
    MusicMuted(bool),
    RunStarted,
    WaveStarted { wave: u32, shield_bonus: bool },
    PowerUpDropped,
    PickedUp(PowerUpKind),
    EffectExpired(EffectKind),
    Paused,
    Resumed,
    RunEnded {
        time_ms: u64,
        wave: u32,
        new_best_time: bool,
        new_best_wave: bool,
    },
    Reset,
}
