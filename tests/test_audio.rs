use asteroid_dodger::audio::*;
use asteroid_dodger::events::GameEvent;
use asteroid_dodger::modes::GameMode;
use asteroid_dodger::run::{Command, RunController};
use asteroid_dodger::store::MemoryStore;
use rand::{rngs::StdRng, SeedableRng};

/// Records every call; refuses to preload the cues it is told to.
#[derive(Default)]
struct RecordingHost {
    refuse: Vec<Cue>,
    played: Vec<(Cue, f32)>,
    music_starts: usize,
    music_stops: usize,
    music_playing: bool,
    muted: Option<bool>,
    fail_music: bool,
}

impl RecordingHost {
    fn music_audible(&self) -> bool {
        self.music_playing && self.muted != Some(true)
    }
}

impl AudioHost for RecordingHost {
    fn preload(&mut self, cue: Cue) -> Result<(), AudioError> {
        if self.refuse.contains(&cue) {
            Err(AudioError::NotLoaded(cue))
        } else {
            Ok(())
        }
    }

    fn play(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
        self.played.push((cue, volume));
        Ok(())
    }

    fn start_music(&mut self, _volume: f32) -> Result<(), AudioError> {
        if self.fail_music {
            return Err(AudioError::Device("no output".into()));
        }
        self.music_starts += 1;
        self.music_playing = true;
        Ok(())
    }

    fn stop_music(&mut self) {
        self.music_stops += 1;
        self.music_playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = Some(muted);
    }
}

#[test]
fn cues_play_at_their_volume() {
    let mut director = AudioDirector::new(RecordingHost::default(), false);
    director.dispatch(&GameEvent::Sound(Cue::ObstacleShattered));
    director.dispatch(&GameEvent::Sound(Cue::Pause));
    assert_eq!(
        director.host().played,
        vec![(Cue::ObstacleShattered, 0.24), (Cue::Pause, 0.1)]
    );
}

#[test]
fn failed_preloads_are_skipped() {
    let host = RecordingHost {
        refuse: vec![Cue::Death],
        ..Default::default()
    };
    let mut director = AudioDirector::new(host, false);
    assert!(!director.is_loaded(Cue::Death));
    assert!(director.is_loaded(Cue::Wave));

    director.dispatch(&GameEvent::Sound(Cue::Death));
    director.dispatch(&GameEvent::Sound(Cue::Wave));
    assert_eq!(director.host().played, vec![(Cue::Wave, 0.2)]);
}

#[test]
fn mute_silences_music_only() {
    let mut director = AudioDirector::new(RecordingHost::default(), true);
    assert_eq!(director.host().muted, Some(true));

    director.dispatch_all(&[GameEvent::MusicStart, GameEvent::Sound(Cue::SpeedPickup)]);
    assert_eq!(director.host().music_starts, 1);
    assert!(!director.host().music_audible());
    assert_eq!(director.host().played.len(), 1);

    director.dispatch(&GameEvent::MusicMuted(false));
    assert!(!director.is_muted());
    assert_eq!(director.host().muted, Some(false));
    assert!(director.host().music_audible());

    director.dispatch(&GameEvent::MusicStop);
    assert_eq!(director.host().music_stops, 1);
    assert!(!director.host().music_audible());
}

#[test]
fn unmuting_mid_run_makes_music_audible() {
    let mut controller = RunController::with_muted(
        GameMode::Normal,
        StdRng::seed_from_u64(11),
        MemoryStore::new(),
        true,
    );
    let mut director = AudioDirector::new(RecordingHost::default(), true);
    director.dispatch_all(&controller.drain_events());

    controller.steer(1, 0);
    controller.update(16);
    director.dispatch_all(&controller.drain_events());
    assert!(!director.host().music_audible());

    controller.handle(Command::ToggleMute);
    director.dispatch_all(&controller.drain_events());
    assert!(!director.is_muted());
    assert!(director.host().music_audible());
}

#[test]
fn music_failure_is_not_fatal() {
    let host = RecordingHost {
        fail_music: true,
        ..Default::default()
    };
    let mut director = AudioDirector::new(host, false);
    director.dispatch(&GameEvent::MusicStart);
    director.dispatch(&GameEvent::Sound(Cue::ShieldPickup));
    assert_eq!(director.host().played, vec![(Cue::ShieldPickup, 1.0)]);
}

#[test]
fn non_audio_events_are_ignored() {
    let mut director = AudioDirector::new(RecordingHost::default(), false);
    director.dispatch_all(&[GameEvent::RunStarted, GameEvent::Paused, GameEvent::Reset]);
    assert!(director.host().played.is_empty());
    assert_eq!(director.host().music_starts, 0);
}
