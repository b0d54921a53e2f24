//! The per-mode run state machine.
//!
//! `NotStarted → Running ⇄ Paused → GameOver → (reset) → NotStarted`
//!
//! One `RunController` drives every mode; the mode only selects the
//! `ModeConfig` numbers. The host calls `steer` with the held direction and
//! `update` once per frame, feeds discrete keys to `handle`, and drains the
//! queued `GameEvent`s afterwards.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::Cue;
use crate::collision::{self, Resolution};
use crate::effects::PlayerEffectState;
use crate::entities::{PowerUpKind, Vec2, World};
use crate::events::GameEvent;
use crate::modes::{GameMode, ModeConfig};
use crate::motion;
use crate::spawner::{self, SpawnAlternator};
use crate::store::ScoreStore;
use crate::waves::{WaveFired, WaveScheduler};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    /// Entities are placed but stationary until the first directional input.
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Discrete inputs besides steering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    ToggleMute,
    ToggleInstructions,
    Restart,
    ReturnToMenu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Stay,
    ExitToMenu { muted: bool },
}

/// Persisted high-water marks for the active mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BestRecord {
    pub time_ms: u64,
    pub wave: u32,
}

impl BestRecord {
    /// Missing or unusable values read as 0 ms and wave 1.
    pub fn load(store: &impl ScoreStore, config: &ModeConfig) -> Self {
        let time_ms = store
            .get_integer(&config.high_score_key())
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(0);
        let wave = store
            .get_integer(&config.highest_wave_key())
            .and_then(|v| u32::try_from(v).ok())
            .filter(|w| *w >= 1)
            .unwrap_or(1);
        Self { time_ms, wave }
    }
}

/// How the last run ended, kept for the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub time_ms: u64,
    pub wave: u32,
    pub new_best_time: bool,
    pub new_best_wave: bool,
}

/// Everything about a run that a reset throws away.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub phase: RunPhase,
    /// Survival time in milliseconds; doubles as the score.
    pub score_ms: u64,
    pub scheduler: WaveScheduler,
    pub alternator: SpawnAlternator,
    pub instructions_visible: bool,
    pub outcome: Option<RunOutcome>,
}

impl RunState {
    fn new(config: &ModeConfig) -> Self {
        Self {
            phase: RunPhase::NotStarted,
            score_ms: 0,
            scheduler: WaveScheduler::new(config),
            alternator: SpawnAlternator::default(),
            instructions_visible: false,
            outcome: None,
        }
    }
}

pub struct RunController<R: Rng, S: ScoreStore> {
    config: ModeConfig,
    rng: R,
    store: S,
    state: RunState,
    effects: PlayerEffectState,
    world: World,
    best: BestRecord,
    muted: bool,
    steering: Vec2,
    events: Vec<GameEvent>,
}

impl<R: Rng, S: ScoreStore> RunController<R, S> {
    pub fn new(mode: GameMode, rng: R, store: S) -> Self {
        Self::with_muted(mode, rng, store, false)
    }

    pub fn with_muted(mode: GameMode, rng: R, store: S, muted: bool) -> Self {
        let config = mode.config();
        let best = BestRecord::load(&store, &config);
        let mut controller = Self {
            state: RunState::new(&config),
            effects: PlayerEffectState::new(&config),
            world: World::new(),
            config,
            rng,
            store,
            best,
            muted,
            steering: Vec2::ZERO,
            events: Vec::new(),
        };
        controller.populate();
        controller.events.push(GameEvent::MusicStart);
        info!(mode = %mode, best_time_ms = best.time_ms, best_wave = best.wave, "mode loaded");
        controller
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn score_ms(&self) -> u64 {
        self.state.score_ms
    }

    pub fn wave(&self) -> u32 {
        self.state.scheduler.wave()
    }

    pub fn countdown_seconds(&self) -> Option<u64> {
        self.state.scheduler.countdown_seconds()
    }

    pub fn alternator(&self) -> SpawnAlternator {
        self.state.alternator
    }

    /// Set once the run has ended, cleared by `reset`.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.state.outcome
    }

    pub fn best(&self) -> BestRecord {
        self.best
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the live entities.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn effects(&self) -> &PlayerEffectState {
        &self.effects
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn instructions_visible(&self) -> bool {
        self.state.instructions_visible
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand the store back, e.g. to reuse it for the next mode.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Set the held direction (each axis -1, 0 or 1). The first non-zero
    /// direction starts the run.
    pub fn steer(&mut self, dx: i8, dy: i8) {
        self.steering = Vec2::new(f32::from(dx.signum()), f32::from(dy.signum()));
        if self.state.phase == RunPhase::NotStarted && !self.steering.is_zero() {
            self.start_run();
        }
    }

    pub fn handle(&mut self, command: Command) -> Transition {
        match command {
            Command::TogglePause => self.toggle_pause(),
            Command::ToggleInstructions => {
                if self.state.phase == RunPhase::Paused {
                    self.state.instructions_visible = !self.state.instructions_visible;
                }
            }
            Command::ToggleMute => {
                self.muted = !self.muted;
                self.events.push(GameEvent::MusicMuted(self.muted));
            }
            Command::Restart => {
                if self.state.phase == RunPhase::GameOver {
                    self.reset();
                }
            }
            Command::ReturnToMenu => {
                self.events.push(GameEvent::MusicStop);
                return Transition::ExitToMenu { muted: self.muted };
            }
        }
        Transition::Stay
    }

    fn toggle_pause(&mut self) {
        let next = match self.state.phase {
            RunPhase::Running => {
                self.events.push(GameEvent::Paused);
                RunPhase::Paused
            }
            RunPhase::Paused => {
                self.events.push(GameEvent::Resumed);
                RunPhase::Running
            }
            RunPhase::NotStarted | RunPhase::GameOver => return,
        };
        self.state.phase = next;
        self.state.instructions_visible = false;
        self.events.push(GameEvent::Sound(Cue::Pause));
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Place the opening obstacles and power-ups, all stationary.
    fn populate(&mut self) {
        let ship = self.world.ship.body.position;
        let alternator = &mut self.state.alternator;
        let rng = &mut self.rng;

        self.world.obstacles =
            spawner::spawn_obstacles(self.config.initial_obstacles, &self.config, ship, alternator, rng);
        self.world.power_ups.speed =
            spawner::spawn_power_ups(PowerUpKind::Speed, self.config.initial_speed_power_ups, alternator, rng);
        self.world.power_ups.slowdown =
            spawner::spawn_power_ups(PowerUpKind::Slowdown, self.config.initial_slowdown_power_ups, alternator, rng);
        self.world.power_ups.shield =
            spawner::spawn_power_ups(PowerUpKind::Shield, self.config.initial_shield_power_ups, alternator, rng);
        self.events.push(GameEvent::Sound(Cue::Wave));
    }

    fn start_run(&mut self) {
        self.state.phase = RunPhase::Running;
        self.state.scheduler.activate();

        let from_top = self.state.alternator.from_top();
        for obstacle in &mut self.world.obstacles {
            spawner::start_obstacle(obstacle, from_top, &self.config, &mut self.rng);
        }
        for power_up in self.world.power_ups.iter_mut() {
            spawner::start_power_up(power_up, !from_top, &self.config, &mut self.rng);
        }
        self.state.alternator.toggle();

        self.events.push(GameEvent::RunStarted);
        info!(mode = %self.config.mode, "run started");
    }

    /// Rebuild the run exactly as a fresh controller would; best record and
    /// mute flag survive.
    pub fn reset(&mut self) {
        self.state = RunState::new(&self.config);
        self.effects = PlayerEffectState::new(&self.config);
        self.world = World::new();
        self.steering = Vec2::ZERO;
        self.populate();
        self.events.push(GameEvent::Reset);
        self.events.push(GameEvent::MusicStart);
        debug!(mode = %self.config.mode, "run reset");
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the run by one frame. Nothing moves or counts unless running.
    pub fn update(&mut self, delta_ms: u64) {
        if self.state.phase != RunPhase::Running {
            return;
        }
        self.state.score_ms += delta_ms;

        let ship = &mut self.world.ship;
        ship.body.velocity = self.steering * self.effects.speed();
        motion::integrate_ship(ship, delta_ms, self.effects.hitbox_scale());
        for obstacle in &mut self.world.obstacles {
            motion::integrate(&mut obstacle.body, delta_ms);
            motion::advance(obstacle, delta_ms);
        }
        for power_up in self.world.power_ups.iter_mut() {
            motion::integrate(&mut power_up.body, delta_ms);
        }

        let tick = self.state.scheduler.update(delta_ms);
        if let Some(fired) = tick.wave {
            self.launch_wave(fired);
        }
        if tick.power_up_drop {
            self.drop_power_ups();
        }

        for kind in self.effects.update(delta_ms, &mut self.world.obstacles) {
            self.events.push(GameEvent::EffectExpired(kind));
        }

        for resolution in collision::resolve(&mut self.world, &mut self.effects) {
            match resolution {
                Resolution::ObstacleShattered => self.events.push(GameEvent::Sound(Cue::ObstacleShattered)),
                Resolution::PickedUp(kind) => {
                    self.events.push(GameEvent::PickedUp(kind));
                    self.events.push(GameEvent::Sound(pickup_cue(kind)));
                }
                Resolution::Lethal => self.end_run(),
            }
        }
    }

    /// Replace the obstacle set with a fresh, already moving wave.
    fn launch_wave(&mut self, fired: WaveFired) {
        let ship = self.world.ship.body.position;
        let mut obstacles = spawner::spawn_obstacles(
            self.config.wave_obstacle_count,
            &self.config,
            ship,
            &mut self.state.alternator,
            &mut self.rng,
        );
        let from_top = self.state.alternator.from_top();
        for obstacle in &mut obstacles {
            spawner::start_obstacle(obstacle, from_top, &self.config, &mut self.rng);
        }
        self.state.alternator.toggle();
        self.world.obstacles = obstacles;

        self.events.push(GameEvent::Sound(Cue::Wave));
        self.events.push(GameEvent::WaveStarted {
            wave: fired.wave,
            shield_bonus: fired.shield_bonus,
        });
        debug!(wave = fired.wave, shield_bonus = fired.shield_bonus, "wave launched");

        if fired.shield_bonus {
            let mut shield = spawner::spawn_power_up(PowerUpKind::Shield, &mut self.state.alternator, &mut self.rng);
            spawner::start_power_up(&mut shield, !self.state.alternator.from_top(), &self.config, &mut self.rng);
            self.world.power_ups.shield.push(shield);
        }
    }

    fn drop_power_ups(&mut self) {
        let mut speed = spawner::spawn_power_up(PowerUpKind::Speed, &mut self.state.alternator, &mut self.rng);
        let mut slowdown =
            spawner::spawn_power_up(PowerUpKind::Slowdown, &mut self.state.alternator, &mut self.rng);
        let from_top = !self.state.alternator.from_top();
        spawner::start_power_up(&mut speed, from_top, &self.config, &mut self.rng);
        spawner::start_power_up(&mut slowdown, from_top, &self.config, &mut self.rng);
        self.world.power_ups.speed.push(speed);
        self.world.power_ups.slowdown.push(slowdown);
        self.events.push(GameEvent::PowerUpDropped);
        debug!("power-ups dropped");
    }

    fn end_run(&mut self) {
        self.state.phase = RunPhase::GameOver;
        self.world.ship.body.velocity = Vec2::ZERO;
        for obstacle in &mut self.world.obstacles {
            motion::stop_spinning(obstacle);
        }
        self.events.push(GameEvent::MusicStop);
        self.events.push(GameEvent::Sound(Cue::Death));

        let time_ms = self.state.score_ms;
        let wave = self.wave();
        let new_best_time = time_ms > self.best.time_ms;
        let new_best_wave = wave > self.best.wave;
        if new_best_time {
            self.best.time_ms = time_ms;
            let key = self.config.high_score_key();
            self.persist(&key, i64::try_from(time_ms).unwrap_or(i64::MAX));
        }
        if new_best_wave {
            self.best.wave = wave;
            let key = self.config.highest_wave_key();
            self.persist(&key, i64::from(wave));
        }

        self.state.outcome = Some(RunOutcome {
            time_ms,
            wave,
            new_best_time,
            new_best_wave,
        });
        self.events.push(GameEvent::RunEnded {
            time_ms,
            wave,
            new_best_time,
            new_best_wave,
        });
        info!(mode = %self.config.mode, time_ms, wave, new_best_time, new_best_wave, "run ended");
    }

    fn persist(&mut self, key: &str, value: i64) {
        if let Err(e) = self.store.set_integer(key, value) {
            warn!(key, value, "could not save best record: {e}");
        }
    }
}

fn pickup_cue(kind: PowerUpKind) -> Cue {
    match kind {
        PowerUpKind::Speed => Cue::SpeedPickup,
        PowerUpKind::Slowdown => Cue::SlowdownPickup,
        PowerUpKind::Shield => Cue::ShieldPickup,
    }
}

/// `mm:ss:cc` (centiseconds), the clock format shown on the HUD.
pub fn format_time(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let centis = (millis % 1000) / 10;
    format!("{minutes:02}:{seconds:02}:{centis:02}")
}
