//! Difficulty escalation timers.
//!
//! Two independent accumulators run while the scheduler is active: one arms a
//! "next wave incoming" countdown every obstacle-wave period, the other
//! requests a power-up drop every power-up period. The scheduler only keeps
//! time; the run controller performs the spawns it reports.

use crate::modes::ModeConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Before the player's first input.
    Idle,
    Active,
}

/// A wave that just fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveFired {
    /// The new wave number.
    pub wave: u32,
    /// The new wave hit the mode's shield milestone.
    pub shield_bonus: bool,
}

/// What one `update` call asks the controller to do, in processing order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleTick {
    pub wave: Option<WaveFired>,
    pub power_up_drop: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveScheduler {
    config: ModeConfig,
    state: SchedulerState,
    wave: u32,
    obstacle_elapsed_ms: u64,
    /// Remaining warning time; `None` while no wave is pending.
    countdown_ms: Option<i64>,
    power_up_elapsed_ms: u64,
}

impl WaveScheduler {
    pub fn new(config: &ModeConfig) -> Self {
        Self {
            config: config.clone(),
            state: SchedulerState::Idle,
            wave: 1,
            obstacle_elapsed_ms: 0,
            countdown_ms: None,
            power_up_elapsed_ms: 0,
        }
    }

    pub fn activate(&mut self) {
        self.state = SchedulerState::Active;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn countdown_ms(&self) -> Option<i64> {
        self.countdown_ms
    }

    pub fn obstacle_elapsed_ms(&self) -> u64 {
        self.obstacle_elapsed_ms
    }

    pub fn power_up_elapsed_ms(&self) -> u64 {
        self.power_up_elapsed_ms
    }

    /// Whole seconds left on the incoming-wave warning, rounded up.
    pub fn countdown_seconds(&self) -> Option<u64> {
        self.countdown_ms.map(|ms| (ms.max(0) as u64).div_ceil(1000))
    }

    /// Advance both timers. Does nothing while idle; the caller stops calling
    /// it while the run is paused or over.
    pub fn update(&mut self, delta_ms: u64) -> ScheduleTick {
        if self.state == SchedulerState::Idle {
            return ScheduleTick::default();
        }
        let wave = self.update_obstacle_wave(delta_ms);
        let power_up_drop = self.update_power_ups(delta_ms);
        ScheduleTick { wave, power_up_drop }
    }

    fn update_obstacle_wave(&mut self, delta_ms: u64) -> Option<WaveFired> {
        self.obstacle_elapsed_ms += delta_ms;
        if self.obstacle_elapsed_ms >= self.config.obstacle_wave_period_ms && self.countdown_ms.is_none() {
            self.countdown_ms = Some(self.config.wave_warning_ms as i64);
        }

        let remaining = self.countdown_ms.as_mut()?;
        *remaining -= delta_ms as i64;
        if *remaining > 0 {
            return None;
        }

        self.countdown_ms = None;
        self.obstacle_elapsed_ms = 0;
        self.wave += 1;
        Some(WaveFired {
            wave: self.wave,
            shield_bonus: self.config.shield_milestone.is_reached(self.wave),
        })
    }

    fn update_power_ups(&mut self, delta_ms: u64) -> bool {
        self.power_up_elapsed_ms += delta_ms;
        if self.power_up_elapsed_ms >= self.config.power_up_period_ms {
            self.power_up_elapsed_ms = 0;
            return true;
        }
        false
    }
}
