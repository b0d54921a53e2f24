//! Timed buffs on the ship and the world.
//!
//! Speed boost and shield are two states of the same slot, so at most one of
//! them is ever active. Slowdown is a world effect tracked separately and can
//! overlap either.

use tracing::debug;

use crate::entities::Obstacle;
use crate::modes::ModeConfig;

/// Ship hitbox and sprite scale while boosted or shielded.
pub const BUFFED_HITBOX_SCALE: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    SpeedBoost,
    Shield,
    Slowdown,
}

/// The ship's exclusive buff slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buff {
    None,
    SpeedBoost { remaining_ms: u64 },
    Shield { remaining_ms: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerEffectState {
    base_speed: f32,
    boost_factor: f32,
    shield_factor: f32,
    duration_ms: u64,
    buff: Buff,
    slowdown_remaining_ms: Option<u64>,
}

impl PlayerEffectState {
    pub fn new(config: &ModeConfig) -> Self {
        Self {
            base_speed: config.ship_base_speed,
            boost_factor: config.speed_boost_factor,
            shield_factor: config.shield_speed_factor,
            duration_ms: config.effect_duration_ms,
            buff: Buff::None,
            slowdown_remaining_ms: None,
        }
    }

    pub fn buff(&self) -> Buff {
        self.buff
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    /// Current ship speed in px/s.
    pub fn speed(&self) -> f32 {
        match self.buff {
            Buff::None => self.base_speed,
            Buff::SpeedBoost { .. } => self.base_speed * self.boost_factor,
            Buff::Shield { .. } => self.base_speed * self.shield_factor,
        }
    }

    pub fn hitbox_scale(&self) -> f32 {
        match self.buff {
            Buff::None => 1.0,
            Buff::SpeedBoost { .. } | Buff::Shield { .. } => BUFFED_HITBOX_SCALE,
        }
    }

    pub fn is_shielded(&self) -> bool {
        matches!(self.buff, Buff::Shield { .. })
    }

    pub fn is_boosted(&self) -> bool {
        matches!(self.buff, Buff::SpeedBoost { .. })
    }

    pub fn is_slowdown_active(&self) -> bool {
        self.slowdown_remaining_ms.is_some()
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining_ms(kind).is_some()
    }

    pub fn remaining_ms(&self, kind: EffectKind) -> Option<u64> {
        match (kind, self.buff) {
            (EffectKind::SpeedBoost, Buff::SpeedBoost { remaining_ms }) => Some(remaining_ms),
            (EffectKind::Shield, Buff::Shield { remaining_ms }) => Some(remaining_ms),
            (EffectKind::Slowdown, _) => self.slowdown_remaining_ms,
            _ => None,
        }
    }

    /// Returns `false` (and changes nothing) if the buff slot is taken.
    pub fn apply_speed_boost(&mut self) -> bool {
        if self.buff != Buff::None {
            return false;
        }
        self.buff = Buff::SpeedBoost {
            remaining_ms: self.duration_ms,
        };
        debug!(speed = self.speed(), "speed boost applied");
        true
    }

    /// Returns `false` (and changes nothing) if the buff slot is taken.
    pub fn apply_shield(&mut self) -> bool {
        if self.buff != Buff::None {
            return false;
        }
        self.buff = Buff::Shield {
            remaining_ms: self.duration_ms,
        };
        debug!(speed = self.speed(), "shield applied");
        true
    }

    /// Halve every live obstacle's velocity. Returns `false` if a slowdown is
    /// already running.
    pub fn apply_slowdown(&mut self, obstacles: &mut [Obstacle]) -> bool {
        if self.slowdown_remaining_ms.is_some() {
            return false;
        }
        for obstacle in obstacles.iter_mut() {
            obstacle.body.velocity = obstacle.body.velocity * 0.5;
            obstacle.slowed = true;
        }
        self.slowdown_remaining_ms = Some(self.duration_ms);
        debug!(obstacles = obstacles.len(), "slowdown applied");
        true
    }

    /// Tick every countdown and return the effects that ran out.
    ///
    /// Expired slowdowns double the velocity of the obstacles they halved
    /// that are still alive; obstacles spawned meanwhile keep their speed.
    pub fn update(&mut self, delta_ms: u64, obstacles: &mut [Obstacle]) -> Vec<EffectKind> {
        let mut expired = Vec::new();

        let buff_expired = match &mut self.buff {
            Buff::None => None,
            Buff::SpeedBoost { remaining_ms } => {
                *remaining_ms = remaining_ms.saturating_sub(delta_ms);
                (*remaining_ms == 0).then_some(EffectKind::SpeedBoost)
            }
            Buff::Shield { remaining_ms } => {
                *remaining_ms = remaining_ms.saturating_sub(delta_ms);
                (*remaining_ms == 0).then_some(EffectKind::Shield)
            }
        };
        if let Some(kind) = buff_expired {
            self.buff = Buff::None;
            expired.push(kind);
        }

        if let Some(remaining_ms) = self.slowdown_remaining_ms {
            let remaining_ms = remaining_ms.saturating_sub(delta_ms);
            if remaining_ms == 0 {
                self.slowdown_remaining_ms = None;
                for obstacle in obstacles.iter_mut().filter(|o| o.slowed) {
                    obstacle.body.velocity = obstacle.body.velocity * 2.0;
                    obstacle.slowed = false;
                }
                expired.push(EffectKind::Slowdown);
            } else {
                self.slowdown_remaining_ms = Some(remaining_ms);
            }
        }

        for kind in &expired {
            debug!(?kind, "effect expired");
        }
        expired
    }
}
