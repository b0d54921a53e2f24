//! Entity placement and launch.
//!
//! Spawning and starting are separate steps: entities are created stationary
//! and only get a velocity when `start_*` is called, either when the run
//! begins or right after a wave/drop creates them. All randomness comes
//! through the injected `rng`.

use rand::Rng;
use tracing::warn;

use crate::entities::{
    Obstacle, PowerUp, PowerUpKind, Vec2, FIELD_HEIGHT, FIELD_WIDTH, OBSTACLE_SIZE_MAX, OBSTACLE_SIZE_MIN,
    OFF_FIELD_MARGIN, SPIN_MAX, SPIN_MIN,
};
use crate::modes::{ModeConfig, VelocityRange};

/// Uniform samples tried before falling back to edge placement.
pub const MAX_SPAWN_ATTEMPTS: usize = 64;
/// Perimeter samples tried before settling on the farthest corner.
const MAX_EDGE_ATTEMPTS: usize = 16;

// ── Alternator ────────────────────────────────────────────────────────────────

/// Flips on every spawn so successive entities enter from alternating edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnAlternator {
    from_top: bool,
}

impl Default for SpawnAlternator {
    fn default() -> Self {
        Self { from_top: true }
    }
}

impl SpawnAlternator {
    pub fn from_top(&self) -> bool {
        self.from_top
    }

    pub fn toggle(&mut self) {
        self.from_top = !self.from_top;
    }

    /// Current value, then flip.
    pub fn take(&mut self) -> bool {
        let current = self.from_top;
        self.toggle();
        current
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// Create `count` stationary obstacles, each at least
/// `config.min_spawn_distance` away from `ship`.
pub fn spawn_obstacles(
    count: usize,
    config: &ModeConfig,
    ship: Vec2,
    alternator: &mut SpawnAlternator,
    rng: &mut impl Rng,
) -> Vec<Obstacle> {
    (0..count)
        .map(|_| {
            let position = obstacle_position(config.min_spawn_distance, ship, rng);
            let size = rng.gen_range(OBSTACLE_SIZE_MIN..=OBSTACLE_SIZE_MAX);
            let spin = rng.gen_range(SPIN_MIN..=SPIN_MAX);
            alternator.toggle();
            Obstacle::new(position, size, spin)
        })
        .collect()
}

fn obstacle_position(min_distance: f32, ship: Vec2, rng: &mut impl Rng) -> Vec2 {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(rng.gen_range(0.0..=FIELD_WIDTH), rng.gen_range(0.0..=FIELD_HEIGHT));
        if candidate.distance(ship) >= min_distance {
            return candidate;
        }
    }

    warn!(min_distance, "obstacle placement did not converge, falling back to the field edge");
    for _ in 0..MAX_EDGE_ATTEMPTS {
        let candidate = edge_position(rng);
        if candidate.distance(ship) >= min_distance {
            return candidate;
        }
    }
    farthest_corner(ship)
}

/// A uniformly chosen point on the field perimeter.
fn edge_position(rng: &mut impl Rng) -> Vec2 {
    let along = rng.gen_range(0.0..=1.0f32);
    match rng.gen_range(0..4) {
        0 => Vec2::new(along * FIELD_WIDTH, 0.0),
        1 => Vec2::new(along * FIELD_WIDTH, FIELD_HEIGHT),
        2 => Vec2::new(0.0, along * FIELD_HEIGHT),
        _ => Vec2::new(FIELD_WIDTH, along * FIELD_HEIGHT),
    }
}

fn farthest_corner(ship: Vec2) -> Vec2 {
    let x = if ship.x < FIELD_WIDTH / 2.0 { FIELD_WIDTH } else { 0.0 };
    let y = if ship.y < FIELD_HEIGHT / 2.0 { FIELD_HEIGHT } else { 0.0 };
    Vec2::new(x, y)
}

/// Give an obstacle its velocity and start it spinning.
pub fn start_obstacle(obstacle: &mut Obstacle, from_top: bool, config: &ModeConfig, rng: &mut impl Rng) {
    obstacle.body.velocity = launch_velocity(&config.obstacle_velocity, from_top, rng);
    obstacle.spinning = true;
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

/// Create one stationary power-up just outside the top or bottom edge.
pub fn spawn_power_up(kind: PowerUpKind, alternator: &mut SpawnAlternator, rng: &mut impl Rng) -> PowerUp {
    let x = rng.gen_range(0.0..=FIELD_WIDTH);
    let y = if alternator.take() {
        -OFF_FIELD_MARGIN
    } else {
        FIELD_HEIGHT + OFF_FIELD_MARGIN
    };
    PowerUp::new(kind, Vec2::new(x, y))
}

pub fn spawn_power_ups(
    kind: PowerUpKind,
    count: usize,
    alternator: &mut SpawnAlternator,
    rng: &mut impl Rng,
) -> Vec<PowerUp> {
    (0..count).map(|_| spawn_power_up(kind, alternator, rng)).collect()
}

pub fn start_power_up(power_up: &mut PowerUp, from_top: bool, config: &ModeConfig, rng: &mut impl Rng) {
    power_up.body.velocity = launch_velocity(&config.power_up_velocity, from_top, rng);
}

// ── Shared ────────────────────────────────────────────────────────────────────

/// Downward when entering from the top, upward otherwise; the horizontal
/// component is independent of the edge.
fn launch_velocity(range: &VelocityRange, from_top: bool, rng: &mut impl Rng) -> Vec2 {
    let speed_y = rng.gen_range(range.y_min..=range.y_max);
    let vy = if from_top { speed_y } else { -speed_y };
    let vx = rng.gen_range(range.x_min..=range.x_max);
    Vec2::new(vx, vy)
}
