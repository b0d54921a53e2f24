//! Game entity types: plain data plus the small geometric helpers the rest of
//! the core shares.

use std::ops::{Add, Mul, Sub};

// ── Play-field geometry ───────────────────────────────────────────────────────

/// Logical play-field size in pixels. The terminal host scales this down to
/// whatever grid it has.
pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;

/// Power-ups are dropped this far outside the top or bottom edge.
pub const OFF_FIELD_MARGIN: f32 = 100.0;

/// Ship sprite edge length at normal scale.
pub const SHIP_SIZE: f32 = 32.0;
/// Obstacle sprite edge length range (uniformly sampled per obstacle).
pub const OBSTACLE_SIZE_MIN: f32 = 18.0;
pub const OBSTACLE_SIZE_MAX: f32 = 54.0;
pub const POWER_UP_SIZE: f32 = 32.0;
/// Obstacle and power-up hitboxes are smaller than their sprites.
pub const HITBOX_SCALE: f32 = 0.8;

/// Obstacle spin speed range in degrees per second.
pub const SPIN_MIN: f32 = 50.0;
pub const SPIN_MAX: f32 = 200.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box given by its centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }
    pub fn top(&self) -> f32 {
        self.center.y - self.half.y
    }
    pub fn bottom(&self) -> f32 {
        self.center.y + self.half.y
    }

    /// Touching edges count as an overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.right() < other.left()
            || self.bottom() < other.top()
            || self.left() > other.right()
            || self.top() > other.bottom())
    }
}

// ── Bodies ────────────────────────────────────────────────────────────────────

/// Position, velocity (px/s) and collision half extents of a moving entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub half_extents: Vec2,
}

impl Body {
    /// A stationary square body.
    pub fn at(position: Vec2, size: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(size / 2.0, size / 2.0),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb {
            center: self.position,
            half: self.half_extents,
        }
    }
}

/// Capabilities shared by obstacles and power-ups: positioned, moved by a
/// velocity, and collidable.
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn velocity(&self) -> Vec2 {
        self.body().velocity
    }

    fn bounds(&self) -> Aabb {
        self.body().bounds()
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub body: Body,
    /// Current rotation in degrees, [0, 360).
    pub angle: f32,
    /// Degrees per second while spinning.
    pub angular_velocity: f32,
    pub spinning: bool,
    /// Set while a slowdown that halved this obstacle is still pending.
    pub slowed: bool,
}

impl Obstacle {
    pub fn new(position: Vec2, size: f32, angular_velocity: f32) -> Self {
        Self {
            body: Body::at(position, size * HITBOX_SCALE),
            angle: 0.0,
            angular_velocity,
            spinning: false,
            slowed: false,
        }
    }
}

impl Entity for Obstacle {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Multiplies ship speed for the effect duration.
    Speed,
    /// Halves every live obstacle's velocity for the effect duration.
    Slowdown,
    /// Obstacles touching the ship are destroyed instead of ending the run.
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Slowdown, PowerUpKind::Shield];
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub body: Body,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Vec2) -> Self {
        Self {
            kind,
            body: Body::at(position, POWER_UP_SIZE * HITBOX_SCALE),
        }
    }
}

impl Entity for PowerUp {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// One collection per power-up kind, so nothing has to inspect an entity to
/// find out what it is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUps {
    pub speed: Vec<PowerUp>,
    pub slowdown: Vec<PowerUp>,
    pub shield: Vec<PowerUp>,
}

impl PowerUps {
    pub fn of_kind(&self, kind: PowerUpKind) -> &Vec<PowerUp> {
        match kind {
            PowerUpKind::Speed => &self.speed,
            PowerUpKind::Slowdown => &self.slowdown,
            PowerUpKind::Shield => &self.shield,
        }
    }

    pub fn of_kind_mut(&mut self, kind: PowerUpKind) -> &mut Vec<PowerUp> {
        match kind {
            PowerUpKind::Speed => &mut self.speed,
            PowerUpKind::Slowdown => &mut self.slowdown,
            PowerUpKind::Shield => &mut self.shield,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUp> {
        self.speed.iter().chain(self.slowdown.iter()).chain(self.shield.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PowerUp> {
        self.speed
            .iter_mut()
            .chain(self.slowdown.iter_mut())
            .chain(self.shield.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.speed.len() + self.slowdown.len() + self.shield.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub body: Body,
}

impl Ship {
    /// A stationary ship in the middle of the field.
    pub fn centered() -> Self {
        Self {
            body: Body::at(Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0), SHIP_SIZE),
        }
    }

    /// Hitbox scaled by the current effect (boost and shield both enlarge it).
    pub fn bounds_scaled(&self, scale: f32) -> Aabb {
        Aabb {
            center: self.body.position,
            half: self.body.half_extents * scale,
        }
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Everything that lives on the field during one run.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub ship: Ship,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: PowerUps,
}

impl World {
    pub fn new() -> Self {
        Self {
            ship: Ship::centered(),
            obstacles: Vec::new(),
            power_ups: PowerUps::default(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
