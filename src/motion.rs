//! Per-tick movement rules.
//!
//! Obstacles and power-ups fly in straight lines and bounce off the field
//! edges; obstacles also spin. The ship is clamped to the field instead.

use crate::entities::{Body, Obstacle, Ship, FIELD_HEIGHT, FIELD_WIDTH};

fn seconds(delta_ms: u64) -> f32 {
    delta_ms as f32 / 1000.0
}

/// Advance an obstacle's spin angle.
pub fn advance(obstacle: &mut Obstacle, delta_ms: u64) {
    if obstacle.spinning {
        obstacle.angle = (obstacle.angle + obstacle.angular_velocity * seconds(delta_ms)).rem_euclid(360.0);
    }
}

/// Freeze an obstacle's rotation for good (used when the run ends).
pub fn stop_spinning(obstacle: &mut Obstacle) {
    obstacle.angular_velocity = 0.0;
    obstacle.spinning = false;
}

/// Move a body by its velocity and bounce it off the field edges.
///
/// A velocity component is only reflected while the body is past an edge and
/// still heading outward, so power-ups dropped outside the field drift in.
pub fn integrate(body: &mut Body, delta_ms: u64) {
    let dt = seconds(delta_ms);
    body.position = body.position + body.velocity * dt;

    let b = body.bounds();
    if (b.left() < 0.0 && body.velocity.x < 0.0) || (b.right() > FIELD_WIDTH && body.velocity.x > 0.0) {
        body.velocity.x = -body.velocity.x;
    }
    if (b.top() < 0.0 && body.velocity.y < 0.0) || (b.bottom() > FIELD_HEIGHT && body.velocity.y > 0.0) {
        body.velocity.y = -body.velocity.y;
    }
}

/// Move the ship and keep its (scaled) hitbox inside the field.
pub fn integrate_ship(ship: &mut Ship, delta_ms: u64, hitbox_scale: f32) {
    let dt = seconds(delta_ms);
    let body = &mut ship.body;
    body.position = body.position + body.velocity * dt;

    let half = body.half_extents * hitbox_scale;
    body.position.x = body.position.x.clamp(half.x, FIELD_WIDTH - half.x);
    body.position.y = body.position.y.clamp(half.y, FIELD_HEIGHT - half.y);
}
