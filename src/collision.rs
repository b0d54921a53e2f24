//! Ship collision outcomes.
//!
//! Obstacles are resolved before power-ups. A lethal hit stops resolution for
//! the tick, so nothing is picked up on the frame the run ends.

use tracing::debug;

use crate::effects::PlayerEffectState;
use crate::entities::{Aabb, Entity, PowerUpKind, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A shielded ship destroyed an obstacle.
    ObstacleShattered,
    /// An unshielded ship touched an obstacle; the run is over.
    Lethal,
    PickedUp(PowerUpKind),
}

pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Resolve every ship overlap for this tick, mutating the world and effects.
pub fn resolve(world: &mut World, effects: &mut PlayerEffectState) -> Vec<Resolution> {
    let ship = world.ship.bounds_scaled(effects.hitbox_scale());
    let mut outcomes = Vec::new();

    if effects.is_shielded() {
        let before = world.obstacles.len();
        world.obstacles.retain(|obstacle| !overlaps(&ship, &obstacle.bounds()));
        let shattered = before - world.obstacles.len();
        if shattered > 0 {
            debug!(shattered, "shield destroyed obstacles");
        }
        outcomes.extend(std::iter::repeat(Resolution::ObstacleShattered).take(shattered));
    } else if world.obstacles.iter().any(|obstacle| overlaps(&ship, &obstacle.bounds())) {
        outcomes.push(Resolution::Lethal);
        return outcomes;
    }

    for kind in PowerUpKind::ALL {
        let mut i = 0;
        while i < world.power_ups.of_kind(kind).len() {
            if !overlaps(&ship, &world.power_ups.of_kind(kind)[i].bounds()) {
                i += 1;
                continue;
            }
            let applied = match kind {
                PowerUpKind::Speed => effects.apply_speed_boost(),
                PowerUpKind::Slowdown => effects.apply_slowdown(&mut world.obstacles),
                PowerUpKind::Shield => effects.apply_shield(),
            };
            if applied {
                world.power_ups.of_kind_mut(kind).remove(i);
                debug!(?kind, "power-up collected");
                outcomes.push(Resolution::PickedUp(kind));
            } else {
                // Refused pickups stay on the field.
                i += 1;
            }
        }
    }

    outcomes
}
