use asteroid_dodger::collision::*;
use asteroid_dodger::effects::PlayerEffectState;
use asteroid_dodger::entities::*;
use asteroid_dodger::modes::GameMode;

fn setup() -> (World, PlayerEffectState) {
    (World::new(), PlayerEffectState::new(&GameMode::Normal.config()))
}

fn ship_pos(world: &World) -> Vec2 {
    world.ship.body.position
}

fn offset(p: Vec2, dx: f32, dy: f32) -> Vec2 {
    Vec2::new(p.x + dx, p.y + dy)
}

#[test]
fn empty_world_has_no_outcomes() {
    let (mut world, mut effects) = setup();
    assert!(resolve(&mut world, &mut effects).is_empty());
}

#[test]
fn unshielded_hit_is_lethal() {
    let (mut world, mut effects) = setup();
    world.obstacles.push(Obstacle::new(ship_pos(&world), 30.0, 100.0));
    assert_eq!(resolve(&mut world, &mut effects), vec![Resolution::Lethal]);
    assert_eq!(world.obstacles.len(), 1);
}

#[test]
fn lethal_hit_blocks_pickups() {
    let (mut world, mut effects) = setup();
    world.obstacles.push(Obstacle::new(ship_pos(&world), 30.0, 100.0));
    world.power_ups.speed.push(PowerUp::new(PowerUpKind::Speed, ship_pos(&world)));
    assert_eq!(resolve(&mut world, &mut effects), vec![Resolution::Lethal]);
    assert_eq!(world.power_ups.speed.len(), 1);
    assert!(!effects.is_boosted());
}

#[test]
fn shield_destroys_every_touching_obstacle() {
    let (mut world, mut effects) = setup();
    effects.apply_shield();
    let p = ship_pos(&world);
    for dx in [-10.0, 0.0, 10.0] {
        world.obstacles.push(Obstacle::new(offset(p, dx, 0.0), 30.0, 100.0));
    }
    let far = Obstacle::new(offset(p, 300.0, 0.0), 30.0, 100.0);
    world.obstacles.push(far.clone());

    let outcomes = resolve(&mut world, &mut effects);
    assert_eq!(outcomes, vec![Resolution::ObstacleShattered; 3]);
    assert_eq!(world.obstacles, vec![far]);
}

#[test]
fn buffed_hitbox_reaches_further() {
    let (mut world, mut effects) = setup();
    let p = ship_pos(&world);
    // Ship half extent 16; obstacle half extent 4 sitting 30 px away.
    world.obstacles.push(Obstacle::new(offset(p, 30.0, 0.0), 10.0, 100.0));
    assert!(resolve(&mut world, &mut effects).is_empty());

    effects.apply_shield();
    assert_eq!(resolve(&mut world, &mut effects), vec![Resolution::ObstacleShattered]);
}

#[test]
fn pickup_applies_effect_and_removes_power_up() {
    let (mut world, mut effects) = setup();
    world.power_ups.speed.push(PowerUp::new(PowerUpKind::Speed, ship_pos(&world)));
    assert_eq!(
        resolve(&mut world, &mut effects),
        vec![Resolution::PickedUp(PowerUpKind::Speed)]
    );
    assert!(world.power_ups.speed.is_empty());
    assert!(effects.is_boosted());
}

#[test]
fn refused_pickup_stays_on_field() {
    let (mut world, mut effects) = setup();
    effects.apply_speed_boost();
    world.power_ups.shield.push(PowerUp::new(PowerUpKind::Shield, ship_pos(&world)));
    assert!(resolve(&mut world, &mut effects).is_empty());
    assert_eq!(world.power_ups.shield.len(), 1);
    assert!(effects.is_boosted());
}

#[test]
fn slowdown_pickup_halves_live_obstacles() {
    let (mut world, mut effects) = setup();
    let p = ship_pos(&world);
    let mut o = Obstacle::new(offset(p, 300.0, 0.0), 30.0, 100.0);
    o.body.velocity = Vec2::new(100.0, 200.0);
    world.obstacles.push(o);
    world.power_ups.slowdown.push(PowerUp::new(PowerUpKind::Slowdown, p));

    assert_eq!(
        resolve(&mut world, &mut effects),
        vec![Resolution::PickedUp(PowerUpKind::Slowdown)]
    );
    assert_eq!(world.obstacles[0].body.velocity, Vec2::new(50.0, 100.0));
    assert!(effects.is_slowdown_active());
}

#[test]
fn overlapping_power_ups_of_different_kinds() {
    let (mut world, mut effects) = setup();
    let p = ship_pos(&world);
    world.power_ups.speed.push(PowerUp::new(PowerUpKind::Speed, p));
    world.power_ups.slowdown.push(PowerUp::new(PowerUpKind::Slowdown, p));
    world.power_ups.shield.push(PowerUp::new(PowerUpKind::Shield, p));

    let outcomes = resolve(&mut world, &mut effects);
    assert_eq!(
        outcomes,
        vec![
            Resolution::PickedUp(PowerUpKind::Speed),
            Resolution::PickedUp(PowerUpKind::Slowdown),
        ]
    );
    assert_eq!(world.power_ups.shield.len(), 1);
}
