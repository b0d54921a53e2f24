use asteroid_dodger::entities::*;
use asteroid_dodger::motion::*;

fn square(x: f32, y: f32, half: f32) -> Aabb {
    Aabb {
        center: Vec2::new(x, y),
        half: Vec2::new(half, half),
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[test]
fn touching_edges_overlap() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(2.0, 0.0, 1.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn separated_boxes_do_not_overlap() {
    let a = square(0.0, 0.0, 1.0);
    assert!(!a.intersects(&square(2.5, 0.0, 1.0)));
    assert!(!a.intersects(&square(0.0, -2.5, 1.0)));
}

#[test]
fn vec2_distance() {
    assert_eq!(Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)), 5.0);
    assert!(Vec2::ZERO.is_zero());
    assert!(!Vec2::new(0.0, -1.0).is_zero());
}

#[test]
fn obstacle_hitbox_is_scaled_down() {
    let o = Obstacle::new(Vec2::new(100.0, 100.0), 50.0, 90.0);
    assert!((o.body.half_extents.x - 20.0).abs() < 1e-4);
    assert_eq!(o.body.velocity, Vec2::ZERO);
    assert!(!o.spinning);
    assert!(!o.slowed);
}

#[test]
fn power_up_collections_are_typed() {
    let mut p = PowerUps::default();
    assert!(p.is_empty());
    p.speed.push(PowerUp::new(PowerUpKind::Speed, Vec2::new(10.0, 10.0)));
    p.shield.push(PowerUp::new(PowerUpKind::Shield, Vec2::new(20.0, 10.0)));
    p.of_kind_mut(PowerUpKind::Shield)
        .push(PowerUp::new(PowerUpKind::Shield, Vec2::new(30.0, 10.0)));

    assert_eq!(p.len(), 3);
    assert_eq!(p.of_kind(PowerUpKind::Slowdown).len(), 0);
    assert_eq!(p.of_kind(PowerUpKind::Shield).len(), 2);
    assert!(p.iter().all(|pu| pu.body.velocity == Vec2::ZERO));
}

#[test]
fn world_starts_with_centered_ship() {
    let w = World::new();
    assert_eq!(w.ship.body.position, Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0));
    assert!(w.obstacles.is_empty());
    assert!(w.power_ups.is_empty());
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[test]
fn integrate_moves_by_velocity() {
    let mut body = Body::at(Vec2::new(100.0, 100.0), 20.0);
    body.velocity = Vec2::new(100.0, -50.0);
    integrate(&mut body, 1000);
    assert_eq!(body.position, Vec2::new(200.0, 50.0));
    assert_eq!(body.velocity, Vec2::new(100.0, -50.0));
}

#[test]
fn integrate_bounces_off_right_edge() {
    let mut body = Body::at(Vec2::new(795.0, 300.0), 20.0);
    body.velocity = Vec2::new(100.0, 0.0);
    integrate(&mut body, 100);
    assert_eq!(body.velocity.x, -100.0);
}

#[test]
fn integrate_bounces_off_top_edge() {
    let mut body = Body::at(Vec2::new(300.0, 5.0), 20.0);
    body.velocity = Vec2::new(0.0, -100.0);
    integrate(&mut body, 100);
    assert_eq!(body.velocity.y, 100.0);
}

#[test]
fn body_outside_field_moving_inward_is_not_reflected() {
    let mut body = Body::at(Vec2::new(400.0, FIELD_HEIGHT + OFF_FIELD_MARGIN), 25.6);
    body.velocity = Vec2::new(0.0, -150.0);
    integrate(&mut body, 100);
    assert_eq!(body.velocity.y, -150.0);
    assert!((body.position.y - 685.0).abs() < 1e-3);
}

#[test]
fn ship_is_clamped_inside_field() {
    let mut ship = Ship::centered();
    ship.body.position = Vec2::new(10.0, 300.0);
    ship.body.velocity = Vec2::new(-500.0, 0.0);
    integrate_ship(&mut ship, 1000, 1.0);
    assert_eq!(ship.body.position.x, SHIP_SIZE / 2.0);

    ship.body.velocity = Vec2::new(0.0, 10_000.0);
    integrate_ship(&mut ship, 1000, 2.0);
    assert_eq!(ship.body.position.y, FIELD_HEIGHT - SHIP_SIZE);
}

#[test]
fn spin_wraps_at_360() {
    let mut o = Obstacle::new(Vec2::new(100.0, 100.0), 30.0, 200.0);
    o.spinning = true;
    advance(&mut o, 2000);
    assert!((o.angle - 40.0).abs() < 1e-3);
}

#[test]
fn stopped_obstacle_keeps_its_angle() {
    let mut o = Obstacle::new(Vec2::new(100.0, 100.0), 30.0, 200.0);
    o.spinning = true;
    advance(&mut o, 100);
    let angle = o.angle;
    stop_spinning(&mut o);
    advance(&mut o, 1000);
    assert_eq!(o.angle, angle);
    assert_eq!(o.angular_velocity, 0.0);
}
