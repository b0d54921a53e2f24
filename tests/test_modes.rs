use asteroid_dodger::modes::*;

#[test]
fn parse_mode_names() {
    assert_eq!("normal".parse::<GameMode>(), Ok(GameMode::Normal));
    assert_eq!("HARD".parse::<GameMode>(), Ok(GameMode::Hard));
    assert_eq!("Secret".parse::<GameMode>(), Ok(GameMode::Secret));
    assert_eq!("dodger".parse::<GameMode>(), Ok(GameMode::Dodger));
    assert!("easy".parse::<GameMode>().is_err());
}

#[test]
fn display_round_trips_through_parse() {
    for mode in GameMode::ALL {
        assert_eq!(mode.to_string().parse::<GameMode>(), Ok(mode));
        assert_eq!(mode.config().mode, mode);
    }
}

#[test]
fn normal_is_gentler_than_hard() {
    let normal = GameMode::Normal.config();
    let hard = GameMode::Hard.config();
    assert_eq!(normal.wave_obstacle_count, 2);
    assert_eq!(hard.wave_obstacle_count, 3);
    assert!(normal.obstacle_velocity.y_max < hard.obstacle_velocity.y_min);
    assert!(normal.ship_base_speed < hard.ship_base_speed);
    assert!(normal.min_spawn_distance < hard.min_spawn_distance);
}

#[test]
fn dodger_pairs_hard_waves_with_normal_ship() {
    let dodger = GameMode::Dodger.config();
    assert_eq!(dodger.obstacle_velocity, OBSTACLE_VELOCITY_BASE);
    assert_eq!(dodger.ship_base_speed, 210.0);
    assert_eq!(dodger.wave_obstacle_count, 3);
    assert_eq!(dodger.initial_obstacles, 6);
}

#[test]
fn secret_drops_power_ups_often() {
    let secret = GameMode::Secret.config();
    assert_eq!(secret.power_up_period_ms, 8000);
    assert_eq!(secret.obstacle_velocity, OBSTACLE_VELOCITY_BOOSTED);
}

#[test]
fn shared_effect_numbers() {
    for mode in GameMode::ALL {
        let c = mode.config();
        assert_eq!(c.effect_duration_ms, 5000);
        assert_eq!(c.obstacle_wave_period_ms, 7000);
        assert_eq!(c.wave_warning_ms, 3000);
        assert_eq!(c.power_up_velocity, POWER_UP_VELOCITY);
        assert!(!c.label.is_empty());
    }
}
