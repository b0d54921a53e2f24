use asteroid_dodger::modes::{GameMode, ShieldMilestone};
use asteroid_dodger::waves::*;

fn active(mode: GameMode) -> WaveScheduler {
    let mut s = WaveScheduler::new(&mode.config());
    s.activate();
    s
}

#[test]
fn idle_scheduler_keeps_no_time() {
    let mut s = WaveScheduler::new(&GameMode::Normal.config());
    assert_eq!(s.state(), SchedulerState::Idle);
    assert_eq!(s.update(60_000), ScheduleTick::default());
    assert_eq!(s.wave(), 1);
    assert_eq!(s.obstacle_elapsed_ms(), 0);
    assert_eq!(s.power_up_elapsed_ms(), 0);
}

#[test]
fn countdown_arms_at_period_and_ticks_the_same_frame() {
    let mut s = active(GameMode::Hard);
    s.update(6999);
    assert_eq!(s.countdown_ms(), None);
    s.update(1);
    assert_eq!(s.countdown_ms(), Some(2999));
    assert_eq!(s.countdown_seconds(), Some(3));
}

#[test]
fn countdown_seconds_round_up() {
    let mut s = active(GameMode::Hard);
    for _ in 0..7 {
        s.update(1000);
    }
    assert_eq!(s.countdown_ms(), Some(2000));
    assert_eq!(s.countdown_seconds(), Some(2));
    s.update(500);
    assert_eq!(s.countdown_seconds(), Some(2));
}

#[test]
fn wave_fires_when_countdown_runs_out() {
    let mut s = active(GameMode::Dodger);
    let mut fired = Vec::new();
    for _ in 0..10 {
        if let Some(w) = s.update(1000).wave {
            fired.push(w);
        }
    }
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].wave, 2);
    assert_eq!(s.wave(), 2);
    assert_eq!(s.countdown_ms(), None);
}

#[test]
fn single_long_frame_fires_one_wave() {
    let mut s = active(GameMode::Hard);
    let tick = s.update(10_000);
    assert_eq!(tick.wave.map(|w| w.wave), Some(2));
    assert_eq!(s.obstacle_elapsed_ms(), 0);
    assert_eq!(s.countdown_ms(), None);
}

#[test]
fn power_up_drop_follows_mode_period() {
    let mut s = active(GameMode::Normal);
    assert!(!s.update(14_999).power_up_drop);
    assert!(s.update(1).power_up_drop);
    assert_eq!(s.power_up_elapsed_ms(), 0);

    let mut secret = active(GameMode::Secret);
    assert!(secret.update(8000).power_up_drop);
}

#[test]
fn normal_shield_bonus_on_even_waves_from_four() {
    let mut s = active(GameMode::Normal);
    let bonuses: Vec<(u32, bool)> = (0..6)
        .filter_map(|_| s.update(10_000).wave)
        .map(|w| (w.wave, w.shield_bonus))
        .collect();
    assert_eq!(
        bonuses,
        vec![(2, false), (3, false), (4, true), (5, false), (6, true), (7, false)]
    );
}

#[test]
fn milestone_table() {
    let normal = GameMode::Normal.config().shield_milestone;
    let hard = GameMode::Hard.config().shield_milestone;
    for wave in 1..=20 {
        assert_eq!(normal.is_reached(wave), wave >= 4 && wave % 2 == 0, "normal wave {wave}");
        assert_eq!(hard.is_reached(wave), wave % 5 == 0, "hard wave {wave}");
    }
    assert_eq!(GameMode::Secret.config().shield_milestone, hard);
    assert_eq!(GameMode::Dodger.config().shield_milestone, hard);
}

#[test]
fn zero_interval_milestone_does_not_panic() {
    let m = ShieldMilestone {
        threshold: 3,
        interval: 0,
    };
    assert!(m.is_reached(3));
    assert!(m.is_reached(4));
    assert!(!m.is_reached(2));
}
