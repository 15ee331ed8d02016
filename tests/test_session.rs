use wave_shooter::compute::geometry::Rect;
use wave_shooter::entities::*;
use wave_shooter::session::{PumpReport, MAX_CATCH_UP};
use wave_shooter::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn running(difficulty: Difficulty) -> (Session, StdRng) {
    let mut rng = seeded_rng();
    let mut session = Session::new(Settings::default());
    session.start(difficulty, 0, &mut rng).unwrap();
    session.drain_events();
    (session, rng)
}

/// An enemy shot sitting on the player; still overlapping after one tick.
fn stage_hit(session: &mut Session) {
    let state = session.state_mut().unwrap();
    let id = state.alloc_id();
    let player = state.player.rect;
    state.enemy_shots.push(Projectile {
        id,
        owner: Owner::Enemy,
        rect: Rect::new(player.center_x() - 2.0, player.top(), SHOT_WIDTH, SHOT_HEIGHT),
    });
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_session_is_idle() {
    let session = Session::new(Settings::default());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.final_score(), None);
    let (tick, fire) = session.drivers();
    assert!(!tick.is_active());
    assert!(!fire.is_active());
}

#[test]
fn start_easy_sets_initial_state() {
    let mut rng = seeded_rng();
    let mut session = Session::new(Settings::default());
    session.start(Difficulty::Easy, 0, &mut rng).unwrap();

    assert_eq!(session.phase(), SessionPhase::Running);
    let s = session.state();
    assert_eq!(s.params.enemy_speed, 1.5);
    assert_eq!(s.params.bullet_speed, 12.0);
    assert_eq!(s.formation.speed, 1.5);
    assert_eq!(s.score, 0);
    assert_eq!(s.level, 1);
    assert_eq!(s.lives, 3);
    assert_eq!(s.enemies.len(), 4 * 9);
    assert_eq!(session.drain_events(), vec![GameEvent::SessionStart]);

    let (tick, fire) = session.drivers();
    assert!(tick.is_active());
    assert!(fire.is_active());
    assert_eq!(tick.period_ms(), 100);
    assert_eq!(fire.period_ms(), 2000);
}

#[test]
fn start_hard_uses_hard_table() {
    let (session, _) = running(Difficulty::Hard);
    assert_eq!(session.state().params.enemy_speed, 3.5);
    assert_eq!(session.state().params.bullet_speed, 16.0);
}

#[test]
fn start_while_running_is_rejected() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().score = 700;
    let err = session.start(Difficulty::Hard, 50, &mut rng).unwrap_err();
    assert_eq!(err, SessionError::AlreadyRunning);
    assert_eq!(session.state().score, 700);
    assert_eq!(session.state().difficulty, Difficulty::Easy);
}

#[test]
fn terminate_requires_running() {
    let mut session = Session::new(Settings::default());
    assert_eq!(
        session.terminate().unwrap_err(),
        SessionError::NotRunning(SessionPhase::Idle)
    );
}

#[test]
fn reset_requires_terminated() {
    let (mut session, _) = running(Difficulty::Easy);
    assert_eq!(
        session.reset().unwrap_err(),
        SessionError::NotTerminated(SessionPhase::Running)
    );
}

#[test]
fn terminate_reports_score_and_stops_drivers() {
    let (mut session, _) = running(Difficulty::Medium);
    session.state_mut().unwrap().score = 1200;
    assert_eq!(session.terminate().unwrap(), 1200);
    assert_eq!(session.phase(), SessionPhase::Terminated);
    assert_eq!(session.final_score(), Some(1200));
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::SessionEnd { final_score: 1200 }]
    );
    let (tick, fire) = session.drivers();
    assert!(!tick.is_active());
    assert!(!fire.is_active());
    assert_eq!(
        session.terminate().unwrap_err(),
        SessionError::NotRunning(SessionPhase::Terminated)
    );
}

#[test]
fn reset_returns_to_idle_with_fresh_state() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().score = 300;
    session.state_mut().unwrap().level = 4;
    session.terminate().unwrap();
    session.reset().unwrap();

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.final_score(), None);
    assert_eq!(session.state().score, 0);
    assert_eq!(session.state().level, 1);
    assert!(session.state().enemies.is_empty());
    assert!(session.drain_events().is_empty());

    session.start(Difficulty::Hard, 10_000, &mut rng).unwrap();
    assert!(session.is_running());
}

#[test]
fn restart_straight_from_terminated() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().score = 500;
    session.terminate().unwrap();
    session.start(Difficulty::Medium, 5_000, &mut rng).unwrap();
    assert!(session.is_running());
    assert_eq!(session.state().score, 0);
    assert_eq!(session.final_score(), None);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn hold_state_follows_press_and_release() {
    let (mut session, _) = running(Difficulty::Easy);
    assert!(session.handle_input(Input::Press(Direction::Left), 0));
    assert!(session.state().hold.left);
    assert!(!session.handle_input(Input::Press(Direction::Left), 10));
    assert!(session.handle_input(Input::Release(Direction::Left), 20));
    assert!(!session.state().hold.left);
}

#[test]
fn held_key_moves_player_on_tick() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    let start_x = session.state().player.rect.left();
    session.handle_input(Input::Press(Direction::Right), 0);
    session.on_tick(&mut rng);
    assert_eq!(session.state().player.rect.left(), start_x + 10.0);
}

#[test]
fn fire_twice_within_cooldown_spawns_once() {
    let (mut session, _) = running(Difficulty::Easy);
    assert!(session.handle_input(Input::Fire, 1_000));
    assert!(!session.handle_input(Input::Fire, 1_200));
    assert_eq!(session.state().player_shots.len(), 1);
    assert!(session.handle_input(Input::Fire, 1_301));
    assert_eq!(session.state().player_shots.len(), 2);
    assert_eq!(session.drain_events(), vec![GameEvent::Fire, GameEvent::Fire]);
}

#[test]
fn input_while_idle_is_ignored() {
    let mut session = Session::new(Settings::default());
    assert!(!session.handle_input(Input::Fire, 0));
    assert!(!session.handle_input(Input::Press(Direction::Left), 0));
    assert!(session.state().player_shots.is_empty());
    assert!(!session.state().hold.left);
}

// ── Drivers ───────────────────────────────────────────────────────────────────

#[test]
fn pump_runs_fast_and_slow_drivers() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    let mut ticks = 0;
    let mut fires = 0;
    for t in (50..=2_000).step_by(50) {
        let report = session.pump(t, &mut rng);
        ticks += report.ticks;
        fires += report.enemy_fires;
    }
    assert_eq!(ticks, 20);
    assert_eq!(fires, 1);
    assert_eq!(session.state().enemy_shots.len(), 1);

    // Tick and enemy fire are both due at 2000ms; either may run first, so
    // the fresh shot has moved zero or one step.
    let shot = &session.state().enemy_shots[0];
    let shooter_bottoms: Vec<f32> = session.state().enemies.iter().map(|e| e.rect.bottom()).collect();
    assert!(shooter_bottoms
        .iter()
        .any(|&b| shot.rect.top() == b || shot.rect.top() == b + 10.0));
}

#[test]
fn pump_before_first_period_does_nothing() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    let before = session.state().enemies[0].rect;
    let report = session.pump(99, &mut rng);
    assert_eq!(report.ticks, 0);
    assert_eq!(session.state().enemies[0].rect, before);
}

#[test]
fn pump_bounds_catch_up() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    let report = session.pump(10_000, &mut rng);
    assert_eq!(report.ticks, MAX_CATCH_UP);
    assert_eq!(report.enemy_fires, 5);
    let after = session.pump(10_050, &mut rng);
    assert_eq!(after.ticks, 0);
    assert_eq!(session.pump(10_100, &mut rng).ticks, 1);
}

#[test]
fn enemy_fire_with_no_enemies_left_is_not_counted() {
    let settings = Settings {
        tick_ms: 5_000,
        enemy_fire_ms: 1_000,
        ..Settings::default()
    };
    let mut rng = seeded_rng();
    let mut session = Session::new(settings);
    session.start(Difficulty::Easy, 0, &mut rng).unwrap();
    session.state_mut().unwrap().enemies.clear();

    let report = session.pump(1_000, &mut rng);
    assert_eq!(report, PumpReport { ticks: 0, enemy_fires: 0 });
    assert!(session.state().enemy_shots.is_empty());
    assert!(session.drivers().1.is_active());
}

#[test]
fn tick_runs_movement_then_combat() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    let first = session.state().enemies[0].rect;
    session.on_tick(&mut rng).unwrap();
    assert_eq!(session.state().enemies[0].rect.left(), first.left() + 1.5);
}

// ── Progression through the session ──────────────────────────────────────────

#[test]
fn last_enemy_destroyed_starts_level_two() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    {
        let state = session.state_mut().unwrap();
        state.enemies.truncate(1);
        let id = state.alloc_id();
        // After one tick the enemy is at x 11.5 and the shot at y 8.
        state.player_shots.push(Projectile {
            id,
            owner: Owner::Player,
            rect: Rect::new(20.0, 20.0, SHOT_WIDTH, SHOT_HEIGHT),
        });
    }
    let report = session.on_tick(&mut rng).unwrap();
    assert!(report.wave_cleared);
    let s = session.state();
    assert_eq!(s.score, 100);
    assert_eq!(s.level, 2);
    assert_eq!(s.enemies.len(), 4 * 10);
    assert!(s.player_shots.is_empty());
    assert_eq!(
        session.drain_events(),
        vec![GameEvent::EnemyDestroyed, GameEvent::WaveCleared { new_level: 2 }]
    );
}

// ── Termination ───────────────────────────────────────────────────────────────

#[test]
fn losing_last_life_terminates_once() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().lives = 1;
    session.state_mut().unwrap().score = 400;
    stage_hit(&mut session);
    stage_hit(&mut session);

    session.on_tick(&mut rng).unwrap();

    assert_eq!(session.phase(), SessionPhase::Terminated);
    assert_eq!(session.state().lives, 0);
    assert_eq!(session.final_score(), Some(400));
    let (tick, fire) = session.drivers();
    assert!(!tick.is_active());
    assert!(!fire.is_active());
    let events = session.drain_events();
    let ends = events
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionEnd { .. }))
        .count();
    assert_eq!(ends, 1);
    assert_eq!(events.last(), Some(&GameEvent::SessionEnd { final_score: 400 }));
}

#[test]
fn hit_with_lives_left_keeps_running() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    stage_hit(&mut session);
    session.on_tick(&mut rng).unwrap();
    assert!(session.is_running());
    assert_eq!(session.state().lives, 2);
}

#[test]
fn no_mutation_after_termination() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().lives = 1;
    stage_hit(&mut session);
    session.on_tick(&mut rng).unwrap();
    assert_eq!(session.phase(), SessionPhase::Terminated);
    session.drain_events();

    let frozen = session.frame();
    assert!(session.on_tick(&mut rng).is_none());
    assert!(!session.on_enemy_fire(&mut rng));
    assert!(!session.handle_input(Input::Fire, 60_000));
    assert!(!session.handle_input(Input::Press(Direction::Left), 60_000));
    let report = session.pump(60_000, &mut rng);
    assert_eq!(report.ticks, 0);
    assert_eq!(report.enemy_fires, 0);
    assert_eq!(session.frame(), frozen);
    assert!(session.drain_events().is_empty());
}

#[test]
fn state_is_locked_while_terminated() {
    let (mut session, _) = running(Difficulty::Easy);
    assert!(session.state_mut().is_some());
    session.terminate().unwrap();
    assert!(session.state_mut().is_none());
    session.reset().unwrap();
    assert!(session.state_mut().is_some());
}

#[test]
fn pump_stops_at_termination() {
    let (mut session, mut rng) = running(Difficulty::Easy);
    session.state_mut().unwrap().lives = 1;
    stage_hit(&mut session);
    let report = session.pump(800, &mut rng);
    assert_eq!(report.ticks, 1);
    assert_eq!(session.phase(), SessionPhase::Terminated);
}

// ── Visual surface ────────────────────────────────────────────────────────────

#[test]
fn frame_mirrors_state() {
    let (mut session, _) = running(Difficulty::Medium);
    session.handle_input(Input::Fire, 0);
    let frame = session.frame();
    let s = session.state();
    assert_eq!(frame.phase, SessionPhase::Running);
    assert_eq!(frame.field, glam::Vec2::new(800.0, 600.0));
    assert_eq!(frame.player, s.player.rect);
    assert_eq!(frame.enemies.len(), s.enemies.len());
    assert_eq!(frame.player_shots.len(), 1);
    assert!(frame.enemy_shots.is_empty());
    assert_eq!(
        frame.hud,
        Hud {
            score: 0,
            level: 1,
            lives: 3
        }
    );
    assert_eq!(frame.difficulty, Difficulty::Medium);
}
