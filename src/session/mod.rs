/// Session controller: lifecycle, input routing and the two periodic drivers.
///
/// ```text
/// Idle ──start──▶ Running ──terminate──▶ Terminated ──reset──▶ Idle
///                   ▲                        │
///                   └─────────start──────────┘
/// ```
///
/// The host owns the clock.  It forwards input with `handle_input` and calls
/// `pump` with the current timestamp; `pump` runs whatever driver firings
/// are due.  Nothing mutates the game once the session leaves `Running`.

pub mod driver;

use rand::Rng;

use crate::compute::{self, TickReport};
use crate::config::{Difficulty, Settings};
use crate::entities::{Frame, GameState, SessionPhase};
use crate::error::SessionError;
use crate::events::{EventSink, GameEvent};

pub use driver::{DriverKind, PeriodicDriver, MAX_CATCH_UP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Discrete input signals.  Press/release carry hold state only; there is
/// no key-repeat semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Press(Direction),
    Release(Direction),
    Fire,
}

/// What one `pump` actually did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Ticks run while the session was active.
    pub ticks: u32,
    /// Enemy shots spawned.  A fire firing with no enemies left is not counted.
    pub enemy_fires: u32,
}

pub struct Session {
    settings: Settings,
    phase: SessionPhase,
    state: GameState,
    tick_driver: PeriodicDriver,
    fire_driver: PeriodicDriver,
    events: Vec<GameEvent>,
    final_score: Option<u32>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            tick_driver: PeriodicDriver::new(DriverKind::Tick, settings.tick_ms),
            fire_driver: PeriodicDriver::new(DriverKind::EnemyFire, settings.enemy_fire_ms),
            state: GameState::new(settings.clone(), Difficulty::default()),
            settings,
            phase: SessionPhase::Idle,
            events: Vec::new(),
            final_score: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for staging a scenario.  `None` once the session is
    /// terminated, since the final state is frozen until `reset`.
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        match self.phase {
            SessionPhase::Terminated => None,
            SessionPhase::Idle | SessionPhase::Running => Some(&mut self.state),
        }
    }

    pub fn drivers(&self) -> (&PeriodicDriver, &PeriodicDriver) {
        (&self.tick_driver, &self.fire_driver)
    }

    /// Final score of the last terminated session, until `reset` or the
    /// next `start`.
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn frame(&self) -> Frame {
        Frame::from_state(&self.state, self.phase)
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Begin a session at `difficulty`.  Valid from `Idle` or `Terminated`.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        now_ms: u64,
        rng: &mut impl Rng,
    ) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Running {
            return Err(SessionError::AlreadyRunning);
        }

        self.state = GameState::new(self.settings.clone(), difficulty);
        compute::spawn_wave(&mut self.state, rng);

        self.tick_driver.stop();
        self.fire_driver.stop();
        self.tick_driver.start(now_ms);
        self.fire_driver.start(now_ms);

        self.final_score = None;
        self.phase = SessionPhase::Running;
        self.events.emit(GameEvent::SessionStart);
        log::info!(
            "session started: difficulty={} enemy_speed={} bullet_speed={} wave={}",
            difficulty,
            self.state.params.enemy_speed,
            self.state.params.bullet_speed,
            self.state.enemies.len()
        );
        Ok(())
    }

    /// Stop both drivers and report the final score.  Valid only while
    /// `Running`.
    pub fn terminate(&mut self) -> Result<u32, SessionError> {
        if self.phase != SessionPhase::Running {
            return Err(SessionError::NotRunning(self.phase));
        }
        Ok(self.finish())
    }

    fn finish(&mut self) -> u32 {
        self.tick_driver.stop();
        self.fire_driver.stop();
        self.state.hold = Default::default();

        let score = self.state.score;
        self.final_score = Some(score);
        self.phase = SessionPhase::Terminated;
        self.events.emit(GameEvent::SessionEnd { final_score: score });
        log::info!("session over: score={} level={}", score, self.state.level);
        score
    }

    /// Return to `Idle` with fresh state, ready for the next difficulty
    /// choice.  Whether the host reloads anything is up to the host.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Terminated {
            return Err(SessionError::NotTerminated(self.phase));
        }
        self.state = GameState::new(self.settings.clone(), self.state.difficulty);
        self.final_score = None;
        self.events.clear();
        self.phase = SessionPhase::Idle;
        log::info!("session reset to idle");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Route one input signal.  Returns `true` if it changed the game.
    /// Input outside `Running` is ignored.
    pub fn handle_input(&mut self, input: Input, now_ms: u64) -> bool {
        if !self.is_running() {
            log::trace!("ignoring {:?} while {:?}", input, self.phase);
            return false;
        }
        match input {
            Input::Press(direction) => self.set_held(direction, true),
            Input::Release(direction) => self.set_held(direction, false),
            Input::Fire => compute::fire_from_player(&mut self.state, now_ms, &mut self.events),
        }
    }

    fn set_held(&mut self, direction: Direction, held: bool) -> bool {
        let slot = match direction {
            Direction::Left => &mut self.state.hold.left,
            Direction::Right => &mut self.state.hold.right,
        };
        let changed = *slot != held;
        *slot = held;
        changed
    }

    // ── Drivers ──────────────────────────────────────────────────────────────

    /// Fast-tick handler.  `None` when the session is not running.
    pub fn on_tick(&mut self, rng: &mut impl Rng) -> Option<TickReport> {
        if !self.is_running() {
            log::trace!("tick after stop ignored");
            return None;
        }
        let report = compute::tick(&mut self.state, rng, &mut self.events);
        if report.combat.out_of_lives {
            self.finish();
        }
        Some(report)
    }

    /// Slow-tick handler: one enemy shot, if any enemy is left.
    pub fn on_enemy_fire(&mut self, rng: &mut impl Rng) -> bool {
        if !self.is_running() {
            log::trace!("enemy fire after stop ignored");
            return false;
        }
        compute::fire_from_enemy(&mut self.state, rng, &mut self.events)
    }

    /// Run every driver firing due at or before `now_ms`, earliest first.
    /// Simultaneous firings are ordered by `rng`, so either driver may go
    /// first.  Stops as soon as the session leaves `Running`.
    pub fn pump(&mut self, now_ms: u64, rng: &mut impl Rng) -> PumpReport {
        let mut report = PumpReport::default();
        self.tick_driver.begin_pump();
        self.fire_driver.begin_pump();

        while self.is_running() {
            let next = match (self.tick_driver.due_at(now_ms), self.fire_driver.due_at(now_ms)) {
                (None, None) => break,
                (Some(_), None) => DriverKind::Tick,
                (None, Some(_)) => DriverKind::EnemyFire,
                (Some(t), Some(f)) if t < f => DriverKind::Tick,
                (Some(t), Some(f)) if f < t => DriverKind::EnemyFire,
                (Some(_), Some(_)) => {
                    if rng.gen_bool(0.5) {
                        DriverKind::Tick
                    } else {
                        DriverKind::EnemyFire
                    }
                }
            };

            match next {
                DriverKind::Tick => {
                    self.tick_driver.consume(now_ms);
                    if self.on_tick(rng).is_some() {
                        report.ticks += 1;
                    }
                }
                DriverKind::EnemyFire => {
                    self.fire_driver.consume(now_ms);
                    if self.on_enemy_fire(rng) {
                        report.enemy_fires += 1;
                    }
                }
            }
        }
        report
    }
}
