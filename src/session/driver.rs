//! Periodic triggers measured against a host-supplied millisecond clock.

/// Upper bound on catch-up firings per driver in a single pump.  Backlog
/// beyond this is dropped and the driver restarts from `now`.
pub const MAX_CATCH_UP: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverKind {
    /// Movement → combat → progression.
    Tick,
    /// Enemy fire only.
    EnemyFire,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicDriver {
    pub kind: DriverKind,
    period_ms: u64,
    next_due_ms: Option<u64>,
    fired_this_pump: u32,
}

impl PeriodicDriver {
    pub fn new(kind: DriverKind, period_ms: u64) -> Self {
        Self {
            kind,
            period_ms: period_ms.max(1),
            next_due_ms: None,
            fired_this_pump: 0,
        }
    }

    /// Arm the driver; the first firing is one period after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
        self.fired_this_pump = 0;
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Due timestamp, if the driver is armed and has a firing pending at
    /// or before `now_ms`.
    pub fn due_at(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms.filter(|&due| due <= now_ms)
    }

    pub(crate) fn begin_pump(&mut self) {
        self.fired_this_pump = 0;
    }

    /// Record a firing and schedule the next one.  Once the catch-up budget
    /// is spent the remaining backlog is skipped.
    pub(crate) fn consume(&mut self, now_ms: u64) {
        let Some(due) = self.next_due_ms else {
            return;
        };
        self.fired_this_pump += 1;
        let next = due + self.period_ms;
        if self.fired_this_pump >= MAX_CATCH_UP && next <= now_ms {
            log::warn!(
                "{:?} driver fell behind by {}ms, skipping backlog",
                self.kind,
                now_ms - due
            );
            self.next_due_ms = Some(now_ms + self.period_ms);
        } else {
            self.next_due_ms = Some(next);
        }
    }
}
