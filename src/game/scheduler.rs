//! Logical-time scheduler
//!
//! Delayed work (hiding a revealed hand, outcome notices, the post-battle
//! reset) is queued against a logical clock instead of wall-clock timers.
//! The clock only moves when the owner calls [`Scheduler::advance`], which
//! keeps battles reproducible under a fixed seed.

use smallvec::SmallVec;
use std::fmt;
use std::time::Duration;

/// Something the presentation layer should announce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    BattleOutcome { victory: bool, message: String },
    AchievementUnlocked { id: &'static str, name: &'static str, description: &'static str },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::BattleOutcome { message, .. } => write!(f, "{message}"),
            Notification::AchievementUnlocked { name, description, .. } => {
                write!(f, "Achievement Unlocked: {name} - {description}")
            }
        }
    }
}

/// Deferred store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledEvent {
    HideEnemyHand,
    Notify(Notification),
    /// Return to the title screen if `battle_id` is still the current battle
    ResetToTitle { battle_id: u64 },
}

#[derive(Debug, Clone)]
struct Pending {
    due: Duration,
    seq: u64,
    event: ScheduledEvent,
}

/// Events fired by one `advance` call; usually zero to two
pub type Fired = SmallVec<[ScheduledEvent; 4]>;

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `event` to fire `delay` after the current time
    pub fn schedule(&mut self, delay: Duration, event: ScheduledEvent) {
        let due = self.now.saturating_add(delay);
        self.pending.push(Pending {
            due,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Move the clock forward and return every event now due
    ///
    /// Events come back in due-time order; events due at the same instant
    /// keep the order they were scheduled in.
    pub fn advance(&mut self, dt: Duration) -> Fired {
        self.now = self.now.saturating_add(dt);
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.event).collect()
    }

    /// Time until the next pending event, if any
    pub fn next_due_in(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending event matching `pred`
    pub fn cancel_where(&mut self, pred: impl Fn(&ScheduledEvent) -> bool) {
        self.pending.retain(|p| !pred(&p.event));
    }
}
