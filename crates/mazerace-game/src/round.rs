//! Round lifecycle and finish ranking.

use std::fmt;
use std::time::Instant;

/// The phase of the current round.
///
/// ```text
/// Active ──(every registered player finished)──→ Over
///   ↑                                              │
///   └──────────────────(reset)─────────────────────┘
/// ```
///
/// `Over` is sticky: players leaving or joining afterwards does not bring
/// the round back to `Active`. Only a reset does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Active,
    Over,
}

impl RoundPhase {
    pub fn is_over(&self) -> bool {
        matches!(self, Self::Over)
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Over => write!(f, "Over"),
        }
    }
}

/// Rank and time handed to a player on the finish edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishRecord {
    pub rank: u32,
    pub secs: u64,
}

/// Round-wide bookkeeping shared by all players.
#[derive(Debug, Clone)]
pub struct RoundState {
    phase: RoundPhase,
    /// Last rank handed out; 0 when nobody has finished.
    finish_counter: u32,
    started_at: Instant,
    /// 1 for the first round, +1 per reset.
    number: u64,
}

impl RoundState {
    pub fn new(now: Instant) -> Self {
        Self {
            phase: RoundPhase::Active,
            finish_counter: 0,
            started_at: now,
            number: 1,
        }
    }

    /// Hands out the next rank and the elapsed whole seconds since the
    /// round started. Ranks are 1, 2, 3, ... in call order.
    pub fn record_finish(&mut self, now: Instant) -> FinishRecord {
        self.finish_counter += 1;
        FinishRecord {
            rank: self.finish_counter,
            secs: now.saturating_duration_since(self.started_at).as_secs(),
        }
    }

    /// Moves `Active → Over`. Returns `true` only on the transition itself.
    pub fn conclude(&mut self) -> bool {
        if self.phase.is_over() {
            return false;
        }
        self.phase = RoundPhase::Over;
        true
    }

    /// Starts the next round: phase back to `Active`, counter zeroed,
    /// clock restarted.
    pub fn restart(&mut self, now: Instant) {
        self.phase = RoundPhase::Active;
        self.finish_counter = 0;
        self.started_at = now;
        self.number += 1;
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn finish_counter(&self) -> u32 {
        self.finish_counter
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}
