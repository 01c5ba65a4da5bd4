//! Per-battle counters and per-session progress

use rustc_hash::FxHashSet;

/// Counters for the current battle; cleared on return to the title screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleCounters {
    /// Rounds the player's shield absorbed a hit
    pub shield_blocks: u32,
    /// Successful Burn effects by the player
    pub burn_uses: u32,
    /// Successful Freeze effects by the player
    pub freeze_uses: u32,
    /// Total damage the player took from card power
    pub damage_taken: i32,
    pub rounds_played: u32,
}

impl BattleCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Progress that spans battles within one session
#[derive(Debug, Clone, Default)]
pub struct SessionProgress {
    pub consecutive_wins: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    /// Names of every card the player has played this session
    pub distinct_cards_played: FxHashSet<String>,
}

impl SessionProgress {
    /// Record a played card; returns true the first time a name is seen
    pub fn record_card_played(&mut self, name: &str) -> bool {
        if self.distinct_cards_played.contains(name) {
            false
        } else {
            self.distinct_cards_played.insert(name.to_string())
        }
    }

    pub fn distinct_card_count(&self) -> usize {
        self.distinct_cards_played.len()
    }

    pub fn record_victory(&mut self) {
        self.consecutive_wins += 1;
        self.battles_won += 1;
    }

    pub fn record_defeat(&mut self) {
        self.consecutive_wins = 0;
        self.battles_lost += 1;
    }
}
