//! Game modes and engine configuration

use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Rule variant for a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Baseline rules
    #[default]
    Standard,
    /// Smaller hand, played cards hit twice as hard
    Blitz,
    /// Smaller hand, played cards lose 30% power (minimum 1)
    Tactical,
    /// Endless gauntlet with escalating opponents and bosses
    #[serde(alias = "rounds")]
    Survival,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Standard,
        GameMode::Blitz,
        GameMode::Tactical,
        GameMode::Survival,
    ];

    /// Number of cards each side holds
    pub fn hand_size(self) -> usize {
        match self {
            GameMode::Standard => 4,
            GameMode::Blitz | GameMode::Tactical => 3,
            GameMode::Survival => 5,
        }
    }

    /// Power a played card contributes under this mode
    pub fn adjust_power(self, power: i32) -> i32 {
        match self {
            GameMode::Blitz => power.saturating_mul(2),
            GameMode::Tactical => (power.saturating_mul(7) / 10).max(1),
            GameMode::Standard | GameMode::Survival => power,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Standard => "standard",
            GameMode::Blitz => "blitz",
            GameMode::Tactical => "tactical",
            GameMode::Survival => "survival",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameMode::Standard => "Standard Battle",
            GameMode::Blitz => "Blitz Mode",
            GameMode::Tactical => "Tactical Mode",
            GameMode::Survival => "Survival Mode",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(GameMode::Standard),
            "blitz" => Ok(GameMode::Blitz),
            "tactical" => Ok(GameMode::Tactical),
            "survival" | "rounds" => Ok(GameMode::Survival),
            _ => Err(DuelError::InvalidArgument(format!(
                "unknown game mode '{s}' (expected: standard, blitz, tactical, survival)"
            ))),
        }
    }
}

/// Engine configuration
///
/// Durations are in milliseconds of logical time (see [`crate::game::Scheduler`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,

    /// Cards generated for each combatant's deck
    pub deck_size: usize,

    /// Seed for deterministic play; `None` seeds from OS entropy
    pub seed: Option<u64>,

    /// How long a revealed enemy hand stays visible
    pub reveal_duration_ms: u64,

    /// Delay between a battle ending and the return to the title screen
    pub terminal_reset_delay_ms: u64,

    /// Delay before an achievement notification is delivered
    pub achievement_notice_delay_ms: u64,

    /// Survival: rounds between escalation steps
    pub survival_escalation_interval: u32,

    /// Survival: every n-th encounter is a boss
    pub survival_boss_interval: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::Standard,
            deck_size: 100,
            seed: None,
            reveal_duration_ms: 5_000,
            terminal_reset_delay_ms: 500,
            achievement_notice_delay_ms: 1_000,
            survival_escalation_interval: 3,
            survival_boss_interval: 3,
        }
    }
}

impl GameConfig {
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DuelError::ResourceMissing(format!(
                "config file {} not found",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deck_size == 0 {
            return Err(DuelError::InvalidArgument("deck_size must be positive".to_string()));
        }
        if self.survival_escalation_interval == 0 || self.survival_boss_interval == 0 {
            return Err(DuelError::InvalidArgument(
                "survival intervals must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    pub fn terminal_reset_delay(&self) -> Duration {
        Duration::from_millis(self.terminal_reset_delay_ms)
    }

    pub fn achievement_notice_delay(&self) -> Duration {
        Duration::from_millis(self.achievement_notice_delay_ms)
    }
}
