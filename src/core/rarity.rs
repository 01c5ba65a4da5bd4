//! Rarity tiers
//!
//! A rarity controls two things at once: how often a character is drawn
//! (selection weight) and how much incoming damage it shrugs off (defense).
//! Rarer tiers are drawn less often and defend better.

use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Divine,
}

impl Rarity {
    /// All tiers, from most to least common
    pub const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
        Rarity::Divine,
    ];

    /// Selection weight used by the weighted selector (~0.1% Divine)
    pub const fn weight(self) -> u32 {
        match self {
            Rarity::Common => 1000,
            Rarity::Uncommon => 500,
            Rarity::Rare => 250,
            Rarity::Epic => 100,
            Rarity::Legendary => 50,
            Rarity::Mythic => 10,
            Rarity::Divine => 1,
        }
    }

    /// Flat damage reduction granted to a combatant of this rarity
    pub const fn defense(self) -> i32 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 5,
            Rarity::Mythic => 7,
            Rarity::Divine => 10,
        }
    }

    /// Position in the tier list (Common = 0)
    pub const fn tier(self) -> u32 {
        self as u32
    }

    /// Legendary, Mythic and Divine
    pub fn is_legendary_or_higher(self) -> bool {
        self >= Rarity::Legendary
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Divine => "Divine",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DuelError::InvalidArgument(format!("unknown rarity '{s}'")))
    }
}

/// Defense lookup by rarity name; unknown names defend with 0
pub fn rarity_defense(name: &str) -> i32 {
    name.parse::<Rarity>().map(Rarity::defense).unwrap_or(0)
}
