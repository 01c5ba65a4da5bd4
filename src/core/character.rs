//! Character templates and in-battle combatants

use crate::core::{EffectKind, Rarity};
use crate::zones::{CardZone, Zone};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};

/// Immutable catalog entry for a character archetype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub name: String,
    #[serde(rename = "baseHP", alias = "base_hp")]
    pub base_hp: i32,
    pub rarity: Rarity,
    /// Effect this archetype favours when its deck is built
    #[serde(default)]
    pub signature: Option<EffectKind>,
}

impl CharacterTemplate {
    pub fn new(name: &str, base_hp: i32, rarity: Rarity) -> Self {
        CharacterTemplate {
            name: name.to_string(),
            base_hp,
            rarity,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: EffectKind) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Check that the entry can be turned into a combatant
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DuelError::InvalidCharacter("character has no name".to_string()));
        }
        if self.base_hp <= 0 {
            return Err(DuelError::InvalidCharacter(format!(
                "{} has non-positive base HP {}",
                self.name, self.base_hp
            )));
        }
        Ok(())
    }
}

/// The fields an ability effect may touch on a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    pub hp: i32,
    pub shield: bool,
}

/// A character taking part in a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,

    /// Current health; zero or below means defeat
    pub hp: i32,

    /// Fixed at creation from rarity
    pub defense: i32,

    pub rarity: Rarity,

    pub hand: CardZone,

    /// Draw pile
    pub deck: CardZone,

    pub discard_pile: CardZone,

    /// Nullifies damage for the current round only
    pub shield: bool,
}

impl Combatant {
    pub fn new(name: impl Into<String>, hp: i32, defense: i32, rarity: Rarity) -> Self {
        Combatant {
            name: name.into(),
            hp,
            defense,
            rarity,
            hand: CardZone::new(Zone::Hand),
            deck: CardZone::new(Zone::Deck),
            discard_pile: CardZone::new(Zone::Discard),
            shield: false,
        }
    }

    pub fn vitals(&self) -> Vitals {
        Vitals {
            hp: self.hp,
            shield: self.shield,
        }
    }

    pub fn set_vitals(&mut self, vitals: Vitals) {
        self.hp = vitals.hp;
        self.shield = vitals.shield;
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Total cards owned across all piles
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.deck.len() + self.discard_pile.len()
    }
}
