//! Card ability kinds
//!
//! The set of abilities is closed: every effect a card can carry is one of
//! these variants, and the registry in [`crate::game::effects`] dispatches on
//! them exhaustively. Catalog files refer to effects by identifier string,
//! which is resolved through [`EffectKind::from_id`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Deal 2 damage to the opponent
    Burn,
    /// Opposing card loses 2 power (floor 0)
    Freeze,
    /// Acting card copies the opposing card's power
    Steal,
    /// Actor is shielded this round
    Shield,
    /// Disclose the opponent's hand
    RevealHand,
    /// Roll a d6: 1-2 deals 3, 3-4 deals 1, 5-6 deals 5
    DiceRoll,
    /// Opposing card's power becomes 0
    Shock,
    /// Opposing card loses 2 power (floor 0)
    Sturdy,
    /// Opposing card loses 1 power (floor 0)
    Gust,
    /// Actor regains 3 HP
    Heal,
    /// Deal 3 damage to the opponent
    Poison,
    /// Actor is shielded this round
    Protect,
    /// One of Fireball, Frost or Lightning at random
    Spellcast,
    /// A summoned creature deals 1-4 damage
    Summon,
    /// Disclose the opponent's hand
    Foresight,
    /// Swap the power of both played cards
    Chaos,
    /// Actor is shielded this round
    Ethereal,
    /// Actor is shielded this round and regains 1 HP
    Crystallize,
    /// Deal 2 damage and regain 2 HP
    Drain,
}

impl EffectKind {
    pub const ALL: [EffectKind; 19] = [
        EffectKind::Burn,
        EffectKind::Freeze,
        EffectKind::Steal,
        EffectKind::Shield,
        EffectKind::RevealHand,
        EffectKind::DiceRoll,
        EffectKind::Shock,
        EffectKind::Sturdy,
        EffectKind::Gust,
        EffectKind::Heal,
        EffectKind::Poison,
        EffectKind::Protect,
        EffectKind::Spellcast,
        EffectKind::Summon,
        EffectKind::Foresight,
        EffectKind::Chaos,
        EffectKind::Ethereal,
        EffectKind::Crystallize,
        EffectKind::Drain,
    ];

    /// Identifier used in catalogs and card data
    pub fn id(self) -> &'static str {
        match self {
            EffectKind::Burn => "Burn",
            EffectKind::Freeze => "Freeze",
            EffectKind::Steal => "Steal",
            EffectKind::Shield => "Shield",
            EffectKind::RevealHand => "RevealHand",
            EffectKind::DiceRoll => "DiceRoll",
            EffectKind::Shock => "Shock",
            EffectKind::Sturdy => "Sturdy",
            EffectKind::Gust => "Gust",
            EffectKind::Heal => "Heal",
            EffectKind::Poison => "Poison",
            EffectKind::Protect => "Protect",
            EffectKind::Spellcast => "Spellcast",
            EffectKind::Summon => "Summon",
            EffectKind::Foresight => "Foresight",
            EffectKind::Chaos => "Chaos",
            EffectKind::Ethereal => "Ethereal",
            EffectKind::Crystallize => "Crystallize",
            EffectKind::Drain => "Drain",
        }
    }

    /// Human-readable ability name shown on cards
    pub fn ability_name(self) -> &'static str {
        match self {
            EffectKind::RevealHand => "Reveal Hand",
            EffectKind::DiceRoll => "Dice Roll",
            other => other.id(),
        }
    }

    /// Resolve a catalog identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<EffectKind> {
        EffectKind::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Effects that shield the actor for the round
    pub fn grants_shield(self) -> bool {
        matches!(
            self,
            EffectKind::Shield | EffectKind::Protect | EffectKind::Ethereal | EffectKind::Crystallize
        )
    }

    /// Effects that disclose the opponent's hand
    pub fn reveals_hand(self) -> bool {
        matches!(self, EffectKind::RevealHand | EffectKind::Foresight)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
