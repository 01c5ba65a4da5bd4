//! Card templates and card instances

use crate::core::EffectKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Effect identifier as written in catalog data (e.g. "Burn", "RevealHand")
///
/// Identifiers are kept as written so that catalog entries naming an
/// effect this engine does not know still load; such cards simply play
/// as pure-power cards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    pub fn new(s: impl Into<String>) -> Self {
        EffectId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to a known effect kind
    pub fn kind(&self) -> Option<EffectKind> {
        EffectKind::from_id(&self.0)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        EffectId(s.to_string())
    }
}

impl From<EffectKind> for EffectId {
    fn from(kind: EffectKind) -> Self {
        EffectId(kind.id().to_string())
    }
}

/// Immutable catalog entry for a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub emoji: String,
    pub power: i32,
    /// Ability label shown to the player
    pub ability: String,
    /// Effect bound to the card; `None` for pure-power cards
    #[serde(default)]
    pub effect: Option<EffectId>,
}

impl CardTemplate {
    pub fn new(name: &str, emoji: &str, power: i32, effect: Option<EffectKind>) -> Self {
        CardTemplate {
            name: name.to_string(),
            emoji: emoji.to_string(),
            power,
            ability: effect.map_or("None", EffectKind::ability_name).to_string(),
            effect: effect.map(EffectId::from),
        }
    }

    /// Create a playable card from this template
    pub fn instantiate(&self) -> Card {
        Card {
            name: self.name.clone(),
            emoji: self.emoji.clone(),
            power: self.power,
            ability: self.ability.clone(),
            effect: self.effect.clone(),
        }
    }
}

/// A card in play
///
/// Cards are plain values: every hand, deck and discard pile owns its own
/// copies, so modifying the power of a played card never leaks into a
/// catalog entry or another pile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub emoji: String,
    pub power: i32,
    pub ability: String,
    pub effect: Option<EffectId>,
}

impl Card {
    /// Effect kind bound to this card, if any is known
    pub fn effect_kind(&self) -> Option<EffectKind> {
        self.effect.as_ref().and_then(EffectId::kind)
    }

    pub fn is_pure_power(&self) -> bool {
        self.effect.is_none()
    }

    /// Rebind this card to a different effect
    pub fn set_effect(&mut self, kind: EffectKind) {
        self.ability = kind.ability_name().to_string();
        self.effect = Some(kind.into());
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}] ({})", self.emoji, self.name, self.power, self.ability)
    }
}
