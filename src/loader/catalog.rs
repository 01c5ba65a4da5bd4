//! Character and card catalogs
//!
//! Provides the built-in pools and lookup by name. A catalog can also be
//! read from a JSON file of the form
//! `{"characters": [{"name", "baseHP", "rarity"}...], "cards": [{"name", "emoji", "power", "ability", "effect"}...]}`.

use crate::core::{CardTemplate, CharacterTemplate, EffectKind, Rarity};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The sixteen archetypes of the base game
pub fn builtin_characters() -> Vec<CharacterTemplate> {
    use EffectKind::*;
    use Rarity::*;

    vec![
        CharacterTemplate::new("Squire", 30, Common).with_signature(Protect),
        CharacterTemplate::new("Rogue", 28, Uncommon).with_signature(Steal),
        CharacterTemplate::new("Mage", 25, Rare).with_signature(Spellcast),
        CharacterTemplate::new("Knight", 35, Epic).with_signature(Shield),
        CharacterTemplate::new("Dragon Lord", 40, Legendary).with_signature(Burn),
        CharacterTemplate::new("Phoenix Rider", 38, Mythic).with_signature(Heal),
        CharacterTemplate::new("Celestial Guardian", 45, Divine).with_signature(Crystallize),
        CharacterTemplate::new("Forest Druid", 32, Common).with_signature(Heal),
        CharacterTemplate::new("Berserker", 33, Uncommon).with_signature(Chaos),
        CharacterTemplate::new("Necromancer", 27, Rare).with_signature(Poison),
        CharacterTemplate::new("Paladin", 36, Epic).with_signature(Protect),
        CharacterTemplate::new("Warlock", 29, Legendary).with_signature(Drain),
        CharacterTemplate::new("Valkyrie", 37, Mythic).with_signature(Shock),
        CharacterTemplate::new("Titan", 42, Divine).with_signature(Sturdy),
        CharacterTemplate::new("Monk", 31, Common).with_signature(Foresight),
        CharacterTemplate::new("Assassin", 26, Uncommon).with_signature(Poison),
    ]
}

/// Ability cards plus a handful of pure-power cards
pub fn builtin_cards() -> Vec<CardTemplate> {
    use EffectKind::*;

    vec![
        CardTemplate::new("Flame Warrior", "🔥", 5, Some(Burn)),
        CardTemplate::new("Ice Mage", "❄️", 4, Some(Freeze)),
        CardTemplate::new("Shadow Thief", "🕵️", 3, Some(Steal)),
        CardTemplate::new("Guardian Knight", "🛡️", 6, Some(Shield)),
        CardTemplate::new("Mind Seer", "👁️", 2, Some(RevealHand)),
        CardTemplate::new("Dice Goblin", "🎲", 1, Some(DiceRoll)),
        CardTemplate::new("Thunder Archer", "🏹", 4, Some(Shock)),
        CardTemplate::new("Earth Golem", "🗿", 7, Some(Sturdy)),
        CardTemplate::new("Wind Sprite", "🌪️", 3, Some(Gust)),
        CardTemplate::new("Water Healer", "💧", 2, Some(Heal)),
        CardTemplate::new("Dark Assassin", "🗡️", 5, Some(Poison)),
        CardTemplate::new("Light Paladin", "⚔️", 6, Some(Protect)),
        CardTemplate::new("Arcane Wizard", "🧙", 4, Some(Spellcast)),
        CardTemplate::new("Beast Tamer", "🐾", 3, Some(Summon)),
        CardTemplate::new("Mystic Oracle", "🔮", 2, Some(Foresight)),
        CardTemplate::new("Chaos Sorcerer", "🌀", 5, Some(Chaos)),
        CardTemplate::new("Phantom Wisp", "👻", 3, Some(Ethereal)),
        CardTemplate::new("Crystal Sentinel", "💎", 4, Some(Crystallize)),
        CardTemplate::new("Vampire Bat", "🦇", 3, Some(Drain)),
        CardTemplate::new("Militia Spearman", "🔱", 3, None),
        CardTemplate::new("Wandering Ronin", "🥷", 5, None),
        CardTemplate::new("Stone Brute", "🪨", 6, None),
        CardTemplate::new("Iron Colossus", "🤖", 8, None),
    ]
}

/// Pools of characters and cards available to a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDatabase {
    characters: Vec<CharacterTemplate>,
    cards: Vec<CardTemplate>,
}

impl CatalogDatabase {
    /// Build a catalog, rejecting empty pools and malformed characters
    pub fn new(characters: Vec<CharacterTemplate>, cards: Vec<CardTemplate>) -> Result<Self> {
        if characters.is_empty() {
            return Err(DuelError::InvalidArgument("catalog has no characters".to_string()));
        }
        if cards.is_empty() {
            return Err(DuelError::InvalidArgument("catalog has no cards".to_string()));
        }
        for character in &characters {
            character.validate()?;
        }
        Ok(CatalogDatabase { characters, cards })
    }

    /// The catalog that ships with the game
    pub fn builtin() -> Self {
        CatalogDatabase {
            characters: builtin_characters(),
            cards: builtin_cards(),
        }
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DuelError::ResourceMissing(format!(
                "catalog file {} not found",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: CatalogDatabase = serde_json::from_str(text)?;
        Self::new(raw.characters, raw.cards)
    }

    pub fn characters(&self) -> &[CharacterTemplate] {
        &self.characters
    }

    pub fn cards(&self) -> &[CardTemplate] {
        &self.cards
    }

    /// Look up a character by name (case-insensitive)
    pub fn get_character(&self, name: &str) -> Option<&CharacterTemplate> {
        self.characters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Look up a card by name (case-insensitive)
    pub fn get_card(&self, name: &str) -> Option<&CardTemplate> {
        self.cards.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Selection weights of the character pool, by rarity
    pub fn character_weights(&self) -> Vec<u32> {
        self.characters.iter().map(|c| c.rarity.weight()).collect()
    }

    /// A uniformly random card from the pool
    pub fn random_card(&self, rng: &mut (impl rand::Rng + ?Sized)) -> CardTemplate {
        let index = rng.gen_range(0..self.cards.len());
        self.cards[index].clone()
    }
}

impl Default for CatalogDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}
