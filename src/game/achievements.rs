//! Achievement tracking
//!
//! Unlock flags are monotonic for the life of a session. The tracker only
//! stores flags; deciding when a condition is met belongs to the store.

use serde::Serialize;

/// A single achievement and its unlock flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
    pub icon: &'static str,
}

impl Achievement {
    const fn locked(id: &'static str, name: &'static str, description: &'static str, icon: &'static str) -> Self {
        Achievement {
            id,
            name,
            description,
            unlocked: false,
            icon,
        }
    }
}

pub const FIRST_WIN: &str = "first_win";
pub const SHIELD_MASTER: &str = "shield_master";
pub const FIRE_WIZARD: &str = "fire_wizard";
pub const ICE_MAGE: &str = "ice_mage";
pub const RARE_COLLECTOR: &str = "rare_collector";
pub const LUCKY_DRAW: &str = "lucky_draw";
pub const FLAWLESS: &str = "flawless";
pub const CARD_COLLECTOR: &str = "card_collector";
pub const UNSTOPPABLE: &str = "unstoppable";
pub const BLITZ_CHAMPION: &str = "blitz_champion";
pub const TACTICIAN: &str = "tactician";
pub const SURVIVOR: &str = "survivor";

/// Thresholds for counter-driven achievements
pub const SHIELD_MASTER_BLOCKS: u32 = 3;
pub const FIRE_WIZARD_BURNS: u32 = 5;
pub const ICE_MAGE_FREEZES: u32 = 5;
pub const CARD_COLLECTOR_DISTINCT: usize = 20;
pub const UNSTOPPABLE_STREAK: u32 = 3;

fn catalog() -> Vec<Achievement> {
    vec![
        Achievement::locked(FIRST_WIN, "First Victory", "Win your first battle", "🏆"),
        Achievement::locked(SHIELD_MASTER, "Shield Master", "Block damage 3 times in a single game", "🛡️"),
        Achievement::locked(FIRE_WIZARD, "Fire Wizard", "Deal burn damage 5 times", "🔥"),
        Achievement::locked(ICE_MAGE, "Ice Mage", "Freeze enemies 5 times", "❄️"),
        Achievement::locked(RARE_COLLECTOR, "Rare Collector", "Select a Legendary or higher character", "✨"),
        Achievement::locked(LUCKY_DRAW, "Lucky Draw", "Get a Divine character in character selection", "🎰"),
        Achievement::locked(FLAWLESS, "Flawless Victory", "Win a battle without taking any damage", "💎"),
        Achievement::locked(CARD_COLLECTOR, "Card Collector", "Play 20 different cards", "📚"),
        Achievement::locked(UNSTOPPABLE, "Unstoppable", "Win 3 battles in a row", "⚡"),
        Achievement::locked(BLITZ_CHAMPION, "Blitz Champion", "Win a battle in Blitz mode", "💥"),
        Achievement::locked(TACTICIAN, "Tactician", "Win a battle in Tactical mode", "♟️"),
        Achievement::locked(SURVIVOR, "Survivor", "Defeat a boss in Survival mode", "💀"),
    ]
}

/// The session's achievement list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementTracker {
    achievements: Vec<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        AchievementTracker {
            achievements: catalog(),
        }
    }

    /// Unlock an achievement
    ///
    /// Returns the achievement only on the locked -> unlocked transition, so
    /// callers notify exactly once. Unknown ids and repeats return `None`.
    pub fn unlock(&mut self, id: &str) -> Option<&Achievement> {
        let achievement = self.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked {
            return None;
        }
        achievement.unlocked = true;
        Some(achievement)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).is_some_and(|a| a.unlocked)
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new()
    }
}
