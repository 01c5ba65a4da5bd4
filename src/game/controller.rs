//! Player controller trait and battle view
//!
//! This module defines the interface between the engine and whoever picks
//! the player's card each round (AI or human). The driver calls the
//! controller with a read-only view of the battle; the controller answers
//! with a hand index.

use crate::config::GameMode;
use crate::core::{Card, Combatant};
use rand::RngCore;

/// Read-only view of a battle from the player's side
///
/// The enemy hand is only visible while a reveal is active.
pub struct BattleView<'a> {
    player: &'a Combatant,
    enemy: &'a Combatant,
    mode: GameMode,
    enemy_hand_revealed: bool,
}

impl<'a> BattleView<'a> {
    pub fn new(player: &'a Combatant, enemy: &'a Combatant, mode: GameMode, enemy_hand_revealed: bool) -> Self {
        BattleView {
            player,
            enemy,
            mode,
            enemy_hand_revealed,
        }
    }

    /// Cards the player can choose from
    pub fn hand(&self) -> &[Card] {
        self.player.hand.as_slice()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn player_hp(&self) -> i32 {
        self.player.hp
    }

    pub fn player_defense(&self) -> i32 {
        self.player.defense
    }

    pub fn enemy_name(&self) -> &str {
        &self.enemy.name
    }

    pub fn enemy_hp(&self) -> i32 {
        self.enemy.hp
    }

    pub fn enemy_defense(&self) -> i32 {
        self.enemy.defense
    }

    /// Enemy cards, if currently revealed
    pub fn enemy_hand(&self) -> Option<&[Card]> {
        self.enemy_hand_revealed.then(|| self.enemy.hand.as_slice())
    }

    /// Power a card will carry into the round after the mode adjustment
    pub fn effective_power(&self, card: &Card) -> i32 {
        self.mode.adjust_power(card.power)
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players or connect to a UI.
pub trait PlayerController {
    /// Short name for logs and statistics
    fn name(&self) -> &str;

    /// Choose the index of the card to play
    ///
    /// The hand is never empty when this is called. Returning an index out
    /// of range makes the engine reject the play with `InvalidCardIndex`.
    fn choose_card(&mut self, view: &BattleView, rng: &mut dyn RngCore) -> usize;

    /// Called when the battle ends (for cleanup/logging)
    fn on_battle_end(&mut self, _view: &BattleView, _won: bool) {}
}
