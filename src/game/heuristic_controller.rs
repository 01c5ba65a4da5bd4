//! Heuristic AI controller
//!
//! Scores each card in hand with simple battle arithmetic rather than
//! simulation. Priorities, in order: take a lethal play, raise a shield
//! when the next hit could be fatal, otherwise maximise expected damage.

use crate::core::{Card, EffectKind};
use crate::game::controller::{BattleView, PlayerController};
use rand::RngCore;

/// Assumed enemy card power while the enemy hand is hidden
const UNSEEN_ENEMY_POWER: i32 = 6;

/// Heuristic AI controller that makes decisions using evaluation functions
#[derive(Debug, Clone)]
pub struct HeuristicController {
    /// HP at or below which the controller plays defensively
    /// even when no lethal hit is visible
    caution_hp: i32,
}

impl HeuristicController {
    pub fn new() -> Self {
        HeuristicController { caution_hp: 8 }
    }

    pub fn with_caution(caution_hp: i32) -> Self {
        HeuristicController {
            caution_hp: caution_hp.max(0),
        }
    }

    /// Damage this card is guaranteed to deal before any enemy effect
    fn guaranteed_damage(view: &BattleView, card: &Card) -> i32 {
        let hit = (view.effective_power(card) - view.enemy_defense()).max(0);
        let direct = match card.effect_kind() {
            Some(EffectKind::Poison) => 3,
            Some(EffectKind::Burn) | Some(EffectKind::Drain) => 2,
            Some(EffectKind::Summon) | Some(EffectKind::DiceRoll) => 1,
            _ => 0,
        };
        hit + direct
    }

    /// Worst damage the player expects to take this round
    fn expected_threat(view: &BattleView) -> i32 {
        let enemy_power = match view.enemy_hand() {
            Some(cards) => cards
                .iter()
                .map(|c| view.effective_power(c))
                .max()
                .unwrap_or(0),
            None => view.mode().adjust_power(UNSEEN_ENEMY_POWER),
        };
        (enemy_power - view.player_defense()).max(0)
    }

    /// General-purpose score when neither lethal nor defence applies
    fn score(&self, view: &BattleView, card: &Card) -> i32 {
        let mut score = Self::guaranteed_damage(view, card) * 2;
        match card.effect_kind() {
            Some(EffectKind::Heal) | Some(EffectKind::Crystallize) if view.player_hp() <= self.caution_hp * 2 => {
                score += 4
            }
            Some(EffectKind::Shock) | Some(EffectKind::Freeze) | Some(EffectKind::Sturdy) => score += 3,
            Some(EffectKind::Gust) | Some(EffectKind::Spellcast) => score += 2,
            Some(EffectKind::RevealHand) | Some(EffectKind::Foresight) if view.enemy_hand().is_none() => {
                score += 1
            }
            _ => {}
        }
        score
    }

    /// Index of the highest-keyed card; ties keep the earliest
    fn best_by(hand: &[Card], mut key: impl FnMut(&Card) -> i32) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (i, card) in hand.iter().enumerate() {
            let k = key(card);
            if best.map_or(true, |(_, b)| k > b) {
                best = Some((i, k));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl Default for HeuristicController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for HeuristicController {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_card(&mut self, view: &BattleView, _rng: &mut dyn RngCore) -> usize {
        let hand = view.hand();

        let lethal = Self::best_by(hand, |c| Self::guaranteed_damage(view, c));
        if let Some(index) = lethal {
            if Self::guaranteed_damage(view, &hand[index]) >= view.enemy_hp() {
                return index;
            }
        }

        let threat = Self::expected_threat(view);
        if threat >= view.player_hp() || view.player_hp() <= self.caution_hp {
            let shield = Self::best_by(hand, |c| match c.effect_kind() {
                Some(kind) if kind.grants_shield() => view.effective_power(c),
                _ => i32::MIN,
            });
            if let Some(index) = shield {
                if hand[index].effect_kind().is_some_and(EffectKind::grants_shield) {
                    return index;
                }
            }
        }

        Self::best_by(hand, |c| self.score(view, c)).unwrap_or(0)
    }
}
