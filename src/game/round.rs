//! Round resolution
//!
//! One round is one card from each side carried through a fixed sequence:
//! pick the enemy card, apply the player's effect, apply the enemy's effect,
//! trade damage, drop shields, check for a winner, and retire the played
//! cards. The order is part of the rules; changing it changes outcomes.

use crate::config::GameMode;
use crate::core::{Card, Combatant, EffectId, EffectKind};
use crate::game::effects::{self, EffectContext};
use crate::game::hand;
use crate::game::{BattleCounters, BattleLog, GameLogger, LogTopic, VerbosityLevel};
use crate::{DuelError, Result};
use rand::{Rng, RngCore};

/// Progress through a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStage {
    Idle,
    ActorEffectApplied,
    OpponentEffectApplied,
    DamageComputed,
    Finished(RoundOutcome),
}

/// Result of a round from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Ongoing,
    Victory,
    Defeat,
}

impl RoundOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RoundOutcome::Ongoing)
    }
}

/// What happened when a card's effect was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectResolution {
    /// Pure-power card
    NoEffect,
    /// Identifier the registry does not know; treated as no effect
    Unknown(EffectId),
    Applied { kind: EffectKind, description: String },
    /// The effect failed and was discarded
    Failed { kind: EffectKind, reason: String },
}

impl EffectResolution {
    pub fn applied_kind(&self) -> Option<EffectKind> {
        match self {
            EffectResolution::Applied { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Everything a presentation layer needs to replay a round
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub player_index: usize,
    pub enemy_index: usize,
    /// Played cards as they stood when damage was computed
    pub player_card: Card,
    pub enemy_card: Card,
    pub player_effect: EffectResolution,
    pub enemy_effect: EffectResolution,
    pub damage_to_player: i32,
    pub damage_to_enemy: i32,
    pub player_shielded: bool,
    pub enemy_shielded: bool,
    /// The player's card asked for the enemy hand to be shown
    pub reveal_requested: bool,
    pub outcome: RoundOutcome,
}

/// Which side an effect belongs to, for log wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Player,
    Enemy,
}

impl Side {
    fn owner(self) -> &'static str {
        match self {
            Side::Player => "Your",
            Side::Enemy => "Enemy's",
        }
    }
}

/// Resolves rounds against borrowed battle state
pub struct RoundResolver<'a> {
    mode: GameMode,
    /// Extra power on the enemy's played card (survival escalation)
    enemy_power_bonus: i32,
    log: &'a mut BattleLog,
    logger: &'a GameLogger,
    counters: &'a mut BattleCounters,
    stage: RoundStage,
}

impl<'a> RoundResolver<'a> {
    pub fn new(
        mode: GameMode,
        log: &'a mut BattleLog,
        logger: &'a GameLogger,
        counters: &'a mut BattleCounters,
    ) -> Self {
        RoundResolver {
            mode,
            enemy_power_bonus: 0,
            log,
            logger,
            counters,
            stage: RoundStage::Idle,
        }
    }

    pub fn with_enemy_power_bonus(mut self, bonus: i32) -> Self {
        self.enemy_power_bonus = bonus;
        self
    }

    pub fn stage(&self) -> RoundStage {
        self.stage
    }

    fn advance(&mut self, stage: RoundStage) {
        log_if_verbose!(self.logger, "round stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Play the card at `index` of the player's hand
    ///
    /// On return both played cards have left their hands for the discard
    /// piles; refilling the hands is the caller's job.
    pub fn resolve(
        &mut self,
        player: &mut Combatant,
        enemy: &mut Combatant,
        index: usize,
        rng: &mut dyn RngCore,
    ) -> Result<RoundReport> {
        let hand_size = player.hand.len();
        let player_original = player
            .hand
            .get(index)
            .cloned()
            .ok_or(DuelError::InvalidCardIndex { index, hand_size })?;
        if enemy.hand.is_empty() {
            return Err(DuelError::InvalidAction(format!("{} has no cards in hand", enemy.name)));
        }

        let enemy_index = rng.gen_range(0..enemy.hand.len());
        let enemy_original = enemy.hand.cards[enemy_index].clone();
        log_if_verbose!(self.logger, "enemy picks card {} of {}", enemy_index, enemy.hand.len());

        let mut player_card = player_original.clone();
        let mut enemy_card = enemy_original.clone();
        player_card.power = self.mode.adjust_power(player_card.power);
        enemy_card.power = self
            .mode
            .adjust_power(enemy_card.power)
            .saturating_add(self.enemy_power_bonus);

        self.log.record(
            self.logger,
            format!("You played: {} ({})", player_card.name, player_card.ability),
        );
        self.log.record(
            self.logger,
            format!("Enemy played: {} ({})", enemy_card.name, enemy_card.ability),
        );

        let mut reveal_requested = false;
        let hp_mark = player.hp;
        let player_effect = {
            let mut reveal = || reveal_requested = true;
            self.apply_card_effect(
                Side::Player,
                &mut player_card,
                &mut enemy_card,
                player,
                enemy,
                &mut reveal,
                rng,
            )
        };
        if reveal_requested {
            self.log.record(self.logger, "Enemy hand revealed!");
        }
        match player_effect.applied_kind() {
            Some(EffectKind::Burn) => self.counters.burn_uses += 1,
            Some(EffectKind::Freeze) => self.counters.freeze_uses += 1,
            _ => {}
        }
        self.note_player_loss(hp_mark, player.hp);
        self.advance(RoundStage::ActorEffectApplied);

        // Enemy reveals are not surfaced to the player
        let hp_mark = player.hp;
        let enemy_effect = self.apply_card_effect(
            Side::Enemy,
            &mut enemy_card,
            &mut player_card,
            enemy,
            player,
            &mut || {},
            rng,
        );
        self.note_player_loss(hp_mark, player.hp);
        self.advance(RoundStage::OpponentEffectApplied);

        let player_shielded = player.shield;
        let damage_to_player = if player_shielded {
            self.log.record(self.logger, "You were shielded and took no damage");
            self.counters.shield_blocks += 1;
            0
        } else {
            let damage = compute_damage(enemy_card.power, player.defense);
            let hp_mark = player.hp;
            player.hp = player.hp.saturating_sub(damage);
            self.note_player_loss(hp_mark, player.hp);
            self.log.record(
                self.logger,
                format!("You took {} damage (reduced by {} defense)", damage, player.defense),
            );
            damage
        };

        let enemy_shielded = enemy.shield;
        let damage_to_enemy = if enemy_shielded {
            self.log.record(self.logger, "Enemy was shielded and took no damage");
            0
        } else {
            let damage = compute_damage(player_card.power, enemy.defense);
            enemy.hp = enemy.hp.saturating_sub(damage);
            self.log.record(
                self.logger,
                format!("Enemy took {} damage (reduced by {} defense)", damage, enemy.defense),
            );
            damage
        };
        self.advance(RoundStage::DamageComputed);

        player.shield = false;
        enemy.shield = false;

        let outcome = if player.is_defeated() {
            RoundOutcome::Defeat
        } else if enemy.is_defeated() {
            RoundOutcome::Victory
        } else {
            RoundOutcome::Ongoing
        };
        self.counters.rounds_played += 1;
        self.advance(RoundStage::Finished(outcome));

        if let Some(card) = player.hand.remove_at(index) {
            hand::discard(player, card);
        }
        if let Some(card) = enemy.hand.remove_at(enemy_index) {
            hand::discard(enemy, card);
        }

        Ok(RoundReport {
            player_index: index,
            enemy_index,
            player_card,
            enemy_card,
            player_effect,
            enemy_effect,
            damage_to_player,
            damage_to_enemy,
            player_shielded,
            enemy_shielded,
            reveal_requested,
            outcome,
        })
    }

    /// Count any HP the player lost between two readings
    fn note_player_loss(&mut self, before: i32, after: i32) {
        let lost = before.saturating_sub(after).max(0);
        self.counters.damage_taken = self.counters.damage_taken.saturating_add(lost);
    }

    /// Apply one card's effect on staged copies, committing only on success
    #[allow(clippy::too_many_arguments)]
    fn apply_card_effect(
        &mut self,
        side: Side,
        acting_card: &mut Card,
        opposing_card: &mut Card,
        actor: &mut Combatant,
        opponent: &mut Combatant,
        reveal: &mut dyn FnMut(),
        rng: &mut dyn RngCore,
    ) -> EffectResolution {
        let Some(id) = acting_card.effect.clone() else {
            return EffectResolution::NoEffect;
        };
        let Some(kind) = effects::lookup(&id) else {
            log_if_verbose!(self.logger, "unknown effect '{}' on {}; skipped", id, acting_card.name);
            return EffectResolution::Unknown(id);
        };

        let mut staged_acting = acting_card.clone();
        let mut staged_opposing = opposing_card.clone();
        let mut actor_vitals = actor.vitals();
        let mut opponent_vitals = opponent.vitals();

        let result = {
            let mut ctx = EffectContext {
                acting_card: &mut staged_acting,
                opposing_card: &mut staged_opposing,
                actor: &mut actor_vitals,
                opponent: &mut opponent_vitals,
                reveal,
            };
            effects::apply_effect(kind, &mut ctx, rng)
        };

        match result {
            Ok(description) => {
                *acting_card = staged_acting;
                *opposing_card = staged_opposing;
                actor.set_vitals(actor_vitals);
                opponent.set_vitals(opponent_vitals);
                self.log.record(
                    self.logger,
                    format!("{} {}: {}", side.owner(), acting_card.name, description),
                );
                EffectResolution::Applied { kind, description }
            }
            Err(err) => {
                let reason = err.to_string();
                self.logger
                    .topic(VerbosityLevel::Minimal, LogTopic::EffectFailure, &reason);
                self.log.record(self.logger, reason.clone());
                EffectResolution::Failed { kind, reason }
            }
        }
    }
}

/// HP lost to a card of `power` against `defense`
pub fn compute_damage(power: i32, defense: i32) -> i32 {
    power.saturating_sub(defense).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardTemplate, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn combatant(name: &str, hp: i32, defense: i32, hand: Vec<Card>) -> Combatant {
        let mut c = Combatant::new(name, hp, defense, Rarity::Common);
        for card in hand {
            c.hand.add(card);
        }
        c
    }

    fn card(name: &str, power: i32, effect: Option<EffectKind>) -> Card {
        CardTemplate::new(name, "*", power, effect).instantiate()
    }

    struct Table {
        log: BattleLog,
        logger: GameLogger,
        counters: BattleCounters,
        rng: ChaCha12Rng,
    }

    impl Table {
        fn new() -> Self {
            Table {
                log: BattleLog::new(),
                logger: GameLogger::capturing(),
                counters: BattleCounters::default(),
                rng: ChaCha12Rng::seed_from_u64(17),
            }
        }

        fn play(&mut self, mode: GameMode, player: &mut Combatant, enemy: &mut Combatant, index: usize) -> Result<RoundReport> {
            let mut resolver = RoundResolver::new(mode, &mut self.log, &self.logger, &mut self.counters);
            resolver.resolve(player, enemy, index, &mut self.rng)
        }
    }

    #[test]
    fn test_damage_formula() {
        assert_eq!(compute_damage(5, 2), 3);
        assert_eq!(compute_damage(2, 5), 0);
        assert_eq!(compute_damage(-3, 0), 0);
    }

    #[test]
    fn test_player_takes_reduced_damage() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 2, vec![card("Pebble", 0, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Hammer", 5, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(player.hp, 27);
        assert_eq!(report.damage_to_player, 3);
        assert!(table.log.contains("took 3 damage"));
        assert_eq!(report.outcome, RoundOutcome::Ongoing);
    }

    #[test]
    fn test_invalid_index() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("A", 1, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("B", 1, None)]);

        let err = table.play(GameMode::Standard, &mut player, &mut enemy, 3).unwrap_err();
        assert!(matches!(err, DuelError::InvalidCardIndex { index: 3, hand_size: 1 }));
        assert!(table.log.is_empty());
        assert_eq!(player.hand.len(), 1);
    }

    #[test]
    fn test_shield_blocks_and_resets() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Guard", 1, Some(EffectKind::Shield))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Hammer", 9, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(player.hp, 30);
        assert!(report.player_shielded);
        assert!(!player.shield);
        assert_eq!(table.counters.shield_blocks, 1);
        assert!(table.log.contains("You were shielded and took no damage"));
    }

    #[test]
    fn test_effects_resolve_before_damage() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Archer", 4, Some(EffectKind::Shock))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Golem", 7, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(report.enemy_card.power, 0);
        assert_eq!(player.hp, 30);
        assert_eq!(enemy.hp, 26);
    }

    #[test]
    fn test_enemy_effect_applies_after_player_effect() {
        let mut table = Table::new();
        // Player freezes the enemy card (7 -> 5); enemy then swaps powers
        let mut player = combatant("Hero", 30, 0, vec![card("Ice", 4, Some(EffectKind::Freeze))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Chaos", 7, Some(EffectKind::Chaos))]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(report.player_card.power, 5);
        assert_eq!(report.enemy_card.power, 4);
        assert_eq!(player.hp, 26);
        assert_eq!(enemy.hp, 25);
    }

    #[test]
    fn test_victory_and_defeat() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Axe", 9, None)]);
        let mut enemy = combatant("Foe", 5, 0, vec![card("Twig", 1, None)]);
        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Victory);

        let mut player = combatant("Hero", 2, 0, vec![card("Axe", 9, None)]);
        let mut enemy = combatant("Foe", 5, 0, vec![card("Club", 4, None)]);
        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Defeat);
    }

    #[test]
    fn test_mutual_knockout_is_defeat() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 3, 0, vec![card("Axe", 9, None)]);
        let mut enemy = combatant("Foe", 3, 0, vec![card("Club", 9, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Defeat);
    }

    #[test]
    fn test_played_cards_go_to_discard() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("A", 1, None), card("B", 2, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("C", 1, None)]);

        table.play(GameMode::Standard, &mut player, &mut enemy, 1).unwrap();

        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.hand.get(0).unwrap().name, "A");
        assert_eq!(player.discard_pile.get(0).unwrap().name, "B");
        assert_eq!(enemy.discard_pile.len(), 1);
    }

    #[test]
    fn test_discard_keeps_printed_power() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Thief", 3, Some(EffectKind::Steal))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Golem", 7, None)]);

        let report = table.play(GameMode::Blitz, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(report.player_card.power, 14);
        assert_eq!(player.discard_pile.get(0).unwrap().power, 3);
    }

    #[test]
    fn test_mode_adjusts_both_cards() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Sword", 5, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Spear", 4, None)]);

        table.play(GameMode::Tactical, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(enemy.hp, 27);
        assert_eq!(player.hp, 28);
    }

    #[test]
    fn test_enemy_power_bonus() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Twig", 0, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Spear", 4, None)]);

        let mut resolver = RoundResolver::new(GameMode::Survival, &mut table.log, &table.logger, &mut table.counters)
            .with_enemy_power_bonus(2);
        resolver.resolve(&mut player, &mut enemy, 0, &mut table.rng).unwrap();

        assert_eq!(player.hp, 24);
    }

    #[test]
    fn test_failed_effect_leaves_state_untouched() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Assassin", 5, Some(EffectKind::Poison))]);
        let mut enemy = combatant("Foe", i32::MIN + 1, 0, vec![card("Twig", 0, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert!(matches!(report.player_effect, EffectResolution::Failed { kind: EffectKind::Poison, .. }));
        assert_eq!(report.player_card.power, 5);
        assert!(table.log.contains("Effect of Assassin failed"));
        // Damage and the termination check still ran
        assert_eq!(report.damage_to_enemy, 5);
        assert_eq!(report.outcome, RoundOutcome::Victory);
        assert_eq!(
            table.logger.entries().count(LogTopic::EffectFailure),
            1
        );
    }

    #[test]
    fn test_unknown_effect_is_noop() {
        let mut table = Table::new();
        let mut odd = card("Oddity", 3, None);
        odd.effect = Some(EffectId::new("Teleport"));
        let mut player = combatant("Hero", 30, 0, vec![odd]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Twig", 1, None)]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(report.player_effect, EffectResolution::Unknown(EffectId::new("Teleport")));
        assert_eq!(enemy.hp, 27);
    }

    #[test]
    fn test_only_player_reveals_surface() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Seer", 2, Some(EffectKind::RevealHand))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Oracle", 2, Some(EffectKind::Foresight))]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert!(report.reveal_requested);
        assert_eq!(table.log.iter().filter(|l| l.as_str() == "Enemy hand revealed!").count(), 1);

        let mut player = combatant("Hero", 30, 0, vec![card("Twig", 1, None)]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Oracle", 2, Some(EffectKind::Foresight))]);
        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();
        assert!(!report.reveal_requested);
    }

    #[test]
    fn test_counters_track_player_effects_only() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Flame", 5, Some(EffectKind::Burn))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Ice", 4, Some(EffectKind::Freeze))]);

        table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(table.counters.burn_uses, 1);
        assert_eq!(table.counters.freeze_uses, 0);
        assert_eq!(table.counters.rounds_played, 1);
    }

    #[test]
    fn test_enemy_effect_counts_as_damage_taken() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Axe", 9, None)]);
        let mut enemy = combatant("Foe", 1, 0, vec![card("Assassin", 0, Some(EffectKind::Poison))]);

        let report = table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        assert_eq!(report.outcome, RoundOutcome::Victory);
        assert_eq!(report.damage_to_player, 0);
        assert_eq!(player.hp, 27);
        assert_eq!(table.counters.damage_taken, 3);
    }

    #[test]
    fn test_own_heal_does_not_hide_later_loss() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 0, vec![card("Cleric", 0, Some(EffectKind::Heal))]);
        let mut enemy = combatant("Foe", 30, 0, vec![card("Assassin", 0, Some(EffectKind::Poison))]);

        table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        // +3 from the heal, then -3 from the poison
        assert_eq!(player.hp, 30);
        assert_eq!(table.counters.damage_taken, 3);
    }

    #[test]
    fn test_log_order() {
        let mut table = Table::new();
        let mut player = combatant("Hero", 30, 1, vec![card("Flame", 5, Some(EffectKind::Burn))]);
        let mut enemy = combatant("Foe", 30, 2, vec![card("Club", 4, None)]);

        table.play(GameMode::Standard, &mut player, &mut enemy, 0).unwrap();

        similar_asserts::assert_eq!(
            table.log.entries().to_vec(),
            vec![
                "You played: Flame (Burn)".to_string(),
                "Enemy played: Club (None)".to_string(),
                "Your Flame: Burn deals 2 damage!".to_string(),
                "You took 3 damage (reduced by 1 defense)".to_string(),
                "Enemy took 3 damage (reduced by 2 defense)".to_string(),
            ]
        );
        assert_eq!(enemy.hp, 25);
    }
}
