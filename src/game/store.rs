//! Game store
//!
//! Owns every piece of mutable game state and exposes the operations a
//! presentation layer drives: lifecycle transitions, drawing, playing a
//! card, revealing the enemy hand and advancing logical time. All
//! randomness comes from one seeded `ChaCha12Rng`.

use crate::config::{GameConfig, GameMode};
use crate::core::{CharacterTemplate, Combatant, Rarity};
use crate::game::achievements::{self, AchievementTracker};
use crate::game::controller::{BattleView, PlayerController};
use crate::game::round::{RoundOutcome, RoundReport, RoundResolver};
use crate::game::scheduler::{Notification, ScheduledEvent, Scheduler};
use crate::game::{factory, hand, selector};
use crate::game::{BattleCounters, BattleLog, GameLogger, LogTopic, SessionProgress, VerbosityLevel};
use crate::loader::CatalogDatabase;
use crate::{DuelError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Duration;

/// Characters offered on the selection screen
pub const SELECTION_OFFER_SIZE: usize = 3;

/// Tutorial step at which the player practices a card play
pub const TUTORIAL_PRACTICE_STEP: u32 = 7;

/// Last tutorial step
pub const TUTORIAL_FINAL_STEP: u32 = 8;

pub const VICTORY_MESSAGE: &str = "Victory! You have vanquished your foe!";
pub const DEFEAT_MESSAGE: &str = "Defeat! The enemy has prevailed.";

/// Screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Title,
    Selection,
    Tutorial,
    Battle,
    /// A battle just ended; a reset to `Title` is pending
    Result,
}

/// Progress of a survival run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurvivalRun {
    /// Current encounter, starting at 1
    pub encounter: u32,
    pub encounters_cleared: u32,
    /// Rounds survived; a fatal round is not counted
    pub rounds_played: u32,
    /// Power added to the enemy's played card
    pub escalation_level: i32,
    pub boss_active: bool,
    pub bosses_defeated: u32,
}

pub struct GameStore {
    config: GameConfig,
    catalog: CatalogDatabase,
    rng: ChaCha12Rng,
    logger: GameLogger,

    phase: GamePhase,
    offered: Vec<CharacterTemplate>,
    player: Option<Combatant>,
    enemy: Option<Combatant>,
    log: BattleLog,
    enemy_hand_revealed: bool,
    tutorial_step: u32,

    achievements: AchievementTracker,
    session: SessionProgress,
    counters: BattleCounters,
    survival: SurvivalRun,

    scheduler: Scheduler,
    notifications: Vec<Notification>,
    /// Identifies the current battle so stale resets can be ignored
    battle_id: u64,
}

impl GameStore {
    /// Create a store over the built-in catalogs
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_catalog(config, CatalogDatabase::builtin())
    }

    pub fn with_catalog(config: GameConfig, catalog: CatalogDatabase) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        Ok(GameStore {
            config,
            catalog,
            rng,
            logger: GameLogger::new(),
            phase: GamePhase::Title,
            offered: Vec::new(),
            player: None,
            enemy: None,
            log: BattleLog::new(),
            enemy_hand_revealed: false,
            tutorial_step: 0,
            achievements: AchievementTracker::new(),
            session: SessionProgress::default(),
            counters: BattleCounters::default(),
            survival: SurvivalRun::default(),
            scheduler: Scheduler::new(),
            notifications: Vec::new(),
            battle_id: 0,
        })
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    // ---- lifecycle -------------------------------------------------------

    /// Enter character selection and offer a weighted pick of characters
    pub fn start_selection(&mut self) -> Result<&[CharacterTemplate]> {
        let count = SELECTION_OFFER_SIZE.min(self.catalog.characters().len());
        let weights = self.catalog.character_weights();
        let offered = selector::weighted_select(self.catalog.characters(), &weights, count, &mut self.rng)?;

        log_if_verbose!(
            self.logger,
            "offered: {}",
            offered.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        );
        if offered.iter().any(|c| c.rarity == Rarity::Divine) {
            self.unlock(achievements::LUCKY_DRAW);
        }

        self.offered = offered;
        self.phase = GamePhase::Selection;
        Ok(&self.offered)
    }

    /// Start a battle as `template` against a weighted-random opponent
    pub fn select_character(&mut self, template: &CharacterTemplate) -> Result<()> {
        let player = factory::create_combatant(template, &self.catalog, self.config.deck_size, &mut self.rng)?;

        let weights = self.catalog.character_weights();
        let picks = selector::weighted_select(self.catalog.characters(), &weights, 1, &mut self.rng)?;
        let opponent = picks
            .first()
            .ok_or_else(|| DuelError::ResourceMissing("character catalog is empty".to_string()))?;
        let enemy = factory::create_combatant(opponent, &self.catalog, self.config.deck_size, &mut self.rng)?;

        self.begin_battle(GamePhase::Battle, player, enemy);
        self.survival = SurvivalRun {
            encounter: 1,
            ..SurvivalRun::default()
        };

        let player = self.player_name_and_rarity();
        let enemy = self.enemy_name_and_rarity();
        self.record(format!("You selected {} ({})", player.0, player.1));
        self.record(format!("Your opponent is {} ({})", enemy.0, enemy.1));

        if template.rarity.is_legendary_or_higher() {
            self.unlock(achievements::RARE_COLLECTOR);
        }
        Ok(())
    }

    /// Select one of the characters offered by [`start_selection`](Self::start_selection)
    pub fn select_offered(&mut self, index: usize) -> Result<()> {
        let template = self.offered.get(index).cloned().ok_or_else(|| {
            DuelError::InvalidArgument(format!(
                "no offered character at index {} ({} offered)",
                index,
                self.offered.len()
            ))
        })?;
        self.select_character(&template)
    }

    /// Start the scripted tutorial battle
    pub fn start_tutorial(&mut self) -> Result<()> {
        let apprentice = CharacterTemplate::new("Apprentice", 30, Rarity::Common);
        let dummy = CharacterTemplate::new("Training Dummy", 20, Rarity::Common);
        let player = factory::create_combatant(&apprentice, &self.catalog, self.config.deck_size, &mut self.rng)?;
        let enemy = factory::create_combatant(&dummy, &self.catalog, self.config.deck_size, &mut self.rng)?;

        self.begin_battle(GamePhase::Tutorial, player, enemy);
        self.tutorial_step = 1;
        self.record("Welcome to the tutorial! Follow the instructions to learn how to play.");
        Ok(())
    }

    /// Move the tutorial on; card play is only allowed at the practice step
    pub fn next_tutorial_step(&mut self) {
        if self.phase == GamePhase::Tutorial && self.tutorial_step < TUTORIAL_FINAL_STEP {
            self.tutorial_step += 1;
        }
    }

    /// Return to the title screen, clearing the battle
    ///
    /// Session progress and achievements are kept.
    pub fn back_to_title(&mut self) {
        self.phase = GamePhase::Title;
        self.player = None;
        self.enemy = None;
        self.offered.clear();
        self.log = BattleLog::new();
        self.enemy_hand_revealed = false;
        self.tutorial_step = 0;
        self.counters.reset();
        self.survival = SurvivalRun::default();
        self.scheduler
            .cancel_where(|e| matches!(e, ScheduledEvent::HideEnemyHand));
    }

    /// Change the rule variant; hand sizes follow at the next refill
    pub fn set_mode(&mut self, mode: GameMode) {
        log_if_verbose!(self.logger, "mode: {} -> {}", self.config.mode, mode);
        self.config.mode = mode;
    }

    fn begin_battle(&mut self, phase: GamePhase, player: Combatant, enemy: Combatant) {
        self.battle_id += 1;
        self.phase = phase;
        self.player = Some(player);
        self.enemy = Some(enemy);
        self.offered.clear();
        self.log = BattleLog::new();
        self.enemy_hand_revealed = false;
        self.counters.reset();
        self.logger
            .topic(VerbosityLevel::Verbose, LogTopic::Battle, &format!("battle {} begins", self.battle_id));
    }

    // ---- play ------------------------------------------------------------

    /// Top both hands up to the mode's hand size
    pub fn draw_hands(&mut self) -> Result<()> {
        let hand_size = self.config.mode.hand_size();
        let (Some(player), Some(enemy)) = (self.player.as_mut(), self.enemy.as_mut()) else {
            return Err(DuelError::InvalidAction("no battle in progress".to_string()));
        };
        hand::refill_hand(player, hand_size, &self.catalog, &mut self.rng);
        hand::refill_hand(enemy, hand_size, &self.catalog, &mut self.rng);
        self.record("New cards drawn");
        Ok(())
    }

    /// Play the card at `index` of the player's hand through one full round
    pub fn play_card(&mut self, index: usize) -> Result<RoundReport> {
        if !matches!(self.phase, GamePhase::Battle | GamePhase::Tutorial) {
            return Err(DuelError::InvalidAction(format!(
                "cannot play a card during {:?}",
                self.phase
            )));
        }
        if self.phase == GamePhase::Tutorial && self.tutorial_step != TUTORIAL_PRACTICE_STEP {
            return Err(DuelError::InvalidAction(format!(
                "tutorial step {} does not allow card play",
                self.tutorial_step
            )));
        }
        let mode = self.config.mode;
        let bonus = if mode == GameMode::Survival {
            self.survival.escalation_level
        } else {
            0
        };

        let (Some(player), Some(enemy)) = (self.player.as_mut(), self.enemy.as_mut()) else {
            return Err(DuelError::InvalidAction("no battle in progress".to_string()));
        };
        let report = RoundResolver::new(mode, &mut self.log, &self.logger, &mut self.counters)
            .with_enemy_power_bonus(bonus)
            .resolve(player, enemy, index, &mut self.rng)?;

        match self.phase {
            GamePhase::Battle => {
                self.session.record_card_played(&report.player_card.name);
            }
            GamePhase::Tutorial => self.tutorial_step = TUTORIAL_FINAL_STEP,
            _ => {}
        }
        if report.reveal_requested {
            self.reveal_enemy_hand();
        }
        self.check_counter_achievements();

        match report.outcome {
            RoundOutcome::Ongoing => {
                if mode == GameMode::Survival {
                    self.escalate();
                }
                self.refill_both()?;
            }
            RoundOutcome::Victory if mode == GameMode::Survival && self.phase == GamePhase::Battle => {
                self.escalate();
                self.clear_encounter()?;
            }
            RoundOutcome::Victory => self.finish_battle(true),
            RoundOutcome::Defeat => self.finish_battle(false),
        }
        Ok(report)
    }

    /// Ask `controller` for a card and play it
    pub fn play_with(&mut self, controller: &mut dyn PlayerController) -> Result<RoundReport> {
        let index = {
            let (Some(player), Some(enemy)) = (self.player.as_ref(), self.enemy.as_ref()) else {
                return Err(DuelError::InvalidAction("no battle in progress".to_string()));
            };
            let view = BattleView::new(player, enemy, self.config.mode, self.enemy_hand_revealed);
            controller.choose_card(&view, &mut self.rng)
        };
        self.play_card(index)
    }

    /// Show the enemy hand for the configured duration
    pub fn reveal_enemy_hand(&mut self) {
        self.enemy_hand_revealed = true;
        // A new reveal restarts the timer
        self.scheduler
            .cancel_where(|e| matches!(e, ScheduledEvent::HideEnemyHand));
        self.scheduler
            .schedule(self.config.reveal_duration(), ScheduledEvent::HideEnemyHand);
    }

    fn refill_both(&mut self) -> Result<()> {
        let hand_size = self.config.mode.hand_size();
        let (Some(player), Some(enemy)) = (self.player.as_mut(), self.enemy.as_mut()) else {
            return Err(DuelError::InvalidAction("no battle in progress".to_string()));
        };
        hand::refill_hand(player, hand_size, &self.catalog, &mut self.rng);
        hand::refill_hand(enemy, hand_size, &self.catalog, &mut self.rng);
        Ok(())
    }

    fn check_counter_achievements(&mut self) {
        if self.counters.shield_blocks >= achievements::SHIELD_MASTER_BLOCKS {
            self.unlock(achievements::SHIELD_MASTER);
        }
        if self.counters.burn_uses >= achievements::FIRE_WIZARD_BURNS {
            self.unlock(achievements::FIRE_WIZARD);
        }
        if self.counters.freeze_uses >= achievements::ICE_MAGE_FREEZES {
            self.unlock(achievements::ICE_MAGE);
        }
    }

    fn finish_battle(&mut self, victory: bool) {
        let rated = self.phase == GamePhase::Battle;
        self.phase = GamePhase::Result;

        if victory {
            self.record("Victory! You have defeated your opponent.");
        } else {
            self.record("Defeat! You have been defeated.");
            if self.config.mode == GameMode::Survival && rated {
                self.record(format!(
                    "You cleared {} encounters before falling",
                    self.survival.encounters_cleared
                ));
            }
        }
        self.logger
            .minimal(if victory { VICTORY_MESSAGE } else { DEFEAT_MESSAGE });

        if rated {
            if victory {
                self.session.record_victory();
                self.check_victory_achievements();
            } else {
                self.session.record_defeat();
            }
        }

        let delay = self.config.terminal_reset_delay();
        self.scheduler.schedule(
            delay,
            ScheduledEvent::Notify(Notification::BattleOutcome {
                victory,
                message: (if victory { VICTORY_MESSAGE } else { DEFEAT_MESSAGE }).to_string(),
            }),
        );
        self.scheduler.schedule(
            delay,
            ScheduledEvent::ResetToTitle {
                battle_id: self.battle_id,
            },
        );
    }

    fn check_victory_achievements(&mut self) {
        self.unlock(achievements::FIRST_WIN);

        let player_rarity = self.player.as_ref().map(|p| p.rarity);
        if player_rarity.is_some_and(Rarity::is_legendary_or_higher) {
            self.unlock(achievements::RARE_COLLECTOR);
        }
        match self.config.mode {
            GameMode::Blitz => {
                self.unlock(achievements::BLITZ_CHAMPION);
            }
            GameMode::Tactical => {
                self.unlock(achievements::TACTICIAN);
            }
            GameMode::Standard | GameMode::Survival => {}
        }
        if self.counters.damage_taken == 0 {
            self.unlock(achievements::FLAWLESS);
        }
        if self.session.distinct_card_count() >= achievements::CARD_COLLECTOR_DISTINCT {
            self.unlock(achievements::CARD_COLLECTOR);
        }
        if self.session.consecutive_wins >= achievements::UNSTOPPABLE_STREAK {
            self.unlock(achievements::UNSTOPPABLE);
        }
    }

    /// Unlock and queue a delayed notice; repeats are silent
    fn unlock(&mut self, id: &str) {
        let Some(achievement) = self.achievements.unlock(id) else {
            return;
        };
        let notice = Notification::AchievementUnlocked {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
        };
        self.logger.topic(
            VerbosityLevel::Minimal,
            LogTopic::Achievement,
            &format!("Achievement unlocked: {}", achievement.name),
        );
        self.scheduler.schedule(
            self.config.achievement_notice_delay(),
            ScheduledEvent::Notify(notice),
        );
    }

    // ---- survival --------------------------------------------------------

    /// Count a survival round and raise the escalation level on schedule
    fn escalate(&mut self) {
        self.survival.rounds_played += 1;
        if self.survival.rounds_played % self.config.survival_escalation_interval == 0 {
            self.survival.escalation_level += 1;
            self.record(format!(
                "The enemies grow stronger! (level {})",
                self.survival.escalation_level
            ));
        }
    }

    /// The current opponent fell; bring on the next one
    fn clear_encounter(&mut self) -> Result<()> {
        let defeated = self.enemy_name_and_rarity().0;
        self.record(format!("{defeated} has been defeated!"));

        self.survival.encounters_cleared += 1;
        if self.survival.boss_active {
            self.survival.bosses_defeated += 1;
            self.unlock(achievements::SURVIVOR);
        }

        self.survival.encounter += 1;
        let boss = self.survival.encounter % self.config.survival_boss_interval == 0;

        let weights = self.catalog.character_weights();
        let picks = selector::weighted_select(self.catalog.characters(), &weights, 1, &mut self.rng)?;
        let template = picks
            .first()
            .ok_or_else(|| DuelError::ResourceMissing("character catalog is empty".to_string()))?;
        let next = if boss {
            factory::create_boss(template, &self.catalog, self.config.deck_size, &mut self.rng)?
        } else {
            factory::create_combatant(template, &self.catalog, self.config.deck_size, &mut self.rng)?
        };

        self.record(if boss {
            format!("A boss approaches: {} ({})", next.name, next.rarity)
        } else {
            format!("A new challenger appears: {} ({})", next.name, next.rarity)
        });
        self.survival.boss_active = boss;
        self.enemy = Some(next);
        self.enemy_hand_revealed = false;
        self.refill_both()
    }

    // ---- time ------------------------------------------------------------

    /// Advance logical time, firing due events; returns how many fired
    pub fn advance_time(&mut self, dt: Duration) -> usize {
        let fired = self.scheduler.advance(dt);
        let count = fired.len();
        for event in fired {
            match event {
                ScheduledEvent::HideEnemyHand => self.enemy_hand_revealed = false,
                ScheduledEvent::Notify(notification) => self.notifications.push(notification),
                ScheduledEvent::ResetToTitle { battle_id } => {
                    if battle_id == self.battle_id && self.phase == GamePhase::Result {
                        self.back_to_title();
                    } else {
                        log_if_verbose!(self.logger, "stale reset for battle {} ignored", battle_id);
                    }
                }
            }
        }
        count
    }

    /// Take every notification delivered so far
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Time until the next scheduled event
    pub fn next_event_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    // ---- read-only state ---------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogDatabase {
        &self.catalog
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.player.as_ref()
    }

    pub fn enemy(&self) -> Option<&Combatant> {
        self.enemy.as_ref()
    }

    pub fn offered_characters(&self) -> &[CharacterTemplate] {
        &self.offered
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn session(&self) -> &SessionProgress {
        &self.session
    }

    pub fn counters(&self) -> &BattleCounters {
        &self.counters
    }

    pub fn survival(&self) -> &SurvivalRun {
        &self.survival
    }

    pub fn enemy_hand_revealed(&self) -> bool {
        self.enemy_hand_revealed
    }

    pub fn tutorial_step(&self) -> u32 {
        self.tutorial_step
    }

    pub fn battle_id(&self) -> u64 {
        self.battle_id
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    /// Whether cards can be played right now
    pub fn is_battle_active(&self) -> bool {
        matches!(self.phase, GamePhase::Battle | GamePhase::Tutorial)
    }

    /// Player's view of the current battle
    pub fn battle_view(&self) -> Option<BattleView<'_>> {
        let player = self.player.as_ref()?;
        let enemy = self.enemy.as_ref()?;
        Some(BattleView::new(player, enemy, self.config.mode, self.enemy_hand_revealed))
    }

    // ---- helpers -----------------------------------------------------------

    fn record(&mut self, line: impl Into<String>) {
        self.log.record(&self.logger, line);
    }

    fn player_name_and_rarity(&self) -> (String, Rarity) {
        self.player
            .as_ref()
            .map(|c| (c.name.clone(), c.rarity))
            .unwrap_or_else(|| (String::new(), Rarity::Common))
    }

    fn enemy_name_and_rarity(&self) -> (String, Rarity) {
        self.enemy
            .as_ref()
            .map(|c| (c.name.clone(), c.rarity))
            .unwrap_or_else(|| (String::new(), Rarity::Common))
    }
}

impl std::fmt::Debug for GameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameStore")
            .field("phase", &self.phase)
            .field("mode", &self.config.mode)
            .field("battle_id", &self.battle_id)
            .field("player", &self.player.as_ref().map(|p| (&p.name, p.hp)))
            .field("enemy", &self.enemy.as_ref().map(|e| (&e.name, e.hp)))
            .field("log_len", &self.log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardTemplate, EffectKind};

    fn quiet_store(mode: GameMode, seed: u64) -> GameStore {
        GameStore::new(GameConfig::default().with_mode(mode).with_seed(seed))
            .unwrap()
            .with_logger(GameLogger::capturing())
    }

    fn card(name: &str, power: i32, effect: Option<EffectKind>) -> Card {
        CardTemplate::new(name, "*", power, effect).instantiate()
    }

    /// Replace both hands with fixed cards
    fn rig(store: &mut GameStore, player_cards: Vec<Card>, enemy_cards: Vec<Card>) {
        let player = store.player.as_mut().unwrap();
        player.hand.clear();
        for c in player_cards {
            player.hand.add(c);
        }
        let enemy = store.enemy.as_mut().unwrap();
        enemy.hand.clear();
        for c in enemy_cards {
            enemy.hand.add(c);
        }
    }

    fn start(store: &mut GameStore, name: &str) {
        let template = store.catalog().get_character(name).unwrap().clone();
        store.select_character(&template).unwrap();
        store.draw_hands().unwrap();
    }

    #[test]
    fn test_play_requires_battle() {
        let mut store = quiet_store(GameMode::Standard, 1);
        assert!(matches!(store.play_card(0), Err(DuelError::InvalidAction(_))));
        assert!(matches!(store.draw_hands(), Err(DuelError::InvalidAction(_))));
    }

    #[test]
    fn test_selection_offers_distinct_characters() {
        let mut store = quiet_store(GameMode::Standard, 7);
        let offered: Vec<String> = store.start_selection().unwrap().iter().map(|c| c.name.clone()).collect();
        assert_eq!(offered.len(), SELECTION_OFFER_SIZE);
        let mut unique = offered.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), offered.len());
        assert_eq!(store.phase(), GamePhase::Selection);
    }

    #[test]
    fn test_select_character_logs_and_enters_battle() {
        let mut store = quiet_store(GameMode::Standard, 3);
        start(&mut store, "Knight");

        assert_eq!(store.phase(), GamePhase::Battle);
        assert_eq!(store.log().entries()[0], "You selected Knight (Epic)");
        assert!(store.log().entries()[1].starts_with("Your opponent is "));
        assert_eq!(store.log().last(), Some("New cards drawn"));
        assert_eq!(store.player().unwrap().hand.len(), 4);
        assert_eq!(store.enemy().unwrap().hand.len(), 4);
    }

    #[test]
    fn test_legendary_pick_unlocks_rare_collector() {
        let mut store = quiet_store(GameMode::Standard, 3);
        start(&mut store, "Dragon Lord");
        assert!(store.achievements().is_unlocked(achievements::RARE_COLLECTOR));
    }

    #[test]
    fn test_hands_refill_after_round() {
        let mut store = quiet_store(GameMode::Standard, 11);
        start(&mut store, "Squire");
        rig(&mut store, vec![card("Twig", 1, None)], vec![card("Twig", 1, None)]);

        let report = store.play_card(0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Ongoing);
        assert_eq!(store.player().unwrap().hand.len(), 4);
        assert_eq!(store.enemy().unwrap().hand.len(), 4);
    }

    #[test]
    fn test_mode_change_resizes_at_next_refill() {
        let mut store = quiet_store(GameMode::Standard, 11);
        start(&mut store, "Squire");
        store.set_mode(GameMode::Blitz);
        assert_eq!(store.player().unwrap().hand.len(), 4);

        store.draw_hands().unwrap();
        assert_eq!(store.player().unwrap().hand.len(), 3);
    }

    #[test]
    fn test_victory_schedules_notice_and_reset() {
        let mut store = quiet_store(GameMode::Standard, 5);
        start(&mut store, "Squire");
        store.enemy.as_mut().unwrap().hp = 1;
        store.enemy.as_mut().unwrap().defense = 0;
        rig(&mut store, vec![card("Axe", 9, None)], vec![card("Twig", 0, None)]);

        let report = store.play_card(0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Victory);
        assert_eq!(store.phase(), GamePhase::Result);
        assert_eq!(store.log().last(), Some("Victory! You have defeated your opponent."));
        assert!(store.achievements().is_unlocked(achievements::FIRST_WIN));
        assert!(store.achievements().is_unlocked(achievements::FLAWLESS));

        store.advance_time(Duration::from_millis(499));
        assert_eq!(store.phase(), GamePhase::Result);
        store.advance_time(Duration::from_millis(1));
        assert_eq!(store.phase(), GamePhase::Title);
        assert!(store.player().is_none());

        let notes = store.drain_notifications();
        assert_eq!(
            notes[0],
            Notification::BattleOutcome {
                victory: true,
                message: VICTORY_MESSAGE.to_string()
            }
        );

        store.advance_time(Duration::from_millis(500));
        let notes = store.drain_notifications();
        assert!(notes
            .iter()
            .any(|n| matches!(n, Notification::AchievementUnlocked { id: "first_win", .. })));
        assert!(store.drain_notifications().is_empty());
    }

    fn finish(store: &mut GameStore, name: &str, win: bool) {
        start(store, name);
        if win {
            store.enemy.as_mut().unwrap().hp = 1;
            rig(store, vec![card("Axe", 99, None)], vec![card("Twig", 0, None)]);
        } else {
            store.player.as_mut().unwrap().hp = 1;
            rig(store, vec![card("Twig", 0, None)], vec![card("Axe", 99, None)]);
        }
        store.play_card(0).unwrap();
        assert_eq!(store.phase(), GamePhase::Result);
        store.advance_time(Duration::from_secs(1));
    }

    #[test]
    fn test_unstoppable_needs_three_in_a_row() {
        let mut store = quiet_store(GameMode::Standard, 12);
        finish(&mut store, "Squire", true);
        finish(&mut store, "Squire", true);
        finish(&mut store, "Squire", false);
        assert_eq!(store.session().consecutive_wins, 0);
        assert_eq!(store.session().battles_lost, 1);

        finish(&mut store, "Squire", true);
        finish(&mut store, "Squire", true);
        assert!(!store.achievements().is_unlocked(achievements::UNSTOPPABLE));
        finish(&mut store, "Squire", true);
        assert!(store.achievements().is_unlocked(achievements::UNSTOPPABLE));
        assert_eq!(store.session().battles_won, 5);
    }

    #[test]
    fn test_mode_victories_unlock_once() {
        let mut store = quiet_store(GameMode::Blitz, 13);
        finish(&mut store, "Monk", true);
        assert!(store.achievements().is_unlocked(achievements::BLITZ_CHAMPION));
        assert!(!store.achievements().is_unlocked(achievements::TACTICIAN));

        store.set_mode(GameMode::Tactical);
        finish(&mut store, "Monk", true);
        assert!(store.achievements().is_unlocked(achievements::TACTICIAN));

        // Repeat unlocks queue no further notices
        store.advance_time(Duration::from_secs(5));
        store.drain_notifications();
        finish(&mut store, "Monk", true);
        store.advance_time(Duration::from_secs(5));
        let unlocked: Vec<_> = store
            .drain_notifications()
            .into_iter()
            .filter_map(|n| match n {
                Notification::AchievementUnlocked { id, .. } => Some(id),
                Notification::BattleOutcome { .. } => None,
            })
            .collect();
        assert_eq!(unlocked, vec![achievements::UNSTOPPABLE]);
    }

    #[test]
    fn test_effect_damage_breaks_flawless() {
        let mut store = quiet_store(GameMode::Standard, 5);
        start(&mut store, "Squire");
        store.enemy.as_mut().unwrap().hp = 1;
        store.enemy.as_mut().unwrap().defense = 0;
        let hp = store.player().unwrap().hp;
        rig(
            &mut store,
            vec![card("Axe", 9, None)],
            vec![card("Assassin", 0, Some(EffectKind::Poison))],
        );

        let report = store.play_card(0).unwrap();
        assert_eq!(report.outcome, RoundOutcome::Victory);
        assert_eq!(report.damage_to_player, 0);
        assert_eq!(store.player().unwrap().hp, hp - 3);
        assert!(store.achievements().is_unlocked(achievements::FIRST_WIN));
        assert!(!store.achievements().is_unlocked(achievements::FLAWLESS));
    }

    /// Let pending notices fire and count the unlock notices for `id`
    fn unlock_notices(store: &mut GameStore, id: &str) -> usize {
        store.advance_time(Duration::from_secs(5));
        store
            .drain_notifications()
            .iter()
            .filter(|n| matches!(n, Notification::AchievementUnlocked { id: got, .. } if *got == id))
            .count()
    }

    /// Play `rounds` rounds of `player_card` against a harmless card
    fn grind(store: &mut GameStore, rounds: u32, player_card: &Card) {
        store.enemy.as_mut().unwrap().hp = 10_000;
        for _ in 0..rounds {
            rig(store, vec![player_card.clone()], vec![card("Twig", 0, None)]);
            assert_eq!(store.play_card(0).unwrap().outcome, RoundOutcome::Ongoing);
        }
    }

    #[test]
    fn test_shield_master_after_three_blocks() {
        let mut store = quiet_store(GameMode::Standard, 31);
        start(&mut store, "Squire");
        let guard = card("Guard", 1, Some(EffectKind::Shield));

        grind(&mut store, achievements::SHIELD_MASTER_BLOCKS - 1, &guard);
        assert!(!store.achievements().is_unlocked(achievements::SHIELD_MASTER));

        grind(&mut store, 1, &guard);
        assert_eq!(store.counters().shield_blocks, 3);
        assert!(store.achievements().is_unlocked(achievements::SHIELD_MASTER));

        grind(&mut store, 2, &guard);
        assert_eq!(unlock_notices(&mut store, achievements::SHIELD_MASTER), 1);
    }

    #[test]
    fn test_fire_wizard_after_five_burns() {
        let mut store = quiet_store(GameMode::Standard, 32);
        start(&mut store, "Squire");
        let flame = card("Flame", 1, Some(EffectKind::Burn));

        grind(&mut store, achievements::FIRE_WIZARD_BURNS - 1, &flame);
        assert!(!store.achievements().is_unlocked(achievements::FIRE_WIZARD));

        grind(&mut store, 3, &flame);
        assert_eq!(store.counters().burn_uses, 7);
        assert!(store.achievements().is_unlocked(achievements::FIRE_WIZARD));
        assert_eq!(unlock_notices(&mut store, achievements::FIRE_WIZARD), 1);
    }

    #[test]
    fn test_ice_mage_after_five_freezes() {
        let mut store = quiet_store(GameMode::Standard, 33);
        start(&mut store, "Squire");
        let ice = card("Ice", 1, Some(EffectKind::Freeze));

        grind(&mut store, achievements::ICE_MAGE_FREEZES - 1, &ice);
        assert!(!store.achievements().is_unlocked(achievements::ICE_MAGE));

        grind(&mut store, 2, &ice);
        assert!(store.achievements().is_unlocked(achievements::ICE_MAGE));
        assert!(!store.achievements().is_unlocked(achievements::FIRE_WIZARD));
        assert_eq!(unlock_notices(&mut store, achievements::ICE_MAGE), 1);
    }

    #[test]
    fn test_card_collector_counts_distinct_names_across_battles() {
        let mut store = quiet_store(GameMode::Standard, 34);
        start(&mut store, "Squire");
        store.enemy.as_mut().unwrap().hp = 10_000;
        for i in 0..achievements::CARD_COLLECTOR_DISTINCT - 1 {
            rig(&mut store, vec![card(&format!("Card {i}"), 0, None)], vec![card("Twig", 0, None)]);
            store.play_card(0).unwrap();
        }

        // A repeated name wins the battle without adding to the collection
        store.enemy.as_mut().unwrap().hp = 1;
        rig(&mut store, vec![card("Card 0", 99, None)], vec![card("Twig", 0, None)]);
        assert_eq!(store.play_card(0).unwrap().outcome, RoundOutcome::Victory);
        assert_eq!(store.session().distinct_card_count(), 19);
        assert!(!store.achievements().is_unlocked(achievements::CARD_COLLECTOR));
        store.advance_time(Duration::from_secs(1));

        start(&mut store, "Squire");
        store.enemy.as_mut().unwrap().hp = 1;
        rig(&mut store, vec![card("Card 19", 99, None)], vec![card("Twig", 0, None)]);
        store.play_card(0).unwrap();
        assert_eq!(store.session().distinct_card_count(), 20);
        assert!(store.achievements().is_unlocked(achievements::CARD_COLLECTOR));
        assert_eq!(unlock_notices(&mut store, achievements::CARD_COLLECTOR), 1);
    }

    #[test]
    fn test_divine_offer_unlocks_lucky_draw() {
        let divine = CatalogDatabase::new(
            vec![CharacterTemplate::new("Seraph", 40, Rarity::Divine)],
            crate::loader::builtin_cards(),
        )
        .unwrap();
        let mut store = GameStore::with_catalog(GameConfig::default().with_seed(35), divine)
            .unwrap()
            .with_logger(GameLogger::capturing());

        assert_eq!(store.start_selection().unwrap()[0].name, "Seraph");
        assert!(store.achievements().is_unlocked(achievements::LUCKY_DRAW));
        store.start_selection().unwrap();
        assert_eq!(unlock_notices(&mut store, achievements::LUCKY_DRAW), 1);

        let common = CatalogDatabase::new(
            vec![CharacterTemplate::new("Peasant", 20, Rarity::Common)],
            crate::loader::builtin_cards(),
        )
        .unwrap();
        let mut store = GameStore::with_catalog(GameConfig::default().with_seed(35), common)
            .unwrap()
            .with_logger(GameLogger::capturing());
        store.start_selection().unwrap();
        assert!(!store.achievements().is_unlocked(achievements::LUCKY_DRAW));
    }

    #[test]
    fn test_stale_reset_is_ignored() {
        let mut store = quiet_store(GameMode::Standard, 5);
        start(&mut store, "Squire");
        store.enemy.as_mut().unwrap().hp = 1;
        rig(&mut store, vec![card("Axe", 20, None)], vec![card("Twig", 0, None)]);
        store.play_card(0).unwrap();

        // Player leaves and starts another battle before the reset fires
        store.back_to_title();
        start(&mut store, "Knight");
        store.advance_time(Duration::from_secs(2));

        assert_eq!(store.phase(), GamePhase::Battle);
        assert!(store.player().is_some());
    }

    #[test]
    fn test_reveal_expires() {
        let mut store = quiet_store(GameMode::Standard, 9);
        start(&mut store, "Squire");
        rig(
            &mut store,
            vec![card("Seer", 1, Some(EffectKind::RevealHand))],
            vec![card("Twig", 0, None)],
        );
        store.play_card(0).unwrap();
        assert!(store.enemy_hand_revealed());
        assert!(store.battle_view().unwrap().enemy_hand().is_some());

        store.advance_time(Duration::from_millis(4_999));
        assert!(store.enemy_hand_revealed());
        store.advance_time(Duration::from_millis(1));
        assert!(!store.enemy_hand_revealed());
    }

    #[test]
    fn test_back_to_title_keeps_session() {
        let mut store = quiet_store(GameMode::Standard, 2);
        start(&mut store, "Squire");
        rig(&mut store, vec![card("Guard", 1, Some(EffectKind::Shield))], vec![card("Twig", 1, None)]);
        store.play_card(0).unwrap();
        assert_eq!(store.counters().shield_blocks, 1);

        store.back_to_title();
        assert_eq!(store.phase(), GamePhase::Title);
        assert!(store.log().is_empty());
        assert_eq!(store.counters(), &BattleCounters::default());
        assert_eq!(store.session().distinct_card_count(), 1);
    }

    #[test]
    fn test_tutorial_battle() {
        let mut store = quiet_store(GameMode::Standard, 4);
        store.start_tutorial().unwrap();
        assert_eq!(store.phase(), GamePhase::Tutorial);
        assert_eq!(store.tutorial_step(), 1);
        assert_eq!(store.enemy().unwrap().name, "Training Dummy");
        assert_eq!(store.enemy().unwrap().hp, 20);

        store.draw_hands().unwrap();
        assert!(matches!(store.play_card(0), Err(DuelError::InvalidAction(_))));

        while store.tutorial_step() < TUTORIAL_PRACTICE_STEP {
            store.next_tutorial_step();
        }
        store.play_card(0).unwrap();
        assert_eq!(store.tutorial_step(), TUTORIAL_FINAL_STEP);
        assert_eq!(store.session().distinct_card_count(), 0);

        store.next_tutorial_step();
        assert_eq!(store.tutorial_step(), TUTORIAL_FINAL_STEP);
        assert!(store.play_card(0).is_err());
    }

    #[test]
    fn test_survival_escalation() {
        let mut store = quiet_store(GameMode::Survival, 8);
        start(&mut store, "Titan");
        assert_eq!(store.player().unwrap().hand.len(), 5);

        for _ in 0..3 {
            rig(&mut store, vec![card("Twig", 0, None)], vec![card("Twig", 0, None)]);
            store.play_card(0).unwrap();
        }
        assert_eq!(store.survival().escalation_level, 1);
        assert!(store.log().contains("The enemies grow stronger! (level 1)"));

        let hp = store.player().unwrap().hp;
        let defense = store.player().unwrap().defense;
        rig(&mut store, vec![card("Twig", 0, None)], vec![card("Club", defense, None)]);
        store.play_card(0).unwrap();
        assert_eq!(store.player().unwrap().hp, hp - 1);
    }

    #[test]
    fn test_survival_encounters_and_boss() {
        let mut store = quiet_store(GameMode::Survival, 21);
        start(&mut store, "Titan");

        for encounter in 1..=3 {
            assert_eq!(store.survival().encounter, encounter);
            store.enemy.as_mut().unwrap().hp = 1;
            rig(&mut store, vec![card("Axe", 50, None)], vec![card("Twig", 0, None)]);
            let report = store.play_card(0).unwrap();
            assert_eq!(report.outcome, RoundOutcome::Victory);
            assert_eq!(store.phase(), GamePhase::Battle);

            if encounter == 2 {
                assert!(store.survival().boss_active);
                assert!(store.enemy().unwrap().name.starts_with("Boss "));
            }
        }
        assert_eq!(store.survival().bosses_defeated, 1);
        assert!(store.achievements().is_unlocked(achievements::SURVIVOR));
        assert!(!store.achievements().is_unlocked(achievements::FIRST_WIN));
    }
}
