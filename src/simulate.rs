//! Batch simulation of AI-driven battles
//!
//! Runs many independent battles in parallel with rayon, each with its own
//! store and a seed derived from the master seed, then aggregates the
//! outcomes.

use crate::config::{GameConfig, GameMode};
use crate::game::{
    GameLogger, GamePhase, GameStore, HeuristicController, PlayerController, RandomController, RoundOutcome,
    VerbosityLevel, ZeroController,
};
use crate::loader::CatalogDatabase;
use crate::{DuelError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Rounds after which an unfinished battle counts as a stalemate
pub const DEFAULT_MAX_ROUNDS: u32 = 500;

/// Controller type for simulated players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerType {
    Zero,
    Random,
    Heuristic,
}

impl ControllerType {
    pub fn build(self) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Zero => Box::new(ZeroController::new()),
            ControllerType::Random => Box::new(RandomController::new()),
            ControllerType::Heuristic => Box::new(HeuristicController::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub games: usize,
    pub config: GameConfig,
    pub controller: ControllerType,
    /// Play as this character; otherwise the first offered character
    pub character: Option<String>,
    pub max_rounds: u32,
}

impl SimulationOptions {
    pub fn new(games: usize, config: GameConfig, controller: ControllerType) -> Self {
        SimulationOptions {
            games,
            config,
            controller,
            character: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Outcome of one simulated battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleSummary {
    pub seed: u64,
    pub character: String,
    pub opponent: String,
    /// `None` when the round cap was hit
    pub victory: Option<bool>,
    pub rounds: u32,
    pub encounters_cleared: u32,
    pub achievements: Vec<&'static str>,
}

/// Seed for game `index` of a batch
pub fn game_seed(master: u64, index: usize) -> u64 {
    master.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one battle to completion with `controller` choosing the player's cards
pub fn run_battle(
    config: GameConfig,
    catalog: CatalogDatabase,
    controller: &mut dyn PlayerController,
    character: Option<&str>,
    max_rounds: u32,
) -> Result<BattleSummary> {
    let seed = config.seed.unwrap_or_default();
    let mut store = GameStore::with_catalog(config, catalog)?
        .with_logger(GameLogger::with_verbosity(VerbosityLevel::Silent));

    match character {
        Some(name) => {
            let template = store
                .catalog()
                .get_character(name)
                .cloned()
                .ok_or_else(|| DuelError::InvalidCharacter(format!("unknown character '{name}'")))?;
            store.select_character(&template)?;
        }
        None => {
            store.start_selection()?;
            store.select_offered(0)?;
        }
    }
    store.draw_hands()?;

    let character = store.player().map(|p| p.name.clone()).unwrap_or_default();
    let opponent = store.enemy().map(|e| e.name.clone()).unwrap_or_default();

    let mut rounds = 0;
    let mut victory = None;
    while rounds < max_rounds {
        let report = store.play_with(controller)?;
        rounds += 1;
        if store.phase() == GamePhase::Result {
            victory = Some(report.outcome == RoundOutcome::Victory);
            break;
        }
    }

    if let (Some(won), Some(view)) = (victory, store.battle_view()) {
        controller.on_battle_end(&view, won);
    }
    let encounters_cleared = store.survival().encounters_cleared;

    // Let pending notices land so the summary sees every unlock
    store.advance_time(Duration::from_secs(60));
    let achievements = store
        .achievements()
        .all()
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| a.id)
        .collect();

    Ok(BattleSummary {
        seed,
        character,
        opponent,
        victory,
        rounds,
        encounters_cleared,
        achievements,
    })
}

/// Aggregated results of a batch
#[derive(Debug, Default, Clone)]
pub struct SimulationStats {
    pub mode: GameMode,
    pub games: usize,
    pub victories: usize,
    pub defeats: usize,
    pub stalemates: usize,
    pub failures: usize,
    pub total_rounds: u64,
    pub total_encounters_cleared: u64,
    /// Character name -> (victories, games)
    pub by_character: FxHashMap<String, (usize, usize)>,
    /// Achievement id -> games in which it was unlocked
    pub achievement_counts: FxHashMap<&'static str, usize>,
    pub elapsed: Duration,
}

impl SimulationStats {
    fn add(&mut self, summary: &BattleSummary) {
        self.games += 1;
        self.total_rounds += u64::from(summary.rounds);
        self.total_encounters_cleared += u64::from(summary.encounters_cleared);
        let entry = self.by_character.entry(summary.character.clone()).or_insert((0, 0));
        entry.1 += 1;
        match summary.victory {
            Some(true) => {
                self.victories += 1;
                entry.0 += 1;
            }
            Some(false) => self.defeats += 1,
            None => self.stalemates += 1,
        }
        for id in &summary.achievements {
            *self.achievement_counts.entry(*id).or_insert(0) += 1;
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.victories as f64 / self.games as f64
        }
    }

    pub fn average_rounds(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_rounds as f64 / self.games as f64
        }
    }

    pub fn print_report(&self) {
        println!("\n=== Simulation Complete ===");
        println!("Mode: {}", self.mode.display_name());
        println!("Battles played: {}", self.games);
        if self.failures > 0 {
            println!("Battles failed: {}", self.failures);
        }
        println!("Elapsed time: {:.2}s", self.elapsed.as_secs_f64());
        if self.elapsed.as_secs_f64() > 0.0 {
            println!("Battles per second: {:.2}", self.games as f64 / self.elapsed.as_secs_f64());
        }

        println!("\n=== Outcomes ===");
        let pct = |n: usize| {
            if self.games == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.games as f64
            }
        };
        println!("Victories: {} ({:.1}%)", self.victories, pct(self.victories));
        println!("Defeats: {} ({:.1}%)", self.defeats, pct(self.defeats));
        if self.stalemates > 0 {
            println!("Stalemates: {} ({:.1}%)", self.stalemates, pct(self.stalemates));
        }
        println!("Average rounds: {:.1}", self.average_rounds());
        if self.mode == GameMode::Survival && self.games > 0 {
            println!(
                "Average encounters cleared: {:.2}",
                self.total_encounters_cleared as f64 / self.games as f64
            );
        }

        println!("\n=== Character Win Rates ===");
        let mut characters: Vec<_> = self.by_character.iter().collect();
        characters.sort_by(|a, b| a.0.cmp(b.0));
        for (name, (wins, games)) in characters {
            println!(
                "  {}: {}/{} ({:.1}%)",
                name,
                wins,
                games,
                100.0 * *wins as f64 / *games as f64
            );
        }

        if !self.achievement_counts.is_empty() {
            println!("\n=== Achievements ===");
            let mut unlocked: Vec<_> = self.achievement_counts.iter().collect();
            unlocked.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (id, count) in unlocked {
                println!("  {}: {}", id, count);
            }
        }
    }
}

/// Run `options.games` battles in parallel and aggregate the results
pub fn simulate(options: &SimulationOptions, catalog: &CatalogDatabase) -> Result<SimulationStats> {
    if options.games == 0 {
        return Err(DuelError::InvalidArgument("games must be positive".to_string()));
    }
    options.config.validate()?;

    let master_seed = options.config.seed.unwrap_or(42);
    let start = Instant::now();

    let results: Vec<Result<BattleSummary>> = (0..options.games)
        .into_par_iter()
        .map(|index| {
            let config = options.config.clone().with_seed(game_seed(master_seed, index));
            let mut controller = options.controller.build();
            run_battle(
                config,
                catalog.clone(),
                controller.as_mut(),
                options.character.as_deref(),
                options.max_rounds,
            )
        })
        .collect();

    let mut stats = SimulationStats {
        mode: options.config.mode,
        ..SimulationStats::default()
    };
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(summary) => stats.add(summary),
            Err(e) => {
                eprintln!("Warning: battle {} failed: {}", index, e);
                stats.failures += 1;
            }
        }
    }
    stats.elapsed = start.elapsed();
    Ok(stats)
}
