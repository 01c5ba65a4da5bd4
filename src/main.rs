//! Card Duel - Main Binary
//!
//! Text front end for the battle engine: play a battle, run batch
//! simulations, or list the catalogs.

use anyhow::Context;
use card_duel_rs::{
    game::{
        store::TUTORIAL_PRACTICE_STEP, GameLogger, GamePhase, GameStore, HeuristicController, InteractiveController,
        OutputMode, PlayerController, RandomController, RoundOutcome, VerbosityLevel, ZeroController,
    },
    loader::CatalogDatabase,
    simulate::{self, SimulationOptions},
    GameConfig, GameMode,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Controller type for the player's side
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always plays the first card (for testing)
    Zero,
    /// Plays a random card
    Random,
    /// Text UI controller for human play via stdin
    Tui,
    /// Heuristic AI
    Heuristic,
}

impl ControllerType {
    fn build(self) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Zero => Box::new(ZeroController::new()),
            ControllerType::Random => Box::new(RandomController::new()),
            ControllerType::Tui => Box::new(InteractiveController::new()),
            ControllerType::Heuristic => Box::new(HeuristicController::new()),
        }
    }

    fn for_simulation(self) -> anyhow::Result<simulate::ControllerType> {
        match self {
            ControllerType::Zero => Ok(simulate::ControllerType::Zero),
            ControllerType::Random => Ok(simulate::ControllerType::Random),
            ControllerType::Heuristic => Ok(simulate::ControllerType::Heuristic),
            ControllerType::Tui => anyhow::bail!("the tui controller cannot be used for simulations"),
        }
    }
}

/// Game mode argument (accepts `rounds` as an alias for survival)
#[derive(Debug, Clone, Copy)]
struct ModeArg(GameMode);

impl std::str::FromStr for ModeArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<GameMode>().map(ModeArg).map_err(|e| e.to_string())
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Card Duel - turn-based card battle engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single battle
    Play {
        /// Game mode (standard, blitz, tactical, survival)
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Set random seed for deterministic play
        #[arg(long)]
        seed: Option<u64>,

        /// Play as this character instead of choosing from the offer
        #[arg(long)]
        character: Option<String>,

        /// Run the tutorial battle
        #[arg(long, conflicts_with = "character")]
        tutorial: bool,

        /// Controller that picks the player's cards
        #[arg(long, value_enum, default_value = "tui")]
        controller: ControllerType,

        /// JSON catalog file (default: built-in catalogs)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// JSON config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Milliseconds to pause between rounds (0 = no pause)
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,

        /// Buffer diagnostics and print only the last N lines at exit
        #[arg(long, value_name = "N")]
        log_tail: Option<usize>,
    },

    /// Run many AI battles in parallel and print statistics
    Simulate {
        /// Number of battles
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Game mode (standard, blitz, tactical, survival)
        #[arg(long)]
        mode: Option<ModeArg>,

        /// Master seed; each battle derives its own
        #[arg(long)]
        seed: Option<u64>,

        /// Controller that picks the player's cards
        #[arg(long, value_enum, default_value = "heuristic")]
        controller: ControllerType,

        /// Always play as this character
        #[arg(long)]
        character: Option<String>,

        /// Rounds before a battle is called a stalemate
        #[arg(long, default_value_t = simulate::DEFAULT_MAX_ROUNDS)]
        max_rounds: u32,

        /// JSON catalog file (default: built-in catalogs)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// JSON config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List characters and cards
    Catalog {
        /// JSON catalog file (default: built-in catalogs)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            mode,
            seed,
            character,
            tutorial,
            controller,
            catalog,
            config,
            verbosity,
            pace_ms,
            log_tail,
        } => {
            let config = load_config(config.as_deref(), mode, seed)?;
            let catalog = load_catalog(catalog.as_deref())?;
            let options = PlayOptions {
                character,
                tutorial,
                controller,
                verbosity: verbosity.into(),
                pace: Duration::from_millis(pace_ms),
                log_tail,
            };
            run_play(config, catalog, options).await?;
        }
        Commands::Simulate {
            games,
            mode,
            seed,
            controller,
            character,
            max_rounds,
            catalog,
            config,
        } => {
            let config = load_config(config.as_deref(), mode, seed)?;
            let catalog = load_catalog(catalog.as_deref())?;
            let mut options = SimulationOptions::new(games, config, controller.for_simulation()?);
            options.character = character;
            options.max_rounds = max_rounds;

            println!("=== Card Duel - Simulation Mode ===\n");
            println!("Running {} battles ({:?} controller)", games, controller);
            let stats = simulate::simulate(&options, &catalog)?;
            stats.print_report();
        }
        Commands::Catalog { catalog, json } => {
            let catalog = load_catalog(catalog.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                print_catalog(&catalog);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, mode: Option<ModeArg>, seed: Option<u64>) -> anyhow::Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(ModeArg(mode)) = mode {
        config.mode = mode;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<CatalogDatabase> {
    match path {
        Some(path) => CatalogDatabase::load_from_file(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Ok(CatalogDatabase::builtin()),
    }
}

fn print_catalog(catalog: &CatalogDatabase) {
    println!("=== Characters ===");
    for c in catalog.characters() {
        let signature = c.signature.map_or("-", |s| s.ability_name());
        println!(
            "  {:<20} {:>3} HP  {:<10} defense {:>2}  signature {}",
            c.name,
            c.base_hp,
            c.rarity.as_str(),
            c.rarity.defense(),
            signature
        );
    }
    println!("\n=== Cards ===");
    for card in catalog.cards() {
        println!("  {} {:<20} power {:>2}  {}", card.emoji, card.name, card.power, card.ability);
    }
}

struct PlayOptions {
    character: Option<String>,
    tutorial: bool,
    controller: ControllerType,
    verbosity: VerbosityLevel,
    pace: Duration,
    log_tail: Option<usize>,
}

const TUTORIAL_TEXT: [(&str, &str); 8] = [
    ("Welcome to Card Duel!", "In this tutorial, you'll learn how to play the game. Follow the steps to master the basics."),
    ("Game Objective", "The goal is to reduce your opponent's health to zero by playing cards with different powers and abilities."),
    ("Your Hand", "You hold a hand of cards. After playing a card, a new one is drawn to replace it."),
    ("Card Abilities", "Each card has a power value and a special ability. Abilities can deal extra damage, shield you, or affect enemy cards."),
    ("Combat", "When you play a card, the enemy plays one too. Damage is calculated after both abilities resolve."),
    ("Defense", "Characters have defense values that reduce damage. Rarer characters have higher defense values."),
    ("Let's Practice!", "Now play a card from your hand against the training dummy."),
    ("Well Done!", "You've completed the basic tutorial. Now you're ready to start a real battle!"),
];

fn print_tutorial_step(step: u32) {
    let index = (step as usize).saturating_sub(1);
    if let Some((title, content)) = TUTORIAL_TEXT.get(index) {
        println!("\n--- {} ---\n{}", title, content);
    }
}

async fn run_play(config: GameConfig, catalog: CatalogDatabase, options: PlayOptions) -> anyhow::Result<()> {
    println!("=== Card Duel - {} ===\n", config.mode.display_name());
    if let Some(seed) = config.seed {
        println!("Using seed: {seed}");
    }

    let mut logger = GameLogger::with_verbosity(options.verbosity);
    if options.log_tail.is_some() {
        logger.set_output_mode(OutputMode::Memory);
    }
    let mut store = GameStore::with_catalog(config, catalog)?.with_logger(logger);
    let mut controller = options.controller.build();

    if options.tutorial {
        store.start_tutorial()?;
        while store.tutorial_step() < TUTORIAL_PRACTICE_STEP {
            print_tutorial_step(store.tutorial_step());
            store.next_tutorial_step();
        }
        print_tutorial_step(store.tutorial_step());
    } else if let Some(name) = options.character.as_deref() {
        let template = store
            .catalog()
            .get_character(name)
            .cloned()
            .with_context(|| format!("unknown character '{name}'"))?;
        store.select_character(&template)?;
    } else {
        let offered = store.start_selection()?.to_vec();
        println!("Choose your character:");
        for (i, c) in offered.iter().enumerate() {
            println!("  [{}] {} ({}, {} HP, defense {})", i, c.name, c.rarity, c.base_hp, c.rarity.defense());
        }
        let choice = match options.controller {
            ControllerType::Tui => prompt_index(offered.len())?,
            _ => 0,
        };
        store.select_offered(choice)?;
    }
    store.draw_hands()?;

    let mut won = false;
    while store.is_battle_active() {
        let report = store.play_with(controller.as_mut())?;
        won = report.outcome == RoundOutcome::Victory;
        if let (Some(player), Some(enemy)) = (store.player(), store.enemy()) {
            println!(">> You: {} HP | {}: {} HP", player.hp, enemy.name, enemy.hp);
        }
        if store.phase() == GamePhase::Tutorial {
            print_tutorial_step(store.tutorial_step());
            break;
        }
        pace(&mut store, options.pace).await;
    }

    if store.phase() == GamePhase::Result {
        if let Some(view) = store.battle_view() {
            controller.on_battle_end(&view, won);
        }
    }

    // Drain the scheduler so every pending notice and the reset fire
    while let Some(wait) = store.next_event_in() {
        if !options.pace.is_zero() {
            tokio::time::sleep(wait).await;
        }
        store.advance_time(wait);
        print_notifications(&mut store);
    }

    if let Some(tail) = options.log_tail {
        store.logger().flush_tail(tail);
    }

    let session = store.session();
    println!(
        "\nSession: {} won, {} lost | {} achievements unlocked",
        session.battles_won,
        session.battles_lost,
        store.achievements().unlocked_count()
    );
    Ok(())
}

/// Let logical time follow wall-clock time between rounds
async fn pace(store: &mut GameStore, step: Duration) {
    if !step.is_zero() {
        tokio::time::sleep(step).await;
    }
    store.advance_time(step);
    print_notifications(store);
}

fn print_notifications(store: &mut GameStore) {
    for note in store.drain_notifications() {
        println!("*** {} ***", note);
    }
}

fn prompt_index(count: usize) -> anyhow::Result<usize> {
    let stdin = io::stdin();
    loop {
        print!("Select 0-{}: ", count.saturating_sub(1));
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(0);
        }
        match line.trim().parse::<usize>() {
            Ok(choice) if choice < count => return Ok(choice),
            _ => eprintln!("Invalid choice."),
        }
    }
}
