//! Battle engine: selection, decks, effects, rounds and the game store

/// Log a formatted diagnostic line at Verbose level.
///
/// When the verbose-logging feature is disabled, this becomes a no-op at
/// compile time and the format! allocation disappears with it.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod achievements;
pub mod battle_log;
pub mod controller;
pub mod effects;
pub mod factory;
pub mod hand;
pub mod heuristic_controller;
pub mod interactive_controller;
pub mod logger;
pub mod random_controller;
pub mod round;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod store;
pub mod zero_controller;

pub use achievements::{Achievement, AchievementTracker};
pub use battle_log::BattleLog;
pub use controller::{BattleView, PlayerController};
pub use heuristic_controller::HeuristicController;
pub use interactive_controller::InteractiveController;
pub use logger::{CapturedLogs, GameLogger, LogEntry, LogTopic, OutputMode, VerbosityLevel};
pub use random_controller::RandomController;
pub use round::{EffectResolution, RoundOutcome, RoundReport, RoundResolver, RoundStage};
pub use scheduler::{Notification, ScheduledEvent, Scheduler};
pub use selector::{weighted_select, weighted_select_indices};
pub use session::{BattleCounters, SessionProgress};
pub use store::{GamePhase, GameStore, SurvivalRun};
pub use zero_controller::ZeroController;
