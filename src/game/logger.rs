//! Diagnostic logger
//!
//! Separate from the player-facing [`BattleLog`](crate::game::BattleLog): this
//! logger carries engine diagnostics at a chosen verbosity and can capture
//! them in memory for tests and post-battle inspection.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;

/// Verbosity level for engine output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// No output
    Silent = 0,
    /// Battle outcomes, achievements and effect failures
    Minimal = 1,
    /// Every battle log line (default)
    #[default]
    Normal = 2,
    /// Round stages and random picks
    Verbose = 3,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Capture only, nothing printed
    Memory,
    Both,
}

/// What a tagged diagnostic line is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogTopic {
    /// Battle lifecycle (start, finish, reset)
    Battle,
    /// An ability effect failed and was rolled back
    EffectFailure,
    Achievement,
}

impl LogTopic {
    pub fn as_str(self) -> &'static str {
        match self {
            LogTopic::Battle => "battle",
            LogTopic::EffectFailure => "effect_failure",
            LogTopic::Achievement => "achievement",
        }
    }
}

impl fmt::Display for LogTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub topic: Option<LogTopic>,
    pub message: String,
}

/// Read-only borrow of the captured entries
pub struct CapturedLogs<'a> {
    entries: Ref<'a, Vec<LogEntry>>,
}

impl CapturedLogs<'_> {
    /// Entries tagged with `topic`, oldest first
    pub fn with_topic(&self, topic: LogTopic) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.topic == Some(topic))
    }

    pub fn count(&self, topic: LogTopic) -> usize {
        self.with_topic(topic).count()
    }
}

impl Deref for CapturedLogs<'_> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// Verbosity-levelled logger with optional in-memory capture
///
/// Logging takes `&self` so the logger can be shared with the round resolver
/// while the store mutates the combatants; captured entries sit behind a
/// `RefCell`.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    captured: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Logger at Normal verbosity printing to stdout
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            captured: RefCell::new(Vec::new()),
        }
    }

    /// Logger that records everything in memory and prints nothing
    pub fn capturing() -> Self {
        let mut logger = Self::new();
        logger.output_mode = OutputMode::Memory;
        logger
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn entries(&self) -> CapturedLogs<'_> {
        CapturedLogs {
            entries: self.captured.borrow(),
        }
    }

    /// Hand over the captured entries, leaving the buffer empty
    pub fn take_entries(&mut self) -> Vec<LogEntry> {
        std::mem::take(self.captured.get_mut())
    }

    /// Print every captured entry the verbosity allows, then clear the buffer
    ///
    /// Returns how many lines were printed.
    pub fn flush_buffer(&self) -> usize {
        self.flush_from(0)
    }

    /// Print only the last `tail_lines` captured entries, then clear the buffer
    ///
    /// A banner reports how many older lines were dropped.
    pub fn flush_tail(&self, tail_lines: usize) -> usize {
        let total = self.captured.borrow().len();
        let elided = total.saturating_sub(tail_lines);
        if elided > 0 {
            println!(">>> {} LOG LINES ELIDED. PRINTING LAST {} LINES <<<", elided, tail_lines);
        }
        self.flush_from(elided)
    }

    fn flush_from(&self, start: usize) -> usize {
        let entries = std::mem::take(&mut *self.captured.borrow_mut());
        let mut printed = 0;
        for entry in entries.iter().skip(start).filter(|e| e.level <= self.verbosity) {
            Self::print(entry.level, entry.topic, &entry.message);
            printed += 1;
        }
        printed
    }

    fn print(level: VerbosityLevel, topic: Option<LogTopic>, message: &str) {
        match (level, topic) {
            (VerbosityLevel::Minimal, _) => println!("{}", message),
            (VerbosityLevel::Verbose, Some(topic)) => println!("  [{}] {}", topic, message),
            _ => println!("  {}", message),
        }
    }

    fn emit(&self, level: VerbosityLevel, topic: Option<LogTopic>, message: &str) {
        // Capture ignores verbosity so tests can inspect every line
        if self.is_capturing() {
            self.captured.borrow_mut().push(LogEntry {
                level,
                topic,
                message: message.to_string(),
            });
        }
        if self.output_mode != OutputMode::Memory && level <= self.verbosity {
            Self::print(level, topic, message);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.emit(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, None, message);
    }

    /// Log at `level` tagged with `topic`
    #[inline]
    pub fn topic(&self, level: VerbosityLevel, topic: LogTopic, message: &str) {
        self.emit(level, Some(topic), message);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("captured", &self.captured.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    /// Clones settings only; captured entries stay with the original
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            captured: RefCell::new(Vec::new()),
        }
    }
}
