//! Interactive controller for human players
//!
//! Prints the hand and reads a card index from a line-based input (stdin by
//! default). A few informational commands are accepted at the prompt.

use crate::core::Card;
use crate::game::controller::{BattleView, PlayerController};
use rand::RngCore;
use std::io::{self, BufRead, Write};

/// A controller that prompts a human for each card
pub struct InteractiveController {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl InteractiveController {
    /// Prompt on stdout, read from stdin
    pub fn new() -> Self {
        Self::with_io(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    /// Use custom streams (scripted input in tests)
    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        InteractiveController { input, output }
    }

    fn describe(card: &Card, view: &BattleView) -> String {
        let power = view.effective_power(card);
        if power == card.power {
            format!("{} {} [power {}] {}", card.emoji, card.name, card.power, card.ability)
        } else {
            format!(
                "{} {} [power {} -> {}] {}",
                card.emoji, card.name, card.power, power, card.ability
            )
        }
    }

    fn display_hand(&mut self, view: &BattleView) -> io::Result<()> {
        writeln!(self.output, "\n=== Your hand ===")?;
        for (idx, card) in view.hand().iter().enumerate() {
            writeln!(self.output, "  [{}] {}", idx, Self::describe(card, view))?;
        }
        Ok(())
    }

    fn display_status(&mut self, view: &BattleView) -> io::Result<()> {
        writeln!(
            self.output,
            "You: {} HP, {} defense | {}: {} HP, {} defense | {}",
            view.player_hp(),
            view.player_defense(),
            view.enemy_name(),
            view.enemy_hp(),
            view.enemy_defense(),
            view.mode().display_name()
        )
    }

    fn display_enemy_hand(&mut self, view: &BattleView) -> io::Result<()> {
        match view.enemy_hand() {
            Some(cards) => {
                writeln!(self.output, "\n=== Enemy hand (revealed) ===")?;
                for card in cards {
                    writeln!(self.output, "  {}", Self::describe(card, view))?;
                }
            }
            None => writeln!(self.output, "The enemy hand is hidden.")?,
        }
        Ok(())
    }

    fn display_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Help ===")?;
        writeln!(self.output, "  <n> - Play card n")?;
        writeln!(self.output, "  s   - Show HP and defense")?;
        writeln!(self.output, "  e   - Show the enemy hand (while revealed)")?;
        writeln!(self.output, "  ?   - Show this help menu")?;
        writeln!(self.output, "  Press Enter alone to play card 0")
    }

    /// Prompt until a valid index is entered; `None` on end of input
    fn prompt(&mut self, view: &BattleView) -> io::Result<Option<usize>> {
        let hand_size = view.hand().len();
        self.display_hand(view)?;
        loop {
            write!(self.output, "Choose a card (0-{}, ? for help): ", hand_size.saturating_sub(1))?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            match line.trim() {
                "" => return Ok(Some(0)),
                "?" => self.display_help()?,
                "s" => self.display_status(view)?,
                "e" => self.display_enemy_hand(view)?,
                other => match other.parse::<usize>() {
                    Ok(choice) if choice < hand_size => return Ok(Some(choice)),
                    _ => writeln!(self.output, "Invalid choice. Enter 0-{}.", hand_size.saturating_sub(1))?,
                },
            }
        }
    }
}

impl Default for InteractiveController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for InteractiveController {
    fn name(&self) -> &str {
        "interactive"
    }

    fn choose_card(&mut self, view: &BattleView, _rng: &mut dyn RngCore) -> usize {
        match self.prompt(view) {
            Ok(Some(choice)) => choice,
            Ok(None) => 0,
            Err(err) => {
                eprintln!("Error reading input: {err}");
                0
            }
        }
    }

    fn on_battle_end(&mut self, view: &BattleView, won: bool) {
        let verdict = if won { "You win" } else { "You lose" };
        let _ = writeln!(self.output, "{} with {} HP left.", verdict, view.player_hp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameMode;
    use crate::core::{CardTemplate, Combatant, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn scripted(input: &str) -> InteractiveController {
        InteractiveController::with_io(Box::new(io::Cursor::new(input.to_string().into_bytes())), Box::new(io::sink()))
    }

    fn choose(input: &str) -> usize {
        let mut player = Combatant::new("Hero", 30, 0, Rarity::Common);
        for power in [1, 2, 3] {
            player.hand.add(CardTemplate::new("C", "*", power, None).instantiate());
        }
        let enemy = Combatant::new("Foe", 30, 0, Rarity::Common);
        let view = BattleView::new(&player, &enemy, GameMode::Tactical, false);
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        scripted(input).choose_card(&view, &mut rng)
    }

    #[test]
    fn test_reads_index() {
        assert_eq!(choose("2\n"), 2);
    }

    #[test]
    fn test_reprompts_on_invalid_and_commands() {
        assert_eq!(choose("9\nfoo\n?\ns\ne\n1\n"), 1);
    }

    #[test]
    fn test_empty_line_and_eof_default_to_zero() {
        assert_eq!(choose("\n"), 0);
        assert_eq!(choose(""), 0);
    }
}
