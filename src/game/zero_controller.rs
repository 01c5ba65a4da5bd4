//! Zero controller for testing and automation
//!
//! Always plays the first card in hand. Useful for benchmarks and for
//! battles that must complete deterministically without input.

use crate::game::controller::{BattleView, PlayerController};
use rand::RngCore;

/// A controller that always chooses index 0
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroController;

impl ZeroController {
    pub fn new() -> Self {
        ZeroController
    }
}

impl PlayerController for ZeroController {
    fn name(&self) -> &str {
        "zero"
    }

    fn choose_card(&mut self, _view: &BattleView, _rng: &mut dyn RngCore) -> usize {
        0
    }
}
