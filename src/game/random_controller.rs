//! Random AI controller for testing and baseline gameplay
//!
//! Plays a uniformly random card. Serves as a baseline for the heuristic AI.

use crate::game::controller::{BattleView, PlayerController};
use rand::{Rng, RngCore};

/// A controller that makes random choices
///
/// Draws from the RNG the driver passes in, so a seeded battle stays
/// reproducible end to end.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomController;

impl RandomController {
    pub fn new() -> Self {
        RandomController
    }
}

impl PlayerController for RandomController {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_card(&mut self, view: &BattleView, rng: &mut dyn RngCore) -> usize {
        let hand_size = view.hand().len();
        if hand_size == 0 {
            return 0;
        }
        rng.gen_range(0..hand_size)
    }
}
