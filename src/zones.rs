//! Card piles (Deck, Hand, Discard)

use crate::core::Card;
use serde::{Deserialize, Serialize};

/// The piles a combatant owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
}

/// An ordered pile of cards
///
/// For the deck the top card is the last element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    /// Zone type
    pub zone_type: Zone,

    /// Cards in this zone
    pub cards: Vec<Card>,
}

impl CardZone {
    pub fn new(zone_type: Zone) -> Self {
        CardZone {
            zone_type,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(zone_type: Zone, cards: Vec<Card>) -> Self {
        CardZone { zone_type, cards }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the card at `index`, keeping the order of the rest
    pub fn remove_at(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top
    pub fn draw_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Unbiased Fisher-Yates shuffle
    pub fn shuffle(&mut self, rng: &mut (impl rand::Rng + ?Sized)) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Remove and return every card, leaving the zone empty
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }
}
