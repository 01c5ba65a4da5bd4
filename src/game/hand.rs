//! Deck and hand management
//!
//! Cards cycle deck -> hand -> discard pile -> (reshuffle) -> deck. The
//! economy is closed: a played card is never returned straight to the deck.

use crate::core::{Card, Combatant};
use crate::loader::CatalogDatabase;
use rand::Rng;

/// Where a drawn card came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    /// Top of the deck
    Deck,
    /// Deck was empty; discard pile was shuffled back in first
    Reshuffled,
    /// Deck and discard were both empty; a fresh card was generated
    Synthesized,
}

/// Draw the top card of a combatant's deck
///
/// Never fails: an empty deck is refilled from the discard pile, and if
/// that is empty too a fresh random catalog card stands in.
pub fn draw_card(
    combatant: &mut Combatant,
    catalog: &CatalogDatabase,
    rng: &mut (impl Rng + ?Sized),
) -> (Card, DrawSource) {
    if let Some(card) = combatant.deck.draw_top() {
        return (card, DrawSource::Deck);
    }

    if !combatant.discard_pile.is_empty() {
        let recycled = combatant.discard_pile.take_all();
        combatant.deck.cards.extend(recycled);
        combatant.deck.shuffle(rng);
        if let Some(card) = combatant.deck.draw_top() {
            return (card, DrawSource::Reshuffled);
        }
    }

    (catalog.random_card(rng).instantiate(), DrawSource::Synthesized)
}

/// Draw until the hand holds exactly `target_size` cards
///
/// A hand larger than the target (after switching to a mode with a smaller
/// hand) sheds its newest cards to the discard pile. Returns the sources of
/// the cards drawn.
pub fn refill_hand(
    combatant: &mut Combatant,
    target_size: usize,
    catalog: &CatalogDatabase,
    rng: &mut (impl Rng + ?Sized),
) -> Vec<DrawSource> {
    while combatant.hand.len() > target_size {
        if let Some(card) = combatant.hand.cards.pop() {
            combatant.discard_pile.add(card);
        }
    }

    let mut sources = Vec::new();
    while combatant.hand.len() < target_size {
        let (card, source) = draw_card(combatant, catalog, rng);
        combatant.hand.add(card);
        sources.push(source);
    }
    sources
}

/// Move a played card to its owner's discard pile
pub fn discard(combatant: &mut Combatant, card: Card) {
    combatant.discard_pile.add(card);
}
