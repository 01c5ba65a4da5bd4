//! Character factory
//!
//! Turns a catalog entry into a battle-ready combatant with a freshly
//! generated, shuffled deck.

use crate::core::{Card, CharacterTemplate, Combatant};
use crate::loader::CatalogDatabase;
use crate::zones::{CardZone, Zone};
use crate::Result;
use rand::Rng;

/// Every n-th generated card is rebound to the character's signature effect
pub const SIGNATURE_INTERVAL: usize = 10;

/// Power added to every card of a survival boss
pub const BOSS_CARD_BONUS: i32 = 2;

/// Defense added to a survival boss
pub const BOSS_DEFENSE_BONUS: i32 = 2;

/// Build a combatant from a template
///
/// HP starts at the template's base HP, defense comes from rarity and the
/// hand starts empty.
pub fn create_combatant(
    template: &CharacterTemplate,
    catalog: &CatalogDatabase,
    deck_size: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Result<Combatant> {
    template.validate()?;

    let mut combatant = Combatant::new(
        template.name.clone(),
        template.base_hp,
        template.rarity.defense(),
        template.rarity,
    );
    combatant.deck = build_deck(template, catalog, deck_size, rng);
    Ok(combatant)
}

/// Build a survival boss: 1.5x HP, extra defense and empowered cards
pub fn create_boss(
    template: &CharacterTemplate,
    catalog: &CatalogDatabase,
    deck_size: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Result<Combatant> {
    template.validate()?;

    let mut boss = Combatant::new(
        format!("Boss {}", template.name),
        template.base_hp.saturating_mul(3) / 2,
        template.rarity.defense() + BOSS_DEFENSE_BONUS,
        template.rarity,
    );
    let mut deck = build_deck(template, catalog, deck_size, rng);
    for card in deck.cards.iter_mut() {
        card.power = card.power.saturating_add(BOSS_CARD_BONUS);
    }
    boss.deck = deck;
    Ok(boss)
}

/// Generate and shuffle a deck for a character
pub fn build_deck(
    template: &CharacterTemplate,
    catalog: &CatalogDatabase,
    deck_size: usize,
    rng: &mut (impl Rng + ?Sized),
) -> CardZone {
    let mut cards: Vec<Card> = Vec::with_capacity(deck_size);

    for i in 0..deck_size {
        let mut card = catalog.random_card(rng).instantiate();

        let chance = power_bonus_chance(template);
        if chance > 0.0 && rng.gen_bool(chance) {
            card.power = card.power.saturating_add(power_bonus(template));
        }

        if let Some(signature) = template.signature {
            if i % SIGNATURE_INTERVAL == SIGNATURE_INTERVAL - 1 {
                card.set_effect(signature);
            }
        }

        cards.push(card);
    }

    let mut deck = CardZone::with_cards(Zone::Deck, cards);
    deck.shuffle(rng);
    deck
}

/// Chance that a generated card gains bonus power (Rare and up)
fn power_bonus_chance(template: &CharacterTemplate) -> f64 {
    let tier = template.rarity.tier();
    if tier < 2 {
        0.0
    } else {
        0.05 * f64::from(tier)
    }
}

fn power_bonus(template: &CharacterTemplate) -> i32 {
    1 + template.rarity.tier() as i32 / 3
}
