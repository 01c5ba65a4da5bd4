//! Core game types and entities

pub mod card;
pub mod character;
pub mod effects;
pub mod rarity;

pub use card::{Card, CardTemplate, EffectId};
pub use character::{CharacterTemplate, Combatant, Vitals};
pub use effects::EffectKind;
pub use rarity::Rarity;
