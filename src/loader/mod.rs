//! Catalog loaders
//!
//! Built-in character and card pools, plus JSON catalogs supplied at runtime

pub mod catalog;

pub use catalog::{builtin_cards, builtin_characters, CatalogDatabase};
