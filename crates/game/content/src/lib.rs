//! Data-driven content definitions and loaders.
//!
//! This crate houses the shipped vocabulary tables and provides loaders for
//! RON/TOML data files:
//! - Word/emoji pairs with hand-picked distractors
//! - The Swedish alphabet used by letter challenges
//! - Content catalogs (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Content is consumed by the runtime through [`game_core::ContentSource`].

pub mod tables;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use tables::{SWEDISH_ALPHABET, StaticContent, letter_table, word_emoji_table};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentCatalog, ContentFactory, ContentLoader};
