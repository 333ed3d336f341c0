//! Vocabulary catalog loader.

use std::path::Path;

use game_core::{ChallengeKind, ContentEntry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::tables::{StaticContent, letter_table};

/// Catalog structure for RON files.
///
/// ```ron
/// (
///     words: [
///         (id: 1, prompt: "KATT", correct: "🐱", distractors: ["🚗", "🍎", "☀️", "📖"]),
///     ],
///     letters: ["A", "B", "C"],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCatalog {
    pub words: Vec<ContentEntry>,
    pub letters: Vec<String>,
}

impl ContentCatalog {
    /// Checks the invariants generators rely on.
    pub fn validate(&self, letter_choices: usize) -> LoadResult<()> {
        if self.words.is_empty() {
            anyhow::bail!("content table for {} is empty", ChallengeKind::WordEmoji);
        }
        if self.letters.len() < letter_choices.max(2) {
            anyhow::bail!(
                "content table for {} needs at least {} rows, found {}",
                ChallengeKind::Letter,
                letter_choices.max(2),
                self.letters.len()
            );
        }

        for entry in &self.words {
            if entry.distractors.is_empty() {
                anyhow::bail!("word {} ({}) has no distractors", entry.prompt, entry.id);
            }
            if entry.distractors.contains(&entry.correct) {
                anyhow::bail!(
                    "word {} ({}) lists its answer as a distractor",
                    entry.prompt,
                    entry.id
                );
            }
        }

        Ok(())
    }

    pub fn into_content(self) -> StaticContent {
        StaticContent::new(self.words, letter_table(self.letters.iter().map(String::as_str)))
    }
}

/// Loader for vocabulary catalogs from RON files.
pub struct ContentLoader;

impl ContentLoader {
    /// Load and validate a catalog from a RON file.
    pub fn load(path: &Path, letter_choices: usize) -> LoadResult<StaticContent> {
        let content = read_file(path)?;
        Self::parse(&content, letter_choices)
    }

    pub fn parse(content: &str, letter_choices: usize) -> LoadResult<StaticContent> {
        let catalog: ContentCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content catalog RON: {}", e))?;
        catalog.validate(letter_choices)?;

        Ok(catalog.into_content())
    }
}
