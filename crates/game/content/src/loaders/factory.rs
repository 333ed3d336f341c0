//! Content factory for building content sources from data files.

use std::path::{Path, PathBuf};

use game_core::GameConfig;

use crate::loaders::{ConfigLoader, ContentLoader, LoadResult};
use crate::tables::StaticContent;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── content.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the vocabulary catalog from `content.ron`, or the built-in tables when absent.
    pub fn load_content(&self, config: &GameConfig) -> LoadResult<StaticContent> {
        let path = self.data_dir.join("content.ron");
        if !path.exists() {
            return Ok(StaticContent::builtin());
        }
        ContentLoader::load(&path, config.letter_choices)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{ChallengeKind, ContentSource};

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn empty_dir_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        let config = factory.load_config().unwrap();
        let content = factory.load_content(&config).unwrap();

        assert_eq!(config, GameConfig::default());
        assert_eq!(content.list_challenges(ChallengeKind::WordEmoji).len(), 20);
    }

    #[test]
    fn reads_config_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "required_correct = 3\n").unwrap();

        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config.required_correct, 3);
    }
}
