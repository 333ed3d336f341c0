//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`GameConfig::default`].
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.reward_min > config.reward_max {
            anyhow::bail!(
                "reward_min ({}) exceeds reward_max ({})",
                config.reward_min,
                config.reward_max
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("required_correct = 4\n").unwrap();
        assert_eq!(config.required_correct, 4);
        assert_eq!(config.letter_choices, GameConfig::DEFAULT_LETTER_CHOICES);
        assert_eq!(config.booster_cap, GameConfig::DEFAULT_BOOSTER_CAP);
    }

    #[test]
    fn inverted_reward_range_is_rejected() {
        let err = ConfigLoader::parse("reward_min = 5\nreward_max = 2\n").unwrap_err();
        assert!(err.to_string().contains("reward_min"));
    }
}
