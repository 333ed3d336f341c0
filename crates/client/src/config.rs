//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use game_core::{ModeKind, ModeSelection};

/// Configuration required to bootstrap a headless session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub selection: ModeSelection,
    pub seed: Option<u64>,
    /// Challenges the auto-player answers before asking to exit.
    pub rounds: u64,
    /// Probability of picking the correct option.
    pub accuracy: f64,
    pub save_data_dir: PathBuf,
    /// RON content catalog overriding `save_data_dir/content.ron`.
    pub content: Option<PathBuf>,
    /// TOML game rules overriding `save_data_dir/config.toml`.
    pub game_config: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            selection: ModeSelection::Alternate,
            seed: None,
            rounds: 5,
            accuracy: 0.8,
            save_data_dir: default_data_dir(),
            content: None,
            game_config: None,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `VOCAB_MODE` - `alternate` (default) or a mode name such as `letters`, `words`, `directions`
    /// - `VOCAB_SEED` - Fixed RNG seed (default: entropy)
    /// - `VOCAB_ROUNDS` - Challenges to answer before exiting (default: 5)
    /// - `VOCAB_ACCURACY` - Auto-player accuracy in `0.0..=1.0` (default: 0.8)
    /// - `SAVE_DATA_DIR` - Directory for coins, mistakes and data files (default: platform-specific)
    /// - `VOCAB_CONTENT` - Path to a RON content catalog
    /// - `VOCAB_GAME_CONFIG` - Path to a TOML rules file
    /// - `VOCAB_LOG_DIR` - Also write logs to `client.log` in this directory
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = env::var("VOCAB_MODE") {
            match parse_selection(&mode) {
                Some(selection) => config.selection = selection,
                None => eprintln!("ignoring unknown VOCAB_MODE {mode:?}"),
            }
        }

        config.seed = read_env::<u64>("VOCAB_SEED");

        if let Some(rounds) = read_env::<u64>("VOCAB_ROUNDS") {
            config.rounds = rounds.max(1);
        }

        if let Ok(value) = env::var("VOCAB_ACCURACY") {
            match parse_accuracy(&value) {
                Some(accuracy) => config.accuracy = accuracy,
                None => eprintln!("ignoring invalid VOCAB_ACCURACY {value:?}"),
            }
        }

        if let Some(dir) = env::var_os("SAVE_DATA_DIR") {
            config.save_data_dir = PathBuf::from(dir);
        }

        config.content = env::var_os("VOCAB_CONTENT").map(PathBuf::from);
        config.game_config = env::var_os("VOCAB_GAME_CONFIG").map(PathBuf::from);
        config.log_dir = env::var_os("VOCAB_LOG_DIR").map(PathBuf::from);

        config
    }
}

fn parse_selection(value: &str) -> Option<ModeSelection> {
    if value.eq_ignore_ascii_case("alternate") {
        return Some(ModeSelection::Alternate);
    }
    value.parse::<ModeKind>().ok().map(ModeSelection::Pinned)
}

/// A finite probability, clamped into `0.0..=1.0`.
fn parse_accuracy(value: &str) -> Option<f64> {
    let accuracy = value.trim().parse::<f64>().ok()?;
    accuracy.is_finite().then(|| accuracy.clamp(0.0, 1.0))
}

/// Platform data directory, `./save_data` when none can be determined.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "vocab")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_aliases() {
        assert_eq!(parse_selection("alternate"), Some(ModeSelection::Alternate));
        assert_eq!(
            parse_selection("directions"),
            Some(ModeSelection::Pinned(ModeKind::LeftRightDirections))
        );
        assert_eq!(
            parse_selection("LetterListeningMode"),
            Some(ModeSelection::Pinned(ModeKind::LetterListening))
        );
        assert_eq!(parse_selection("chess"), None);
    }

    #[test]
    fn accuracy_must_be_a_finite_number() {
        assert_eq!(parse_accuracy("0.25"), Some(0.25));
        assert_eq!(parse_accuracy("1.5"), Some(1.0));
        assert_eq!(parse_accuracy("-3"), Some(0.0));
        assert_eq!(parse_accuracy("NaN"), None);
        assert_eq!(parse_accuracy("inf"), None);
        assert_eq!(parse_accuracy("-infinity"), None);
        assert_eq!(parse_accuracy("most"), None);
    }
}
