//! Vocabulary game client binary.
//!
//! Composition root for a headless session:
//! 1. Configuration from the environment (and `.env`)
//! 2. Game rules and content from data files, built-in defaults otherwise
//! 3. File-backed coin store and mistake log under `SAVE_DATA_DIR`
//! 4. A recording surface driven by a scripted player
//!
//! # Examples
//!
//! ```bash
//! VOCAB_MODE=directions VOCAB_SEED=7 cargo run -p vocab-client
//! ```

mod config;
mod logging;
mod player;

use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::{ConfigLoader, ContentFactory, ContentLoader};
use runtime::{
    FileCoinStore, FileMistakeLog, RecordingSurface, RuntimeConfig, Session,
};

use config::ClientConfig;
use player::AutoPlayer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting vocabulary client");
    tracing::info!("Mode selection: {:?}", config.selection);
    tracing::info!("Save data: {}", config.save_data_dir.display());

    std::fs::create_dir_all(&config.save_data_dir).with_context(|| {
        format!(
            "failed to create save directory {}",
            config.save_data_dir.display()
        )
    })?;

    // 1. Rules and content
    let factory = ContentFactory::new(&config.save_data_dir);
    let game = match &config.game_config {
        Some(path) => ConfigLoader::load(path)?,
        None => factory.load_config()?,
    };
    let content = match &config.content {
        Some(path) => ContentLoader::load(path, game.letter_choices)?,
        None => factory.load_content(&game)?,
    };

    // 2. Persistence
    let coin_store = FileCoinStore::new(&config.save_data_dir)?;
    let mistakes = Arc::new(FileMistakeLog::open(&config.save_data_dir)?);

    // 3. Session
    let session = Session::builder()
        .config(RuntimeConfig {
            game,
            selection: config.selection,
            seed: config.seed,
            ..RuntimeConfig::default()
        })
        .surface(Arc::new(RecordingSurface::new()))
        .content(Arc::new(content))
        .coin_store(Arc::new(coin_store))
        .mistakes(mistakes.clone())
        .build()?;

    let player = AutoPlayer::new(session.handle(), config.rounds, config.accuracy, config.seed);
    let player_task = tokio::spawn(player.run());

    let summary = session.run().await?;
    let stats = player_task.await.context("player task panicked")??;

    tracing::info!(
        "Session over: {:?}, {} challenges, {} coins earned, balance {}",
        summary.end,
        summary.challenges_completed,
        summary.coins_earned,
        summary.balance
    );
    tracing::info!(
        "Player answered {} ({} aimed correct), {} rewards",
        stats.answered,
        stats.correct,
        stats.rewards
    );

    mistakes.flush().await;
    match mistakes.snapshot() {
        Ok(log) => {
            for entry in log.most_common(3) {
                tracing::info!("Frequent mistake [{}] {} x{}", entry.mode, entry.mistake, entry.count);
            }
        }
        Err(e) => tracing::warn!("Failed to read mistake log: {}", e),
    }

    Ok(())
}
