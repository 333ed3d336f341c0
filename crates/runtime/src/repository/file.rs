//! File-backed repositories.
//!
//! Both stores write JSON to a temporary sibling file and rename it over the
//! target, so a crash mid-write leaves the previous contents intact.
//!
//! The mistake log never writes on the caller's task: records update the
//! in-memory log and hand a snapshot to a writer task, which saves the latest
//! one on the blocking pool.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use game_core::ModeKind;

use super::error::{RepositoryError, Result};
use super::mistakes::MistakeLog;
use super::traits::{CoinStore, WrongAnswerSink};

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| RepositoryError::Json(e.to_string()))?;

    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(path)?;
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| RepositoryError::CorruptedData(format!("{}: {}", path.display(), e)))?;
    Ok(Some(value))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CoinRecord {
    coins: u64,
}

/// Coin balance stored as `coins.json` in a save directory.
pub struct FileCoinStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileCoinStore {
    pub const FILE_NAME: &'static str = "coins.json";

    /// Opens (and creates, if needed) the save directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join(Self::FILE_NAME),
            lock: RwLock::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CoinRecord> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn store(&self, record: &CoinRecord) -> Result<()> {
        write_json_atomic(&self.path, record)?;
        tracing::debug!(
            target: "runtime::repository",
            coins = record.coins,
            path = %self.path.display(),
            "saved coin balance"
        );
        Ok(())
    }
}

impl CoinStore for FileCoinStore {
    fn balance(&self) -> Result<u64> {
        let _guard = self.lock.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(self.load()?.coins)
    }

    fn add_coins(&self, amount: u64) -> Result<u64> {
        let _guard = self.lock.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let mut record = self.load()?;
        record.coins = record.coins.saturating_add(amount);
        self.store(&record)?;
        Ok(record.coins)
    }

    fn deduct_coins(&self, amount: u64) -> Result<Option<u64>> {
        let _guard = self.lock.write().map_err(|_| RepositoryError::LockPoisoned)?;
        let mut record = self.load()?;
        let Some(remaining) = record.coins.checked_sub(amount) else {
            return Ok(None);
        };
        record.coins = remaining;
        self.store(&record)?;
        Ok(Some(remaining))
    }
}

/// Commands for the mistake log writer task.
enum WriteCommand {
    Save(MistakeLog),
    /// Replies once every earlier save is on disk.
    Flush { reply: oneshot::Sender<()> },
}

/// Mistake log persisted as `wrong_answers.json`.
///
/// The log is loaded once on open. Records update it in memory and queue a
/// save; write failures are logged and otherwise ignored.
pub struct FileMistakeLog {
    path: PathBuf,
    log: RwLock<MistakeLog>,
    writer: mpsc::UnboundedSender<WriteCommand>,
}

impl FileMistakeLog {
    pub const FILE_NAME: &'static str = "wrong_answers.json";

    /// Loads the log and starts its writer task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RepositoryError::NoRuntime)?;

        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(Self::FILE_NAME);
        let log = read_json(&path)?.unwrap_or_default();

        let (writer, commands) = mpsc::unbounded_channel();
        runtime.spawn(run_writer(path.clone(), commands));

        Ok(Self {
            path,
            log: RwLock::new(log),
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Result<MistakeLog> {
        let log = self.log.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(log.clone())
    }

    /// Clears all counts and queues the empty log for saving.
    pub fn reset(&self) -> Result<()> {
        let mut log = self.log.write().map_err(|_| RepositoryError::LockPoisoned)?;
        log.reset();
        self.queue_save(log.clone());
        Ok(())
    }

    /// Waits until every change made so far has been written.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.writer.send(WriteCommand::Flush { reply }).is_ok() {
            let _ = done.await;
        }
    }

    fn queue_save(&self, log: MistakeLog) {
        if self.writer.send(WriteCommand::Save(log)).is_err() {
            tracing::warn!(
                target: "runtime::repository",
                path = %self.path.display(),
                "mistake log writer stopped; change not persisted"
            );
        }
    }
}

impl WrongAnswerSink for FileMistakeLog {
    fn record(&self, mode: ModeKind, correct: &str, selected: &str) {
        let Ok(mut log) = self.log.write() else {
            tracing::warn!(target: "runtime::repository", "mistake log lock poisoned");
            return;
        };

        let count = log.record(mode, correct, selected);
        self.queue_save(log.clone());

        tracing::debug!(
            target: "runtime::repository",
            mode = mode.name(),
            key = %MistakeLog::mistake_key(mode, correct, selected),
            count,
            "mistake recorded"
        );
    }
}

/// Saves queued snapshots until the log is dropped. Snapshots queued behind
/// each other are collapsed into the newest one.
async fn run_writer(path: PathBuf, mut commands: mpsc::UnboundedReceiver<WriteCommand>) {
    while let Some(command) = commands.recv().await {
        let mut latest = None;
        let mut replies = Vec::new();
        match command {
            WriteCommand::Save(log) => latest = Some(log),
            WriteCommand::Flush { reply } => replies.push(reply),
        }
        while let Ok(command) = commands.try_recv() {
            match command {
                WriteCommand::Save(log) => latest = Some(log),
                WriteCommand::Flush { reply } => replies.push(reply),
            }
        }

        if let Some(log) = latest {
            save_mistakes(&path, log).await;
        }
        for reply in replies {
            let _ = reply.send(());
        }
    }
    tracing::trace!(target: "runtime::repository", path = %path.display(), "mistake writer stopped");
}

async fn save_mistakes(path: &Path, log: MistakeLog) {
    let target = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || write_json_atomic(&target, &log)).await;
    let error = match result {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error.to_string(),
        Err(join) => join.to_string(),
    };
    tracing::warn!(
        target: "runtime::repository",
        %error,
        path = %path.display(),
        "failed to persist mistake log"
    );
}
