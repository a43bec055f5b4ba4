//! Persistence of players and finished matches

pub mod file;
pub mod records;
pub mod writer;

use uuid::Uuid;

use crate::game::MatchRecord;

pub use file::JsonFileStore;
pub use records::{
    InputMode, LeaderboardEntry, MemoryStore, PlayerRecord, Settings, StoreData,
    DEFAULT_LEADERBOARD_LIMIT,
};
pub use writer::RecordWriter;

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown player: {0}")]
    UnknownPlayer(Uuid),

    #[error("Record queue is full")]
    QueueFull,

    #[error("Record writer has stopped")]
    WriterClosed,
}

/// Player and match persistence.
///
/// Calls are synchronous; async callers go through [`RecordWriter`].
pub trait MatchStore: Send + Sync {
    /// Look up a player by name, creating it on first use
    fn register_player(&self, name: &str) -> Result<PlayerRecord, StoreError>;

    fn player(&self, id: Uuid) -> Result<Option<PlayerRecord>, StoreError>;

    /// Record a finished match and update both players' totals
    fn save_match(&self, record: &MatchRecord) -> Result<(), StoreError>;

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Zero all totals and drop match history. Settings are kept.
    fn reset_scores(&self) -> Result<(), StoreError>;

    /// Every registered player, ordered by name
    fn players(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Replace the stored settings
    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    /// Stored settings, `None` until first saved
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;
}
