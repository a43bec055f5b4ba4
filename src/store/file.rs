//! JSON document store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::MatchRecord;

use super::records::{LeaderboardEntry, PlayerRecord, Settings, StoreData};
use super::{MatchStore, StoreError};

/// Store backed by a single JSON file, rewritten after every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStore {
    /// Open the file at `path`, starting empty if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => StoreData::default(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StoreData::default(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            players = data.players.len(),
            matches = data.matches.len(),
            "Opened records file"
        );

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write via a temp file so a crash never leaves a half-written document
    fn flush(&self, data: &StoreData) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Records file written");
        Ok(())
    }

    /// Apply `change` to a copy, persist it, then commit it in memory
    fn update<T>(
        &self,
        change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut data = self.data.lock();
        let mut next = data.clone();
        let out = change(&mut next)?;
        self.flush(&next)?;
        *data = next;
        Ok(out)
    }
}

impl MatchStore for JsonFileStore {
    fn register_player(&self, name: &str) -> Result<PlayerRecord, StoreError> {
        if let Some(existing) = self.data.lock().players.iter().find(|p| p.name == name) {
            return Ok(existing.clone());
        }
        self.update(|data| Ok(data.register_player(name)))
    }

    fn player(&self, id: Uuid) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.data.lock().player(id).cloned())
    }

    fn save_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        self.update(|data| data.apply_match(record))
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.data.lock().leaderboard(limit))
    }

    fn reset_scores(&self) -> Result<(), StoreError> {
        self.update(|data| {
            data.reset_scores();
            Ok(())
        })
    }

    fn players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.data.lock().players_by_name())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.update(|data| {
            data.save_settings(*settings);
            Ok(())
        })
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.data.lock().settings)
    }
}
