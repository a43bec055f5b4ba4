//! Player and match records

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::MatchRecord;

use super::{MatchStore, StoreError};

/// Default number of leaderboard rows
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Cumulative record of one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: Uuid,
    pub name: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub best_score: i32,
    pub created_at: DateTime<Utc>,
}

/// Leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub total_games: u32,
    pub total_wins: u32,
    pub best_score: i32,
    /// Percentage rounded to one decimal
    pub win_rate: f64,
}

/// Controller scheme picked in the menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputMode {
    /// Cabinet sticks and buttons
    #[default]
    Arcade,
    /// Keyboard
    Pc,
}

/// User preferences, a single persisted row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub input_mode: InputMode,
    /// Master volume, 0.0 ..= 1.0
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Arcade,
            volume: 0.5,
        }
    }
}

impl Settings {
    /// Volume forced into range; a non-finite volume falls back to the default
    pub fn sanitized(self) -> Self {
        let volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        Self { volume, ..self }
    }
}

/// Everything persisted: players, finished matches and settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub players: Vec<PlayerRecord>,
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl StoreData {
    /// Return the player with this name, creating it if needed
    pub fn register_player(&mut self, name: &str) -> PlayerRecord {
        if let Some(existing) = self.players.iter().find(|p| p.name == name) {
            return existing.clone();
        }
        let record = PlayerRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            total_games: 0,
            total_wins: 0,
            best_score: 0,
            created_at: Utc::now(),
        };
        self.players.push(record.clone());
        record
    }

    pub fn player(&self, id: Uuid) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    /// All players ordered by name
    pub fn players_by_name(&self) -> Vec<PlayerRecord> {
        let mut players = self.players.clone();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        players
    }

    pub fn save_settings(&mut self, settings: Settings) {
        self.settings = Some(settings.sanitized());
    }

    /// Append a match and update both players' totals.
    ///
    /// Rejected without changes if either player is unknown.
    pub fn apply_match(&mut self, record: &MatchRecord) -> Result<(), StoreError> {
        for id in [record.player1_id, record.player2_id] {
            if self.player(id).is_none() {
                return Err(StoreError::UnknownPlayer(id));
            }
        }

        let seats = [
            (record.player1_id, record.player1_score),
            (record.player2_id, record.player2_score),
        ];
        for (id, score) in seats {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
                player.total_games += 1;
                if record.winner_id == Some(id) {
                    player.total_wins += 1;
                }
                player.best_score = player.best_score.max(score);
            }
        }

        self.matches.push(record.clone());
        Ok(())
    }

    /// Players with at least one game, best win rate first, then most wins
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<LeaderboardEntry> = self
            .players
            .iter()
            .filter(|p| p.total_games > 0)
            .map(|p| LeaderboardEntry {
                name: p.name.clone(),
                total_games: p.total_games,
                total_wins: p.total_wins,
                best_score: p.best_score,
                win_rate: win_rate(p.total_wins, p.total_games),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then_with(|| b.total_wins.cmp(&a.total_wins))
        });
        rows.truncate(limit);
        rows
    }

    /// Zero every player's totals and forget all matches
    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.total_games = 0;
            player.total_wins = 0;
            player.best_score = 0;
        }
        self.matches.clear();
    }
}

fn win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    (wins as f64 / games as f64 * 1000.0).round() / 10.0
}

/// In-process store, for tests and runs without a records file
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn match_count(&self) -> usize {
        self.data.lock().matches.len()
    }
}

impl MatchStore for MemoryStore {
    fn register_player(&self, name: &str) -> Result<PlayerRecord, StoreError> {
        Ok(self.data.lock().register_player(name))
    }

    fn player(&self, id: Uuid) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.data.lock().player(id).cloned())
    }

    fn save_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        self.data.lock().apply_match(record)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.data.lock().leaderboard(limit))
    }

    fn reset_scores(&self) -> Result<(), StoreError> {
        self.data.lock().reset_scores();
        Ok(())
    }

    fn players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.data.lock().players_by_name())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.data.lock().save_settings(*settings);
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(self.data.lock().settings)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(p1: Uuid, p2: Uuid, scores: (i32, i32), winner: Option<Uuid>) -> MatchRecord {
        MatchRecord {
            match_id: Uuid::new_v4(),
            player1_id: p1,
            player2_id: p2,
            player1_score: scores.0,
            player2_score: scores.1,
            winner_id: winner,
            player1_class: "ASSAULT".to_string(),
            player2_class: "TANK".to_string(),
            duration_ms: 90_000,
            played_at: Utc::now(),
        }
    }

    #[test]
    fn register_is_idempotent_by_name() {
        let store = MemoryStore::new();
        let a = store.register_player("Ada").unwrap();
        let again = store.register_player("Ada").unwrap();
        assert_eq!(a.id, again.id);
        assert_ne!(store.register_player("Linus").unwrap().id, a.id);
    }

    #[test]
    fn save_updates_totals_and_best_score() {
        let store = MemoryStore::new();
        let a = store.register_player("Ada").unwrap();
        let b = store.register_player("Linus").unwrap();

        store.save_match(&record(a.id, b.id, (7_200, 3_100), Some(a.id))).unwrap();
        store.save_match(&record(a.id, b.id, (4_000, 6_600), Some(b.id))).unwrap();
        store.save_match(&record(a.id, b.id, (5_000, 5_000), None)).unwrap();

        let a = store.player(a.id).unwrap().unwrap();
        let b = store.player(b.id).unwrap().unwrap();
        assert_eq!((a.total_games, a.total_wins, a.best_score), (3, 1, 7_200));
        assert_eq!((b.total_games, b.total_wins, b.best_score), (3, 1, 6_600));
        assert_eq!(store.match_count(), 3);
    }

    #[test]
    fn save_with_unknown_player_changes_nothing() {
        let store = MemoryStore::new();
        let a = store.register_player("Ada").unwrap();
        let ghost = Uuid::new_v4();
        let err = store.save_match(&record(a.id, ghost, (1, 1), None)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownPlayer(id) if id == ghost));
        assert_eq!(store.player(a.id).unwrap().unwrap().total_games, 0);
        assert_eq!(store.match_count(), 0);
    }

    #[test]
    fn leaderboard_orders_by_win_rate_then_wins() {
        let store = MemoryStore::new();
        let a = store.register_player("Ada").unwrap();
        let b = store.register_player("Linus").unwrap();
        let c = store.register_player("Grace").unwrap();
        store.register_player("Idle").unwrap();

        // Grace 1/1, Ada 2/3, Linus 1/4; Idle never played
        store.save_match(&record(a.id, b.id, (1, 1), Some(a.id))).unwrap();
        store.save_match(&record(a.id, b.id, (1, 1), Some(a.id))).unwrap();
        store.save_match(&record(a.id, b.id, (1, 1), Some(b.id))).unwrap();
        store.save_match(&record(c.id, b.id, (1, 1), Some(c.id))).unwrap();

        let board = store.leaderboard(DEFAULT_LEADERBOARD_LIMIT).unwrap();
        let names: Vec<_> = board.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Grace", "Ada", "Linus"]);
        assert_eq!(board[0].win_rate, 100.0);
        assert_eq!(board[1].win_rate, 66.7);
        assert_eq!(board[2].win_rate, 25.0);

        assert_eq!(store.leaderboard(1).unwrap().len(), 1);
    }

    #[test]
    fn players_are_listed_by_name() {
        let store = MemoryStore::new();
        for name in ["Linus", "Ada", "Grace"] {
            store.register_player(name).unwrap();
        }
        let names: Vec<_> = store.players().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Ada", "Grace", "Linus"]);
    }

    #[test]
    fn settings_round_trip_and_survive_reset() {
        let store = MemoryStore::new();
        assert_eq!(store.load_settings().unwrap(), None);

        let settings = Settings {
            input_mode: InputMode::Pc,
            volume: 0.8,
        };
        store.save_settings(&settings).unwrap();
        store.reset_scores().unwrap();
        assert_eq!(store.load_settings().unwrap(), Some(settings));

        store
            .save_settings(&Settings {
                volume: 3.0,
                ..settings
            })
            .unwrap();
        assert_eq!(store.load_settings().unwrap().map(|s| s.volume), Some(1.0));
    }

    #[test]
    fn settings_serialize_like_the_menu_row() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["input_mode"], "ARCADE");
        assert_eq!(json["volume"], 0.5);
    }

    #[test]
    fn reset_clears_totals() {
        let store = MemoryStore::new();
        let a = store.register_player("Ada").unwrap();
        let b = store.register_player("Linus").unwrap();
        store.save_match(&record(a.id, b.id, (9_000, 100), Some(a.id))).unwrap();
        store.reset_scores().unwrap();
        assert!(store.leaderboard(10).unwrap().is_empty());
        assert_eq!(store.player(a.id).unwrap().unwrap().best_score, 0);
        assert_eq!(store.match_count(), 0);
    }
}
