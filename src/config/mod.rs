//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::util::time::DEFAULT_FPS;

/// Runner configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Arena width in pixels
    pub arena_width: f32,
    /// Arena height in pixels
    pub arena_height: f32,
    /// Frames per second of the runner
    pub fps: u32,

    /// Total match time budget
    pub match_duration_ms: u64,
    /// Delay between game over and returning to the lobby
    pub game_over_grace_ms: u64,

    /// Map to load, `None` for an open arena
    pub map: Option<String>,
    /// Player names for the two seats
    pub player_names: [String; 2],
    /// Class identifiers for the two seats
    pub player_classes: [String; 2],
    /// Optional JSON file with additional class profiles
    pub classes_path: Option<PathBuf>,

    /// Where finished matches and player records are stored
    pub records_path: PathBuf,
    /// Seed for the headless noise input
    pub demo_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            arena_width: 800.0,
            arena_height: 600.0,
            fps: DEFAULT_FPS,
            match_duration_ms: 180_000,
            game_over_grace_ms: 3_000,
            map: Some("CLASSIC".to_string()),
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
            player_classes: ["ASSAULT".to_string(), "ASSAULT".to_string()],
            classes_path: None,
            records_path: PathBuf::from("game_data.json"),
            demo_seed: 0x5EED,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let map = match env::var("MAP") {
            Ok(name) if name.eq_ignore_ascii_case("none") => None,
            Ok(name) => Some(name.to_uppercase()),
            Err(_) => defaults.map,
        };

        let [default_name_1, default_name_2] = defaults.player_names;
        let [default_class_1, default_class_2] = defaults.player_classes;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            arena_width: parse_var("ARENA_WIDTH", defaults.arena_width)?,
            arena_height: parse_var("ARENA_HEIGHT", defaults.arena_height)?,
            fps: parse_var("FPS", defaults.fps)?,

            match_duration_ms: parse_var("MATCH_DURATION_MS", defaults.match_duration_ms)?,
            game_over_grace_ms: parse_var("GAME_OVER_GRACE_MS", defaults.game_over_grace_ms)?,

            map,
            player_names: [
                env::var("P1_NAME").unwrap_or(default_name_1),
                env::var("P2_NAME").unwrap_or(default_name_2),
            ],
            player_classes: [
                env::var("P1_CLASS")
                    .map(|c| c.to_uppercase())
                    .unwrap_or(default_class_1),
                env::var("P2_CLASS")
                    .map(|c| c.to_uppercase())
                    .unwrap_or(default_class_2),
            ],
            classes_path: env::var("CLASSES_PATH").ok().map(PathBuf::from),

            records_path: env::var("RECORDS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.records_path),
            demo_seed: parse_var("DEMO_SEED", defaults.demo_seed)?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_arcade_cabinet() {
        let config = Config::default();
        assert_eq!(config.arena_width, 800.0);
        assert_eq!(config.arena_height, 600.0);
        assert_eq!(config.match_duration_ms, 180_000);
        assert_eq!(config.game_over_grace_ms, 3_000);
        assert_eq!(config.map.as_deref(), Some("CLASSIC"));
    }

    #[test]
    fn parse_var_rejects_garbage() {
        env::set_var("SPACE_DUEL_TEST_FPS", "sixty");
        let parsed: Result<u32, _> = parse_var("SPACE_DUEL_TEST_FPS", 60);
        assert!(matches!(parsed, Err(ConfigError::Invalid("SPACE_DUEL_TEST_FPS"))));
        env::remove_var("SPACE_DUEL_TEST_FPS");

        let fallback: u32 = parse_var("SPACE_DUEL_TEST_UNSET", 42).unwrap();
        assert_eq!(fallback, 42);
    }
}
