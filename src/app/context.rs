//! Simulation context shared by every match of the process

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::game::{Arena, CatalogError, ClassCatalog, MapCatalog, MatchRules};

/// Process-wide simulation context.
///
/// Built once at startup and handed by reference to match setup.
#[derive(Debug, Clone)]
pub struct SimContext {
    pub arena: Arena,
    pub rules: MatchRules,
    pub classes: ClassCatalog,
    pub maps: MapCatalog,
}

/// Context construction errors
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("Failed to read class file {path}: {source}")]
    ClassFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Invalid arena size {width}x{height}")]
    InvalidArena { width: f32, height: f32 },
}

impl SimContext {
    pub fn new(arena: Arena, rules: MatchRules, classes: ClassCatalog, maps: MapCatalog) -> Self {
        Self {
            arena,
            rules,
            classes,
            maps,
        }
    }

    /// Build the context from runner configuration
    pub fn from_config(config: &Config) -> Result<Self, ContextError> {
        if !(config.arena_width > 0.0 && config.arena_height > 0.0) {
            return Err(ContextError::InvalidArena {
                width: config.arena_width,
                height: config.arena_height,
            });
        }

        let mut classes = ClassCatalog::builtin();
        if let Some(path) = &config.classes_path {
            let json = fs::read_to_string(path).map_err(|source| ContextError::ClassFile {
                path: path.clone(),
                source,
            })?;
            let merged = classes.merge_json(&json)?;
            info!(path = %path.display(), count = merged, "Loaded custom classes");
        }

        let rules = MatchRules {
            match_duration_ms: config.match_duration_ms,
            game_over_grace_ms: config.game_over_grace_ms,
            ..MatchRules::default()
        };

        Ok(Self::new(
            Arena::new(config.arena_width, config.arena_height),
            rules,
            classes,
            MapCatalog::new(),
        ))
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new(
            Arena::default(),
            MatchRules::default(),
            ClassCatalog::builtin(),
            MapCatalog::new(),
        )
    }
}
