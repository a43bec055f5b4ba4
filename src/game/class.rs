//! Ship class profiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default time between two shots
pub const DEFAULT_FIRE_COOLDOWN_MS: u64 = 250;

fn default_fire_cooldown() -> u64 {
    DEFAULT_FIRE_COOLDOWN_MS
}

/// Immutable stat bundle selected before a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProfile {
    /// Stable identifier, e.g. `ASSAULT`
    pub id: String,
    /// Display name
    pub name: String,
    /// Maximum (and starting) health
    pub health: f32,
    /// Damage per projectile
    pub damage: f32,
    /// Projectile travel per frame
    pub bullet_speed: f32,
    /// Ship travel per frame
    pub move_speed: f32,
    /// Side length of the square hull
    pub size: f32,
    /// Hull color (RGB)
    pub color: [u8; 3],
    /// Minimum time between shots
    #[serde(default = "default_fire_cooldown")]
    pub fire_cooldown_ms: u64,
}

impl ClassProfile {
    fn builtin(
        id: &str,
        name: &str,
        health: f32,
        damage: f32,
        bullet_speed: f32,
        move_speed: f32,
        size: f32,
        color: [u8; 3],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            health,
            damage,
            bullet_speed,
            move_speed,
            size,
            color,
            fire_cooldown_ms: DEFAULT_FIRE_COOLDOWN_MS,
        }
    }

    /// Length of the cannon, measured from the hull center
    pub fn cannon_length(&self, ratio: f32) -> f32 {
        self.size * ratio
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidProfile {
                id: self.id.clone(),
                reason: "empty id",
            });
        }
        if !positive(self.health) || !positive(self.size) {
            return Err(CatalogError::InvalidProfile {
                id: self.id.clone(),
                reason: "health and size must be positive",
            });
        }
        if !non_negative(self.damage)
            || !non_negative(self.bullet_speed)
            || !non_negative(self.move_speed)
        {
            return Err(CatalogError::InvalidProfile {
                id: self.id.clone(),
                reason: "damage and speeds must not be negative",
            });
        }
        Ok(())
    }
}

/// Class catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    #[error("Invalid class profile {id}: {reason}")]
    InvalidProfile { id: String, reason: &'static str },

    #[error("Failed to parse class profiles: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Class profiles keyed by identifier
#[derive(Debug, Clone)]
pub struct ClassCatalog {
    profiles: BTreeMap<String, ClassProfile>,
}

impl ClassCatalog {
    /// Catalog with the five stock classes
    pub fn builtin() -> Self {
        let profiles = [
            ClassProfile::builtin("ASSAULT", "Assault", 100.0, 10.0, 7.0, 5.0, 32.0, [255, 255, 255]),
            ClassProfile::builtin("TANK", "Tank", 150.0, 8.0, 5.0, 4.0, 40.0, [100, 100, 255]),
            ClassProfile::builtin("SCOUT", "Scout", 70.0, 7.0, 9.0, 7.0, 25.0, [50, 255, 50]),
            ClassProfile::builtin("SNIPER", "Sniper", 80.0, 15.0, 12.0, 4.0, 30.0, [255, 50, 50]),
            ClassProfile::builtin("BALANCED", "Balanced", 100.0, 10.0, 7.0, 5.0, 32.0, [255, 255, 50]),
        ];

        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Merge custom profiles from a JSON array. Same id replaces the stock profile.
    ///
    /// Ids are upper-cased so they match class names read from the environment.
    pub fn merge_json(&mut self, json: &str) -> Result<usize, CatalogError> {
        let mut custom: Vec<ClassProfile> = serde_json::from_str(json)?;
        for profile in &mut custom {
            profile.id = profile.id.trim().to_uppercase();
            profile.validate()?;
        }
        let count = custom.len();
        for profile in custom {
            self.profiles.insert(profile.id.clone(), profile);
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> Result<&ClassProfile, CatalogError> {
        self.profiles
            .get(id)
            .ok_or_else(|| CatalogError::UnknownClass(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
