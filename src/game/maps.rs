//! Built-in arena layouts

use super::geometry::Rect;
use super::obstacle::{Obstacle, ObstacleField, ObstacleKind};

/// Arena dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Obstacle placed in arena fractions, resolved to pixels per arena
#[derive(Debug, Clone, Copy)]
struct Placement {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    kind: ObstacleKind,
    rotation: f32,
}

const fn wall(x: f64, y: f64, w: f64, h: f64) -> Placement {
    Placement { x, y, w, h, kind: ObstacleKind::Wall, rotation: 0.0 }
}

const fn slow(x: f64, y: f64, w: f64, h: f64) -> Placement {
    Placement { x, y, w, h, kind: ObstacleKind::Slow, rotation: 0.0 }
}

const fn tilted(x: f64, y: f64, w: f64, h: f64, rotation: f32) -> Placement {
    Placement { x, y, w, h, kind: ObstacleKind::Wall, rotation }
}

impl Placement {
    /// Fractions are truncated to whole pixels
    fn resolve(&self, arena: Arena) -> Obstacle {
        let (width, height) = (arena.width as f64, arena.height as f64);
        let rect = Rect::new(
            (self.x * width).trunc() as f32,
            (self.y * height).trunc() as f32,
            (self.w * width).trunc() as f32,
            (self.h * height).trunc() as f32,
        );
        Obstacle::new(rect, self.kind, self.rotation)
    }
}

const CLASSIC: &[Placement] = &[
    // Central wall
    wall(0.48, 0.2, 0.04, 0.6),
    slow(0.2, 0.2, 0.15, 0.15),
    slow(0.65, 0.65, 0.15, 0.15),
    // Cover
    wall(0.15, 0.4, 0.1, 0.05),
    wall(0.75, 0.55, 0.1, 0.05),
];

const ARENA: &[Placement] = &[
    // Mirrored L walls
    wall(0.2, 0.2, 0.2, 0.05),
    wall(0.2, 0.2, 0.05, 0.2),
    wall(0.6, 0.75, 0.2, 0.05),
    wall(0.75, 0.6, 0.05, 0.2),
    slow(0.45, 0.45, 0.1, 0.1),
    slow(0.15, 0.75, 0.1, 0.1),
    slow(0.75, 0.15, 0.1, 0.1),
];

const MAZE: &[Placement] = &[
    tilted(0.3, 0.3, 0.05, 0.2, 45.0),
    tilted(0.65, 0.3, 0.05, 0.2, -45.0),
    tilted(0.3, 0.7, 0.05, 0.2, -45.0),
    tilted(0.65, 0.7, 0.05, 0.2, 45.0),
    slow(0.45, 0.2, 0.1, 0.1),
    slow(0.45, 0.7, 0.1, 0.1),
    slow(0.2, 0.45, 0.1, 0.1),
    slow(0.7, 0.45, 0.1, 0.1),
];

/// Fixed pixel layout used when no named map is chosen from the catalog
fn standard_layout(arena: Arena) -> Vec<Obstacle> {
    let (w, h) = (arena.width, arena.height);
    let quarter_h = (h / 4.0).floor();
    let wall_thickness = 20.0;
    let wall_length = 150.0;

    vec![
        // Central walls
        Obstacle::wall((w / 2.0).floor() - 20.0, quarter_h, 40.0, quarter_h),
        Obstacle::wall(
            (w / 2.0).floor() - 20.0,
            (h * 3.0 / 4.0).floor() - quarter_h,
            40.0,
            quarter_h,
        ),
        // Slow zones
        Obstacle::slow((w / 4.0).floor(), quarter_h, 100.0, 100.0),
        Obstacle::slow(
            (w * 3.0 / 4.0).floor() - 100.0,
            (h * 3.0 / 4.0).floor() - 100.0,
            100.0,
            100.0,
        ),
        // Side walls
        Obstacle::wall(100.0, 100.0, wall_thickness, wall_length),
        Obstacle::wall(100.0, h - 100.0 - wall_length, wall_thickness, wall_length),
        Obstacle::wall(w - 100.0 - wall_thickness, 100.0, wall_thickness, wall_length),
        Obstacle::wall(
            w - 100.0 - wall_thickness,
            h - 100.0 - wall_length,
            wall_thickness,
            wall_length,
        ),
    ]
}

/// Map selection errors
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Unknown map: {0}")]
    Unknown(String),
}

/// Catalog entry describing a selectable map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Named maps available at match setup
#[derive(Debug, Clone, Default)]
pub struct MapCatalog;

impl MapCatalog {
    pub const MAPS: &'static [MapInfo] = &[
        MapInfo { id: "CLASSIC", name: "Classic" },
        MapInfo { id: "ARENA", name: "Arena" },
        MapInfo { id: "MAZE", name: "Tactical" },
        MapInfo { id: "STANDARD", name: "Standard" },
    ];

    pub fn new() -> Self {
        Self
    }

    pub fn contains(&self, id: &str) -> bool {
        Self::MAPS.iter().any(|m| m.id == id)
    }

    /// Build the obstacle field for a map, in pixels of `arena`
    pub fn build(&self, id: &str, arena: Arena) -> Result<ObstacleField, MapError> {
        let placements = match id {
            "CLASSIC" => CLASSIC,
            "ARENA" => ARENA,
            "MAZE" => MAZE,
            "STANDARD" => return Ok(ObstacleField::new(standard_layout(arena))),
            other => return Err(MapError::Unknown(other.to_string())),
        };

        Ok(ObstacleField::new(
            placements.iter().map(|p| p.resolve(arena)).collect(),
        ))
    }
}
