//! Static arena geometry: walls and slow zones

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Velocity factor applied by each slow zone a combatant overlaps
pub const SLOW_FACTOR: f32 = 0.5;

/// Obstacle behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObstacleKind {
    /// Blocks movement and projectiles
    Wall,
    /// Passable, halves movement while overlapped
    Slow,
}

impl ObstacleKind {
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall)
    }

    pub fn blocks_projectiles(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Movement factor this kind applies while overlapped
    pub fn movement_factor(self) -> f32 {
        match self {
            Self::Wall => 1.0,
            Self::Slow => SLOW_FACTOR,
        }
    }
}

/// A single obstacle, immutable once the map is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Unrotated placement
    pub rect: Rect,
    /// Rotation in degrees about the rect center
    pub rotation: f32,
    pub kind: ObstacleKind,
    /// Collision shape, derived from `rect` and `rotation`
    #[serde(skip)]
    bounds: Option<Rect>,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind, rotation: f32) -> Self {
        Self {
            rect,
            rotation,
            kind,
            bounds: Some(rect.rotated_bounds(rotation)),
        }
    }

    pub fn wall(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Rect::new(x, y, w, h), ObstacleKind::Wall, 0.0)
    }

    pub fn slow(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Rect::new(x, y, w, h), ObstacleKind::Slow, 0.0)
    }

    /// Shape used for collision tests
    pub fn bounds(&self) -> Rect {
        self.bounds
            .unwrap_or_else(|| self.rect.rotated_bounds(self.rotation))
    }

    pub fn overlaps(&self, rect: &Rect) -> bool {
        rect.intersects(&self.bounds())
    }
}

/// All obstacles of the loaded map
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True if `rect` overlaps any obstacle that stops movement
    pub fn blocks_movement(&self, rect: &Rect) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind.blocks_movement() && o.overlaps(rect))
    }

    /// True if `rect` overlaps any obstacle that stops projectiles
    pub fn blocks_projectile(&self, rect: &Rect) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind.blocks_projectiles() && o.overlaps(rect))
    }

    /// Per-axis velocity factors for a body at `rect`.
    ///
    /// Overlapping slow zones compound multiplicatively.
    pub fn movement_modifier(&self, rect: &Rect) -> (f32, f32) {
        self.obstacles
            .iter()
            .filter(|o| o.overlaps(rect))
            .fold((1.0, 1.0), |(fx, fy), o| {
                let f = o.kind.movement_factor();
                (fx * f, fy * f)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ObstacleField {
        ObstacleField::new(vec![
            Obstacle::wall(100.0, 100.0, 20.0, 100.0),
            Obstacle::slow(300.0, 300.0, 100.0, 100.0),
            Obstacle::slow(350.0, 350.0, 100.0, 100.0),
        ])
    }

    #[test]
    fn wall_blocks_movement_and_projectiles() {
        let field = field();
        let probe = Rect::new(110.0, 150.0, 8.0, 8.0);
        assert!(field.blocks_movement(&probe));
        assert!(field.blocks_projectile(&probe));
        assert_eq!(field.movement_modifier(&probe), (1.0, 1.0));
    }

    #[test]
    fn slow_zone_is_passable() {
        let field = field();
        let probe = Rect::new(310.0, 310.0, 10.0, 10.0);
        assert!(!field.blocks_movement(&probe));
        assert!(!field.blocks_projectile(&probe));
        assert_eq!(field.movement_modifier(&probe), (0.5, 0.5));
    }

    #[test]
    fn overlapping_slow_zones_compound() {
        let field = field();
        let probe = Rect::new(360.0, 360.0, 10.0, 10.0);
        assert_eq!(field.movement_modifier(&probe), (0.25, 0.25));
    }

    #[test]
    fn open_space_is_unmodified() {
        let field = field();
        let probe = Rect::new(600.0, 50.0, 32.0, 32.0);
        assert!(!field.blocks_movement(&probe));
        assert_eq!(field.movement_modifier(&probe), (1.0, 1.0));
    }

    #[test]
    fn rotated_wall_uses_expanded_bounds() {
        let wall = Obstacle::new(Rect::new(100.0, 100.0, 10.0, 100.0), ObstacleKind::Wall, 45.0);
        let field = ObstacleField::new(vec![wall]);
        // Outside the unrotated rect, inside the rotated bounds
        let probe = Rect::new(140.0, 148.0, 4.0, 4.0);
        assert!(field.blocks_movement(&probe));
    }
}
