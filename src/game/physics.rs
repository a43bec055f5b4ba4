//! Ship movement and obstacle constraints

use super::geometry::Rect;
use super::maps::Arena;
use super::obstacle::ObstacleField;

/// Physics system for moving hulls through the arena
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Normalize a stick vector to unit length.
    /// Returns `None` for the zero vector.
    pub fn normalize(dx: f32, dy: f32) -> Option<(f32, f32)> {
        let length = (dx * dx + dy * dy).sqrt();
        if length > 0.0 {
            Some((dx / length, dy / length))
        } else {
            None
        }
    }

    /// Move a hull by one frame of `(dx, dy) * speed`.
    ///
    /// With an obstacle field, the slow-zone modifier at the current hull is
    /// applied and each axis is accepted only if the hull moved along that
    /// axis alone stays clear of walls. Without one, each axis is accepted only
    /// if the hull stays inside the arena.
    /// Returns the new top-left corner.
    pub fn step(
        hull: Rect,
        dx: f32,
        dy: f32,
        speed: f32,
        obstacles: Option<&ObstacleField>,
        arena: Arena,
    ) -> (f32, f32) {
        let mut x = hull.x;
        let mut y = hull.y;

        match obstacles {
            Some(field) => {
                let (mod_x, mod_y) = field.movement_modifier(&hull);
                let new_x = hull.x + speed * dx * mod_x;
                let new_y = hull.y + speed * dy * mod_y;

                if !field.blocks_movement(&hull.with_origin(new_x, hull.y)) {
                    x = new_x;
                }
                if !field.blocks_movement(&hull.with_origin(hull.x, new_y)) {
                    y = new_y;
                }
            }
            None => {
                let new_x = hull.x + speed * dx;
                let new_y = hull.y + speed * dy;

                if (0.0..=arena.width - hull.w).contains(&new_x) {
                    x = new_x;
                }
                if (0.0..=arena.height - hull.h).contains(&new_y) {
                    y = new_y;
                }
            }
        }

        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::obstacle::Obstacle;

    #[test]
    fn normalize_diagonal() {
        let (x, y) = PhysicsSystem::normalize(1.0, 1.0).unwrap();
        assert!((x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((y - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(PhysicsSystem::normalize(0.0, 0.0).is_none());
    }

    #[test]
    fn open_arena_clamps_per_axis() {
        let hull = Rect::new(2.0, 100.0, 32.0, 32.0);
        // x would leave the arena, y is fine
        let (x, y) = PhysicsSystem::step(hull, -1.0, 1.0, 5.0, None, Arena::default());
        assert_eq!(x, 2.0);
        assert_eq!(y, 105.0);
    }

    #[test]
    fn wall_blocks_only_the_colliding_axis() {
        let field = ObstacleField::new(vec![Obstacle::wall(140.0, 0.0, 20.0, 600.0)]);
        let hull = Rect::new(105.0, 100.0, 32.0, 32.0);
        let d = std::f32::consts::FRAC_1_SQRT_2;
        let (x, y) = PhysicsSystem::step(hull, d, d, 5.0, Some(&field), Arena::default());
        // Sliding along the wall: x blocked, y advances
        assert_eq!(x, 105.0);
        assert!((y - (100.0 + 5.0 * d)).abs() < 1e-4);
    }

    #[test]
    fn slow_zone_halves_speed() {
        let field = ObstacleField::new(vec![Obstacle::slow(90.0, 90.0, 100.0, 100.0)]);
        let hull = Rect::new(100.0, 100.0, 32.0, 32.0);
        let (x, y) = PhysicsSystem::step(hull, 1.0, 0.0, 5.0, Some(&field), Arena::default());
        assert_eq!(x, 102.5);
        assert_eq!(y, 100.0);
    }

    #[test]
    fn obstacle_field_does_not_clamp_to_arena() {
        let field = ObstacleField::default();
        let hull = Rect::new(1.0, 100.0, 32.0, 32.0);
        let (x, _) = PhysicsSystem::step(hull, -1.0, 0.0, 5.0, Some(&field), Arena::default());
        assert_eq!(x, -4.0);
    }
}
