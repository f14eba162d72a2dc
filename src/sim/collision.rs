//! Collision detection for a circular ball against axis-aligned boxes
//!
//! Bricks, the paddle and power-ups are all rectangles; the ball is a circle.
//! Results carry the surface normal so callers can reflect and separate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Rect, closest_point};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing toward the ball centre
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// World boundary the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Top,
}

/// Check collision between a ball and a rectangle
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    let closest = closest_point(rect, ball_pos);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= ball_radius * ball_radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: delta / dist,
            penetration: ball_radius - dist,
        };
    }

    // Centre inside the rectangle (tunneling case): push out along the
    // axis of least penetration
    let (min, max) = (rect.min(), rect.max());
    let candidates = [
        (ball_pos.x - min.x, Vec2::NEG_X, Vec2::new(min.x, ball_pos.y)),
        (max.x - ball_pos.x, Vec2::X, Vec2::new(max.x, ball_pos.y)),
        (ball_pos.y - min.y, Vec2::NEG_Y, Vec2::new(ball_pos.x, min.y)),
        (max.y - ball_pos.y, Vec2::Y, Vec2::new(ball_pos.x, max.y)),
    ];
    let (depth, normal, point) = candidates
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::NEG_Y, ball_pos));

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Which side/top walls the ball currently overlaps (bottom is open)
pub fn ball_wall_collisions(ball_pos: Vec2, ball_radius: f32, field_width: f32) -> Vec<Wall> {
    let mut walls = Vec::new();
    if ball_pos.x - ball_radius < 0.0 {
        walls.push(Wall::Left);
    }
    if ball_pos.x + ball_radius > field_width {
        walls.push(Wall::Right);
    }
    if ball_pos.y - ball_radius < 0.0 {
        walls.push(Wall::Top);
    }
    walls
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Ball has left the field through the open bottom edge
#[inline]
pub fn ball_below_field(ball_pos: Vec2, field_height: f32) -> bool {
    ball_pos.y > field_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick() -> Rect {
        Rect::from_top_left(Vec2::new(100.0, 100.0), Vec2::new(64.0, 32.0))
    }

    #[test]
    fn test_ball_hits_brick_from_below() {
        // Brick spans y 100..132; ball centre 8px below the bottom edge
        let result = ball_rect_collision(Vec2::new(130.0, 140.0), 12.0, &brick());
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 4.0).abs() < 0.001);
        assert_eq!(result.point, Vec2::new(130.0, 132.0));
    }

    #[test]
    fn test_ball_misses_brick() {
        let result = ball_rect_collision(Vec2::new(130.0, 150.0), 12.0, &brick());
        assert!(!result.hit);

        // Just touching counts as a miss
        let result = ball_rect_collision(Vec2::new(130.0, 144.0), 12.0, &brick());
        assert!(!result.hit);
    }

    #[test]
    fn test_corner_hit_normal_is_diagonal() {
        let result = ball_rect_collision(Vec2::new(95.0, 95.0), 12.0, &brick());
        assert!(result.hit);
        assert!(result.normal.x < 0.0 && result.normal.y < 0.0);
        assert!((result.normal.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_center_inside_uses_shallowest_axis() {
        // 2px inside the left edge
        let result = ball_rect_collision(Vec2::new(102.0, 116.0), 12.0, &brick());
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_walls_exclude_bottom() {
        assert!(ball_wall_collisions(Vec2::new(400.0, 300.0), 12.0, 800.0).is_empty());
        assert_eq!(
            ball_wall_collisions(Vec2::new(5.0, 5.0), 12.0, 800.0),
            vec![Wall::Left, Wall::Top]
        );
        assert_eq!(ball_wall_collisions(Vec2::new(795.0, 300.0), 12.0, 800.0), vec![Wall::Right]);
        // Far below the field: no wall, only the exit check notices
        assert!(ball_wall_collisions(Vec2::new(400.0, 900.0), 12.0, 800.0).is_empty());
        assert!(ball_below_field(Vec2::new(400.0, 601.0), 600.0));
        assert!(!ball_below_field(Vec2::new(400.0, 600.0), 600.0));
    }
}
