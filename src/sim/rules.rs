//! Collision response rules
//!
//! Pure functions shared by the controller: paddle clamping, the bounce-angle
//! mapping on paddle contact, speed shaping and brick scoring.

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, Paddle};
use crate::config::BounceModel;

/// Clamp a paddle centre so the whole paddle stays inside `[0, field_width]`
///
/// NaN targets land on the left bound.
#[inline]
pub fn clamp_paddle_x(x: f32, width: f32, field_width: f32) -> f32 {
    let half = width / 2.0;
    x.max(half).min(field_width - half)
}

/// Horizontal kick for a dead-centre paddle hit, in (2, 10)
pub fn center_kick<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    2.0 + rng.random::<f32>() * 8.0
}

/// Outgoing ball velocity after touching the paddle
///
/// `initial_speed`/`max_speed` bound the speed of the angle-range model; the
/// linear model only rewrites the horizontal component. The result always
/// points up the field and never has a zero horizontal component when the
/// ball hits the exact centre.
pub fn paddle_bounce<R: Rng + ?Sized>(
    ball: &Ball,
    paddle: &Paddle,
    model: BounceModel,
    initial_speed: f32,
    max_speed: f32,
    rng: &mut R,
) -> Vec2 {
    let diff = ball.pos.x - paddle.x;

    match model {
        BounceModel::Linear { factor } => {
            let vx = if diff == 0.0 {
                center_kick(rng)
            } else {
                factor * diff
            };
            let vy = if ball.vel.y == 0.0 {
                -initial_speed
            } else {
                -ball.vel.y.abs()
            };
            Vec2::new(vx, vy)
        }
        BounceModel::AngleRange { min_deg, max_deg } => {
            let speed = ball.speed().clamp(initial_speed, max_speed.max(initial_speed));

            if diff == 0.0 {
                let dir = Vec2::new(center_kick(rng), -speed).normalize();
                return dir * speed;
            }

            let angle = bounce_angle(diff, paddle.width, min_deg, max_deg).to_radians();
            // Screen space: y grows downward, so "up" is -y
            Vec2::new(angle.cos() * speed, -angle.sin() * speed)
        }
    }
}

/// Map a paddle-relative offset onto an outgoing angle in degrees
///
/// Left edge gives `max_deg`, right edge `min_deg`, centre the midpoint.
pub fn bounce_angle(diff: f32, paddle_width: f32, min_deg: f32, max_deg: f32) -> f32 {
    let half = (paddle_width / 2.0).max(f32::EPSILON);
    let t = (diff / half).clamp(-1.0, 1.0);
    let mid = (min_deg + max_deg) / 2.0;
    let half_range = (max_deg - min_deg) / 2.0;
    mid - t * half_range
}

/// Scale a velocity by `ramp`, capping its magnitude at `max_speed`
pub fn ramp_speed(vel: Vec2, ramp: f32, max_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed == 0.0 {
        return vel;
    }
    let target = (speed * ramp).min(max_speed);
    vel * (target / speed)
}

/// Points for destroying a brick in `row` (row 0 is the top row)
pub fn brick_points(row: u32, rows: u32, base: u64, row_bonus: u64) -> u64 {
    let rows_above_bottom = rows.saturating_sub(1).saturating_sub(row) as u64;
    base + row_bonus * rows_above_bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn paddle_at(x: f32) -> Paddle {
        Paddle {
            x,
            y: 550.0,
            width: 100.0,
            height: 20.0,
            base_width: 100.0,
        }
    }

    fn ball_at(x: f32, vel: Vec2) -> Ball {
        Ball {
            pos: Vec2::new(x, 528.0),
            vel,
            radius: 12.0,
            served: true,
        }
    }

    #[test]
    fn test_linear_bounce_follows_offset() {
        let mut rng = Pcg32::seed_from_u64(1);
        let paddle = paddle_at(400.0);
        let model = BounceModel::Linear { factor: 10.0 };

        let ball = ball_at(380.0, Vec2::new(50.0, -300.0));
        let left = paddle_bounce(&ball, &paddle, model, 309.2, 600.0, &mut rng);
        assert_eq!(left, Vec2::new(-200.0, -300.0));

        let ball = ball_at(415.0, Vec2::new(-50.0, -300.0));
        let right = paddle_bounce(&ball, &paddle, model, 309.2, 600.0, &mut rng);
        assert_eq!(right, Vec2::new(150.0, -300.0));
    }

    #[test]
    fn test_linear_bounce_always_goes_up() {
        let mut rng = Pcg32::seed_from_u64(2);
        let paddle = paddle_at(400.0);
        let model = BounceModel::Linear { factor: 10.0 };
        // Still moving down when the handler runs
        let ball = ball_at(410.0, Vec2::new(0.0, 300.0));
        let v = paddle_bounce(&ball, &paddle, model, 309.2, 600.0, &mut rng);
        assert_eq!(v.y, -300.0);
    }

    #[test]
    fn test_angle_range_edges() {
        assert!((bounce_angle(-50.0, 100.0, 60.0, 120.0) - 120.0).abs() < 1e-4);
        assert!((bounce_angle(50.0, 100.0, 60.0, 120.0) - 60.0).abs() < 1e-4);
        assert!((bounce_angle(0.0, 100.0, 60.0, 120.0) - 90.0).abs() < 1e-4);
        // Beyond the paddle edge clamps
        assert!((bounce_angle(200.0, 100.0, 60.0, 120.0) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_range_speed_clamped() {
        let mut rng = Pcg32::seed_from_u64(3);
        let paddle = paddle_at(400.0);
        let model = BounceModel::AngleRange {
            min_deg: 60.0,
            max_deg: 120.0,
        };

        // Too slow: raised to initial speed
        let ball = ball_at(425.0, Vec2::new(0.0, 100.0));
        let v = paddle_bounce(&ball, &paddle, model, 300.0, 600.0, &mut rng);
        assert!((v.length() - 300.0).abs() < 0.01);
        assert!(v.x > 0.0 && v.y < 0.0);

        // Too fast: capped at max speed
        let ball = ball_at(375.0, Vec2::new(0.0, 900.0));
        let v = paddle_bounce(&ball, &paddle, model, 300.0, 600.0, &mut rng);
        assert!((v.length() - 600.0).abs() < 0.01);
        assert!(v.x < 0.0 && v.y < 0.0);
    }

    #[test]
    fn test_ramp_speed_caps() {
        let v = ramp_speed(Vec2::new(0.0, -300.0), 1.05, 600.0);
        assert!((v.length() - 315.0).abs() < 0.01);

        let v = ramp_speed(Vec2::new(0.0, -590.0), 1.05, 600.0);
        assert!((v.length() - 600.0).abs() < 0.01);

        assert_eq!(ramp_speed(Vec2::ZERO, 1.05, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_brick_points() {
        assert_eq!(brick_points(0, 6, 10, 0), 10);
        assert_eq!(brick_points(5, 6, 10, 0), 10);
        // Top row earns the most with a row bonus
        assert_eq!(brick_points(0, 6, 10, 5), 35);
        assert_eq!(brick_points(5, 6, 10, 5), 10);
    }

    proptest! {
        #[test]
        fn prop_paddle_always_inside_field(x in -1.0e6f32..1.0e6, width in 10.0f32..400.0) {
            let clamped = clamp_paddle_x(x, width, 800.0);
            prop_assert!(clamped >= width / 2.0);
            prop_assert!(clamped <= 800.0 - width / 2.0);
        }

        #[test]
        fn prop_center_hit_never_stalls(
            seed in any::<u64>(),
            paddle_x in 50.0f32..750.0,
            angle_model in any::<bool>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let paddle = paddle_at(paddle_x);
            let model = if angle_model {
                BounceModel::AngleRange { min_deg: 60.0, max_deg: 120.0 }
            } else {
                BounceModel::Linear { factor: 10.0 }
            };
            let ball = ball_at(paddle_x, Vec2::new(0.0, 300.0));
            let v = paddle_bounce(&ball, &paddle, model, 300.0, 600.0, &mut rng);
            prop_assert!(v.x != 0.0);
            prop_assert!(v.y < 0.0);
        }

        #[test]
        fn prop_angle_range_stays_in_range(diff in -500.0f32..500.0) {
            let angle = bounce_angle(diff, 100.0, 60.0, 120.0);
            prop_assert!((60.0 - 1e-3..=120.0 + 1e-3).contains(&angle));
        }
    }
}
