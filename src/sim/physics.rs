//! Arcade physics host
//!
//! Moves the ball and power-ups, bounces the ball off the side and top walls
//! and out of bricks/paddle, and reports what touched what. Game rules never
//! run here; the controller consumes the returned contacts.

use super::collision::{Wall, ball_rect_collision, ball_wall_collisions, reflect_velocity};
use super::state::GameState;

/// Overlap reported by one physics step, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Ball touched the brick at this index
    BallBrick(usize),
    BallPaddle,
    BallWall(Wall),
    /// Paddle touched the power-up at this index
    PaddlePowerUp(usize),
}

/// Upper bound on ball substeps per step
const MAX_BALL_SUBSTEPS: usize = 20;

/// Advance the ball and power-ups by `dt`
///
/// The ball stops integrating for the rest of the step at its first paddle or
/// brick contact, so the rule response takes effect before it moves on.
pub fn step(state: &mut GameState, field_width: f32, field_height: f32, dt: f32) -> Vec<Contact> {
    let mut contacts = Vec::new();

    if state.ball.served {
        step_ball(state, field_width, dt, &mut contacts);
    }
    step_powerups(state, field_height, dt, &mut contacts);

    contacts
}

fn step_ball(state: &mut GameState, field_width: f32, dt: f32, contacts: &mut Vec<Contact>) {
    let ball = &mut state.ball;

    // Small steps for accuracy
    let move_dist = ball.speed() * dt;
    let step_size = ball.radius * 0.5;
    let num_steps = ((move_dist / step_size).ceil() as usize).clamp(1, MAX_BALL_SUBSTEPS);
    let step_dt = dt / num_steps as f32;

    for _ in 0..num_steps {
        ball.pos += ball.vel * step_dt;

        // --- WALLS (elastic, bottom open) ---
        for wall in ball_wall_collisions(ball.pos, ball.radius, field_width) {
            match wall {
                Wall::Left => {
                    ball.pos.x = ball.radius;
                    ball.vel.x = ball.vel.x.abs();
                }
                Wall::Right => {
                    ball.pos.x = field_width - ball.radius;
                    ball.vel.x = -ball.vel.x.abs();
                }
                Wall::Top => {
                    ball.pos.y = ball.radius;
                    ball.vel.y = ball.vel.y.abs();
                }
            }
            contacts.push(Contact::BallWall(wall));
        }

        // --- PADDLE ---
        // Only while falling, so a ball leaving the paddle can't re-trigger
        if ball.vel.y > 0.0 {
            let result = ball_rect_collision(ball.pos, ball.radius, &state.paddle.rect());
            if result.hit {
                ball.pos += result.normal * result.penetration;
                if ball.vel.dot(result.normal) < 0.0 {
                    ball.vel = reflect_velocity(ball.vel, result.normal);
                }
                contacts.push(Contact::BallPaddle);
                return;
            }
        }

        // --- BRICKS ---
        let hit = state.bricks.iter_active().find_map(|(index, brick)| {
            let result = ball_rect_collision(ball.pos, ball.radius, &brick.rect());
            result.hit.then_some((index, result))
        });
        if let Some((index, result)) = hit {
            ball.pos += result.normal * result.penetration;
            if ball.vel.dot(result.normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, result.normal);
            }
            log::debug!("Ball touched brick {} at {:?}", index, result.point);
            contacts.push(Contact::BallBrick(index));
            return;
        }
    }
}

fn step_powerups(state: &mut GameState, field_height: f32, dt: f32, contacts: &mut Vec<Contact>) {
    let paddle_rect = state.paddle.rect();
    for (index, powerup) in state.powerups.iter_mut().enumerate() {
        if !powerup.active {
            continue;
        }
        powerup.pos += powerup.vel * dt;

        if powerup.rect().intersects(&paddle_rect) {
            contacts.push(Contact::PaddlePowerUp(index));
        } else if powerup.pos.y - powerup.size / 2.0 > field_height {
            // Missed; gone for good
            powerup.active = false;
        }
    }
}
