use crate::constants::FRICTION;
use crate::types::Vec2;

/// Add one tick of gravity to the vertical velocity.
pub fn apply_gravity(vel: &mut Vec2, gravity: f64) {
    vel.y += gravity;
}

/// Decay horizontal velocity when there is no movement input.
pub fn apply_friction(vel: &mut Vec2) {
    vel.x *= FRICTION;
}

/// Integrate position and rest the body on the ground line.
/// Returns true if the body is standing on the ground after the move.
pub fn move_and_land(pos: &mut Vec2, vel: &mut Vec2, height: f64, ground_y: f64) -> bool {
    pos.x += vel.x;
    pos.y += vel.y;
    if pos.y + height >= ground_y {
        pos.y = ground_y - height;
        vel.y = 0.0;
        return true;
    }
    false
}

/// Keep a body of `width` inside [0, arena_width].
pub fn clamp_to_arena(pos: &mut Vec2, width: f64, arena_width: f64) {
    if pos.x < 0.0 {
        pos.x = 0.0;
    }
    if pos.x + width > arena_width {
        pos.x = arena_width - width;
    }
}

pub fn manhattan(a: Vec2, b: Vec2) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// +1 when `target_x` is to the right of `from_x`, else -1.
pub fn direction_to(from_x: f64, target_x: f64) -> f64 {
    if from_x < target_x {
        1.0
    } else {
        -1.0
    }
}
