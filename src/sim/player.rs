//! First-person player: turning, walking and sliding along grid walls.

use glam::{Vec2, vec2};

use super::InputCmd;
use crate::world::{GridMap, Pose};

pub const MOVE_SPEED: f32 = 4.0; // map-units / second
pub const TURN_RATE: f32 = std::f32::consts::PI; // rad / second (180°/s)
pub const HALF_EXTENT: f32 = 0.1; // collision box half-size

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pose: Pose,
    pub move_speed: f32,
    pub half_extent: f32,
}

impl Player {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self {
            pose: Pose::new(pos, heading),
            move_speed: MOVE_SPEED,
            half_extent: HALF_EXTENT,
        }
    }

    /// The camera pose for this frame.
    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Advance by `dt` seconds of input: turn first, then walk along the
    /// new heading, clipped against solid cells.
    pub fn look_move(&mut self, dt: f32, cmd: InputCmd, map: &GridMap) {
        self.pose.turn(cmd.turn * TURN_RATE * dt);

        if cmd.forward == 0.0 && cmd.strafe == 0.0 {
            return;
        }
        let wish = self
            .pose
            .rotate(vec2(cmd.strafe, cmd.forward))
            .normalize_or_zero()
            * (self.move_speed * dt);

        let step = self.clip_move(wish, map);
        self.pose.pos += step;
    }

    /// Slide rule: if the full step collides, keep whichever single axis
    /// is free (y first), else stand still.
    fn clip_move(&self, step: Vec2, map: &GridMap) -> Vec2 {
        let old = self.pose.pos;
        let new = old + step;
        let h = self.half_extent;

        if !map.collide(new.x, new.y, h, h) {
            step
        } else if !map.collide(old.x, new.y, h, h) {
            vec2(0.0, step.y)
        } else if !map.collide(new.x, old.y, h, h) {
            vec2(step.x, 0.0)
        } else {
            Vec2::ZERO
        }
    }
}
