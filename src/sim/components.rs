use glam::Vec2;

use crate::world::TextureId;

/// World-space position in map units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Which bank texture a billboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRef(pub TextureId);

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
}
