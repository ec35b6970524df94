mod components;
mod player;

pub use components::{InputCmd, Position, SpriteRef};
pub use player::{HALF_EXTENT, MOVE_SPEED, Player, TURN_RATE};

use glam::Vec2;
use hecs::{Entity, World};

use crate::world::TextureId;

/// Spawn a static billboard entity and return its handle.
#[inline]
pub fn spawn_prop(world: &mut World, pos: Vec2, tex: TextureId) -> Entity {
    world.spawn((Position(pos), SpriteRef(tex)))
}
