//! Tile-map raycaster with a CPU column renderer.
//!
//! * [`world`] – poses, the grid map and its ray query, textures.
//! * [`renderer`] – the pixel-sink abstraction and the software renderer.
//! * [`sim`] – player movement and billboard entities.

pub mod renderer;
pub mod sim;
pub mod world;
