//! Rendering abstraction layer.
//!
//! *The core never owns a pixel buffer.* Every draw call writes through a
//! [`PixelSink`], reads geometry through a [`RayCastMap`] and sprite colours
//! through a [`TextureSource`].
//!
//! A frame is one [`Renderer::begin_frame`], one
//! [`Renderer::draw_environment`] and any number of
//! [`Renderer::draw_sprite`] calls. Sprite depth writes are per column, so
//! sprites must arrive **far-to-near**; [`SpriteQueue`] does the sorting.

use glam::Vec2;

use crate::world::{Pose, RayCastMap, TextureSource};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Anything the renderer can paint into.
///
/// Coordinates passed to `put_rgb` are always inside
/// `0..width() × 0..height()`.
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn put_rgb(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8);
}

/// What happened to one sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteCoverage {
    /// On or behind the camera plane; nothing projected.
    Culled,
    /// Projected quad misses the screen.
    Offscreen,
    /// Every covered column already holds something nearer.
    Occluded,
    /// Number of columns the sprite won.
    Drawn { columns: usize },
}

pub trait Renderer {
    /// (Re)allocate per-column scratch for the resolution and reset depth.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Walls, floor and ceiling: paints every pixel of `sink` once.
    fn draw_environment<M, S>(&mut self, sink: &mut S, map: &M, pose: &Pose)
    where
        M: RayCastMap + ?Sized,
        S: PixelSink + ?Sized;

    /// One camera-facing quad at world position `pos`, depth-tested per
    /// column.
    fn draw_sprite<T, S>(
        &mut self,
        sink: &mut S,
        tex: &T,
        pos: Vec2,
        pose: &Pose,
    ) -> SpriteCoverage
    where
        T: TextureSource + ?Sized,
        S: PixelSink + ?Sized;
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<M, S>(
        &mut self,
        sink: &mut S,
        map: &M,
        pose: &Pose,
        sprites: &mut SpriteQueue<'_>,
    ) where
        M: RayCastMap + ?Sized,
        S: PixelSink + ?Sized,
    {
        self.begin_frame(sink.width(), sink.height());
        self.draw_environment(sink, map, pose);
        sprites.flush(self, sink, pose);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

mod frame;
mod scene;
pub mod software;

pub use frame::{FrameBuffer, FrameError};
pub use scene::{SpriteQueue, draw_scene};
pub use software::Software;
