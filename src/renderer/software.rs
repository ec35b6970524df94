//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Walls come from one map ray per screen column; floor and ceiling are
//!   projected analytically for every row the wall slice does not cover.
//! * A single `f32` per column is the depth buffer. The environment pass
//!   overwrites every column; sprites test against it and write their own
//!   depth into the columns they win.
//! * Every pixel goes through [`shade::put_rgb_shade`], the one place where
//!   distance attenuation happens.
//! ---------------------------------------------------------------------------

use glam::Vec2;
use tracing::debug;

use crate::{
    renderer::{PixelSink, Renderer, SpriteCoverage},
    world::{Pose, RayCastMap, TextureSource},
};

pub mod shade;
mod sprites;
mod walls;

pub use shade::{brightness, put_rgb_shade, shade};

/// Column raycaster with a per-column depth buffer.
#[derive(Default)]
pub struct Software {
    depth: Vec<f32>,

    width: usize,
    height: usize,

    width_f: f32,
    half_w: f32,
    half_h: f32,
}

impl Software {
    /// Renderer for a `width`×`height` target with depth already reset.
    pub fn new(width: usize, height: usize) -> Self {
        let mut sw = Self::default();
        sw.begin_frame(width, height);
        sw
    }

    /// Renderer sized to `sink`.
    pub fn for_sink<S: PixelSink + ?Sized>(sink: &S) -> Self {
        Self::new(sink.width(), sink.height())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current depth per column.
    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    fn resize(&mut self, w: usize, h: usize) {
        debug_assert!(w > 0 && h > 0, "render target must be non-empty");
        debug!(width = w, height = h, "resizing software renderer");
        self.width = w;
        self.height = h;
        self.width_f = w as f32;
        self.half_w = self.width_f * 0.5;
        self.half_h = h as f32 * 0.5;
        self.depth.resize(w, f32::INFINITY);
    }

    /// Keep scratch in step with whatever sink we were handed.
    fn fit_sink<S: PixelSink + ?Sized>(&mut self, sink: &S) {
        if sink.width() != self.width || sink.height() != self.height {
            self.begin_frame(sink.width(), sink.height());
        }
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.resize(w, h);
        }
        // nothing drawn yet: every column is open
        self.depth.fill(f32::INFINITY);
    }

    fn draw_environment<M, S>(&mut self, sink: &mut S, map: &M, pose: &Pose)
    where
        M: RayCastMap + ?Sized,
        S: PixelSink + ?Sized,
    {
        self.fit_sink(sink);
        self.render_environment(sink, map, pose);
    }

    fn draw_sprite<T, S>(
        &mut self,
        sink: &mut S,
        tex: &T,
        pos: Vec2,
        pose: &Pose,
    ) -> SpriteCoverage
    where
        T: TextureSource + ?Sized,
        S: PixelSink + ?Sized,
    {
        self.fit_sink(sink);
        self.render_sprite(sink, tex, pos, pose)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
