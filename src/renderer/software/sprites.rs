use std::ops::Range;

use glam::Vec2;
use tracing::trace;

use crate::{
    renderer::{PixelSink, SpriteCoverage, software::Software},
    world::{Pose, TextureSource},
};

use super::shade::put_rgb_shade;

/// One axis of a projected sprite quad after clipping to the screen.
#[derive(Clone, Debug, PartialEq)]
struct ClippedSpan {
    pixels: Range<usize>,
    /// Texture coordinate just before the first visible pixel.
    tex_start: f32,
}

impl ClippedSpan {
    /// Clip `[p0, p1)` to `[0, limit)`. Only a cut on the low side moves
    /// the texture start; a cut on the high side just ends the span early.
    fn clip(p0: f32, p1: f32, limit: f32, tex_step: f32) -> Self {
        let tex_start = if p0 < 0.0 { -p0 * tex_step } else { 0.0 };
        // `as usize` saturates: negatives and NaN become 0
        let first = p0.max(0.0).floor() as usize;
        let last = p1.clamp(0.0, limit).floor() as usize;
        Self {
            pixels: first..last.max(first),
            tex_start,
        }
    }
}

impl Software {
    /// Billboard at world `pos`, sampled from `tex` across its full quad.
    ///
    /// Columns whose depth is already nearer than the sprite are skipped
    /// whole; every column the sprite wins takes the sprite's depth.
    pub(super) fn render_sprite<T, S>(
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
        let cam = pose.to_cam(pos);
        // also rejects NaN
        if !(cam.y > 0.0) {
            trace!(x = pos.x, y = pos.y, depth = cam.y, "sprite behind camera");
            return SpriteCoverage::Culled;
        }
        let depth = cam.y;

        let x_screen = cam.x / depth * self.width_f + self.half_w;
        let size = self.width_f / depth;
        let tex_step = 1.0 / size;
        let half = 0.5 * size;

        let cols = ClippedSpan::clip(x_screen - half, x_screen + half, self.width_f, tex_step);
        let rows = ClippedSpan::clip(
            self.half_h - half,
            self.half_h + half,
            self.height as f32,
            tex_step,
        );
        if cols.pixels.is_empty() || rows.pixels.is_empty() {
            return SpriteCoverage::Offscreen;
        }

        let mut u = cols.tex_start;
        let mut columns = 0;
        for x in cols.pixels {
            u += tex_step;

            if self.depth[x] < depth {
                continue;
            }
            self.depth[x] = depth;
            columns += 1;

            let mut v = rows.tex_start;
            for y in rows.pixels.clone() {
                v += tex_step;
                let colour = tex.sample(u, v).as_vec3();
                put_rgb_shade(sink, x, y, depth, colour);
            }
        }

        if columns == 0 {
            SpriteCoverage::Occluded
        } else {
            SpriteCoverage::Drawn { columns }
        }
    }
}
