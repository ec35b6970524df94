use glam::{Vec2, Vec3};

use crate::{
    renderer::{PixelSink, software::Software},
    world::{HitResult, Pose, RayCastMap},
};

use super::shade::put_rgb_shade;

/// Everything one column needs to paint its wall slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct WallSlice {
    /// Perpendicular distance, also the column's depth.
    pub dist: f32,
    /// Horizontal texture coordinate across the wall face.
    pub u: f32,
    /// Unclipped screen rows; rows strictly between them are wall.
    pub top: f32,
    pub bottom: f32,
    /// Vertical texture coordinate before the first visible row.
    pub v_start: f32,
    pub v_step: f32,
}

impl WallSlice {
    pub fn from_hit(hit: &HitResult, origin: Vec2, dir: Vec2, width_f: f32, half_h: f32) -> Self {
        let (dist, u) = if hit.side {
            (hit.y_dist, (origin.y + hit.y_dist * dir.y - hit.y_map).abs())
        } else {
            (hit.x_dist, (origin.x + hit.x_dist * dir.x - hit.x_map).abs())
        };

        // half the projected height of a one-unit-tall wall
        let half_px = 0.5 / dist * width_f;
        let top = half_h - half_px;
        let v_step = 0.5 / half_px;

        // top clipped by the screen edge: resume part-way into the texture
        let v_start = if top < 0.0 { -top * v_step } else { 0.0 };

        Self {
            dist,
            u,
            top,
            bottom: half_h + half_px,
            v_start,
            v_step,
        }
    }

    #[inline]
    fn covers(&self, y: f32) -> bool {
        y > self.top && y < self.bottom
    }
}

impl Software {
    /// Walls, floor and ceiling for every column. Writes `depth[x]` once
    /// per column; floor and ceiling rows never look at it.
    pub(super) fn render_environment<M, S>(&mut self, sink: &mut S, map: &M, pose: &Pose)
    where
        M: RayCastMap + ?Sized,
        S: PixelSink + ?Sized,
    {
        for x in 0..self.width {
            let x_cam = (x as f32 - self.half_w) / self.width_f;
            let ray_dir = pose.ray_dir(x_cam);

            let hit = map.cast_ray(pose.pos, ray_dir);
            let slice = WallSlice::from_hit(&hit, pose.pos, ray_dir, self.width_f, self.half_h);

            self.depth[x] = slice.dist;

            let r = (slice.u * 255.0).floor();
            let mut v = slice.v_start;

            for y in 0..self.height {
                if slice.covers(y as f32) {
                    v += slice.v_step;
                    let colour = Vec3::new(r, (v * 255.0).floor(), 255.0);
                    put_rgb_shade(sink, x, y, slice.dist, colour);
                } else {
                    let (z, colour) = self.plane_texel(pose, ray_dir, y);
                    put_rgb_shade(sink, x, y, z, colour);
                }
            }
        }
    }

    /// Floor/ceiling sample for row `y` along `ray_dir`.
    ///
    /// Floor and ceiling share one formula; only the sign of the row
    /// offset differs and it is discarded. The pattern is the world point's
    /// fraction at 1/256 resolution, so it tiles once per map unit.
    fn plane_texel(&self, pose: &Pose, ray_dir: Vec2, y: usize) -> (f32, Vec3) {
        let y_cam = (y as f32 - self.half_h) / self.width_f;
        let z = (0.5 / y_cam).abs();

        let p = pose.pos + ray_dir * z;
        // saturating casts: NaN/∞ at the horizon land on a fixed texel
        let texel = |c: f32| ((c * 256.0).floor() as i32 & 255) as f32;

        (z, Vec3::new(texel(p.x), texel(p.y), 255.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use pretty_assertions::assert_eq;

    fn hit(side: bool, x_dist: f32, y_dist: f32, x_map: f32, y_map: f32) -> HitResult {
        HitResult {
            x_dist,
            y_dist,
            x_map,
            y_map,
            side,
        }
    }

    #[test]
    fn side_selects_distance_and_texture_axis() {
        let origin = vec2(1.25, 3.5);
        let dir = vec2(0.5, 1.0);

        let along_x = WallSlice::from_hit(&hit(false, 2.0, 9.0, 2.0, 5.0), origin, dir, 100.0, 50.0);
        assert_eq!(along_x.dist, 2.0);
        assert_eq!(along_x.u, 0.25); // 1.25 + 2·0.5 − 2

        let along_y = WallSlice::from_hit(&hit(true, 9.0, 1.0, 2.0, 4.0), origin, dir, 100.0, 50.0);
        assert_eq!(along_y.dist, 1.0);
        assert_eq!(along_y.u, 0.5); // 3.5 + 1·1 − 4
    }

    #[test]
    fn slice_projection() {
        let s = WallSlice::from_hit(&hit(false, 4.0, 0.0, 0.0, 0.0), Vec2::ZERO, Vec2::Y, 320.0, 100.0);
        // half height = 0.5 / 4 · 320 = 40
        assert_eq!((s.top, s.bottom), (60.0, 140.0));
        assert_eq!(s.v_step, 0.5 / 40.0);
        assert_eq!(s.v_start, 0.0);
        assert!(!s.covers(60.0));
        assert!(s.covers(60.5));
        assert!(!s.covers(140.0));
    }

    #[test]
    fn clipped_slice_starts_mid_texture() {
        let s = WallSlice::from_hit(&hit(false, 0.25, 0.0, 0.0, 0.0), Vec2::ZERO, Vec2::Y, 320.0, 100.0);
        // half height 640 → top −540; the first row sits 540 rows into it
        assert_eq!(s.top, -540.0);
        assert_eq!(s.v_start, 540.0 * s.v_step);
        // the visible part still sweeps the remaining fraction exactly
        let last = s.v_start + 200.0 * s.v_step;
        assert!((last - (740.0 / 1280.0)).abs() < 1e-5);
    }

    #[test]
    fn unbounded_distance_leaves_no_wall_rows() {
        let s = WallSlice::from_hit(
            &hit(false, f32::INFINITY, 0.0, 0.0, 0.0),
            Vec2::ZERO,
            Vec2::Y,
            320.0,
            100.0,
        );
        assert_eq!((s.top, s.bottom), (100.0, 100.0));
        assert!((0..200).all(|y| !s.covers(y as f32)));
    }
}
