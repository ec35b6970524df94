use glam::{Vec2, vec2};

/// Camera view-point in map space.
///
/// * Only **heading** is simulated – the view never tilts up/down.
/// * Heading 0 looks down +Y; positive angles turn towards −X.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub pos: Vec2, // map units
    pub heading: f32, // radians
}

impl Pose {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self { pos, heading }
    }

    /// Rotate a camera-space vector into world space.
    #[inline]
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        let (s, c) = self.heading.sin_cos();
        vec2(v.x * c - v.y * s, v.x * s + v.y * c)
    }

    /// World-space ray through the lateral sample `x_cam` on the unit
    /// near plane: `(x_cam, 1)` rotated by the heading.
    #[inline]
    pub fn ray_dir(&self, x_cam: f32) -> Vec2 {
        self.rotate(vec2(x_cam, 1.0))
    }

    /// Transform a world point `p` into camera-local coords:
    ///  .x = lateral offset (+ right of the view on screen)
    ///  .y = depth along the forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos;
        // rotate by −heading
        let (s, c) = (-self.heading).sin_cos();
        vec2(d.x * c - d.y * s, d.x * s + d.y * c)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        self.rotate(Vec2::Y)
    }

    /// Unit vector pointing towards increasing screen x.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.rotate(Vec2::X)
    }

    /// Rotate in place, keeping the heading in `[0, τ)`.
    pub fn turn(&mut self, delta: f32) {
        self.heading = (self.heading + delta).rem_euclid(std::f32::consts::TAU);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
