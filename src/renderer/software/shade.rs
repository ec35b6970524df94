//! Distance shading: the single funnel every rendered pixel goes through.

use glam::Vec3;

use crate::{renderer::PixelSink, world::Rgb};

/// Light falloff `min(1/depth, 1)`.
///
/// Depths that are not strictly positive (including `NaN`) count as fully
/// lit; `+∞` is fully dark.
#[inline]
pub fn brightness(depth: f32) -> f32 {
    if depth > 0.0 {
        (1.0 / depth).min(1.0)
    } else {
        1.0
    }
}

/// Attenuate a float colour by `depth` and clamp every channel into
/// `0..=255`. Channels are truncated towards −∞ before clamping.
#[inline]
pub fn shade(depth: f32, colour: Vec3) -> Rgb {
    let lit = colour * brightness(depth);
    // NaN survives clamp and saturates to 0 in the cast
    let ch = |c: f32| c.floor().clamp(0.0, 255.0) as u8;
    Rgb::new(ch(lit.x), ch(lit.y), ch(lit.z))
}

#[inline]
pub fn put_rgb_shade<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: usize,
    y: usize,
    depth: f32,
    colour: Vec3,
) {
    let c = shade(depth, colour);
    sink.put_rgb(x, y, c.r, c.g, c.b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn near_pixels_are_fully_lit() {
        assert_eq!(brightness(0.5), 1.0);
        assert_eq!(brightness(1.0), 1.0);
        assert_eq!(brightness(0.0), 1.0);
        assert_eq!(brightness(-3.0), 1.0);
        assert_eq!(brightness(f32::NAN), 1.0);
        assert_eq!(brightness(f32::INFINITY), 0.0);
        assert_eq!(brightness(4.0), 0.25);
    }

    #[test]
    fn channels_always_clamped() {
        let wild = Vec3::new(-40.0, 1.0e9, f32::NAN);
        assert_eq!(shade(1.0, wild), Rgb::new(0, 255, 0));
        assert_eq!(shade(0.0, Vec3::splat(300.0)), Rgb::WHITE);
        assert_eq!(shade(2.0, Vec3::new(255.0, 101.0, 1.0)), Rgb::new(127, 50, 0));
        assert_eq!(shade(f32::INFINITY, Vec3::splat(255.0)), Rgb::BLACK);
    }

    #[test]
    fn shading_never_brightens_with_distance() {
        let colours = [
            Vec3::new(255.0, 128.0, 3.0),
            Vec3::new(1000.0, -5.0, 77.7),
            Vec3::splat(254.9),
        ];
        let depths: Vec<f32> = (-8..200).map(|i| i as f32 * 0.173).collect();
        for c in colours {
            for pair in depths.windows(2) {
                let near = shade(pair[0], c);
                let far = shade(pair[1], c);
                assert!(far.r <= near.r && far.g <= near.g && far.b <= near.b);
            }
        }
    }

    #[test]
    fn writes_through_sink() {
        struct One(Option<(usize, usize, Rgb)>);
        impl PixelSink for One {
            fn width(&self) -> usize {
                1
            }
            fn height(&self) -> usize {
                1
            }
            fn put_rgb(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
                self.0 = Some((x, y, Rgb::new(r, g, b)));
            }
        }

        let mut sink = One(None);
        put_rgb_shade(&mut sink, 0, 0, 5.0, Vec3::new(255.0, 255.0, 255.0));
        assert_eq!(sink.0, Some((0, 0, Rgb::new(51, 51, 51))));
    }
}
