// Format-agnostic repository of RGB textures.
// The renderer samples through `TextureSource`; world logic refers to
// textures by `TextureId` only.

use std::collections::HashMap;

use glam::Vec3;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// One 8-bit-per-channel colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn from_u32(px: u32) -> Self {
        Self::new((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }

    /// Channels as floats, ready for shading.
    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32)
    }
}

/// Anything the sprite path can pull colours from.
///
/// `u` and `v` are normalized; callers may pass values slightly outside
/// `[0, 1)` at the edges of a clipped quad, so implementations clamp.
pub trait TextureSource {
    fn sample(&self, u: f32, v: f32) -> Rgb;
}

impl<F> TextureSource for F
where
    F: Fn(f32, f32) -> Rgb,
{
    #[inline]
    fn sample(&self, u: f32, v: f32) -> Rgb {
        self(u, v)
    }
}

/// Procedural `(u·255, v·255, 255)` colouring, handy for debugging sprite
/// texture coordinates.
pub fn uv_gradient(u: f32, v: f32) -> Rgb {
    let ch = |t: f32| (t * 255.0).floor().clamp(0.0, 255.0) as u8;
    Rgb::new(ch(u), ch(v), 255)
}

/// CPU-side storage in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgb>,
}

/// Convenience checkerboard 8×8 (magenta/black).
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, Rgb::new(255, 0, 255), Rgb::BLACK)
    }
}

impl Texture {
    /// Square checkerboard of `size`×`size` single-pixel cells.
    pub fn checker<S: Into<String>>(name: S, size: usize, light: Rgb, dark: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                pixels.push(if (x ^ y) & 1 == 0 { light } else { dark });
            }
        }
        Texture {
            name: name.into(),
            w: size,
            h: size,
            pixels,
        }
    }

    pub fn solid<S: Into<String>>(name: S, colour: Rgb) -> Self {
        Texture {
            name: name.into(),
            w: 1,
            h: 1,
            pixels: vec![colour],
        }
    }

    /// Bake any `TextureSource` into a `w`×`h` texel grid, sampling texel
    /// centres.
    pub fn bake<S: Into<String>, T: TextureSource + ?Sized>(
        name: S,
        w: usize,
        h: usize,
        src: &T,
    ) -> Self {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            let v = (y as f32 + 0.5) / h as f32;
            for x in 0..w {
                let u = (x as f32 + 0.5) / w as f32;
                pixels.push(src.sample(u, v));
            }
        }
        Texture {
            name: name.into(),
            w,
            h,
            pixels,
        }
    }

    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.w + x]
    }
}

impl TextureSource for Texture {
    /// Nearest-texel lookup, clamped to the texture edges.
    fn sample(&self, u: f32, v: f32) -> Rgb {
        if self.pixels.is_empty() {
            return Rgb::BLACK;
        }
        // `as usize` saturates: negatives and NaN land on 0
        let x = ((u * self.w as f32) as usize).min(self.w - 1);
        let y = ((v * self.h as f32) as usize).min(self.h - 1);
        self.texel(x, y)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel vector does not match `w * h`.
    #[error("texture `{name}` has {found} pixels, expected {expected}")]
    BadSize {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PNG or any file format — that’s the loader’s job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::default_with_checker()
    }
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Borrow a texture by id, falling back to the checkerboard.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[0])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel
    ///   count disagrees with the dimensions (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadSize {
                name,
                expected: tex.w * tex.h,
                found: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dummy_tex(colour: Rgb) -> Texture {
        Texture {
            name: "Dummy".to_string(),
            w: 2,
            h: 2,
            pixels: vec![colour; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(Rgb::new(255, 0, 0))).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(Rgb::new(0, 0, 255))).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.id_or_missing("NOPE"), NO_TEXTURE);

        assert_eq!(bank.texture(red).unwrap().pixels[0], Rgb::new(255, 0, 0));
        assert_eq!(bank.texture(blue).unwrap().pixels[0], Rgb::new(0, 0, 255));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(Rgb::WHITE)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(Rgb::BLACK)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn mis_sized_texture_rejected() {
        let mut bank = TextureBank::default_with_checker();
        let mut tex = dummy_tex(Rgb::WHITE);
        tex.pixels.pop();
        let err = bank.insert("SHORT", tex).unwrap_err();
        assert_eq!(
            err,
            TextureError::BadSize {
                name: "SHORT".into(),
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn nearest_sampling_clamps_edges() {
        let tex = Texture::checker("C", 2, Rgb::WHITE, Rgb::BLACK);
        assert_eq!(tex.sample(0.0, 0.0), Rgb::WHITE);
        assert_eq!(tex.sample(0.75, 0.0), Rgb::BLACK);
        assert_eq!(tex.sample(0.75, 0.75), Rgb::WHITE);
        // outside the unit square → nearest edge texel
        assert_eq!(tex.sample(-0.3, 0.0), Rgb::WHITE);
        assert_eq!(tex.sample(1.4, 0.0), Rgb::BLACK);
        assert_eq!(tex.sample(f32::NAN, 0.0), Rgb::WHITE);
    }

    #[test]
    fn closures_are_sources() {
        let red = |_: f32, _: f32| Rgb::new(255, 0, 0);
        assert_eq!(red.sample(0.3, 0.9), Rgb::new(255, 0, 0));
        assert_eq!(uv_gradient(0.5, 1.0), Rgb::new(127, 255, 255));
        assert_eq!(uv_gradient(-1.0, 2.0), Rgb::new(0, 255, 255));
    }

    #[test]
    fn bake_samples_texel_centres() {
        let tex = Texture::bake("G", 2, 2, &uv_gradient);
        assert_eq!(tex.texel(0, 0), Rgb::new(63, 63, 255));
        assert_eq!(tex.texel(1, 1), Rgb::new(191, 191, 255));
    }

    #[test]
    fn rgb_packs_as_xrgb() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_u32(), 0x00_123456);
        assert_eq!(Rgb::from_u32(0xFF_123456), c);
    }
}
