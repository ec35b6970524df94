use std::io::{self, Write};

use thiserror::Error;

use crate::{
    renderer::{PixelSink, Rgba},
    world::Rgb,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame must be at least 1×1, got {width}×{height}")]
    EmptyFrame { width: usize, height: usize },
}

/// Row-major `0x00RRGGBB` buffer, the layout `minifb` presents directly.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width * height],
        })
    }

    pub fn clear(&mut self, colour: Rgb) {
        self.pixels.fill(colour.to_u32());
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        Rgb::from_u32(self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Binary PPM (P6) dump.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let c = Rgb::from_u32(px);
            bytes.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out.write_all(&bytes)?;
        out.flush()
    }
}

impl PixelSink for FrameBuffer {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn put_rgb(&mut self, x: usize, y: usize, r: u8, g: u8, b: u8) {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x] = Rgb::new(r, g, b).to_u32();
    }
}
