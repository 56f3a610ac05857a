use crate::core::error::{PlotError, PlotResult};

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const GREY: Rgb = [145, 145, 145];
pub const LIGHT_GREY: Rgb = [211, 211, 211];
pub const DARK_YELLOW: Rgb = [204, 204, 0];
pub const RED: Rgb = [255, 0, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const NAVY: Rgb = [0, 0, 153];
pub const MAROON: Rgb = [128, 0, 0];
pub const GREEN: Rgb = [0, 128, 0];
pub const ORANGE: Rgb = [255, 165, 0];

/// Row-major RGB pixel grid, origin top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Raster {
    pub fn new(width: usize, height: usize, fill: Rgb) -> PlotResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlotError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Fills the half-open rectangle `[x0, x1) x [y0, y1)`, clipped to the raster.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: Rgb) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.pixels[y * self.width + x] = color;
            }
        }
    }

    /// Outlines the rectangle with left/top corner `(x0, y0)` and the given size.
    pub fn draw_box(&mut self, x0: usize, y0: usize, w: usize, h: usize, color: Rgb) {
        if w == 0 || h == 0 {
            return;
        }
        let (x1, y1) = (x0 + w - 1, y0 + h - 1);
        for x in x0..=x1 {
            self.set(x, y0, color);
            self.set(x, y1, color);
        }
        for y in y0..=y1 {
            self.set(x0, y, color);
            self.set(x1, y, color);
        }
    }

    /// Packed `RGBRGB...` bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }
}
