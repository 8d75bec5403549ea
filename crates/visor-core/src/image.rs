//! Image buffers, pixel density and colors.
//!
//! An [`Image`] is an immutable pixel buffer as delivered by a screen
//! provider: tightly packed rows of RGB or RGBA bytes, together with the
//! pixel density that maps logical coordinates to physical pixels on
//! high-DPI displays.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Ratio between logical and physical pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelDensity {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl PixelDensity {
    /// Create a new pixel density.
    pub const fn new(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y }
    }
}

impl Default for PixelDensity {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// An RGBA color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Hex representation, e.g. `#ff00aaff`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl std::fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// File format for persisted captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// An immutable pixel buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Identifier used as hook-registry key and in diagnostics
    /// (typically the template's file name).
    pub id: String,
    /// Width in physical pixels
    pub width: u32,
    /// Height in physical pixels
    pub height: u32,
    /// Tightly packed pixel rows, RGB or RGBA depending on `channels`
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Number of channels per pixel (3 or 4)
    pub channels: u8,
    /// Logical-to-physical coordinate scaling
    pub pixel_density: PixelDensity,
}

impl Image {
    /// Create a new image, validating channel count and buffer length.
    pub fn new(
        id: impl Into<String>,
        width: u32,
        height: u32,
        data: Vec<u8>,
        channels: u8,
        pixel_density: PixelDensity,
    ) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(Error::InvalidArgument(format!(
                "Images must have 3 or 4 channels, got {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "Pixel buffer length {} does not match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        Ok(Self {
            id: id.into(),
            width,
            height,
            data,
            channels,
            pixel_density,
        })
    }

    /// Returns `true` if the image carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Color of the pixel at a logical coordinate.
    ///
    /// The point is scaled by the image's pixel density before indexing,
    /// so callers pass logical screen coordinates even on high-DPI
    /// displays. Images without an alpha channel report full opacity.
    pub fn color_at(&self, point: Point) -> Result<RgbaColor> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "Non-finite pixel coordinate {}",
                point
            )));
        }
        let x = (point.x * self.pixel_density.scale_x).floor();
        let y = (point.y * self.pixel_density.scale_y).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return Err(Error::InvalidArgument(format!(
                "Pixel coordinate {} is outside of image dimensions ({}x{})",
                point, self.width, self.height
            )));
        }
        let index = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        let pixel = &self.data[index..index + self.channels as usize];
        let a = if self.has_alpha() { pixel[3] } else { u8::MAX };
        Ok(RgbaColor::new(pixel[0], pixel[1], pixel[2], a))
    }
}
