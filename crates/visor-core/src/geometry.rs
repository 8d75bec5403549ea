//! Geometric value types: points, sizes and regions.
//!
//! All types are immutable plain values with structural equality.
//! Coordinates are logical screen coordinates; conversion to physical
//! pixels happens through [`crate::image::PixelDensity`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum edge length (in pixels) for a usable search region.
pub const MIN_SEARCH_REGION_EDGE: f64 = 2.0;

/// A point on the screen or within an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area covered by this size.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}x{})", self.width, self.height)
    }
}

/// An axis-aligned rectangular screen area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    /// Create a new region.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner of the region.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Size of the region.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Center point of the region.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Returns `true` if all components are finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Returns `true` if any component is negative.
    pub fn has_negative_component(&self) -> bool {
        self.left < 0.0 || self.top < 0.0 || self.width < 0.0 || self.height < 0.0
    }

    /// Returns `true` if `other` lies entirely within this region.
    pub fn contains_region(&self, other: &Region) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns `true` if `point` lies within this region.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// This region shifted so that its coordinates become absolute within
    /// `outer`. Width and height are preserved.
    ///
    /// Used to translate finder results (relative to the grabbed search
    /// region) back into absolute screen coordinates.
    pub fn translated_into(&self, outer: &Region) -> Region {
        Region::new(
            outer.left + self.left,
            outer.top + self.top,
            self.width,
            self.height,
        )
    }

    /// Validate this region for use as a search area within `screen`.
    ///
    /// Fails fast with a descriptive reason when the region has NaN or
    /// infinite components, negative components, is smaller than the
    /// minimum matchable size, or extends beyond the screen bounds.
    pub fn validate_as_search_region(&self, screen: &Region) -> Result<()> {
        if !self.is_finite() {
            return Err(Error::InvalidSearchRegion(format!(
                "NaN or non-finite values in search region {}",
                self
            )));
        }
        if self.has_negative_component() {
            return Err(Error::InvalidSearchRegion(format!(
                "Negative values in search region {}",
                self
            )));
        }
        if self.width < MIN_SEARCH_REGION_EDGE || self.height < MIN_SEARCH_REGION_EDGE {
            return Err(Error::InvalidSearchRegion(format!(
                "Search region {} is smaller than the minimum matchable size of {}x{}",
                self, MIN_SEARCH_REGION_EDGE, MIN_SEARCH_REGION_EDGE
            )));
        }
        if !screen.contains_region(self) {
            return Err(Error::InvalidSearchRegion(format!(
                "Search region {} extends beyond screen boundaries {}",
                self, screen
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Region {
    // This format appears verbatim in validation error messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.top, self.width, self.height
        )
    }
}
