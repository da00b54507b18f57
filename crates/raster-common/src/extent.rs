//! Axis-aligned extents and the operations the raster engine needs on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Relative tolerance for coordinates derived from cell arithmetic.
pub const COORD_EPSILON: f64 = 1e-6;

/// Compare two coordinates with a tolerance scaled to their magnitude.
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= COORD_EPSILON * scale
}

/// A rectangular extent in map units.
///
/// `left`/`right` bound the x axis and `bottom`/`top` bound the y axis.
/// Rows of a grid are counted downwards from `top`, columns rightwards
/// from `left`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Extent {
    /// Create an extent from its lower-left and upper-right corners.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Width in map units.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height in map units.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True when the extent covers no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Check whether the two extents share a region of non-zero area.
    pub fn intersects(&self, other: &Extent) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.bottom < other.top
            && self.top > other.bottom
    }

    /// Overlapping region of two extents, if any.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        if !self.intersects(other) {
            return None;
        }

        Some(Extent {
            left: self.left.max(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.min(other.right),
            top: self.top.min(other.top),
        })
    }

    /// Smallest extent covering both.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Check whether `other` lies completely inside this extent.
    ///
    /// Edges are compared with [`approx_eq`] tolerance so extents rebuilt
    /// from cell counts still match their source.
    pub fn contains(&self, other: &Extent) -> bool {
        (other.left >= self.left || approx_eq(other.left, self.left))
            && (other.right <= self.right || approx_eq(other.right, self.right))
            && (other.bottom >= self.bottom || approx_eq(other.bottom, self.bottom))
            && (other.top <= self.top || approx_eq(other.top, self.top))
    }

    /// Half-open point test: `[left, right)` and `[bottom, top)`.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.bottom && y < self.top
    }

    /// Edge-wise comparison with tolerance.
    pub fn approx_eq(&self, other: &Extent) -> bool {
        approx_eq(self.left, other.left)
            && approx_eq(self.bottom, other.bottom)
            && approx_eq(self.right, other.right)
            && approx_eq(self.top, other.top)
    }

    /// Grow the extent by `buffer` on every side.
    pub fn expand(&self, buffer: f64) -> Self {
        Self {
            left: self.left - buffer,
            bottom: self.bottom - buffer,
            right: self.right + buffer,
            top: self.top + buffer,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.bottom, self.right, self.top
        )
    }
}

/// Parse `"left,bottom,right,top"`.
impl FromStr for Extent {
    type Err = ExtentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(ExtentParseError::InvalidFormat(s.to_string()));
        }

        let mut coords = [0.0f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ExtentParseError::InvalidNumber(part.to_string()))?;
        }

        let extent = Extent::new(coords[0], coords[1], coords[2], coords[3]);
        if extent.right < extent.left || extent.top < extent.bottom {
            return Err(ExtentParseError::Inverted(s.to_string()));
        }
        Ok(extent)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtentParseError {
    #[error("Invalid extent format: {0}. Expected 'left,bottom,right,top'")]
    InvalidFormat(String),

    #[error("Invalid number in extent: {0}")]
    InvalidNumber(String),

    #[error("Extent corners are inverted: {0}")]
    Inverted(String),
}
