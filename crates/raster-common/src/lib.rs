//! Geometry and value-range primitives shared across the raster workspace.

pub mod extent;
pub mod range;

pub use extent::{approx_eq, Extent, ExtentParseError, COORD_EPSILON};
pub use range::{RangeParseError, ValueRange};
