//! Gridded raster engine.
//!
//! This crate reads and writes the binary grid format, loads cell values
//! lazily, and provides NoData-aware algebra between grids of differing
//! extents and resolutions.
//!
//! - **Codec**: single- and double-precision headers, single-precision writer
//! - **Lazy loading**: values are read on first access and re-clipped to the
//!   extent requested at read time
//! - **Constant grids**: one value over an unbounded extent, so scalars flow
//!   through the same operators as grids
//! - **Algebra**: arithmetic, comparison, logic, selection and replacement
//!
//! # Architecture
//!
//! ```text
//! GridReader::read()                 Grid::write_file()
//!      │                                    ▲
//!      ▼                                    │
//! GridHeader ──► Grid { Dense | Constant } ─┘
//!                  │
//!                  ├─► clip / enlarge / window / scale
//!                  │
//!                  └─► algebra::combine
//!                         │
//!                         ├─► constant x constant: analytic
//!                         ├─► constant x dense: per-cell map
//!                         ├─► same geometry: index-wise
//!                         └─► otherwise: CellIterator over the union
//! ```
//!
//! # Example
//!
//! ```no_run
//! use raster_grid::GridReader;
//!
//! let elevation = GridReader::open("elevation.grd").lazy(true).read()?;
//! let mut high = elevation.is_greater_scalar(1500.0)?;
//! high.write_file("high.grd")?;
//! # Ok::<(), raster_grid::RasterError>(())
//! ```

mod algebra;
pub mod config;
pub mod error;
pub mod feature;
mod grid;
pub mod io;
pub mod iterator;
pub mod types;

pub use config::GridConfig;
pub use error::{RasterError, Result};
pub use feature::{CellContribution, FeatureRasterizer};
pub use grid::{Grid, CONSTANT_CELL_SIZE, CONSTANT_EXTENT, DEFAULT_NO_DATA};
pub use io::{CellReader, GridHeader, GridReader, Precision};
pub use iterator::CellIterator;
pub use types::{
    ExtentPolicy, GridInfo, SampleMode, ScaleDownMethod, ScaleUpMethod, VerticalInterval,
};

pub use raster_common::{Extent, ValueRange};
