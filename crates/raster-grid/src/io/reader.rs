//! Reading grid files, eagerly or lazily.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use bytes::Buf;
use once_cell::unsync::OnceCell;
use raster_common::Extent;
use tracing::{debug, warn};

use super::header::{read_bytes, GridHeader, Precision};
use crate::config::GridConfig;
use crate::error::{RasterError, Result};
use crate::grid::{Cells, Grid, LazySource};

/// Builder for reading a grid file.
///
/// ```no_run
/// use raster_grid::{Extent, GridReader};
///
/// let grid = GridReader::open("elevation.grd")
///     .lazy(true)
///     .extent(Extent::new(0.0, 0.0, 500.0, 500.0))
///     .read()?;
/// # Ok::<(), raster_grid::RasterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridReader {
    path: PathBuf,
    lazy: Option<bool>,
    extent: Option<Extent>,
    config: GridConfig,
}

impl GridReader {
    /// Start reading `path`. Nothing is opened until [`GridReader::read`].
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lazy: None,
            extent: None,
            config: GridConfig::default(),
        }
    }

    /// Defer loading values until first access. Overrides the config.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    /// Restrict (or widen) the grid to `extent`, snapped to whole cells.
    pub fn extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse the header and, unless lazy, the values.
    pub fn read(self) -> Result<Grid> {
        self.config.validate()?;
        let lazy = self.lazy.unwrap_or(self.config.lazy_load);

        let file = File::open(&self.path).map_err(|e| RasterError::io(&self.path, e))?;
        let mut reader = BufReader::new(file);
        let header = GridHeader::read(&mut reader, &self.path)?;

        debug!(
            path = %self.path.display(),
            columns = header.columns,
            rows = header.rows,
            precision = ?header.precision,
            lazy,
            "Read grid header"
        );

        if Grid::is_constant_geometry(
            header.columns,
            header.rows,
            header.cell_size_x,
            header.cell_size_y,
            self.config.constant_cell_size_threshold,
        ) {
            let values = read_values(&mut reader, &header, &self.path)?;
            let value = values.first().copied().unwrap_or(header.no_data);
            let mut grid = Grid::constant_with_no_data(value, header.no_data);
            grid.interval = header.vertical_interval;
            debug!(path = %self.path.display(), value, "Read constant grid");
            return Ok(grid);
        }

        let on_disk = Grid::new(
            header.extent,
            header.cell_size_x,
            header.cell_size_y,
            header.no_data,
        )?;

        let requested = match self.extent {
            Some(extent) => {
                let overlaps = extent
                    .intersection(&header.extent)
                    .is_some_and(|overlap| !on_disk.snap_extent(&overlap).is_empty());
                if !overlaps {
                    return Err(RasterError::no_overlap(extent, header.extent));
                }
                let snapped = on_disk.snap_extent(&extent);
                (!snapped.approx_eq(&header.extent)).then_some(snapped)
            }
            None => None,
        };

        let mut grid = match requested {
            Some(target) => Grid::new(target, header.cell_size_x, header.cell_size_y, header.no_data)?,
            None => on_disk,
        };
        grid.min = header.min;
        grid.max = header.max;
        grid.interval = header.vertical_interval;

        if !lazy {
            let values = read_values(&mut reader, &header, &self.path)?;
            grid.cells = Cells::Dense(OnceCell::with_value(fit_to_request(
                &header, values, requested,
            )?));
            if requested.is_some() {
                grid.recompute_min_max()?;
            }
        }
        grid.source = Some(LazySource {
            path: self.path,
            requested,
        });

        Ok(grid)
    }
}

impl Grid {
    /// Read a grid file with default configuration.
    pub fn read_file(path: impl AsRef<Path>, lazy: bool) -> Result<Grid> {
        GridReader::open(path).lazy(lazy).read()
    }
}

/// Read the value block following `header`.
fn read_values<R: Read>(reader: &mut R, header: &GridHeader, path: &Path) -> Result<Vec<f32>> {
    let count = header.cell_count();
    let bytes = read_bytes(reader, count * header.precision.value_width(), path)?;
    let mut buf = &bytes[..];

    let values = match header.precision {
        Precision::Single => (0..count).map(|_| buf.get_f32_le()).collect(),
        Precision::Double => {
            warn!(
                path = %path.display(),
                "Narrowing double-precision cell values to single precision"
            );
            (0..count).map(|_| buf.get_f64_le() as f32).collect()
        }
    };
    Ok(values)
}

/// Window the on-disk values onto the requested extent, if any.
fn fit_to_request(
    header: &GridHeader,
    values: Vec<f32>,
    requested: Option<Extent>,
) -> Result<Vec<f32>> {
    let Some(target) = requested else {
        return Ok(values);
    };
    let mut on_disk = Grid::new(
        header.extent,
        header.cell_size_x,
        header.cell_size_y,
        header.no_data,
    )?;
    on_disk.set_values(values);
    on_disk.window(&target, None)?.into_values()
}

/// Load the values of a lazily read grid from its backing file.
///
/// The header is parsed again and the requested extent re-applied on every
/// call.
pub(crate) fn load_source(grid: &Grid, source: &LazySource) -> Result<Vec<f32>> {
    debug!(
        path = %source.path.display(),
        requested = ?source.requested,
        "Lazy-loading grid values"
    );

    let file = File::open(&source.path).map_err(|e| RasterError::io(&source.path, e))?;
    let mut reader = BufReader::new(file);
    let header = GridHeader::read(&mut reader, &source.path)?;
    let values = read_values(&mut reader, &header, &source.path)?;
    let values = fit_to_request(&header, values, source.requested)?;

    if values.len() != grid.len() {
        return Err(RasterError::format(format!(
            "{} changed on disk: expected {} cells, found {}",
            source.path.display(),
            grid.len(),
            values.len()
        )));
    }
    Ok(values)
}
