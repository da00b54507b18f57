//! Writing grid files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use bytes::{BufMut, BytesMut};
use tracing::debug;

use super::header::{GridHeader, Precision};
use crate::config::GridConfig;
use crate::error::{RasterError, Result};
use crate::grid::{Grid, CONSTANT_CELL_SIZE, CONSTANT_EXTENT};

impl Grid {
    /// Write the grid in the single-precision layout with default config.
    pub fn write_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_file_with(path, &GridConfig::default())
    }

    /// Write the grid in the single-precision layout.
    ///
    /// Values are loaded and min/max recomputed first. A file held open by
    /// another process fails with [`RasterError::FileInUse`].
    pub fn write_file_with(&mut self, path: impl AsRef<Path>, config: &GridConfig) -> Result<()> {
        let path = path.as_ref();
        self.ensure_loaded()?;
        self.recompute_min_max()?;

        if config.verify_min_max_on_write {
            self.verify_min_max()?;
        }

        let header = self.header();
        let values = self.values()?;

        let mut buf = BytesMut::with_capacity(header.byte_len() + values.len() * 4);
        header.encode_single(&mut buf)?;
        for value in values {
            buf.put_f32_le(*value);
        }

        let mut file = File::create(path).map_err(|e| RasterError::io(path, e))?;
        file.write_all(&buf).map_err(|e| RasterError::io(path, e))?;
        file.flush().map_err(|e| RasterError::io(path, e))?;

        debug!(
            path = %path.display(),
            columns = header.columns,
            rows = header.rows,
            bytes = buf.len(),
            "Wrote grid"
        );
        Ok(())
    }

    /// Header describing this grid in the single-precision layout.
    pub fn header(&self) -> GridHeader {
        let (extent, cell_size) = if self.is_constant() {
            (CONSTANT_EXTENT, (CONSTANT_CELL_SIZE, CONSTANT_CELL_SIZE))
        } else {
            (self.extent, (self.cell_size_x, self.cell_size_y))
        };
        GridHeader {
            precision: Precision::Single,
            columns: self.columns,
            rows: self.rows,
            extent,
            min: self.min,
            max: self.max,
            no_data: self.no_data,
            cell_size_x: cell_size.0,
            cell_size_y: cell_size.1,
            vertical_interval: self.interval,
        }
    }

    fn verify_min_max(&self) -> Result<()> {
        let (min, max) = (self.min, self.max);
        let outlier = self
            .values()?
            .iter()
            .copied()
            .filter(|v| !self.is_no_data(*v))
            .find(|v| !(min <= *v && *v <= max));

        match outlier {
            Some(value) => Err(RasterError::Corrupt { value, min, max }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::Extent;

    #[test]
    fn test_constant_header_geometry() {
        let header = Grid::constant(2.0).header();
        assert_eq!(header.columns, 1);
        assert_eq!(header.extent, CONSTANT_EXTENT);
        assert_eq!(header.cell_size_x, CONSTANT_CELL_SIZE);
        assert_eq!((header.min, header.max), (2.0, 2.0));
    }

    #[test]
    fn test_nan_cell_fails_corruption_guard() {
        let mut grid = Grid::from_values(
            Extent::new(0.0, 0.0, 2.0, 1.0),
            1.0,
            1.0,
            -9999.0,
            vec![1.0, 2.0],
        )
        .unwrap();
        grid.values_mut().unwrap()[1] = f32::NAN;
        grid.recompute_min_max().unwrap();
        assert!(matches!(grid.verify_min_max(), Err(RasterError::Corrupt { .. })));
    }

    #[test]
    fn test_guard_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unchecked.grd");
        let mut grid = Grid::from_values(
            Extent::new(0.0, 0.0, 2.0, 1.0),
            1.0,
            1.0,
            -9999.0,
            vec![1.0, f32::NAN],
        )
        .unwrap();

        assert!(matches!(
            grid.write_file(&path),
            Err(RasterError::Corrupt { .. })
        ));

        let config = GridConfig {
            verify_min_max_on_write: false,
            ..GridConfig::default()
        };
        grid.write_file_with(&path, &config).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), grid.header().byte_len() + 8);
    }
}
