//! Single-cell reads without loading the value block.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Buf;
use tracing::debug;

use super::header::{GridHeader, Precision};
use crate::error::{RasterError, Result};

/// An open grid file for spot queries.
#[derive(Debug)]
pub struct CellReader {
    path: PathBuf,
    file: BufReader<File>,
    header: GridHeader,
}

impl CellReader {
    /// Open `path` and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| RasterError::io(&path, e))?;
        let mut file = BufReader::new(file);
        let header = GridHeader::read(&mut file, &path)?;
        debug!(path = %path.display(), "Opened grid for random access");
        Ok(Self { path, file, header })
    }

    pub fn header(&self) -> &GridHeader {
        &self.header
    }

    /// Value at `(row, column)`. Positions outside the grid yield NoData.
    pub fn read_cell(&mut self, row: usize, column: usize) -> Result<f32> {
        if row >= self.header.rows || column >= self.header.columns {
            return Ok(self.header.no_data);
        }

        let offset = self.header.value_offset(row, column);
        self.file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| RasterError::io(&self.path, e))?;

        let width = self.header.precision.value_width();
        let mut raw = [0u8; 8];
        self.file
            .read_exact(&mut raw[..width])
            .map_err(|e| RasterError::io(&self.path, e))?;

        let mut buf = &raw[..width];
        Ok(match self.header.precision {
            Precision::Single => buf.get_f32_le(),
            Precision::Double => buf.get_f64_le() as f32,
        })
    }

    /// Close the file.
    pub fn close(self) {
        debug!(path = %self.path.display(), "Closed grid");
    }
}
