//! Binary grid header.
//!
//! All fields are little-endian. The leading record-length discriminator
//! selects the layout:
//!
//! ```text
//! single (1271)       double (2295 | 2296)
//! i32 discriminator   i64 discriminator
//! i32 columns         i64 columns
//! i32 rows            i64 rows
//! f32 left            f64 left
//! f32 right           f64 right
//! f32 bottom          f64 bottom
//! f32 top             f64 top
//! f32 min             f64 min
//! f32 max             f64 max
//! f32 no_data         f64 no_data
//! u8  equidistant     u8  equidistant
//! u8  has_interval    u8  has_interval
//! u8  reserved x2     u8  reserved x2
//!                     4 unused bytes
//! f32 cell_size_x     f64 cell_size_x
//! f32 cell_size_y     f64 cell_size_y
//! [f32 top_level]     [f64 top_level]
//! [f32 bottom_level]  [f64 bottom_level]
//! ```
//!
//! Cell values follow, row-major with the top row first.

use std::io::{ErrorKind, Read};
use std::path::Path;

use bytes::{Buf, BufMut, BytesMut};
use raster_common::Extent;

use crate::error::{RasterError, Result};
use crate::grid::cell_count;
use crate::types::VerticalInterval;

/// Discriminator of the single-precision layout.
pub const SINGLE_PRECISION_MARKER: i32 = 1271;

/// Discriminators of the double-precision layout.
pub const DOUBLE_PRECISION_MARKERS: [i64; 2] = [2295, 2296];

const SINGLE_HEADER_LEN: usize = 52;
const DOUBLE_HEADER_LEN: usize = 104;

/// Field width of a grid file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    /// Bytes per header field and per cell value.
    pub fn value_width(&self) -> usize {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }
}

/// Decoded grid header.
#[derive(Debug, Clone, PartialEq)]
pub struct GridHeader {
    pub precision: Precision,
    pub columns: usize,
    pub rows: usize,
    pub extent: Extent,
    pub min: f32,
    pub max: f32,
    pub no_data: f32,
    pub cell_size_x: f64,
    pub cell_size_y: f64,
    pub vertical_interval: Option<VerticalInterval>,
}

pub(crate) fn read_bytes<R: Read>(reader: &mut R, len: usize, path: &Path) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            RasterError::format(format!("{} is truncated", path.display()))
        } else {
            RasterError::io(path, e)
        }
    })?;
    Ok(buf)
}

fn read_count(value: i64, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| RasterError::format(format!("negative {} count {}", what, value)))
}

impl GridHeader {
    /// Decode a header, leaving `reader` positioned at the first cell value.
    pub fn read<R: Read>(reader: &mut R, path: &Path) -> Result<Self> {
        let lead = read_bytes(reader, 4, path)?;
        let marker = (&lead[..]).get_i32_le();

        let header = if marker == SINGLE_PRECISION_MARKER {
            Self::read_single(reader, path)?
        } else {
            let mut wide = [0u8; 8];
            wide[..4].copy_from_slice(&marker.to_le_bytes());
            wide[4..].copy_from_slice(&read_bytes(reader, 4, path)?);
            let marker = i64::from_le_bytes(wide);
            if !DOUBLE_PRECISION_MARKERS.contains(&marker) {
                return Err(RasterError::format(format!(
                    "unknown record length {} in {}",
                    marker,
                    path.display()
                )));
            }
            Self::read_double(reader, path)?
        };

        header.validate()?;
        Ok(header)
    }

    fn read_single<R: Read>(reader: &mut R, path: &Path) -> Result<Self> {
        let bytes = read_bytes(reader, SINGLE_HEADER_LEN - 4, path)?;
        let mut buf = &bytes[..];

        let columns = read_count(buf.get_i32_le() as i64, "column")?;
        let rows = read_count(buf.get_i32_le() as i64, "row")?;
        let left = buf.get_f32_le() as f64;
        let right = buf.get_f32_le() as f64;
        let bottom = buf.get_f32_le() as f64;
        let top = buf.get_f32_le() as f64;
        let min = buf.get_f32_le();
        let max = buf.get_f32_le();
        let no_data = buf.get_f32_le();
        let has_interval = read_flags(&mut buf, path)?;
        let cell_size_x = buf.get_f32_le() as f64;
        let cell_size_y = buf.get_f32_le() as f64;

        let vertical_interval = if has_interval {
            let bytes = read_bytes(reader, 8, path)?;
            let mut buf = &bytes[..];
            Some(interval(buf.get_f32_le(), buf.get_f32_le())?)
        } else {
            None
        };

        Ok(Self {
            precision: Precision::Single,
            columns,
            rows,
            extent: Extent::new(left, bottom, right, top),
            min,
            max,
            no_data,
            cell_size_x,
            cell_size_y,
            vertical_interval,
        })
    }

    fn read_double<R: Read>(reader: &mut R, path: &Path) -> Result<Self> {
        let bytes = read_bytes(reader, DOUBLE_HEADER_LEN - 8, path)?;
        let mut buf = &bytes[..];

        let columns = read_count(buf.get_i64_le(), "column")?;
        let rows = read_count(buf.get_i64_le(), "row")?;
        let left = buf.get_f64_le();
        let right = buf.get_f64_le();
        let bottom = buf.get_f64_le();
        let top = buf.get_f64_le();
        let min = buf.get_f64_le() as f32;
        let max = buf.get_f64_le() as f32;
        let no_data = buf.get_f64_le() as f32;
        let has_interval = read_flags(&mut buf, path)?;
        // Four bytes with no written counterpart precede the cell sizes.
        buf.advance(4);
        let cell_size_x = buf.get_f64_le();
        let cell_size_y = buf.get_f64_le();

        let vertical_interval = if has_interval {
            let bytes = read_bytes(reader, 16, path)?;
            let mut buf = &bytes[..];
            Some(interval(buf.get_f64_le() as f32, buf.get_f64_le() as f32)?)
        } else {
            None
        };

        Ok(Self {
            precision: Precision::Double,
            columns,
            rows,
            extent: Extent::new(left, bottom, right, top),
            min,
            max,
            no_data,
            cell_size_x,
            cell_size_y,
            vertical_interval,
        })
    }

    fn validate(&self) -> Result<()> {
        let valid = |c: f64| c.is_finite() && c > 0.0;
        if !valid(self.cell_size_x) || !valid(self.cell_size_y) {
            return Err(RasterError::format(format!(
                "invalid cell size {} x {}",
                self.cell_size_x, self.cell_size_y
            )));
        }
        if self.extent.width() < 0.0 || self.extent.height() < 0.0 {
            return Err(RasterError::format(format!("inverted extent {}", self.extent)));
        }

        let computed_columns = cell_count(self.extent.width(), self.cell_size_x);
        let computed_rows = cell_count(self.extent.height(), self.cell_size_y);
        if computed_columns != self.columns || computed_rows != self.rows {
            return Err(RasterError::DimensionMismatch {
                declared_columns: self.columns,
                declared_rows: self.rows,
                computed_columns,
                computed_rows,
            });
        }
        Ok(())
    }

    /// Size of the encoded header in bytes.
    pub fn byte_len(&self) -> usize {
        let base = match self.precision {
            Precision::Single => SINGLE_HEADER_LEN,
            Precision::Double => DOUBLE_HEADER_LEN,
        };
        let interval = if self.vertical_interval.is_some() {
            2 * self.precision.value_width()
        } else {
            0
        };
        base + interval
    }

    /// Byte offset of the cell at `(row, column)` from the start of the file.
    pub fn value_offset(&self, row: usize, column: usize) -> u64 {
        (self.byte_len() + self.precision.value_width() * (row * self.columns + column)) as u64
    }

    /// Number of cells in the value block.
    pub fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Append the single-precision encoding of this header to `buf`.
    pub fn encode_single(&self, buf: &mut BytesMut) -> Result<()> {
        let columns = i32::try_from(self.columns)
            .map_err(|_| RasterError::format(format!("{} columns exceed the file format", self.columns)))?;
        let rows = i32::try_from(self.rows)
            .map_err(|_| RasterError::format(format!("{} rows exceed the file format", self.rows)))?;

        buf.put_i32_le(SINGLE_PRECISION_MARKER);
        buf.put_i32_le(columns);
        buf.put_i32_le(rows);
        buf.put_f32_le(self.extent.left as f32);
        buf.put_f32_le(self.extent.right as f32);
        buf.put_f32_le(self.extent.bottom as f32);
        buf.put_f32_le(self.extent.top as f32);
        buf.put_f32_le(self.min);
        buf.put_f32_le(self.max);
        buf.put_f32_le(self.no_data);
        buf.put_u8(0);
        buf.put_u8(u8::from(self.vertical_interval.is_some()));
        buf.put_u8(0);
        buf.put_u8(0);
        buf.put_f32_le(self.cell_size_x as f32);
        buf.put_f32_le(self.cell_size_y as f32);
        if let Some(interval) = self.vertical_interval {
            buf.put_f32_le(interval.top());
            buf.put_f32_le(interval.bottom());
        }
        Ok(())
    }
}

/// Decode the flag bytes, returning whether a vertical interval follows.
fn read_flags(buf: &mut &[u8], path: &Path) -> Result<bool> {
    let equidistant = buf.get_u8();
    let has_interval = buf.get_u8();
    buf.advance(2);
    if equidistant != 0 {
        return Err(RasterError::format(format!(
            "{} has non-equidistant cells, which are not supported",
            path.display()
        )));
    }
    Ok(has_interval != 0)
}

fn interval(top: f32, bottom: f32) -> Result<VerticalInterval> {
    VerticalInterval::new(top, bottom).map_err(|e| RasterError::format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> GridHeader {
        GridHeader {
            precision: Precision::Single,
            columns: 3,
            rows: 2,
            extent: Extent::new(0.0, 0.0, 30.0, 20.0),
            min: 1.0,
            max: 6.0,
            no_data: -9999.0,
            cell_size_x: 10.0,
            cell_size_y: 10.0,
            vertical_interval: None,
        }
    }

    fn decode(bytes: &[u8]) -> Result<GridHeader> {
        GridHeader::read(&mut &bytes[..], Path::new("test.grd"))
    }

    #[test]
    fn test_single_precision_layout() {
        let mut buf = BytesMut::new();
        header().encode_single(&mut buf).unwrap();
        assert_eq!(buf.len(), 52);
        assert_eq!(&buf[..4], &1271i32.to_le_bytes());
        assert_eq!(decode(&buf).unwrap(), header());
    }

    #[test]
    fn test_vertical_interval_extends_header() {
        let mut with_interval = header();
        with_interval.vertical_interval = Some(VerticalInterval::new(5.0, -2.0).unwrap());

        let mut buf = BytesMut::new();
        with_interval.encode_single(&mut buf).unwrap();
        assert_eq!(buf.len(), 60);
        assert_eq!(with_interval.byte_len(), 60);
        assert_eq!(decode(&buf).unwrap(), with_interval);
    }

    #[test]
    fn test_double_precision_with_stray_bytes() {
        let mut buf = BytesMut::new();
        buf.put_i64_le(2295);
        buf.put_i64_le(3);
        buf.put_i64_le(2);
        for v in [0.0, 30.0, 0.0, 20.0, 1.0, 6.0, -9999.0] {
            buf.put_f64_le(v);
        }
        buf.put_slice(&[0, 0, 0, 0]);
        buf.put_slice(&[0xAA; 4]);
        buf.put_f64_le(10.0);
        buf.put_f64_le(10.0);
        assert_eq!(buf.len(), 104);

        let decoded = decode(&buf).unwrap();
        assert_eq!(decoded.precision, Precision::Double);
        assert_eq!(decoded.byte_len(), 104);
        assert_eq!(decoded.columns, 3);
        assert_eq!(decoded.cell_size_x, 10.0);
        assert_eq!(decoded.value_offset(1, 0), 104 + 3 * 8);
    }

    #[test]
    fn test_unknown_discriminator() {
        let mut buf = BytesMut::new();
        buf.put_i64_le(42);
        buf.put_slice(&[0; 96]);
        assert!(matches!(decode(&buf), Err(RasterError::Format(_))));
    }

    #[test]
    fn test_non_equidistant_rejected() {
        let mut buf = BytesMut::new();
        header().encode_single(&mut buf).unwrap();
        buf[40] = 1;
        assert!(matches!(decode(&buf), Err(RasterError::Format(_))));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut wrong = header();
        wrong.columns = 4;
        let mut buf = BytesMut::new();
        wrong.encode_single(&mut buf).unwrap();
        assert!(matches!(
            decode(&buf),
            Err(RasterError::DimensionMismatch {
                declared_columns: 4,
                computed_columns: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut buf = BytesMut::new();
        header().encode_single(&mut buf).unwrap();
        assert!(matches!(decode(&buf[..30]), Err(RasterError::Format(_))));
    }
}
