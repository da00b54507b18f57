//! Error types for the raster engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by grid I/O, geometry and algebra operations.
///
/// NoData propagation, division by zero and out-of-extent queries are not
/// errors; they produce NoData or `None` results.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Malformed or unsupported grid header.
    #[error("invalid grid format: {0}")]
    Format(String),

    /// Declared rows/columns disagree with extent and cell size.
    #[error("header declares {declared_columns}x{declared_rows} cells but extent and cell size give {computed_columns}x{computed_rows}")]
    DimensionMismatch {
        declared_columns: usize,
        declared_rows: usize,
        computed_columns: usize,
        computed_rows: usize,
    },

    /// File missing, unreadable or not writable.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is held open by another process.
    #[error("file is in use by another process: {0:?}")]
    FileInUse(PathBuf),

    /// Misaligned extents, non-integer scale ratios and similar.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// A requested window does not overlap the grid.
    #[error("requested extent {requested} does not overlap grid extent {grid}")]
    NoOverlap { requested: String, grid: String },

    /// The operation is not allowed on this kind of grid.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A value about to be written lies outside the recorded min/max.
    #[error("value {value} lies outside the recorded range [{min}, {max}]")]
    Corrupt { value: f32, min: f32, max: f32 },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RasterError {
    /// Create a Format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a Geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Create an InvalidOperation error.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Create a NoOverlap error.
    pub fn no_overlap(requested: impl ToString, grid: impl ToString) -> Self {
        Self::NoOverlap {
            requested: requested.to_string(),
            grid: grid.to_string(),
        }
    }

    /// Wrap an I/O error, promoting lock and sharing violations to
    /// [`RasterError::FileInUse`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if is_lock_violation(&source) {
            Self::FileInUse(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// True for resource errors (missing, unreadable or locked files).
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::FileInUse(_))
    }

    /// True when the file is locked by another process.
    pub fn is_file_in_use(&self) -> bool {
        matches!(self, Self::FileInUse(_))
    }
}

#[cfg(windows)]
fn is_lock_violation(err: &std::io::Error) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[cfg(not(windows))]
fn is_lock_violation(err: &std::io::Error) -> bool {
    // EBUSY, ETXTBSY
    matches!(err.raw_os_error(), Some(16) | Some(26))
}

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_classification() {
        let missing = RasterError::io("a.grd", io::Error::from(io::ErrorKind::NotFound));
        assert!(missing.is_resource());
        assert!(!missing.is_file_in_use());

        #[cfg(not(windows))]
        let busy = RasterError::io("a.grd", io::Error::from_raw_os_error(16));
        #[cfg(windows)]
        let busy = RasterError::io("a.grd", io::Error::from_raw_os_error(32));
        assert!(busy.is_resource());
        assert!(busy.is_file_in_use());
    }

    #[test]
    fn test_error_messages() {
        let err = RasterError::DimensionMismatch {
            declared_columns: 3,
            declared_rows: 2,
            computed_columns: 2,
            computed_rows: 2,
        };
        assert!(err.to_string().contains("3x2"));

        let err = RasterError::geometry("cell size 15 is not a multiple of 10");
        assert_eq!(err.to_string(), "geometry error: cell size 15 is not a multiple of 10");
    }
}
