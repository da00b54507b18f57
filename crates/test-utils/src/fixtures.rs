//! Common fixtures: extents shared across tests and temporary grid files.

use std::path::PathBuf;

use tempfile::TempDir;

/// Common extents as `(left, bottom, right, top)`.
pub mod extents {
    /// 100 x 100 square at the origin.
    pub const UNIT_SQUARE: (f64, f64, f64, f64) = (0.0, 0.0, 100.0, 100.0);

    /// Overlaps the right half of [`UNIT_SQUARE`].
    pub const SHIFTED_SQUARE: (f64, f64, f64, f64) = (50.0, 0.0, 150.0, 100.0);

    /// Disjoint from [`UNIT_SQUARE`].
    pub const FAR_AWAY: (f64, f64, f64, f64) = (1000.0, 1000.0, 1100.0, 1100.0);

    /// A projected, metre-based extent.
    pub const PROJECTED: (f64, f64, f64, f64) = (155_000.0, 463_000.0, 156_000.0, 464_000.0);
}

/// A temporary directory for grid files, removed on drop.
pub struct TempGridDir {
    dir: TempDir,
}

impl TempGridDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Path of a grid file named `name` inside the directory.
    pub fn grid_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.grd"))
    }

    /// Write raw bytes to `name` and return its path.
    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.grid_path(name);
        std::fs::write(&path, bytes).expect("Failed to write grid file");
        path
    }
}

impl Default for TempGridDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_path_inside_dir() {
        let dir = TempGridDir::new();
        let path = dir.grid_path("elevation");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("grd"));
        assert!(path.starts_with(dir.dir.path()));
    }

    #[test]
    fn test_write_raw() {
        let dir = TempGridDir::new();
        let path = dir.write_raw("raw", &[1, 2, 3]);
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
