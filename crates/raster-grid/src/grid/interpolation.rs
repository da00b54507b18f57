//! Bilinear sampling between cell centers.

use super::{Cells, Grid};
use crate::error::Result;

/// Linear blend that falls back to whichever side is defined.
fn lerp(a: Option<f32>, b: Option<f32>, t: f64) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a as f64 * (1.0 - t) + b as f64 * t) as f32),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

impl Grid {
    /// Bilinear interpolation among the four cell centers around `(x, y)`.
    ///
    /// Returns `None` outside the grid. A point inside a NoData cell yields
    /// NoData unless a calculation value is configured. Neighbours that are
    /// outside the grid or NoData take the calculation value when one is
    /// set; otherwise the blend falls back to the defined side.
    pub fn get_interpolated_value(&self, x: f64, y: f64) -> Result<Option<f32>> {
        if let Cells::Constant(value) = self.cells {
            return Ok(self.cell_at(x, y).map(|_| value));
        }

        let Some((row, column)) = self.cell_at(x, y) else {
            return Ok(None);
        };

        let values = self.values()?;
        let own = values[row * self.columns + column];
        if self.is_no_data(own) && self.calculation_value.is_none() {
            return Ok(Some(self.no_data));
        }

        // Fractional position in cell-center space.
        let fx = (x - self.extent.left) / self.cell_size_x - 0.5;
        let fy = (self.extent.top - y) / self.cell_size_y - 0.5;
        let c0 = fx.floor() as i64;
        let r0 = fy.floor() as i64;
        let tx = fx - c0 as f64;
        let ty = fy - r0 as f64;

        let sample = |r: i64, c: i64| -> Option<f32> {
            if r < 0 || c < 0 || r as usize >= self.rows || c as usize >= self.columns {
                return self.calculation_value;
            }
            self.substitute(values[r as usize * self.columns + c as usize])
        };

        let upper = lerp(sample(r0, c0), sample(r0, c0 + 1), tx);
        let lower = lerp(sample(r0 + 1, c0), sample(r0 + 1, c0 + 1), tx);
        Ok(lerp(upper, lower, ty))
    }
}
