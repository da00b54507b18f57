//! Value generators for synthetic grids.
//!
//! All generators return values in row-major order, top row first, the
//! layout `Grid::from_values` expects.

/// Creates grid values where each cell holds `col * 1000 + row`.
///
/// Any cell can be checked against its position after a read, clip or
/// window.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let values = create_test_grid(10, 5);
/// assert_eq!(values.len(), 50);
/// assert_eq!(values[1], 1000.0);  // col=1, row=0
/// assert_eq!(values[10], 1.0);    // col=0, row=1
/// ```
pub fn create_test_grid(columns: usize, rows: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates values rising by `step` per cell from `start`, in storage order.
pub fn create_ramp_grid(columns: usize, rows: usize, start: f32, step: f32) -> Vec<f32> {
    (0..columns * rows).map(|i| start + i as f32 * step).collect()
}

/// Creates an elevation-like surface: a single smooth hill centred in the
/// grid, 0 at the corners and `peak` in the middle.
pub fn create_hill_grid(columns: usize, rows: usize, peak: f32) -> Vec<f32> {
    let cx = (columns as f32 - 1.0) / 2.0;
    let cy = (rows as f32 - 1.0) / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);

    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt() / max_dist;
            data.push(peak * (1.0 - dist).max(0.0));
        }
    }
    data
}

/// Creates ramp values with `no_data` at every `every`-th cell.
pub fn create_grid_with_no_data(columns: usize, rows: usize, no_data: f32, every: usize) -> Vec<f32> {
    let mut data = create_ramp_grid(columns, rows, 1.0, 1.0);
    if every > 0 {
        for value in data.iter_mut().step_by(every) {
            *value = no_data;
        }
    }
    data
}

/// Deterministic pseudo-random values in `[0, scale)`.
pub fn create_noise_grid(columns: usize, rows: usize, seed: u32, scale: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push((hash % 10_000) as f32 / 10_000.0 * scale);
        }
    }
    data
}

fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
