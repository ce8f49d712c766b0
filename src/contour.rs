//! Procedural elevation field and marching-squares contouring.

use std::f64::consts::TAU;

/// Row-major grid of normalized heights in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl ElevationGrid {
    /// Sample the closed-form terrain function over `rows` x `cols` cells.
    pub fn generate(rows: usize, cols: usize) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let nx = c as f64 / cols as f64;
                let ny = r as f64 / rows as f64;
                values.push(elevation(nx, ny));
            }
        }
        Self { rows, cols, values }
    }

    pub fn from_values(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == rows * cols).then_some(Self { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Five-term trigonometric height field, amplitudes summing to 1 so the
/// raw value spans [-1, 1] before normalization.
fn elevation(nx: f64, ny: f64) -> f64 {
    let raw = (nx * TAU * 2.0 + 0.5).sin() * 0.3
        + (ny * TAU * 3.0 + 1.2).cos() * 0.25
        + ((nx + ny) * TAU * 1.5).sin() * 0.2
        + (nx * 12.0 + ny * 8.0).sin() * 0.1
        + (nx * 5.0 - ny * 6.0).cos() * 0.15;
    ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: (f64, f64),
    pub b: (f64, f64),
}

/// Trace the iso-line at `level` through every cell, in pixel space where a
/// cell spans `cell_w` x `cell_h`.
///
/// A corner counts as inside when `value >= level`; an edge is crossed only
/// when exactly one of its corners is inside, so a flat cell sitting on the
/// level emits nothing. Saddle cells are split using the cell centre.
pub fn contour_segments(grid: &ElevationGrid, level: f64, cell_w: f64, cell_h: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    if grid.rows < 2 || grid.cols < 2 {
        return segments;
    }

    for r in 0..grid.rows - 1 {
        for c in 0..grid.cols - 1 {
            let x = c as f64 * cell_w;
            let y = r as f64 * cell_h;

            let tl = grid.get(r, c);
            let tr = grid.get(r, c + 1);
            let bl = grid.get(r + 1, c);
            let br = grid.get(r + 1, c + 1);

            let top = crossing(tl, tr, level).map(|f| (x + f * cell_w, y));
            let right = crossing(tr, br, level).map(|f| (x + cell_w, y + f * cell_h));
            let bottom = crossing(bl, br, level).map(|f| (x + f * cell_w, y + cell_h));
            let left = crossing(tl, bl, level).map(|f| (x, y + f * cell_h));

            match (top, right, bottom, left) {
                (Some(t), Some(r_), Some(b), Some(l)) => {
                    let centre_inside = (tl + tr + bl + br) / 4.0 >= level;
                    if (tl >= level) == centre_inside {
                        segments.push(Segment { a: t, b: r_ });
                        segments.push(Segment { a: b, b: l });
                    } else {
                        segments.push(Segment { a: t, b: l });
                        segments.push(Segment { a: r_, b });
                    }
                }
                _ => {
                    let mut hits = [top, right, bottom, left].into_iter().flatten();
                    if let (Some(a), Some(b)) = (hits.next(), hits.next()) {
                        segments.push(Segment { a, b });
                    }
                }
            }
        }
    }
    segments
}

/// Interpolated position of the level along an edge from `a` to `b`.
fn crossing(a: f64, b: f64, level: f64) -> Option<f64> {
    ((a >= level) != (b >= level)).then(|| (level - a) / (b - a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_stays_normalized() {
        let grid = ElevationGrid::generate(24, 48);
        assert_eq!(grid.values().len(), 24 * 48);
        assert!(grid.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(grid, ElevationGrid::generate(24, 48));
    }

    #[test]
    fn flat_cell_on_level_is_silent() {
        let grid = ElevationGrid::from_values(2, 2, vec![0.5; 4]).unwrap();
        assert!(contour_segments(&grid, 0.5, 10.0, 10.0).is_empty());
    }

    #[test]
    fn single_corner_cuts_across() {
        // Only the top-left corner is above the level.
        let grid = ElevationGrid::from_values(2, 2, vec![1.0, 0.0, 0.0, 0.0]).unwrap();
        let segments = contour_segments(&grid, 0.5, 10.0, 10.0);
        assert_eq!(segments, vec![Segment { a: (5.0, 0.0), b: (0.0, 5.0) }]);
    }

    #[test]
    fn saddle_emits_two_segments() {
        let grid = ElevationGrid::from_values(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let segments = contour_segments(&grid, 0.5, 10.0, 10.0);
        assert_eq!(segments.len(), 2);
        // Centre is at the level, so the high corners join and the low
        // corners are cut off.
        assert_eq!(segments[0], Segment { a: (5.0, 0.0), b: (10.0, 5.0) });
        assert_eq!(segments[1], Segment { a: (5.0, 10.0), b: (0.0, 5.0) });
    }

    #[test]
    fn degenerate_grid_is_empty() {
        let grid = ElevationGrid::from_values(1, 3, vec![0.0, 1.0, 0.0]).unwrap();
        assert!(contour_segments(&grid, 0.5, 1.0, 1.0).is_empty());
        assert!(ElevationGrid::from_values(2, 2, vec![0.0]).is_none());
    }
}
