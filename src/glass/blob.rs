//! # Blob Clustering
//!
//! Greedy square-growing clustering of a color grid into variable-size square
//! blobs that tile the grid exactly once.
//!
//! ## Algorithm
//!
//! Cells are scanned in row-major order, skipping visited ones. Each unvisited
//! cell anchors a new blob of size 1 which then grows one step at a time:
//!
//! ```text
//!   size s            size s + 1
//!   ┌───┬───┐         ┌───┬───┬───┐
//!   │ A │   │         │ A │   │ + │   the 2s + 1 new cells (new right
//!   ├───┼───┤   →     ├───┼───┼───┤   column and new bottom row) must all
//!   │   │   │         │   │   │ + │   be in bounds, unvisited, and within
//!   └───┴───┘         ├───┼───┼───┤   the similarity threshold of A
//!                     │ + │ + │ + │
//!                     └───┴───┴───┘
//! ```
//!
//! Growth is all-or-nothing: a single failing cell in either the new column or
//! the new row stops the blob. The result is deterministic but not globally
//! optimal; blob sizes near anchor boundaries can look uneven.

use crate::sample::SampleGrid;
use crate::shader::color_dist;

/// Color-distance ceiling that the [0, 100] sensitivity slider maps onto.
pub const MAX_SIMILARITY: f32 = 120.0;

/// Percentage of blobs, by count, flagged as markers.
pub const MARKER_PERCENT: usize = 4;

/// A square blob: top-left grid cell and side length in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Blob {
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

impl Blob {
    /// True when the blob touches any edge of a `grid_w x grid_h` grid.
    pub fn touches_edge(&self, grid_w: usize, grid_h: usize) -> bool {
        self.x == 0 || self.y == 0 || self.x + self.size >= grid_w || self.y + self.size >= grid_h
    }

    pub fn area(&self) -> usize {
        self.size * self.size
    }
}

/// Map the [0, 100] sensitivity slider linearly onto [0, 120].
#[inline]
pub fn similarity_threshold(sensitivity: f32) -> f32 {
    sensitivity.clamp(0.0, 100.0) / 100.0 * MAX_SIMILARITY
}

/// Cluster the grid into blobs under `threshold` RGB distance.
pub fn cluster(grid: &SampleGrid, threshold: f32) -> Vec<Blob> {
    let (w, h) = (grid.width(), grid.height());
    let mut visited = vec![false; w * h];
    let mut blobs = Vec::new();

    for y in 0..h {
        for x in 0..w {
            if visited[y * w + x] {
                continue;
            }
            let anchor = grid.get(x, y);
            let fits = |cx: usize, cy: usize, visited: &[bool]| {
                !visited[cy * w + cx] && color_dist(anchor, grid.get(cx, cy)) <= threshold
            };

            let mut size = 1;
            loop {
                let edge_x = x + size;
                let edge_y = y + size;
                if edge_x >= w || edge_y >= h {
                    break;
                }
                // New right column including the corner, then new bottom row
                let column_ok = (y..=edge_y).all(|cy| fits(edge_x, cy, visited.as_slice()));
                let row_ok = column_ok && (x..edge_x).all(|cx| fits(cx, edge_y, visited.as_slice()));
                if !row_ok {
                    break;
                }
                size += 1;
            }

            for cy in y..y + size {
                for cx in x..x + size {
                    visited[cy * w + cx] = true;
                }
            }
            blobs.push(Blob { x, y, size });
        }
    }

    blobs
}

/// Number of marker blobs for a clustering: `ceil(4% of blob count)`.
pub fn marker_count(total: usize) -> usize {
    (total * MARKER_PERCENT).div_ceil(100)
}

/// Flags marking the largest `marker_count` blobs. Ties keep scan order.
pub fn select_markers(blobs: &[Blob]) -> Vec<bool> {
    let mut order: Vec<usize> = (0..blobs.len()).collect();
    order.sort_by(|&a, &b| blobs[b].size.cmp(&blobs[a].size));
    let mut flags = vec![false; blobs.len()];
    for &i in order.iter().take(marker_count(blobs.len())) {
        flags[i] = true;
    }
    flags
}

/// Largest blob side length, 0 for an empty set.
pub fn max_size(blobs: &[Blob]) -> usize {
    blobs.iter().map(|b| b.size).max().unwrap_or(0)
}

/// Keep blobs whose size reaches `lower_limit`% of the largest blob size.
///
/// Returns the indices of the surviving blobs.
pub fn filter_small(blobs: &[Blob], lower_limit: f32) -> Vec<usize> {
    let min_size = lower_limit.clamp(0.0, 100.0) / 100.0 * max_size(blobs) as f32;
    blobs
        .iter()
        .enumerate()
        .filter(|(_, b)| b.size as f32 >= min_size)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Rgb;

    fn coverage_map(blobs: &[Blob], w: usize, h: usize) -> Vec<u32> {
        let mut counts = vec![0u32; w * h];
        for b in blobs {
            for y in b.y..b.y + b.size {
                for x in b.x..b.x + b.size {
                    counts[y * w + x] += 1;
                }
            }
        }
        counts
    }

    fn noisy_grid(w: usize, h: usize) -> SampleGrid {
        SampleGrid::from_fn(w, h, |x, y| {
            let v = ((x * 31 + y * 17) ^ (x * y)) % 7;
            [(v * 30) as u8, (v * 20) as u8, ((x + y) % 3 * 40) as u8]
        })
    }

    fn distinct_grid(w: usize, h: usize) -> SampleGrid {
        SampleGrid::from_fn(w, h, |x, y| [(x * 30) as u8, (y * 30) as u8, 0])
    }

    #[test]
    fn test_uniform_grid_single_blob() {
        let grid = SampleGrid::from_fn(3, 3, |_, _| [40, 80, 120]);
        assert_eq!(cluster(&grid, 50.0), vec![Blob { x: 0, y: 0, size: 3 }]);
    }

    #[test]
    fn test_non_square_uniform_grid_tiles() {
        let grid = SampleGrid::from_fn(5, 2, |_, _| [0, 0, 0]);
        let blobs = cluster(&grid, 10.0);
        assert_eq!(
            blobs,
            vec![
                Blob { x: 0, y: 0, size: 2 },
                Blob { x: 2, y: 0, size: 2 },
                Blob { x: 4, y: 0, size: 1 },
                Blob { x: 4, y: 1, size: 1 },
            ]
        );
    }

    #[test]
    fn test_blobs_tile_grid_exactly_once() {
        for threshold in [0.0, 20.0, 60.0, 120.0] {
            for (w, h) in [(1, 1), (7, 4), (12, 12), (9, 15)] {
                let grid = noisy_grid(w, h);
                let blobs = cluster(&grid, threshold);
                assert!(coverage_map(&blobs, w, h).iter().all(|&c| c == 1));
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let grid = noisy_grid(16, 10);
        assert_eq!(cluster(&grid, 45.0), cluster(&grid, 45.0));
    }

    #[test]
    fn test_threshold_monotonic_average_size() {
        let grid = distinct_grid(8, 8);
        let avg = |t: f32| {
            let blobs = cluster(&grid, t);
            blobs.iter().map(|b| b.size).sum::<usize>() as f32 / blobs.len() as f32
        };
        let strict = avg(0.0);
        let medium = avg(45.0);
        let loose = avg(500.0);
        assert_eq!(strict, 1.0);
        assert_eq!(loose, 8.0);
        assert!(strict <= medium && medium <= loose);
    }

    #[test]
    fn test_threshold_sweep_never_shrinks_noisy_blobs() {
        for (w, h) in [(16, 10), (12, 12), (9, 15)] {
            let grid = noisy_grid(w, h);
            let mut prev = 0.0f32;
            for step in 0..=24 {
                let t = step as f32 * 5.0;
                let blobs = cluster(&grid, t);
                let avg = blobs.iter().map(|b| b.size).sum::<usize>() as f32 / blobs.len() as f32;
                assert!(avg >= prev, "{}x{} at {}: {} < {}", w, h, t, avg, prev);
                prev = avg;
            }
        }
    }

    #[test]
    fn test_growth_stops_when_row_blocked() {
        // Bottom-left cell differs: the 2x2 growth fails on the new row
        let a: Rgb = [0, 0, 0];
        let b: Rgb = [255, 255, 255];
        let grid = SampleGrid::from_rows(&[vec![a, a], vec![b, a]]);
        let blobs = cluster(&grid, 10.0);
        assert_eq!(blobs.len(), 4);
        assert!(blobs.iter().all(|b| b.size == 1));
    }

    #[test]
    fn test_empty_grid() {
        assert!(cluster(&SampleGrid::blank(0, 0), 50.0).is_empty());
    }

    #[test]
    fn test_similarity_threshold_scale() {
        assert_eq!(similarity_threshold(0.0), 0.0);
        assert!((similarity_threshold(50.0) - 60.0).abs() < 1e-4);
        assert!((similarity_threshold(100.0) - 120.0).abs() < 1e-4);
        assert!((similarity_threshold(150.0) - 120.0).abs() < 1e-4);
    }

    #[test]
    fn test_markers_pick_largest() {
        assert_eq!(marker_count(0), 0);
        assert_eq!(marker_count(1), 1);
        assert_eq!(marker_count(25), 1);
        assert_eq!(marker_count(26), 2);

        let mut blobs = vec![Blob { x: 0, y: 0, size: 1 }; 30];
        blobs[7].size = 4;
        blobs[12].size = 3;
        let flags = select_markers(&blobs);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 2);
        assert!(flags[7] && flags[12]);
    }

    #[test]
    fn test_filter_small() {
        let blobs = vec![
            Blob { x: 0, y: 0, size: 4 },
            Blob { x: 4, y: 0, size: 1 },
            Blob { x: 5, y: 0, size: 2 },
        ];
        assert_eq!(filter_small(&blobs, 0.0), vec![0, 1, 2]);
        assert_eq!(filter_small(&blobs, 50.0), vec![0, 2]);
        assert_eq!(filter_small(&blobs, 100.0), vec![0]);
    }
}
