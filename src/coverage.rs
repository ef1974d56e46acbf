//! # Coverage Masks
//!
//! Per-cell occupancy of an idealized disk inscribed in a square lattice,
//! independent of image content.
//!
//! A cell is inside when its centre lies within `radius = diameter / 2` of the
//! lattice centre. With anti-aliasing, cells near the boundary (centre distance
//! below `radius + 1.5`) are supersampled on a 5x5 sub-grid and get the
//! fraction of sub-points inside the disk.
//!
//! All geometry is evaluated in scaled integer units, so masks are exactly
//! symmetric under 90° rotation and mirroring.

/// Supersampling resolution per axis.
pub const SUPERSAMPLE: i64 = 5;

/// Sub-linear response used when sizing shapes from coverage.
pub const SIZE_EXPONENT: f32 = 0.35;

/// Square lattice of coverage values in [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMask {
    diameter: usize,
    anti_aliased: bool,
    cells: Vec<f32>,
}

impl CoverageMask {
    /// Build a disk mask of `diameter` lattice cells.
    pub fn build(diameter: usize, anti_aliased: bool) -> Self {
        let d = diameter as i64;
        let mut cells = Vec::with_capacity(diameter * diameter);

        for y in 0..d {
            for x in 0..d {
                // Doubled coordinates: centre offset (2x + 1 - d), radius d
                let cx2 = 2 * x + 1 - d;
                let cy2 = 2 * y + 1 - d;
                let center_dist2 = cx2 * cx2 + cy2 * cy2;
                let inside = center_dist2 <= d * d;

                let coverage = if !anti_aliased {
                    if inside { 1.0 } else { 0.0 }
                } else if center_dist2 < (d + 3) * (d + 3) {
                    supersample(x, y, d)
                } else {
                    0.0
                };
                cells.push(coverage);
            }
        }

        Self {
            diameter,
            anti_aliased,
            cells,
        }
    }

    pub fn diameter(&self) -> usize {
        self.diameter
    }

    pub fn anti_aliased(&self) -> bool {
        self.anti_aliased
    }

    /// Coverage of cell `(x, y)`.
    #[inline]
    pub fn coverage(&self, x: usize, y: usize) -> f32 {
        self.cells[y * self.diameter + x]
    }

    /// Shape size factor for cell `(x, y)`: `coverage^0.35`.
    #[inline]
    pub fn size_factor(&self, x: usize, y: usize) -> f32 {
        self.coverage(x, y).powf(SIZE_EXPONENT)
    }

    /// Number of cells with non-zero coverage.
    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0.0).count()
    }
}

/// Fraction of the 5x5 sub-points of cell `(x, y)` inside the disk.
fn supersample(x: i64, y: i64, d: i64) -> f32 {
    // Units of 1 / (2 * SUPERSAMPLE) cells: sub-point k sits at (2k + 1)
    let scale = 2 * SUPERSAMPLE;
    let r = SUPERSAMPLE * d;
    let r2 = r * r;
    let mut hits = 0;
    for sy in 0..SUPERSAMPLE {
        for sx in 0..SUPERSAMPLE {
            let px = scale * x + (2 * sx + 1) - r;
            let py = scale * y + (2 * sy + 1) - r;
            if px * px + py * py <= r2 {
                hits += 1;
            }
        }
    }
    hits as f32 / (SUPERSAMPLE * SUPERSAMPLE) as f32
}

/// Memo for a mask that only changes with its geometry parameters.
#[derive(Debug, Default)]
pub struct CoverageCache {
    mask: Option<CoverageMask>,
}

impl CoverageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached mask, rebuilding only when `diameter` or
    /// `anti_aliased` differ from the cached one.
    pub fn get(&mut self, diameter: usize, anti_aliased: bool) -> &CoverageMask {
        let stale = self
            .mask
            .as_ref()
            .is_none_or(|m| m.diameter != diameter || m.anti_aliased != anti_aliased);
        if stale {
            log::debug!("rebuilding coverage mask d={} aa={}", diameter, anti_aliased);
            self.mask = Some(CoverageMask::build(diameter, anti_aliased));
        }
        self.mask.get_or_insert_with(|| CoverageMask::build(diameter, anti_aliased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotate90(mask: &CoverageMask) -> Vec<f32> {
        let d = mask.diameter();
        let mut out = vec![0.0; d * d];
        for y in 0..d {
            for x in 0..d {
                // (x, y) -> (d - 1 - y, x)
                out[x * d + (d - 1 - y)] = mask.coverage(x, y);
            }
        }
        out
    }

    #[test]
    fn test_aa_mask_rotation_symmetric() {
        for d in 1..=24 {
            let mask = CoverageMask::build(d, true);
            assert_eq!(rotate90(&mask), mask.cells, "diameter {}", d);
        }
    }

    #[test]
    fn test_hard_mask_rotation_symmetric() {
        for d in [3, 8, 11] {
            let mask = CoverageMask::build(d, false);
            assert_eq!(rotate90(&mask), mask.cells);
        }
    }

    #[test]
    fn test_hard_mask_is_binary() {
        let mask = CoverageMask::build(9, false);
        assert!(mask.cells.iter().all(|&c| c == 0.0 || c == 1.0));
        assert_eq!(mask.coverage(4, 4), 1.0);
        assert_eq!(mask.coverage(0, 0), 0.0);
    }

    #[test]
    fn test_aa_mask_has_fractional_edge() {
        let mask = CoverageMask::build(12, true);
        assert_eq!(mask.coverage(6, 6), 1.0);
        assert_eq!(mask.coverage(0, 0), 0.0);
        assert!(mask.cells.iter().any(|&c| c > 0.0 && c < 1.0));
        assert!(mask.cells.iter().all(|&c| (0.0..=1.0).contains(&c)));
    }

    #[test]
    fn test_size_factor_sub_linear() {
        let mask = CoverageMask::build(12, true);
        for y in 0..12 {
            for x in 0..12 {
                let c = mask.coverage(x, y);
                if c > 0.0 && c < 1.0 {
                    assert!(mask.size_factor(x, y) > c);
                }
            }
        }
    }

    #[test]
    fn test_empty_diameter() {
        let mask = CoverageMask::build(0, true);
        assert_eq!(mask.covered_cells(), 0);
    }

    #[test]
    fn test_cache_rebuilds_on_geometry_change() {
        let mut cache = CoverageCache::new();
        assert_eq!(cache.get(8, true).diameter(), 8);
        assert_eq!(cache.get(8, true).diameter(), 8);
        assert!(!cache.get(8, false).anti_aliased());
        assert_eq!(cache.get(10, false).diameter(), 10);
    }
}
