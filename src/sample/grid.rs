//! # Sample Grid
//!
//! Nearest-neighbour downsampling of the cropped source into a rectangular
//! grid of RGB samples. Each cell takes the source pixel nearest its centre,
//! never a blend, so every cell stays a discrete color representative.

use crate::raster::{Raster, Rgb};

use super::crop::CropWindow;

/// Row-major grid of RGB samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    width: usize,
    height: usize,
    cells: Vec<Rgb>,
}

impl SampleGrid {
    /// A grid of default (black) samples.
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![[0, 0, 0]; width * height],
        }
    }

    /// Build a grid from explicit rows. Rows must all have equal length.
    pub fn from_rows(rows: &[Vec<Rgb>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let cells = rows.iter().flat_map(|r| r.iter().copied()).collect::<Vec<_>>();
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.cells[y * self.width + x]
    }

    /// Iterate `(x, y, sample)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Rgb)> + '_ {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (i % w, i / w, c))
    }
}

/// Grid dimensions for a column count and target size:
/// `height = round(width * target_h / target_w)`.
pub fn grid_dimensions(columns: u32, target_w: u32, target_h: u32) -> (usize, usize) {
    if columns == 0 || target_w == 0 || target_h == 0 {
        return (0, 0);
    }
    let rows = (columns as f32 * target_h as f32 / target_w as f32).round() as usize;
    (columns as usize, rows)
}

/// Sample the source through the crop window into `grid_w x grid_h` cells.
///
/// `target_w`/`target_h` only define the target aspect ratio. Degenerate grid
/// or crop geometry yields a blank grid rather than an error.
pub fn sample(
    source: &Raster,
    crop: &CropWindow,
    target_w: u32,
    target_h: u32,
    grid_w: usize,
    grid_h: usize,
) -> SampleGrid {
    if grid_w == 0 || grid_h == 0 {
        return SampleGrid::blank(grid_w, grid_h);
    }
    let Some(rect) = crop.source_rect(source.width(), source.height(), target_w, target_h) else {
        log::debug!("degenerate crop for {}x{} grid", grid_w, grid_h);
        return SampleGrid::blank(grid_w, grid_h);
    };

    let step_x = rect.width as f32 / grid_w as f32;
    let step_y = rect.height as f32 / grid_h as f32;
    let max_x = source.width() - 1;
    let max_y = source.height() - 1;

    SampleGrid::from_fn(grid_w, grid_h, |gx, gy| {
        let sx = rect.x + ((gx as f32 + 0.5) * step_x).floor() as u32;
        let sy = rect.y + ((gy as f32 + 0.5) * step_y).floor() as u32;
        let p = source.get_pixel(sx.min(max_x), sy.min(max_y));
        [p[0], p[1], p[2]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> Raster {
        RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90, 255]))
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(40, 400, 300), (40, 30));
        assert_eq!(grid_dimensions(3, 100, 100), (3, 3));
        assert_eq!(grid_dimensions(0, 100, 100), (0, 0));
    }

    #[test]
    fn test_nearest_neighbour_picks_source_pixels() {
        let src = gradient(8, 8);
        let grid = sample(&src, &CropWindow::centered(), 8, 8, 4, 4);
        // Cell centres land on source pixels 1, 3, 5, 7
        assert_eq!(grid.get(0, 0), [7, 5, 90]);
        assert_eq!(grid.get(3, 3), [49, 35, 90]);
    }

    #[test]
    fn test_degenerate_grid_is_blank() {
        let src = gradient(8, 8);
        let grid = sample(&src, &CropWindow::centered(), 8, 8, 0, 5);
        assert!(grid.is_empty());

        let empty = RgbaImage::new(0, 0);
        let grid = sample(&empty, &CropWindow::centered(), 8, 8, 2, 2);
        assert_eq!(grid, SampleGrid::blank(2, 2));
    }

    #[test]
    fn test_crop_no_op_when_aspect_matches() {
        let src = gradient(64, 32);
        let a = sample(&src, &CropWindow::new(0.0, 0.0), 200, 100, 10, 5);
        let b = sample(&src, &CropWindow::new(1.0, 1.0), 200, 100, 10, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_crop_changes_output_when_aspect_differs() {
        let src = gradient(64, 32);
        let a = sample(&src, &CropWindow::new(0.0, 0.5), 100, 100, 4, 4);
        let b = sample(&src, &CropWindow::new(1.0, 0.5), 100, 100, 4, 4);
        assert_ne!(a, b);
    }

    #[test]
    fn test_iter_row_major() {
        let grid = SampleGrid::from_fn(3, 2, |x, y| [x as u8, y as u8, 0]);
        let coords: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
