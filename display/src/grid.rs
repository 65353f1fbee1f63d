//! Text overlay grid.
//!
//! A row-major buffer of character cells sized from the active mode and
//! the loaded font. The grid carries one spare row and column on every
//! edge so the renderer can look at neighbours without bounds checks.

use alloc::vec::Vec;

use crate::error::{VesaInitError, VesaInitResult};
use crate::font::FONT_WIDTH;
use crate::ring_buffer::{debug_logf, error_log, InitStage};

/// Extra rows/columns around the visible text area (one per edge).
pub const GRID_MARGIN: usize = 2;

/// Shadow state of a cell, as the renderer interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Shadow {
    None = 0,
    All = 1,
    Normal = 2,
    Reverse = 3,
}

impl Shadow {
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::None),
            1 => Some(Self::All),
            2 => Some(Self::Normal),
            3 => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// One character cell.
///
/// Memory layout is fixed for renderers that read the buffer raw:
/// byte 0 character code, byte 1 attribute, byte 2 shadow, byte 3 zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(4))]
pub struct TextCell {
    pub ch: u8,
    pub attr: u8,
    pub shadow: Shadow,
    _reserved: u8,
}

impl TextCell {
    pub const fn new(ch: u8, attr: u8, shadow: Shadow) -> Self {
        Self {
            ch,
            attr,
            shadow,
            _reserved: 0,
        }
    }

    /// Blank cell: space in `attr`, normal shadow.
    pub const fn blank(attr: u8) -> Self {
        Self::new(b' ', attr, Shadow::Normal)
    }

    /// Packed little-endian word: `ch | attr << 8 | shadow << 16`.
    pub const fn to_bits(&self) -> u32 {
        self.ch as u32 | (self.attr as u32) << 8 | (self.shadow as u32) << 16
    }

    pub const fn from_bits(bits: u32) -> Option<Self> {
        match Shadow::from_byte((bits >> 16) as u8) {
            Some(shadow) => Some(Self::new(bits as u8, (bits >> 8) as u8, shadow)),
            None => None,
        }
    }
}

/// Grid dimensions derived from mode geometry and font height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Visible text rows.
    pub text_rows: usize,
    /// Visible text columns.
    pub text_cols: usize,
    /// Buffer rows (visible + margin).
    pub rows: usize,
    /// Buffer columns (visible + margin).
    pub cols: usize,
}

impl GridGeometry {
    /// Compute the grid for a `h_res` x `v_res` mode, glyphs of
    /// `font_height` rows and a pixel border of `border_px` on each edge.
    /// `None` if the font height is zero.
    pub fn compute(h_res: u16, v_res: u16, font_height: usize, border_px: u16) -> Option<Self> {
        if font_height == 0 {
            return None;
        }
        let border = 2 * border_px as usize;
        let pixel_rows = (v_res as usize).saturating_sub(border);
        let pixel_cols = (h_res as usize).saturating_sub(border);

        let text_rows = pixel_rows / font_height;
        let text_cols = pixel_cols / FONT_WIDTH;
        Some(Self {
            text_rows,
            text_cols,
            rows: text_rows + GRID_MARGIN,
            cols: text_cols + GRID_MARGIN,
        })
    }

    /// Total cells in the buffer.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// Row-major text cell buffer. Allocated once, never resized.
#[derive(Debug)]
pub struct TextGrid {
    geometry: GridGeometry,
    cells: Vec<TextCell>,
}

impl TextGrid {
    /// Allocate a grid for `geometry` with every cell set to `fill`.
    pub fn new(geometry: GridGeometry, fill: TextCell) -> VesaInitResult<Self> {
        let count = geometry.cells();
        let mut cells = Vec::new();
        if cells.try_reserve_exact(count).is_err() {
            error_log(InitStage::TextGrid, "Cannot allocate text grid");
            return Err(VesaInitError::AllocationFailed);
        }
        cells.resize(count, fill);

        debug_logf(
            InitStage::TextGrid,
            format_args!(
                "Text grid {}x{} ({} cells)",
                geometry.text_cols, geometry.text_rows, count
            ),
        );
        Ok(Self { geometry, cells })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Buffer rows, margin included.
    pub fn rows(&self) -> usize {
        self.geometry.rows
    }

    /// Buffer columns, margin included.
    pub fn cols(&self) -> usize {
        self.geometry.cols
    }

    pub fn cells(&self) -> &[TextCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [TextCell] {
        &mut self.cells
    }

    /// Cell at buffer position (`row`, `col`), margin included.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TextCell> {
        if row >= self.geometry.rows || col >= self.geometry.cols {
            return None;
        }
        self.cells.get(row * self.geometry.cols + col)
    }

    /// Overwrite every cell with `cell`.
    pub fn fill(&mut self, cell: TextCell) {
        self.cells.fill(cell);
    }

    /// Raw pointer for renderers reading packed cells.
    pub fn as_ptr(&self) -> *const TextCell {
        self.cells.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_layout() {
        assert_eq!(core::mem::size_of::<TextCell>(), 4);
        assert_eq!(core::mem::align_of::<TextCell>(), 4);
    }

    #[test]
    fn test_blank_cell_bits() {
        let cell = TextCell::blank(0x07);
        assert_eq!(cell.to_bits(), 0x0002_0720);
        assert_eq!(TextCell::from_bits(0x0002_0720), Some(cell));
        assert_eq!(TextCell::from_bits(0x0009_0720), None);
    }

    #[test]
    fn test_geometry_640x480_16() {
        let g = GridGeometry::compute(640, 480, 16, 0).unwrap();
        assert_eq!((g.text_rows, g.text_cols), (30, 80));
        assert_eq!((g.rows, g.cols), (32, 82));
        assert_eq!(g.cells(), 32 * 82);
    }

    #[test]
    fn test_geometry_floor_division() {
        let g = GridGeometry::compute(640, 480, 14, 0).unwrap();
        assert_eq!(g.text_rows, 34);
    }

    #[test]
    fn test_geometry_with_border() {
        let g = GridGeometry::compute(640, 480, 16, 8).unwrap();
        assert_eq!((g.text_rows, g.text_cols), (29, 78));
        assert_eq!(g.cells(), 31 * 80);
    }

    #[test]
    fn test_largest_grid_size() {
        let g = GridGeometry::compute(640, 480, 8, 0).unwrap();
        assert_eq!((g.rows, g.cols), (62, 82));
        assert_eq!(g.cells() * core::mem::size_of::<TextCell>(), 20_336);
    }

    #[test]
    fn test_geometry_zero_font() {
        assert!(GridGeometry::compute(640, 480, 0, 0).is_none());
    }

    #[test]
    fn test_grid_initialized() {
        let g = GridGeometry::compute(640, 480, 16, 0).unwrap();
        let grid = TextGrid::new(g, TextCell::blank(0x07)).unwrap();
        assert_eq!(grid.cells().len(), (30 + 2) * (80 + 2));
        assert!(grid
            .cells()
            .iter()
            .all(|c| c.ch == b' ' && c.attr == 0x07 && c.shadow == Shadow::Normal));
        assert!(grid.cell(31, 81).is_some());
        assert!(grid.cell(32, 0).is_none());
    }

    #[test]
    fn test_grid_allocation_failure() {
        let huge = GridGeometry {
            text_rows: 0,
            text_cols: 0,
            rows: isize::MAX as usize / 4 + 1,
            cols: 1,
        };
        assert_eq!(
            TextGrid::new(huge, TextCell::blank(0x07)).unwrap_err(),
            VesaInitError::AllocationFailed
        );
    }

    #[test]
    fn test_grid_fill() {
        let g = GridGeometry::compute(64, 32, 16, 0).unwrap();
        let mut grid = TextGrid::new(g, TextCell::blank(0x07)).unwrap();
        grid.fill(TextCell::new(b'#', 0x1F, Shadow::Reverse));
        assert!(grid.cells().iter().all(|c| c.to_bits() == 0x0003_1F23));
    }
}
