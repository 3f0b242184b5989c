use crate::common::mask::MaskPattern;
use crate::common::metadata::{Color, ECLevel, Metadata, Version};

// Finished symbol
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Vec<Color>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: MaskPattern,
}

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel, mask: MaskPattern, grid: Vec<Color>) -> Self {
        let w = ver.width();
        debug_assert_eq!(grid.len(), w * w, "Grid size doesn't match version width");
        Self { grid, w, ver, ecl, mask }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.ver, self.ecl, self.mask)
    }

    /// Row-major modules, `width * width` of them.
    pub fn modules(&self) -> &[Color] {
        &self.grid
    }

    /// Module at row `r`, column `c`. Panics if either is not below `width`.
    pub fn get(&self, r: usize, c: usize) -> Color {
        assert!(r < self.w && c < self.w, "Coordinate ({r}, {c}) outside {0}x{0} symbol", self.w);
        self.grid[r * self.w + c]
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        self.get(r, c) == Color::Dark
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.grid.chunks_exact(self.w)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&c| c == Color::Dark).count()
    }
}
