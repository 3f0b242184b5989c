use std::ops::Deref;

use log::debug;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::{Canvas, QR};

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern >= 8 {
            return Err(QRError::InvalidMaskPattern(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Predicates over (row, col), a module is flipped where the predicate holds
mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            _ => mask_functions::meadow,
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

// Scores every pattern against the same unmasked canvas, the lowest score wins
// and ties go to the lower pattern index.
pub fn select_best_mask(canvas: &Canvas) -> QRResult<QR> {
    let mut best: Option<(u32, QR)> = None;
    for mask in MaskPattern::all() {
        let mut masked = canvas.clone();
        masked.apply_mask(mask);
        let qr = masked.finalize()?;
        let pen = compute_total_penalty(&qr);
        debug!("Mask {} scored penalty {pen}", *mask);
        if best.as_ref().map_or(true, |(best_pen, _)| pen < *best_pen) {
            best = Some((pen, qr));
        }
    }
    best.map(|(_, qr)| qr).ok_or(QRError::MatrixBuildFailure)
}

// Penalty
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let grid = qr.modules();
    let w = qr.width();
    let adj_pen = compute_adjacent_penalty(grid, w);
    let blk_pen = compute_block_penalty(grid, w);
    let fp_pen_h = compute_finder_pattern_penalty(grid, w, true);
    let fp_pen_v = compute_finder_pattern_penalty(grid, w, false);
    let bal_pen = compute_balance_penalty(grid);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

fn compute_adjacent_penalty(grid: &[Color], w: usize) -> u32 {
    (0..w)
        .map(|i| {
            let row = run_penalty((0..w).map(|j| grid[i * w + j]));
            let col = run_penalty((0..w).map(|j| grid[j * w + i]));
            row + col
        })
        .sum()
}

// 3 points for a run of 5 same coloured modules plus 1 for every extra module
fn run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let score = |len: u32| if len >= 5 { len - 2 } else { 0 };
    let mut pen = 0;
    let mut last = None;
    let mut len = 0;
    for clr in line {
        if last == Some(clr) {
            len += 1;
        } else {
            pen += score(len);
            last = Some(clr);
            len = 1;
        }
    }
    pen + score(len)
}

fn compute_block_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for r in 0..w.saturating_sub(1) {
        for c in 0..w - 1 {
            let clr = grid[r * w + c];
            if clr == grid[r * w + c + 1] && clr == grid[(r + 1) * w + c] && clr == grid[(r + 1) * w + c + 1] {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(grid: &[Color], w: usize, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];

    let w = w as isize;
    let mut pen = 0;
    for i in 0..w {
        // Modules beyond the edge belong to the quiet zone
        let get = |j: isize| -> Color {
            if j < 0 || j >= w {
                return Color::Light;
            }
            let idx = if is_hor { i * w + j } else { j * w + i };
            grid[idx as usize]
        };
        for j in 0..w - 6 {
            if !(0..7).all(|k| get(j + k) == PATTERN[k as usize]) {
                continue;
            }
            let is_light = |x: isize| get(x) == Color::Light;
            if (j - 4..j).all(is_light) || (j + 7..j + 11).all(is_light) {
                pen += 40;
            }
        }
    }
    pen
}

// 10 points for every full 5% the dark ratio deviates from 50%
fn compute_balance_penalty(grid: &[Color]) -> u32 {
    let total = grid.len();
    let dark_cnt = grid.iter().filter(|&&c| c == Color::Dark).count();
    ((dark_cnt * 20).abs_diff(total * 10) / total * 10) as u32
}
