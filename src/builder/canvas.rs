use log::debug;

use super::QR;
use crate::common::{
    bit_utils::BitStream,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::*,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Module {
    pub fn color(self) -> Option<Color> {
        match self {
            Module::Empty => None,
            Module::Func(c) | Module::Version(c) | Module::Format(c) | Module::Data(c) => Some(c),
        }
    }
}

// Construction grid of a symbol, every module is tagged with its role until the
// symbol is finalized
#[derive(Debug, Clone)]
pub struct Canvas {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

impl Canvas {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
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

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    // One char per module, lowercase for dark and uppercase for light
    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let glyph = |m: &Module| match *m {
            Module::Empty => '.',
            Module::Func(clr) => clr.select('f', 'F'),
            Module::Version(clr) => clr.select('v', 'V'),
            Module::Format(clr) => clr.select('m', 'M'),
            Module::Data(clr) => clr.select('d', 'D'),
        };
        let mut res = String::from("\n");
        for row in self.grid.chunks_exact(self.w) {
            res.extend(row.iter().map(glyph));
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the far edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        let wrap = |x: i16| {
            assert!((-w..w).contains(&x), "Coordinate {x} outside {w}x{w} canvas");
            x.rem_euclid(w) as usize
        };
        wrap(r) * self.w + wrap(c)
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let idx = self.coord_to_index(r, c);
        self.grid[idx] = module;
    }
}

#[cfg(test)]
mod canvas_util_tests {
    use super::{Canvas, Module};
    use crate::common::metadata::{Color, ECLevel, Version};

    fn canvas(ver: usize) -> Canvas {
        Canvas::new(Version::new(ver).unwrap(), ECLevel::L)
    }

    #[test]
    fn test_index_wrap() {
        let mut canvas = canvas(1);
        let w = canvas.width() as i16;
        canvas.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(canvas.get(w - 1, w - 1), Module::Func(Color::Dark));
        canvas.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(canvas.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let canvas = canvas(1);
        let w = canvas.width() as i16;
        canvas.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let canvas = canvas(1);
        let w = canvas.width() as i16;
        canvas.get(0, -(w + 1));
    }

    #[test]
    fn test_module_color() {
        assert_eq!(Module::Empty.color(), None);
        assert_eq!(Module::Data(Color::Dark).color(), Some(Color::Dark));
        assert_eq!(Module::Format(Color::Light).color(), Some(Color::Light));
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl Canvas {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 pattern centred at (r, c) plus the light separator ring on its inner sides
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let rows = if r > 0 { -3..=4i16 } else { -4..=3 };
        for i in rows {
            let cols = if c > 0 { -3..=4i16 } else { -4..=3 };
            for j in cols {
                let ring = i.abs().max(j.abs());
                self.set(r + i, c + j, Module::Func(Color::from(ring != 2 && ring != 4)));
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl Canvas {
    // Row 6 and column 6 between the finders, dark on even indices
    fn draw_timing_pattern(&mut self) {
        for i in 8..self.w as i16 - 8 {
            let module = Module::Func(Color::from(i % 2 == 0));
            self.set(6, i, module);
            self.set(i, 6, module);
        }
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use super::Canvas;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_timing_pattern_1() {
        let mut canvas = Canvas::new(Version::new(1).unwrap(), ECLevel::L);
        canvas.draw_timing_pattern();
        assert_eq!(
            canvas.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl Canvas {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r as i16, c as i16)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let far = self.w as i16 - 7;
        let is_finder_line = |x: i16| x == 6 || x == far;
        if is_finder_line(r) && is_finder_line(c) && (r, c) != (far, far) {
            return;
        }
        for i in -2..=2i16 {
            for j in -2..=2i16 {
                let ring = i.abs().max(j.abs());
                self.set(r + i, c + j, Module::Func(Color::from(ring != 1)));
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl Canvas {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl Canvas {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    // Writes both copies of the format info and the dark module beside them
    fn draw_format_info(&mut self, format_info: u32) {
        for coords in [&FORMAT_INFO_COORDS_QR_MAIN, &FORMAT_INFO_COORDS_QR_SIDE] {
            self.draw_number(format_info, FORMAT_INFO_BIT_LEN, Module::Format, coords);
        }
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            self.draw_number(ver_info, VERSION_INFO_BIT_LEN, Module::Version, coords);
        }
    }

    // Most significant bit goes to the first coordinate
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        role: fn(Color) -> Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert_eq!(coords.len(), bit_len);
        for (k, &(r, c)) in coords.iter().enumerate() {
            let is_dark = (number >> (bit_len - 1 - k)) & 1 == 1;
            self.set(r, c, role(Color::from(is_dark)));
        }
    }

    #[cfg(test)]
    fn read_number(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |n, &(r, c)| {
            let is_dark = self.get(r, c).color() == Some(Color::Dark);
            (n << 1) | is_dark as u32
        })
    }
}

#[cfg(test)]
mod qr_information_tests {
    use super::Canvas;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::*;

    #[test]
    fn test_version_info_1() {
        let mut canvas = Canvas::new(Version::new(1).unwrap(), ECLevel::L);
        canvas.draw_version_info();
        assert!(canvas.to_debug_str().chars().all(|c| c == '.' || c == '\n'));
    }

    #[test]
    fn test_version_info_7() {
        let mut canvas = Canvas::new(Version::new(7).unwrap(), ECLevel::L);
        canvas.draw_version_info();
        assert_eq!(canvas.read_number(&VERSION_INFO_COORDS_TR), 0x07C94);
        assert_eq!(canvas.read_number(&VERSION_INFO_COORDS_BL), 0x07C94);
        let dbg = canvas.to_debug_str();
        let rows = dbg.lines().skip(1).collect::<Vec<_>>();
        assert_eq!(&rows[0][34..37], "VVv");
        assert_eq!(&rows[4][34..37], "vvv");
        assert_eq!(&rows[5][34..37], "VVV");
        assert_eq!(&rows[34][..6], "VVVVvV");
        assert_eq!(&rows[35][..6], "VvvvvV");
        assert_eq!(&rows[36][..6], "vVVvvV");
    }

    #[test]
    fn test_reserve_format_info_qr() {
        let mut canvas = Canvas::new(Version::new(1).unwrap(), ECLevel::L);
        canvas.reserve_format_area();
        assert_eq!(
            canvas.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }

    #[test]
    fn test_format_info_copies() {
        let mut canvas = Canvas::new(Version::new(2).unwrap(), ECLevel::M);
        let info = format_info(ECLevel::M, MaskPattern::new(0).unwrap());
        canvas.draw_format_info(info);
        assert_eq!(canvas.read_number(&FORMAT_INFO_COORDS_QR_MAIN), 0x5412);
        assert_eq!(canvas.read_number(&FORMAT_INFO_COORDS_QR_SIDE), 0x5412);
        let w = canvas.width() as i16;
        assert_eq!(canvas.get(4 * 2 + 9, 8), canvas.get(w - 8, 8));
        assert_eq!(canvas.get(-8, 8).color(), Some(Color::Dark));
    }

    #[test]
    fn test_all_function_patterns_and_qr_info() {
        let mut canvas = Canvas::new(Version::new(7).unwrap(), ECLevel::L);
        canvas.draw_all_function_patterns();
        canvas.draw_version_info();
        canvas.reserve_format_area();
        assert_eq!(
            canvas.to_debug_str(),
            "\n\
             fffffffFm.........................VVvFfffffff\n\
             fFFFFFfFm.........................VvVFfFFFFFf\n\
             fFfffFfFm.........................VvVFfFfffFf\n\
             fFfffFfFm.........................VvvFfFfffFf\n\
             fFfffFfFm...........fffff.........vvvFfFfffFf\n\
             fFFFFFfFm...........fFFFf.........VVVFfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFFm...........fFFFf............FFFFFFFF\n\
             mmmmmmfmm...........fffff............mmmmmmmm\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ....fffff...........fffff...........fffff....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fFfFf...........fFfFf...........fFfFf....\n\
             ....fFFFf...........fFFFf...........fFFFf....\n\
             ....fffff...........fffff...........fffff....\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             ......f......................................\n\
             ......F......................................\n\
             VVVVvVf......................................\n\
             VvvvvVF......................................\n\
             vVVvvVf.............fffff...........fffff....\n\
             FFFFFFFFm...........fFFFf...........fFFFf....\n\
             fffffffFm...........fFfFf...........fFfFf....\n\
             fFFFFFfFm...........fFFFf...........fFFFf....\n\
             fFfffFfFm...........fffff...........fffff....\n\
             fFfffFfFm....................................\n\
             fFfffFfFm....................................\n\
             fFFFFFfFm....................................\n\
             fffffffFm....................................\n"
        );
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl Canvas {
    pub fn draw_encoding_region(&mut self, payload: &BitStream) -> QRResult<()> {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload)
    }

    fn draw_payload(&mut self, payload: &BitStream) -> QRResult<()> {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload.bits() {
            let (r, c) = self.next_empty(&mut coords).ok_or(QRError::MatrixBuildFailure)?;
            self.set(r, c, Module::Data(Color::from(bit)));
        }

        // Remainder bits
        let mut remainder = 0;
        while let Some((r, c)) = self.next_empty(&mut coords) {
            self.set(r, c, Module::Data(Color::Light));
            remainder += 1;
        }
        debug!("Placed {} payload bits and {remainder} remainder bits", payload.len());
        Ok(())
    }

    fn next_empty(&self, coords: &mut EncRegionIter) -> Option<(i16, i16)> {
        coords.find(|&(r, c)| self.get(r, c) == Module::Empty)
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w;
        for (idx, module) in self.grid.iter_mut().enumerate() {
            if let Module::Data(clr) = module {
                if mask_fn((idx / w) as i16, (idx % w) as i16) {
                    *clr = !*clr;
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }

    // Drops module roles, fails if a module was never drawn or no mask was applied
    pub fn finalize(&self) -> QRResult<QR> {
        let mask = self.mask.ok_or(QRError::MatrixBuildFailure)?;
        let grid = self
            .grid
            .iter()
            .map(|m| m.color().ok_or(QRError::MatrixBuildFailure))
            .collect::<QRResult<Vec<_>>>()?;
        Ok(QR::new(self.ver, self.ecl, mask, grid))
    }
}
