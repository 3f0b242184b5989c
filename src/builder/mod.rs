mod canvas;
mod qr;

pub(crate) use canvas::Canvas;
#[cfg(test)]
pub(crate) use canvas::Module;
pub use qr::QR;

use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

use log::{debug, info};

use crate::common::{
    codec::{self, Mode, Sizing},
    ec::{Block, BlockLayout, GaloisField, ReedSolomonEncoder},
    error::{QRError, QRResult},
    mask::{select_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
    BitStream,
};

/// Encodes `data` at error correction level `ecl` with every other setting left
/// to its default.
pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<QR> {
    QRBuilder::new(data).ec_level(ecl).build()
}

pub struct QRBuilder<'a> {
    data: Cow<'a, [u8]>,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    sizing: Sizing,
    field: Option<Arc<GaloisField>>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            version: None,
            ec_level: ECLevel::M,
            mask: None,
            sizing: Sizing::default(),
            field: None,
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = Cow::Borrowed(data);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn sizing(&mut self, sizing: Sizing) -> &mut Self {
        self.sizing = sizing;
        self
    }

    /// Shares a prebuilt field across builds instead of building one per call.
    pub fn field(&mut self, field: Arc<GaloisField>) -> &mut Self {
        self.field = Some(field);
        self
    }

    pub fn metadata(&self) -> String {
        let mask = match self.mask {
            Some(m) => (*m).to_string(),
            None => "Auto".to_string(),
        };
        match self.version {
            Some(v) => {
                format!("{{ Version: {}, Ec level: {:?}, Mask: {mask} }}", *v, self.ec_level)
            }
            None => format!("{{ Version: Auto, Ec level: {:?}, Mask: {mask} }}", self.ec_level),
        }
    }
}

impl QRBuilder<'static> {
    /// Transcodes UTF-16 text to UTF-8 before encoding, unpaired surrogates
    /// become U+FFFD.
    pub fn from_utf16(text: &[u16]) -> Self {
        let mut buf = vec![0; text.len() * 3];
        let len = encoding_rs::mem::convert_utf16_to_utf8(text, &mut buf);
        buf.truncate(len);
        let mut builder = QRBuilder::new(&[]);
        builder.data = Cow::Owned(buf);
        builder
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());
        let field = self.field.clone().unwrap_or_else(|| Arc::new(GaloisField::new()));
        let mut rs = ReedSolomonEncoder::new(field);

        // Encode data
        let (encoded_data, version, mode) = match self.version {
            Some(v) => {
                let mode = Mode::select(&self.data);
                (codec::encode_with_version(&self.data, mode, v, self.ec_level)?, v, mode)
            }
            None => codec::encode(&self.data, self.ec_level, self.sizing)?,
        };

        debug!("Constructing payload with ecc & interleaving...");
        let payload = Self::construct_payload(encoded_data.data(), version, self.ec_level, &mut rs)?;

        debug!("Drawing functional patterns & encoding region...");
        let mut canvas = Canvas::new(version, self.ec_level);
        canvas.draw_all_function_patterns();
        canvas.draw_encoding_region(&payload)?;

        let qr = match self.mask {
            Some(m) => {
                debug!("Applying mask {}...", *m);
                canvas.apply_mask(m);
                canvas.finalize()?
            }
            None => {
                debug!("Finding & applying best mask...");
                select_best_mask(&canvas)?
            }
        };

        let data_cap = version.data_codewords(self.ec_level);
        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        info!("Generated QR {}", qr.metadata());
        info!(
            "Data capacity: {data_cap}, Error capacity: {}, Mode: {mode:?}, Data size: {}",
            Self::ec_capacity(version, self.ec_level),
            self.data.len()
        );
        info!(
            "Dark cells: {dark_modules}, Light cells: {}, Balance: {}%",
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    // Data codewords of every block column by column, then EC codewords likewise
    fn construct_payload(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
        rs: &mut ReedSolomonEncoder,
    ) -> QRResult<BitStream> {
        let layout = BlockLayout::new(version, ec_level)?;
        let blocks = layout.encode(data, rs)?;
        let data_blocks = blocks.iter().map(Block::data).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(Block::ecc).collect::<Vec<_>>();

        let total_codewords = version.total_codewords();
        let mut payload = BitStream::with_capacity(total_codewords << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));
        if payload.size_in_bytes() != total_codewords {
            return Err(QRError::MalformedBitStream("interleaved length differs from total codewords"));
        }
        debug!(
            "Interleaved {} blocks of {} EC codewords into {total_codewords} codewords",
            layout.block_count(),
            layout.ec_len()
        );
        Ok(payload)
    }

    // Number of codeword errors the symbol can recover from, less the codewords
    // reserved against misdecoding in the smallest symbols
    pub fn ec_capacity(version: Version, ec_level: ECLevel) -> usize {
        let p = match (*version, ec_level) {
            (1, ECLevel::L) => 3,
            (2, ECLevel::L) | (1, ECLevel::M) => 2,
            (1, _) | (3, ECLevel::L) => 1,
            _ => 0,
        };
        (version.ec_codewords(ec_level) - p) / 2
    }

    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod builder_tests {
    use std::sync::Arc;

    use test_case::test_case;

    use super::{Canvas, Module, QRBuilder, QR};
    use crate::common::{
        BitStream, BlockLayout, Color, ECLevel, EncRegionIter, GaloisField, MaskPattern,
        QRError, ReedSolomonEncoder, Sizing, Version,
    };

    fn encoder() -> ReedSolomonEncoder {
        ReedSolomonEncoder::new(Arc::new(GaloisField::new()))
    }

    // Unmasks the data modules of a finished symbol and reads them back in placement order
    fn read_codewords(qr: &QR) -> Vec<u8> {
        let ver = qr.version();
        let mut canvas = Canvas::new(ver, qr.ec_level());
        canvas.draw_all_function_patterns();
        canvas.draw_encoding_region(&BitStream::new()).unwrap();

        let mask_fn = qr.mask().mask_functions();
        let mut bits = BitStream::new();
        for (r, c) in EncRegionIter::new(ver) {
            if !matches!(canvas.get(r, c), Module::Data(_)) {
                continue;
            }
            let is_dark = qr.is_dark(r as usize, c as usize);
            bits.push(is_dark != mask_fn(r, c));
        }
        bits.data()[..ver.total_codewords()].to_vec()
    }

    #[test]
    fn test_construct_payload_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let ver = Version::new(1).unwrap();
        let payload = QRBuilder::construct_payload(msg, ver, ECLevel::M, &mut encoder()).unwrap();
        let mut exp = msg.to_vec();
        exp.extend(b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17");
        assert_eq!(payload.data(), exp);
    }

    #[test]
    fn test_construct_payload_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let ver = Version::new(5).unwrap();
        let payload = QRBuilder::construct_payload(msg, ver, ECLevel::Q, &mut encoder()).unwrap();
        let out = payload.data();
        assert_eq!(out.len(), 134);
        // First column holds the first byte of each block
        assert_eq!(out[..4], [msg[0], msg[15], msg[30], msg[46]]);
        // Group 2 blocks carry the last data column alone
        assert_eq!(out[60..62], [msg[45], msg[61]]);
        // EC columns follow, starting with the first EC byte of each block
        assert_eq!(out[62..66], [0xd5, 0x57, 0x94, 0xeb]);
        assert_eq!(out[133], 0xec);
    }

    #[test]
    fn test_construct_payload_length_mismatch() {
        let ver = Version::new(1).unwrap();
        let res = QRBuilder::construct_payload(&[0; 15], ver, ECLevel::M, &mut encoder());
        assert!(matches!(res, Err(QRError::MalformedBitStream(_))));
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = QRBuilder::interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
        assert!(QRBuilder::interleave::<u8, Vec<u8>>(&[]).is_empty());
    }

    #[test_case(1, ECLevel::L, 2)]
    #[test_case(1, ECLevel::M, 4)]
    #[test_case(1, ECLevel::Q, 6)]
    #[test_case(1, ECLevel::H, 8)]
    #[test_case(3, ECLevel::L, 7)]
    #[test_case(5, ECLevel::Q, 36)]
    #[test_case(40, ECLevel::H, 1215)]
    fn test_ec_capacity(ver: usize, ecl: ECLevel, exp: usize) {
        assert_eq!(QRBuilder::ec_capacity(Version::new(ver).unwrap(), ecl), exp);
    }

    #[test]
    fn test_hello_world() {
        let qr = QRBuilder::new(b"HELLO WORLD").ec_level(ECLevel::Q).build().unwrap();
        assert_eq!(*qr.version(), 1);
        assert_eq!(qr.width(), 21);

        let codewords = read_codewords(&qr);
        let data = b"\x20\x5B\x0B\x78\xD1\x72\xDC\x4D\x43\x40\xEC\x11\xEC";
        assert_eq!(&codewords[..13], data);
        assert_eq!(&codewords[13..], b"\xA8\x48\x16\x52\xD9\x36\x9C\x00\x2E\x0F\xB4\x7A\x10");
    }

    #[test_case("Hello, world!🌎".to_string(), 1, ECLevel::L)]
    #[test_case("TEST".to_string(), 1, ECLevel::M)]
    #[test_case("12345".to_string(), 1, ECLevel::Q)]
    #[test_case("OK".to_string(), 1, ECLevel::H)]
    #[test_case("B3@j🎮#Z%8v🍣K!🔑3zC^8📖&r💾F9*🔐b6🌼".repeat(3), 7, ECLevel::L)]
    #[test_case("A11111111111111".repeat(11), 7, ECLevel::M)]
    #[test_case("1234567890".repeat(15), 7, ECLevel::H)]
    #[test_case("A111111111111111".repeat(20), 13, ECLevel::Q)]
    #[test_case("1234567890".repeat(145), 27, ECLevel::H)]
    #[test_case("aAAAAAAAAA111111111111111111AAAAAAAAAAa".repeat(42), 40, ECLevel::Q)]
    fn test_block_syndromes(data: String, ver: usize, ecl: ECLevel) {
        let ver = Version::new(ver).unwrap();
        let qr = QRBuilder::new(data.as_bytes()).version(ver).ec_level(ecl).build().unwrap();
        assert_eq!(qr.version(), ver);

        // De-interleave the read back codewords into blocks and check every syndrome
        let codewords = read_codewords(&qr);
        let layout = BlockLayout::new(ver, ecl).unwrap();
        let n = layout.block_count();
        let mut blocks = vec![Vec::new(); n];
        let (data_cw, ec_cw) = codewords.split_at(layout.data_len());
        let mut i = 0;
        for col in 0..layout.group2_data {
            for (b, block) in blocks.iter_mut().enumerate() {
                let is_group2 = b >= layout.group1_blocks;
                if col < layout.group1_data || is_group2 {
                    block.push(data_cw[i]);
                    i += 1;
                }
            }
        }
        assert_eq!(i, data_cw.len());
        for (j, &cw) in ec_cw.iter().enumerate() {
            blocks[j % n].push(cw);
        }

        let rs = encoder();
        for block in blocks {
            assert!(rs.syndromes(&block, layout.ec_len()).iter().all(|&s| s == 0));
        }
    }

    #[test]
    fn test_forced_mask() {
        for m in 0..8 {
            let mask = MaskPattern::new(m).unwrap();
            let qr = QRBuilder::new(b"forced mask").mask(mask).build().unwrap();
            assert_eq!(qr.mask(), mask);
            assert_eq!(read_codewords(&qr)[0] >> 4, 0b0100);
        }
    }

    #[test]
    fn test_best_mask_is_first_minimum() {
        let data = b"https://example.com/some/path?query=1";
        let auto = QRBuilder::new(data).build().unwrap();
        let penalties = (0..8)
            .map(|m| {
                let mask = MaskPattern::new(m).unwrap();
                let qr = QRBuilder::new(data).mask(mask).build().unwrap();
                crate::common::compute_total_penalty(&qr)
            })
            .collect::<Vec<_>>();
        let min = *penalties.iter().min().unwrap();
        let first = penalties.iter().position(|&p| p == min).unwrap();
        assert_eq!(*auto.mask(), first as u8);
    }

    #[test]
    fn test_forced_version_overflow() {
        let data = "1234567890".repeat(306);
        let res = QRBuilder::new(data.as_bytes())
            .version(Version::new(40).unwrap())
            .ec_level(ECLevel::H)
            .build();
        assert_eq!(res, Err(QRError::CapacityExceeded));
    }

    #[test]
    fn test_sizing() {
        let data = "a".repeat(17);
        let conservative = QRBuilder::new(data.as_bytes()).ec_level(ECLevel::L).build().unwrap();
        assert_eq!(*conservative.version(), 2);
        let exact = QRBuilder::new(data.as_bytes())
            .ec_level(ECLevel::L)
            .sizing(Sizing::Exact)
            .build()
            .unwrap();
        assert_eq!(*exact.version(), 1);
    }

    #[test]
    fn test_finished_symbol_patterns() {
        let qr = QRBuilder::new(b"01234567").ec_level(ECLevel::H).build().unwrap();
        let w = qr.width();
        // Finder corners, separators and timing pattern
        for (r, c) in [(0, 0), (0, w - 1), (w - 1, 0), (3, 3), (3, w - 4), (w - 4, 3)] {
            assert!(qr.is_dark(r, c));
        }
        for (r, c) in [(7, 7), (7, w - 8), (w - 8, 7), (1, 1)] {
            assert!(!qr.is_dark(r, c));
        }
        for i in 8..w - 8 {
            assert_eq!(qr.is_dark(6, i), i % 2 == 0);
            assert_eq!(qr.is_dark(i, 6), i % 2 == 0);
        }
        assert!(qr.is_dark(w - 8, 8));
        assert_eq!(qr.get(0, 0), Color::Dark);
    }
}
