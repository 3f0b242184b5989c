pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use log::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::Mode;
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{push_segment, terminate};

    // Symbol sizing policy
    //--------------------------------------------------------------------------

    #[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
    pub enum Sizing {
        // Data codewords must cover the packed payload plus three spare codewords
        #[default]
        Conservative,
        // Data bits must cover mode header, char count field and packed payload
        Exact,
    }

    impl Sizing {
        pub fn fits(self, ver: Version, ecl: ECLevel, mode: Mode, char_cnt: usize) -> bool {
            let data_codewords = ver.data_codewords(ecl);
            let payload_bits = mode.encoded_len(char_cnt);
            match self {
                Self::Conservative => data_codewords >= payload_bits.div_ceil(8) + 3,
                Self::Exact => {
                    data_codewords * 8 >= Mode::mode_bits() + mode.char_cnt_bits(ver) + payload_bits
                }
            }
        }
    }

    pub fn encode(data: &[u8], ecl: ECLevel, sizing: Sizing) -> QRResult<(BitStream, Version, Mode)> {
        let mode = Mode::select(data);
        let ver = find_version(data.len(), mode, ecl, sizing)?;
        let bs = encode_with_version(data, mode, ver, ecl)?;
        Ok((bs, ver, mode))
    }

    pub fn encode_with_version(
        data: &[u8],
        mode: Mode,
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        let data_codewords = ver.data_codewords(ecl);
        let mut bs = BitStream::with_capacity(ver.data_bit_capacity(ecl));
        push_segment(mode, ver, data, &mut bs)?;
        debug!("Packed {} chars in {mode:?} mode into {} bits", data.len(), bs.len());

        terminate(&mut bs, data_codewords)?;
        Ok(bs)
    }

    pub fn find_version(
        char_cnt: usize,
        mode: Mode,
        ecl: ECLevel,
        sizing: Sizing,
    ) -> QRResult<Version> {
        let ver = Version::all()
            .find(|&v| sizing.fits(v, ecl, mode, char_cnt))
            .ok_or(QRError::CapacityExceeded)?;
        debug!("Selected version {} for {char_cnt} chars at {ecl:?} ({sizing:?})", *ver);
        Ok(ver)
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use log::debug;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, PADDING_CODEWORDS};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::Version;

    pub fn push_segment(mode: Mode, ver: Version, data: &[u8], out: &mut BitStream) -> QRResult<()> {
        push_header(mode, mode.char_cnt_bits(ver), data.len(), out)?;
        match mode {
            Mode::Numeric => push_numeric_data(data, out),
            Mode::Alphanumeric => push_alphanumeric_data(data, out),
            Mode::Byte => push_byte_data(data, out),
        }
    }

    pub fn push_header(
        mode: Mode,
        len_bits: usize,
        char_cnt: usize,
        out: &mut BitStream,
    ) -> QRResult<()> {
        if len_bits == 0 {
            return Err(QRError::MalformedBitStream("zero width char count field"));
        }
        if char_cnt >= (1 << len_bits) {
            return Err(QRError::CharCountOverflow { count: char_cnt, bits: len_bits });
        }
        out.push_bits(mode as u8, Mode::mode_bits());
        out.push_bits(char_cnt as u32, len_bits);
        Ok(())
    }

    pub fn push_numeric_data(data: &[u8], out: &mut BitStream) -> QRResult<()> {
        for chunk in data.chunks(3) {
            let len = Mode::Numeric.encoded_len(chunk.len());
            let data = Mode::Numeric.encode_chunk(chunk)?;
            out.push_bits(data, len);
        }
        Ok(())
    }

    pub fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) -> QRResult<()> {
        for chunk in data.chunks(2) {
            let len = Mode::Alphanumeric.encoded_len(chunk.len());
            let data = Mode::Alphanumeric.encode_chunk(chunk)?;
            out.push_bits(data, len);
        }
        Ok(())
    }

    pub fn push_byte_data(data: &[u8], out: &mut BitStream) -> QRResult<()> {
        for &b in data {
            out.push_bits(b, 8);
        }
        Ok(())
    }

    // Appends terminator, bit padding and pad codewords up to `data_codewords`
    pub fn terminate(out: &mut BitStream, data_codewords: usize) -> QRResult<()> {
        let bit_capacity = data_codewords << 3;
        if out.len() > bit_capacity {
            return Err(QRError::CapacityExceeded);
        }

        push_terminator(out, bit_capacity);
        push_padding_bits(out);
        if !out.is_byte_aligned() {
            return Err(QRError::MalformedBitStream("stream not byte aligned after padding bits"));
        }

        let pad_cnt = data_codewords - out.size_in_bytes();
        push_padding_codewords(out, pad_cnt);
        if out.size_in_bytes() != data_codewords {
            return Err(QRError::MalformedBitStream("padded stream length differs from capacity"));
        }
        debug!("Terminated stream with {pad_cnt} pad codewords");
        Ok(())
    }

    fn push_terminator(out: &mut BitStream, bit_capacity: usize) {
        let term_len = std::cmp::min(4, bit_capacity - out.len());
        out.push_bits(0u8, term_len);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream, count: usize) {
        PADDING_CODEWORDS.iter().copied().cycle().take(count).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}
