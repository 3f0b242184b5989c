use crate::common::error::{QRError, QRResult};
use crate::common::metadata::Version;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    // Picks the packing mode for the whole payload in a single pass
    pub fn select(data: &[u8]) -> Self {
        let mut has_numeric = false;
        let mut has_alphanumeric = false;
        for &b in data {
            if Self::Numeric.contains(b) {
                has_numeric = true;
            } else if Self::Alphanumeric.contains(b) {
                has_alphanumeric = true;
            } else {
                return Self::Byte;
            }
        }
        match (has_alphanumeric, has_numeric) {
            (true, _) => Self::Alphanumeric,
            (false, true) => Self::Numeric,
            (false, false) => Self::Byte,
        }
    }

    pub fn mode_bits() -> usize {
        MODE_INDICATOR_BITS
    }

    pub fn char_cnt_bits(self, ver: Version) -> usize {
        let tier = ver.tier();
        match self {
            Self::Numeric => CHAR_CNT_BITS[0][tier],
            Self::Alphanumeric => CHAR_CNT_BITS[1][tier],
            Self::Byte => CHAR_CNT_BITS[2][tier],
        }
    }

    #[inline]
    pub fn numeric_digit(char: u8) -> QRResult<u16> {
        if !char.is_ascii_digit() {
            return Err(QRError::InvalidCharacter(char));
        }
        Ok((char - b'0') as u16)
    }

    #[inline]
    pub fn alphanumeric_digit(char: u8) -> QRResult<u16> {
        let digit = match char {
            b'0'..=b'9' => char - b'0',
            b'A'..=b'Z' => char - b'A' + 10,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => return Err(QRError::InvalidCharacter(char)),
        };
        Ok(digit as u16)
    }

    pub fn encode_chunk(&self, data: &[u8]) -> QRResult<u16> {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().try_fold(0_u16, |n, b| Ok(n * 10 + Self::numeric_digit(*b)?))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().try_fold(0_u16, |n, b| Ok(n * 45 + Self::alphanumeric_digit(*b)?))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                Ok(data.first().copied().unwrap_or_default() as u16)
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    // Bit length of `len` characters packed in this mode, excluding the header
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
        }
    }
}


// Global constants
//------------------------------------------------------------------------------

static MODE_INDICATOR_BITS: usize = 4;

// [Numeric, Alphanumeric, Byte][Version tier]
static CHAR_CNT_BITS: [[usize; 3]; 3] = [[10, 12, 14], [9, 11, 13], [8, 16, 16]];

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
