use std::fmt::Display;
use std::mem;

use num_traits::{PrimInt, Unsigned};

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bit_capacity: usize) -> Self {
        Self { data: Vec::with_capacity(bit_capacity.div_ceil(8)), len: 0 }
    }

    #[cfg(test)]
    pub fn from(inp: &[u8]) -> Self {
        Self { data: inp.to_vec(), len: inp.len() << 3 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size_in_bytes(&self) -> usize {
        self.len.div_ceil(8)
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.len & 7 == 0
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    // Appends the lowest `size` bits of `bits`, most significant first
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Unsigned + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(size <= 32, "Cannot push more than 32 bits at once: Size {size}");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );

        let bits = bits.to_u64().unwrap_or_default();
        let mut remaining = size;
        while remaining > 0 {
            let offset = self.len & 7;
            if offset == 0 {
                self.data.push(0);
            }
            let n = remaining.min(8 - offset);
            let chunk = ((bits >> (remaining - n)) & ((1 << n) - 1)) as u8;
            if let Some(last) = self.data.last_mut() {
                *last |= chunk << (8 - offset - n);
            }
            self.len += n;
            remaining -= n;
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.push_bits(bit as u8, 1);
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            self.is_byte_aligned(),
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        self.data.extend_from_slice(arr);
        self.len += arr.len() << 3;
    }
}


// Read bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    pub fn bit(&self, pos: usize) -> Option<bool> {
        if pos >= self.len {
            return None;
        }
        Some((self.data[pos >> 3] << (pos & 7)) & 0b1000_0000 != 0)
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).filter_map(|i| self.bit(i))
    }
}
