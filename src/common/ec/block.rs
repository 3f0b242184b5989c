use super::{ReedSolomonEncoder, MAX_BLOCK_SIZE};
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::{ECLevel, Version};

// Block
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Block {
    pub data: [u8; MAX_BLOCK_SIZE],
    // Block length
    pub len: usize,
    // Data length
    pub dlen: usize,
}

impl Block {
    pub fn new(raw: &[u8], len: usize, rs: &mut ReedSolomonEncoder) -> QRResult<Self> {
        let dlen = raw.len();
        if len > MAX_BLOCK_SIZE || dlen >= len {
            return Err(QRError::MalformedBitStream("block has no room for error correction"));
        }
        let mut data = [0u8; MAX_BLOCK_SIZE];
        data[..dlen].copy_from_slice(raw);
        let ecc = rs.encode(raw, len - dlen)?;
        data[dlen..len].copy_from_slice(&ecc);
        Ok(Self { data, len, dlen })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn ec_len(&self) -> usize {
        self.len - self.dlen
    }

    pub fn data_len(&self) -> usize {
        self.dlen
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..self.len]
    }
}

// Block layout
//------------------------------------------------------------------------------

// Blocks of group 2 carry one more data codeword than blocks of group 1, both
// groups share the same number of EC codewords.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BlockLayout {
    pub group1_blocks: usize,
    pub group1_total: usize,
    pub group1_data: usize,
    pub group2_blocks: usize,
    pub group2_total: usize,
    pub group2_data: usize,
}

impl BlockLayout {
    pub fn new(ver: Version, ecl: ECLevel) -> QRResult<Self> {
        Self::split(ver.total_codewords(), ver.data_codewords(ecl), ver.block_count(ecl))
    }

    pub fn split(total: usize, data: usize, blocks: usize) -> QRResult<Self> {
        if blocks == 0 {
            return Err(QRError::MalformedBitStream("zero block count"));
        }
        let group2_blocks = total % blocks;
        let group1_blocks = blocks - group2_blocks;
        let group1_total = total / blocks;
        let group1_data = data / blocks;
        let layout = Self {
            group1_blocks,
            group1_total,
            group1_data,
            group2_blocks,
            group2_total: group1_total + 1,
            group2_data: group1_data + 1,
        };
        if group1_total <= group1_data {
            return Err(QRError::MalformedBitStream("non-positive EC codewords per block"));
        }
        if layout.total_len() != total || layout.data_len() != data {
            return Err(QRError::MalformedBitStream("block groups don't cover codewords"));
        }
        Ok(layout)
    }

    pub fn block_count(&self) -> usize {
        self.group1_blocks + self.group2_blocks
    }

    pub fn ec_len(&self) -> usize {
        self.group1_total - self.group1_data
    }

    pub fn data_len(&self) -> usize {
        self.group1_blocks * self.group1_data + self.group2_blocks * self.group2_data
    }

    pub fn total_len(&self) -> usize {
        self.group1_blocks * self.group1_total + self.group2_blocks * self.group2_total
    }

    // Consecutive data slices, group 1 first
    pub fn blockify<'a>(&self, data: &'a [u8]) -> QRResult<Vec<&'a [u8]>> {
        if data.len() != self.data_len() {
            return Err(QRError::MalformedBitStream("data length differs from block layout"));
        }

        let group1_len = self.group1_data * self.group1_blocks;
        let mut data_blocks = Vec::with_capacity(self.block_count());
        data_blocks.extend(data[..group1_len].chunks(self.group1_data));
        if self.group2_blocks > 0 {
            data_blocks.extend(data[group1_len..].chunks(self.group2_data));
        }
        Ok(data_blocks)
    }

    // Splits data into blocks and appends EC codewords to each of them
    pub fn encode(&self, data: &[u8], rs: &mut ReedSolomonEncoder) -> QRResult<Vec<Block>> {
        let ec_len = self.ec_len();
        self.blockify(data)?.into_iter().map(|b| Block::new(b, b.len() + ec_len, rs)).collect()
    }
}
