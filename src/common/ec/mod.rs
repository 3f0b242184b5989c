mod block;
mod encoder;
mod galois;

pub use block::*;
pub use encoder::*;
pub use galois::*;

pub static MAX_BLOCK_SIZE: usize = 256;
