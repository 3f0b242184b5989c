use crate::common::error::{QRError, QRResult};

// Galois field GF(2^8)
//------------------------------------------------------------------------------

// Reduction polynomial x^8 + x^4 + x^3 + x^2 + 1
pub static PRIMITIVE_POLY: u16 = 0x11D;

// Exp and log tables over the non-zero elements, built once per instance and
// read-only afterwards, so an instance can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaloisField {
    // Doubled so that the sum of two logs indexes without reduction
    exp: [u8; 510],
    log: [u8; 256],
}

impl GaloisField {
    pub fn new() -> Self {
        let mut exp = [0u8; 510];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIMITIVE_POLY;
            }
        }
        for i in 255..510 {
            exp[i] = exp[i - 255];
        }
        Self { exp, log }
    }

    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
    }

    pub fn div(&self, a: u8, b: u8) -> QRResult<u8> {
        if b == 0 {
            return Err(QRError::FieldArithmetic("division by zero"));
        }
        if a == 0 {
            return Ok(0);
        }
        Ok(self.exp[self.log[a as usize] as usize + 255 - self.log[b as usize] as usize])
    }

    pub fn log(&self, a: u8) -> QRResult<u8> {
        if a == 0 {
            return Err(QRError::FieldArithmetic("logarithm of zero"));
        }
        Ok(self.log[a as usize])
    }

    // Generator raised to the `n`-th power
    #[inline]
    pub fn exp(&self, n: usize) -> u8 {
        self.exp[n % 255]
    }

    // Horner evaluation, coefficients highest degree first
    pub fn eval_poly(&self, poly: &[u8], x: u8) -> u8 {
        poly.iter().fold(0, |acc, &c| self.add(self.mul(acc, x), c))
    }
}

impl Default for GaloisField {
    fn default() -> Self {
        Self::new()
    }
}
