use std::sync::Arc;

use super::galois::GaloisField;
use crate::common::error::{QRError, QRResult};

// Reed-Solomon encoder
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder {
    field: Arc<GaloisField>,
    // Generator polynomials indexed by degree, coefficients highest degree first
    generators: Vec<Vec<u8>>,
}

impl ReedSolomonEncoder {
    pub fn new(field: Arc<GaloisField>) -> Self {
        Self { field, generators: vec![vec![1]] }
    }

    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    // Product of (x - a^i) for i in 0..degree, built on top of the largest cached one
    fn cache_generator(&mut self, degree: usize) {
        while self.generators.len() <= degree {
            let i = self.generators.len() - 1;
            let prev = &self.generators[i];
            let root = self.field.exp(i);
            let mut next = prev.clone();
            next.push(0);
            for (j, &c) in prev.iter().enumerate() {
                next[j + 1] = self.field.add(next[j + 1], self.field.mul(c, root));
            }
            self.generators.push(next);
        }
    }

    pub fn generator(&mut self, degree: usize) -> QRResult<&[u8]> {
        if degree == 0 {
            return Err(QRError::FieldArithmetic("generator of degree zero"));
        }
        self.cache_generator(degree);
        Ok(&self.generators[degree])
    }

    // Remainder of data * x^ec_len divided by the generator of degree ec_len
    pub fn encode(&mut self, data: &[u8], ec_len: usize) -> QRResult<Vec<u8>> {
        if ec_len == 0 {
            return Err(QRError::FieldArithmetic("generator of degree zero"));
        }
        self.cache_generator(ec_len);
        let gen_poly = &self.generators[ec_len];
        let gf = &self.field;

        let len = data.len();
        let mut res = data.to_vec();
        res.resize(len + ec_len, 0);
        for i in 0..len {
            let lead = res[i];
            if lead == 0 {
                continue;
            }
            for (u, &g) in res[i + 1..].iter_mut().zip(gen_poly[1..].iter()) {
                *u = gf.add(*u, gf.mul(g, lead));
            }
        }

        Ok(res.split_off(len))
    }

    // Codeword polynomial evaluated at the generator roots, all zero for a valid block
    pub fn syndromes(&self, codewords: &[u8], ec_len: usize) -> Vec<u8> {
        (0..ec_len).map(|i| self.field.eval_poly(codewords, self.field.exp(i))).collect()
    }
}
