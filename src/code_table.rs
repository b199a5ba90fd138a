//! Seed-derived byte -> contribution lookup.
//!
//! Every alphanumeric ASCII byte maps to a pseudo-random 32-bit code keyed by
//! its lowercase form, so `'A'` and `'a'` contribute the same value. Every other
//! byte (including 0 and all bytes >= 0x80) maps to 0, which marks a word boundary.

use crate::config::DEFAULT_SEED;

pub const TABLE_SIZE: usize = 256;

const RAND_MULTIPLIER: u32 = 0x10A8_60C1;
const RAND_MODULUS: u32 = 0xFFFF_FFFB;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    seed: u32,
    entries: [u32; TABLE_SIZE],
}

impl CodeTable {
    /// Build the table for `seed`. Deterministic and infallible.
    pub fn build(seed: u32) -> Self {
        // rand[0] = seed; rand[i] = (rand[i-1] * MULT mod 2^32) mod MODULUS
        let mut rand = [0u32; TABLE_SIZE];
        rand[0] = seed;
        for i in 1..TABLE_SIZE {
            rand[i] = rand[i - 1].wrapping_mul(RAND_MULTIPLIER) % RAND_MODULUS;
        }

        let mut entries = [0u32; TABLE_SIZE];
        for (byte, entry) in entries.iter_mut().enumerate().skip(1) {
            let fold = fold(byte as u8);
            if fold != 0 {
                *entry = rand[fold as usize];
            }
        }

        Self { seed, entries }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Contribution of `byte`; 0 means "not part of a word".
    #[inline(always)]
    pub fn code(&self, byte: u8) -> u32 {
        self.entries[byte as usize]
    }

    #[inline]
    pub fn is_word_byte(&self, byte: u8) -> bool {
        self.code(byte) != 0
    }

    pub fn entries(&self) -> &[u32; TABLE_SIZE] {
        &self.entries
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::build(DEFAULT_SEED)
    }
}

/// Case-insensitive canonical form of a byte, 0 for non-alphanumerics.
fn fold(byte: u8) -> u8 {
    if byte.is_ascii_alphanumeric() {
        byte.to_ascii_lowercase()
    } else {
        0
    }
}
