use crate::error::{Result, SketchError};

/// Fixed-width bitset holding one bit per distinct word fingerprint.
///
/// Byte `i / 8` holds bit `i`, at position `i % 8` counted from the least
/// significant end. The buffer is `ceil(bit_width / 8)` bytes for its whole life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    bit_width: usize,
    bits: Vec<u8>,
}

impl FeatureVector {
    /// Allocate an all-zero vector of `bit_width` bits.
    pub fn new(bit_width: usize) -> Result<Self> {
        if bit_width == 0 {
            return Err(SketchError::InvalidBitWidth);
        }
        Ok(Self {
            bit_width,
            bits: vec![0u8; bit_width.div_ceil(8)],
        })
    }

    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    pub fn byte_len(&self) -> usize {
        self.bits.len()
    }

    /// Set bit `index`. Idempotent. `index` must be below `bit_width`.
    #[inline(always)]
    pub fn set_bit(&mut self, index: usize) {
        assert!(index < self.bit_width, "bit {index} out of range for width {}", self.bit_width);
        self.bits[index >> 3] |= 1u8 << (index & 7);
    }

    pub fn get_bit(&self, index: usize) -> bool {
        index < self.bit_width && self.bits[index >> 3] & (1u8 << (index & 7)) != 0
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &byte)| byte != 0)
            .flat_map(|(i, &byte)| {
                (0..8usize)
                    .filter(move |bit| byte & (1u8 << bit) != 0)
                    .map(move |bit| i * 8 + bit)
            })
    }

    /// OR `other` into `self`. Both must have the same width.
    pub fn union_with(&mut self, other: &FeatureVector) -> Result<()> {
        if self.bit_width != other.bit_width {
            return Err(SketchError::WidthMismatch {
                left: self.bit_width,
                right: other.bit_width,
            });
        }
        for (dst, src) in self.bits.iter_mut().zip(&other.bits) {
            *dst |= *src;
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Copy of the raw buffer, no header.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }
}
