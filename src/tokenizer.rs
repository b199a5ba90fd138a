use rayon::prelude::*;

use crate::code_table::CodeTable;
use crate::error::Result;
use crate::feature_vector::FeatureVector;
use crate::word_hash::WordHasher;

/// Incremental sketcher: feed bytes in any number of chunks, then `finish`.
///
/// A word split across two `update` calls hashes exactly as if it had arrived
/// in one piece, since the pending fingerprint survives between calls.
pub struct Sketcher<'a> {
    table: &'a CodeTable,
    hasher: WordHasher,
    fv: FeatureVector,
    bytes_seen: u64,
}

impl<'a> Sketcher<'a> {
    pub fn new(table: &'a CodeTable, bit_width: usize) -> Result<Self> {
        Ok(Self {
            table,
            hasher: WordHasher::new(),
            fv: FeatureVector::new(bit_width)?,
            bytes_seen: 0,
        })
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            let code = self.table.code(byte);
            if code != 0 {
                self.hasher.push(code);
            } else {
                self.commit();
            }
        }
        self.bytes_seen += bytes.len() as u64;
    }

    pub fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }

    /// End of input counts as a boundary: flush the trailing word, if any.
    pub fn finish(mut self) -> FeatureVector {
        self.commit();
        self.fv
    }

    #[inline(always)]
    fn commit(&mut self) {
        if let Some(hash) = self.hasher.take() {
            let n = self.fv.bit_width();
            self.fv.set_bit(hash as usize % n);
        }
    }
}

/// Sketch a complete, length-delimited byte sequence in one pass.
pub fn sketch(bytes: &[u8], table: &CodeTable, bit_width: usize) -> Result<FeatureVector> {
    let mut sketcher = Sketcher::new(table, bit_width)?;
    sketcher.update(bytes);
    Ok(sketcher.finish())
}

/// Sketch a large buffer on the rayon pool.
///
/// The buffer is cut into pieces of roughly `chunk_size` bytes, each cut moved
/// forward to the next boundary byte so no word straddles two pieces. The
/// per-piece vectors are OR'd together, giving the same result as `sketch`.
pub fn sketch_parallel(
    bytes: &[u8],
    table: &CodeTable,
    bit_width: usize,
    chunk_size: usize,
) -> Result<FeatureVector> {
    let empty = FeatureVector::new(bit_width)?;
    let pieces = split_at_boundaries(bytes, table, chunk_size);
    if pieces.len() <= 1 {
        return sketch(bytes, table, bit_width);
    }

    pieces
        .par_iter()
        .map(|piece| sketch(piece, table, bit_width))
        .try_reduce(
            || empty.clone(),
            |mut acc, fv| {
                acc.union_with(&fv)?;
                Ok(acc)
            },
        )
}

/// Cut `bytes` into word-aligned pieces of at least `chunk_size` bytes (except the last).
pub fn split_at_boundaries<'b>(
    bytes: &'b [u8],
    table: &CodeTable,
    chunk_size: usize,
) -> Vec<&'b [u8]> {
    let chunk_size = chunk_size.max(1);
    let mut pieces = Vec::with_capacity(bytes.len() / chunk_size + 1);
    let mut start = 0;

    while start < bytes.len() {
        let mut end = (start + chunk_size).min(bytes.len());
        while end < bytes.len() && table.is_word_byte(bytes[end]) {
            end += 1;
        }
        pieces.push(&bytes[start..end]);
        start = end;
    }

    pieces
}
