use crate::error::{Result, SketchError};

/// Seed used by the reference tool when none is given.
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// 1 Mi bits, i.e. a 128 KiB feature vector.
pub const DEFAULT_BIT_WIDTH: usize = 1024 * 1024;

/// The two knobs that cross into the core: table seed and output width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchConfig {
    pub seed: u32,
    pub bit_width: usize,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            bit_width: DEFAULT_BIT_WIDTH,
        }
    }
}

impl SketchConfig {
    pub fn new(seed: u32, bit_width: usize) -> Self {
        Self { seed, bit_width }
    }

    /// Fail fast on a zero-width vector, before any input is touched.
    pub fn validate(&self) -> Result<()> {
        if self.bit_width == 0 {
            return Err(SketchError::InvalidBitWidth);
        }
        Ok(())
    }

    /// Size of the emitted buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.bit_width.div_ceil(8)
    }
}

/// Parse a seed given either as decimal or as `0x`-prefixed hex.
pub fn parse_seed(raw: &str) -> std::result::Result<u32, String> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => raw.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid seed '{raw}': {e}"))
}
