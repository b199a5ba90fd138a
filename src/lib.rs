//! Streaming word-hashing feature vectors (SpeedyFx).
//!
//! Text goes in as raw bytes, one bit per distinct word comes out in a
//! fixed-width bitset:
//!
//! - [`CodeTable`]: seed-derived, case-folded byte -> code lookup
//! - [`WordHasher`]: `h = (h >> 1) + code` rolling fingerprint per word
//! - [`FeatureVector`]: the fixed-width output bitset
//! - [`sketch`] / [`Sketcher`]: the single pass tying them together
//!
//! ```
//! use speedyfx::{sketch, CodeTable};
//!
//! let table = CodeTable::build(0xDEADBEEF);
//! let fv = sketch(b"Hello, hello world", &table, 1 << 20).unwrap();
//! assert_eq!(fv.count_ones(), 2);
//! ```

pub mod batch;
pub mod code_table;
pub mod config;
pub mod error;
pub mod feature_vector;
pub mod tokenizer;
pub mod util;
pub mod word_hash;

pub use code_table::CodeTable;
pub use config::{SketchConfig, DEFAULT_BIT_WIDTH, DEFAULT_SEED};
pub use error::SketchError;
pub use feature_vector::FeatureVector;
pub use tokenizer::{sketch, sketch_parallel, Sketcher};
pub use word_hash::WordHasher;
