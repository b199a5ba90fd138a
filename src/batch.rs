use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::code_table::CodeTable;
use crate::config::SketchConfig;
use crate::tokenizer;
use crate::util;

/// Extension appended to each input's relative path in the output tree.
pub const OUTPUT_EXTENSION: &str = "fv";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub files_sketched: usize,
    pub bytes_read: u64,
    pub bits_set: usize,
}

/// Sketch every file under `input_dir` into `output_dir/<relative path>.fv`.
///
/// The walk runs on Tokio's blocking pool; the sketches run on Rayon, one file
/// per task, all reading the same code table.
pub async fn sketch_tree(
    input_dir: &Path,
    output_dir: &Path,
    config: &SketchConfig,
) -> Result<BatchSummary> {
    config.validate()?;

    // Stage 1: walk
    let input_owned = input_dir.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || util::walk_files(&input_owned)).await??;
    info!(files = entries.len(), root = %input_dir.display(), "collected input files");

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    // Stage 2: build the table once, sketch and write in parallel
    let config = *config;
    let output_root = output_dir.to_path_buf();
    let results = tokio::task::spawn_blocking(move || -> Result<Vec<(u64, usize)>> {
        let table = CodeTable::build(config.seed);
        entries
            .par_iter()
            .map(|entry| -> Result<(u64, usize)> {
                let input = util::open_input(&entry.full_path)?;
                let fv = tokenizer::sketch(&input, &table, config.bit_width)?;
                let out_path = output_path(&output_root, &entry.relative_path);
                util::write_sketch(&fv, Some(&out_path))?;
                debug!(path = %entry.relative_path, bytes = entry.size, bits = fv.count_ones(), "sketched");
                Ok((input.len() as u64, fv.count_ones()))
            })
            .collect()
    })
    .await??;

    let summary = results.iter().fold(BatchSummary::default(), |mut acc, &(bytes, bits)| {
        acc.files_sketched += 1;
        acc.bytes_read += bytes;
        acc.bits_set += bits;
        acc
    });

    Ok(summary)
}

/// `<root>/<relative>.fv`, keeping the input's own extension.
pub fn output_path(root: &Path, relative: &str) -> PathBuf {
    root.join(format!("{relative}.{OUTPUT_EXTENSION}"))
}
