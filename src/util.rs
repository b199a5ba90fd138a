use anyhow::{Context, Result};
use memmap2::Mmap;
use std::io::{Read, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::code_table::CodeTable;
use crate::feature_vector::FeatureVector;
use crate::tokenizer::Sketcher;

/// Read buffer for streamed input. 256 KB keeps syscall overhead low.
pub const READ_BUFFER_SIZE: usize = 256 * 1024;

/// A file's bytes, ready to be sketched.
///
/// The length always comes from the source itself; nothing relies on a
/// trailing sentinel byte.
#[derive(Debug)]
pub enum SketchInput {
    Mapped(Mmap),
    Empty,
}

impl Deref for SketchInput {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SketchInput::Mapped(map) => &map[..],
            SketchInput::Empty => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Forward-slash path relative to the walk root.
    pub relative_path: String,
    pub full_path: PathBuf,
    pub size: u64,
}

/// Walk a directory tree and collect every regular file with its relative path.
/// Paths use forward slashes regardless of platform.
pub fn walk_files(root: &Path) -> Result<Vec<FileEntry>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize path: {}", root.display()))?;

    let mut entries = Vec::new();

    for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in {}", root.display()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let full_path = entry.path().to_path_buf();
        let relative = full_path
            .strip_prefix(&root)
            .with_context(|| "Failed to compute relative path")?;

        let relative_str = relative
            .to_str()
            .with_context(|| format!("Non-UTF8 path: {}", relative.display()))?
            .replace('\\', "/");

        let meta = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata: {}", full_path.display()))?;

        entries.push(FileEntry {
            relative_path: relative_str,
            full_path,
            size: meta.len(),
        });
    }

    Ok(entries)
}

/// Memory-map a file for read-only access.
///
/// # Safety
/// The mapping is read-only. Callers must not concurrently truncate or replace
/// the underlying file while the `Mmap` is live.
pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    // SAFETY: We only read from this mapping; input files are not modified while sketching.
    unsafe {
        Mmap::map(&file)
            .with_context(|| format!("Failed to memory-map file: {}", path.display()))
    }
}

/// Open `path` as sketch input. Empty files are never mapped.
pub fn open_input(path: &Path) -> Result<SketchInput> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    if meta.len() == 0 {
        return Ok(SketchInput::Empty);
    }
    Ok(SketchInput::Mapped(mmap_file(path)?))
}

/// Sketch any reader without holding it all in memory.
pub fn sketch_reader<R: Read>(
    reader: R,
    table: &CodeTable,
    bit_width: usize,
) -> Result<(FeatureVector, u64)> {
    let mut reader = std::io::BufReader::with_capacity(READ_BUFFER_SIZE, reader);
    let mut sketcher = Sketcher::new(table, bit_width)?;
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input stream"),
        };
        sketcher.update(&buf[..n]);
    }

    let bytes = sketcher.bytes_seen();
    Ok((sketcher.finish(), bytes))
}

/// Write the raw feature vector to `output`, or to stdout when `None`.
pub fn write_sketch(fv: &FeatureVector, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(fv.as_bytes())
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            file.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(fv.as_bytes())
                .context("Failed to write feature vector to stdout")?;
            out.flush()?;
        }
    }
    Ok(())
}
