use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::chunker::{self, DEFAULT_CHUNK_SIZE};
use crate::container;

/// Default size threshold: files at or below 1 MiB are left untouched.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 1024 * 1024;

/// Suffix of a chunk directory, appended to the original file name.
pub const CHUNK_DIR_SUFFIX: &str = ".dir";

/// Suffix of the intermediate compressed container.
pub const CONTAINER_SUFFIX: &str = ".zip";

/// Pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("container error: {0}")]
    Container(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Per-run settings for the split and recovery pipelines.
///
/// The threshold and chunk size are configuration rather than process-wide
/// constants, so callers (and tests) can override them per run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Files at or below this size are left untouched by split.
    pub size_threshold: u64,
    /// Bytes per chunk file, except possibly the last.
    pub chunk_size: usize,
    /// Delete the pre-image (source file or chunk directory) on success.
    pub auto_remove: bool,
    /// Print step-by-step progress lines.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            auto_remove: false,
            verbose: false,
        }
    }
}

/// Result of processing one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was compressed and split into this many chunks.
    Split { chunks: usize },
    /// The original file was reconstituted at this path.
    Recovered { path: PathBuf },
    /// Nothing to do for this entry.
    Skipped(SkipReason),
}

/// Why an entry was skipped. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File size is at or below the split threshold.
    BelowThreshold { size: u64 },
    /// Directory name does not end in `.dir`.
    NotChunkDir,
    /// Chunk directory contains no chunk files.
    NoChunks,
}

/// Compress `path` and split the container into chunk files.
///
/// Files at or below the threshold are skipped. The chunk directory
/// `<name>.dir` is created next to the file (no error if it already
/// exists), the container is built at the temporary path `<name>.zip.tmp`,
/// split into `<name>.zip.<N>` chunks, and deleted. With `auto_remove`
/// the source file is deleted last.
pub fn split_file(path: &Path, config: &Config) -> Result<Outcome> {
    let size = fs::metadata(path)?.len();
    if size <= config.size_threshold {
        if config.verbose {
            println!(
                "Skipping {} (size: {} bytes <= {} bytes)",
                path.display(),
                size,
                config.size_threshold
            );
        }
        return Ok(Outcome::Skipped(SkipReason::BelowThreshold { size }));
    }

    println!("Processing {} (size: {} bytes)", path.display(), size);

    let file_name = file_name_of(path)?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let chunk_dir = parent.join(format!("{}{}", file_name, CHUNK_DIR_SUFFIX));
    match fs::create_dir(&chunk_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => return Err(e.into()),
    }
    if config.verbose {
        println!("  Created directory: {}", chunk_dir.display());
    }

    // The container only ever exists under a temporary name; an orphan
    // left by a crash is recognizable and never mistaken for real data.
    let container_stem = format!("{}{}", file_name, CONTAINER_SUFFIX);
    let container_path = parent.join(format!("{}.tmp", container_stem));
    container::compress_file(path, &container_path)?;
    if config.verbose {
        let compressed = fs::metadata(&container_path)?.len();
        println!(
            "  Compressed to: {} ({} bytes)",
            container_path.display(),
            compressed
        );
    }

    let chunks = chunker::write_chunks(
        &container_path,
        &chunk_dir,
        &container_stem,
        config.chunk_size,
    )?;
    if config.verbose {
        for chunk in &chunks {
            println!(
                "  Created chunk: {} ({} bytes)",
                chunk.display(),
                fs::metadata(chunk)?.len()
            );
        }
    }

    fs::remove_file(&container_path)?;
    if config.verbose {
        println!("  Removed temporary container: {}", container_path.display());
    }

    if config.auto_remove {
        fs::remove_file(path)?;
        if config.verbose {
            println!("  Removed original file: {}", path.display());
        }
    }

    Ok(Outcome::Split {
        chunks: chunks.len(),
    })
}

/// Reconstitute the original file from a chunk directory.
///
/// `dir` must be named `<original>.dir`; anything else is skipped. The
/// chunks are concatenated into `<parent>/<original>.zip.tmp`, the
/// container is extracted into the parent directory (recreating the
/// original file, replacing any file already at that path), and the
/// temporary container is deleted. With `auto_remove` the chunk
/// directory is removed recursively afterwards.
pub fn recover_dir(dir: &Path, config: &Config) -> Result<Outcome> {
    let dir_name = file_name_of(dir)?;
    let original_name = match dir_name.strip_suffix(CHUNK_DIR_SUFFIX) {
        Some(name) => name.to_string(),
        None => return Ok(Outcome::Skipped(SkipReason::NotChunkDir)),
    };
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));

    println!("Recovering {} from {}", original_name, dir.display());

    let container_stem = format!("{}{}", original_name, CONTAINER_SUFFIX);
    let chunks = chunker::collect_chunks(dir, &container_stem)?;
    if chunks.is_empty() {
        println!("  Warning: no chunk files found in {}", dir.display());
        return Ok(Outcome::Skipped(SkipReason::NoChunks));
    }
    if config.verbose {
        for chunk in &chunks {
            println!("  Concatenating {}", chunk.display());
        }
    }

    let container_path = parent.join(format!("{}.tmp", container_stem));
    let total = chunker::concat_chunks(&chunks, &container_path)?;
    if config.verbose {
        println!("  Created: {} ({} bytes)", container_path.display(), total);
    }

    container::extract_all(&container_path, parent)?;
    let recovered = parent.join(&original_name);
    if config.verbose {
        println!("  Extracted to: {}", recovered.display());
    }

    fs::remove_file(&container_path)?;
    if config.verbose {
        println!("  Removed temporary container: {}", container_path.display());
    }

    if config.auto_remove {
        fs::remove_dir_all(dir)?;
        if config.verbose {
            println!("  Removed directory: {}", dir.display());
        }
    }

    Ok(Outcome::Recovered { path: recovered })
}

fn file_name_of(path: &Path) -> io::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
}
