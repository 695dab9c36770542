use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::pipeline::{self, Config, Outcome, CHUNK_DIR_SUFFIX, CONTAINER_SUFFIX};

/// What a tree scan should do with the entries it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compress and split every eligible file.
    Split,
    /// Reconstitute files from `.dir` chunk directories.
    Recover,
}

/// Aggregate result of one tree scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Files compressed and split.
    pub split: usize,
    /// Files reconstituted from chunk directories.
    pub recovered: usize,
    /// Entries visited but left alone (below threshold, no chunks, ...).
    pub skipped: usize,
    /// Entries that failed, with the error message for each.
    pub failed: Vec<(PathBuf, String)>,
}

impl ScanReport {
    /// One-line summary for the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "{} split, {} recovered, {} skipped, {} failed",
            self.split,
            self.recovered,
            self.skipped,
            self.failed.len()
        )
    }
}

/// Walk the tree under `root` and process every entry per `mode`.
///
/// Entries are visited in name order at each level, so a run over the
/// same tree is deterministic. Each entry is processed independently: a
/// failure is printed, recorded in the report, and the scan moves on.
/// Symlinks are ignored. `own_exe` names the running binary so a copy
/// sitting inside the scanned tree is not split.
pub fn scan_tree(
    root: &Path,
    mode: Mode,
    config: &Config,
    own_exe: Option<&Path>,
) -> io::Result<ScanReport> {
    let own_exe = own_exe.and_then(|p| p.canonicalize().ok());
    let mut report = ScanReport::default();
    scan_level(root, mode, config, own_exe.as_deref(), &mut report)?;
    Ok(report)
}

fn scan_level(
    dir: &Path,
    mode: Mode,
    config: &Config,
    own_exe: Option<&Path>,
    report: &mut ScanReport,
) -> io::Result<()> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                record(Err(e.into()), &path, report);
                continue;
            }
        };
        if file_type.is_symlink() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();

        if file_type.is_dir() {
            if name.ends_with(CHUNK_DIR_SUFFIX) {
                // Chunk directories are never descended into: their
                // contents belong to the recovery pass.
                if mode == Mode::Recover {
                    record(pipeline::recover_dir(&path, config), &path, report);
                }
            } else if let Err(e) = scan_level(&path, mode, config, own_exe, report) {
                // An unreadable subdirectory fails that subtree only.
                record(Err(e.into()), &path, report);
            }
            continue;
        }

        if mode == Mode::Recover || !file_type.is_file() {
            continue;
        }

        if skip_in_split_mode(&path, &name, own_exe) {
            continue;
        }

        record(pipeline::split_file(&path, config), &path, report);
    }

    Ok(())
}

/// Split-mode exclusions: leftover containers and temporaries from a
/// previous run, and the tool's own binary if it sits in the tree.
fn skip_in_split_mode(path: &Path, name: &str, own_exe: Option<&Path>) -> bool {
    if name.ends_with(".zip.tmp") {
        return true;
    }
    if let Some(base) = name.strip_suffix(CONTAINER_SUFFIX) {
        if !base.is_empty() && path.with_file_name(base).exists() {
            return true;
        }
    }
    if let Some(exe) = own_exe {
        if path.canonicalize().map(|p| p == exe).unwrap_or(false) {
            return true;
        }
    }
    false
}

fn record(result: pipeline::Result<Outcome>, path: &Path, report: &mut ScanReport) {
    match result {
        Ok(Outcome::Split { .. }) => report.split += 1,
        Ok(Outcome::Recovered { .. }) => report.recovered += 1,
        Ok(Outcome::Skipped(_)) => report.skipped += 1,
        Err(e) => {
            println!("Error processing {}: {}", path.display(), e);
            report.failed.push((path.to_path_buf(), e.to_string()));
        }
    }
}
