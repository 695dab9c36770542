use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::pipeline::Result;

/// Wrap `source` in a single-entry Deflate zip at `dest`.
///
/// The entry is named by the file's base name only, with no directory
/// path embedded. A pre-existing container at `dest` is overwritten.
pub fn compress_file(source: &Path, dest: &Path) -> Result<()> {
    let entry_name = source
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"))?
        .to_string_lossy()
        .to_string();

    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);
    writer.start_file(entry_name, options)?;

    let mut reader = File::open(source)?;
    io::copy(&mut reader, &mut writer)?;
    writer.finish()?.flush()?;

    Ok(())
}

/// Extract every entry of `container` into `target_dir`.
///
/// Each output file is written to a `.tmp` sibling and renamed into
/// place once complete, so an existing file at the target path is
/// replaced in a single step rather than truncated mid-write. Entries
/// whose names would escape `target_dir` are skipped.
pub fn extract_all(container: &Path, target_dir: &Path) -> Result<()> {
    let file = File::open(container)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => continue,
        };
        let out_path = target_dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = match out_path.file_name() {
            Some(name) => out_path.with_file_name(format!("{}.tmp", name.to_string_lossy())),
            None => continue,
        };
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        io::copy(&mut entry, &mut writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &out_path)?;
    }

    Ok(())
}
