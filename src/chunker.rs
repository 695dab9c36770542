use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Default chunk size: 1 MiB per chunk file.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Split `source` into fixed-size chunk files under `out_dir`.
///
/// Chunk `N` (1-indexed, contiguous) is written to `out_dir/<stem>.<N>`.
/// Each chunk goes to a `.tmp` sibling first and is renamed once fully
/// written. The final chunk may be short; a stream whose length is an
/// exact multiple of `chunk_size` produces no trailing empty chunk.
///
/// Returns the chunk paths in write order.
pub fn write_chunks(
    source: &Path,
    out_dir: &Path,
    stem: &str,
    chunk_size: usize,
) -> io::Result<Vec<PathBuf>> {
    let mut reader = BufReader::new(File::open(source)?);
    let mut buf = vec![0u8; chunk_size];
    let mut chunks = Vec::new();
    let mut chunk_num = 1u64;

    loop {
        let len = read_block(&mut reader, &mut buf)?;
        if len == 0 {
            break;
        }

        let chunk_path = out_dir.join(format!("{}.{}", stem, chunk_num));
        let tmp_path = out_dir.join(format!("{}.{}.tmp", stem, chunk_num));

        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(&buf[..len])?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &chunk_path)?;

        chunks.push(chunk_path);
        chunk_num += 1;
    }

    Ok(chunks)
}

/// Read until `buf` is full or the stream ends, returning the byte count.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Find the chunk files for `stem` in `dir`, sorted by chunk number.
///
/// A chunk file is named exactly `<stem>.<N>` with `N` a decimal integer;
/// the sort is numeric, so `.2` comes before `.10`. Anything else in the
/// directory (including `.tmp` leftovers) is ignored. Matching is plain
/// string comparison, so stems containing glob metacharacters need no
/// special handling.
pub fn collect_chunks(dir: &Path, stem: &str) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", stem);
    let mut numbered: Vec<(u64, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(suffix) = name.strip_prefix(&prefix) {
            if let Ok(num) = suffix.parse::<u64>() {
                numbered.push((num, entry.path()));
            }
        }
    }

    numbered.sort_by_key(|(num, _)| *num);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Concatenate `chunks` in the given order into `dest`, returning the
/// total byte count. A pre-existing `dest` is truncated, so a leftover
/// temporary container from an interrupted run is simply overwritten.
pub fn concat_chunks(chunks: &[PathBuf], dest: &Path) -> io::Result<u64> {
    let mut writer = BufWriter::new(File::create(dest)?);
    let mut total = 0u64;

    for chunk in chunks {
        let mut reader = File::open(chunk)?;
        total += io::copy(&mut reader, &mut writer)?;
    }

    writer.flush()?;
    Ok(total)
}
