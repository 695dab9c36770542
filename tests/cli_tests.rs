use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn zipchunk_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_zipchunk"));
    cmd.current_dir(dir);
    cmd
}

/// Pseudo-random bytes that deflate cannot shrink much, so a few MiB of
/// input still yields a multi-chunk container.
fn noisy(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

#[test]
fn test_cli_split_and_recover_round_trip() {
    let temp = TempDir::new().unwrap();
    let data = noisy(3 * 1024 * 1024);
    fs::write(temp.path().join("data.bin"), &data).unwrap();

    let output = zipchunk_cmd(temp.path())
        .arg("--auto-remove")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mode: COMPRESS AND SPLIT"));
    assert!(stdout.contains("Done!"));

    assert!(!temp.path().join("data.bin").exists());
    let chunk_dir = temp.path().join("data.bin.dir");
    assert!(chunk_dir.join("data.bin.zip.1").exists());
    // Incompressible 3 MiB input means more than one 1 MiB chunk.
    assert!(chunk_dir.join("data.bin.zip.2").exists());
    assert!(!temp.path().join("data.bin.zip").exists());
    assert!(!temp.path().join("data.bin.zip.tmp").exists());

    let output = zipchunk_cmd(temp.path())
        .args(["--recover", "--auto-remove"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mode: RECOVER"));
    assert!(stdout.contains("Done!"));

    assert_eq!(fs::read(temp.path().join("data.bin")).unwrap(), data);
    assert!(!chunk_dir.exists());
}

#[test]
fn test_cli_leaves_small_files_alone() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), b"well under a megabyte").unwrap();

    let output = zipchunk_cmd(temp.path()).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Done!"));

    assert!(temp.path().join("notes.txt").exists());
    assert!(!temp.path().join("notes.txt.dir").exists());
}

#[test]
fn test_cli_keeps_source_without_auto_remove() {
    let temp = TempDir::new().unwrap();
    let data = noisy(2 * 1024 * 1024);
    fs::write(temp.path().join("data.bin"), &data).unwrap();

    let output = zipchunk_cmd(temp.path()).arg("--verbose").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created chunk"));

    assert_eq!(fs::read(temp.path().join("data.bin")).unwrap(), data);
    assert!(temp.path().join("data.bin.dir").exists());
}

#[test]
fn test_cli_reports_summary() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("small.txt"), b"tiny").unwrap();
    fs::write(temp.path().join("big.bin"), noisy(2 * 1024 * 1024)).unwrap();

    let output = zipchunk_cmd(temp.path()).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 split, 0 recovered, 1 skipped, 0 failed"));
}
