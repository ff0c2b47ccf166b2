//! Size-based rotation for the server log file.
//!
//! Rotates the live log when it exceeds 5 MiB. Rotated copies are
//! gzip-compressed and numbered:
//!   hookrun.log → hookrun.log.1.gz → hookrun.log.2.gz → …
//! At most 10 compressed copies are kept, and copies older than the
//! 30-day retention window are pruned after each rotation.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Maximum live log size before rotation (5 MiB).
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Maximum number of rotated, compressed copies to keep.
pub const MAX_ROTATED_FILES: usize = 10;

/// Rotated copies older than this are deleted.
pub const RETENTION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Rotate `log_path` if its size exceeds `max_bytes`.
///
/// Rotation sequence (oldest first):
///   `<name>.<max_files>.gz` deleted
///   `<name>.<n>.gz` → `<name>.<n+1>.gz` for n = max_files-1 … 1
///   `<name>` compressed into `<name>.1.gz`
///   `<name>` truncated.
///
/// Returns `true` if rotation occurred, `false` if the file was under the
/// threshold (or did not exist yet).
///
/// # Errors
/// Returns `io::Error` only on unexpected filesystem failures; missing
/// files are silently skipped.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if size < max_bytes {
        return Ok(false);
    }

    rotate_now(log_path, max_files)?;
    Ok(true)
}

/// Rotate unconditionally: shift the numbered copies, compress the live
/// log into `.1.gz`, truncate the live log.
fn rotate_now(log_path: &Path, max_files: usize) -> io::Result<()> {
    // Remove the oldest copy so the shift below never exceeds max_files.
    let oldest = numbered_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    // Shift existing rotated copies up by one.
    for n in (1..max_files).rev() {
        let src = numbered_path(log_path, n);
        let dst = numbered_path(log_path, n + 1);
        if src.exists() {
            fs::rename(&src, &dst)?;
        }
    }

    // Compress live log → .1.gz, then truncate the live file so the
    // writer always has a writable path.
    compress_into(log_path, &numbered_path(log_path, 1))?;
    File::create(log_path)?;

    Ok(())
}

/// Delete rotated copies of `log_path` older than `retention`.
///
/// Returns the number of copies removed. Files with an unreadable
/// modification time are left alone.
pub fn prune_old_backups(
    log_path: &Path,
    max_files: usize,
    retention: Duration,
) -> io::Result<usize> {
    let mut removed = 0;
    for n in 1..=max_files {
        let backup = numbered_path(log_path, n);
        let Ok(meta) = fs::metadata(&backup) else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if modified.elapsed().is_ok_and(|age| age >= retention) {
            fs::remove_file(&backup)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Build the path for the `n`-th rotated copy of `base`
/// (e.g. `hookrun.log.2.gz`).
fn numbered_path(base: &Path, n: usize) -> PathBuf {
    let name = base
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("hookrun.log");
    base.with_file_name(format!("{name}.{n}.gz"))
}

/// Gzip `src` into `dst`.
fn compress_into(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = File::open(src)?;
    let mut encoder = GzEncoder::new(File::create(dst)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Rotating writer
// ---------------------------------------------------------------------------

/// `io::Write` sink that appends to the live log file and rotates it when
/// it grows past the size threshold.
///
/// Cloneable so it can serve as a `MakeWriter` for the tracing fmt layer;
/// clones share one file handle behind a mutex, which also serializes
/// interleaved writes from concurrent requests.
#[derive(Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_files: usize,
    retention: Duration,
}

impl RotatingFileWriter {
    /// Open (or create) the live log file in append mode.
    pub fn new(
        path: PathBuf,
        max_bytes: u64,
        max_files: usize,
        retention: Duration,
    ) -> io::Result<Self> {
        let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingFile {
                path,
                file,
                written,
                max_bytes,
                max_files,
                retention,
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RotatingFile> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().file.flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Rotate before the write that would push the live file past the
        // threshold; an empty live file is never rotated.
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        rotate_now(&self.path, self.max_files)?;
        self.file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = 0;
        // Best-effort; the sink must keep accepting writes, and this runs
        // inside the tracing pipeline so it must not log.
        let _ = prune_old_backups(&self.path, self.max_files, self.retention);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    const TEST_MAX_BYTES: u64 = 4 * 1024;
    const TEST_MAX_FILES: usize = 3;

    fn make_log(dir: &TempDir, name: &str, size_bytes: usize) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![b'x'; size_bytes]).unwrap();
        path
    }

    fn decompress(path: &Path) -> Vec<u8> {
        let mut decoder = GzDecoder::new(File::open(path).unwrap());
        let mut content = Vec::new();
        decoder.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn rotation_noop_when_file_under_threshold() {
        let dir = TempDir::new().unwrap();
        let log = make_log(&dir, "hookrun.log", 100);

        let rotated = rotate_if_needed(&log, TEST_MAX_BYTES, TEST_MAX_FILES).unwrap();

        assert!(!rotated, "should not rotate a small file");
        assert!(!numbered_path(&log, 1).exists(), "no .1.gz should exist");
    }

    #[test]
    fn rotation_compresses_and_truncates_oversized_file() {
        let dir = TempDir::new().unwrap();
        let log = make_log(&dir, "hookrun.log", TEST_MAX_BYTES as usize + 1);

        let rotated = rotate_if_needed(&log, TEST_MAX_BYTES, TEST_MAX_FILES).unwrap();
        assert!(rotated, "should rotate an oversized file");

        // Live log exists and is empty again.
        assert_eq!(fs::metadata(&log).unwrap().len(), 0);

        // The compressed copy round-trips to the original content.
        let backup = numbered_path(&log, 1);
        assert!(backup.exists(), "hookrun.log.1.gz should exist");
        assert_eq!(
            decompress(&backup),
            vec![b'x'; TEST_MAX_BYTES as usize + 1]
        );
    }

    #[test]
    fn max_rotated_files_are_capped() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("hookrun.log");

        for n in 1..=TEST_MAX_FILES {
            fs::write(numbered_path(&log, n), format!("rotated-{n}")).unwrap();
        }
        make_log(&dir, "hookrun.log", TEST_MAX_BYTES as usize + 1);

        let rotated = rotate_if_needed(&log, TEST_MAX_BYTES, TEST_MAX_FILES).unwrap();
        assert!(rotated);

        assert!(numbered_path(&log, TEST_MAX_FILES).exists());
        assert!(
            !numbered_path(&log, TEST_MAX_FILES + 1).exists(),
            "must not keep more than {TEST_MAX_FILES} compressed copies"
        );
    }

    #[test]
    fn sequential_rotations_shift_copies_correctly() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("hookrun.log");

        for round in 1..=3usize {
            fs::write(&log, vec![b'0' + round as u8; TEST_MAX_BYTES as usize + 1]).unwrap();
            rotate_if_needed(&log, TEST_MAX_BYTES, TEST_MAX_FILES).unwrap();
        }

        // Newest copy is .1.gz (round 3), oldest surviving is .3.gz (round 1).
        assert_eq!(
            decompress(&numbered_path(&log, 1)),
            vec![b'3'; TEST_MAX_BYTES as usize + 1]
        );
        assert_eq!(
            decompress(&numbered_path(&log, 3)),
            vec![b'1'; TEST_MAX_BYTES as usize + 1]
        );
        assert!(!numbered_path(&log, 4).exists());
    }

    #[test]
    fn rotation_skips_missing_file_gracefully() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("nonexistent.log");

        let rotated = rotate_if_needed(&log, TEST_MAX_BYTES, TEST_MAX_FILES).unwrap();
        assert!(!rotated);
    }

    #[test]
    fn prune_removes_copies_past_retention() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("hookrun.log");
        fs::write(numbered_path(&log, 1), "old").unwrap();
        fs::write(numbered_path(&log, 2), "older").unwrap();

        // Zero retention means every existing copy is already too old.
        let removed = prune_old_backups(&log, TEST_MAX_FILES, Duration::ZERO).unwrap();

        assert_eq!(removed, 2);
        assert!(!numbered_path(&log, 1).exists());
        assert!(!numbered_path(&log, 2).exists());
    }

    #[test]
    fn prune_keeps_copies_within_retention() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("hookrun.log");
        fs::write(numbered_path(&log, 1), "fresh").unwrap();

        let removed = prune_old_backups(&log, TEST_MAX_FILES, RETENTION).unwrap();

        assert_eq!(removed, 0);
        assert!(numbered_path(&log, 1).exists());
    }

    #[test]
    fn writer_rotates_while_appending() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("hookrun.log");
        let mut writer =
            RotatingFileWriter::new(log.clone(), 100, TEST_MAX_FILES, RETENTION).unwrap();

        let line = vec![b'a'; 60];
        for _ in 0..3 {
            writer.write_all(&line).unwrap();
        }
        writer.flush().unwrap();

        assert!(
            numbered_path(&log, 1).exists(),
            "writer should have rotated once past the threshold"
        );
        assert!(fs::metadata(&log).unwrap().len() <= 100);
    }

    #[test]
    fn writer_resumes_tracking_size_of_existing_file() {
        let dir = TempDir::new().unwrap();
        let log = make_log(&dir, "hookrun.log", 90);

        // 90 existing + 60 new > 100 forces a rotation before the write.
        let mut writer =
            RotatingFileWriter::new(log.clone(), 100, TEST_MAX_FILES, RETENTION).unwrap();
        writer.write_all(&vec![b'b'; 60]).unwrap();
        writer.flush().unwrap();

        assert!(numbered_path(&log, 1).exists());
        assert_eq!(decompress(&numbered_path(&log, 1)), vec![b'x'; 90]);
        assert_eq!(fs::metadata(&log).unwrap().len(), 60);
    }
}
