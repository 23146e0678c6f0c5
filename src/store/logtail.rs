//! Log Tailing
//!
//! [`LogTail`] gives a probe the lines appended to a growing file since the
//! last invocation. The last read position is kept in a [`Cookie`] record
//! together with a fingerprint of the file's first bytes; when the
//! fingerprint no longer matches, or the file shrank below the stored
//! position, the file was rotated or truncated and the tail replays it from
//! the start. Replaying was chosen over skipping: for alerting, seeing a
//! line twice beats never seeing it.
//!
//! The new position is committed only after the caller's closure succeeds,
//! so a failure while processing lines re-delivers the same lines on the
//! next run (at-least-once, never at-most-once).

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::cookie::Cookie;

/// How many leading bytes identify a file.
///
/// Inode numbers are not portable, so identity is a hash of the file's
/// first bytes: stable under append, different after rotation.
const FINGERPRINT_LEN: u64 = 1024;

#[derive(Debug, Serialize, Deserialize)]
struct TailRecord {
    pos: u64,
    prefix_len: u64,
    prefix_sha256: String,
}

/// Resumable reader over a growing file.
///
/// ```no_run
/// use sondeur::{Cookie, LogTail};
///
/// # fn main() -> sondeur::Result<()> {
/// let cookie = Cookie::open("/var/tmp/check_syslog.state")?;
/// let mut tail = LogTail::new("/var/log/syslog", cookie);
/// let errors = tail.process(|lines| {
///     let mut errors = 0u64;
///     for line in lines {
///         if line?.windows(5).any(|w| w == b"ERROR") {
///             errors += 1;
///         }
///     }
///     Ok(errors)
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct LogTail {
    path: PathBuf,
    cookie: Cookie,
}

impl LogTail {
    /// Creates a tail over `path`, keeping its position in `cookie`.
    ///
    /// The cookie record is keyed by the absolute path, so one cookie can
    /// serve several tails over different files.
    pub fn new(path: impl Into<PathBuf>, cookie: Cookie) -> Self {
        LogTail {
            path: path.into(),
            cookie,
        }
    }

    /// Reads the unseen part of the file and hands it to `f` as a line
    /// iterator.
    ///
    /// The advanced position is committed to the cookie only when `f`
    /// returns `Ok`; an error leaves the stored position untouched and the
    /// same lines are delivered again on the next invocation.
    pub fn process<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut TailLines) -> Result<T>,
    {
        let key = self.record_key();
        let mut file = self.open_target()?;
        let size = file
            .metadata()
            .map_err(|err| Error::store_io(self.path.clone(), err))?
            .len();

        let start = self.resume_position(&mut file, size)?;
        debug!(path = %self.path.display(), size, start, "tailing");
        file.seek(SeekFrom::Start(start))
            .map_err(|err| Error::store_io(self.path.clone(), err))?;

        let mut lines = TailLines {
            reader: BufReader::new(file),
            pos: start,
        };
        let value = f(&mut lines)?;
        let pos = lines.pos;

        // Fingerprint the file as it was at open; appends do not change
        // the prefix, so hashing the reopened file is equivalent.
        let prefix_len = size.min(FINGERPRINT_LEN);
        let mut file = self.open_target()?;
        let fingerprint = prefix_sha256(&mut file, prefix_len)
            .map_err(|err| Error::store_io(self.path.clone(), err))?;

        self.cookie.insert(
            key,
            json!({
                "pos": pos,
                "prefix_len": prefix_len,
                "prefix_sha256": fingerprint,
            }),
        );
        self.cookie.commit()?;
        Ok(value)
    }

    /// Hands the cookie back, e.g. to tail another file with it.
    pub fn into_cookie(self) -> Cookie {
        self.cookie
    }

    fn open_target(&self) -> Result<File> {
        File::open(&self.path).map_err(|err| Error::store_io(self.path.clone(), err))
    }

    fn record_key(&self) -> String {
        let absolute = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.path))
                .unwrap_or_else(|_| self.path.clone())
        };
        absolute.to_string_lossy().into_owned()
    }

    /// Decides where reading resumes: the stored position when the stored
    /// fingerprint still matches and the file has not shrunk below it,
    /// otherwise offset zero (rotation/truncation replay).
    fn resume_position(&mut self, file: &mut File, size: u64) -> Result<u64> {
        let Some(record) = self.cookie.get_as::<TailRecord>(&self.record_key()) else {
            return Ok(0);
        };
        if record.prefix_len == 0 || size < record.prefix_len || size < record.pos {
            debug!(path = %self.path.display(), "rotation or truncation detected, replaying");
            return Ok(0);
        }
        let current = prefix_sha256(file, record.prefix_len)
            .map_err(|err| Error::store_io(self.path.clone(), err))?;
        if current != record.prefix_sha256 {
            debug!(path = %self.path.display(), "fingerprint changed, replaying");
            return Ok(0);
        }
        Ok(record.pos)
    }
}

/// Iterator over the unseen lines of the tailed file.
///
/// Yields each line without its terminator; a final line without a newline
/// is yielded too. The iterator is consumed once per invocation and is not
/// restartable within the same run.
pub struct TailLines {
    reader: BufReader<File>,
    pos: u64,
}

impl Iterator for TailLines {
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(n) => {
                self.pos += n as u64;
                if line.last() == Some(&b'\n') {
                    line.pop();
                }
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

fn prefix_sha256(file: &mut File, len: u64) -> std::io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut hasher = Sha256::new();
    let mut taken = file.take(len);
    std::io::copy(&mut taken, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;

    use super::*;

    fn append(path: &Path, content: &[u8]) {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        file.write_all(content).unwrap();
    }

    fn collect_lines(tail: &mut LogTail) -> Vec<String> {
        tail.process(|lines| {
            let mut out = Vec::new();
            for line in lines {
                out.push(String::from_utf8_lossy(&line?).into_owned());
            }
            Ok(out)
        })
        .unwrap()
    }

    fn tail_over(dir: &tempfile::TempDir, log: &Path) -> LogTail {
        let cookie = Cookie::open(dir.path().join("tail.state")).unwrap();
        LogTail::new(log, cookie)
    }

    #[test]
    fn test_first_run_reads_everything() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"one\ntwo\n");

        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["one", "two"]);
    }

    #[test]
    fn test_second_run_reads_only_new_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"one\ntwo\n");

        let mut tail = tail_over(&dir, &log);
        collect_lines(&mut tail);

        append(&log, b"three\n");
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["three"]);

        // Nothing new: nothing delivered.
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), Vec::<String>::new());
    }

    #[test]
    fn test_truncation_replays_from_start() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"a long line that will disappear\nanother\n");

        let mut tail = tail_over(&dir, &log);
        collect_lines(&mut tail);

        // Rotate: much shorter replacement content.
        std::fs::write(&log, b"fresh\n").unwrap();
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["fresh"]);
    }

    #[test]
    fn test_rotation_with_same_size_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"aaaa\nbbbb\n");

        let mut tail = tail_over(&dir, &log);
        collect_lines(&mut tail);

        // Same length, different content: the prefix fingerprint differs.
        std::fs::write(&log, b"cccc\ndddd\n").unwrap();
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["cccc", "dddd"]);
    }

    #[test]
    fn test_unterminated_final_line_is_delivered() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"done\npartial");

        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["done", "partial"]);

        // The partial line was consumed up to EOF; appending its rest
        // yields only the remainder.
        append(&log, b" line\n");
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), [" line"]);
    }

    #[test]
    fn test_failed_processing_does_not_advance() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        append(&log, b"one\ntwo\n");

        let mut tail = tail_over(&dir, &log);
        let failed: Result<()> = tail.process(|lines| {
            lines.next();
            Err(Error::InvalidTimespan("interrupted".into()))
        });
        assert!(failed.is_err());

        // The position was not committed: both lines come again.
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["one", "two"]);
    }

    #[test]
    fn test_grow_scenario_reads_exact_byte_window() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");

        // Invocation A: 100 bytes (10 lines of 10 bytes each).
        for i in 0..10 {
            append(&log, format!("line-{i:03}_\n").as_bytes());
        }
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail).len(), 10);

        // File grows to 150 bytes; invocation B sees exactly the 5 new lines.
        for i in 10..15 {
            append(&log, format!("line-{i:03}_\n").as_bytes());
        }
        let mut tail = tail_over(&dir, &log);
        let lines = collect_lines(&mut tail);
        assert_eq!(lines.first().map(String::as_str), Some("line-010_"));
        assert_eq!(lines.len(), 5);

        // Truncated to 20 bytes before invocation C: no negative-length
        // reads, just a replay of the fresh content.
        std::fs::write(&log, b"new-0____\nnew-1____\n").unwrap();
        let mut tail = tail_over(&dir, &log);
        assert_eq!(collect_lines(&mut tail), ["new-0____", "new-1____"]);
    }
}
