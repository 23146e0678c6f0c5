//! Cookies
//!
//! A cookie remembers small amounts of state between plugin invocations:
//! file positions, counters and the like. Contents are serialized as
//! pretty-printed JSON so administrators can inspect and edit the state
//! file with ordinary tools. Commits replace the file atomically
//! (write-temp-then-rename); an invocation that fails before committing
//! leaves the last-known-good state untouched.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// On-disk shape of a cookie.
///
/// The generation timestamp identifies the last writer; it is refreshed on
/// every commit. There is no cross-process locking: concurrent invocations
/// race and the last commit wins, which is acceptable for the one-writer
/// cron-style deployments this is meant for.
#[derive(Debug, Serialize, Deserialize)]
struct CookieFile {
    generation: DateTime<Utc>,
    data: BTreeMap<String, Value>,
}

/// Persistent keyed store backed by a single JSON file.
///
/// ```no_run
/// use sondeur::Cookie;
///
/// # fn main() -> sondeur::Result<()> {
/// let hits = Cookie::with("/var/tmp/check_example.state", |cookie| {
///     let hits: u64 = cookie.get_as("hits").unwrap_or(0);
///     cookie.insert("hits", hits + 1);
///     Ok(hits)
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cookie {
    path: Option<PathBuf>,
    data: BTreeMap<String, Value>,
}

impl Cookie {
    /// Opens the state file at `path`, creating an empty cookie if the file
    /// does not exist yet.
    ///
    /// A file that exists but does not parse as a cookie is truncated
    /// before the error is returned, so a damaged state file costs one run,
    /// not every run from then on.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str::<CookieFile>(&raw) {
                Ok(file) => file.data,
                Err(err) => {
                    debug!(path = %path.display(), %err, "state file damaged, truncating");
                    let _ = fs::write(&path, "");
                    return Err(Error::StoreFormat {
                        path,
                        detail: err.to_string(),
                    });
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(Error::store_io(path, err)),
        };
        Ok(Cookie {
            path: Some(path),
            data,
        })
    }

    /// Creates a cookie with no backing file.
    ///
    /// An oblivious cookie behaves normally but forgets everything when
    /// dropped; useful for explicitly throwing away state (e.g. behind a
    /// command line flag) or in tests.
    pub fn oblivious() -> Self {
        Cookie {
            path: None,
            data: BTreeMap::new(),
        }
    }

    /// Scoped open-use-commit: opens `path`, runs `f`, and commits only
    /// when `f` succeeds. On error nothing is written and the last
    /// committed state survives.
    pub fn with<T, F>(path: impl AsRef<Path>, f: F) -> Result<T>
    where
        F: FnOnce(&mut Cookie) -> Result<T>,
    {
        let mut cookie = Cookie::open(path)?;
        let value = f(&mut cookie)?;
        cookie.commit()?;
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Deserializes the value under `key`, if present and convertible.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Persists the current contents.
    ///
    /// The new state is written to a temporary file in the same directory,
    /// flushed to disk and renamed over the target, so readers only ever
    /// observe a complete state file. Oblivious cookies commit to nowhere.
    pub fn commit(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = CookieFile {
            generation: Utc::now(),
            data: self.data.clone(),
        };
        let mut raw = serde_json::to_string_pretty(&file).map_err(|err| Error::StoreFormat {
            path: path.clone(),
            detail: err.to_string(),
        })?;
        raw.push('\n');

        let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
        let write = |raw: &str| -> std::io::Result<()> {
            let mut out = fs::File::create(&tmp)?;
            out.write_all(raw.as_bytes())?;
            out.sync_all()?;
            fs::rename(&tmp, path)?;
            Ok(())
        };
        write(&raw).map_err(|err| {
            let _ = fs::remove_file(&tmp);
            Error::store_io(path.clone(), err)
        })?;
        debug!(path = %path.display(), keys = self.data.len(), "state committed");
        Ok(())
    }
}
