//! Per-run file content cache

use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File text keyed by path. Each file is read from disk at most once per run;
/// concurrent loads of the same path share one read.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: DashMap<PathBuf, Arc<str>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached text of `path`, reading it on first request. Failed reads are
    /// not cached. Invalid UTF-8 is replaced rather than rejected.
    pub fn load(&self, path: &Path) -> io::Result<Arc<str>> {
        if let Some(text) = self.entries.get(path) {
            return Ok(Arc::clone(&text));
        }

        // the entry lock is held while reading, so a concurrent load of the
        // same path waits here instead of reading again
        let text = self
            .entries
            .entry(path.to_path_buf())
            .or_try_insert_with(|| read_text(path))?;
        Ok(Arc::clone(&text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_text(path: &Path) -> io::Result<Arc<str>> {
    let bytes = fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };
    Ok(Arc::from(text))
}
