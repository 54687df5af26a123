//! Incremental checking cache for `pmxc check`.
//!
//! Stores content hashes alongside check results to skip re-checking
//! unchanged files. Results are only reused when the configuration that
//! produced them is unchanged. The cache lives in `.pmxc-cache/` in the
//! project root.

use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

/// Name of the cache directory
const CACHE_DIR: &str = ".pmxc-cache";
/// Name of the cache file inside the directory
const CACHE_FILE: &str = "check-cache.json";

/// Cached result for a single file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedFileResult {
    /// Hash of the file contents when it was last checked
    pub content_hash: u64,
    /// Fingerprint of the configuration used for the check
    pub config_fingerprint: u64,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The on-disk cache structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckCache {
    /// Per-file cached results, keyed by canonical path
    files: HashMap<String, CachedFileResult>,
}

impl CheckCache {
    /// Load the cache from disk. A missing or unreadable cache is empty.
    pub fn load(project_root: &Path) -> Self {
        let cache_path = project_root.join(CACHE_DIR).join(CACHE_FILE);
        match std::fs::read_to_string(&cache_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::debug!(path = %cache_path.display(), error = %e, "discarding corrupt check cache");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save the cache to disk.
    pub fn save(&self, project_root: &Path) -> std::io::Result<()> {
        let cache_dir = project_root.join(CACHE_DIR);
        std::fs::create_dir_all(&cache_dir)?;
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(cache_dir.join(CACHE_FILE), json)
    }

    /// Look up the cached result for a file. Only a result computed from the
    /// same contents under the same configuration is returned.
    pub fn lookup(
        &self,
        path: &Path,
        content_hash: u64,
        config_fingerprint: u64,
    ) -> Option<&CachedFileResult> {
        self.files.get(&path_key(path)).filter(|r| {
            r.content_hash == content_hash && r.config_fingerprint == config_fingerprint
        })
    }

    /// Store a result in the cache.
    pub fn store(&mut self, path: &Path, result: CachedFileResult) {
        self.files.insert(path_key(path), result);
    }

    /// Remove stale entries for files that no longer exist.
    pub fn prune(&mut self) {
        self.files.retain(|path, _| Path::new(path).exists());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compute a content hash for a string using the default hasher.
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Normalize a path to a stable string key.
fn path_key(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// The directory holding the nearest `pmxc.toml` above `start`, or the
/// current directory when there is none.
pub fn find_project_root(start: &Path) -> PathBuf {
    crate::config::find_config_file(start)
        .and_then(|config| config.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
