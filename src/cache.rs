//! TTL-bounded cache of compiled programs.

use cel_interpreter::Program;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "     cache";

/// How long a compiled program stays reusable before it is recompiled.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct CacheEntry {
    program: Arc<Program>,
    inserted_at: Instant,
}

/// A concurrent source-text → compiled-program cache with time-based
/// eviction.
///
/// Entries are created on first compile and evicted lazily once older than
/// the TTL; a cache hit does not refresh the insertion time. Compilation is
/// a pure function of source text, so a cached program is behaviorally
/// indistinguishable from a freshly compiled one. Safe for concurrent
/// get/insert from any number of decisions and triggers.
#[derive(Debug)]
pub struct ProgramCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ProgramCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Looks up a live compiled program, evicting the entry if it has
    /// expired.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<Arc<Program>> {
        {
            let entry = self.entries.get(source)?;
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(Arc::clone(&entry.program));
            }
        }
        // Guard released above; removing while holding it would deadlock.
        let _ = self.entries.remove(source);
        log::debug!(target: LOG_TARGET, "evicted expired program for '{source}'");
        None
    }

    /// Stores a freshly compiled program under its source text.
    pub fn insert(&self, source: &str, program: Arc<Program>) {
        let _ = self.entries.insert(
            source.to_string(),
            CacheEntry {
                program,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops every entry older than the TTL.
    pub fn purge_expired(&self) {
        self.entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached programs, expired entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no programs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured eviction TTL.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for ProgramCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
