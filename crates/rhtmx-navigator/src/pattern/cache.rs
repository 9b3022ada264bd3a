//! Bounded memo of compiled patterns
//!
//! Keyed first by [`CompileOptions`], then by pattern string. A single counter
//! tracks entries across all option sets. Once it reaches the limit the cache
//! stops inserting: new pairs are compiled on every call and existing entries
//! stay valid. Nothing is ever evicted or replaced.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use super::{CompileOptions, CompiledMatcher};
use crate::error::Result;

/// Maximum number of cached matchers per cache
pub const DEFAULT_CACHE_LIMIT: usize = 10_000;

static SHARED: Lazy<Arc<PatternCache>> = Lazy::new(|| Arc::new(PatternCache::new()));

#[derive(Debug, Default)]
struct CacheState {
    tables: HashMap<CompileOptions, HashMap<String, Arc<CompiledMatcher>>>,
    count: usize,
}

/// Append-only store of [`CompiledMatcher`]s
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::pattern::{CompileOptions, PatternCache};
/// use std::sync::Arc;
///
/// let cache = PatternCache::with_limit(1);
/// let first = cache.get_or_compile("/users/:id", CompileOptions::default()).unwrap();
/// let again = cache.get_or_compile("/users/:id", CompileOptions::default()).unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
///
/// // Over the limit: still correct, just not remembered
/// let other = cache.get_or_compile("/posts/:id", CompileOptions::default()).unwrap();
/// assert!(other.exec("/posts/1").is_some());
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug)]
pub struct PatternCache {
    limit: usize,
    state: Mutex<CacheState>,
}

impl PatternCache {
    /// Creates a cache holding up to [`DEFAULT_CACHE_LIMIT`] matchers
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_CACHE_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Process-wide cache used by [`PathMatcher::new`](crate::PathMatcher::new)
    pub fn shared() -> Arc<PatternCache> {
        Arc::clone(&SHARED)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of cached matchers across all option sets
    pub fn len(&self) -> usize {
        self.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.limit
    }

    pub fn contains(&self, pattern: &str, options: CompileOptions) -> bool {
        self.lock()
            .tables
            .get(&options)
            .is_some_and(|table| table.contains_key(pattern))
    }

    /// Returns the cached matcher for `(pattern, options)`, compiling it on a miss
    pub fn get_or_compile(
        &self,
        pattern: &str,
        options: CompileOptions,
    ) -> Result<Arc<CompiledMatcher>> {
        if let Some(hit) = self
            .lock()
            .tables
            .get(&options)
            .and_then(|table| table.get(pattern))
        {
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(CompiledMatcher::compile(pattern, options)?);

        let mut state = self.lock();
        let CacheState { tables, count } = &mut *state;

        // Another caller may have inserted this pair while we compiled
        if let Some(existing) = tables.get(&options).and_then(|table| table.get(pattern)) {
            return Ok(Arc::clone(existing));
        }
        if *count >= self.limit {
            return Ok(compiled);
        }

        match tables.entry(options).or_default().entry(pattern.to_string()) {
            Entry::Occupied(existing) => Ok(Arc::clone(existing.get())),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&compiled));
                *count += 1;
                tracing::debug!(pattern, ?options, cached = *count, "compiled path pattern");
                if *count == self.limit {
                    tracing::debug!(
                        limit = self.limit,
                        "pattern cache is full; further patterns will be compiled per call"
                    );
                }
                Ok(compiled)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
