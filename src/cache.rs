//! Process-wide page cache
//!
//! Pages are memoized by their exact route segments for the lifetime of the process. Each
//! key owns a slot behind its own mutex: the first caller fills the slot while concurrent
//! callers for the same key block on it and then share the stored page. Callers for other
//! keys are never blocked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::core::PageDescriptor;
use crate::error::RehostResult;

type Slot = Arc<Mutex<Option<Arc<PageDescriptor>>>>;

/// Memoized page descriptors keyed by route segments
#[derive(Debug, Default)]
pub struct PageCache {
    slots: DashMap<Vec<String>, Slot>,
    loads: AtomicUsize,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached page for `key`, running `load` once when there is none.
    ///
    /// A failing `load` leaves the slot empty, so the next call tries again.
    pub fn get_or_try_insert_with<F>(
        &self,
        key: &[String],
        load: F,
    ) -> RehostResult<Arc<PageDescriptor>>
    where
        F: FnOnce() -> RehostResult<PageDescriptor>,
    {
        // Clone the slot out so the map shard is unlocked before waiting on the slot
        let slot: Slot = self.slots.entry(key.to_vec()).or_default().clone();
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(page) = cached.as_ref() {
            tracing::debug!("page cache hit for {:?}", key);
            return Ok(Arc::clone(page));
        }

        let page = Arc::new(load()?);
        self.loads.fetch_add(1, Ordering::SeqCst);
        *cached = Some(Arc::clone(&page));
        Ok(page)
    }

    /// Cached page for `key`, without loading
    pub fn get(&self, key: &[String]) -> Option<Arc<PageDescriptor>> {
        let slot = self.slots.get(key)?.clone();
        let cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        cached.clone()
    }

    /// Number of successful loads since the cache was created
    pub fn transforms_run(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of routes with a stored page
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
