//! # Cache-Aside Store
//!
//! An in-memory key/value store with per-entry expiry that sits in front of
//! the remote credits lookups.
//!
//! - Expiry is evaluated lazily on read; an expired entry is removed by the
//!   read that finds it. There is no background sweep.
//! - A failed computation is never stored, so the next access retries.
//! - Concurrent misses on the same key share one computation (single-flight):
//!   the first caller registers the in-flight future and later callers await
//!   the same shared outcome instead of issuing a duplicate remote call.
//!
//! Time is read from the tokio clock so tests can pause and advance it.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Cache-aside store with a default TTL fixed at construction.
///
/// Lock order is always `in_flight` before `entries`.
pub struct TtlCache<V, E> {
    default_ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<String, Flight<V, E>>>,
}

impl<V, E> fmt::Debug for TtlCache<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("default_ttl", &self.default_ttl)
            .field("entries", &self.entries().len())
            .field("in_flight", &self.in_flight().len())
            .finish()
    }
}

impl<V, E> TtlCache<V, E> {
    /// Create an empty cache whose entries live `default_ttl` unless a call
    /// overrides it.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Drop one entry regardless of its expiry
    pub fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Drop every stored entry. Lookups already in flight are unaffected.
    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, Flight<V, E>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V, E> TtlCache<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Return the stored value if it has not expired.
    ///
    /// An expired entry is deleted here; this is the only place expiry is
    /// evaluated.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(Instant::now()) => Some(entry.value.clone()),
            Some(_) => {
                debug!("Cache EXPIRED: {}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value, overwriting any existing entry.
    ///
    /// `ttl` of `None` uses the default TTL.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        debug!("Cache SET: {} (TTL: {:?})", key, ttl);
        self.entries().insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// - On a hit `compute` is never invoked.
    /// - On a miss with another lookup for `key` already running, this call
    ///   awaits that lookup's outcome and `compute` is never invoked.
    /// - Otherwise `compute` runs once; success is stored with `ttl` (or the
    ///   default), failure is returned to every waiter and not stored.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        if let Some(value) = self.get(key) {
            debug!("Cache HIT: {}", key);
            return Ok(value);
        }

        let flight = {
            let mut in_flight = self.in_flight();
            match in_flight.get(key) {
                Some(flight) => {
                    debug!("Cache JOIN: {}", key);
                    flight.clone()
                }
                None => {
                    // A flight stores its value before leaving the registry,
                    // so a miss here may have been filled in the meantime.
                    if let Some(value) = self.get(key) {
                        debug!("Cache HIT: {}", key);
                        return Ok(value);
                    }
                    debug!("Cache MISS: {}", key);
                    let flight = compute().boxed().shared();
                    in_flight.insert(key.to_string(), flight.clone());
                    flight
                }
            }
        };

        let result = flight.clone().await;
        self.settle(key, &flight, &result, ttl);
        result
    }

    /// Retire a finished flight. Only the first waiter to get here stores
    /// the value; the others find the registry slot already gone.
    fn settle(
        &self,
        key: &str,
        flight: &Flight<V, E>,
        result: &Result<V, E>,
        ttl: Option<Duration>,
    ) {
        let mut in_flight = self.in_flight();
        let owns_slot = in_flight
            .get(key)
            .is_some_and(|current| current.ptr_eq(flight));
        if !owns_slot {
            return;
        }
        in_flight.remove(key);

        match result {
            Ok(value) => self.set(key, value.clone(), ttl),
            Err(_) => debug!("Cache compute failed, nothing stored: {}", key),
        }
    }
}
