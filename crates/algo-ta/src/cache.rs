//! Process-wide compiled-kernel cache.
//!
//! The first request for a `(kernel, dtype)` pair resolves the monomorphized
//! entry point and runs it once over a small synthetic OHLCV buffer. Later
//! requests reuse the stored entry. Each key owns a [`OnceLock`], so
//! concurrent first requests block on a single compilation instead of
//! repeating it.
//!
//! The table lives for the whole process and is never evicted. Caching only
//! affects latency: a cached and an uncached call return identical results.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::inputs::{Inputs, Role};
use crate::params::ParameterSet;
use crate::registry::{entry, IndicatorResult, KernelFn, KernelId};
use crate::traits::SeriesElement;

/// Number of bars in the synthetic warm-up buffer.
pub const WARMUP_LEN: usize = 64;

/// Element type of a kernel call, part of the cache key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DTypeSignature {
    name: &'static str,
    type_id: TypeId,
}

impl DTypeSignature {
    /// Signature of element type `T`.
    #[must_use]
    pub fn of<T: SeriesElement>() -> Self {
        Self {
            name: T::dtype_name(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Element type name (`"f64"`, `"f32"`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for DTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Cache key.
pub type CacheKey = (KernelId, DTypeSignature);

/// A resolved, warmed kernel entry point.
pub struct CompiledKernel<T> {
    id: KernelId,
    entry: KernelFn<T>,
    compile_time: Duration,
}

impl<T> fmt::Debug for CompiledKernel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledKernel")
            .field("id", &self.id)
            .field("compile_time", &self.compile_time)
            .finish_non_exhaustive()
    }
}

impl<T: SeriesElement> CompiledKernel<T> {
    /// Kernel identity.
    #[must_use]
    pub const fn id(&self) -> KernelId {
        self.id
    }

    /// Wall-clock time spent resolving and warming the kernel.
    #[must_use]
    pub const fn compile_time(&self) -> Duration {
        self.compile_time
    }

    /// Runs the kernel. `params` must already be resolved.
    ///
    /// # Errors
    ///
    /// Propagates the kernel's own validation errors.
    pub fn call(&self, inputs: &Inputs<'_, T>, params: &ParameterSet) -> Result<IndicatorResult<T>> {
        (self.entry)(inputs, params)
    }
}

type Slot<T> = OnceLock<Arc<CompiledKernel<T>>>;

#[derive(Debug, Clone, Copy, Default)]
struct KeyStats {
    compiles: u64,
    hits: u64,
    compile_time: Duration,
}

#[derive(Default)]
struct KernelCache {
    slots: RwLock<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
    stats: RwLock<HashMap<CacheKey, KeyStats>>,
    hits: AtomicU64,
    compiles: AtomicU64,
}

fn global() -> &'static KernelCache {
    static CACHE: OnceLock<KernelCache> = OnceLock::new();
    CACHE.get_or_init(KernelCache::default)
}

impl KernelCache {
    fn slot<T: SeriesElement>(&self, key: CacheKey) -> Arc<Slot<T>> {
        let existing = self.slots.read().get(&key).cloned();
        let erased = match existing {
            Some(erased) => erased,
            None => {
                let mut slots = self.slots.write();
                Arc::clone(
                    slots
                        .entry(key)
                        .or_insert_with(|| -> Arc<dyn Any + Send + Sync> { Arc::new(Slot::<T>::new()) }),
                )
            }
        };
        // The key carries the element TypeId, so this cannot fail in practice.
        erased.downcast::<Slot<T>>().unwrap_or_else(|_| {
            warn!(?key, "cache slot type mismatch; using an uncached slot");
            Arc::new(Slot::<T>::new())
        })
    }
}

/// Synthetic OHLCV bars and 0/1 signal columns used to warm a kernel.
struct WarmupBuffers<T> {
    open: Vec<T>,
    high: Vec<T>,
    low: Vec<T>,
    close: Vec<T>,
    volume: Vec<T>,
    primary: Vec<T>,
    secondary: Vec<T>,
}

impl<T: SeriesElement> WarmupBuffers<T> {
    fn new(n: usize) -> Self {
        let close: Vec<T> = (0..n)
            .map(|i| T::constant(100.0 + 5.0 * (i as f64 * 0.3).sin() + 0.05 * i as f64))
            .collect();
        let open = (0..n)
            .map(|i| if i == 0 { close[0] } else { close[i - 1] })
            .collect();
        let flag = |on: bool| if on { T::one() } else { T::zero() };
        Self {
            open,
            high: close.iter().map(|&c| c + T::one()).collect(),
            low: close.iter().map(|&c| c - T::one()).collect(),
            volume: (0..n).map(|i| T::constant(1000.0 + 100.0 * (i % 7) as f64)).collect(),
            primary: (0..n).map(|i| flag(i % 3 == 0)).collect(),
            secondary: (0..n).map(|i| flag(i % 5 == 0)).collect(),
            close,
        }
    }

    fn inputs(&self) -> Inputs<'_, T> {
        Inputs::ohlcv(&self.open, &self.high, &self.low, &self.close, &self.volume)
            .with(Role::Reference, &self.open)
            .with(Role::Primary, &self.primary)
            .with(Role::Secondary, &self.secondary)
            .with(Role::Condition, &self.primary)
    }
}

fn compile<T: SeriesElement>(id: KernelId) -> Arc<CompiledKernel<T>> {
    let started = Instant::now();
    let entry = entry::<T>(id);
    let spec = id.spec();
    let buffers = WarmupBuffers::<T>::new(WARMUP_LEN);
    let warmed = ParameterSet::new()
        .resolve(spec.params)
        .and_then(|params| entry(&buffers.inputs(), &params));
    if let Err(err) = warmed {
        warn!(kernel = spec.name, error = %err, "warm-up call failed");
    }
    let compile_time = started.elapsed();
    debug!(
        kernel = spec.name,
        dtype = T::dtype_name(),
        compile_us = compile_time.as_micros() as u64,
        "compiled kernel"
    );
    Arc::new(CompiledKernel {
        id,
        entry,
        compile_time,
    })
}

/// Returns the compiled form of `id` for element type `T`, compiling it on
/// first use.
#[must_use]
pub fn compiled<T: SeriesElement>(id: KernelId) -> Arc<CompiledKernel<T>> {
    let cache = global();
    let key = (id, DTypeSignature::of::<T>());
    let slot = cache.slot::<T>(key);
    let mut compiled_now = false;
    let kernel = Arc::clone(slot.get_or_init(|| {
        compiled_now = true;
        compile::<T>(id)
    }));
    let mut stats = cache.stats.write();
    let counters = stats.entry(key).or_default();
    if compiled_now {
        cache.compiles.fetch_add(1, Ordering::Relaxed);
        counters.compiles += 1;
        counters.compile_time = kernel.compile_time();
    } else {
        cache.hits.fetch_add(1, Ordering::Relaxed);
        counters.hits += 1;
        trace!(kernel = %id, dtype = T::dtype_name(), "kernel cache hit");
    }
    kernel
}

/// Returns `true` if `id` has already been compiled for `T`.
#[must_use]
pub fn is_compiled<T: SeriesElement>(id: KernelId) -> bool {
    let key = (id, DTypeSignature::of::<T>());
    global()
        .slots
        .read()
        .get(&key)
        .and_then(|erased| erased.downcast_ref::<Slot<T>>())
        .is_some_and(|slot| slot.get().is_some())
}

/// Per-key cache counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// Kernel identity.
    pub id: KernelId,
    /// Element type name.
    pub dtype: &'static str,
    /// Times this key was compiled (1 once warm).
    pub compiles: u64,
    /// Times this key was served from the cache.
    pub hits: u64,
    /// Time spent compiling.
    pub compile_time: Duration,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Requests served by an already-compiled entry.
    pub hits: u64,
    /// Compilations performed.
    pub compiles: u64,
    /// Per-key detail, ordered by kernel then dtype.
    pub keys: Vec<KeyReport>,
}

impl CacheStats {
    /// Counters for one key, if it has been requested.
    #[must_use]
    pub fn key<T: SeriesElement>(&self, id: KernelId) -> Option<&KeyReport> {
        self.keys
            .iter()
            .find(|k| k.id == id && k.dtype == T::dtype_name())
    }
}

/// Returns a snapshot of the cache counters.
#[must_use]
pub fn stats() -> CacheStats {
    let cache = global();
    let mut keys: Vec<KeyReport> = cache
        .stats
        .read()
        .iter()
        .map(|(&(id, dtype), s)| KeyReport {
            id,
            dtype: dtype.name(),
            compiles: s.compiles,
            hits: s.hits,
            compile_time: s.compile_time,
        })
        .collect();
    keys.sort_by(|a, b| a.id.cmp(&b.id).then(a.dtype.cmp(b.dtype)));
    CacheStats {
        hits: cache.hits.load(Ordering::Relaxed),
        compiles: cache.compiles.load(Ordering::Relaxed),
        keys,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::all, clippy::pedantic, clippy::nursery)]
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_second_request_is_a_hit() {
        let first = compiled::<f64>(KernelId::Trima);
        assert!(is_compiled::<f64>(KernelId::Trima));
        let second = compiled::<f64>(KernelId::Trima);
        assert!(Arc::ptr_eq(&first, &second));
        let report = stats();
        let key = report.key::<f64>(KernelId::Trima).unwrap();
        assert_eq!(key.compiles, 1);
        assert!(key.hits >= 1);
    }

    #[test]
    fn test_dtypes_are_separate_keys() {
        let _ = compiled::<f32>(KernelId::Zlema);
        let report = stats();
        assert!(report.key::<f32>(KernelId::Zlema).is_some());
        let _ = compiled::<f64>(KernelId::Zlema);
        let report = stats();
        assert_eq!(report.key::<f64>(KernelId::Zlema).unwrap().compiles, 1);
        assert_eq!(report.key::<f32>(KernelId::Zlema).unwrap().compiles, 1);
    }

    #[test]
    fn test_concurrent_first_requests_compile_once() {
        const THREADS: usize = 8;
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    compiled::<f32>(KernelId::Kama)
                })
            })
            .collect();
        let kernels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(kernels.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        let report = stats();
        let key = report.key::<f32>(KernelId::Kama).unwrap();
        assert_eq!(key.compiles, 1);
        assert!(key.hits >= THREADS as u64 - 1);
    }

    #[test]
    fn test_warmup_buffers_cover_signal_roles() {
        let buffers = WarmupBuffers::<f64>::new(WARMUP_LEN);
        let inputs = buffers.inputs();
        for role in Role::ALL {
            assert_eq!(inputs.role(role).unwrap().len(), WARMUP_LEN, "{role}");
        }
    }
}
