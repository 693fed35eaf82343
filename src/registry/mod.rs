//! Handle Registry
//!
//! The single source of truth for which native handles are live.
//!
//! # Design
//!
//! - Entries live in a [`SlotMap`] keyed by generational [`EntryId`]s, so a
//!   stale id can never resolve to a newer entry.
//! - Each entry's reference count sits behind its own `Mutex`, and the native
//!   release is issued while holding it: concurrent operations on one entry
//!   are totally ordered. The released flag is written only under that lock
//!   and is the single gate that guarantees the native release runs exactly
//!   once.
//! - The map itself sits behind an `RwLock` that is held only for lookup,
//!   insert and eviction. No entry lock is ever taken while it is held (the
//!   released flag is readable lock-free), so a native call in progress on
//!   one entry never stalls operations on the others.
//! - A live-handle index rejects registering the same native handle twice.
//!
//! # Lifecycle
//!
//! ```text
//! register ──► count = 1 ──acquire──► count + 1
//!                   │
//!                release ──► count - 1 ──(count == 0)──► native release, released = true, evict
//!                   │
//!              force_close ──► native release, released = true (outstanding holders drain)
//! ```

mod entry;
mod lease;

pub use entry::{EntryId, EntryInfo};
pub use lease::Lease;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{MutexGuard, RwLock};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::config::RegistryConfig;
use crate::errors::{RegistryError, Result};
use crate::native::{InfoSelector, InfoValue, NativeRuntime, NativeStatus, RawHandle, ResourceKind};
use crate::utils::unwind;
use entry::Entry;

type Slot = Arc<Entry>;

#[derive(Default)]
struct RegistryInner {
    entries: SlotMap<EntryId, Slot>,
    live: FxHashMap<RawHandle, EntryId>,
}

enum CloseOutcome {
    Released,
    AlreadyReleased,
    Failed(NativeStatus),
}

/// Result of dropping one reference.
enum Decrement {
    /// Other references remain.
    Held,
    /// That was the last reference; the entry can be retired.
    Drained(Result<()>),
}

/// Summary of a [`HandleRegistry::close_all`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Entries whose native resource was released by this pass.
    pub released: usize,
    /// Entries that were already released before the pass reached them.
    pub already_released: usize,
    /// Entries whose native release reported failure.
    pub failed: Vec<(EntryId, NativeStatus)>,
    /// Entries whose native release panicked.
    pub panicked: Vec<EntryId>,
    /// Sum of reference counts still held on the entries this pass closed.
    pub outstanding_references: u64,
}

impl ShutdownReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.panicked.is_empty()
    }
}

/// Reference-counted registry of native handles.
pub struct HandleRegistry<R: NativeRuntime + ?Sized> {
    runtime: Arc<R>,
    config: RegistryConfig,
    inner: RwLock<RegistryInner>,
    label_counter: AtomicU64,
}

impl<R: NativeRuntime + ?Sized> HandleRegistry<R> {
    pub fn new(runtime: Arc<R>, config: RegistryConfig) -> Self {
        Self {
            runtime,
            config,
            inner: RwLock::default(),
            label_counter: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ========================================================================
    // Core operations
    // ========================================================================

    /// Starts tracking a freshly acquired native handle with reference count 1.
    pub fn register(&self, handle: RawHandle, kind: ResourceKind) -> Result<EntryId> {
        self.register_labeled(handle, kind, None)
    }

    /// [`register`](Self::register) with a debug label carried into logs.
    pub fn register_labeled(
        &self,
        handle: RawHandle,
        kind: ResourceKind,
        label: Option<&str>,
    ) -> Result<EntryId> {
        let label = self.resolve_label(kind, label);
        let mut inner = self.inner.write();

        // An index hit on a released entry is stale: the runtime recycled the value.
        if let Some(&existing) = inner.live.get(&handle)
            && inner
                .entries
                .get(existing)
                .is_some_and(|entry| !entry.is_released())
        {
            log::error!("Duplicate registration of {kind} {handle}: already tracked as {existing:?}");
            return Err(RegistryError::DuplicateRegistration { handle, existing });
        }

        let id = inner.entries.insert(Arc::new(Entry::new(handle, kind, label)));
        inner.live.insert(handle, id);

        log::debug!("Registered {kind} {handle} as {id:?}");
        Ok(id)
    }

    /// Takes a reference to a live entry and returns its handle.
    pub fn acquire(&self, id: EntryId) -> Result<RawHandle> {
        let entry = self.slot(id)?;
        let mut refs = entry.lock();
        if entry.is_released() {
            return Err(RegistryError::AlreadyReleased(id));
        }
        *refs = refs.checked_add(1).ok_or_else(|| {
            log::error!("Reference count of {} is saturated", entry.describe(id));
            RegistryError::RefCountOverflow(id)
        })?;
        Ok(entry.handle)
    }

    /// Drops a reference. The last reference releases the native resource.
    pub fn release(&self, id: EntryId) -> Result<()> {
        let entry = self.slot(id)?;

        // A panicking native release leaves the entry released and drained.
        let decrement = unwind::catch(
            || self.decrement(id, &entry),
            || self.retire(id, &entry, true),
        )?;

        match decrement {
            Decrement::Held => Ok(()),
            Decrement::Drained(result) => {
                self.retire(id, &entry, true);
                result
            }
        }
    }

    /// Releases the native resource now, regardless of outstanding references.
    ///
    /// Holders of outstanding references get `AlreadyReleased` from later
    /// `acquire` / `release` calls; the entry is evicted once they have all
    /// released. Calling this on an already released entry is a no-op.
    pub fn force_close(&self, id: EntryId) -> Result<()> {
        let entry = self.slot(id)?;
        match self.close_slot(id, &entry) {
            CloseOutcome::Released | CloseOutcome::AlreadyReleased => Ok(()),
            CloseOutcome::Failed(code) => Err(code.into()),
        }
    }

    /// Asks the native runtime about a live entry.
    pub fn query(&self, id: EntryId, selector: impl Into<InfoSelector>) -> Result<InfoValue> {
        let selector = selector.into();
        let entry = self.slot(id)?;

        // Held across the native call so the entry cannot be freed underneath it.
        let _refs = entry.lock();
        if entry.is_released() {
            return Err(RegistryError::AlreadyReleased(id));
        }
        if !selector.applies_to(entry.kind) {
            log::warn!("Query {selector:?} does not apply to {}", entry.describe(id));
            return Err(NativeStatus::InvalidValue.into());
        }

        let bytes = self
            .runtime
            .get_info(entry.handle, selector, selector.result_size())
            .inspect_err(|code| {
                log::warn!("Query {selector:?} on {} failed: {code}", entry.describe(id));
            })?;
        selector.decode(&bytes).map_err(RegistryError::from)
    }

    /// Acquires a scoped reference that is released when the lease drops.
    pub fn lease(&self, id: EntryId) -> Result<Lease<'_, R>> {
        self.acquire(id)?;
        Ok(Lease::new(self, id))
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Force-closes every live entry.
    ///
    /// A panic inside the native release of one entry is contained so the
    /// remaining entries are still released.
    pub fn close_all(&self) -> ShutdownReport {
        let slots: Vec<(EntryId, Slot)> = self
            .inner
            .read()
            .entries
            .iter()
            .map(|(id, entry)| (id, Arc::clone(entry)))
            .collect();

        let mut report = ShutdownReport::default();
        for (id, entry) in slots {
            if entry.is_released() {
                report.already_released += 1;
                continue;
            }

            let refs = *entry.lock();
            if self.config.warn_on_leaks {
                log::warn!(
                    "Leaked {}: {refs} reference(s) still held at teardown",
                    entry.describe(id)
                );
            }

            match unwind::catch_all(|| self.close_slot(id, &entry)) {
                Some(CloseOutcome::Released) => {
                    report.released += 1;
                    report.outstanding_references += u64::from(refs);
                }
                Some(CloseOutcome::AlreadyReleased) => report.already_released += 1,
                Some(CloseOutcome::Failed(code)) => {
                    report.outstanding_references += u64::from(refs);
                    report.failed.push((id, code));
                }
                None => {
                    report.outstanding_references += u64::from(refs);
                    report.panicked.push(id);
                }
            }
        }

        if report.released > 0 || !report.is_clean() {
            log::info!(
                "Registry teardown: {} released, {} failed, {} panicked, {} outstanding reference(s)",
                report.released,
                report.failed.len(),
                report.panicked.len(),
                report.outstanding_references
            );
        }
        report
    }

    /// Evicts released entries that no longer hold references. Returns how
    /// many were removed.
    pub fn purge_tombstones(&self) -> usize {
        let released: Vec<(EntryId, Slot)> = self
            .inner
            .read()
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_released())
            .map(|(id, entry)| (id, Arc::clone(entry)))
            .collect();

        // Released with no references is terminal: nothing can change it again.
        let drained: Vec<EntryId> = released
            .into_iter()
            .filter(|(_, entry)| *entry.lock() == 0)
            .map(|(id, _)| id)
            .collect();
        if drained.is_empty() {
            return 0;
        }

        let mut inner = self.inner.write();
        drained
            .into_iter()
            .filter(|&id| inner.entries.remove(id).is_some())
            .count()
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn ref_count(&self, id: EntryId) -> Result<u32> {
        Ok(*self.slot(id)?.lock())
    }

    pub fn entry_info(&self, id: EntryId) -> Result<EntryInfo> {
        let entry = self.slot(id)?;
        let refs = *entry.lock();
        Ok(entry.info(refs))
    }

    pub fn kind(&self, id: EntryId) -> Result<ResourceKind> {
        Ok(self.slot(id)?.kind)
    }

    pub fn is_released(&self, id: EntryId) -> Result<bool> {
        Ok(self.slot(id)?.is_released())
    }

    #[must_use]
    pub fn contains(&self, id: EntryId) -> bool {
        self.inner.read().entries.contains_key(id)
    }

    /// Number of entries, including released ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries whose native resource is still allocated.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner
            .read()
            .entries
            .values()
            .filter(|entry| !entry.is_released())
            .count()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<EntryId> {
        self.inner.read().entries.keys().collect()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn slot(&self, id: EntryId) -> Result<Slot> {
        self.inner
            .read()
            .entries
            .get(id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// The handle of a live entry, without taking a reference.
    pub(crate) fn live_handle(&self, id: EntryId) -> Result<RawHandle> {
        let entry = self.slot(id)?;
        if entry.is_released() {
            return Err(RegistryError::AlreadyReleased(id));
        }
        Ok(entry.handle)
    }

    fn resolve_label(&self, kind: ResourceKind, label: Option<&str>) -> Option<Arc<str>> {
        if let Some(label) = label {
            return Some(Arc::from(label));
        }
        let prefix = self.config.label_prefix.as_deref()?;
        let n = self.label_counter.fetch_add(1, Ordering::Relaxed) + 1;
        Some(Arc::from(format!("{prefix}{kind}-{n}")))
    }

    fn decrement(&self, id: EntryId, entry: &Entry) -> Result<Decrement> {
        let mut refs = entry.lock();
        if *refs == 0 {
            log::error!(
                "Under-release of {}: reference count is already zero",
                entry.describe(id)
            );
            return Err(RegistryError::UnderRelease(id));
        }
        *refs -= 1;

        if *refs > 0 {
            // Force-closed while this reference was outstanding.
            if entry.is_released() {
                return Err(RegistryError::AlreadyReleased(id));
            }
            return Ok(Decrement::Held);
        }

        if entry.is_released() {
            return Ok(Decrement::Drained(Err(RegistryError::AlreadyReleased(id))));
        }
        let freed = self.free(id, entry, &refs).map_err(RegistryError::from);
        Ok(Decrement::Drained(freed))
    }

    /// Marks the entry released and issues the native release. Caller holds
    /// the entry lock and has checked that the entry is not yet released.
    fn free(
        &self,
        id: EntryId,
        entry: &Entry,
        refs: &MutexGuard<'_, u32>,
    ) -> std::result::Result<(), NativeStatus> {
        debug_assert!(!entry.is_released());
        entry.mark_released(refs);

        let (kind, handle) = (entry.kind, entry.handle);
        let result = unwind::catch(
            || self.runtime.release(kind, handle),
            || log::error!("Native release of {kind} {handle} ({id:?}) panicked"),
        );

        match result {
            Ok(()) => log::debug!("Released {}", entry.describe(id)),
            Err(code) => log::error!("Native release of {} failed: {code}", entry.describe(id)),
        }
        result
    }

    fn close_slot(&self, id: EntryId, entry: &Entry) -> CloseOutcome {
        let outcome = unwind::catch(
            || {
                let refs = entry.lock();
                if entry.is_released() {
                    return CloseOutcome::AlreadyReleased;
                }
                if *refs > 1 {
                    log::warn!(
                        "Force-closing {} with {} outstanding references",
                        entry.describe(id),
                        *refs
                    );
                }
                match self.free(id, entry, &refs) {
                    Ok(()) => CloseOutcome::Released,
                    Err(code) => CloseOutcome::Failed(code),
                }
            },
            || self.retire(id, entry, false),
        );

        if !matches!(outcome, CloseOutcome::AlreadyReleased) {
            self.retire(id, entry, false);
        }
        outcome
    }

    /// Drops the handle from the live index and, once the entry holds no
    /// references, evicts it unless tombstones are retained. Never called
    /// with the entry lock held.
    fn retire(&self, id: EntryId, entry: &Entry, drained: bool) {
        let mut inner = self.inner.write();
        if inner.live.get(&entry.handle) == Some(&id) {
            inner.live.remove(&entry.handle);
        }
        if drained && !self.config.retains_tombstones() {
            inner.entries.remove(id);
        }
    }
}

impl<R: NativeRuntime + ?Sized> Drop for HandleRegistry<R> {
    fn drop(&mut self) {
        if self.live_count() > 0 {
            self.close_all();
        }
    }
}
