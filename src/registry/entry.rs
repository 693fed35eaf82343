use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};
use slotmap::new_key_type;

use crate::native::{RawHandle, ResourceKind};

new_key_type! {
    /// Opaque id of a registry entry.
    ///
    /// Ids are generational: once an entry is evicted its id never resolves
    /// again, even if the slot is reused for a later registration.
    pub struct EntryId;
}

/// Tracked state of one native handle.
///
/// Handle, kind and label never change after registration. The reference
/// count sits behind the entry lock. The released flag is only ever set while
/// that lock is held, but can be read without it, so code holding the map
/// lock never waits on an entry.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) handle: RawHandle,
    pub(crate) kind: ResourceKind,
    pub(crate) label: Option<Arc<str>>,
    /// Monotonic: set once, right before the native release is issued.
    released: AtomicBool,
    refs: Mutex<u32>,
}

impl Entry {
    pub(crate) fn new(handle: RawHandle, kind: ResourceKind, label: Option<Arc<str>>) -> Self {
        Self {
            handle,
            kind,
            label,
            released: AtomicBool::new(false),
            refs: Mutex::new(1),
        }
    }

    /// Takes the entry lock. The guard derefs to the reference count.
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, u32> {
        self.refs.lock()
    }

    #[inline]
    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Sets the released flag. Requiring the guard keeps every write under
    /// the entry lock.
    pub(crate) fn mark_released(&self, _refs: &MutexGuard<'_, u32>) {
        self.released.store(true, Ordering::Release);
    }

    pub(crate) fn info(&self, ref_count: u32) -> EntryInfo {
        EntryInfo {
            kind: self.kind,
            ref_count,
            released: self.is_released(),
            label: self.label.clone(),
        }
    }

    pub(crate) fn describe(&self, id: EntryId) -> Described<'_> {
        Described { entry: self, id }
    }
}

/// Log formatting for an entry, without allocating unless the log is emitted.
pub(crate) struct Described<'a> {
    entry: &'a Entry,
    id: EntryId,
}

impl fmt::Display for Described<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry.label {
            Some(label) => write!(
                f,
                "{} '{}' {} ({:?})",
                self.entry.kind, label, self.entry.handle, self.id
            ),
            None => write!(f, "{} {} ({:?})", self.entry.kind, self.entry.handle, self.id),
        }
    }
}

/// Read-only view of an entry. Carries no native handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub kind: ResourceKind,
    pub ref_count: u32,
    pub released: bool,
    pub label: Option<Arc<str>>,
}
