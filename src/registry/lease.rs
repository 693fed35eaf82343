use crate::errors::{RegistryError, Result};
use crate::native::{InfoSelector, InfoValue, NativeRuntime, RawHandle};

use super::{EntryId, HandleRegistry};

/// A scoped reference to a registry entry.
///
/// Creating a lease acquires a reference; dropping it releases that
/// reference. The raw handle is only handed out through [`Lease::handle`],
/// which re-checks that the entry has not been force-closed in the meantime.
///
/// ```rust,ignore
/// {
///     let lease = registry.lease(id)?;
///     enqueue_kernel(lease.handle()?);
/// } // reference dropped here
/// ```
#[must_use = "dropping a lease immediately releases the reference it holds"]
pub struct Lease<'a, R: NativeRuntime + ?Sized> {
    registry: &'a HandleRegistry<R>,
    id: EntryId,
}

impl<'a, R: NativeRuntime + ?Sized> Lease<'a, R> {
    pub(super) fn new(registry: &'a HandleRegistry<R>, id: EntryId) -> Self {
        Self { registry, id }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The live native handle. Fails with `AlreadyReleased` if the entry was
    /// force-closed after this lease was taken.
    pub fn handle(&self) -> Result<RawHandle> {
        self.registry.live_handle(self.id)
    }

    pub fn query(&self, selector: impl Into<InfoSelector>) -> Result<InfoValue> {
        self.registry.query(self.id, selector)
    }
}

impl<R: NativeRuntime + ?Sized> Drop for Lease<'_, R> {
    fn drop(&mut self) {
        match self.registry.release(self.id) {
            Ok(()) => {}
            Err(RegistryError::AlreadyReleased(_)) => {
                log::debug!("Lease on {:?} ended after the entry was force-closed", self.id);
            }
            Err(err) => log::error!("Lease on {:?} failed to release: {err}", self.id),
        }
    }
}
