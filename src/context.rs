//! Device Context
//!
//! [`DeviceContext`] is the session object that owns one [`HandleRegistry`].
//! Resources are created through it (descriptor validation, native acquire,
//! registration) and every entry still live when the context shuts down is
//! force-closed. Contexts are independent: two contexts never share entries.
//!
//! ```rust,ignore
//! let ctx = DeviceContext::new(Arc::new(SimulatedRuntime::new()), RegistryConfig::default());
//!
//! let buffer = ctx.create_buffer(&BufferDesc::new(1024), Some("vertices"))?;
//! let size = ctx.query(buffer, MemInfo::Size)?;
//!
//! ctx.release(buffer)?; // last reference: native release happens here
//! ```

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::errors::{ContextError, RegistryError, Result};
use crate::native::{
    AcquireRequest, BufferDesc, ImageDesc, InfoSelector, InfoValue, NativeRuntime, SamplerDesc,
};
use crate::registry::{EntryId, HandleRegistry, Lease, ShutdownReport};

pub struct DeviceContext<R: NativeRuntime + ?Sized> {
    registry: HandleRegistry<R>,
}

impl<R: NativeRuntime + ?Sized> DeviceContext<R> {
    pub fn new(runtime: Arc<R>, config: RegistryConfig) -> Self {
        Self {
            registry: HandleRegistry::new(runtime, config),
        }
    }

    #[inline]
    pub fn registry(&self) -> &HandleRegistry<R> {
        &self.registry
    }

    #[inline]
    pub fn runtime(&self) -> &Arc<R> {
        self.registry.runtime()
    }

    // ========================================================================
    // Resource creation
    // ========================================================================

    pub fn create_buffer(
        &self,
        desc: &BufferDesc,
        label: Option<&str>,
    ) -> std::result::Result<EntryId, ContextError> {
        self.create(AcquireRequest::Buffer(desc.clone()), label)
    }

    pub fn create_image(
        &self,
        desc: &ImageDesc,
        label: Option<&str>,
    ) -> std::result::Result<EntryId, ContextError> {
        self.create(AcquireRequest::Image(desc.clone()), label)
    }

    pub fn create_sampler(
        &self,
        desc: &SamplerDesc,
        label: Option<&str>,
    ) -> std::result::Result<EntryId, ContextError> {
        self.create(AcquireRequest::Sampler(*desc), label)
    }

    fn create(
        &self,
        request: AcquireRequest,
        label: Option<&str>,
    ) -> std::result::Result<EntryId, ContextError> {
        request.validate()?;

        let kind = request.kind();
        let handle = self.runtime().acquire(&request).map_err(|code| {
            log::error!("Native acquire of {kind} failed: {code}");
            RegistryError::from(code)
        })?;

        // On a duplicate the handle belongs to the live entry; it is not freed here.
        let id = self.registry.register_labeled(handle, kind, label)?;
        Ok(id)
    }

    // ========================================================================
    // Entry operations
    // ========================================================================

    pub fn lease(&self, id: EntryId) -> Result<Lease<'_, R>> {
        self.registry.lease(id)
    }

    pub fn query(&self, id: EntryId, selector: impl Into<InfoSelector>) -> Result<InfoValue> {
        self.registry.query(id, selector)
    }

    pub fn retain(&self, id: EntryId) -> Result<()> {
        self.registry.acquire(id).map(|_| ())
    }

    pub fn release(&self, id: EntryId) -> Result<()> {
        self.registry.release(id)
    }

    pub fn force_close(&self, id: EntryId) -> Result<()> {
        self.registry.force_close(id)
    }

    /// Force-closes every live entry. Safe to call more than once; later
    /// calls only close entries created since the previous one.
    pub fn shutdown(&self) -> ShutdownReport {
        let report = self.registry.close_all();
        log::info!(
            "DeviceContext shut down: {} entries released ({} live remain)",
            report.released,
            self.registry.live_count()
        );
        report
    }
}
