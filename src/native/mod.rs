//! Native Runtime Boundary
//!
//! Everything the registry knows about the device driver lives behind the
//! [`NativeRuntime`] trait: allocate an object, free it, ask it a question.
//! The rest of this module is the static vocabulary those three calls speak:
//!
//! - [`RawHandle`]: the opaque object identifier the driver hands out
//! - [`ResourceKind`]: which family of entry points owns a handle
//! - [`status`]: native status codes and their typed translation
//! - [`format`]: memory flags, image formats and sampler parameter tables
//! - [`info`]: query selectors and decoded results
//! - [`descriptor`]: allocation requests
//! - [`simulated`]: an in-process runtime for tests, benches and demos

pub mod descriptor;
pub mod format;
pub mod info;
pub mod simulated;
pub mod status;

use std::fmt;
use std::num::NonZeroU64;

pub use descriptor::{AcquireRequest, BufferDesc, ImageDesc, SamplerDesc};
pub use format::{
    AddressingMode, ChannelOrder, ChannelType, FilterMode, ImageFormat, MemFlags, MemObjectType,
};
pub use info::{ImageInfo, InfoSelector, InfoValue, MemInfo, SamplerInfo};
pub use simulated::SimulatedRuntime;
pub use status::{NativeStatus, check};

/// Opaque identifier of a native object. The native null handle is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(NonZeroU64);

impl RawHandle {
    /// Wraps a raw native value. Returns `None` for the null handle.
    #[inline]
    #[must_use]
    pub const fn from_raw(value: u64) -> Option<Self> {
        match NonZeroU64::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.as_raw())
    }
}

/// Family of native object. Selects the release and query entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Image,
    Sampler,
}

impl ResourceKind {
    pub const ALL: &'static [Self] = &[Self::Buffer, Self::Image, Self::Sampler];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Image => "image",
            Self::Sampler => "sampler",
        }
    }

    /// Whether the native runtime frees this kind through the memory-object
    /// entry point (as opposed to the sampler one).
    #[must_use]
    pub const fn is_mem_object(self) -> bool {
        matches!(self, Self::Buffer | Self::Image)
    }

    /// The status a native runtime reports for a stale handle of this kind.
    #[must_use]
    pub const fn invalid_handle_status(self) -> NativeStatus {
        match self {
            Self::Buffer | Self::Image => NativeStatus::InvalidMemObject,
            Self::Sampler => NativeStatus::InvalidSampler,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The device driver, seen through its handle API.
///
/// Implementations must be callable from any thread. Calls are synchronous
/// and are expected to return in bounded time.
pub trait NativeRuntime: Send + Sync {
    /// Allocates a native object.
    fn acquire(&self, request: &AcquireRequest) -> Result<RawHandle, NativeStatus>;

    /// Frees a native object. Must be called at most once per handle.
    fn release(&self, kind: ResourceKind, handle: RawHandle) -> Result<(), NativeStatus>;

    /// Reads `size` bytes of information about a live object.
    fn get_info(
        &self,
        handle: RawHandle,
        selector: InfoSelector,
        size: usize,
    ) -> Result<Vec<u8>, NativeStatus>;
}
