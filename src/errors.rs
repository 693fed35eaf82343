//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! - [`RegistryError`] is returned by every [`HandleRegistry`](crate::registry::HandleRegistry)
//!   operation. Its variants are the complete failure taxonomy of the registry.
//! - [`DescriptorError`] rejects malformed buffer / image / sampler descriptors
//!   before anything reaches the native runtime.
//! - [`ContextError`] is what [`DeviceContext`](crate::context::DeviceContext)
//!   creation methods return (either of the above).
//! - [`ConfigError`] covers loading a [`RegistryConfig`](crate::config::RegistryConfig).
//!
//! None of these are retried automatically. `UnderRelease` and
//! `DuplicateRegistration` are caller contract violations: they are logged at
//! `error` level and returned, never swallowed.
//!
//! ```rust,ignore
//! use devres::errors::{RegistryError, Result};
//!
//! fn drop_reference(registry: &HandleRegistry<SimulatedRuntime>, id: EntryId) -> Result<()> {
//!     registry.release(id)
//! }
//! ```

use thiserror::Error;

use crate::native::{MemFlags, NativeStatus, RawHandle};
use crate::registry::EntryId;

/// Failure taxonomy of the handle registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The entry id is unknown (never issued, or already evicted).
    #[error("Entry not found: {0:?}")]
    NotFound(EntryId),

    /// The native handle value is already tracked by a live entry.
    #[error("Native handle {handle} is already registered as {existing:?}")]
    DuplicateRegistration {
        /// The handle that was offered a second time
        handle: RawHandle,
        /// The live entry that already owns it
        existing: EntryId,
    },

    /// The entry's native resource has already been released.
    #[error("Entry {0:?} has already been released")]
    AlreadyReleased(EntryId),

    /// Release was called on an entry whose reference count is already zero.
    #[error("Entry {0:?} released more times than it was acquired")]
    UnderRelease(EntryId),

    /// The entry's reference count cannot be incremented any further.
    #[error("Entry {0:?} has too many outstanding references")]
    RefCountOverflow(EntryId),

    /// The native runtime reported a failure. The native code is preserved.
    #[error("Native call failed: {code} (code {})", code.code())]
    NativeCallFailed {
        /// Status returned by the native runtime
        code: NativeStatus,
    },
}

impl RegistryError {
    /// Returns `true` for errors that indicate the caller broke the
    /// acquire/release contract rather than a runtime condition.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnderRelease(_) | Self::DuplicateRegistration { .. }
        )
    }

    /// The native status code, if this error came from the native runtime.
    #[must_use]
    pub fn native_code(&self) -> Option<NativeStatus> {
        match self {
            Self::NativeCallFailed { code } => Some(*code),
            _ => None,
        }
    }
}

impl From<NativeStatus> for RegistryError {
    fn from(code: NativeStatus) -> Self {
        Self::NativeCallFailed { code }
    }
}

/// A resource descriptor that cannot be handed to the native runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// Buffers must have a non-zero size.
    #[error("Buffer size must be greater than zero")]
    ZeroSize,

    /// Images must have non-zero width, height and depth.
    #[error("Image extent must be non-zero: {width}x{height}x{depth}")]
    ZeroExtent {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested depth
        depth: u32,
    },

    /// More than one of READ_WRITE / WRITE_ONLY / READ_ONLY was requested.
    #[error("Conflicting access flags: {0:?}")]
    ConflictingAccess(MemFlags),

    /// USE_HOST_PTR cannot be combined with ALLOC_HOST_PTR or COPY_HOST_PTR.
    #[error("Conflicting host pointer flags: {0:?}")]
    ConflictingHostPtr(MemFlags),

    /// Descriptors carry no host memory, so host-pointer sourced allocations
    /// cannot be expressed.
    #[error("Host pointer flags require host memory, which descriptors do not carry: {0:?}")]
    HostPtrUnsupported(MemFlags),
}

/// Error returned by [`DeviceContext`](crate::context::DeviceContext) resource creation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The descriptor failed validation; the native runtime was not called.
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),

    /// Acquisition or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Error produced while loading registry configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the registry cannot use.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Alias for `Result<T, RegistryError>`.
pub type Result<T> = std::result::Result<T, RegistryError>;
