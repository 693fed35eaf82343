//! # devres
//!
//! Reference-counted tracking of native compute-device handles.
//!
//! A native driver hands out raw handles for buffers, images and samplers and
//! expects each to be freed exactly once. This crate puts a
//! [`HandleRegistry`] between application code and the driver:
//!
//! - callers hold opaque [`EntryId`]s, never long-lived raw handles
//! - every entry carries a reference count; the last release frees the
//!   native object, exactly once, even under concurrent use
//! - [`HandleRegistry::force_close`] and [`DeviceContext::shutdown`] tear
//!   resources down early without ever freeing twice
//! - native status codes are translated into typed errors
//!
//! The driver is reached only through the [`NativeRuntime`] trait.
//! [`SimulatedRuntime`] implements it in-process for tests and demos.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use devres::prelude::*;
//!
//! let ctx = DeviceContext::new(Arc::new(SimulatedRuntime::new()), RegistryConfig::default());
//! let image = ctx.create_image(&ImageDesc::new_2d(ImageFormat::default(), 256, 256), Some("albedo"))?;
//!
//! {
//!     let lease = ctx.lease(image)?;
//!     let width = lease.query(ImageInfo::Width)?;
//! }
//!
//! ctx.release(image)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod context;
pub mod errors;
pub mod native;
pub mod registry;
pub mod utils;

pub use config::{RegistryConfig, TombstonePolicy};
pub use context::DeviceContext;
pub use errors::{ConfigError, ContextError, DescriptorError, RegistryError};
pub use native::{NativeRuntime, NativeStatus, RawHandle, ResourceKind, SimulatedRuntime};
pub use registry::{EntryId, EntryInfo, HandleRegistry, Lease, ShutdownReport};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        DeviceContext, EntryId, HandleRegistry, Lease, NativeRuntime, NativeStatus, RawHandle,
        RegistryConfig, RegistryError, ResourceKind, SimulatedRuntime, TombstonePolicy,
        native::{
            AddressingMode, BufferDesc, ChannelOrder, ChannelType, FilterMode, ImageDesc,
            ImageFormat, ImageInfo, InfoValue, MemFlags, MemInfo, SamplerDesc, SamplerInfo,
        },
    };
}
