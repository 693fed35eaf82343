//! Resource descriptors handed to the native allocation capability.

use crate::errors::DescriptorError;

use super::ResourceKind;
use super::format::{AddressingMode, FilterMode, ImageFormat, MemFlags, MemObjectType};

/// Parameters for a linear device buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    pub flags: MemFlags,
    /// Size in bytes.
    pub size: u64,
}

impl BufferDesc {
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            flags: MemFlags::default(),
            size,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MemFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        validate_flags(self.flags)?;
        if self.size == 0 {
            return Err(DescriptorError::ZeroSize);
        }
        Ok(())
    }
}

/// Parameters for a 2D or 3D image. A depth of 1 describes a 2D image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    pub flags: MemFlags,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl ImageDesc {
    #[must_use]
    pub fn new_2d(format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            flags: MemFlags::default(),
            format,
            width,
            height,
            depth: 1,
        }
    }

    #[must_use]
    pub fn new_3d(format: ImageFormat, width: u32, height: u32, depth: u32) -> Self {
        Self {
            depth,
            ..Self::new_2d(format, width, height)
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MemFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn object_type(&self) -> MemObjectType {
        if self.depth > 1 {
            MemObjectType::Image3D
        } else {
            MemObjectType::Image2D
        }
    }

    /// Tightly packed row pitch in bytes.
    #[must_use]
    pub fn row_pitch(&self) -> u64 {
        u64::from(self.width) * u64::from(self.format.element_size())
    }

    /// Slice pitch in bytes; zero for 2D images.
    #[must_use]
    pub fn slice_pitch(&self) -> u64 {
        match self.object_type() {
            MemObjectType::Image3D => self.row_pitch() * u64::from(self.height),
            _ => 0,
        }
    }

    /// Total storage in bytes.
    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.row_pitch() * u64::from(self.height) * u64::from(self.depth)
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        validate_flags(self.flags)?;
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(DescriptorError::ZeroExtent {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        Ok(())
    }
}

/// Parameters for an image sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub normalized_coords: bool,
    pub addressing: AddressingMode,
    pub filter: FilterMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            normalized_coords: true,
            addressing: AddressingMode::ClampToEdge,
            filter: FilterMode::Linear,
        }
    }
}

/// A request to the native allocation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireRequest {
    Buffer(BufferDesc),
    Image(ImageDesc),
    Sampler(SamplerDesc),
}

impl AcquireRequest {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Buffer(_) => ResourceKind::Buffer,
            Self::Image(_) => ResourceKind::Image,
            Self::Sampler(_) => ResourceKind::Sampler,
        }
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        match self {
            Self::Buffer(desc) => desc.validate(),
            Self::Image(desc) => desc.validate(),
            Self::Sampler(_) => Ok(()),
        }
    }
}

fn validate_flags(flags: MemFlags) -> Result<(), DescriptorError> {
    if flags.intersection(MemFlags::ACCESS).bits().count_ones() > 1 {
        return Err(DescriptorError::ConflictingAccess(flags));
    }
    if flags.contains(MemFlags::USE_HOST_PTR)
        && flags.intersects(MemFlags::ALLOC_HOST_PTR | MemFlags::COPY_HOST_PTR)
    {
        return Err(DescriptorError::ConflictingHostPtr(flags));
    }
    if flags.intersects(MemFlags::HOST_SOURCED) {
        return Err(DescriptorError::HostPtrUnsupported(flags));
    }
    Ok(())
}
