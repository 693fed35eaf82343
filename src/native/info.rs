//! Info selectors and typed query results.
//!
//! A query names a selector, the registry sizes the result buffer from the
//! selector's declared width, the native runtime fills it, and
//! [`InfoSelector::decode`] turns the bytes into an [`InfoValue`].

use super::format::{
    AddressingMode, ChannelOrder, ChannelType, FilterMode, ImageFormat, MemFlags, MemObjectType,
    native_enum,
};
use super::{NativeStatus, ResourceKind};

native_enum! {
    /// Queries valid on any memory object (buffers and images).
    pub enum MemInfo: u32 {
        Type = 0x1100,
        Flags = 0x1101,
        Size = 0x1102,
        MapCount = 0x1104,
        ReferenceCount = 0x1105,
    }
}

native_enum! {
    /// Image-only queries.
    pub enum ImageInfo: u32 {
        Format = 0x1110,
        ElementSize = 0x1111,
        RowPitch = 0x1112,
        SlicePitch = 0x1113,
        Width = 0x1114,
        Height = 0x1115,
        Depth = 0x1116,
    }
}

native_enum! {
    /// Sampler queries.
    pub enum SamplerInfo: u32 {
        ReferenceCount = 0x1150,
        NormalizedCoords = 0x1152,
        AddressingMode = 0x1153,
        FilterMode = 0x1154,
    }
}

/// A query against one native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoSelector {
    Mem(MemInfo),
    Image(ImageInfo),
    Sampler(SamplerInfo),
}

impl From<MemInfo> for InfoSelector {
    fn from(info: MemInfo) -> Self {
        Self::Mem(info)
    }
}

impl From<ImageInfo> for InfoSelector {
    fn from(info: ImageInfo) -> Self {
        Self::Image(info)
    }
}

impl From<SamplerInfo> for InfoSelector {
    fn from(info: SamplerInfo) -> Self {
        Self::Sampler(info)
    }
}

impl InfoSelector {
    /// The native selector constant.
    #[must_use]
    pub const fn to_native(self) -> u32 {
        match self {
            Self::Mem(info) => info.to_native(),
            Self::Image(info) => info.to_native(),
            Self::Sampler(info) => info.to_native(),
        }
    }

    /// Whether this query may be issued against a resource of `kind`.
    ///
    /// Images are memory objects, so they accept [`MemInfo`] as well.
    #[must_use]
    pub const fn applies_to(self, kind: ResourceKind) -> bool {
        matches!(
            (self, kind),
            (Self::Mem(_), ResourceKind::Buffer | ResourceKind::Image)
                | (Self::Image(_), ResourceKind::Image)
                | (Self::Sampler(_), ResourceKind::Sampler)
        )
    }

    /// Width in bytes of the native result.
    #[must_use]
    pub const fn result_size(self) -> usize {
        match self {
            Self::Mem(MemInfo::Flags | MemInfo::Size) => 8,
            Self::Mem(MemInfo::Type | MemInfo::MapCount | MemInfo::ReferenceCount) => 4,
            // Format is two packed u32s; the rest are size_t.
            Self::Image(_) => 8,
            Self::Sampler(_) => 4,
        }
    }

    /// Decodes a native result buffer (native byte order).
    pub fn decode(self, bytes: &[u8]) -> Result<InfoValue, NativeStatus> {
        if bytes.len() < self.result_size() {
            return Err(NativeStatus::InvalidValue);
        }

        let value = match self {
            Self::Mem(MemInfo::Type) => {
                let raw = read_u32(bytes, 0);
                InfoValue::MemType(
                    MemObjectType::from_native(raw).ok_or(NativeStatus::InvalidValue)?,
                )
            }
            Self::Mem(MemInfo::Flags) => InfoValue::Flags(MemFlags::from_bits_retain(read_u64(bytes))),
            Self::Mem(MemInfo::Size) => InfoValue::Size(read_u64(bytes)),
            Self::Mem(MemInfo::MapCount | MemInfo::ReferenceCount)
            | Self::Sampler(SamplerInfo::ReferenceCount) => InfoValue::Count(read_u32(bytes, 0)),
            Self::Image(ImageInfo::Format) => {
                let order = ChannelOrder::from_native(read_u32(bytes, 0))
                    .ok_or(NativeStatus::InvalidImageFormatDescriptor)?;
                let data_type = ChannelType::from_native(read_u32(bytes, 4))
                    .ok_or(NativeStatus::InvalidImageFormatDescriptor)?;
                InfoValue::Format(ImageFormat::new(order, data_type))
            }
            Self::Image(_) => InfoValue::Size(read_u64(bytes)),
            Self::Sampler(SamplerInfo::NormalizedCoords) => InfoValue::Bool(read_u32(bytes, 0) != 0),
            Self::Sampler(SamplerInfo::AddressingMode) => InfoValue::Addressing(
                AddressingMode::from_native(read_u32(bytes, 0)).ok_or(NativeStatus::InvalidValue)?,
            ),
            Self::Sampler(SamplerInfo::FilterMode) => InfoValue::Filter(
                FilterMode::from_native(read_u32(bytes, 0)).ok_or(NativeStatus::InvalidValue)?,
            ),
        };
        Ok(value)
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_ne_bytes(raw)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[..8]);
    u64::from_ne_bytes(raw)
}

/// Typed result of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoValue {
    Count(u32),
    Size(u64),
    Bool(bool),
    Flags(MemFlags),
    MemType(MemObjectType),
    Format(ImageFormat),
    Addressing(AddressingMode),
    Filter(FilterMode),
}

impl InfoValue {
    /// The value as a size, for size-like and count-like results.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Size(v) => Some(v),
            Self::Count(v) => Some(u64::from(v)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies_to() {
        assert!(InfoSelector::Mem(MemInfo::Size).applies_to(ResourceKind::Buffer));
        assert!(InfoSelector::Mem(MemInfo::Size).applies_to(ResourceKind::Image));
        assert!(!InfoSelector::Mem(MemInfo::Size).applies_to(ResourceKind::Sampler));
        assert!(!InfoSelector::Image(ImageInfo::Width).applies_to(ResourceKind::Buffer));
        assert!(InfoSelector::Sampler(SamplerInfo::FilterMode).applies_to(ResourceKind::Sampler));
    }

    #[test]
    fn test_decode_format() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ChannelOrder::BGRA.to_native().to_ne_bytes());
        bytes.extend_from_slice(&ChannelType::UnormInt8.to_native().to_ne_bytes());

        let value = InfoSelector::Image(ImageInfo::Format).decode(&bytes).unwrap();
        assert_eq!(
            value,
            InfoValue::Format(ImageFormat::new(ChannelOrder::BGRA, ChannelType::UnormInt8))
        );
    }

    #[test]
    fn test_decode_short_buffer_is_invalid_value() {
        let result = InfoSelector::Mem(MemInfo::Size).decode(&[0u8; 4]);
        assert_eq!(result, Err(NativeStatus::InvalidValue));
    }

    #[test]
    fn test_decode_unknown_filter_mode() {
        let result = InfoSelector::Sampler(SamplerInfo::FilterMode).decode(&7u32.to_ne_bytes());
        assert_eq!(result, Err(NativeStatus::InvalidValue));
    }
}
