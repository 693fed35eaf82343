//! Static native constant tables.
//!
//! Each enum here mirrors one native constant group. The mapping is generated
//! at compile time from a single variant list, so the forward (`to_native`)
//! and reverse (`from_native`) directions can never drift apart.

use bitflags::bitflags;

/// Declares a fieldless enum backed by a native constant table.
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ty {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The native constant for this variant.
            #[inline]
            #[must_use]
            pub const fn to_native(self) -> $repr {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Looks up the variant for a native constant.
            #[must_use]
            pub fn from_native(value: $repr) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.to_native() == value)
            }
        }
    };
}

pub(crate) use native_enum;

bitflags! {
    /// Memory object allocation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemFlags: u64 {
        const READ_WRITE     = 1 << 0;
        const WRITE_ONLY     = 1 << 1;
        const READ_ONLY      = 1 << 2;
        const USE_HOST_PTR   = 1 << 3;
        const ALLOC_HOST_PTR = 1 << 4;
        const COPY_HOST_PTR  = 1 << 5;
    }
}

impl MemFlags {
    /// The three mutually exclusive access modes.
    pub const ACCESS: Self = Self::READ_WRITE
        .union(Self::WRITE_ONLY)
        .union(Self::READ_ONLY);

    /// Flags that source the allocation from host memory.
    pub const HOST_SOURCED: Self = Self::USE_HOST_PTR.union(Self::COPY_HOST_PTR);
}

impl Default for MemFlags {
    fn default() -> Self {
        Self::READ_WRITE
    }
}

native_enum! {
    /// Kind of a memory object, as reported by the `TYPE` memory query.
    pub enum MemObjectType: u32 {
        Buffer = 0x10F0,
        Image2D = 0x10F1,
        Image3D = 0x10F2,
    }
}

native_enum! {
    /// Channel layout of an image element.
    pub enum ChannelOrder: u32 {
        R = 0x10B0,
        A = 0x10B1,
        RG = 0x10B2,
        RA = 0x10B3,
        RGB = 0x10B4,
        RGBA = 0x10B5,
        BGRA = 0x10B6,
        ARGB = 0x10B7,
        Intensity = 0x10B8,
        Luminance = 0x10B9,
        Rx = 0x10BA,
        RGx = 0x10BB,
        RGBx = 0x10BC,
    }
}

impl ChannelOrder {
    /// Number of channels stored per element.
    #[must_use]
    pub const fn channel_count(self) -> u32 {
        match self {
            Self::R | Self::A | Self::Intensity | Self::Luminance | Self::Rx => 1,
            Self::RG | Self::RA | Self::RGx => 2,
            Self::RGB | Self::RGBx => 3,
            Self::RGBA | Self::BGRA | Self::ARGB => 4,
        }
    }
}

native_enum! {
    /// Storage type of each image channel.
    pub enum ChannelType: u32 {
        SnormInt8 = 0x10D0,
        SnormInt16 = 0x10D1,
        UnormInt8 = 0x10D2,
        UnormInt16 = 0x10D3,
        UnormShort565 = 0x10D4,
        UnormShort555 = 0x10D5,
        UnormInt101010 = 0x10D6,
        SignedInt8 = 0x10D7,
        SignedInt16 = 0x10D8,
        SignedInt32 = 0x10D9,
        UnsignedInt8 = 0x10DA,
        UnsignedInt16 = 0x10DB,
        UnsignedInt32 = 0x10DC,
        HalfFloat = 0x10DD,
        Float = 0x10DE,
    }
}

impl ChannelType {
    /// Bytes per channel, or `None` for packed types whose size is per element.
    #[must_use]
    pub const fn bytes_per_channel(self) -> Option<u32> {
        match self {
            Self::SnormInt8 | Self::UnormInt8 | Self::SignedInt8 | Self::UnsignedInt8 => Some(1),
            Self::SnormInt16
            | Self::UnormInt16
            | Self::SignedInt16
            | Self::UnsignedInt16
            | Self::HalfFloat => Some(2),
            Self::SignedInt32 | Self::UnsignedInt32 | Self::Float => Some(4),
            Self::UnormShort565 | Self::UnormShort555 | Self::UnormInt101010 => None,
        }
    }
}

/// Pixel format of an image: channel order plus channel data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    pub channel_order: ChannelOrder,
    pub channel_type: ChannelType,
}

impl ImageFormat {
    #[must_use]
    pub const fn new(channel_order: ChannelOrder, channel_type: ChannelType) -> Self {
        Self {
            channel_order,
            channel_type,
        }
    }

    /// Size in bytes of one image element.
    #[must_use]
    pub const fn element_size(&self) -> u32 {
        match self.channel_type {
            ChannelType::UnormShort565 | ChannelType::UnormShort555 => 2,
            ChannelType::UnormInt101010 => 4,
            other => match other.bytes_per_channel() {
                Some(bytes) => bytes * self.channel_order.channel_count(),
                None => 0,
            },
        }
    }
}

impl Default for ImageFormat {
    fn default() -> Self {
        Self::new(ChannelOrder::RGBA, ChannelType::UnormInt8)
    }
}

native_enum! {
    /// How out-of-range image coordinates are handled by a sampler.
    pub enum AddressingMode: u32 {
        None = 0x1130,
        ClampToEdge = 0x1131,
        Clamp = 0x1132,
        Repeat = 0x1133,
        MirroredRepeat = 0x1134,
    }
}

native_enum! {
    /// Sampler filtering.
    pub enum FilterMode: u32 {
        Nearest = 0x1140,
        Linear = 0x1141,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_size() {
        assert_eq!(ImageFormat::new(ChannelOrder::RGBA, ChannelType::UnormInt8).element_size(), 4);
        assert_eq!(ImageFormat::new(ChannelOrder::RGBA, ChannelType::Float).element_size(), 16);
        assert_eq!(ImageFormat::new(ChannelOrder::R, ChannelType::HalfFloat).element_size(), 2);
        assert_eq!(ImageFormat::new(ChannelOrder::RGB, ChannelType::UnormShort565).element_size(), 2);
        assert_eq!(ImageFormat::new(ChannelOrder::RGBx, ChannelType::UnormInt101010).element_size(), 4);
    }

    #[test]
    fn test_access_flags_group() {
        assert!(MemFlags::ACCESS.contains(MemFlags::READ_ONLY));
        assert!(!MemFlags::ACCESS.contains(MemFlags::USE_HOST_PTR));
        assert_eq!(MemFlags::default(), MemFlags::READ_WRITE);
    }

    #[test]
    fn test_from_native_rejects_unknown() {
        assert_eq!(FilterMode::from_native(0x1141), Some(FilterMode::Linear));
        assert_eq!(FilterMode::from_native(0xDEAD), None);
    }
}
