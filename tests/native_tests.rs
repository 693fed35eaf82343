//! Native Table Tests
//!
//! Tests for:
//! - Static constant tables: forward / reverse mapping for every variant
//! - Status code translation, including unknown codes
//! - Query selector sizing and decoding

use std::fmt::Debug;
use std::hash::Hash;

use devres::native::{
    AddressingMode, ChannelOrder, ChannelType, FilterMode, ImageFormat, ImageInfo, InfoSelector,
    InfoValue, MemFlags, MemInfo, MemObjectType, SamplerInfo, check,
};
use devres::{NativeStatus, RawHandle, RegistryError, ResourceKind};
use rustc_hash::FxHashSet;

fn assert_table<T: Copy + Eq + Hash + Debug>(
    all: &[T],
    to_native: impl Fn(T) -> u32,
    from_native: impl Fn(u32) -> Option<T>,
) {
    let mut seen = FxHashSet::default();
    for &variant in all {
        let value = to_native(variant);
        assert!(seen.insert(value), "{variant:?} shares native value {value:#x}");
        assert_eq!(from_native(value), Some(variant));
    }
}

// ============================================================================
// Constant Tables
// ============================================================================

#[test]
fn every_table_round_trips() {
    assert_table(MemObjectType::ALL, MemObjectType::to_native, MemObjectType::from_native);
    assert_table(ChannelOrder::ALL, ChannelOrder::to_native, ChannelOrder::from_native);
    assert_table(ChannelType::ALL, ChannelType::to_native, ChannelType::from_native);
    assert_table(AddressingMode::ALL, AddressingMode::to_native, AddressingMode::from_native);
    assert_table(FilterMode::ALL, FilterMode::to_native, FilterMode::from_native);
    assert_table(MemInfo::ALL, MemInfo::to_native, MemInfo::from_native);
    assert_table(ImageInfo::ALL, ImageInfo::to_native, ImageInfo::from_native);
    assert_table(SamplerInfo::ALL, SamplerInfo::to_native, SamplerInfo::from_native);
}

#[test]
fn unknown_native_values_are_rejected() {
    assert_eq!(ChannelOrder::from_native(0), None);
    assert_eq!(ChannelType::from_native(0x10DF), None);
    assert_eq!(FilterMode::from_native(0x1142), None);
    assert_eq!(MemObjectType::from_native(0x10F3), None);
}

#[test]
fn known_constants() {
    assert_eq!(MemObjectType::Buffer.to_native(), 0x10F0);
    assert_eq!(ChannelOrder::RGBA.to_native(), 0x10B5);
    assert_eq!(ChannelType::Float.to_native(), 0x10DE);
    assert_eq!(AddressingMode::ClampToEdge.to_native(), 0x1131);
    assert_eq!(MemInfo::Size.to_native(), 0x1102);
    assert_eq!(ImageInfo::Width.to_native(), 0x1114);
}

#[test]
fn element_sizes() {
    let size = |order, ty| ImageFormat::new(order, ty).element_size();
    assert_eq!(size(ChannelOrder::RGBA, ChannelType::UnormInt8), 4);
    assert_eq!(size(ChannelOrder::RG, ChannelType::HalfFloat), 4);
    assert_eq!(size(ChannelOrder::R, ChannelType::Float), 4);
    assert_eq!(size(ChannelOrder::RGB, ChannelType::UnormShort565), 2);
    assert_eq!(size(ChannelOrder::RGBx, ChannelType::UnormInt101010), 4);
}

#[test]
fn mem_flag_groups() {
    assert_eq!(MemFlags::default(), MemFlags::READ_WRITE);
    assert!(MemFlags::ACCESS.contains(MemFlags::READ_ONLY | MemFlags::WRITE_ONLY));
    assert!(!MemFlags::HOST_SOURCED.contains(MemFlags::ALLOC_HOST_PTR));
}

// ============================================================================
// Status Codes
// ============================================================================

#[test]
fn status_table_is_complete_and_unique() {
    let mut codes = FxHashSet::default();
    for &status in NativeStatus::ALL {
        assert!(codes.insert(status.code()), "{status:?} duplicated");
        assert_eq!(NativeStatus::from_code(status.code()), Some(status));
        assert_eq!(check(status.code()), Err(status));
    }
    assert!(codes.contains(&-1));
    assert!(codes.contains(&-70));
    assert!(codes.contains(&-1001));
}

#[test]
fn success_and_unknown_codes() {
    assert_eq!(check(0), Ok(()));
    assert_eq!(check(-12345), Err(NativeStatus::Unknown(-12345)));
    assert_eq!(NativeStatus::Unknown(-12345).code(), -12345);
}

#[test]
fn native_error_keeps_code_in_message() {
    let err = RegistryError::from(NativeStatus::InvalidMemObject);
    assert_eq!(err.native_code(), Some(NativeStatus::InvalidMemObject));
    assert!(!err.is_contract_violation());

    let message = err.to_string();
    assert!(message.contains("CL_INVALID_MEM_OBJECT"), "{message}");
    assert!(message.contains("-38"), "{message}");
}

#[test]
fn stale_handle_status_per_kind() {
    assert_eq!(ResourceKind::Buffer.invalid_handle_status(), NativeStatus::InvalidMemObject);
    assert_eq!(ResourceKind::Image.invalid_handle_status(), NativeStatus::InvalidMemObject);
    assert_eq!(ResourceKind::Sampler.invalid_handle_status(), NativeStatus::InvalidSampler);
    assert!(ResourceKind::Image.is_mem_object());
    assert!(!ResourceKind::Sampler.is_mem_object());
}

// ============================================================================
// Handles and Queries
// ============================================================================

#[test]
fn null_handle_is_not_representable() {
    assert!(RawHandle::from_raw(0).is_none());
    let handle = RawHandle::from_raw(0x1f00).unwrap();
    assert_eq!(handle.as_raw(), 0x1f00);
    assert_eq!(handle.to_string(), "0x1f00");
}

#[test]
fn selector_sizes_and_decoding() {
    let size = InfoSelector::from(MemInfo::Size);
    assert_eq!(size.result_size(), 8);
    assert_eq!(size.decode(&4096u64.to_ne_bytes()), Ok(InfoValue::Size(4096)));

    let refs = InfoSelector::from(SamplerInfo::ReferenceCount);
    assert_eq!(refs.result_size(), 4);
    assert_eq!(refs.decode(&3u32.to_ne_bytes()), Ok(InfoValue::Count(3)));
    assert_eq!(InfoValue::Count(3).as_u64(), Some(3));

    let mem_type = InfoSelector::from(MemInfo::Type);
    assert_eq!(
        mem_type.decode(&0x10F1u32.to_ne_bytes()),
        Ok(InfoValue::MemType(MemObjectType::Image2D))
    );
    assert_eq!(mem_type.decode(&0u32.to_ne_bytes()), Err(NativeStatus::InvalidValue));
}
