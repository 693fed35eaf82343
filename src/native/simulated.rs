//! In-process stand-in for a device driver.
//!
//! [`SimulatedRuntime`] hands out handles, remembers what each one describes,
//! answers queries from that description and keeps a log of every release.
//! A release of a handle it does not consider live is recorded as a double
//! free and rejected the way a real driver would (`CL_INVALID_MEM_OBJECT` /
//! `CL_INVALID_SAMPLER`). Failures and panics can be injected for the next
//! call to exercise error paths.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::descriptor::AcquireRequest;
use super::format::MemObjectType;
use super::info::{ImageInfo, InfoSelector, MemInfo, SamplerInfo};
use super::{NativeRuntime, NativeStatus, RawHandle, ResourceKind};

/// Handle values start here so they never look like small integers.
const FIRST_HANDLE: u64 = 0x1000;

#[derive(Default)]
struct SimState {
    next_handle: u64,
    live: FxHashMap<RawHandle, AcquireRequest>,
    recycle: bool,
    free_list: Vec<RawHandle>,

    acquire_count: usize,
    release_log: Vec<RawHandle>,
    double_frees: Vec<RawHandle>,
    info_calls: usize,

    fail_next_acquire: Option<NativeStatus>,
    fail_next_release: Option<NativeStatus>,
    fail_next_info: Option<NativeStatus>,
    panic_next_release: bool,
}

/// Thread-safe simulated driver.
pub struct SimulatedRuntime {
    state: Mutex<SimState>,
}

impl Default for SimulatedRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                next_handle: FIRST_HANDLE,
                ..SimState::default()
            }),
        }
    }

    /// Reuses freed handle values for later allocations, like real drivers
    /// that recycle object pointers.
    #[must_use]
    pub fn with_handle_recycling() -> Self {
        let runtime = Self::new();
        runtime.state.lock().recycle = true;
        runtime
    }

    // ========================================================================
    // Fault injection
    // ========================================================================

    pub fn fail_next_acquire(&self, status: NativeStatus) {
        self.state.lock().fail_next_acquire = Some(status);
    }

    /// The next release fails with `status`; the object stays allocated.
    pub fn fail_next_release(&self, status: NativeStatus) {
        self.state.lock().fail_next_release = Some(status);
    }

    pub fn fail_next_get_info(&self, status: NativeStatus) {
        self.state.lock().fail_next_info = Some(status);
    }

    /// The next release panics after freeing the object.
    pub fn panic_on_next_release(&self) {
        self.state.lock().panic_next_release = true;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of release calls made for `handle`, successful or not.
    #[must_use]
    pub fn release_count(&self, handle: RawHandle) -> usize {
        self.state
            .lock()
            .release_log
            .iter()
            .filter(|h| **h == handle)
            .count()
    }

    /// Total release calls across all handles.
    #[must_use]
    pub fn total_releases(&self) -> usize {
        self.state.lock().release_log.len()
    }

    #[must_use]
    pub fn total_acquires(&self) -> usize {
        self.state.lock().acquire_count
    }

    /// Handles that were released while not live.
    #[must_use]
    pub fn double_frees(&self) -> Vec<RawHandle> {
        self.state.lock().double_frees.clone()
    }

    #[must_use]
    pub fn is_live(&self, handle: RawHandle) -> bool {
        self.state.lock().live.contains_key(&handle)
    }

    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.state.lock().live.len()
    }

    #[must_use]
    pub fn info_calls(&self) -> usize {
        self.state.lock().info_calls
    }
}

impl NativeRuntime for SimulatedRuntime {
    fn acquire(&self, request: &AcquireRequest) -> Result<RawHandle, NativeStatus> {
        let mut state = self.state.lock();
        if let Some(status) = state.fail_next_acquire.take() {
            return Err(status);
        }

        let recycled = if state.recycle { state.free_list.pop() } else { None };
        let handle = match recycled {
            Some(handle) => handle,
            None => {
                let raw = state.next_handle;
                state.next_handle += 0x10;
                RawHandle::from_raw(raw).ok_or(NativeStatus::OutOfResources)?
            }
        };

        state.acquire_count += 1;
        state.live.insert(handle, request.clone());
        Ok(handle)
    }

    fn release(&self, kind: ResourceKind, handle: RawHandle) -> Result<(), NativeStatus> {
        let panic_now = {
            let mut state = self.state.lock();
            state.release_log.push(handle);

            if let Some(status) = state.fail_next_release.take() {
                return Err(status);
            }

            match state.live.get(&handle).map(AcquireRequest::kind) {
                Some(live_kind) if live_kind == kind => {}
                Some(_) => return Err(kind.invalid_handle_status()),
                None => {
                    log::error!("SimulatedRuntime: double free of {kind} {handle}");
                    state.double_frees.push(handle);
                    return Err(kind.invalid_handle_status());
                }
            }

            state.live.remove(&handle);
            if state.recycle {
                state.free_list.push(handle);
            }
            std::mem::take(&mut state.panic_next_release)
        };

        if panic_now {
            panic!("SimulatedRuntime: injected panic while releasing {handle}");
        }
        Ok(())
    }

    fn get_info(
        &self,
        handle: RawHandle,
        selector: InfoSelector,
        size: usize,
    ) -> Result<Vec<u8>, NativeStatus> {
        let mut state = self.state.lock();
        state.info_calls += 1;

        if let Some(status) = state.fail_next_info.take() {
            return Err(status);
        }
        if size < selector.result_size() {
            return Err(NativeStatus::InvalidValue);
        }

        let request = state.live.get(&handle).ok_or(NativeStatus::InvalidMemObject)?;
        answer(request, selector)
    }
}

fn answer(request: &AcquireRequest, selector: InfoSelector) -> Result<Vec<u8>, NativeStatus> {
    let invalid = request.kind().invalid_handle_status();

    let bytes = match (request, selector) {
        (AcquireRequest::Buffer(desc), InfoSelector::Mem(info)) => match info {
            MemInfo::Type => MemObjectType::Buffer.to_native().to_ne_bytes().to_vec(),
            MemInfo::Flags => desc.flags.bits().to_ne_bytes().to_vec(),
            MemInfo::Size => desc.size.to_ne_bytes().to_vec(),
            MemInfo::MapCount => 0u32.to_ne_bytes().to_vec(),
            MemInfo::ReferenceCount => 1u32.to_ne_bytes().to_vec(),
        },
        (AcquireRequest::Image(desc), InfoSelector::Mem(info)) => match info {
            MemInfo::Type => desc.object_type().to_native().to_ne_bytes().to_vec(),
            MemInfo::Flags => desc.flags.bits().to_ne_bytes().to_vec(),
            MemInfo::Size => desc.byte_size().to_ne_bytes().to_vec(),
            MemInfo::MapCount => 0u32.to_ne_bytes().to_vec(),
            MemInfo::ReferenceCount => 1u32.to_ne_bytes().to_vec(),
        },
        (AcquireRequest::Image(desc), InfoSelector::Image(info)) => match info {
            ImageInfo::Format => {
                let mut bytes = desc.format.channel_order.to_native().to_ne_bytes().to_vec();
                bytes.extend_from_slice(&desc.format.channel_type.to_native().to_ne_bytes());
                bytes
            }
            ImageInfo::ElementSize => u64::from(desc.format.element_size()).to_ne_bytes().to_vec(),
            ImageInfo::RowPitch => desc.row_pitch().to_ne_bytes().to_vec(),
            ImageInfo::SlicePitch => desc.slice_pitch().to_ne_bytes().to_vec(),
            ImageInfo::Width => u64::from(desc.width).to_ne_bytes().to_vec(),
            ImageInfo::Height => u64::from(desc.height).to_ne_bytes().to_vec(),
            ImageInfo::Depth => {
                // 2D images report a depth of zero.
                let depth = if desc.depth > 1 { desc.depth } else { 0 };
                u64::from(depth).to_ne_bytes().to_vec()
            }
        },
        (AcquireRequest::Sampler(desc), InfoSelector::Sampler(info)) => match info {
            SamplerInfo::ReferenceCount => 1u32.to_ne_bytes().to_vec(),
            SamplerInfo::NormalizedCoords => u32::from(desc.normalized_coords).to_ne_bytes().to_vec(),
            SamplerInfo::AddressingMode => desc.addressing.to_native().to_ne_bytes().to_vec(),
            SamplerInfo::FilterMode => desc.filter.to_native().to_ne_bytes().to_vec(),
        },
        _ => return Err(invalid),
    };
    Ok(bytes)
}
