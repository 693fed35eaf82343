//! Native status code translation.
//!
//! Every call into the native runtime returns a signed 32-bit status. Zero is
//! success; every documented failure code maps one-to-one onto a
//! [`NativeStatus`] variant. Codes outside the table are preserved verbatim in
//! [`NativeStatus::Unknown`] so diagnostics never lose the original value.

use std::fmt;

/// Status value meaning "no failure".
pub const SUCCESS: i32 = 0;

macro_rules! native_status {
    ($($variant:ident = $code:literal => $name:literal),+ $(,)?) => {
        /// A failure status reported by the native runtime.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NativeStatus {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
            /// A code not present in the documented table.
            Unknown(i32),
        }

        impl NativeStatus {
            /// Every documented status, in table order.
            pub const ALL: &'static [NativeStatus] = &[$(NativeStatus::$variant),+];

            /// The raw native code.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown(code) => code,
                }
            }

            /// The native constant name, e.g. `CL_INVALID_VALUE`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::Unknown(_) => "CL_UNKNOWN_ERROR",
                }
            }

            /// Translates a raw code. Returns `None` for [`SUCCESS`].
            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    SUCCESS => None,
                    $($code => Some(Self::$variant),)+
                    other => Some(Self::Unknown(other)),
                }
            }
        }
    };
}

native_status! {
    DeviceNotFound = -1 => "CL_DEVICE_NOT_FOUND",
    DeviceNotAvailable = -2 => "CL_DEVICE_NOT_AVAILABLE",
    CompilerNotAvailable = -3 => "CL_COMPILER_NOT_AVAILABLE",
    MemObjectAllocationFailure = -4 => "CL_MEM_OBJECT_ALLOCATION_FAILURE",
    OutOfResources = -5 => "CL_OUT_OF_RESOURCES",
    OutOfHostMemory = -6 => "CL_OUT_OF_HOST_MEMORY",
    ProfilingInfoNotAvailable = -7 => "CL_PROFILING_INFO_NOT_AVAILABLE",
    MemCopyOverlap = -8 => "CL_MEM_COPY_OVERLAP",
    ImageFormatMismatch = -9 => "CL_IMAGE_FORMAT_MISMATCH",
    ImageFormatNotSupported = -10 => "CL_IMAGE_FORMAT_NOT_SUPPORTED",
    BuildProgramFailure = -11 => "CL_BUILD_PROGRAM_FAILURE",
    MapFailure = -12 => "CL_MAP_FAILURE",
    MisalignedSubBufferOffset = -13 => "CL_MISALIGNED_SUB_BUFFER_OFFSET",
    ExecStatusErrorForEventsInWaitList = -14 => "CL_EXEC_STATUS_ERROR_FOR_EVENTS_IN_WAIT_LIST",
    CompileProgramFailure = -15 => "CL_COMPILE_PROGRAM_FAILURE",
    LinkerNotAvailable = -16 => "CL_LINKER_NOT_AVAILABLE",
    LinkProgramFailure = -17 => "CL_LINK_PROGRAM_FAILURE",
    DevicePartitionFailed = -18 => "CL_DEVICE_PARTITION_FAILED",
    KernelArgInfoNotAvailable = -19 => "CL_KERNEL_ARG_INFO_NOT_AVAILABLE",
    InvalidValue = -30 => "CL_INVALID_VALUE",
    InvalidDeviceType = -31 => "CL_INVALID_DEVICE_TYPE",
    InvalidPlatform = -32 => "CL_INVALID_PLATFORM",
    InvalidDevice = -33 => "CL_INVALID_DEVICE",
    InvalidContext = -34 => "CL_INVALID_CONTEXT",
    InvalidQueueProperties = -35 => "CL_INVALID_QUEUE_PROPERTIES",
    InvalidCommandQueue = -36 => "CL_INVALID_COMMAND_QUEUE",
    InvalidHostPtr = -37 => "CL_INVALID_HOST_PTR",
    InvalidMemObject = -38 => "CL_INVALID_MEM_OBJECT",
    InvalidImageFormatDescriptor = -39 => "CL_INVALID_IMAGE_FORMAT_DESCRIPTOR",
    InvalidImageSize = -40 => "CL_INVALID_IMAGE_SIZE",
    InvalidSampler = -41 => "CL_INVALID_SAMPLER",
    InvalidBinary = -42 => "CL_INVALID_BINARY",
    InvalidBuildOptions = -43 => "CL_INVALID_BUILD_OPTIONS",
    InvalidProgram = -44 => "CL_INVALID_PROGRAM",
    InvalidProgramExecutable = -45 => "CL_INVALID_PROGRAM_EXECUTABLE",
    InvalidKernelName = -46 => "CL_INVALID_KERNEL_NAME",
    InvalidKernelDefinition = -47 => "CL_INVALID_KERNEL_DEFINITION",
    InvalidKernel = -48 => "CL_INVALID_KERNEL",
    InvalidArgIndex = -49 => "CL_INVALID_ARG_INDEX",
    InvalidArgValue = -50 => "CL_INVALID_ARG_VALUE",
    InvalidArgSize = -51 => "CL_INVALID_ARG_SIZE",
    InvalidKernelArgs = -52 => "CL_INVALID_KERNEL_ARGS",
    InvalidWorkDimension = -53 => "CL_INVALID_WORK_DIMENSION",
    InvalidWorkGroupSize = -54 => "CL_INVALID_WORK_GROUP_SIZE",
    InvalidWorkItemSize = -55 => "CL_INVALID_WORK_ITEM_SIZE",
    InvalidGlobalOffset = -56 => "CL_INVALID_GLOBAL_OFFSET",
    InvalidEventWaitList = -57 => "CL_INVALID_EVENT_WAIT_LIST",
    InvalidEvent = -58 => "CL_INVALID_EVENT",
    InvalidOperation = -59 => "CL_INVALID_OPERATION",
    InvalidGlObject = -60 => "CL_INVALID_GL_OBJECT",
    InvalidBufferSize = -61 => "CL_INVALID_BUFFER_SIZE",
    InvalidMipLevel = -62 => "CL_INVALID_MIP_LEVEL",
    InvalidGlobalWorkSize = -63 => "CL_INVALID_GLOBAL_WORK_SIZE",
    InvalidProperty = -64 => "CL_INVALID_PROPERTY",
    InvalidImageDescriptor = -65 => "CL_INVALID_IMAGE_DESCRIPTOR",
    InvalidCompilerOptions = -66 => "CL_INVALID_COMPILER_OPTIONS",
    InvalidLinkerOptions = -67 => "CL_INVALID_LINKER_OPTIONS",
    InvalidDevicePartitionCount = -68 => "CL_INVALID_DEVICE_PARTITION_COUNT",
    InvalidPipeSize = -69 => "CL_INVALID_PIPE_SIZE",
    InvalidDeviceQueue = -70 => "CL_INVALID_DEVICE_QUEUE",
    PlatformNotFound = -1001 => "CL_PLATFORM_NOT_FOUND_KHR",
}

impl fmt::Display for NativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown native status {code}"),
            other => f.write_str(other.name()),
        }
    }
}

impl std::error::Error for NativeStatus {}

/// Converts a raw native status into a `Result`.
///
/// ```rust,ignore
/// assert!(check(0).is_ok());
/// assert_eq!(check(-38), Err(NativeStatus::InvalidMemObject));
/// ```
pub fn check(code: i32) -> Result<(), NativeStatus> {
    match NativeStatus::from_code(code) {
        None => Ok(()),
        Some(status) => Err(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_success_is_not_an_error() {
        assert_eq!(NativeStatus::from_code(SUCCESS), None);
        assert!(check(SUCCESS).is_ok());
    }

    #[test]
    fn test_table_round_trips() {
        for &status in NativeStatus::ALL {
            assert_eq!(NativeStatus::from_code(status.code()), Some(status));
            assert!(status.name().starts_with("CL_"));
        }
    }

    #[test]
    fn test_codes_and_names_are_unique() {
        let codes: FxHashSet<i32> = NativeStatus::ALL.iter().map(|s| s.code()).collect();
        let names: FxHashSet<&str> = NativeStatus::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(codes.len(), NativeStatus::ALL.len());
        assert_eq!(names.len(), NativeStatus::ALL.len());
        assert!(!codes.contains(&SUCCESS));
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let status = NativeStatus::from_code(-9999).unwrap();
        assert_eq!(status, NativeStatus::Unknown(-9999));
        assert_eq!(status.code(), -9999);
        assert_eq!(check(-9999), Err(NativeStatus::Unknown(-9999)));
    }

    #[test]
    fn test_display_uses_constant_name() {
        assert_eq!(NativeStatus::InvalidSampler.to_string(), "CL_INVALID_SAMPLER");
    }
}
