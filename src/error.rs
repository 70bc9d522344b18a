//! Error types for the WMI engine.
//!
//! Every error maps onto the negative errno the firmware-facing layer
//! reports upward, see [`Error::errno`].

use thiserror::Error;

use crate::protocol::CommandType;

/// Invalid argument.
pub const EINVAL: i32 = 22;
/// I/O error.
pub const EIO: i32 = 5;
/// Out of memory.
pub const ENOMEM: i32 = 12;
/// Device or resource busy.
pub const EBUSY: i32 = 16;

/// The main error type for WMI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport reported a negative status.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Transport moved a different number of words than requested.
    #[error("{op}() failed({actual} != {expected})")]
    ShortTransfer {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Frame encoding/decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A length field exceeds its bound.
    #[error("invalid {field} len({actual} > {max})")]
    Bounds {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// No interface registered for this firmware index.
    #[error("no interface for index {0}")]
    InterfaceNotFound(u32),

    /// Channel is neither a 2.4GHz nor a 5GHz channel.
    #[error("invalid channel({0})")]
    InvalidChannel(u32),

    /// Management frame is neither a beacon nor a probe response.
    #[error("unsupported mgmt frame(fc=0x{0:04x})")]
    UnsupportedFrame(u16),

    /// Command type the dispatcher has no handler for.
    #[error("unsupported cmd({0})")]
    UnsupportedCommand(u16),

    /// A scan is already outstanding on the interface.
    #[error("scan already pending on interface {0}")]
    ScanInProgress(u32),

    /// Collaborator could not allocate the requested object.
    #[error("{0} failed: out of memory")]
    OutOfMemory(&'static str),

    /// Generic invalid argument, typically signalled by a collaborator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns the negative errno equivalent of this error.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::Transport(e) => e.code,
            Self::ShortTransfer { .. } => -EIO,
            Self::OutOfMemory(_) => -ENOMEM,
            Self::ScanInProgress(_) => -EBUSY,
            Self::Frame(_)
            | Self::Bounds { .. }
            | Self::InterfaceNotFound(_)
            | Self::InvalidChannel(_)
            | Self::UnsupportedFrame(_)
            | Self::UnsupportedCommand(_)
            | Self::InvalidArgument(_) => -EINVAL,
        }
    }
}

/// Negative status returned by a transport read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transport status {code}")]
pub struct TransportError {
    /// Negative errno reported by the transport.
    pub code: i32,
}

impl TransportError {
    /// Creates a transport error, forcing the code negative. A zero code
    /// becomes `-EIO`.
    #[must_use]
    pub const fn new(code: i32) -> Self {
        let code = match code {
            0 => -EIO,
            1.. => -code,
            _ => code,
        };
        Self { code }
    }
}

/// Frame-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Declared length differs from the size of the command type.
    #[error("invalid {cmd:?} rsp len({actual} != {expected})")]
    LengthMismatch {
        cmd: CommandType,
        expected: u32,
        actual: u32,
    },

    /// Declared length is too small to carry the command's fixed part.
    #[error("invalid {cmd:?} rsp len({actual} <= {min})")]
    TooShort { cmd: CommandType, min: u32, actual: u32 },

    /// Declared length is not a multiple of the 4-byte word.
    #[error("unaligned frame len({0})")]
    Unaligned(u32),

    /// Declared length cannot even cover the response header.
    #[error("frame len({0}) shorter than header")]
    HeaderTooShort(u32),

    /// Frame does not belong to the 802.11 command group.
    #[error("unsupported cmd group({0})")]
    UnknownGroup(u8),

    /// Encoded request does not fit the fixed layout.
    #[error("{field} len({actual} > {max})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Result type alias for WMI operations.
pub type Result<T> = std::result::Result<T, Error>;
