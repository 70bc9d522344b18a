//! Transport layer for WMI communication.
//!
//! The firmware bus is a pair of word-granular queues. This module provides
//! the capability the engine is driven through plus an in-memory loopback
//! used to exercise the engine without hardware.

pub mod loopback;

use tracing::{error, trace};

use crate::error::{Error, Result, TransportError};

/// Handle of a firmware queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueueHandle(pub u32);

/// Trait for transport implementations.
///
/// Both operations block until the transfer completes and return the number
/// of words moved.
pub trait Transport: Send + Sync {
    /// Reads `buf.len()` words from `queue`.
    fn read(
        &self,
        queue: QueueHandle,
        buf: &mut [u32],
    ) -> std::result::Result<usize, TransportError>;

    /// Writes `buf.len()` words to `queue`.
    fn write(&self, queue: QueueHandle, buf: &[u32])
    -> std::result::Result<usize, TransportError>;

    /// Reads exactly `buf.len()` words; a short read is an I/O error.
    fn read_exact(&self, queue: QueueHandle, buf: &mut [u32]) -> Result<()> {
        let expected = buf.len();
        let actual = self.read(queue, buf).map_err(|e| {
            error!(code = e.code, expected, "read() failed");
            Error::from(e)
        })?;
        if actual != expected {
            error!(expected, actual, "read() short");
            return Err(Error::ShortTransfer {
                op: "read",
                expected,
                actual,
            });
        }
        trace!(queue = queue.0, words = actual, "read");
        Ok(())
    }

    /// Writes exactly `buf.len()` words; a short write is an I/O error.
    fn write_all(&self, queue: QueueHandle, buf: &[u32]) -> Result<()> {
        let expected = buf.len();
        let actual = self.write(queue, buf).map_err(|e| {
            error!(code = e.code, expected, "write() failed");
            Error::from(e)
        })?;
        if actual != expected {
            error!(expected, actual, "write() short");
            return Err(Error::ShortTransfer {
                op: "write",
                expected,
                actual,
            });
        }
        trace!(queue = queue.0, words = actual, "write");
        Ok(())
    }
}

pub use loopback::LoopbackTransport;
