//! In-memory loopback transport.
//!
//! Frames queued with [`LoopbackTransport::push_frame`] are served to
//! reads in order; every write is captured. Both directions are recorded so
//! callers can assert exactly which transfers happened.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::error::{EIO, TransportError};
use crate::protocol::frame::{CommandHeader, pack_words, unpack_words};
use crate::protocol::CommandType;
use crate::transport::{QueueHandle, Transport};

#[derive(Debug, Default)]
struct State {
    inbound: VecDeque<u32>,
    reads: Vec<usize>,
    writes: Vec<Vec<u32>>,
    read_error: Option<i32>,
    write_error: Option<i32>,
    short_write: bool,
}

/// Loopback transport backed by an in-memory word queue.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    state: Mutex<State>,
}

impl LoopbackTransport {
    /// Creates an empty loopback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a frame for reading, zero-padding it to a whole word.
    pub fn push_frame(&self, frame: &[u8]) {
        self.state().inbound.extend(unpack_words(frame));
    }

    /// Number of words still queued for reading.
    #[must_use]
    pub fn pending_words(&self) -> usize {
        self.state().inbound.len()
    }

    /// Word counts of every read, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<usize> {
        self.state().reads.clone()
    }

    /// Every written frame as bytes, in order.
    #[must_use]
    pub fn writes(&self) -> Vec<Bytes> {
        self.state()
            .writes
            .iter()
            .map(|words| pack_words(words).freeze())
            .collect()
    }

    /// Command types of every written frame, in order.
    #[must_use]
    pub fn written_types(&self) -> Vec<Option<CommandType>> {
        self.writes()
            .iter()
            .map(|frame| CommandHeader::get(&mut &frame[..]).command_type())
            .collect()
    }

    /// Makes every following read fail with `code`.
    pub fn fail_reads(&self, code: i32) {
        self.state().read_error = Some(code);
    }

    /// Makes every following write fail with `code`.
    pub fn fail_writes(&self, code: i32) {
        self.state().write_error = Some(code);
    }

    /// Makes the next write report one word less than requested.
    pub fn short_next_write(&self) {
        self.state().short_write = true;
    }
}

impl Transport for LoopbackTransport {
    fn read(&self, _queue: QueueHandle, buf: &mut [u32]) -> Result<usize, TransportError> {
        let mut state = self.state();
        state.reads.push(buf.len());
        if let Some(code) = state.read_error {
            return Err(TransportError::new(code));
        }

        let mut count = 0;
        for slot in buf.iter_mut() {
            let Some(word) = state.inbound.pop_front() else {
                break;
            };
            *slot = word;
            count += 1;
        }
        Ok(count)
    }

    fn write(&self, _queue: QueueHandle, buf: &[u32]) -> Result<usize, TransportError> {
        let mut state = self.state();
        if let Some(code) = state.write_error {
            return Err(TransportError::new(code));
        }
        if buf.is_empty() {
            return Err(TransportError::new(EIO));
        }

        state.writes.push(buf.to_vec());
        if std::mem::take(&mut state.short_write) {
            return Ok(buf.len() - 1);
        }
        Ok(buf.len())
    }
}
