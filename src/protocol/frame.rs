//! Frame headers and word conversion for the WMI protocol.
//!
//! Every frame starts with a command header; firmware responses and
//! indications extend it with a signed result word:
//! ```text
//! ┌────────────┬───────┬─────┬────────────┬──────────────┬───────────────┐
//! │ len (u32)  │  grp  │ pad │ type (u16) │ result (i32) │ payload ...   │
//! │  4 bytes   │   1   │  1  │     2      │   4 bytes    │ word aligned  │
//! └────────────┴───────┴─────┴────────────┴──────────────┴───────────────┘
//! ```
//! `len` counts the whole frame including the header. Words travel in host
//! native byte order.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;
use crate::protocol::command::{CommandGroup, CommandType};
use crate::protocol::layout::{RSP_HDR_LEN, WORD_LEN, len32_aligned, len_to_words};

/// Number of words in a response header.
pub const RSP_HDR_WORDS: usize = RSP_HDR_LEN / WORD_LEN;

/// Header present on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    /// Whole frame size in bytes.
    pub len: u32,
    /// Command group.
    pub grp: u8,
    /// Raw command type.
    pub ty: u16,
}

impl CommandHeader {
    /// Creates an 802.11 group header for a frame of `len` bytes.
    #[must_use]
    pub fn new(ty: CommandType, len: usize) -> Self {
        Self {
            len: len as u32,
            grp: CommandGroup::Ieee80211.into(),
            ty: ty.into(),
        }
    }

    /// Returns the command type, if known.
    #[must_use]
    pub fn command_type(&self) -> Option<CommandType> {
        CommandType::from_u16(self.ty)
    }

    /// Writes the header.
    pub fn put(&self, buf: &mut BytesMut) {
        buf.put_u32_ne(self.len);
        buf.put_u8(self.grp);
        buf.put_u8(0);
        buf.put_u16_ne(self.ty);
    }

    /// Reads a header. `buf` must hold at least eight bytes.
    pub fn get(buf: &mut impl Buf) -> Self {
        let len = buf.get_u32_ne();
        let grp = buf.get_u8();
        buf.advance(1);
        let ty = buf.get_u16_ne();
        Self { len, grp, ty }
    }
}

/// Header of every firmware response or indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Command header.
    pub cmd: CommandHeader,
    /// Status, or a payload length for variable-size indications.
    pub result: i32,
}

impl ResponseHeader {
    /// Decodes a response header from the first three words of a frame.
    ///
    /// # Errors
    ///
    /// Returns a `FrameError` if the declared length is not word aligned or
    /// is shorter than the header itself.
    pub fn from_words(words: &[u32; RSP_HDR_WORDS]) -> Result<Self, FrameError> {
        let mut buf = pack_words(words);
        let cmd = CommandHeader::get(&mut buf);
        let result = buf.get_i32_ne();

        if cmd.len as usize % WORD_LEN != 0 {
            return Err(FrameError::Unaligned(cmd.len));
        }
        if (cmd.len as usize) < RSP_HDR_LEN {
            return Err(FrameError::HeaderTooShort(cmd.len));
        }

        Ok(Self { cmd, result })
    }

    /// Encodes the header back into words.
    #[must_use]
    pub fn to_words(&self) -> [u32; RSP_HDR_WORDS] {
        let mut buf = BytesMut::with_capacity(RSP_HDR_LEN);
        self.cmd.put(&mut buf);
        buf.put_i32_ne(self.result);
        let mut words = [0u32; RSP_HDR_WORDS];
        for (word, chunk) in words.iter_mut().zip(buf.chunks_exact(WORD_LEN)) {
            *word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Returns the command type, if known.
    #[must_use]
    pub fn command_type(&self) -> Option<CommandType> {
        self.cmd.command_type()
    }

    /// Number of payload bytes following the header.
    #[must_use]
    pub const fn payload_len(&self) -> u32 {
        self.cmd.len.saturating_sub(RSP_HDR_LEN as u32)
    }
}

/// Converts words to their in-memory byte representation.
#[must_use]
pub fn pack_words(words: &[u32]) -> BytesMut {
    let mut buf = BytesMut::with_capacity(words.len() * WORD_LEN);
    for word in words {
        buf.put_u32_ne(*word);
    }
    buf
}

/// Converts bytes to words, zero-padding the last word.
#[must_use]
pub fn unpack_words(data: &[u8]) -> Vec<u32> {
    let mut words = Vec::with_capacity(len_to_words(data.len()));
    for chunk in data.chunks(WORD_LEN) {
        let mut word = [0u8; WORD_LEN];
        word[..chunk.len()].copy_from_slice(chunk);
        words.push(u32::from_ne_bytes(word));
    }
    words
}

/// Encodes a complete response frame, as the firmware would emit it.
///
/// The payload is zero-padded to the next word boundary and the header
/// length covers header plus padded payload.
#[must_use]
pub fn encode_response(ty: CommandType, result: i32, payload: &[u8]) -> Bytes {
    let len = RSP_HDR_LEN + len32_aligned(payload.len());
    let mut buf = BytesMut::with_capacity(len);
    CommandHeader::new(ty, len).put(&mut buf);
    buf.put_i32_ne(result);
    buf.put_slice(payload);
    buf.put_bytes(0, len - buf.len());
    buf.freeze()
}
