//! IEEE 802.11 helpers: bands, channel/frequency mapping and frame control.

/// Frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Band {
    /// 2.4GHz.
    #[default]
    TwoGhz = 0,
    /// 5GHz.
    FiveGhz = 1,
}

impl Band {
    /// Maps a channel number to its band by numeric range.
    ///
    /// Channels 1..=14 are 2.4GHz, 36..=165 are 5GHz; anything else is
    /// `None`.
    #[must_use]
    pub const fn for_channel(channel: u32) -> Option<Self> {
        match channel {
            1..=14 => Some(Self::TwoGhz),
            36..=165 => Some(Self::FiveGhz),
            _ => None,
        }
    }
}

/// A channel as resolved by the wireless stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Center frequency in MHz.
    pub center_freq: u32,
    /// Band.
    pub band: Band,
    /// Channel number.
    pub hw_value: u32,
}

impl Channel {
    /// Creates a channel from its number within `band`.
    #[must_use]
    pub const fn new(hw_value: u32, band: Band) -> Self {
        Self {
            center_freq: channel_to_frequency(hw_value, band),
            band,
            hw_value,
        }
    }
}

/// Converts a channel number to its center frequency in MHz.
#[must_use]
pub const fn channel_to_frequency(channel: u32, band: Band) -> u32 {
    match band {
        Band::TwoGhz if channel == 14 => 2484,
        Band::TwoGhz => 2407 + channel * 5,
        Band::FiveGhz => 5000 + channel * 5,
    }
}

/// Converts a center frequency in MHz to a channel number.
///
/// Returns 0 for frequencies outside the 2.4GHz and 5GHz bands.
#[must_use]
pub const fn frequency_to_channel(freq: u32) -> u32 {
    match freq {
        2484 => 14,
        2412..=2472 => (freq - 2407) / 5,
        5000..=5925 => (freq - 5000) / 5,
        _ => 0,
    }
}

/// Frame control field values.
pub mod fc {
    /// Type mask.
    pub const TYPE_MASK: u16 = 0x000C;
    /// Subtype mask.
    pub const SUBTYPE_MASK: u16 = 0x00F0;
    /// Management frame.
    pub const TYPE_MGMT: u16 = 0x0000;
    /// Beacon.
    pub const SUBTYPE_BEACON: u16 = 0x0080;
    /// Probe response.
    pub const SUBTYPE_PROBE_RESP: u16 = 0x0050;
}

/// Reads the frame control field of an 802.11 frame.
#[must_use]
pub fn frame_control(buf: &[u8]) -> u16 {
    if buf.len() >= 2 {
        u16::from_le_bytes([buf[0], buf[1]])
    } else {
        0
    }
}

/// Returns true for a management frame.
#[inline]
#[must_use]
pub const fn is_mgmt(fc: u16) -> bool {
    (fc & fc::TYPE_MASK) == fc::TYPE_MGMT
}

/// Returns true for a beacon.
#[inline]
#[must_use]
pub const fn is_beacon(fc: u16) -> bool {
    is_mgmt(fc) && (fc & fc::SUBTYPE_MASK) == fc::SUBTYPE_BEACON
}

/// Returns true for a probe response.
#[inline]
#[must_use]
pub const fn is_probe_resp(fc: u16) -> bool {
    is_mgmt(fc) && (fc & fc::SUBTYPE_MASK) == fc::SUBTYPE_PROBE_RESP
}

/// Status code reported with a connect result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// Association succeeded.
    Success = 0,
    /// Unspecified failure.
    UnspecifiedFailure = 1,
}
