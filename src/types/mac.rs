//! Hardware addresses and keys.

use crate::error::{Error, Result};
use crate::protocol::layout::{ETH_ALEN, MAX_PSK_LEN};

/// A 6-byte IEEE 802 hardware address.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MacAddr([u8; ETH_ALEN]);

impl MacAddr {
    /// The broadcast address.
    pub const BROADCAST: Self = Self([0xFF; ETH_ALEN]);

    /// Creates an address from its six bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ETH_ALEN]) -> Self {
        Self(bytes)
    }

    /// Returns the address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ETH_ALEN] {
        &self.0
    }

    /// Returns the address as a plain hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MacAddr({self})")
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self.to_hex();
        for (i, octet) in hex.as_bytes().chunks(2).enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(std::str::from_utf8(octet).map_err(|_| std::fmt::Error)?)?;
        }
        Ok(())
    }
}

impl From<[u8; ETH_ALEN]> for MacAddr {
    fn from(bytes: [u8; ETH_ALEN]) -> Self {
        Self(bytes)
    }
}

/// A pre-shared key, at most 64 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Psk {
    bytes: [u8; MAX_PSK_LEN],
    len: usize,
}

impl Psk {
    /// Creates a PSK from its bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Bounds` if `key` is longer than 64 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() > MAX_PSK_LEN {
            return Err(Error::Bounds {
                field: "psk",
                max: MAX_PSK_LEN,
                actual: key.len(),
            });
        }
        let mut bytes = [0u8; MAX_PSK_LEN];
        bytes[..key.len()].copy_from_slice(key);
        Ok(Self {
            bytes,
            len: key.len(),
        })
    }

    /// Returns the key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Returns the key length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Psk {
    fn default() -> Self {
        Self {
            bytes: [0; MAX_PSK_LEN],
            len: 0,
        }
    }
}

impl std::fmt::Debug for Psk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Psk(len={})", self.len)
    }
}
