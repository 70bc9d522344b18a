//! WiFi configuration reported by the firmware.

use crate::protocol::command::OpMode;
use crate::types::mac::MacAddr;

/// Station sub-config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaConfig {
    /// SSID, at most 32 bytes.
    pub ssid: Vec<u8>,
    /// BSSID to lock onto, if any.
    pub bssid: Option<MacAddr>,
    /// Passphrase, at most 64 bytes.
    pub passphrase: Vec<u8>,
}

/// Access point sub-config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApConfig {
    /// SSID, at most 32 bytes.
    pub ssid: Vec<u8>,
    /// Passphrase, at most 64 bytes.
    pub passphrase: Vec<u8>,
    /// Authentication mode.
    pub auth_mode: u8,
    /// Encryption type.
    pub encrypt_type: u8,
    /// Operating channel.
    pub channel: u8,
    /// Channel bandwidth.
    pub bandwidth: u8,
    /// Secondary channel offset for 40MHz operation.
    pub bandwidth_ext: u8,
}

/// Complete WiFi configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiConfig {
    /// Raw operation mode byte.
    pub opmode: u8,
    /// Station settings.
    pub sta: StaConfig,
    /// Access point settings.
    pub ap: ApConfig,
}

impl WifiConfig {
    /// Returns the decoded operation mode, if valid.
    #[must_use]
    pub const fn op_mode(&self) -> Option<OpMode> {
        OpMode::from_byte(self.opmode)
    }
}

/// Authentication and encryption of a port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityMode {
    /// Authentication mode.
    pub auth_mode: u8,
    /// Encryption type.
    pub encrypt_type: u8,
}

/// Renders an SSID for log output.
#[must_use]
pub fn ssid_lossy(ssid: &[u8]) -> String {
    String::from_utf8_lossy(ssid).into_owned()
}
