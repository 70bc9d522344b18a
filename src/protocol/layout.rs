//! Exact byte sizes of every WMI frame.
//!
//! All frames are a whole number of 32-bit words. Byte-granular fields
//! (addresses, SSIDs, passphrases) are padded up to the next word.

/// Size of a transport word in bytes.
pub const WORD_LEN: usize = 4;

/// Rounds a byte length up to the next word boundary.
#[must_use]
pub const fn len32_aligned(len: usize) -> usize {
    (len + WORD_LEN - 1) & !(WORD_LEN - 1)
}

/// Number of words needed to carry `len` bytes.
#[must_use]
pub const fn len_to_words(len: usize) -> usize {
    len.div_ceil(WORD_LEN)
}

/// Ethernet address length.
pub const ETH_ALEN: usize = 6;
/// Ethernet address as carried on the wire.
pub const ETH_ALEN_ALIGNED: usize = len32_aligned(ETH_ALEN);

/// Maximum SSID length.
pub const MAX_SSID_LEN: usize = 32;
/// Maximum passphrase length of a station or AP config.
pub const MAX_PASSPHRASE_LEN: usize = 64;
/// Maximum PSK length.
pub const MAX_PSK_LEN: usize = 64;
/// Maximum management frame body carried by a scan indication.
pub const MAX_DATA_LEN: usize = 2304;
/// Maximum raw 802.11 frame.
pub const MAX_FRAME_LEN: usize = 2352;

/// Command header: `len:u32`, `grp:u8`, pad, `type:u16`.
pub const CMD_HDR_LEN: usize = 8;
/// Response header: command header followed by `result:i32`.
pub const RSP_HDR_LEN: usize = CMD_HDR_LEN + 4;

// Responses.

/// MAC address response.
pub const MAC_ADDR_RSP_LEN: usize = RSP_HDR_LEN + ETH_ALEN_ALIGNED;
/// PSK response: `len:u32` then the PSK bytes.
pub const GET_PSK_RSP_LEN: usize = RSP_HDR_LEN + 4 + MAX_PSK_LEN;
/// Any response carrying one value word.
pub const U32_RSP_LEN: usize = RSP_HDR_LEN + 4;
/// Security mode response: `auth_mode:u8`, `encrypt_type:u8`, pad.
pub const GET_SECURITY_MODE_RSP_LEN: usize = RSP_HDR_LEN + 4;
/// Scan response and scan complete indication: `if_idx:u32`.
pub const SCAN_RSP_LEN: usize = RSP_HDR_LEN + 4;
/// Fixed part of a scan indication: `rssi:i32`, `channel:u32`.
pub const SCAN_IND_FIXED_LEN: usize = RSP_HDR_LEN + 8;
/// Connect response: `if_idx:u32`, BSSID.
pub const CONNECT_RSP_LEN: usize = RSP_HDR_LEN + 4 + ETH_ALEN_ALIGNED;
/// Connect indication: `if_idx:u32`, `channel:u32`, BSSID.
pub const CONNECT_IND_LEN: usize = RSP_HDR_LEN + 8 + ETH_ALEN_ALIGNED;
/// Disconnect indication: `if_idx:u32`, BSSID.
pub const DISCONNECT_IND_LEN: usize = RSP_HDR_LEN + 4 + ETH_ALEN_ALIGNED;

// WiFi configuration blob.

/// Station sub-config size.
pub const STA_CONFIG_LEN: usize = 108;
/// Access point sub-config size.
pub const AP_CONFIG_LEN: usize = 104;
/// Offset of the station sub-config.
pub const STA_CONFIG_OFFSET: usize = 4;
/// Offset of the access point sub-config.
pub const AP_CONFIG_OFFSET: usize = STA_CONFIG_OFFSET + STA_CONFIG_LEN;
/// Whole configuration blob.
pub const WIFI_CONFIG_LEN: usize = AP_CONFIG_OFFSET + AP_CONFIG_LEN;
/// Configuration response.
pub const GET_CFG_RSP_LEN: usize = RSP_HDR_LEN + len32_aligned(WIFI_CONFIG_LEN);

// Requests.

/// Requests that carry only the command header.
pub const HDR_ONLY_REQ_LEN: usize = CMD_HDR_LEN;
/// Requests that carry one word (port, mode, state, filter, interval).
pub const ONE_WORD_REQ_LEN: usize = CMD_HDR_LEN + 4;
/// Set PSK: `port:u8` pad, `len:u32`, PSK bytes.
pub const SET_PSK_REQ_LEN: usize = CMD_HDR_LEN + 8 + MAX_PSK_LEN;
/// Get security mode: `if_idx:u32`, `port:u8` pad.
pub const GET_SECURITY_MODE_REQ_LEN: usize = CMD_HDR_LEN + 8;
/// Scan: `if_idx:u32`, `mode:u8 option:u8` pad, `ssid_len:u32`, SSID.
pub const SCAN_REQ_LEN: usize = CMD_HDR_LEN + 12 + MAX_SSID_LEN;
/// Connect: `if_idx:u32`, `port:u8` pad, `channel:u32`, BSSID, `ssid_len:u32`, SSID.
pub const CONNECT_REQ_LEN: usize = CMD_HDR_LEN + 12 + ETH_ALEN_ALIGNED + 4 + MAX_SSID_LEN;
/// Disconnect: `if_idx:u32`, `port:u8` pad, address.
pub const DISCONNECT_REQ_LEN: usize = CMD_HDR_LEN + 8 + ETH_ALEN_ALIGNED;
/// Fixed part of a raw TX request: `len:u32`.
pub const TX_RAW_FIXED_LEN: usize = CMD_HDR_LEN + 4;
