//! Outbound request encoding.
//!
//! Every request is a fixed-size frame: a command header carrying the exact
//! frame size, the 802.11 group and the request type, followed by a payload
//! laid out in whole words. Byte fields are zero-padded to their slot.

use bytes::{BufMut, BytesMut};

use crate::error::FrameError;
use crate::protocol::command::{CommandType, OpMode, Port, RadioState, ScanMode, ScanOption};
use crate::protocol::frame::CommandHeader;
use crate::protocol::layout::{
    CONNECT_REQ_LEN, DISCONNECT_REQ_LEN, ETH_ALEN_ALIGNED, GET_SECURITY_MODE_REQ_LEN,
    HDR_ONLY_REQ_LEN, MAX_FRAME_LEN, MAX_PSK_LEN, MAX_SSID_LEN, ONE_WORD_REQ_LEN,
    SCAN_REQ_LEN, SET_PSK_REQ_LEN, TX_RAW_FIXED_LEN, len32_aligned,
};
use crate::types::{MacAddr, Psk, SecurityMode};

/// An outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<'a> {
    /// Read the MAC address of a port.
    GetMacAddr { port: Port },
    /// Read the hardware wireless mode.
    GetWirelessMode { port: Port },
    /// Set the hardware wireless mode.
    SetWirelessMode { port: Port, mode: u8 },
    /// Read the WiFi configuration blob.
    GetCfg,
    /// Ask the firmware to forward raw frames.
    RegisterRxHndlr,
    /// Stop forwarding raw frames.
    UnregisterRxHndlr,
    /// Read the radio state.
    GetRadioState,
    /// Switch the radio on or off.
    SetRadioState(RadioState),
    /// Set the operation mode.
    SetOpMode(OpMode),
    /// Read the RX filter.
    GetRxFilter,
    /// Set the RX filter bitmask.
    SetRxFilter(u32),
    /// Read the smart connection filter.
    GetSmartConnFilter,
    /// Enable or disable the smart connection filter.
    SetSmartConnFilter(bool),
    /// Read the listen interval.
    GetListenInterval,
    /// Set the listen interval.
    SetListenInterval(u32),
    /// Read the security mode of a port.
    GetSecurityMode { if_idx: u32, port: Port },
    /// Set the security mode of a port.
    SetSecurityMode { port: Port, mode: SecurityMode },
    /// Read the PSK of a port.
    GetPsk { port: Port },
    /// Set the PSK of a port.
    SetPsk { port: Port, psk: &'a Psk },
    /// Start a full, force-active scan, optionally for one SSID.
    Scan { if_idx: u32, ssid: Option<&'a [u8]> },
    /// Stop the running scan.
    ScanStop,
    /// Connect to a BSS. A zero channel lets the firmware pick.
    Connect {
        if_idx: u32,
        port: Port,
        bssid: Option<MacAddr>,
        ssid: &'a [u8],
        channel: u32,
    },
    /// Disconnect. An address selects the AP port, otherwise the station port.
    Disconnect { if_idx: u32, addr: Option<MacAddr> },
}

impl Request<'_> {
    /// Returns the command type of this request.
    #[must_use]
    pub const fn command_type(&self) -> CommandType {
        match self {
            Self::GetMacAddr { .. } => CommandType::MacAddrReq,
            Self::GetWirelessMode { .. } => CommandType::GetWirelessModeReq,
            Self::SetWirelessMode { .. } => CommandType::SetWirelessModeReq,
            Self::GetCfg => CommandType::GetCfgReq,
            Self::RegisterRxHndlr => CommandType::RegisterRxHndlrReq,
            Self::UnregisterRxHndlr => CommandType::UnregisterRxHndlrReq,
            Self::GetRadioState => CommandType::GetRadioStateReq,
            Self::SetRadioState(_) => CommandType::SetRadioStateReq,
            Self::SetOpMode(_) => CommandType::SetOpModeReq,
            Self::GetRxFilter => CommandType::GetRxFilterReq,
            Self::SetRxFilter(_) => CommandType::SetRxFilterReq,
            Self::GetSmartConnFilter => CommandType::GetSmartConnFilterReq,
            Self::SetSmartConnFilter(_) => CommandType::SetSmartConnFilterReq,
            Self::GetListenInterval => CommandType::GetListenIntervalReq,
            Self::SetListenInterval(_) => CommandType::SetListenIntervalReq,
            Self::GetSecurityMode { .. } => CommandType::GetSecurityModeReq,
            Self::SetSecurityMode { .. } => CommandType::SetSecurityModeReq,
            Self::GetPsk { .. } => CommandType::GetPskReq,
            Self::SetPsk { .. } => CommandType::SetPskReq,
            Self::Scan { .. } => CommandType::ScanReq,
            Self::ScanStop => CommandType::ScanStop,
            Self::Connect { .. } => CommandType::ConnectReq,
            Self::Disconnect { .. } => CommandType::DisconnectReq,
        }
    }

    /// Returns the exact frame size in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::GetCfg
            | Self::RegisterRxHndlr
            | Self::UnregisterRxHndlr
            | Self::GetRadioState
            | Self::GetRxFilter
            | Self::GetSmartConnFilter
            | Self::GetListenInterval
            | Self::ScanStop => HDR_ONLY_REQ_LEN,
            Self::GetMacAddr { .. }
            | Self::GetWirelessMode { .. }
            | Self::SetWirelessMode { .. }
            | Self::SetRadioState(_)
            | Self::SetOpMode(_)
            | Self::SetRxFilter(_)
            | Self::SetSmartConnFilter(_)
            | Self::SetListenInterval(_)
            | Self::SetSecurityMode { .. }
            | Self::GetPsk { .. } => ONE_WORD_REQ_LEN,
            Self::GetSecurityMode { .. } => GET_SECURITY_MODE_REQ_LEN,
            Self::SetPsk { .. } => SET_PSK_REQ_LEN,
            Self::Scan { .. } => SCAN_REQ_LEN,
            Self::Connect { .. } => CONNECT_REQ_LEN,
            Self::Disconnect { .. } => DISCONNECT_REQ_LEN,
        }
    }

    /// Always false; every request carries at least a header.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Encodes the request into `buf`.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::FieldTooLong` if an SSID or PSK exceeds its slot.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), FrameError> {
        let len = self.len();
        let start = buf.len();
        buf.reserve(len);
        CommandHeader::new(self.command_type(), len).put(buf);

        match self {
            Self::GetCfg
            | Self::RegisterRxHndlr
            | Self::UnregisterRxHndlr
            | Self::GetRadioState
            | Self::GetRxFilter
            | Self::GetSmartConnFilter
            | Self::GetListenInterval
            | Self::ScanStop => {}
            Self::GetMacAddr { port } | Self::GetWirelessMode { port } | Self::GetPsk { port } => {
                put_bytes_word(buf, &[*port as u8]);
            }
            Self::SetWirelessMode { port, mode } => put_bytes_word(buf, &[*port as u8, *mode]),
            Self::SetRadioState(state) => put_bytes_word(buf, &[*state as u8]),
            Self::SetOpMode(mode) => put_bytes_word(buf, &[*mode as u8]),
            Self::SetRxFilter(filter) => buf.put_u32_ne(*filter),
            Self::SetSmartConnFilter(enable) => put_bytes_word(buf, &[u8::from(*enable)]),
            Self::SetListenInterval(interval) => buf.put_u32_ne(*interval),
            Self::GetSecurityMode { if_idx, port } => {
                buf.put_u32_ne(*if_idx);
                put_bytes_word(buf, &[*port as u8]);
            }
            Self::SetSecurityMode { port, mode } => {
                put_bytes_word(buf, &[*port as u8, mode.auth_mode, mode.encrypt_type]);
            }
            Self::SetPsk { port, psk } => {
                put_bytes_word(buf, &[*port as u8]);
                buf.put_u32_ne(psk.len() as u32);
                put_padded(buf, "psk", psk.as_bytes(), MAX_PSK_LEN)?;
            }
            Self::Scan { if_idx, ssid } => {
                let ssid = ssid.unwrap_or_default();
                buf.put_u32_ne(*if_idx);
                put_bytes_word(buf, &[ScanMode::Full as u8, ScanOption::ForceActive as u8]);
                buf.put_u32_ne(ssid.len() as u32);
                put_padded(buf, "ssid", ssid, MAX_SSID_LEN)?;
            }
            Self::Connect {
                if_idx,
                port,
                bssid,
                ssid,
                channel,
            } => {
                buf.put_u32_ne(*if_idx);
                put_bytes_word(buf, &[*port as u8]);
                buf.put_u32_ne(*channel);
                put_addr(buf, bssid.as_ref());
                buf.put_u32_ne(ssid.len() as u32);
                put_padded(buf, "ssid", ssid, MAX_SSID_LEN)?;
            }
            Self::Disconnect { if_idx, addr } => {
                let port = if addr.is_some() { Port::Ap } else { Port::Sta };
                buf.put_u32_ne(*if_idx);
                put_bytes_word(buf, &[port as u8]);
                put_addr(buf, addr.as_ref());
            }
        }

        debug_assert_eq!(buf.len() - start, len);
        Ok(())
    }
}

/// Size of a raw TX frame carrying `data_len` bytes.
#[must_use]
pub const fn tx_raw_len(data_len: usize) -> usize {
    TX_RAW_FIXED_LEN + len32_aligned(data_len)
}

/// Encodes a raw TX frame into `buf`.
///
/// # Errors
///
/// Returns `FrameError::FieldTooLong` if `data` exceeds the maximum 802.11
/// frame size.
pub fn encode_tx_raw(buf: &mut BytesMut, data: &[u8]) -> Result<(), FrameError> {
    if data.len() > MAX_FRAME_LEN {
        return Err(FrameError::FieldTooLong {
            field: "tx raw",
            max: MAX_FRAME_LEN,
            actual: data.len(),
        });
    }
    let len = tx_raw_len(data.len());
    buf.reserve(len);
    CommandHeader::new(CommandType::TxRaw, len).put(buf);
    buf.put_u32_ne(data.len() as u32);
    buf.put_slice(data);
    buf.put_bytes(0, len32_aligned(data.len()) - data.len());
    Ok(())
}

/// Writes up to four bytes as one zero-padded word.
fn put_bytes_word(buf: &mut BytesMut, bytes: &[u8]) {
    let mut word = [0u8; 4];
    word[..bytes.len()].copy_from_slice(bytes);
    buf.put_slice(&word);
}

/// Writes an optional address into its aligned slot.
fn put_addr(buf: &mut BytesMut, addr: Option<&MacAddr>) {
    let mut slot = [0u8; ETH_ALEN_ALIGNED];
    if let Some(addr) = addr {
        slot[..addr.as_bytes().len()].copy_from_slice(addr.as_bytes());
    }
    buf.put_slice(&slot);
}

/// Writes `data` into a fixed slot of `width` bytes.
fn put_padded(
    buf: &mut BytesMut,
    field: &'static str,
    data: &[u8],
    width: usize,
) -> Result<(), FrameError> {
    if data.len() > width {
        return Err(FrameError::FieldTooLong {
            field,
            max: width,
            actual: data.len(),
        });
    }
    buf.put_slice(data);
    buf.put_bytes(0, width - data.len());
    Ok(())
}
