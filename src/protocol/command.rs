//! Command groups and types for the WMI protocol.
//!
//! Every frame carries a group byte and a 16-bit type. Only the 802.11
//! group is handled by this crate; requests and their responses share the
//! type space.

/// Command group of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandGroup {
    /// Queue management, owned by the transport.
    Queue = 0x00,
    /// 802.11 management and data path.
    Ieee80211 = 0x01,
}

impl From<CommandGroup> for u8 {
    fn from(grp: CommandGroup) -> Self {
        grp as Self
    }
}

/// Command types of the 802.11 group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CommandType {
    /// Request the MAC address of a port.
    MacAddrReq = 0x00,
    /// MAC address of a port.
    MacAddrRsp = 0x01,
    /// Request the hardware wireless mode.
    GetWirelessModeReq = 0x02,
    /// Hardware wireless mode.
    GetWirelessModeRsp = 0x03,
    /// Set the hardware wireless mode.
    SetWirelessModeReq = 0x04,
    /// Wireless mode set.
    SetWirelessModeRsp = 0x05,
    /// Request the WiFi configuration blob.
    GetCfgReq = 0x06,
    /// WiFi configuration blob.
    GetCfgRsp = 0x07,
    /// Register the raw RX handler.
    RegisterRxHndlrReq = 0x08,
    /// Raw RX handler registered.
    RegisterRxHndlrRsp = 0x09,
    /// Unregister the raw RX handler.
    UnregisterRxHndlrReq = 0x0A,
    /// Raw RX handler unregistered.
    UnregisterRxHndlrRsp = 0x0B,
    /// Request the radio state.
    GetRadioStateReq = 0x0C,
    /// Radio state.
    GetRadioStateRsp = 0x0D,
    /// Set the radio state.
    SetRadioStateReq = 0x0E,
    /// Radio state set.
    SetRadioStateRsp = 0x0F,
    /// Set the operation mode.
    SetOpModeReq = 0x10,
    /// Operation mode set.
    SetOpModeRsp = 0x11,
    /// Request the RX filter.
    GetRxFilterReq = 0x12,
    /// RX filter bitmask.
    GetRxFilterRsp = 0x13,
    /// Set the RX filter.
    SetRxFilterReq = 0x14,
    /// RX filter set.
    SetRxFilterRsp = 0x15,
    /// Request the smart connection filter.
    GetSmartConnFilterReq = 0x16,
    /// Smart connection filter flag.
    GetSmartConnFilterRsp = 0x17,
    /// Set the smart connection filter.
    SetSmartConnFilterReq = 0x18,
    /// Smart connection filter set.
    SetSmartConnFilterRsp = 0x19,
    /// Request the listen interval.
    GetListenIntervalReq = 0x1A,
    /// Listen interval.
    GetListenIntervalRsp = 0x1B,
    /// Set the listen interval.
    SetListenIntervalReq = 0x1C,
    /// Listen interval set.
    SetListenIntervalRsp = 0x1D,
    /// Request the security mode of a port.
    GetSecurityModeReq = 0x1E,
    /// Security mode of a port.
    GetSecurityModeRsp = 0x1F,
    /// Set the security mode of a port.
    SetSecurityModeReq = 0x20,
    /// Security mode set.
    SetSecurityModeRsp = 0x21,
    /// Request the PSK of a port.
    GetPskReq = 0x22,
    /// PSK of a port.
    GetPskRsp = 0x23,
    /// Set the PSK of a port.
    SetPskReq = 0x24,
    /// PSK set.
    SetPskRsp = 0x25,
    /// Start a scan.
    ScanReq = 0x26,
    /// Scan accepted or rejected.
    ScanRsp = 0x27,
    /// One BSS found during a scan.
    ScanInd = 0x28,
    /// Scan finished.
    ScanCompleteInd = 0x29,
    /// Stop a scan.
    ScanStop = 0x2A,
    /// Scan stopped.
    ScanStopRsp = 0x2B,
    /// Connect to a BSS.
    ConnectReq = 0x2C,
    /// Connect accepted or rejected.
    ConnectRsp = 0x2D,
    /// Association completed.
    ConnectInd = 0x2E,
    /// Disconnect from a BSS or station.
    DisconnectReq = 0x2F,
    /// Disconnect accepted.
    DisconnectRsp = 0x30,
    /// Link lost or peer disconnected.
    DisconnectInd = 0x31,
    /// Raw 802.11 frame from the host.
    TxRaw = 0x32,
    /// Raw 802.11 frame from the firmware.
    RxRaw = 0x33,
}

impl CommandType {
    pub(crate) const ALL: [Self; 52] = [
        Self::MacAddrReq,
        Self::MacAddrRsp,
        Self::GetWirelessModeReq,
        Self::GetWirelessModeRsp,
        Self::SetWirelessModeReq,
        Self::SetWirelessModeRsp,
        Self::GetCfgReq,
        Self::GetCfgRsp,
        Self::RegisterRxHndlrReq,
        Self::RegisterRxHndlrRsp,
        Self::UnregisterRxHndlrReq,
        Self::UnregisterRxHndlrRsp,
        Self::GetRadioStateReq,
        Self::GetRadioStateRsp,
        Self::SetRadioStateReq,
        Self::SetRadioStateRsp,
        Self::SetOpModeReq,
        Self::SetOpModeRsp,
        Self::GetRxFilterReq,
        Self::GetRxFilterRsp,
        Self::SetRxFilterReq,
        Self::SetRxFilterRsp,
        Self::GetSmartConnFilterReq,
        Self::GetSmartConnFilterRsp,
        Self::SetSmartConnFilterReq,
        Self::SetSmartConnFilterRsp,
        Self::GetListenIntervalReq,
        Self::GetListenIntervalRsp,
        Self::SetListenIntervalReq,
        Self::SetListenIntervalRsp,
        Self::GetSecurityModeReq,
        Self::GetSecurityModeRsp,
        Self::SetSecurityModeReq,
        Self::SetSecurityModeRsp,
        Self::GetPskReq,
        Self::GetPskRsp,
        Self::SetPskReq,
        Self::SetPskRsp,
        Self::ScanReq,
        Self::ScanRsp,
        Self::ScanInd,
        Self::ScanCompleteInd,
        Self::ScanStop,
        Self::ScanStopRsp,
        Self::ConnectReq,
        Self::ConnectRsp,
        Self::ConnectInd,
        Self::DisconnectReq,
        Self::DisconnectRsp,
        Self::DisconnectInd,
        Self::TxRaw,
        Self::RxRaw,
    ];

    /// Looks up a command type from its wire value.
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| *ty as u16 == value)
    }
}

impl From<CommandType> for u16 {
    fn from(ty: CommandType) -> Self {
        ty as Self
    }
}

/// Firmware port a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Port {
    /// Station port.
    Sta = 0,
    /// Access point port.
    Ap = 1,
}

/// Firmware operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpMode {
    /// Station only.
    StaOnly = 1,
    /// Access point only.
    ApOnly = 2,
    /// Station and access point.
    Repeater = 3,
    /// Monitor.
    Monitor = 4,
}

impl OpMode {
    /// Parses an operation mode byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::StaOnly),
            2 => Some(Self::ApOnly),
            3 => Some(Self::Repeater),
            4 => Some(Self::Monitor),
            _ => None,
        }
    }
}

/// Scan mode of a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScanMode {
    /// Scan every supported channel.
    Full = 0,
    /// Scan the channels in the channel list.
    Partial = 1,
}

/// Scan option of a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScanOption {
    /// Active scan, passive on DFS channels.
    Active = 0,
    /// Passive scan.
    Passive = 1,
    /// Active scan on every channel.
    ForceActive = 2,
}

/// Radio on/off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RadioState {
    /// Radio off.
    #[default]
    Off = 0,
    /// Radio on.
    On = 1,
}

impl RadioState {
    /// Interprets the firmware's state word; anything nonzero is on.
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        if value == 0 { Self::Off } else { Self::On }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_type_values() {
        assert_eq!(CommandType::MacAddrReq as u16, 0x00);
        assert_eq!(CommandType::GetCfgRsp as u16, 0x07);
        assert_eq!(CommandType::ScanInd as u16, 0x28);
        assert_eq!(CommandType::RxRaw as u16, 0x33);
    }

    #[test]
    fn test_command_type_lookup() {
        for ty in CommandType::ALL {
            assert_eq!(CommandType::from_u16(ty.into()), Some(ty));
        }
        assert_eq!(CommandType::from_u16(0x34), None);
        assert_eq!(CommandType::from_u16(0xFFFF), None);
    }

    #[test]
    fn test_op_mode_from_byte() {
        assert_eq!(OpMode::from_byte(3), Some(OpMode::Repeater));
        assert_eq!(OpMode::from_byte(0), None);
    }

    #[test]
    fn test_radio_state_from_word() {
        assert_eq!(RadioState::from_u32(0), RadioState::Off);
        assert_eq!(RadioState::from_u32(7), RadioState::On);
    }
}
