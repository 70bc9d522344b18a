//! Event dispatch for inbound firmware frames.
//!
//! Every frame the firmware pushes onto the receive queue is a response to
//! an earlier request or an unsolicited indication. Once its header has been
//! read, [`EventDispatcher::dispatch`] classifies it into a [`Response`] and
//! hands it to the matching handler, which validates the declared length,
//! pulls the payload off the queue and updates the driver state.

mod handlers;

use tracing::{error, trace};

use crate::cfg80211::Cfg80211;
use crate::client::WmiConfig;
use crate::commands::CommandHandler;
use crate::context::DriverContext;
use crate::error::{Error, FrameError, Result};
use crate::protocol::{CommandGroup, CommandType, ResponseHeader};
use crate::transport::Transport;

/// Inbound message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    /// MAC address of a port.
    MacAddrRsp,
    /// Hardware wireless mode.
    GetWirelessModeRsp,
    /// WiFi configuration blob.
    GetCfgRsp,
    /// Radio state.
    GetRadioStateRsp,
    /// RX filter.
    GetRxFilterRsp,
    /// Smart connection filter.
    GetSmartConnFilterRsp,
    /// Listen interval.
    GetListenIntervalRsp,
    /// Security mode of a port.
    GetSecurityModeRsp,
    /// PSK of a port.
    GetPskRsp,
    /// Raw RX handler registered.
    RegisterRxHndlrRsp,
    /// Raw RX handler unregistered.
    UnregisterRxHndlrRsp,
    /// Scan accepted or rejected.
    ScanRsp,
    /// One BSS found.
    ScanInd,
    /// Scan finished.
    ScanCompleteInd,
    /// Connect accepted or rejected.
    ConnectRsp,
    /// Association completed.
    ConnectInd,
    /// Disconnect accepted.
    DisconnectRsp,
    /// Association lost.
    DisconnectInd,
    /// Raw 802.11 frame.
    RxRaw,
    /// Header-only acknowledgement of a set request.
    Ack(CommandType),
}

impl Response {
    /// Classifies a command type. Request types have no response kind.
    #[must_use]
    pub const fn from_command(ty: CommandType) -> Option<Self> {
        let response = match ty {
            CommandType::MacAddrRsp => Self::MacAddrRsp,
            CommandType::GetWirelessModeRsp => Self::GetWirelessModeRsp,
            CommandType::GetCfgRsp => Self::GetCfgRsp,
            CommandType::GetRadioStateRsp => Self::GetRadioStateRsp,
            CommandType::GetRxFilterRsp => Self::GetRxFilterRsp,
            CommandType::GetSmartConnFilterRsp => Self::GetSmartConnFilterRsp,
            CommandType::GetListenIntervalRsp => Self::GetListenIntervalRsp,
            CommandType::GetSecurityModeRsp => Self::GetSecurityModeRsp,
            CommandType::GetPskRsp => Self::GetPskRsp,
            CommandType::RegisterRxHndlrRsp => Self::RegisterRxHndlrRsp,
            CommandType::UnregisterRxHndlrRsp => Self::UnregisterRxHndlrRsp,
            CommandType::ScanRsp => Self::ScanRsp,
            CommandType::ScanInd => Self::ScanInd,
            CommandType::ScanCompleteInd => Self::ScanCompleteInd,
            CommandType::ConnectRsp => Self::ConnectRsp,
            CommandType::ConnectInd => Self::ConnectInd,
            CommandType::DisconnectRsp => Self::DisconnectRsp,
            CommandType::DisconnectInd => Self::DisconnectInd,
            CommandType::RxRaw => Self::RxRaw,
            CommandType::SetWirelessModeRsp
            | CommandType::SetRadioStateRsp
            | CommandType::SetOpModeRsp
            | CommandType::SetRxFilterRsp
            | CommandType::SetSmartConnFilterRsp
            | CommandType::SetListenIntervalRsp
            | CommandType::SetSecurityModeRsp
            | CommandType::SetPskRsp
            | CommandType::ScanStopRsp => Self::Ack(ty),
            CommandType::MacAddrReq
            | CommandType::GetWirelessModeReq
            | CommandType::SetWirelessModeReq
            | CommandType::GetCfgReq
            | CommandType::RegisterRxHndlrReq
            | CommandType::UnregisterRxHndlrReq
            | CommandType::GetRadioStateReq
            | CommandType::SetRadioStateReq
            | CommandType::SetOpModeReq
            | CommandType::GetRxFilterReq
            | CommandType::SetRxFilterReq
            | CommandType::GetSmartConnFilterReq
            | CommandType::SetSmartConnFilterReq
            | CommandType::GetListenIntervalReq
            | CommandType::SetListenIntervalReq
            | CommandType::GetSecurityModeReq
            | CommandType::SetSecurityModeReq
            | CommandType::GetPskReq
            | CommandType::SetPskReq
            | CommandType::ScanReq
            | CommandType::ScanStop
            | CommandType::ConnectReq
            | CommandType::DisconnectReq
            | CommandType::TxRaw => return None,
        };
        Some(response)
    }
}

/// Routes validated frames to their handlers.
pub struct EventDispatcher<'a, T: Transport, C: Cfg80211> {
    transport: &'a T,
    commands: &'a CommandHandler<T>,
    cfg80211: &'a C,
    config: &'a WmiConfig,
}

impl<'a, T: Transport, C: Cfg80211> EventDispatcher<'a, T, C> {
    /// Creates a dispatcher reading payloads from `config.rx_queue`.
    pub const fn new(
        transport: &'a T,
        commands: &'a CommandHandler<T>,
        cfg80211: &'a C,
        config: &'a WmiConfig,
    ) -> Self {
        Self {
            transport,
            commands,
            cfg80211,
            config,
        }
    }

    /// Processes one frame whose header has already been read.
    ///
    /// On error the frame's payload may be left unread on the queue; the
    /// caller decides whether to resynchronize.
    pub fn dispatch(&self, ctx: &mut DriverContext, rsp: &ResponseHeader) -> Result<()> {
        if rsp.cmd.grp != u8::from(CommandGroup::Ieee80211) {
            error!(grp = rsp.cmd.grp, "unsupported cmd group");
            return Err(FrameError::UnknownGroup(rsp.cmd.grp).into());
        }

        let Some(response) = rsp.command_type().and_then(Response::from_command) else {
            error!(ty = rsp.cmd.ty, "unsupported cmd");
            return Err(Error::UnsupportedCommand(rsp.cmd.ty));
        };
        trace!(?response, len = rsp.cmd.len, result = rsp.result, "dispatch");

        let ret = match response {
            Response::MacAddrRsp => self.mac_addr_rsp(ctx, rsp),
            Response::GetWirelessModeRsp => self.get_wireless_mode_rsp(ctx, rsp),
            Response::GetCfgRsp => self.get_cfg_rsp(ctx, rsp),
            Response::GetRadioStateRsp => self.get_radio_state_rsp(ctx, rsp),
            Response::GetRxFilterRsp => self.get_rx_filter_rsp(ctx, rsp),
            Response::GetSmartConnFilterRsp => self.get_smart_conn_filter_rsp(ctx, rsp),
            Response::GetListenIntervalRsp => self.get_listen_interval_rsp(ctx, rsp),
            Response::GetSecurityModeRsp => self.get_security_mode_rsp(ctx, rsp),
            Response::GetPskRsp => self.get_psk_rsp(ctx, rsp),
            Response::RegisterRxHndlrRsp => Self::register_rx_hndlr_rsp(ctx, rsp),
            Response::UnregisterRxHndlrRsp => Self::unregister_rx_hndlr_rsp(ctx, rsp),
            Response::ScanRsp => self.scan_rsp(rsp),
            Response::ScanInd => self.scan_ind(ctx, rsp),
            Response::ScanCompleteInd => self.scan_complete_ind(rsp),
            Response::ConnectRsp => self.connect_rsp(rsp),
            Response::ConnectInd => self.connect_ind(rsp),
            Response::DisconnectRsp => self.disconnect_rsp(ctx, rsp),
            Response::DisconnectInd => self.disconnect_ind(rsp),
            Response::RxRaw => self.rx_raw(ctx, rsp),
            Response::Ack(cmd) => Self::ack(rsp, cmd),
        };

        if let Err(e) = &ret {
            error!(?response, errno = e.errno(), "{e}");
        }
        ret
    }
}
