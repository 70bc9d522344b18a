//! Request builders for WMI operations.
//!
//! Every request is written to the transmit queue in one transfer. A write
//! succeeds only if the transport moves exactly the requested number of
//! words; the matching response arrives later on the receive queue and is
//! handled by [`crate::event`].

use std::sync::{Arc, Mutex, PoisonError};

use bytes::BytesMut;
use tracing::{debug, error, trace};

use crate::error::{Error, Result};
use crate::protocol::frame::unpack_words;
use crate::protocol::layout::MAX_FRAME_LEN;
use crate::protocol::{
    OpMode, Port, RadioState, Request, encode_tx_raw, len_to_words, tx_raw_len,
};
use crate::transport::{QueueHandle, Transport};
use crate::types::{MacAddr, Psk, SecurityMode, frequency_to_channel};

/// Command handler for WMI requests.
pub struct CommandHandler<T> {
    transport: Arc<T>,
    tx_queue: QueueHandle,
    tx_buf: Mutex<BytesMut>,
}

impl<T: Transport> CommandHandler<T> {
    /// Creates a command handler writing to `tx_queue`.
    #[must_use]
    pub fn new(transport: Arc<T>, tx_queue: QueueHandle) -> Self {
        Self {
            transport,
            tx_queue,
            tx_buf: Mutex::new(BytesMut::with_capacity(tx_raw_len(MAX_FRAME_LEN))),
        }
    }

    /// Encodes and writes a request.
    pub fn send(&self, req: &Request<'_>) -> Result<()> {
        let mut buf = BytesMut::with_capacity(req.len());
        req.encode(&mut buf)?;

        let words = unpack_words(&buf);
        debug!(cmd = ?req.command_type(), len = buf.len(), "<-- write");
        self.transport.write_all(self.tx_queue, &words)
    }

    /// Requests the MAC address of a port.
    pub fn get_mac_addr(&self, port: Port) -> Result<()> {
        self.send(&Request::GetMacAddr { port })
    }

    /// Requests the hardware wireless mode.
    pub fn get_wireless_mode(&self, port: Port) -> Result<()> {
        self.send(&Request::GetWirelessMode { port })
    }

    /// Sets the hardware wireless mode.
    pub fn set_wireless_mode(&self, port: Port, mode: u8) -> Result<()> {
        self.send(&Request::SetWirelessMode { port, mode })
    }

    /// Requests the PSK of a port.
    pub fn get_psk(&self, port: Port) -> Result<()> {
        self.send(&Request::GetPsk { port })
    }

    /// Sets the PSK of a port.
    pub fn set_psk(&self, port: Port, psk: &Psk) -> Result<()> {
        self.send(&Request::SetPsk { port, psk })
    }

    /// Sets the operation mode.
    pub fn set_op_mode(&self, mode: OpMode) -> Result<()> {
        self.send(&Request::SetOpMode(mode))
    }

    /// Requests the WiFi configuration.
    pub fn get_cfg(&self) -> Result<()> {
        self.send(&Request::GetCfg)
    }

    /// Asks the firmware to forward raw frames.
    pub fn register_rx_handler(&self) -> Result<()> {
        self.send(&Request::RegisterRxHndlr)
    }

    /// Stops raw frame forwarding.
    pub fn unregister_rx_handler(&self) -> Result<()> {
        self.send(&Request::UnregisterRxHndlr)
    }

    /// Requests the radio state.
    pub fn get_radio_state(&self) -> Result<()> {
        self.send(&Request::GetRadioState)
    }

    /// Switches the radio on or off.
    pub fn set_radio_state(&self, state: RadioState) -> Result<()> {
        self.send(&Request::SetRadioState(state))
    }

    /// Requests the RX filter.
    pub fn get_rx_filter(&self) -> Result<()> {
        self.send(&Request::GetRxFilter)
    }

    /// Sets the RX filter bitmask.
    pub fn set_rx_filter(&self, filter: u32) -> Result<()> {
        self.send(&Request::SetRxFilter(filter))
    }

    /// Requests the smart connection filter.
    pub fn get_smart_conn_filter(&self) -> Result<()> {
        self.send(&Request::GetSmartConnFilter)
    }

    /// Enables or disables the smart connection filter.
    pub fn set_smart_conn_filter(&self, enable: bool) -> Result<()> {
        self.send(&Request::SetSmartConnFilter(enable))
    }

    /// Requests the listen interval.
    pub fn get_listen_interval(&self) -> Result<()> {
        self.send(&Request::GetListenInterval)
    }

    /// Sets the listen interval.
    pub fn set_listen_interval(&self, interval: u32) -> Result<()> {
        self.send(&Request::SetListenInterval(interval))
    }

    /// Requests the security mode of a port.
    pub fn get_security_mode(&self, if_idx: u32, port: Port) -> Result<()> {
        self.send(&Request::GetSecurityMode { if_idx, port })
    }

    /// Sets the security mode of a port.
    pub fn set_security_mode(&self, port: Port, mode: SecurityMode) -> Result<()> {
        self.send(&Request::SetSecurityMode { port, mode })
    }

    /// Starts a full scan, optionally probing for one SSID.
    pub fn scan(&self, if_idx: u32, ssid: Option<&[u8]>) -> Result<()> {
        self.send(&Request::Scan { if_idx, ssid })
    }

    /// Stops the running scan.
    pub fn scan_stop(&self) -> Result<()> {
        self.send(&Request::ScanStop)
    }

    /// Connects to a BSS.
    ///
    /// `freq` is the center frequency in MHz; zero lets the firmware pick
    /// the channel.
    pub fn connect(
        &self,
        port: Port,
        if_idx: u32,
        bssid: Option<MacAddr>,
        ssid: &[u8],
        freq: u32,
    ) -> Result<()> {
        if ssid.is_empty() {
            error!(if_idx, "connect without ssid");
            return Err(Error::InvalidArgument("empty ssid".into()));
        }
        let channel = if freq == 0 {
            0
        } else {
            frequency_to_channel(freq)
        };
        self.send(&Request::Connect {
            if_idx,
            port,
            bssid,
            ssid,
            channel,
        })
    }

    /// Disconnects. An address targets a station on the AP port, otherwise
    /// the station port is disconnected.
    pub fn disconnect(&self, if_idx: u32, addr: Option<MacAddr>) -> Result<()> {
        self.send(&Request::Disconnect { if_idx, addr })
    }

    /// Transmits a raw 802.11 frame through the shared staging buffer.
    pub fn tx_raw(&self, data: &[u8]) -> Result<()> {
        let mut buf = self.tx_buf.lock().unwrap_or_else(PoisonError::into_inner);
        buf.clear();
        encode_tx_raw(&mut buf, data)?;

        let words = unpack_words(&buf);
        trace!(len = data.len(), words = len_to_words(buf.len()), "<-- tx raw");
        self.transport.write_all(self.tx_queue, &words)
    }
}
