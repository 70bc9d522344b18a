//! Per-command handlers.
//!
//! Each handler checks the declared frame length before touching the queue,
//! reads the payload word by word and commits to the driver state only once
//! every read has succeeded.

use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::cfg80211::Cfg80211;
use crate::context::DriverContext;
use crate::error::{Error, FrameError, Result};
use crate::event::EventDispatcher;
use crate::interface::{SmeState, Vif};
use crate::protocol::frame::pack_words;
use crate::protocol::layout::{
    CONNECT_IND_LEN, CONNECT_RSP_LEN, DISCONNECT_IND_LEN, ETH_ALEN_ALIGNED, GET_CFG_RSP_LEN,
    GET_PSK_RSP_LEN, GET_SECURITY_MODE_RSP_LEN, MAC_ADDR_RSP_LEN, MAX_DATA_LEN, MAX_FRAME_LEN,
    MAX_PSK_LEN, RSP_HDR_LEN, SCAN_IND_FIXED_LEN, SCAN_RSP_LEN, U32_RSP_LEN, WIFI_CONFIG_LEN,
    len32_aligned, len_to_words,
};
use crate::protocol::{
    CommandType, RadioState, ResponseHeader, parse_security_mode, parse_wifi_config,
};
use crate::transport::Transport;
use crate::types::config::ssid_lossy;
use crate::types::ieee80211::{frame_control, is_beacon, is_probe_resp};
use crate::types::{Band, MacAddr, Psk, StatusCode, channel_to_frequency};

const ADDR_WORDS: usize = ETH_ALEN_ALIGNED / 4;

/// Rejects a frame whose declared length is not exactly `expected`.
fn expect_len(rsp: &ResponseHeader, cmd: CommandType, expected: usize) -> Result<()> {
    if rsp.cmd.len as usize != expected {
        error!(?cmd, expected, actual = rsp.cmd.len, "invalid rsp len");
        return Err(FrameError::LengthMismatch {
            cmd,
            expected: expected as u32,
            actual: rsp.cmd.len,
        }
        .into());
    }
    Ok(())
}

/// Validates a variable-size frame carrying `result` payload bytes after
/// `fixed` bytes, returning the payload length.
fn expect_var_len(
    rsp: &ResponseHeader,
    cmd: CommandType,
    fixed: usize,
    min: usize,
    max: usize,
) -> Result<usize> {
    if rsp.cmd.len as usize <= fixed {
        error!(?cmd, min = fixed, actual = rsp.cmd.len, "invalid rsp len");
        return Err(FrameError::TooShort {
            cmd,
            min: fixed as u32,
            actual: rsp.cmd.len,
        }
        .into());
    }

    let data_len = usize::try_from(rsp.result).unwrap_or(0);
    if data_len < min || data_len > max {
        error!(?cmd, max, actual = rsp.result, "invalid data len");
        return Err(Error::Bounds {
            field: "data",
            max,
            actual: data_len,
        });
    }

    expect_len(rsp, cmd, fixed + len32_aligned(data_len))?;
    Ok(data_len)
}

fn mac_from_words(words: &[u32; ADDR_WORDS]) -> MacAddr {
    let [a, b, c, d] = words[0].to_ne_bytes();
    let [e, f, _, _] = words[1].to_ne_bytes();
    MacAddr::new([a, b, c, d, e, f])
}

impl<T: Transport, C: Cfg80211> EventDispatcher<'_, T, C> {
    fn read_words(&self, buf: &mut [u32]) -> Result<()> {
        self.transport.read_exact(self.config.rx_queue, buf)
    }

    fn read_u32(&self) -> Result<u32> {
        let mut word = [0u32; 1];
        self.read_words(&mut word)?;
        Ok(word[0])
    }

    fn read_addr(&self) -> Result<MacAddr> {
        let mut words = [0u32; ADDR_WORDS];
        self.read_words(&mut words)?;
        Ok(mac_from_words(&words))
    }

    fn lookup_vif(&self, if_idx: u32) -> Result<Arc<Vif>> {
        self.cfg80211.vif_by_index(if_idx).ok_or_else(|| {
            error!(if_idx, "vif_by_index() failed");
            Error::InterfaceNotFound(if_idx)
        })
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn mac_addr_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::MacAddrRsp, MAC_ADDR_RSP_LEN)?;

        let mac = self.read_addr()?;
        debug!(%mac, "--> MAC ADDR RSP");
        ctx.mac_addr = mac;

        if ctx.default_vif.is_none() {
            let vif = ctx.with_rtnl_lock(|| {
                self.cfg80211.interface_add(
                    &self.config.ifname,
                    self.config.iftype,
                    self.config.if_flags,
                )
            });
            let Some(vif) = vif else {
                error!(name = %self.config.ifname, "interface_add() failed");
                return Err(Error::OutOfMemory("interface_add"));
            };
            debug!(vif = vif.fw_vif_idx(), "interface added");
            ctx.default_vif = Some(vif);
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_wireless_mode_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetWirelessModeRsp, U32_RSP_LEN)?;

        let mode = self.read_u32()?;
        debug!(mode, "--> GET WIRELESS MODE RSP");
        ctx.hw_wireless_mode = mode;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_cfg_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetCfgRsp, GET_CFG_RSP_LEN)?;

        let mut scratch = vec![0u32; len_to_words(WIFI_CONFIG_LEN)];
        self.read_words(&mut scratch)?;
        let blob = pack_words(&scratch);

        let config = parse_wifi_config(&blob).inspect_err(|e| error!("{e}"))?;
        debug!(
            opmode = config.opmode,
            sta_ssid = %ssid_lossy(&config.sta.ssid),
            ap_ssid = %ssid_lossy(&config.ap.ssid),
            ap_channel = config.ap.channel,
            "--> GET CFG RSP"
        );
        ctx.wifi_config = config;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_radio_state_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetRadioStateRsp, U32_RSP_LEN)?;

        let state = RadioState::from_u32(self.read_u32()?);
        debug!(?state, "--> GET RADIO STATE RSP");
        ctx.radio_state = state;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_rx_filter_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetRxFilterRsp, U32_RSP_LEN)?;

        let filter = self.read_u32()?;
        debug!(filter = format_args!("0x{filter:08x}"), "--> GET RX FILTER RSP");
        ctx.rx_filter = filter;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_smart_conn_filter_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetSmartConnFilterRsp, U32_RSP_LEN)?;

        let enabled = self.read_u32()? != 0;
        debug!(enabled, "--> GET SMART CONN FILTER RSP");
        ctx.smart_conn_filter = enabled;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_listen_interval_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetListenIntervalRsp, U32_RSP_LEN)?;

        let interval = self.read_u32()?;
        debug!(interval, "--> GET LISTEN INTERVAL RSP");
        ctx.listen_interval = interval;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_security_mode_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(
            rsp,
            CommandType::GetSecurityModeRsp,
            GET_SECURITY_MODE_RSP_LEN,
        )?;

        let mode = parse_security_mode(self.read_u32()?);
        debug!(
            auth_mode = mode.auth_mode,
            encrypt_type = mode.encrypt_type,
            "--> GET SECURITY MODE RSP"
        );
        ctx.security_mode = mode;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn get_psk_rsp(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::GetPskRsp, GET_PSK_RSP_LEN)?;

        let len = self.read_u32()? as usize;
        if len > MAX_PSK_LEN {
            error!(max = MAX_PSK_LEN, actual = len, "invalid psk len");
            return Err(Error::Bounds {
                field: "psk",
                max: MAX_PSK_LEN,
                actual: len,
            });
        }

        let mut words = [0u32; MAX_PSK_LEN / 4];
        self.read_words(&mut words)?;
        let psk = Psk::new(&pack_words(&words)[..len])?;
        debug!(len, "--> GET PSK RSP");
        ctx.psk = psk;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn register_rx_hndlr_rsp(
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::RegisterRxHndlrRsp, RSP_HDR_LEN)?;
        debug!("--> REGISTER RX HANDLER RSP");
        ctx.reg_rx_hndlr = true;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn unregister_rx_hndlr_rsp(
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        expect_len(rsp, CommandType::UnregisterRxHndlrRsp, RSP_HDR_LEN)?;
        debug!("--> UNREGISTER RX HANDLER RSP");
        ctx.reg_rx_hndlr = false;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(result = rsp.result))]
    pub(super) fn scan_rsp(&self, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::ScanRsp, SCAN_RSP_LEN)?;

        let if_idx = self.read_u32()?;
        debug!(if_idx, "--> SCAN RSP");
        if rsp.result >= 0 {
            return Ok(());
        }

        let vif = self.lookup_vif(if_idx)?;
        match vif.take_scan() {
            Some(req) => self.cfg80211.scan_done(req, true),
            None => warn!(if_idx, "scan rejected with no scan pending"),
        }
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(len = rsp.cmd.len, result = rsp.result))]
    pub(super) fn scan_ind(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        let frame_len =
            expect_var_len(rsp, CommandType::ScanInd, SCAN_IND_FIXED_LEN, 1, MAX_DATA_LEN)?;

        let rssi = self.read_u32()? as i32;
        let channel = self.read_u32()?;
        let words = len_to_words(frame_len);
        self.transport
            .read_exact(self.config.rx_queue, &mut ctx.probe_data[..words])?;
        let data = pack_words(&ctx.probe_data[..words]);
        let frame = &data[..frame_len];
        debug!(rssi, channel, frame_len, "--> SCAN IND");
        trace!(frame = %hex::encode(frame), "probe data");

        let fc = frame_control(frame);
        if !is_beacon(fc) && !is_probe_resp(fc) {
            error!(fc = format_args!("0x{fc:04x}"), "unsupported mgmt frame");
            return Err(Error::UnsupportedFrame(fc));
        }

        let Some(band) = Band::for_channel(channel) else {
            error!(channel, "invalid channel");
            return Err(Error::InvalidChannel(channel));
        };
        let freq = channel_to_frequency(channel, band);
        let Some(chan) = self.cfg80211.get_channel(freq) else {
            error!(freq, "get_channel() failed");
            return Err(Error::InvalidArgument(format!("no channel for {freq} MHz")));
        };

        if self
            .cfg80211
            .inform_bss(&chan, frame, rssi.saturating_mul(100))
            .is_none()
        {
            error!(freq, "inform_bss() failed");
            return Err(Error::OutOfMemory("inform_bss"));
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn scan_complete_ind(&self, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::ScanCompleteInd, SCAN_RSP_LEN)?;

        let if_idx = self.read_u32()?;
        debug!(if_idx, "--> SCAN COMPLETE IND");
        let vif = self.lookup_vif(if_idx)?;

        match vif.take_scan() {
            Some(req) => self.cfg80211.scan_done(req, false),
            None => warn!(if_idx, "scan complete with no scan pending"),
        }
        self.commands.scan_stop()
    }

    #[tracing::instrument(skip_all, fields(result = rsp.result))]
    pub(super) fn connect_rsp(&self, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::ConnectRsp, CONNECT_RSP_LEN)?;

        let if_idx = self.read_u32()?;
        let bssid = self.read_addr()?;
        debug!(if_idx, %bssid, "--> CONNECT RSP");

        let vif = self.lookup_vif(if_idx)?;
        if rsp.result < 0 {
            self.cfg80211
                .connect_result(&vif, &bssid, StatusCode::UnspecifiedFailure);
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn connect_ind(&self, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::ConnectInd, CONNECT_IND_LEN)?;

        let if_idx = self.read_u32()?;
        let channel = self.read_u32()?;
        let bssid = self.read_addr()?;
        debug!(if_idx, channel, %bssid, "--> CONNECT IND");

        let vif = self.lookup_vif(if_idx)?;
        self.cfg80211
            .connect_event(&vif, &bssid, channel)
            .inspect_err(|e| error!("connect_event() failed: {e}"))?;
        vif.mark_connected();
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn disconnect_rsp(&self, ctx: &DriverContext, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::DisconnectRsp, RSP_HDR_LEN)?;
        debug!(reg_rx_hndlr = ctx.reg_rx_hndlr, "--> DISCONNECT RSP");

        if ctx.reg_rx_hndlr {
            self.commands.unregister_rx_handler()?;
        }
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub(super) fn disconnect_ind(&self, rsp: &ResponseHeader) -> Result<()> {
        expect_len(rsp, CommandType::DisconnectInd, DISCONNECT_IND_LEN)?;

        let if_idx = self.read_u32()?;
        let bssid = self.read_addr()?;
        debug!(if_idx, %bssid, "--> DISCONNECT IND");

        let vif = self.lookup_vif(if_idx)?;
        let ret = match vif.sme_state() {
            SmeState::Connecting => {
                self.cfg80211
                    .connect_result(&vif, &bssid, StatusCode::UnspecifiedFailure);
                Ok(())
            }
            SmeState::Connected => {
                let ret = self.commands.disconnect(vif.fw_vif_idx(), None);
                if ret.is_ok() {
                    self.cfg80211.disconnected(&vif, 0);
                }
                ret
            }
            SmeState::Disconnected => Ok(()),
        };

        vif.reset_connection();
        ret
    }

    #[tracing::instrument(skip_all, fields(len = rsp.cmd.len, result = rsp.result))]
    pub(super) fn rx_raw(
        &self,
        ctx: &mut DriverContext,
        rsp: &ResponseHeader,
    ) -> Result<()> {
        let data_len = expect_var_len(rsp, CommandType::RxRaw, RSP_HDR_LEN, 0, MAX_FRAME_LEN)?;

        let words = len_to_words(data_len);
        self.transport
            .read_exact(self.config.rx_queue, &mut ctx.rx_data[..words])?;
        let data = pack_words(&ctx.rx_data[..words]);
        trace!(frame = %hex::encode(&data[..data_len]), "--> RX RAW");

        // TODO: forward on the receiving interface once the firmware reports its index.
        self.cfg80211.rx_data(&data[..data_len], 0)
    }

    #[tracing::instrument(skip_all, fields(cmd = ?cmd, result = rsp.result))]
    pub(super) fn ack(rsp: &ResponseHeader, cmd: CommandType) -> Result<()> {
        expect_len(rsp, cmd, RSP_HDR_LEN)?;
        debug!("--> ack");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use bytes::Bytes;

    use super::*;
    use crate::cfg80211::InterfaceType;
    use crate::client::{Wmi, WmiConfig};
    use crate::interface::{ScanRequest, VifFlags};
    use crate::protocol::frame::CommandHeader;
    use crate::protocol::parser::fixtures::wifi_config_blob;
    use crate::protocol::{CommandGroup, encode_response};
    use crate::test_support::{Call, RecordingCfg80211, init_tracing};
    use crate::transport::LoopbackTransport;
    use crate::types::WifiConfig;

    const BSSID: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

    struct Fixture {
        transport: Arc<LoopbackTransport>,
        cfg80211: Arc<RecordingCfg80211>,
        wmi: Wmi<LoopbackTransport, RecordingCfg80211>,
        ctx: DriverContext,
    }

    impl Fixture {
        fn new() -> Self {
            init_tracing();
            let transport = Arc::new(LoopbackTransport::new());
            let cfg80211 = Arc::new(RecordingCfg80211::new());
            let wmi = Wmi::new(
                Arc::clone(&transport),
                Arc::clone(&cfg80211),
                WmiConfig::default(),
            );
            Self {
                transport,
                cfg80211,
                wmi,
                ctx: DriverContext::new(),
            }
        }

        fn feed(&mut self, frame: &[u8]) -> Result<()> {
            self.transport.push_frame(frame);
            self.wmi.process_next(&mut self.ctx)
        }

        /// Feeds a bare header declaring `len` bytes.
        fn feed_header(&mut self, ty: u16, grp: u8, len: u32, result: i32) -> Result<()> {
            let rsp = ResponseHeader {
                cmd: CommandHeader { len, grp, ty },
                result,
            };
            self.feed(&pack_words(&rsp.to_words()))
        }
    }

    fn words(values: &[u32]) -> Vec<u8> {
        pack_words(values).to_vec()
    }

    fn addr_payload(prefix: &[u32], addr: [u8; 6]) -> Vec<u8> {
        let mut payload = words(prefix);
        payload.extend_from_slice(&addr);
        payload.extend_from_slice(&[0, 0]);
        payload
    }

    fn scan_ind(rssi: i32, channel: u32, frame: &[u8]) -> Bytes {
        let mut payload = words(&[rssi as u32, channel]);
        payload.extend_from_slice(frame);
        encode_response(CommandType::ScanInd, frame.len() as i32, &payload)
    }

    fn beacon() -> Vec<u8> {
        let mut frame = vec![0u8; 36];
        frame[0] = 0x80;
        frame[16..22].copy_from_slice(&BSSID);
        frame
    }

    #[test]
    fn test_length_mismatch_reads_no_payload() {
        let cases = [
            (CommandType::MacAddrRsp, MAC_ADDR_RSP_LEN),
            (CommandType::GetWirelessModeRsp, U32_RSP_LEN),
            (CommandType::GetCfgRsp, GET_CFG_RSP_LEN),
            (CommandType::GetRadioStateRsp, U32_RSP_LEN),
            (CommandType::GetRxFilterRsp, U32_RSP_LEN),
            (CommandType::GetSmartConnFilterRsp, U32_RSP_LEN),
            (CommandType::GetListenIntervalRsp, U32_RSP_LEN),
            (CommandType::GetSecurityModeRsp, GET_SECURITY_MODE_RSP_LEN),
            (CommandType::GetPskRsp, GET_PSK_RSP_LEN),
            (CommandType::RegisterRxHndlrRsp, RSP_HDR_LEN),
            (CommandType::UnregisterRxHndlrRsp, RSP_HDR_LEN),
            (CommandType::ScanRsp, SCAN_RSP_LEN),
            (CommandType::ScanCompleteInd, SCAN_RSP_LEN),
            (CommandType::ConnectRsp, CONNECT_RSP_LEN),
            (CommandType::ConnectInd, CONNECT_IND_LEN),
            (CommandType::DisconnectRsp, RSP_HDR_LEN),
            (CommandType::DisconnectInd, DISCONNECT_IND_LEN),
            (CommandType::SetWirelessModeRsp, RSP_HDR_LEN),
            (CommandType::SetRadioStateRsp, RSP_HDR_LEN),
            (CommandType::SetOpModeRsp, RSP_HDR_LEN),
            (CommandType::SetRxFilterRsp, RSP_HDR_LEN),
            (CommandType::SetSmartConnFilterRsp, RSP_HDR_LEN),
            (CommandType::SetListenIntervalRsp, RSP_HDR_LEN),
            (CommandType::SetSecurityModeRsp, RSP_HDR_LEN),
            (CommandType::SetPskRsp, RSP_HDR_LEN),
            (CommandType::ScanStopRsp, RSP_HDR_LEN),
        ];

        for (ty, expected) in cases {
            // Header-only frames cannot shrink below the header itself.
            let shorter = expected.checked_sub(4).filter(|len| *len >= RSP_HDR_LEN);
            for len in [Some(expected + 4), Some(expected + 8), shorter]
                .into_iter()
                .flatten()
            {
                let mut fx = Fixture::new();
                let err = fx.feed_header(ty.into(), 1, len as u32, 0).unwrap_err();
                assert!(
                    matches!(err, Error::Frame(FrameError::LengthMismatch { .. })),
                    "{ty:?} len {len}: {err}"
                );
                assert_eq!(err.errno(), -crate::error::EINVAL);
                assert_eq!(fx.transport.reads(), vec![3], "{ty:?} len {len}");
                assert!(fx.transport.writes().is_empty());
                assert!(fx.cfg80211.calls().is_empty());
            }
        }
    }

    #[test]
    fn test_read_failure_keeps_state() {
        let mut fx = Fixture::new();
        fx.ctx.listen_interval = 5;
        let rsp = ResponseHeader {
            cmd: CommandHeader::new(CommandType::GetListenIntervalRsp, U32_RSP_LEN),
            result: 0,
        };
        fx.transport.fail_reads(-71);

        let err = fx.wmi.process(&mut fx.ctx, &rsp).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.errno(), -71);
        assert_eq!(fx.ctx.listen_interval, 5);
        assert_eq!(fx.transport.reads(), vec![1]);
    }

    #[test]
    fn test_truncated_cfg_keeps_state() {
        let mut fx = Fixture::new();
        let blob = wifi_config_blob(b"home", 8, b"mt7697-ap", 12);
        let frame = encode_response(CommandType::GetCfgRsp, 0, &blob);
        let err = fx.feed(&frame[..RSP_HDR_LEN + 100]).unwrap_err();

        assert!(matches!(
            err,
            Error::ShortTransfer {
                op: "read",
                expected: 54,
                actual: 25,
            }
        ));
        assert_eq!(err.errno(), -crate::error::EIO);
        assert_eq!(fx.ctx.wifi_config, WifiConfig::default());
    }

    #[test]
    fn test_unknown_group_and_type() {
        let mut fx = Fixture::new();
        let err = fx
            .feed_header(CommandType::ScanRsp.into(), 0x02, 16, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Frame(FrameError::UnknownGroup(2))));

        let queue = u8::from(CommandGroup::Queue);
        assert!(fx.feed_header(0x01, queue, 12, 0).is_err());

        let err = fx.feed_header(0x7F, 1, 12, 0).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(0x7F)));

        let err = fx
            .feed_header(CommandType::ScanReq.into(), 1, 12, 0)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(_)));
        assert_eq!(fx.transport.reads(), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_scalar_responses() {
        let mut fx = Fixture::new();
        fx.feed(&encode_response(CommandType::GetWirelessModeRsp, 0, &words(&[9])))
            .unwrap();
        fx.feed(&encode_response(CommandType::GetRadioStateRsp, 0, &words(&[1])))
            .unwrap();
        fx.feed(&encode_response(CommandType::GetRxFilterRsp, 0, &words(&[0x1F])))
            .unwrap();
        fx.feed(&encode_response(CommandType::GetSmartConnFilterRsp, 0, &words(&[1])))
            .unwrap();
        fx.feed(&encode_response(CommandType::GetListenIntervalRsp, 0, &words(&[3])))
            .unwrap();
        fx.feed(&encode_response(
            CommandType::GetSecurityModeRsp,
            0,
            &[7, 6, 0, 0],
        ))
        .unwrap();

        assert_eq!(fx.ctx.hw_wireless_mode, 9);
        assert_eq!(fx.ctx.radio_state, RadioState::On);
        assert_eq!(fx.ctx.rx_filter, 0x1F);
        assert!(fx.ctx.smart_conn_filter);
        assert_eq!(fx.ctx.listen_interval, 3);
        assert_eq!(fx.ctx.security_mode.auth_mode, 7);
        assert_eq!(fx.ctx.security_mode.encrypt_type, 6);
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_mac_addr_interface_add_failure() {
        let mut fx = Fixture::new();
        fx.cfg80211.fail_interface_add.store(true, Ordering::SeqCst);
        let err = fx
            .feed(&encode_response(CommandType::MacAddrRsp, 0, &BSSID))
            .unwrap_err();
        assert_eq!(err.errno(), -crate::error::ENOMEM);
        assert_eq!(fx.ctx.mac_addr, MacAddr::new(BSSID));
        assert!(fx.ctx.default_vif.is_none());
        assert!(matches!(
            fx.cfg80211.calls()[0],
            Call::InterfaceAdd {
                iftype: InterfaceType::Station,
                ..
            }
        ));
    }

    #[test]
    fn test_get_cfg() {
        let mut fx = Fixture::new();
        let blob = wifi_config_blob(b"home", 8, b"mt7697-ap", 12);
        fx.feed(&encode_response(CommandType::GetCfgRsp, 0, &blob))
            .unwrap();

        let config = &fx.ctx.wifi_config;
        assert_eq!(config.opmode, 3);
        assert_eq!(config.sta.ssid, b"home");
        assert_eq!(config.sta.bssid, Some(MacAddr::new(BSSID)));
        assert_eq!(config.sta.passphrase.len(), 8);
        assert_eq!(config.ap.ssid, b"mt7697-ap");
        assert_eq!(config.ap.channel, 7);
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_get_cfg_ssid_too_long_keeps_state() {
        let mut fx = Fixture::new();
        let blob = wifi_config_blob(&[b'a'; 33], 8, b"ap", 0);
        let err = fx
            .feed(&encode_response(CommandType::GetCfgRsp, 0, &blob))
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "sta ssid", .. }));
        assert!(fx.ctx.wifi_config.sta.ssid.is_empty());

        // The AP half is validated even in station mode.
        let blob = wifi_config_blob(b"home", 8, &[b'b'; 33], 0);
        let err = fx
            .feed(&encode_response(CommandType::GetCfgRsp, 0, &blob))
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "ap ssid", .. }));
        assert!(fx.ctx.wifi_config.ap.ssid.is_empty());
    }

    #[test]
    fn test_get_cfg_ap_passphrase_bounds() {
        let mut fx = Fixture::new();
        let blob = wifi_config_blob(b"home", 8, b"ap", 64);
        fx.feed(&encode_response(CommandType::GetCfgRsp, 0, &blob))
            .unwrap();
        assert_eq!(fx.ctx.wifi_config.ap.passphrase.len(), 64);
        let accepted = fx.ctx.wifi_config.clone();

        let blob = wifi_config_blob(b"other", 8, b"ap2", 65);
        let err = fx
            .feed(&encode_response(CommandType::GetCfgRsp, 0, &blob))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Bounds {
                field: "ap passphrase",
                max: 64,
                actual: 65,
            }
        ));
        assert_eq!(fx.ctx.wifi_config, accepted);
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_get_psk_bounds() {
        let mut fx = Fixture::new();
        let mut payload = words(&[64]);
        payload.extend_from_slice(&[0x5A; 64]);
        fx.feed(&encode_response(CommandType::GetPskRsp, 0, &payload))
            .unwrap();
        assert_eq!(fx.ctx.psk.as_bytes(), &[0x5A; 64][..]);

        let mut payload = words(&[20]);
        payload.extend_from_slice(&[0x11; 64]);
        fx.feed(&encode_response(CommandType::GetPskRsp, 0, &payload))
            .unwrap();
        assert_eq!(fx.ctx.psk.as_bytes(), &[0x11; 20][..]);

        let mut payload = words(&[65]);
        payload.extend_from_slice(&[0x22; 64]);
        let err = fx
            .feed(&encode_response(CommandType::GetPskRsp, 0, &payload))
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "psk", .. }));
        assert_eq!(fx.ctx.psk.len(), 20);
        // Only the length word was consumed.
        assert_eq!(fx.transport.pending_words(), 16);
    }

    #[test]
    fn test_rx_handler_registration() {
        let mut fx = Fixture::new();
        fx.feed(&encode_response(CommandType::RegisterRxHndlrRsp, 0, &[]))
            .unwrap();
        assert!(fx.ctx.reg_rx_hndlr);

        fx.feed(&encode_response(CommandType::DisconnectRsp, 0, &[]))
            .unwrap();
        assert_eq!(
            fx.transport.written_types(),
            vec![Some(CommandType::UnregisterRxHndlrReq)]
        );

        fx.feed(&encode_response(CommandType::UnregisterRxHndlrRsp, 0, &[]))
            .unwrap();
        assert!(!fx.ctx.reg_rx_hndlr);

        fx.feed(&encode_response(CommandType::DisconnectRsp, 0, &[]))
            .unwrap();
        assert_eq!(fx.transport.writes().len(), 1);
    }

    #[test]
    fn test_acks() {
        let mut fx = Fixture::new();
        fx.feed(&encode_response(CommandType::SetRadioStateRsp, 0, &[]))
            .unwrap();
        fx.feed(&encode_response(CommandType::ScanStopRsp, -1, &[]))
            .unwrap();
        assert_eq!(fx.transport.reads(), vec![3, 3]);
        assert!(fx.cfg80211.calls().is_empty());
    }

    #[test]
    fn test_scan_rsp() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_scan(ScanRequest { id: 7, ssid: None }).unwrap();

        fx.feed(&encode_response(CommandType::ScanRsp, 0, &words(&[0])))
            .unwrap();
        assert!(vif.scan_pending());
        assert!(fx.cfg80211.calls().is_empty());

        fx.feed(&encode_response(CommandType::ScanRsp, -1, &words(&[0])))
            .unwrap();
        assert!(!vif.scan_pending());
        assert_eq!(fx.cfg80211.calls(), vec![Call::ScanDone { id: 7, aborted: true }]);

        let err = fx
            .feed(&encode_response(CommandType::ScanRsp, -1, &words(&[3])))
            .unwrap_err();
        assert!(matches!(err, Error::InterfaceNotFound(3)));
    }

    #[test]
    fn test_scan_ind_informs_bss() {
        let mut fx = Fixture::new();
        let frame = beacon();
        fx.feed(&scan_ind(-50, 1, &frame)).unwrap();

        let mut probe_resp = beacon();
        probe_resp[0] = 0x50;
        fx.feed(&scan_ind(-70, 36, &probe_resp)).unwrap();

        assert_eq!(
            fx.cfg80211.calls(),
            vec![
                Call::InformBss {
                    freq: 2412,
                    frame,
                    signal_mbm: -5000,
                },
                Call::InformBss {
                    freq: 5180,
                    frame: probe_resp,
                    signal_mbm: -7000,
                },
            ]
        );
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_scan_ind_unaligned_frame() {
        let mut fx = Fixture::new();
        let frame = &beacon()[..27];
        fx.feed(&scan_ind(-40, 165, frame)).unwrap();
        assert_eq!(
            fx.cfg80211.calls(),
            vec![Call::InformBss {
                freq: 5825,
                frame: frame.to_vec(),
                signal_mbm: -4000,
            }]
        );
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_scan_ind_rejects_other_frames() {
        let mut fx = Fixture::new();
        let mut probe_req = beacon();
        probe_req[0] = 0x40;
        let err = fx.feed(&scan_ind(-50, 1, &probe_req)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFrame(0x0040)));

        for channel in [0, 15, 200] {
            let err = fx.feed(&scan_ind(-50, channel, &beacon())).unwrap_err();
            assert!(matches!(err, Error::InvalidChannel(c) if c == channel));
        }

        fx.cfg80211.no_channel.store(true, Ordering::SeqCst);
        let err = fx.feed(&scan_ind(-50, 6, &beacon())).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        fx.cfg80211.no_channel.store(false, Ordering::SeqCst);

        fx.cfg80211.fail_inform_bss.store(true, Ordering::SeqCst);
        let err = fx.feed(&scan_ind(-50, 6, &beacon())).unwrap_err();
        assert_eq!(err.errno(), -crate::error::ENOMEM);

        assert_eq!(fx.cfg80211.calls().len(), 1);
        assert_eq!(fx.transport.pending_words(), 0);
    }

    #[test]
    fn test_scan_ind_length_bounds() {
        let mut fx = Fixture::new();
        let err = fx
            .feed_header(CommandType::ScanInd.into(), 1, SCAN_IND_FIXED_LEN as u32, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Frame(FrameError::TooShort { .. })));

        let err = fx
            .feed_header(CommandType::ScanInd.into(), 1, 24, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "data", .. }));

        let err = fx
            .feed_header(CommandType::ScanInd.into(), 1, 24, MAX_DATA_LEN as i32 + 1)
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "data", .. }));

        // Declared length disagrees with the data length.
        let err = fx
            .feed_header(CommandType::ScanInd.into(), 1, 28, 4)
            .unwrap_err();
        assert!(matches!(err, Error::Frame(FrameError::LengthMismatch { .. })));
        assert_eq!(fx.transport.reads(), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_scan_complete_stops_scan() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_scan(ScanRequest {
            id: 3,
            ssid: Some(b"home".to_vec()),
        })
        .unwrap();

        fx.feed(&encode_response(CommandType::ScanCompleteInd, 0, &words(&[0])))
            .unwrap();
        assert!(!vif.scan_pending());
        assert_eq!(fx.cfg80211.calls(), vec![Call::ScanDone { id: 3, aborted: false }]);
        assert_eq!(fx.transport.written_types(), vec![Some(CommandType::ScanStop)]);

        // No scan pending: still exactly one stop request.
        fx.feed(&encode_response(CommandType::ScanCompleteInd, 0, &words(&[0])))
            .unwrap();
        assert_eq!(fx.cfg80211.calls().len(), 1);
        assert_eq!(
            fx.transport.written_types(),
            vec![Some(CommandType::ScanStop), Some(CommandType::ScanStop)]
        );
    }

    #[test]
    fn test_connect_rsp() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(1);
        vif.begin_connect().unwrap();

        fx.feed(&encode_response(CommandType::ConnectRsp, 0, &addr_payload(&[1], BSSID)))
            .unwrap();
        assert!(fx.cfg80211.calls().is_empty());

        fx.feed(&encode_response(CommandType::ConnectRsp, -1, &addr_payload(&[1], BSSID)))
            .unwrap();
        assert_eq!(
            fx.cfg80211.calls(),
            vec![Call::ConnectResult {
                vif: 1,
                bssid: MacAddr::new(BSSID),
                status: StatusCode::UnspecifiedFailure,
            }]
        );
        assert_eq!(vif.sme_state(), SmeState::Connecting);
    }

    #[test]
    fn test_connect_ind() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_connect().unwrap();

        fx.feed(&encode_response(CommandType::ConnectInd, 0, &addr_payload(&[0, 11], BSSID)))
            .unwrap();
        assert_eq!(
            fx.cfg80211.calls(),
            vec![Call::ConnectEvent {
                vif: 0,
                bssid: MacAddr::new(BSSID),
                channel: 11,
            }]
        );
        assert_eq!(vif.sme_state(), SmeState::Connected);
        assert!(vif.flags().contains(VifFlags::CONNECTED));
        assert!(!vif.flags().contains(VifFlags::CONNECT_PEND));
    }

    #[test]
    fn test_connect_ind_event_failure() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_connect().unwrap();
        fx.cfg80211.fail_connect_event.store(true, Ordering::SeqCst);

        assert!(fx
            .feed(&encode_response(CommandType::ConnectInd, 0, &addr_payload(&[0, 11], BSSID)))
            .is_err());
        assert_eq!(vif.sme_state(), SmeState::Connecting);
    }

    #[test]
    fn test_disconnect_ind_while_connecting() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_connect().unwrap();

        fx.feed(&encode_response(CommandType::DisconnectInd, 0, &addr_payload(&[0], BSSID)))
            .unwrap();
        assert_eq!(
            fx.cfg80211.calls(),
            vec![Call::ConnectResult {
                vif: 0,
                bssid: MacAddr::new(BSSID),
                status: StatusCode::UnspecifiedFailure,
            }]
        );
        assert_eq!(vif.sme_state(), SmeState::Disconnected);
        assert!(vif.flags().is_empty());
        assert!(fx.transport.writes().is_empty());
    }

    #[test]
    fn test_disconnect_ind_while_connected() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_connect().unwrap();
        assert!(vif.mark_connected());

        fx.feed(&encode_response(CommandType::DisconnectInd, 0, &addr_payload(&[0], BSSID)))
            .unwrap();
        assert_eq!(
            fx.transport.written_types(),
            vec![Some(CommandType::DisconnectReq)]
        );
        assert_eq!(fx.cfg80211.calls(), vec![Call::Disconnected { vif: 0, reason: 0 }]);
        assert_eq!(vif.sme_state(), SmeState::Disconnected);
        assert!(vif.flags().is_empty());
    }

    #[test]
    fn test_disconnect_ind_write_failure_still_resets() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        vif.begin_connect().unwrap();
        vif.mark_connected();
        fx.transport.fail_writes(-5);

        let err = fx
            .feed(&encode_response(CommandType::DisconnectInd, 0, &addr_payload(&[0], BSSID)))
            .unwrap_err();
        assert_eq!(err.errno(), -crate::error::EIO);
        assert!(fx.cfg80211.calls().is_empty());
        assert_eq!(vif.sme_state(), SmeState::Disconnected);
        assert!(vif.flags().is_empty());
    }

    #[test]
    fn test_disconnect_ind_while_disconnected() {
        let mut fx = Fixture::new();
        let vif = fx.cfg80211.add_vif(0);
        fx.feed(&encode_response(CommandType::DisconnectInd, 0, &addr_payload(&[0], BSSID)))
            .unwrap();
        assert!(fx.cfg80211.calls().is_empty());
        assert!(fx.transport.writes().is_empty());
        assert_eq!(vif.sme_state(), SmeState::Disconnected);
    }

    #[test]
    fn test_rx_raw_forwarded() {
        let mut fx = Fixture::new();
        let frame = [0x08, 0x02, 0x00, 0x00, 0xAA, 0xBB, 0xCC];
        fx.feed(&encode_response(CommandType::RxRaw, frame.len() as i32, &frame))
            .unwrap();
        assert_eq!(
            fx.cfg80211.calls(),
            vec![Call::RxData {
                frame: frame.to_vec(),
                if_idx: 0,
            }]
        );
        assert_eq!(fx.transport.reads(), vec![3, 2]);

        let err = fx
            .feed_header(CommandType::RxRaw.into(), 1, 16, MAX_FRAME_LEN as i32 + 1)
            .unwrap_err();
        assert!(matches!(err, Error::Bounds { field: "data", .. }));
    }
}
