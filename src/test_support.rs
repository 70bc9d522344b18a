//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cfg80211::{BssHandle, Cfg80211, InterfaceType};
use crate::error::{Error, Result};
use crate::interface::{ScanRequest, Vif};
use crate::types::{Band, Channel, MacAddr, StatusCode, frequency_to_channel};

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InterfaceAdd {
        name: String,
        iftype: InterfaceType,
        flags: u32,
    },
    ConnectResult {
        vif: u32,
        bssid: MacAddr,
        status: StatusCode,
    },
    ConnectEvent {
        vif: u32,
        bssid: MacAddr,
        channel: u32,
    },
    Disconnected {
        vif: u32,
        reason: u16,
    },
    ScanDone {
        id: u64,
        aborted: bool,
    },
    InformBss {
        freq: u32,
        frame: Vec<u8>,
        signal_mbm: i32,
    },
    RxData {
        frame: Vec<u8>,
        if_idx: u32,
    },
}

/// Collaborator recording every call.
#[derive(Debug, Default)]
pub struct RecordingCfg80211 {
    vifs: Mutex<HashMap<u32, Arc<Vif>>>,
    calls: Mutex<Vec<Call>>,
    pub fail_interface_add: AtomicBool,
    pub fail_inform_bss: AtomicBool,
    pub fail_connect_event: AtomicBool,
    pub no_channel: AtomicBool,
}

impl RecordingCfg80211 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an interface and returns it.
    pub fn add_vif(&self, fw_vif_idx: u32) -> Arc<Vif> {
        let vif = Arc::new(Vif::new(fw_vif_idx));
        self.vifs
            .lock()
            .unwrap()
            .insert(fw_vif_idx, Arc::clone(&vif));
        vif
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Cfg80211 for RecordingCfg80211 {
    fn interface_add(&self, name: &str, iftype: InterfaceType, flags: u32) -> Option<Arc<Vif>> {
        self.record(Call::InterfaceAdd {
            name: name.to_string(),
            iftype,
            flags,
        });
        if self.fail_interface_add.load(Ordering::SeqCst) {
            return None;
        }
        let idx = self.vifs.lock().unwrap().len() as u32;
        Some(self.add_vif(idx))
    }

    fn vif_by_index(&self, if_idx: u32) -> Option<Arc<Vif>> {
        self.vifs.lock().unwrap().get(&if_idx).cloned()
    }

    fn connect_result(&self, vif: &Vif, bssid: &MacAddr, status: StatusCode) {
        self.record(Call::ConnectResult {
            vif: vif.fw_vif_idx(),
            bssid: *bssid,
            status,
        });
    }

    fn connect_event(&self, vif: &Vif, bssid: &MacAddr, channel: u32) -> Result<()> {
        self.record(Call::ConnectEvent {
            vif: vif.fw_vif_idx(),
            bssid: *bssid,
            channel,
        });
        if self.fail_connect_event.load(Ordering::SeqCst) {
            return Err(Error::InvalidArgument("connect event".into()));
        }
        Ok(())
    }

    fn disconnected(&self, vif: &Vif, reason: u16) {
        self.record(Call::Disconnected {
            vif: vif.fw_vif_idx(),
            reason,
        });
    }

    fn scan_done(&self, req: ScanRequest, aborted: bool) {
        self.record(Call::ScanDone {
            id: req.id,
            aborted,
        });
    }

    fn get_channel(&self, freq: u32) -> Option<Channel> {
        if self.no_channel.load(Ordering::SeqCst) {
            return None;
        }
        let band = if freq < 5000 {
            Band::TwoGhz
        } else {
            Band::FiveGhz
        };
        Some(Channel::new(frequency_to_channel(freq), band))
    }

    fn inform_bss(&self, channel: &Channel, frame: &[u8], signal_mbm: i32) -> Option<BssHandle> {
        self.record(Call::InformBss {
            freq: channel.center_freq,
            frame: frame.to_vec(),
            signal_mbm,
        });
        if self.fail_inform_bss.load(Ordering::SeqCst) {
            return None;
        }
        Some(BssHandle(1))
    }

    fn rx_data(&self, frame: &[u8], if_idx: u32) -> Result<()> {
        self.record(Call::RxData {
            frame: frame.to_vec(),
            if_idx,
        });
        Ok(())
    }
}
