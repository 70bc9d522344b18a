//! Driver-side state mirrored from the firmware.
//!
//! The context is owned by the receive path and handed to every handler by
//! mutable reference. Fields are only committed once every read for a frame
//! has succeeded.

use std::sync::{Arc, Mutex, PoisonError};

use crate::interface::Vif;
use crate::protocol::RadioState;
use crate::protocol::layout::{MAX_DATA_LEN, MAX_FRAME_LEN, len_to_words};
use crate::types::{MacAddr, Psk, SecurityMode, WifiConfig};

/// Central driver state.
#[derive(Debug)]
pub struct DriverContext {
    /// Station MAC address.
    pub mac_addr: MacAddr,
    /// Pre-shared key.
    pub psk: Psk,
    /// Hardware wireless mode.
    pub hw_wireless_mode: u32,
    /// WiFi configuration.
    pub wifi_config: WifiConfig,
    /// RX filter bitmask.
    pub rx_filter: u32,
    /// Smart connection filter.
    pub smart_conn_filter: bool,
    /// Radio state.
    pub radio_state: RadioState,
    /// Listen interval.
    pub listen_interval: u32,
    /// Security mode of the last queried port.
    pub security_mode: SecurityMode,
    /// Raw RX handler registered with the firmware.
    pub reg_rx_hndlr: bool,
    /// Interface created for the station MAC.
    pub default_vif: Option<Arc<Vif>>,
    rtnl: Arc<Mutex<()>>,
    pub(crate) probe_data: Vec<u32>,
    pub(crate) rx_data: Vec<u32>,
}

impl DriverContext {
    /// Creates a context with its own interface-table lock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rtnl(Arc::new(Mutex::new(())))
    }

    /// Creates a context sharing the given interface-table lock.
    #[must_use]
    pub fn with_rtnl(rtnl: Arc<Mutex<()>>) -> Self {
        Self {
            mac_addr: MacAddr::default(),
            psk: Psk::default(),
            hw_wireless_mode: 0,
            wifi_config: WifiConfig::default(),
            rx_filter: 0,
            smart_conn_filter: false,
            radio_state: RadioState::Off,
            listen_interval: 0,
            security_mode: SecurityMode::default(),
            reg_rx_hndlr: false,
            default_vif: None,
            rtnl,
            probe_data: vec![0; len_to_words(MAX_DATA_LEN)],
            rx_data: vec![0; len_to_words(MAX_FRAME_LEN)],
        }
    }

    /// Interface-table lock shared with the wireless stack.
    #[must_use]
    pub fn rtnl(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.rtnl)
    }

    /// Runs `f` with the interface-table lock held.
    pub(crate) fn with_rtnl_lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.rtnl.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

impl Default for DriverContext {
    fn default() -> Self {
        Self::new()
    }
}
