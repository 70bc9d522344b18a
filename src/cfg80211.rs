//! Wireless stack collaborator.
//!
//! The engine never owns interfaces, BSS entries or network devices. It
//! reports scan, connect and disconnect outcomes through [`Cfg80211`] and
//! asks it to create and look up interfaces.

use std::sync::Arc;

use crate::error::Result;
use crate::interface::{ScanRequest, Vif};
use crate::types::{Channel, MacAddr, StatusCode};

/// Interface type requested from the wireless stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterfaceType {
    /// Managed station.
    #[default]
    Station,
    /// Access point.
    Ap,
    /// Monitor.
    Monitor,
}

/// A BSS entry registered with the wireless stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BssHandle(pub u64);

/// Callbacks into the wireless stack.
///
/// Implementations are called from the receive path with no engine lock
/// held, except [`Cfg80211::interface_add`] which runs under the
/// interface-table lock.
pub trait Cfg80211: Send + Sync {
    /// Creates a network interface.
    fn interface_add(&self, name: &str, iftype: InterfaceType, flags: u32) -> Option<Arc<Vif>>;

    /// Looks up an interface by firmware index.
    fn vif_by_index(&self, if_idx: u32) -> Option<Arc<Vif>>;

    /// Reports the outcome of a connect attempt.
    fn connect_result(&self, vif: &Vif, bssid: &MacAddr, status: StatusCode);

    /// Reports a completed association.
    fn connect_event(&self, vif: &Vif, bssid: &MacAddr, channel: u32) -> Result<()>;

    /// Reports loss of an association.
    fn disconnected(&self, vif: &Vif, reason: u16);

    /// Hands back a finished scan.
    fn scan_done(&self, req: ScanRequest, aborted: bool);

    /// Resolves a center frequency to a supported channel.
    fn get_channel(&self, freq: u32) -> Option<Channel>;

    /// Registers a BSS from a beacon or probe response.
    fn inform_bss(&self, channel: &Channel, frame: &[u8], signal_mbm: i32) -> Option<BssHandle>;

    /// Forwards a raw 802.11 frame received on interface `if_idx`.
    fn rx_data(&self, frame: &[u8], if_idx: u32) -> Result<()>;
}
