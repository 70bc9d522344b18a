//! Per-interface state.
//!
//! Each virtual interface is identified by the index the firmware assigned
//! to it. Its SME state, flags and pending scan sit behind a spin lock that
//! is only held for field updates, never across transport I/O or a
//! collaborator callback.

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Connection state machine of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SmeState {
    /// Not associated.
    #[default]
    Disconnected,
    /// Association in progress.
    Connecting,
    /// Associated.
    Connected,
}

/// Interface flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VifFlags(u8);

impl VifFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// A connect request is outstanding.
    pub const CONNECT_PEND: Self = Self(1 << 0);

    /// Associated with a BSS.
    pub const CONNECTED: Self = Self(1 << 1);

    /// Check if a flag is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Sets a flag.
    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears a flag.
    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// An outstanding scan, handed back to the wireless stack on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Identifier chosen by the caller.
    pub id: u64,
    /// SSID to probe for, if any.
    pub ssid: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
struct VifState {
    sme_state: SmeState,
    flags: VifFlags,
    scan_req: Option<ScanRequest>,
}

/// A virtual interface.
#[derive(Debug)]
pub struct Vif {
    fw_vif_idx: u32,
    state: spin::Mutex<VifState>,
}

impl Vif {
    /// Creates a disconnected interface.
    #[must_use]
    pub fn new(fw_vif_idx: u32) -> Self {
        Self {
            fw_vif_idx,
            state: spin::Mutex::new(VifState::default()),
        }
    }

    /// Firmware index of this interface.
    #[must_use]
    pub const fn fw_vif_idx(&self) -> u32 {
        self.fw_vif_idx
    }

    /// Current SME state.
    #[must_use]
    pub fn sme_state(&self) -> SmeState {
        self.state.lock().sme_state
    }

    /// Current flags.
    #[must_use]
    pub fn flags(&self) -> VifFlags {
        self.state.lock().flags
    }

    /// Returns true while a scan is outstanding.
    #[must_use]
    pub fn scan_pending(&self) -> bool {
        self.state.lock().scan_req.is_some()
    }

    /// Stores a scan request.
    ///
    /// # Errors
    ///
    /// Returns `Error::ScanInProgress` if one is already outstanding.
    pub fn begin_scan(&self, req: ScanRequest) -> Result<()> {
        let mut state = self.state.lock();
        if state.scan_req.is_some() {
            return Err(Error::ScanInProgress(self.fw_vif_idx));
        }
        state.scan_req = Some(req);
        Ok(())
    }

    /// Takes the outstanding scan, leaving none.
    pub fn take_scan(&self) -> Option<ScanRequest> {
        self.state.lock().scan_req.take()
    }

    /// Moves a disconnected interface to connecting.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` unless the interface is disconnected.
    pub fn begin_connect(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.sme_state != SmeState::Disconnected {
            return Err(Error::InvalidArgument(format!(
                "vif {} not disconnected ({:?})",
                self.fw_vif_idx, state.sme_state
            )));
        }
        state.sme_state = SmeState::Connecting;
        state.flags.insert(VifFlags::CONNECT_PEND);
        Ok(())
    }

    /// Completes an association started by [`Vif::begin_connect`].
    ///
    /// Returns false, leaving the state untouched, unless the interface was
    /// connecting.
    pub fn mark_connected(&self) -> bool {
        let mut state = self.state.lock();
        if state.sme_state != SmeState::Connecting {
            warn!(
                vif = self.fw_vif_idx,
                sme_state = ?state.sme_state,
                "connect event outside of connecting"
            );
            return false;
        }
        state.sme_state = SmeState::Connected;
        state.flags.remove(VifFlags::CONNECT_PEND);
        state.flags.insert(VifFlags::CONNECTED);
        true
    }

    /// Returns to disconnected and clears the connection flags.
    pub fn reset_connection(&self) {
        let mut state = self.state.lock();
        debug!(vif = self.fw_vif_idx, from = ?state.sme_state, "sme -> disconnected");
        state.sme_state = SmeState::Disconnected;
        state.flags.remove(VifFlags::CONNECT_PEND);
        state.flags.remove(VifFlags::CONNECTED);
    }
}
