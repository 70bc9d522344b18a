//! Main [`Wmi`] engine implementation.
//!
//! This module provides the [`Wmi`] engine that combines the transport, the
//! request builders and the event dispatcher into one interface driven by
//! the receive path.

use std::sync::Arc;

use tracing::{debug, error};

use crate::cfg80211::{Cfg80211, InterfaceType};
use crate::commands::CommandHandler;
use crate::context::DriverContext;
use crate::error::Result;
use crate::event::EventDispatcher;
use crate::protocol::{RSP_HDR_WORDS, ResponseHeader};
use crate::transport::{QueueHandle, Transport};

/// Default receive queue.
pub const DEFAULT_RX_QUEUE: QueueHandle = QueueHandle(0);

/// Default transmit queue.
pub const DEFAULT_TX_QUEUE: QueueHandle = QueueHandle(1);

/// Default name pattern of the interface created for the station MAC.
pub const DEFAULT_IFNAME: &str = "wlan%d";

/// Configuration for the WMI engine.
#[derive(Debug, Clone)]
pub struct WmiConfig {
    /// Queue frames are read from.
    pub rx_queue: QueueHandle,
    /// Queue requests are written to.
    pub tx_queue: QueueHandle,
    /// Name pattern of the default interface.
    pub ifname: String,
    /// Type of the default interface.
    pub iftype: InterfaceType,
    /// Flags of the default interface.
    pub if_flags: u32,
}

impl WmiConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rx_queue: DEFAULT_RX_QUEUE,
            tx_queue: DEFAULT_TX_QUEUE,
            ifname: DEFAULT_IFNAME.to_string(),
            iftype: InterfaceType::Station,
            if_flags: 0,
        }
    }

    /// Sets the receive queue.
    #[must_use]
    pub const fn rx_queue(mut self, queue: QueueHandle) -> Self {
        self.rx_queue = queue;
        self
    }

    /// Sets the transmit queue.
    #[must_use]
    pub const fn tx_queue(mut self, queue: QueueHandle) -> Self {
        self.tx_queue = queue;
        self
    }

    /// Sets the default interface name pattern.
    #[must_use]
    pub fn ifname(mut self, name: impl Into<String>) -> Self {
        self.ifname = name.into();
        self
    }

    /// Sets the default interface type.
    #[must_use]
    pub const fn iftype(mut self, iftype: InterfaceType) -> Self {
        self.iftype = iftype;
        self
    }

    /// Sets the default interface flags.
    #[must_use]
    pub const fn if_flags(mut self, flags: u32) -> Self {
        self.if_flags = flags;
        self
    }
}

impl Default for WmiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// WMI engine bound to one transport and one wireless stack.
pub struct Wmi<T, C> {
    transport: Arc<T>,
    cfg80211: Arc<C>,
    commands: CommandHandler<T>,
    config: WmiConfig,
}

impl<T: Transport, C: Cfg80211> Wmi<T, C> {
    /// Creates an engine.
    #[must_use]
    pub fn new(transport: Arc<T>, cfg80211: Arc<C>, config: WmiConfig) -> Self {
        let commands = CommandHandler::new(Arc::clone(&transport), config.tx_queue);
        Self {
            transport,
            cfg80211,
            commands,
            config,
        }
    }

    /// Request builders writing to the transmit queue.
    #[must_use]
    pub const fn commands(&self) -> &CommandHandler<T> {
        &self.commands
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &WmiConfig {
        &self.config
    }

    /// Reads and decodes the next response header.
    pub fn read_header(&self) -> Result<ResponseHeader> {
        let mut words = [0u32; RSP_HDR_WORDS];
        self.transport.read_exact(self.config.rx_queue, &mut words)?;
        let rsp = ResponseHeader::from_words(&words).inspect_err(|e| error!("{e}"))?;
        debug!(
            len = rsp.cmd.len,
            grp = rsp.cmd.grp,
            ty = rsp.cmd.ty,
            result = rsp.result,
            "rsp hdr"
        );
        Ok(rsp)
    }

    /// Processes one frame whose header has already been read.
    pub fn process(&self, ctx: &mut DriverContext, rsp: &ResponseHeader) -> Result<()> {
        EventDispatcher::new(&*self.transport, &self.commands, &*self.cfg80211, &self.config)
            .dispatch(ctx, rsp)
    }

    /// Reads and processes the next frame.
    pub fn process_next(&self, ctx: &mut DriverContext) -> Result<()> {
        let rsp = self.read_header()?;
        self.process(ctx, &rsp)
    }
}
