//! # mt7697-wmi
//!
//! Host-side WMI protocol engine for the MT7697 WiFi co-processor.
//!
//! The firmware talks to the host over a pair of word-granular queues. This
//! crate builds the requests the host sends, validates every response and
//! indication the firmware pushes back, and turns them into driver state
//! changes and calls into the host's wireless stack.
//!
//! ## Features
//!
//! - Word-aligned frame codec with strict length validation
//! - Closed set of inbound message kinds dispatched by exhaustive match
//! - Per-interface connection state machine and scan bookkeeping
//! - Pluggable transport and wireless stack through traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mt7697_wmi::{Cfg80211, DriverContext, LoopbackTransport, Port, Wmi, WmiConfig};
//!
//! fn run<C: Cfg80211>(cfg80211: Arc<C>) -> Result<(), mt7697_wmi::Error> {
//!     let transport = Arc::new(LoopbackTransport::new());
//!     let wmi = Wmi::new(transport, cfg80211, WmiConfig::default());
//!     let mut ctx = DriverContext::new();
//!
//!     // Ask for the station MAC; the response creates the default interface.
//!     wmi.commands().get_mac_addr(Port::Sta)?;
//!     wmi.process_next(&mut ctx)?;
//!
//!     println!("MAC: {}", ctx.mac_addr);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`protocol`] - Command types, frame headers, request encoding and config parsing
//! - [`types`] - MAC addresses, keys, WiFi configuration and 802.11 helpers
//! - [`transport`] - Queue transport trait and an in-memory loopback
//! - [`commands`] - Request builders writing to the transmit queue
//! - [`event`] - Response classification and per-command handlers
//! - [`interface`] - Per-interface connection state
//! - [`context`] - Driver-wide state shared by the handlers
//! - [`cfg80211`] - The wireless stack the engine reports to
//! - [`client`] - The [`Wmi`] engine tying it together

pub mod cfg80211;
pub mod client;
pub mod commands;
pub mod context;
pub mod error;
pub mod event;
pub mod interface;
pub mod protocol;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use cfg80211::{BssHandle, Cfg80211, InterfaceType};
pub use client::{Wmi, WmiConfig};
pub use commands::CommandHandler;
pub use context::DriverContext;
pub use error::{Error, FrameError, Result, TransportError};
pub use event::{EventDispatcher, Response};
pub use interface::{ScanRequest, SmeState, Vif, VifFlags};
pub use protocol::{CommandGroup, CommandType, OpMode, Port, RadioState, Request, ResponseHeader};
pub use transport::{LoopbackTransport, QueueHandle, Transport};
pub use types::{
    ApConfig, Band, Channel, MacAddr, Psk, SecurityMode, StaConfig, StatusCode, WifiConfig,
};
