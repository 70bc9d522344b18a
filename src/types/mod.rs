//! Data types for the WMI engine.
//!
//! This module contains the domain values decoded from or encoded into
//! frames:
//! - Hardware addresses and keys
//! - WiFi configuration
//! - IEEE 802.11 bands, channels and frame control

pub mod config;
pub mod ieee80211;
pub mod mac;

pub use config::{ApConfig, SecurityMode, StaConfig, WifiConfig};
pub use ieee80211::{Band, Channel, StatusCode, channel_to_frequency, frequency_to_channel};
pub use mac::{MacAddr, Psk};
