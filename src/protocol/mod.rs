//! Protocol definitions for WMI communication.
//!
//! This module contains the low-level protocol types including:
//! - Command groups and types
//! - Frame headers and word conversion
//! - Exact frame layouts
//! - Request encoding
//! - Payload parsing

pub mod command;
pub mod frame;
pub mod layout;
pub mod parser;
pub mod request;

pub use command::{CommandGroup, CommandType, OpMode, Port, RadioState, ScanMode, ScanOption};
pub use frame::{CommandHeader, RSP_HDR_WORDS, ResponseHeader, encode_response};
pub use layout::{len_to_words, len32_aligned};
pub use parser::{parse_security_mode, parse_wifi_config};
pub use request::{Request, encode_tx_raw, tx_raw_len};
