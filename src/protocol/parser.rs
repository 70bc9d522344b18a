//! Payload parsing utilities for the WMI protocol.
//!
//! Headers are decoded by [`crate::protocol::frame`]; this module decodes
//! payload bodies once their words have been read.

use bytes::Buf;

use crate::error::{Error, Result};
use crate::protocol::layout::{
    AP_CONFIG_OFFSET, ETH_ALEN, MAX_PASSPHRASE_LEN, MAX_SSID_LEN, STA_CONFIG_OFFSET,
    WIFI_CONFIG_LEN,
};
use crate::types::{ApConfig, MacAddr, SecurityMode, StaConfig, WifiConfig};

/// Checks a length byte against its bound.
fn check_len(field: &'static str, len: u8, max: usize) -> Result<usize> {
    let len = usize::from(len);
    if len > max {
        return Err(Error::Bounds {
            field,
            max,
            actual: len,
        });
    }
    Ok(len)
}

/// Parses the station sub-config.
///
/// Format:
/// ```text
/// [ssid:32] [ssid_len:1] [bssid_present:1] [bssid:6] [passphrase:64]
/// [passphrase_len:1] [pad:3]
/// ```
fn parse_sta_config(data: &[u8]) -> Result<StaConfig> {
    let mut cursor = std::io::Cursor::new(data);

    let mut ssid = [0u8; MAX_SSID_LEN];
    cursor.copy_to_slice(&mut ssid);
    let ssid_len = check_len("sta ssid", cursor.get_u8(), MAX_SSID_LEN)?;
    let bssid_present = cursor.get_u8() != 0;
    let mut bssid = [0u8; ETH_ALEN];
    cursor.copy_to_slice(&mut bssid);
    let mut passphrase = [0u8; MAX_PASSPHRASE_LEN];
    cursor.copy_to_slice(&mut passphrase);
    let passphrase_len = check_len("sta passphrase", cursor.get_u8(), MAX_PASSPHRASE_LEN)?;

    Ok(StaConfig {
        ssid: ssid[..ssid_len].to_vec(),
        bssid: bssid_present.then(|| MacAddr::new(bssid)),
        passphrase: passphrase[..passphrase_len].to_vec(),
    })
}

/// Parses the access point sub-config.
///
/// Format:
/// ```text
/// [ssid:32] [ssid_len:1] [passphrase:64] [passphrase_len:1] [auth_mode:1]
/// [encrypt_type:1] [channel:1] [bandwidth:1] [bandwidth_ext:1] [pad:1]
/// ```
fn parse_ap_config(data: &[u8]) -> Result<ApConfig> {
    let mut cursor = std::io::Cursor::new(data);

    let mut ssid = [0u8; MAX_SSID_LEN];
    cursor.copy_to_slice(&mut ssid);
    let ssid_len = check_len("ap ssid", cursor.get_u8(), MAX_SSID_LEN)?;
    let mut passphrase = [0u8; MAX_PASSPHRASE_LEN];
    cursor.copy_to_slice(&mut passphrase);
    let passphrase_len = check_len("ap passphrase", cursor.get_u8(), MAX_PASSPHRASE_LEN)?;

    Ok(ApConfig {
        ssid: ssid[..ssid_len].to_vec(),
        passphrase: passphrase[..passphrase_len].to_vec(),
        auth_mode: cursor.get_u8(),
        encrypt_type: cursor.get_u8(),
        channel: cursor.get_u8(),
        bandwidth: cursor.get_u8(),
        bandwidth_ext: cursor.get_u8(),
    })
}

/// Parses the WiFi configuration blob.
///
/// Both sub-configs are validated whatever the operation mode says.
///
/// Format:
/// ```text
/// [opmode:1] [pad:3] [sta_config:108] [ap_config:104]
/// ```
pub fn parse_wifi_config(data: &[u8]) -> Result<WifiConfig> {
    if data.len() < WIFI_CONFIG_LEN {
        return Err(Error::Bounds {
            field: "wifi config",
            max: WIFI_CONFIG_LEN,
            actual: data.len(),
        });
    }

    Ok(WifiConfig {
        opmode: data[0],
        sta: parse_sta_config(&data[STA_CONFIG_OFFSET..AP_CONFIG_OFFSET])?,
        ap: parse_ap_config(&data[AP_CONFIG_OFFSET..WIFI_CONFIG_LEN])?,
    })
}

/// Parses a security mode word.
///
/// Format:
/// ```text
/// [auth_mode:1] [encrypt_type:1] [pad:2]
/// ```
#[must_use]
pub fn parse_security_mode(word: u32) -> SecurityMode {
    let [auth_mode, encrypt_type, _, _] = word.to_ne_bytes();
    SecurityMode {
        auth_mode,
        encrypt_type,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::wifi_config_blob;
    use super::*;
    use crate::protocol::command::OpMode;

    #[test]
    fn test_parse_wifi_config() {
        let blob = wifi_config_blob(b"home", 8, b"mt7697-ap", 12);
        let config = parse_wifi_config(&blob).unwrap();

        assert_eq!(config.op_mode(), Some(OpMode::Repeater));
        assert_eq!(config.sta.ssid, b"home");
        assert_eq!(
            config.sta.bssid,
            Some(MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
        );
        assert_eq!(config.sta.passphrase, b"pppppppp");
        assert_eq!(config.ap.ssid, b"mt7697-ap");
        assert_eq!(config.ap.passphrase, b"qqqqqqqqqqqq");
        assert_eq!(config.ap.auth_mode, 2);
        assert_eq!(config.ap.encrypt_type, 4);
        assert_eq!(config.ap.channel, 7);
        assert_eq!(config.ap.bandwidth, 1);
        assert_eq!(config.ap.bandwidth_ext, 2);
    }

    #[test]
    fn test_ssid_boundary_sta() {
        assert!(parse_wifi_config(&wifi_config_blob(&[b's'; 32], 0, b"", 0)).is_ok());
        let err = parse_wifi_config(&wifi_config_blob(&[b's'; 33], 0, b"", 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::Bounds {
                field: "sta ssid",
                max: 32,
                actual: 33
            }
        ));
    }

    #[test]
    fn test_ssid_boundary_ap() {
        assert!(parse_wifi_config(&wifi_config_blob(b"", 0, &[b'a'; 32], 0)).is_ok());
        let err = parse_wifi_config(&wifi_config_blob(b"", 0, &[b'a'; 33], 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::Bounds {
                field: "ap ssid",
                max: 32,
                actual: 33
            }
        ));
    }

    #[test]
    fn test_passphrase_boundary_sta() {
        assert!(parse_wifi_config(&wifi_config_blob(b"", 64, b"", 0)).is_ok());
        let err = parse_wifi_config(&wifi_config_blob(b"", 65, b"", 0)).unwrap_err();
        assert!(matches!(
            err,
            Error::Bounds {
                field: "sta passphrase",
                max: 64,
                actual: 65
            }
        ));
    }

    #[test]
    fn test_passphrase_boundary_ap() {
        let config = parse_wifi_config(&wifi_config_blob(b"", 0, b"", 64)).unwrap();
        assert_eq!(config.ap.passphrase.len(), 64);
        let err = parse_wifi_config(&wifi_config_blob(b"", 0, b"", 65)).unwrap_err();
        assert!(matches!(
            err,
            Error::Bounds {
                field: "ap passphrase",
                max: 64,
                actual: 65
            }
        ));
    }

    #[test]
    fn test_short_blob_rejected() {
        assert!(parse_wifi_config(&[0u8; 100]).is_err());
    }

    #[test]
    fn test_parse_security_mode() {
        let word = u32::from_ne_bytes([7, 4, 0, 0]);
        let mode = parse_security_mode(word);
        assert_eq!(mode.auth_mode, 7);
        assert_eq!(mode.encrypt_type, 4);
    }
}
