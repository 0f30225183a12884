//! # aux
//! `aux` is a collection of utilities to help handling MAC addresses
//! and other small byte arrays more conveniently.

use thiserror::Error;

pub const MAC_LEN: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum MacParseError {
    #[error("invalid MAC address length: expected 12 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex in MAC address: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

// ---------------------------- Aux Functions ---------------------------------

/// Parses a MAC address string
/// ## Description
/// Accepts both the plain form (`AABBCCDDEEFF`) and the separated forms
/// (`aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff`). Hex digits are case insensitive.
/// ## Example
/// **Basic usage:**
/// ```
///     let mac = aux::parse_mac("aa:bb:cc:dd:ee:ff").unwrap();
///     assert_eq!([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff], mac);
/// ```
pub fn parse_mac(mac: &str) -> Result<[u8; MAC_LEN], MacParseError> {
    let digits: String = mac
        .trim()
        .chars()
        .filter(|c| *c != ':' && *c != '-')
        .collect();
    if digits.len() != MAC_LEN * 2 {
        return Err(MacParseError::InvalidLength(digits.len()));
    }
    let mut out = [0u8; MAC_LEN];
    hex::decode_to_slice(&digits, &mut out)?;
    Ok(out)
}

/// Formats a MAC address as colon separated lowercase hex
/// ## Example
/// **Basic usage:**
/// ```
///     let mac = aux::mac_to_string(&[0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22]);
///     assert_eq!("aa:bb:cc:00:11:22", mac);
/// ```
pub fn mac_to_string(mac: &[u8; MAC_LEN]) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<String>>()
        .join(":")
}

/// Checks if a MAC address is a group (multicast or broadcast) address
pub fn is_group_mac(mac: &[u8; MAC_LEN]) -> bool {
    mac[0] & 0x01 == 0x01
}

/// Checks if every byte of the given buffer is zero
/// ## Description
/// Used to tell apart nonces that were actually sent from zeroed placeholders.
pub fn is_zeroed(buf: &[u8]) -> bool {
    buf.iter().all(|b| *b == 0)
}
