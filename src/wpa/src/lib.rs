//! # wpa
//! Wi-Fi Protected Access (WPA) is a security certification program developed
//! by the Wi-Fi Alliance to secure wireless devices networks.
//!
//! `wpa` turns captured 802.11 data frames into key material: it filters
//! frames by BSSID, strips the 802.11 and LLC/SNAP envelopes, decodes the
//! EAPOL-Key messages of the 4-way handshake, extracts PMKIDs and collects
//! handshakes into hccapx records for offline password recovery.
//!
//! Every decoding step is a bounds-checked view over the borrowed capture
//! buffer. Frames that don't fit a step are skipped, never read out of bounds.
mod analyzer;
mod consts;
mod eapol;
mod error;
mod frame;
mod handshake;
mod hccapx;
mod pmkid;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use analyzer::{
    AnalyzerEvent,
    CaptureConfig,
    CaptureState,
    EventSink,
    FrameAnalyzer,
    FrameVerdict,
    SearchMode,
};
pub use eapol::{as_key_packet, EapolKeyView, EapolPacketView, KeyInformation};
pub use error::{HccapxError, Result};
pub use frame::{accepts, extract_eapol, MacHeaderView, RawFrame};
pub use handshake::{HandshakeMessage, HccapxAggregator, SessionState};
pub use hccapx::HccapxRecord;
pub use pmkid::{extract as extract_pmkids, PmkidCapture, PmkidItem};
pub use consts::{HCCAPX_RECORD_LENGTH, HCCAPX_MAX_EAPOL_LENGTH, HCCAPX_MAX_ESSID_LENGTH};

// --------------------------- Public Functions -------------------------------

/// an EAPOL-Key frame together with the pair it was exchanged between
#[derive(Debug, Clone, Copy)]
pub struct HandshakeFrame<'a> {
    pub key: EapolKeyView<'a>,
    pub mac_ap: [u8; 6],
    pub mac_sta: [u8; 6],
}

/// Decodes a handshake frame published by the analyzer
/// ## Description
/// Runs the frame through EAPOL extraction and EAPOL-Key decoding and
/// resolves which address is the AP and which the station, ready to be
/// handed to `HccapxAggregator::add_frame`.
/// ## Example
/// **Basic usage:**
/// ```
///     // two bytes of frame control, no room for a MAC header
///     assert!(wpa::decode_handshake_frame(&[0x88, 0x02]).is_none());
/// ```
pub fn decode_handshake_frame(frame: &[u8]) -> Option<HandshakeFrame<'_>> {
    let raw = RawFrame::from_bytes(frame);
    let eapol = extract_eapol(&raw)?;
    let key = as_key_packet(&eapol)?;
    let (mac_ap, mac_sta) = MacHeaderView::parse(frame)?.ap_and_station()?;
    Some(HandshakeFrame { key, mac_ap, mac_sta })
}
