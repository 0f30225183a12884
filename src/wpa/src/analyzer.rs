use crate::eapol::as_key_packet;
use crate::frame::{accepts, extract_eapol, MacHeaderView, RawFrame};
use crate::pmkid::{self, PmkidCapture};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::mpsc::Sender;

/// what the analyzer looks for in the captured EAPOL-Key frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Handshake,
    Pmkid,
}

/// search mode and target BSSID of one capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub search_mode: SearchMode,
    #[serde(serialize_with = "serialize_mac", deserialize_with = "deserialize_mac")]
    pub bssid: [u8; 6],
}

fn serialize_mac<S: Serializer>(mac: &[u8; 6], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&aux::mac_to_string(mac))
}

fn deserialize_mac<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 6], D::Error> {
    let mac = String::deserialize(deserializer)?;
    aux::parse_mac(&mac).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Disarmed,
    Armed(CaptureConfig),
}

/// artifacts published by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerEvent {
    /// an owned copy of a frame carrying an EAPOL-Key message
    HandshakeFrame(Vec<u8>),
    Pmkid(PmkidCapture),
}

/// where the analyzer publishes its events
pub trait EventSink {
    fn publish(&self, event: AnalyzerEvent);
}

impl EventSink for Sender<AnalyzerEvent> {
    fn publish(&self, event: AnalyzerEvent) {
        if self.send(event).is_err() {
            warn!("event receiver disconnected, dropping event");
        }
    }
}

/// what happened to a frame handed to the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVerdict {
    Disarmed,
    BssidMismatch,
    NotEapol,
    NotEapolKey,
    NoPmkid,
    HandshakeFrameFound,
    PmkidFound(usize),
}

/// per-frame entry point of the pipeline
/// ## Description
/// Holds the capture state and the sink events go to. Handling a frame
/// only reads the state, so frames may be handled from any number of
/// threads while the analyzer is shared; arming and disarming need
/// exclusive access.
/// ## Example
/// **Basic usage:**
/// ```
///     let (tx, rx) = std::sync::mpsc::channel();
///     let mut analyzer = wpa::FrameAnalyzer::new(tx);
///     analyzer.capture_start(wpa::CaptureConfig {
///         search_mode: wpa::SearchMode::Pmkid,
///         bssid: [0x02, 0x11, 0x22, 0x33, 0x44, 0x55],
///     });
///     let verdict = analyzer.handle_frame(&wpa::RawFrame::from_bytes(&[0u8; 10]));
///     assert_eq!(wpa::FrameVerdict::BssidMismatch, verdict);
///     assert!(rx.try_recv().is_err());
/// ```
pub struct FrameAnalyzer<S: EventSink> {
    state: CaptureState,
    sink: S,
}

impl<S: EventSink> FrameAnalyzer<S> {
    pub fn new(sink: S) -> Self {
        FrameAnalyzer { state: CaptureState::Disarmed, sink }
    }

    /// Arms the analyzer, replacing any previous configuration.
    pub fn capture_start(&mut self, config: CaptureConfig) {
        info!(
            "capture armed: {:?} on {}",
            config.search_mode,
            aux::mac_to_string(&config.bssid)
        );
        self.state = CaptureState::Armed(config);
    }

    /// Disarms the analyzer. Safe to call when already disarmed.
    pub fn capture_stop(&mut self) {
        if let CaptureState::Armed(_) = self.state {
            info!("capture disarmed");
        }
        self.state = CaptureState::Disarmed;
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, CaptureState::Armed(_))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs one captured frame through the pipeline
    /// ## Description
    /// BSSID filter, EAPOL extraction and EAPOL-Key decoding, then depending
    /// on the search mode either the frame itself or the PMKIDs found in
    /// it are published.
    pub fn handle_frame(&self, frame: &RawFrame) -> FrameVerdict {
        let config = match &self.state {
            CaptureState::Armed(config) => config,
            CaptureState::Disarmed => return FrameVerdict::Disarmed,
        };
        if !accepts(frame, &config.bssid) {
            trace!("not matching BSSIDs");
            return FrameVerdict::BssidMismatch;
        }
        let Some(eapol) = extract_eapol(frame) else {
            trace!("not an EAPOL packet");
            return FrameVerdict::NotEapol;
        };
        let Some(key) = as_key_packet(&eapol) else {
            trace!("not an EAPOL-Key packet");
            return FrameVerdict::NotEapolKey;
        };

        match config.search_mode {
            SearchMode::Handshake => {
                debug!("publishing handshake frame ({} bytes)", frame.bytes().len());
                self.sink.publish(AnalyzerEvent::HandshakeFrame(frame.bytes().to_vec()));
                FrameVerdict::HandshakeFrameFound
            }
            SearchMode::Pmkid => {
                let pmkids = pmkid::extract(&key);
                if pmkids.is_empty() {
                    return FrameVerdict::NoPmkid;
                }
                let count = pmkids.len();
                // extract_eapol already checked the header
                let (mac_ap, mac_sta) = MacHeaderView::parse(frame.bytes())
                    .and_then(|header| header.ap_and_station())
                    .unwrap_or((config.bssid, [0; 6]));
                self.sink.publish(AnalyzerEvent::Pmkid(PmkidCapture { mac_ap, mac_sta, pmkids }));
                FrameVerdict::PmkidFound(count)
            }
        }
    }
}
