//! # keysift
//! Capture-to-evidence pipeline of a WiFi auditing tool.
//!
//! Raw 802.11 frames handed over by a capture component go through the
//! BSSID filter, the EAPOL and EAPOL-Key decoders, and then either the
//! PMKID extractor or the handshake aggregator, depending on the search
//! mode. The result is an hccapx record or a set of PMKIDs ready for
//! offline password recovery.
//!
//! The workspace crates are re-exported as they are; [`Pipeline`] wires
//! them together with a collector thread.
use log::info;
use std::sync::mpsc::channel;
use std::thread::JoinHandle;
use threads::{CollectorStats, CollectorThread, IpcSink, SharedAggregator};
use wpa::{CaptureConfig, FrameAnalyzer, FrameVerdict, HccapxRecord, PmkidCapture, RawFrame};

pub use aux;
pub use crypto;
pub use threads;
pub use wpa;

/// everything a finished capture produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub essid: Vec<u8>,
    pub record: Option<HccapxRecord>,
    /// the record holds an AP nonce and a MIC protected STA message
    pub crackable: bool,
    pub pmkids: Vec<PmkidCapture>,
    pub stats: CollectorStats,
}

impl PipelineReport {
    /// hashcat mode 22000 lines for the PMKIDs and, when asked for, the handshake
    /// ## Description
    /// A record missing either side of the handshake has nothing to crack
    /// and is never exported.
    pub fn to_hashcat_22000(&self, include_handshake: bool) -> Vec<String> {
        let mut lines: Vec<String> = self
            .pmkids
            .iter()
            .flat_map(|capture| capture.to_hashcat_22000(&self.essid))
            .collect();
        if include_handshake && self.crackable {
            if let Some(record) = &self.record {
                lines.push(record.to_hashcat_22000());
            }
        }
        lines
    }
}

/// an armed analyzer feeding a collector thread
/// ## Description
/// Frames are handled on the caller's thread. Handshake frames and PMKIDs
/// travel over an IPC channel to the collector, which owns the writes to
/// the shared aggregator; `aggregator()` gives readers consistent snapshots
/// while the capture runs.
/// ## Example
/// **Basic usage:**
/// ```
///     use keysift::wpa::{self, fixtures::{self, FrameBuilder, KeyFields, AP, STA}};
///     let config = wpa::CaptureConfig { search_mode: wpa::SearchMode::Handshake, bssid: AP };
///     let pipeline = keysift::Pipeline::start(config, b"TestNet").unwrap();
///     let pdu = fixtures::eapol_key_pdu(&KeyFields::m1([0x11; 32]), &[]);
///     let frame = FrameBuilder::from_ap(AP, STA).body(&pdu).build();
///     pipeline.handle_frame(&wpa::RawFrame::from_bytes(&frame));
///     let report = pipeline.finish();
///     assert_eq!([0x11; 32], report.record.unwrap().nonce_ap);
/// ```
pub struct Pipeline {
    essid: Vec<u8>,
    analyzer: FrameAnalyzer<IpcSink>,
    aggregator: SharedAggregator,
    collector: JoinHandle<CollectorThread>,
}

impl Pipeline {
    /// Starts a handshake session for `essid` and arms the analyzer.
    pub fn start(config: CaptureConfig, essid: &[u8]) -> wpa::Result<Self> {
        let aggregator = SharedAggregator::new();
        aggregator.start_session(essid)?;
        let (tx, rx) = channel();
        let collector = CollectorThread::init(rx, aggregator.clone()).spawn();
        let mut analyzer = FrameAnalyzer::new(IpcSink::new(tx));
        analyzer.capture_start(config);
        Ok(Pipeline {
            essid: essid.to_vec(),
            analyzer,
            aggregator,
            collector,
        })
    }

    pub fn handle_frame(&self, frame: &RawFrame) -> FrameVerdict {
        self.analyzer.handle_frame(frame)
    }

    pub fn aggregator(&self) -> &SharedAggregator {
        &self.aggregator
    }

    /// Disarms the analyzer, drains the collector and ends the session.
    pub fn finish(mut self) -> PipelineReport {
        self.analyzer.capture_stop();
        self.analyzer.sink().end_communication();
        let collector = match self.collector.join() {
            Ok(collector) => collector,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        let crackable = self.aggregator.is_crackable();
        let record = self.aggregator.end_session();
        let stats = collector.stats();
        info!(
            "capture finished: {} handshake frame(s), {} PMKID event(s)",
            stats.handshake_frames, stats.pmkid_events
        );
        PipelineReport {
            essid: self.essid,
            record,
            crackable,
            pmkids: collector.pmkids().to_vec(),
            stats,
        }
    }
}
