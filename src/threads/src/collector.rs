/*
*   The file contains the code for the Collector thread.
*/
use crate::ipc::IPCMessage;
use crate::shared::SharedAggregator;
use log::{debug, info, warn};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use wpa::{AnalyzerEvent, HccapxError, PmkidCapture};

type CollectorReceiver = Receiver<IPCMessage<AnalyzerEvent>>;

/// counters of what the collector did with the events it received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectorStats {
    pub handshake_frames: usize,
    pub wrong_station: usize,
    pub rejected: usize,
    pub pmkid_events: usize,
}

/// consumes analyzer events
/// ## Description
/// Handshake frames are decoded again and added to the shared aggregator,
/// PMKID captures are kept in arrival order. The thread runs until it gets
/// `EndCommunication` or every sender is dropped.
pub struct CollectorThread {
    rx: CollectorReceiver,
    aggregator: SharedAggregator,
    pmkids: Vec<PmkidCapture>,
    stats: CollectorStats,
}

impl CollectorThread {
    pub fn init(rx: CollectorReceiver, aggregator: SharedAggregator) -> Self {
        CollectorThread {
            rx,
            aggregator,
            pmkids: vec![],
            stats: CollectorStats::default(),
        }
    }

    /// runs the loop on a new thread, handing the collector back when it ends
    pub fn spawn(mut self) -> JoinHandle<Self> {
        thread::spawn(move || {
            self.run();
            self
        })
    }

    pub fn run(&mut self) {
        loop {
            match self.rx.recv() {
                Ok(IPCMessage::Message(event)) => self.handle_event(event),
                Ok(IPCMessage::EndCommunication) => {
                    debug!("collector asked to stop");
                    return;
                }
                Err(_) => {
                    debug!("all senders gone, collector stopping");
                    return;
                }
            }
        }
    }

    fn handle_event(&mut self, event: AnalyzerEvent) {
        match event {
            AnalyzerEvent::HandshakeFrame(frame) => {
                self.stats.handshake_frames += 1;
                let Some(decoded) = wpa::decode_handshake_frame(&frame) else {
                    warn!("published handshake frame doesn't decode");
                    self.stats.rejected += 1;
                    return;
                };
                match self.aggregator.add_frame(&decoded.key, decoded.mac_ap, decoded.mac_sta) {
                    Ok(message) => {
                        if self.aggregator.is_crackable() {
                            info!("handshake crackable after {}", message);
                        }
                    }
                    Err(HccapxError::WrongStation { .. }) => {
                        self.stats.wrong_station += 1;
                    }
                    Err(err) => {
                        debug!("handshake frame rejected: {}", err);
                        self.stats.rejected += 1;
                    }
                }
            }
            AnalyzerEvent::Pmkid(capture) => {
                self.stats.pmkid_events += 1;
                info!(
                    "{} PMKID(s) from {}",
                    capture.pmkids.len(),
                    aux::mac_to_string(&capture.mac_ap)
                );
                self.pmkids.push(capture);
            }
        }
    }

    pub fn pmkids(&self) -> &[PmkidCapture] {
        &self.pmkids
    }

    pub fn stats(&self) -> CollectorStats {
        self.stats
    }

    pub fn aggregator(&self) -> &SharedAggregator {
        &self.aggregator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use wpa::fixtures::{self, FrameBuilder, KeyFields, AP, OTHER_STA, STA};
    use wpa::{PmkidItem, SessionState};

    fn frame(fields: &KeyFields, from_station: bool, sta: [u8; 6]) -> Vec<u8> {
        let pdu = fixtures::eapol_key_pdu(fields, &[]);
        let builder = if from_station {
            FrameBuilder::from_station(sta, AP)
        } else {
            FrameBuilder::from_ap(AP, sta)
        };
        builder.qos(true).body(&pdu).build()
    }

    #[test]
    fn collects_handshake_and_pmkids() {
        let _ = env_logger::builder().is_test(true).try_init();
        let aggregator = SharedAggregator::new();
        aggregator.start_session(b"TestNet").unwrap();
        let (tx, rx) = channel();
        let handle = CollectorThread::init(rx, aggregator.clone()).spawn();

        let m1 = frame(&KeyFields::m1([0xa0; 32]), false, STA);
        let m2 = frame(&KeyFields::m2([0x5e; 32], [0x22; 16]), true, STA);
        let intruder = frame(&KeyFields::m2([0x77; 32], [0x33; 16]), true, OTHER_STA);
        let capture = PmkidCapture { mac_ap: AP, mac_sta: STA, pmkids: vec![PmkidItem([1; 16])] };

        for event in [
            AnalyzerEvent::HandshakeFrame(m1),
            AnalyzerEvent::HandshakeFrame(m2),
            AnalyzerEvent::HandshakeFrame(intruder),
            AnalyzerEvent::HandshakeFrame(vec![0x08, 0x02, 0x00]),
            AnalyzerEvent::Pmkid(capture.clone()),
        ] {
            tx.send(IPCMessage::Message(event)).unwrap();
        }
        tx.send(IPCMessage::EndCommunication).unwrap();

        let collector = handle.join().unwrap();
        assert_eq!(
            CollectorStats { handshake_frames: 4, wrong_station: 1, rejected: 1, pmkid_events: 1 },
            collector.stats()
        );
        assert_eq!(&[capture], collector.pmkids());

        let record = aggregator.snapshot().unwrap();
        assert_eq!(STA, record.mac_sta);
        assert_eq!([0x5e; 32], record.nonce_sta);
        assert_eq!([0xa0; 32], record.nonce_ap);
        assert_eq!(SessionState::Partial, collector.aggregator().state());
    }

    #[test]
    fn stops_when_senders_are_gone() {
        let (tx, rx) = channel::<IPCMessage<AnalyzerEvent>>();
        let handle = CollectorThread::init(rx, SharedAggregator::new()).spawn();
        drop(tx);
        let collector = handle.join().unwrap();
        assert_eq!(CollectorStats::default(), collector.stats());
    }

    #[test]
    fn frames_without_session_are_rejected() {
        let (tx, rx) = channel();
        let handle = CollectorThread::init(rx, SharedAggregator::new()).spawn();
        let m1 = frame(&KeyFields::m1([0xa0; 32]), false, STA);
        tx.send(IPCMessage::Message(AnalyzerEvent::HandshakeFrame(m1))).unwrap();
        drop(tx);
        let collector = handle.join().unwrap();
        assert_eq!(1, collector.stats().rejected);
        assert!(collector.aggregator().snapshot().is_none());
    }
}
