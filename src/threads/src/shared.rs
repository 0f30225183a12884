use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use wpa::{EapolKeyView, HandshakeMessage, HccapxAggregator, HccapxRecord, Result, SessionState};

/// aggregator shared between the frame handling thread and readers
/// ## Description
/// Mutations hold the write lock for their whole duration and readers
/// get copies taken under the read lock, so a snapshot never shows a
/// half applied frame. A poisoned lock is recovered.
#[derive(Debug, Clone, Default)]
pub struct SharedAggregator {
    inner: Arc<RwLock<HccapxAggregator>>,
}

impl SharedAggregator {
    pub fn new() -> Self {
        SharedAggregator::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HccapxAggregator> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HccapxAggregator> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_session(&self, essid: &[u8]) -> Result<()> {
        self.write().start_session(essid)
    }

    pub fn end_session(&self) -> Option<HccapxRecord> {
        self.write().end_session()
    }

    pub fn add_frame(
        &self,
        key: &EapolKeyView,
        mac_ap: [u8; 6],
        mac_sta: [u8; 6],
    ) -> Result<HandshakeMessage> {
        self.write().add_frame(key, mac_ap, mac_sta)
    }

    pub fn snapshot(&self) -> Option<HccapxRecord> {
        self.read().get_record()
    }

    pub fn state(&self) -> SessionState {
        self.read().state()
    }

    pub fn is_crackable(&self) -> bool {
        self.read().is_crackable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use wpa::fixtures::{self, FrameBuilder, KeyFields, AP, STA};

    #[test]
    fn readers_see_whole_updates() {
        let shared = SharedAggregator::new();
        shared.start_session(b"TestNet").unwrap();

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..200u8 {
                    let pdu = fixtures::eapol_key_pdu(&KeyFields::m2([i; 32], [i; 16]), &[]);
                    let frame = FrameBuilder::from_station(STA, AP).body(&pdu).build();
                    let decoded = wpa::decode_handshake_frame(&frame).unwrap();
                    shared.add_frame(&decoded.key, decoded.mac_ap, decoded.mac_sta).unwrap();
                }
            })
        };
        for _ in 0..200 {
            let record = shared.snapshot().unwrap();
            // nonce and MIC always come from the same frame
            assert_eq!(record.nonce_sta[0], record.keymic[0]);
        }
        writer.join().unwrap();
        assert_eq!([199; 16], shared.snapshot().unwrap().keymic);
    }
}
