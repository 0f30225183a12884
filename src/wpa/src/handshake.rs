use crate::consts::*;
use crate::eapol::{EapolKeyView, KeyInformation};
use crate::error::{HccapxError, Result};
use crate::hccapx::HccapxRecord;
use core::fmt;
use log::{info, warn};

/// the four messages of the 4-way handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandshakeMessage {
    M1,
    M2,
    M3,
    M4,
}

impl HandshakeMessage {
    /// Identifies the handshake message from the key information flags.
    /// Group key and request messages are not part of the 4-way handshake.
    pub fn identify(info: KeyInformation) -> Option<HandshakeMessage> {
        if !info.contains(KeyInformation::PAIRWISE) || info.contains(KeyInformation::REQUEST) {
            return None;
        }
        let ack = info.contains(KeyInformation::ACK);
        let mic = info.contains(KeyInformation::MIC);
        match (ack, mic) {
            (true, false) => Some(HandshakeMessage::M1),
            (true, true) => Some(HandshakeMessage::M3),
            (false, true) if info.contains(KeyInformation::SECURE) => Some(HandshakeMessage::M4),
            (false, true) => Some(HandshakeMessage::M2),
            (false, false) => None,
        }
    }

    /// M1 and M3 are sent by the AP
    pub fn from_ap(&self) -> bool {
        matches!(self, HandshakeMessage::M1 | HandshakeMessage::M3)
    }
}

impl fmt::Display for HandshakeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            HandshakeMessage::M1 => 1,
            HandshakeMessage::M2 => 2,
            HandshakeMessage::M3 => 3,
            HandshakeMessage::M4 => 4,
        };
        write!(f, "M{}", n)
    }
}

/// lifecycle of the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    /// ESSID bound, no frame accepted yet
    Empty,
    /// station bound, some messages captured
    Partial,
}

#[derive(Debug, Clone)]
struct Session {
    record: HccapxRecord,
    station: Option<[u8; 6]>,
    // message the AP nonce came from
    ap_message: Option<HandshakeMessage>,
    // message the MIC and EAPOL came from
    sta_message: Option<HandshakeMessage>,
    captured: Vec<HandshakeMessage>,
}

impl Session {
    fn message_pair(&self) -> u8 {
        use HandshakeMessage::*;
        match (self.ap_message, self.sta_message) {
            (Some(M3), Some(M4)) => MESSAGE_PAIR_M3_M4,
            (Some(M3), _) => MESSAGE_PAIR_M3_M2,
            (_, Some(M4)) => MESSAGE_PAIR_M1_M4,
            _ => MESSAGE_PAIR_M1_M2,
        }
    }
}

/// accumulates the handshake of one AP/STA pair into a hccapx record
/// ## Description
/// A session is started for one ESSID. The first accepted frame binds the
/// station; frames of any other station are rejected until the session is
/// restarted. Every bound check runs before the record is touched, so a
/// rejected frame never leaves a partial update behind.
/// ## Example
/// **Basic usage:**
/// ```
///     let mut aggregator = wpa::HccapxAggregator::new();
///     aggregator.start_session(b"TestNet").unwrap();
///     let record = aggregator.get_record().unwrap();
///     assert_eq!(b"TestNet", record.essid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HccapxAggregator {
    session: Option<Session>,
}

impl HccapxAggregator {
    pub fn new() -> Self {
        HccapxAggregator { session: None }
    }

    /// Starts a new session for `essid`, discarding the previous record.
    /// An over-long ESSID is rejected and the current session is kept.
    pub fn start_session(&mut self, essid: &[u8]) -> Result<()> {
        let record = HccapxRecord::new(essid)?;
        info!("handshake session started for ESSID {}", String::from_utf8_lossy(essid));
        self.session = Some(Session {
            record,
            station: None,
            ap_message: None,
            sta_message: None,
            captured: vec![],
        });
        Ok(())
    }

    /// Ends the session, returning the last record.
    pub fn end_session(&mut self) -> Option<HccapxRecord> {
        self.session.take().map(|session| session.record)
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Uninitialized,
            Some(session) if session.station.is_none() => SessionState::Empty,
            Some(_) => SessionState::Partial,
        }
    }

    /// the bound station, if any
    pub fn station(&self) -> Option<[u8; 6]> {
        self.session.as_ref().and_then(|session| session.station)
    }

    /// handshake messages accepted so far, in arrival order
    pub fn captured_messages(&self) -> Vec<HandshakeMessage> {
        self.session
            .as_ref()
            .map(|session| session.captured.clone())
            .unwrap_or_default()
    }

    /// true once both an AP nonce and a MIC protected STA message are present
    pub fn is_crackable(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.ap_message.is_some() && session.sta_message.is_some())
    }

    /// a copy of the current record, complete or not
    pub fn get_record(&self) -> Option<HccapxRecord> {
        self.session.as_ref().map(|session| session.record)
    }

    /// Adds an EAPOL-Key handshake frame to the current record
    /// ## Description
    /// The AP nonce is taken from M1 (or M3 when no M1 was seen), the MIC
    /// and EAPOL from M2 (or M4 when no M2 was seen). The STA nonce comes
    /// from M2, or from M4 when that one carries a non-zero nonce.
    pub fn add_frame(
        &mut self,
        key: &EapolKeyView,
        mac_ap: [u8; 6],
        mac_sta: [u8; 6],
    ) -> Result<HandshakeMessage> {
        let session = self.session.as_mut().ok_or(HccapxError::NoSession)?;

        if let Some(bound) = session.station {
            if bound != mac_sta {
                warn!(
                    "skipping handshake frame from {}, session bound to {}",
                    aux::mac_to_string(&mac_sta),
                    aux::mac_to_string(&bound)
                );
                return Err(HccapxError::WrongStation { bound, got: mac_sta });
            }
        }
        let message = HandshakeMessage::identify(key.key_information())
            .ok_or(HccapxError::NotHandshakeMessage)?;
        let pdu = key.pdu();
        if pdu.len() > HCCAPX_MAX_EAPOL_LENGTH {
            return Err(HccapxError::EapolTooLong(pdu.len()));
        }

        // every check passed, update the record
        session.station = Some(mac_sta);
        session.record.mac_ap = mac_ap;
        session.record.mac_sta = mac_sta;

        let keyver = key.key_information().descriptor_version();
        match message {
            HandshakeMessage::M1 | HandshakeMessage::M3 => {
                let replaces = message == HandshakeMessage::M1
                    || session.ap_message != Some(HandshakeMessage::M1);
                if replaces {
                    session.record.nonce_ap = key.key_nonce();
                    session.ap_message = Some(message);
                }
                if session.sta_message.is_none() {
                    session.record.keyver = keyver;
                }
            }
            HandshakeMessage::M2 | HandshakeMessage::M4 => {
                let replaces = message == HandshakeMessage::M2
                    || session.sta_message != Some(HandshakeMessage::M2);
                if replaces {
                    session.record.store_eapol(pdu);
                    session.record.keymic = key.key_mic();
                    session.record.keyver = keyver;
                    let nonce = key.key_nonce();
                    if message == HandshakeMessage::M2 || !aux::is_zeroed(&nonce) {
                        session.record.nonce_sta = nonce;
                    }
                    session.sta_message = Some(message);
                }
            }
        }
        session.captured.push(message);
        session.record.message_pair = session.message_pair();

        info!(
            "handshake {} recorded for {} (message pair {})",
            message,
            aux::mac_to_string(&mac_sta),
            session.record.message_pair
        );
        Ok(message)
    }
}
