//! Synthetic capture construction.
//!
//! Builds 802.11 data frames carrying EAPOL-Key messages byte by byte, so
//! the decoding pipeline can be exercised without a radio or a pcap file.
use crate::consts::*;

pub const AP: [u8; 6] = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];
pub const BSSID: [u8; 6] = AP;
pub const STA: [u8; 6] = [0x02, 0xaa, 0xbb, 0xcc, 0xdd, 0xee];
pub const OTHER_STA: [u8; 6] = [0x02, 0xde, 0xad, 0xbe, 0xef, 0x01];

// key information of the 4-way handshake messages, key descriptor version 2
pub const KEY_INFO_M1: u16 = 0x008a;
pub const KEY_INFO_M2: u16 = 0x010a;
pub const KEY_INFO_M3: u16 = 0x13ca;
pub const KEY_INFO_M4: u16 = 0x030a;

const LLC_SNAP: [u8; LLC_SNAP_LENGTH] = [0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00];

/// builder for data frames
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    addr1: [u8; 6],
    addr2: [u8; 6],
    addr3: [u8; 6],
    flags: u8,
    qos: bool,
    ht_control: bool,
    ether_type: u16,
    body: Vec<u8>,
}

impl FrameBuilder {
    /// AP -> STA, FromDS set
    pub fn from_ap(ap: [u8; 6], sta: [u8; 6]) -> Self {
        FrameBuilder::new(sta, ap, ap, FLAG_FROM_DS)
    }

    /// STA -> AP, ToDS set
    pub fn from_station(sta: [u8; 6], ap: [u8; 6]) -> Self {
        FrameBuilder::new(ap, sta, ap, FLAG_TO_DS)
    }

    fn new(addr1: [u8; 6], addr2: [u8; 6], addr3: [u8; 6], flags: u8) -> Self {
        FrameBuilder {
            addr1,
            addr2,
            addr3,
            flags,
            qos: false,
            ht_control: false,
            ether_type: ETHER_TYPE_EAPOL,
            body: vec![],
        }
    }

    pub fn qos(mut self, qos: bool) -> Self {
        self.qos = qos;
        self
    }

    pub fn protected(mut self, protected: bool) -> Self {
        if protected {
            self.flags |= FLAG_PROTECTED;
        } else {
            self.flags &= !FLAG_PROTECTED;
        }
        self
    }

    /// sets the order flag and appends an HT control field (QoS frames only)
    pub fn ht_control(mut self, ht_control: bool) -> Self {
        self.ht_control = ht_control;
        self
    }

    pub fn ether_type(mut self, ether_type: u16) -> Self {
        self.ether_type = ether_type;
        self
    }

    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let subtype: u8 = if self.qos { QOS_SUBTYPE_BIT } else { 0 };
        let mut flags = self.flags;
        if self.qos && self.ht_control {
            flags |= FLAG_ORDER;
        }

        let mut frame = vec![(subtype << 4) | (FRAME_TYPE_DATA << 2), flags];
        frame.extend_from_slice(&[0x3a, 0x01]); // duration
        frame.extend_from_slice(&self.addr1);
        frame.extend_from_slice(&self.addr2);
        frame.extend_from_slice(&self.addr3);
        frame.extend_from_slice(&[0x10, 0x00]); // sequence control
        if self.qos {
            frame.extend_from_slice(&[0x06, 0x00]);
            if self.ht_control {
                frame.extend_from_slice(&[0x00; HT_CONTROL_LENGTH]);
            }
        }
        frame.extend_from_slice(&LLC_SNAP);
        frame.extend_from_slice(&self.ether_type.to_be_bytes());
        frame.extend_from_slice(&self.body);
        frame
    }
}

/// fixed fields of an EAPOL-Key message
#[derive(Debug, Clone)]
pub struct KeyFields {
    pub key_info: u16,
    pub replay_counter: u64,
    pub nonce: [u8; 32],
    pub mic: [u8; 16],
}

impl KeyFields {
    pub fn m1(anonce: [u8; 32]) -> Self {
        KeyFields { key_info: KEY_INFO_M1, replay_counter: 1, nonce: anonce, mic: [0; 16] }
    }

    pub fn m2(snonce: [u8; 32], mic: [u8; 16]) -> Self {
        KeyFields { key_info: KEY_INFO_M2, replay_counter: 1, nonce: snonce, mic }
    }

    pub fn m3(anonce: [u8; 32], mic: [u8; 16]) -> Self {
        KeyFields { key_info: KEY_INFO_M3, replay_counter: 2, nonce: anonce, mic }
    }

    pub fn m4(mic: [u8; 16]) -> Self {
        KeyFields { key_info: KEY_INFO_M4, replay_counter: 2, nonce: [0; 32], mic }
    }
}

/// Builds a whole EAPOL PDU (header + EAPOL-Key body) with the given key data.
pub fn eapol_key_pdu(fields: &KeyFields, key_data: &[u8]) -> Vec<u8> {
    let body_len = KEY_DATA_OFFSET + key_data.len();
    let mut pdu = vec![0x02, EAPOL_KEY];
    pdu.extend_from_slice(&(body_len as u16).to_be_bytes());
    pdu.push(0x02); // RSN key descriptor
    pdu.extend_from_slice(&fields.key_info.to_be_bytes());
    pdu.extend_from_slice(&16u16.to_be_bytes());
    pdu.extend_from_slice(&fields.replay_counter.to_be_bytes());
    pdu.extend_from_slice(&fields.nonce);
    pdu.extend_from_slice(&[0u8; 16]); // key iv
    pdu.extend_from_slice(&[0u8; 8]); // key rsc
    pdu.extend_from_slice(&[0u8; 8]); // key id
    pdu.extend_from_slice(&fields.mic);
    pdu.extend_from_slice(&(key_data.len() as u16).to_be_bytes());
    pdu.extend_from_slice(key_data);
    pdu
}

/// a PMKID KDE as carried in message 1
pub fn pmkid_kde(pmkid: &[u8; PMKID_LENGTH]) -> Vec<u8> {
    let mut kde = vec![KEY_DATA_TYPE, (KEY_DATA_KDE_HEADER_LENGTH + PMKID_LENGTH) as u8];
    kde.extend_from_slice(&KEY_DATA_OUI_IEEE80211);
    kde.push(KEY_DATA_DATA_TYPE_PMKID_KDE);
    kde.extend_from_slice(pmkid);
    kde
}
