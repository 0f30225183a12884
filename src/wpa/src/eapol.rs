use crate::consts::*;
use bitflags::bitflags;
use log::debug;

bitflags! {
    /// key information field of an EAPOL-Key frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyInformation: u16 {
        const DESCRIPTOR_VERSION = 0x0007;
        const PAIRWISE = 0x0008;
        const INSTALL = 0x0040;
        const ACK = 0x0080;
        const MIC = 0x0100;
        const SECURE = 0x0200;
        const ERROR = 0x0400;
        const REQUEST = 0x0800;
        const ENCRYPTED_KEY_DATA = 0x1000;
        const SMK_MESSAGE = 0x2000;
    }
}

impl KeyInformation {
    /// 1: HMAC-MD5/RC4, 2: HMAC-SHA1/AES, 3: AES-CMAC
    pub fn descriptor_version(&self) -> u8 {
        (self.bits() & Self::DESCRIPTOR_VERSION.bits()) as u8
    }
}

/// zero-copy view over an EAPOL PDU
/// ## Description
/// Covers exactly the header and the `length` bytes of body the header
/// declares; anything trailing the PDU (FCS, padding) is left out.
#[derive(Debug, Clone, Copy)]
pub struct EapolPacketView<'a> {
    pdu: &'a [u8],
}

impl<'a> EapolPacketView<'a> {
    /// Returns `None` if the buffer is shorter than the declared PDU.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        let header = data.get(..EAPOL_HEADER_LENGTH)?;
        let length = u16::from_be_bytes([header[2], header[3]]) as usize;
        let pdu = data.get(..EAPOL_HEADER_LENGTH + length)?;
        Some(EapolPacketView { pdu })
    }

    pub fn version(&self) -> u8 {
        self.pdu[0]
    }

    pub fn packet_type(&self) -> u8 {
        self.pdu[1]
    }

    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.pdu[2], self.pdu[3]])
    }

    pub fn packet_body(&self) -> &'a [u8] {
        &self.pdu[EAPOL_HEADER_LENGTH..]
    }

    /// header and body
    pub fn pdu(&self) -> &'a [u8] {
        self.pdu
    }
}

/// zero-copy view over an EAPOL-Key message
/// ## Description
/// The body is guaranteed to hold every fixed field up to and including
/// the key data length. The key data itself is only bounds-checked when
/// it is asked for.
#[derive(Debug, Clone, Copy)]
pub struct EapolKeyView<'a> {
    pdu: &'a [u8],
}

impl<'a> EapolKeyView<'a> {
    fn body(&self) -> &'a [u8] {
        &self.pdu[EAPOL_HEADER_LENGTH..]
    }

    fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.body()[offset..offset + N]);
        out
    }

    pub fn descriptor_type(&self) -> u8 {
        self.body()[KEY_DESCRIPTOR_TYPE_OFFSET]
    }

    pub fn key_information(&self) -> KeyInformation {
        KeyInformation::from_bits_retain(u16::from_be_bytes(self.array(KEY_INFORMATION_OFFSET)))
    }

    pub fn encrypted_key_data(&self) -> bool {
        self.key_information().contains(KeyInformation::ENCRYPTED_KEY_DATA)
    }

    pub fn key_length(&self) -> u16 {
        u16::from_be_bytes(self.array(KEY_LENGTH_OFFSET))
    }

    pub fn replay_counter(&self) -> u64 {
        u64::from_be_bytes(self.array(KEY_REPLAY_COUNTER_OFFSET))
    }

    pub fn key_nonce(&self) -> [u8; KEY_NONCE_LENGTH] {
        self.array(KEY_NONCE_OFFSET)
    }

    pub fn key_mic(&self) -> [u8; KEY_MIC_LENGTH] {
        self.array(KEY_MIC_OFFSET)
    }

    pub fn key_data_length(&self) -> u16 {
        u16::from_be_bytes(self.array(KEY_DATA_LENGTH_OFFSET))
    }

    /// `None` when the declared key data length runs past the message
    pub fn key_data(&self) -> Option<&'a [u8]> {
        let length = self.key_data_length() as usize;
        self.body().get(KEY_DATA_OFFSET..KEY_DATA_OFFSET + length)
    }

    /// the whole EAPOL PDU, as stored in hccapx records
    pub fn pdu(&self) -> &'a [u8] {
        self.pdu
    }
}

/// Parses an EAPOL-Key message from an EAPOL packet
/// ## Description
/// Returns `None` for any other packet type, and for key messages too
/// short to hold the fixed EAPOL-Key fields.
pub fn as_key_packet<'a>(eapol: &EapolPacketView<'a>) -> Option<EapolKeyView<'a>> {
    if eapol.packet_type() != EAPOL_KEY {
        debug!("not an EAPOL-Key packet (type {})", eapol.packet_type());
        return None;
    }
    if eapol.packet_body().len() < KEY_DATA_OFFSET {
        debug!("EAPOL-Key body too short ({} bytes)", eapol.packet_body().len());
        return None;
    }
    Some(EapolKeyView { pdu: eapol.pdu() })
}
