use crate::consts::*;
use crate::error::{HccapxError, Result};

/// HCCAPX record as consumed by hashcat
/// ## Description
/// Serialized as a packed 393 byte structure, multi-byte integers in
/// little endian. Only the first `essid_len` bytes of `essid` and the
/// first `eapol_len` bytes of `eapol` are meaningful.
///
/// See <https://hashcat.net/wiki/doku.php?id=hccapx>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HccapxRecord {
    pub signature: u32,
    pub version: u32,
    pub message_pair: u8,
    pub essid_len: u8,
    pub essid: [u8; HCCAPX_MAX_ESSID_LENGTH],
    pub keyver: u8,
    pub keymic: [u8; 16],
    pub mac_ap: [u8; 6],
    pub nonce_ap: [u8; 32],
    pub mac_sta: [u8; 6],
    pub nonce_sta: [u8; 32],
    pub eapol_len: u16,
    pub eapol: [u8; HCCAPX_MAX_EAPOL_LENGTH],
}

/// sequential writer over the fixed record buffer
struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

/// sequential reader, the caller checks the total length up front
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}

impl HccapxRecord {
    /// An empty record bound to `essid`.
    pub fn new(essid: &[u8]) -> Result<Self> {
        if essid.len() > HCCAPX_MAX_ESSID_LENGTH {
            return Err(HccapxError::EssidTooLong(essid.len()));
        }
        let mut record = HccapxRecord {
            signature: HCCAPX_SIGNATURE,
            version: HCCAPX_VERSION,
            message_pair: MESSAGE_PAIR_M1_M2,
            essid_len: essid.len() as u8,
            essid: [0; HCCAPX_MAX_ESSID_LENGTH],
            keyver: 0,
            keymic: [0; 16],
            mac_ap: [0; 6],
            nonce_ap: [0; 32],
            mac_sta: [0; 6],
            nonce_sta: [0; 32],
            eapol_len: 0,
            eapol: [0; HCCAPX_MAX_EAPOL_LENGTH],
        };
        record.essid[..essid.len()].copy_from_slice(essid);
        Ok(record)
    }

    pub fn essid(&self) -> &[u8] {
        &self.essid[..(self.essid_len as usize).min(HCCAPX_MAX_ESSID_LENGTH)]
    }

    pub fn eapol(&self) -> &[u8] {
        &self.eapol[..(self.eapol_len as usize).min(HCCAPX_MAX_EAPOL_LENGTH)]
    }

    /// Stores an EAPOL PDU with its MIC field zeroed, the form the MIC is computed over.
    /// A PDU longer than the EAPOL buffer is rejected and the record is left as is.
    pub fn set_eapol(&mut self, pdu: &[u8]) -> Result<()> {
        if pdu.len() > HCCAPX_MAX_EAPOL_LENGTH {
            return Err(HccapxError::EapolTooLong(pdu.len()));
        }
        self.store_eapol(pdu);
        Ok(())
    }

    // `pdu` must fit the EAPOL buffer
    pub(crate) fn store_eapol(&mut self, pdu: &[u8]) {
        debug_assert!(pdu.len() <= HCCAPX_MAX_EAPOL_LENGTH);
        self.eapol = [0; HCCAPX_MAX_EAPOL_LENGTH];
        self.eapol[..pdu.len()].copy_from_slice(pdu);
        let mic = EAPOL_HEADER_LENGTH + KEY_MIC_OFFSET;
        if pdu.len() >= mic + KEY_MIC_LENGTH {
            self.eapol[mic..mic + KEY_MIC_LENGTH].fill(0);
        }
        self.eapol_len = pdu.len() as u16;
    }

    pub fn to_bytes(&self) -> [u8; HCCAPX_RECORD_LENGTH] {
        let mut buf = [0u8; HCCAPX_RECORD_LENGTH];
        let mut w = Writer { buf: &mut buf, pos: 0 };
        w.put(&self.signature.to_le_bytes());
        w.put(&self.version.to_le_bytes());
        w.put(&[self.message_pair, self.essid_len]);
        w.put(&self.essid);
        w.put(&[self.keyver]);
        w.put(&self.keymic);
        w.put(&self.mac_ap);
        w.put(&self.nonce_ap);
        w.put(&self.mac_sta);
        w.put(&self.nonce_sta);
        w.put(&self.eapol_len.to_le_bytes());
        w.put(&self.eapol);
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HCCAPX_RECORD_LENGTH {
            return Err(HccapxError::InvalidRecord("wrong record length"));
        }
        let mut r = Reader { buf: bytes, pos: 0 };
        let record = HccapxRecord {
            signature: u32::from_le_bytes(r.take()),
            version: u32::from_le_bytes(r.take()),
            message_pair: r.take::<1>()[0],
            essid_len: r.take::<1>()[0],
            essid: r.take(),
            keyver: r.take::<1>()[0],
            keymic: r.take(),
            mac_ap: r.take(),
            nonce_ap: r.take(),
            mac_sta: r.take(),
            nonce_sta: r.take(),
            eapol_len: u16::from_le_bytes(r.take()),
            eapol: r.take(),
        };
        if record.signature != HCCAPX_SIGNATURE {
            return Err(HccapxError::InvalidRecord("bad signature"));
        }
        if record.version != HCCAPX_VERSION {
            return Err(HccapxError::InvalidRecord("unsupported version"));
        }
        if record.essid_len as usize > HCCAPX_MAX_ESSID_LENGTH {
            return Err(HccapxError::EssidTooLong(record.essid_len as usize));
        }
        if record.eapol_len as usize > HCCAPX_MAX_EAPOL_LENGTH {
            return Err(HccapxError::EapolTooLong(record.eapol_len as usize));
        }
        Ok(record)
    }

    /// Renders the record as a hashcat mode 22000 line
    /// ## Description
    /// Format: `WPA*02*MIC*MAC_AP*MAC_STA*ESSID*ANONCE*EAPOL*MESSAGEPAIR`.
    pub fn to_hashcat_22000(&self) -> String {
        format!(
            "WPA*02*{}*{}*{}*{}*{}*{}*{:02x}",
            hex::encode(self.keymic),
            hex::encode(self.mac_ap),
            hex::encode(self.mac_sta),
            hex::encode(self.essid()),
            hex::encode(self.nonce_ap),
            hex::encode(self.eapol()),
            self.message_pair
        )
    }

    /// Checks the captured MIC against a candidate passphrase
    /// ## Description
    /// Rebuilds the PMK and KCK from the passphrase and the captured nonces,
    /// and recomputes the MIC over the stored EAPOL. Only key descriptor
    /// version 2 (HMAC-SHA1) is supported.
    pub fn verify_passphrase(&self, passphrase: &str) -> Result<bool> {
        if self.keyver != 2 {
            return Err(HccapxError::UnsupportedKeyVersion(self.keyver));
        }
        if self.eapol_len == 0 {
            return Err(HccapxError::InvalidRecord("no EAPOL captured"));
        }
        let pmk = crypto::generate_psk(passphrase, self.essid());
        let kck = crypto::generate_kck(
            &pmk,
            &self.mac_ap,
            &self.mac_sta,
            &self.nonce_ap,
            &self.nonce_sta,
        );
        Ok(crypto::eapol_mic_sha1(&kck, self.eapol()) == self.keymic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_layout() {
        let record = HccapxRecord::new(b"TestNet").unwrap();
        let bytes = record.to_bytes();
        assert_eq!(393, bytes.len());
        assert_eq!(b"HCPX", &bytes[0..4]);
        assert_eq!([4, 0, 0, 0], bytes[4..8]);
        assert_eq!(7, bytes[9]);
        assert_eq!(b"TestNet", &bytes[10..17]);
        assert!(bytes[17..42].iter().all(|b| *b == 0));
        assert!(bytes[42..].iter().all(|b| *b == 0));
    }

    #[test]
    fn field_offsets() {
        let mut record = HccapxRecord::new(b"x").unwrap();
        record.message_pair = 2;
        record.keyver = 2;
        record.keymic = [0x01; 16];
        record.mac_ap = [0x02; 6];
        record.nonce_ap = [0x03; 32];
        record.mac_sta = [0x04; 6];
        record.nonce_sta = [0x05; 32];
        record.set_eapol(&[0x06; 3]).unwrap();

        let bytes = record.to_bytes();
        assert_eq!(2, bytes[8]);
        assert_eq!(2, bytes[42]);
        assert_eq!([0x01; 16], bytes[43..59]);
        assert_eq!([0x02; 6], bytes[59..65]);
        assert_eq!([0x03; 32], bytes[65..97]);
        assert_eq!([0x04; 6], bytes[97..103]);
        assert_eq!([0x05; 32], bytes[103..135]);
        assert_eq!([3, 0], bytes[135..137]);
        assert_eq!([0x06; 3], bytes[137..140]);
        assert_eq!(record, HccapxRecord::from_bytes(&bytes).unwrap());
    }

    #[test]
    fn essid_bounds() {
        assert!(HccapxRecord::new(&[b'a'; 32]).is_ok());
        assert_eq!(Err(HccapxError::EssidTooLong(33)), HccapxRecord::new(&[b'a'; 33]));
    }

    #[test]
    fn eapol_bounds() {
        let mut record = HccapxRecord::new(b"TestNet").unwrap();
        assert!(record.set_eapol(&[0x01; 256]).is_ok());
        assert_eq!(256, record.eapol().len());
        assert_eq!(Err(HccapxError::EapolTooLong(257)), record.set_eapol(&[0x02; 257]));
        // rejected input leaves the previous value alone
        assert_eq!(256, record.eapol_len);
        assert_eq!(0x01, record.eapol[0]);
    }

    #[test]
    fn stored_eapol_has_zeroed_mic() {
        let mut record = HccapxRecord::new(b"TestNet").unwrap();
        record.set_eapol(&[0xff; 121]).unwrap();
        assert!(record.eapol[81..97].iter().all(|b| *b == 0));
        assert_eq!(0xff, record.eapol[80]);
        assert_eq!(0xff, record.eapol[97]);
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let record = HccapxRecord::new(b"TestNet").unwrap();
        let mut bytes = record.to_bytes();
        assert!(HccapxRecord::from_bytes(&bytes[..392]).is_err());
        bytes[0] = b'X';
        assert_eq!(
            Err(HccapxError::InvalidRecord("bad signature")),
            HccapxRecord::from_bytes(&bytes)
        );
        let mut bytes = record.to_bytes();
        bytes[135..137].copy_from_slice(&300u16.to_le_bytes());
        assert_eq!(Err(HccapxError::EapolTooLong(300)), HccapxRecord::from_bytes(&bytes));
    }

    #[test]
    fn unsupported_key_version() {
        let mut record = HccapxRecord::new(b"TestNet").unwrap();
        record.keyver = 1;
        assert_eq!(Err(HccapxError::UnsupportedKeyVersion(1)), record.verify_passphrase("pw"));
    }
}
