use crate::consts::*;
use crate::eapol::EapolKeyView;
use core::fmt;
use log::{debug, info, trace};

/// a 16 byte Pairwise Master Key Identifier, copied out of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PmkidItem(pub [u8; PMKID_LENGTH]);

impl PmkidItem {
    /// Checks the PMKID against a candidate passphrase.
    pub fn matches_passphrase(
        &self,
        passphrase: &str,
        essid: &[u8],
        mac_ap: &[u8; 6],
        mac_sta: &[u8; 6],
    ) -> bool {
        let pmk = crypto::generate_psk(passphrase, essid);
        crypto::generate_pmkid(&pmk, mac_ap, mac_sta) == self.0
    }
}

impl fmt::Display for PmkidItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// PMKIDs found in one frame, together with the pair they belong to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PmkidCapture {
    pub mac_ap: [u8; 6],
    pub mac_sta: [u8; 6],
    pub pmkids: Vec<PmkidItem>,
}

impl PmkidCapture {
    /// Renders every PMKID as a hashcat mode 22000 line
    /// ## Description
    /// Format: `WPA*01*PMKID*MAC_AP*MAC_STA*ESSID***`, all fields hex encoded.
    pub fn to_hashcat_22000(&self, essid: &[u8]) -> Vec<String> {
        self.pmkids
            .iter()
            .map(|pmkid| {
                format!(
                    "WPA*01*{}*{}*{}*{}***",
                    pmkid,
                    hex::encode(self.mac_ap),
                    hex::encode(self.mac_sta),
                    hex::encode(essid)
                )
            })
            .collect()
    }
}

/// one element of the key data buffer
#[derive(Debug, Clone, Copy)]
struct KeyDataField<'a> {
    field_type: u8,
    // oui, data type and data
    content: &'a [u8],
}

impl<'a> KeyDataField<'a> {
    fn oui(&self) -> Option<&'a [u8]> {
        self.content.get(..3)
    }

    fn data_type(&self) -> Option<u8> {
        self.content.get(3).copied()
    }

    fn data(&self) -> &'a [u8] {
        self.content.get(KEY_DATA_KDE_HEADER_LENGTH..).unwrap_or(&[])
    }

    fn is_pmkid_kde(&self) -> bool {
        if self.field_type != KEY_DATA_TYPE {
            trace!("wrong key data type {:#x}", self.field_type);
            return false;
        }
        if self.oui() != Some(&KEY_DATA_OUI_IEEE80211[..]) {
            trace!("wrong OUI {:02x?}", self.oui());
            return false;
        }
        if self.data_type() != Some(KEY_DATA_DATA_TYPE_PMKID_KDE) {
            trace!("wrong data type {:?}", self.data_type());
            return false;
        }
        true
    }
}

/// Crawls the key data buffer and collects the PMKIDs
/// ## Description
/// Fields are packed back to back, each one starting `2 + length` bytes
/// after the previous. A field running past the buffer, or a PMKID KDE
/// too short for 16 bytes of data, ends the walk; whatever was found
/// before it is returned.
fn parse_pmkid_from_key_data(key_data: &[u8]) -> Vec<PmkidItem> {
    let mut pmkids = vec![];
    let mut index = 0;

    while index < key_data.len() {
        let Some(header) = key_data.get(index..index + KEY_DATA_FIELD_HEADER_LENGTH) else {
            debug!("truncated key data field header at {}", index);
            break;
        };
        let content_start = index + KEY_DATA_FIELD_HEADER_LENGTH;
        let next = content_start + header[1] as usize;
        let Some(content) = key_data.get(content_start..next) else {
            debug!("key data field at {} overruns key data ({} > {})", index, next, key_data.len());
            break;
        };
        let field = KeyDataField { field_type: header[0], content };

        if field.is_pmkid_kde() {
            let Some(data) = field.data().get(..PMKID_LENGTH) else {
                debug!("PMKID KDE at {} too short", index);
                break;
            };
            let mut pmkid = [0u8; PMKID_LENGTH];
            pmkid.copy_from_slice(data);
            let pmkid = PmkidItem(pmkid);
            info!("found PMKID: {}", pmkid);
            pmkids.push(pmkid);
        }
        index = next;
    }
    pmkids
}

/// Parses the PMKIDs of an EAPOL-Key message
/// ## Description
/// Empty when there is no key data, when it's encrypted, or when its
/// declared length doesn't fit the message.
pub fn extract(key: &EapolKeyView) -> Vec<PmkidItem> {
    if key.key_data_length() == 0 {
        debug!("empty key data");
        return vec![];
    }
    if key.encrypted_key_data() {
        debug!("key data encrypted");
        return vec![];
    }
    match key.key_data() {
        Some(key_data) => parse_pmkid_from_key_data(key_data),
        None => {
            debug!("key data length {} exceeds the message", key.key_data_length());
            vec![]
        }
    }
}
