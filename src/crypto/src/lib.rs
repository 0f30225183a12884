//! # crypto
//! WPA/WPA2-PSK key derivation, used to check recovered key material
//! against a candidate passphrase.
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac_array;
use sha1::Sha1;

const ITERATIONS: u32 = 4096;
const PMK_NAME_LABEL: &[u8] = b"PMK Name";
const PAIRWISE_EXPANSION_LABEL: &[u8] = b"Pairwise key expansion";

type HmacSha1 = Hmac<Sha1>;

pub fn generate_psk(passphrase: &str, ssid: &[u8]) -> [u8; 32] {
    pbkdf2_hmac_array::<Sha1, 32>(passphrase.as_bytes(), ssid, ITERATIONS)
}

/// HMAC-SHA1 over the concatenation of all `parts`.
pub fn digest_hmac_sha1(key: &[u8], parts: &[&[u8]]) -> [u8; 20] {
    // HMAC takes keys of any length
    let mut mac = HmacSha1::new_from_slice(key).expect("hmac accepts any key length");
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// PMKID = HMAC-SHA1-128(PMK, "PMK Name" | MAC_AP | MAC_STA)
pub fn generate_pmkid(pmk: &[u8; 32], mac_ap: &[u8; 6], mac_sta: &[u8; 6]) -> [u8; 16] {
    let digest = digest_hmac_sha1(pmk, &[PMK_NAME_LABEL, mac_ap, mac_sta]);
    let mut pmkid = [0u8; 16];
    pmkid.copy_from_slice(&digest[..16]);
    pmkid
}

/// Derives the key confirmation key, the first 16 bytes of the PTK.
///
/// Only the first PRF block is computed since the KCK fits in it.
pub fn generate_kck(
    pmk: &[u8; 32],
    mac_ap: &[u8; 6],
    mac_sta: &[u8; 6],
    nonce_ap: &[u8; 32],
    nonce_sta: &[u8; 32],
) -> [u8; 16] {
    let (mac_lo, mac_hi) = if mac_ap <= mac_sta { (mac_ap, mac_sta) } else { (mac_sta, mac_ap) };
    let (nonce_lo, nonce_hi) = if nonce_ap <= nonce_sta {
        (nonce_ap, nonce_sta)
    } else {
        (nonce_sta, nonce_ap)
    };
    let block = digest_hmac_sha1(
        pmk,
        &[
            PAIRWISE_EXPANSION_LABEL,
            &[0x00],
            mac_lo,
            mac_hi,
            nonce_lo,
            nonce_hi,
            &[0x00],
        ],
    );
    let mut kck = [0u8; 16];
    kck.copy_from_slice(&block[..16]);
    kck
}

/// EAPOL-Key MIC for key descriptor version 2 (HMAC-SHA1-128).
/// `eapol` must carry a zeroed MIC field.
pub fn eapol_mic_sha1(kck: &[u8; 16], eapol: &[u8]) -> [u8; 16] {
    let digest = digest_hmac_sha1(kck, &[eapol]);
    let mut mic = [0u8; 16];
    mic.copy_from_slice(&digest[..16]);
    mic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn psk_ieee_test_vector() {
        // IEEE 802.11i annex H.4
        let psk = generate_psk("password", b"IEEE");
        assert_eq!(
            "f42c6fc52df0ebef9ebb4b90b38a5f902e83fe1b135a70e23aed762e9710a12e",
            hex::encode(psk)
        );
    }

    #[test]
    fn hmac_parts_are_concatenated() {
        let key = b"key";
        assert_eq!(
            digest_hmac_sha1(key, &[&b"hello world"[..]]),
            digest_hmac_sha1(key, &[&b"hello"[..], b" ", b"world"])
        );
    }

    #[test]
    fn kck_is_symmetric_in_ordering() {
        let pmk = generate_psk("hunter22", b"TestNet");
        let ap = [0x02, 0, 0, 0, 0, 1];
        let sta = [0x02, 0, 0, 0, 0, 2];
        let anonce = [0x11; 32];
        let snonce = [0x22; 32];
        // swapping both roles yields the same sorted PRF input
        assert_eq!(
            generate_kck(&pmk, &ap, &sta, &anonce, &snonce),
            generate_kck(&pmk, &sta, &ap, &snonce, &anonce)
        );
    }

    #[test]
    fn pmkid_depends_on_addresses() {
        let pmk = generate_psk("hunter22", b"TestNet");
        let ap = [0x02, 0, 0, 0, 0, 1];
        let sta = [0x02, 0, 0, 0, 0, 2];
        assert_ne!(generate_pmkid(&pmk, &ap, &sta), generate_pmkid(&pmk, &sta, &ap));
    }
}
