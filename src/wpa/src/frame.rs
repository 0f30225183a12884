use crate::consts::*;
use crate::eapol::EapolPacketView;
use log::{debug, trace};

/// a captured frame as handed over by the capture component
/// ## Description
/// Borrows the capture buffer for the duration of one callback.
/// `sig_len` is the length reported by the radio; only the first
/// `min(sig_len, payload.len())` bytes are considered part of the frame.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    payload: &'a [u8],
    sig_len: usize,
}

impl<'a> RawFrame<'a> {
    pub fn new(payload: &'a [u8], sig_len: usize) -> Self {
        RawFrame { payload, sig_len }
    }

    /// the whole buffer is the frame
    pub fn from_bytes(payload: &'a [u8]) -> Self {
        RawFrame { payload, sig_len: payload.len() }
    }

    pub fn sig_len(&self) -> usize {
        self.sig_len
    }

    pub fn bytes(&self) -> &'a [u8] {
        &self.payload[..self.sig_len.min(self.payload.len())]
    }
}

/// zero-copy view over the 802.11 MAC header of a data frame
#[derive(Debug, Clone, Copy)]
pub struct MacHeaderView<'a> {
    frame: &'a [u8],
}

impl<'a> MacHeaderView<'a> {
    /// Returns `None` if the buffer can't hold the 24 byte header.
    pub fn parse(frame: &'a [u8]) -> Option<Self> {
        if frame.len() < MAC_HEADER_LENGTH {
            return None;
        }
        Some(MacHeaderView { frame })
    }

    fn fc_type(&self) -> u8 {
        self.frame[FRAME_CONTROL_OFFSET]
    }

    fn fc_flags(&self) -> u8 {
        self.frame[FRAME_CONTROL_OFFSET + 1]
    }

    pub fn frame_type(&self) -> u8 {
        (self.fc_type() & 0b0000_1100) >> 2
    }

    pub fn subtype(&self) -> u8 {
        (self.fc_type() & 0b1111_0000) >> 4
    }

    pub fn is_data(&self) -> bool {
        self.frame_type() == FRAME_TYPE_DATA
    }

    pub fn is_qos(&self) -> bool {
        self.subtype() & QOS_SUBTYPE_BIT != 0
    }

    pub fn to_ds(&self) -> bool {
        self.fc_flags() & FLAG_TO_DS != 0
    }

    pub fn from_ds(&self) -> bool {
        self.fc_flags() & FLAG_FROM_DS != 0
    }

    pub fn protected(&self) -> bool {
        self.fc_flags() & FLAG_PROTECTED != 0
    }

    pub fn order(&self) -> bool {
        self.fc_flags() & FLAG_ORDER != 0
    }

    fn address(&self, offset: usize) -> [u8; 6] {
        let mut mac = [0u8; 6];
        mac.copy_from_slice(&self.frame[offset..offset + 6]);
        mac
    }

    pub fn addr1(&self) -> [u8; 6] {
        self.address(ADDR1_OFFSET)
    }

    pub fn addr2(&self) -> [u8; 6] {
        self.address(ADDR2_OFFSET)
    }

    /// the BSSID of infrastructure data frames
    pub fn addr3(&self) -> [u8; 6] {
        self.address(ADDR3_OFFSET)
    }

    /// Resolves `(mac_ap, mac_sta)` from the distribution system bits.
    /// 4-address frames have no single AP/STA pair and give `None`, so do
    /// frames whose station side is a group address.
    pub fn ap_and_station(&self) -> Option<([u8; 6], [u8; 6])> {
        let (ap, station) = match (self.to_ds(), self.from_ds()) {
            (false, true) => (self.addr2(), self.addr1()),
            (true, false) => (self.addr1(), self.addr2()),
            (false, false) => {
                let bssid = self.addr3();
                let station = if self.addr2() == bssid { self.addr1() } else { self.addr2() };
                (bssid, station)
            }
            (true, true) => return None,
        };
        if aux::is_group_mac(&station) {
            trace!("group addressed station {}", aux::mac_to_string(&station));
            return None;
        }
        Some((ap, station))
    }

    /// offset of the frame body, after the optional QoS and HT control fields
    fn body_offset(&self) -> usize {
        let mut offset = MAC_HEADER_LENGTH;
        if self.is_qos() {
            offset += QOS_CONTROL_LENGTH;
            if self.order() {
                offset += HT_CONTROL_LENGTH;
            }
        }
        offset
    }
}

/// Checks if the BSSID (addr3) of the frame matches the target BSSID
/// ## Description
/// First and cheapest gate of the pipeline. A frame too short to carry
/// addr3 never matches.
pub fn accepts(frame: &RawFrame, target_bssid: &[u8; 6]) -> bool {
    match MacHeaderView::parse(frame.bytes()) {
        Some(header) => &header.addr3() == target_bssid,
        None => false,
    }
}

/// Extracts the EAPOL packet carried by a data frame
/// ## Description
/// Strips the MAC header, the optional QoS field and the LLC/SNAP header,
/// then checks the EtherType. Protected frames are rejected before anything
/// else since their body can't be read without the session key.
pub fn extract_eapol<'a>(frame: &RawFrame<'a>) -> Option<EapolPacketView<'a>> {
    let bytes = frame.bytes();
    let header = MacHeaderView::parse(bytes)?;

    if header.protected() {
        trace!("protected frame, skipping");
        return None;
    }
    if !header.is_data() {
        trace!("not a data frame (type {})", header.frame_type());
        return None;
    }
    if header.to_ds() && header.from_ds() {
        trace!("4-address frame, skipping");
        return None;
    }
    if header.is_qos() {
        trace!("QoS data frame");
    }

    let ether_type_offset = header.body_offset() + LLC_SNAP_LENGTH;
    let payload_offset = ether_type_offset + ETHER_TYPE_LENGTH;
    let ether_type = bytes.get(ether_type_offset..payload_offset)?;
    if u16::from_be_bytes([ether_type[0], ether_type[1]]) != ETHER_TYPE_EAPOL {
        return None;
    }

    let eapol = EapolPacketView::parse(&bytes[payload_offset..]);
    if eapol.is_some() {
        debug!("EAPOL packet");
    } else {
        debug!("truncated EAPOL packet");
    }
    eapol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, FrameBuilder, AP, BSSID, STA};

    fn eapol_bytes() -> Vec<u8> {
        fixtures::eapol_key_pdu(&fixtures::KeyFields::m1([0x11; 32]), &[])
    }

    #[test]
    fn filter_compares_addr3() {
        let frame = FrameBuilder::from_ap(AP, STA).body(&eapol_bytes()).build();
        assert!(accepts(&RawFrame::from_bytes(&frame), &BSSID));
        assert!(!accepts(&RawFrame::from_bytes(&frame), &STA));
    }

    #[test]
    fn filter_rejects_short_frames() {
        let frame = FrameBuilder::from_ap(AP, STA).build();
        assert!(!accepts(&RawFrame::from_bytes(&frame[..20]), &BSSID));
        // sig_len cuts the buffer before addr3 ends
        assert!(!accepts(&RawFrame::new(&frame, 21), &BSSID));
    }

    #[test]
    fn extracts_from_plain_and_qos_frames() {
        let eapol = eapol_bytes();
        for qos in [false, true] {
            let frame = FrameBuilder::from_ap(AP, STA).qos(qos).body(&eapol).build();
            let view = extract_eapol(&RawFrame::from_bytes(&frame)).unwrap();
            assert_eq!(&eapol[..], view.pdu());
        }
    }

    #[test]
    fn protected_frames_are_rejected() {
        let eapol = eapol_bytes();
        for qos in [false, true] {
            let frame = FrameBuilder::from_ap(AP, STA)
                .qos(qos)
                .protected(true)
                .body(&eapol)
                .build();
            assert!(extract_eapol(&RawFrame::from_bytes(&frame)).is_none());
        }
        // even when nothing but the header is there
        let frame = FrameBuilder::from_ap(AP, STA).protected(true).build();
        assert!(extract_eapol(&RawFrame::from_bytes(&frame)).is_none());
    }

    #[test]
    fn qos_shifts_ether_type_by_two() {
        let eapol = eapol_bytes();
        let plain = FrameBuilder::from_ap(AP, STA).body(&eapol).build();
        // same payload, but the QoS bit claims 2 extra header bytes
        let mut shifted = plain.clone();
        shifted[0] |= QOS_SUBTYPE_BIT << 4;
        assert!(extract_eapol(&RawFrame::from_bytes(&shifted)).is_none());

        let qos = FrameBuilder::from_ap(AP, STA).qos(true).body(&eapol).build();
        assert_eq!(plain.len() + 2, qos.len());
        assert_eq!(plain[24..], qos[26..]);
        assert!(extract_eapol(&RawFrame::from_bytes(&qos)).is_some());
    }

    #[test]
    fn ht_control_is_skipped_for_ordered_qos() {
        let eapol = eapol_bytes();
        let frame = FrameBuilder::from_ap(AP, STA)
            .qos(true)
            .ht_control(true)
            .body(&eapol)
            .build();
        let view = extract_eapol(&RawFrame::from_bytes(&frame)).unwrap();
        assert_eq!(&eapol[..], view.pdu());
    }

    #[test]
    fn other_ether_types_are_ignored() {
        let frame = FrameBuilder::from_ap(AP, STA)
            .ether_type(0x0800)
            .body(&[0x45, 0, 0, 20])
            .build();
        assert!(extract_eapol(&RawFrame::from_bytes(&frame)).is_none());
    }

    #[test]
    fn truncated_frames_are_ignored() {
        let frame = FrameBuilder::from_ap(AP, STA).qos(true).body(&eapol_bytes()).build();
        for len in 0..frame.len() {
            assert!(extract_eapol(&RawFrame::new(&frame, len)).is_none(), "len {}", len);
        }
    }

    #[test]
    fn non_data_and_wds_frames_are_ignored() {
        let eapol = eapol_bytes();
        let mut management = FrameBuilder::from_ap(AP, STA).body(&eapol).build();
        management[0] &= !0b0000_1100;
        assert!(extract_eapol(&RawFrame::from_bytes(&management)).is_none());

        let mut wds = FrameBuilder::from_ap(AP, STA).body(&eapol).build();
        wds[1] |= FLAG_TO_DS | FLAG_FROM_DS;
        assert!(extract_eapol(&RawFrame::from_bytes(&wds)).is_none());
    }

    #[test]
    fn resolves_ap_and_station() {
        let down = FrameBuilder::from_ap(AP, STA).build();
        let up = FrameBuilder::from_station(STA, AP).build();
        for frame in [down, up] {
            let header = MacHeaderView::parse(&frame).unwrap();
            assert_eq!(Some((AP, STA)), header.ap_and_station());
        }
    }

    #[test]
    fn group_addressed_station_has_no_pair() {
        let broadcast = FrameBuilder::from_ap(AP, [0xff; 6]).body(&eapol_bytes()).build();
        let multicast = FrameBuilder::from_ap(AP, [0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]).build();
        for frame in [broadcast, multicast] {
            let header = MacHeaderView::parse(&frame).unwrap();
            assert_eq!(None, header.ap_and_station());
        }
        let broadcast = FrameBuilder::from_ap(AP, [0xff; 6]).body(&eapol_bytes()).build();
        assert!(crate::decode_handshake_frame(&broadcast).is_none());
    }

    #[test]
    fn agrees_with_libwifi() {
        let frame = FrameBuilder::from_ap(AP, STA).qos(true).body(&eapol_bytes()).build();
        match libwifi::parse_frame(&frame) {
            Ok(libwifi::Frame::QosData(qos)) => {
                assert_eq!(BSSID, qos.header.address_3.0);
                assert_eq!(STA, qos.header.address_1.0);
            }
            other => panic!("unexpected parse result: {:?}", other.is_ok()),
        }
    }
}
