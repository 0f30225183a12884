// 802.11 MAC HEADER
pub const MAC_HEADER_LENGTH: usize = 24;
pub const FRAME_CONTROL_OFFSET: usize = 0;
pub const ADDR1_OFFSET: usize = 4;
pub const ADDR2_OFFSET: usize = 10;
pub const ADDR3_OFFSET: usize = 16;
pub const QOS_CONTROL_LENGTH: usize = 2;
pub const HT_CONTROL_LENGTH: usize = 4;

pub const FRAME_TYPE_DATA: u8 = 0x2;
pub const QOS_SUBTYPE_BIT: u8 = 0x8;

// frame control flags (second byte)
pub const FLAG_TO_DS: u8 = 0x01;
pub const FLAG_FROM_DS: u8 = 0x02;
pub const FLAG_PROTECTED: u8 = 0x40;
pub const FLAG_ORDER: u8 = 0x80;

// LLC/SNAP
pub const LLC_SNAP_LENGTH: usize = 6;
pub const ETHER_TYPE_LENGTH: usize = 2;
pub const ETHER_TYPE_EAPOL: u16 = 0x888e;

// EAPOL
pub const EAPOL_HEADER_LENGTH: usize = 4;
pub const EAPOL_KEY: u8 = 0x3;

// EAPOL-KEY BODY OFFSETS
pub const KEY_DESCRIPTOR_TYPE_OFFSET: usize = 0x0;
pub const KEY_INFORMATION_OFFSET: usize = 0x1;
pub const KEY_LENGTH_OFFSET: usize = 0x3;
pub const KEY_REPLAY_COUNTER_OFFSET: usize = 0x5;
pub const KEY_NONCE_OFFSET: usize = 0xd;
pub const KEY_MIC_OFFSET: usize = 0x4d;
pub const KEY_DATA_LENGTH_OFFSET: usize = 0x5d;
pub const KEY_DATA_OFFSET: usize = 0x5f;

pub const KEY_NONCE_LENGTH: usize = 32;
pub const KEY_MIC_LENGTH: usize = 16;

// KEY DATA
pub const KEY_DATA_TYPE: u8 = 0xdd;
pub const KEY_DATA_OUI_IEEE80211: [u8; 3] = [0x00, 0x0f, 0xac];
pub const KEY_DATA_DATA_TYPE_PMKID_KDE: u8 = 0x4;
pub const KEY_DATA_FIELD_HEADER_LENGTH: usize = 2;
pub const KEY_DATA_KDE_HEADER_LENGTH: usize = 4; // oui + data type
pub const PMKID_LENGTH: usize = 16;

// HCCAPX
pub const HCCAPX_SIGNATURE: u32 = 0x5850_4348; // "HCPX"
pub const HCCAPX_VERSION: u32 = 4;
pub const HCCAPX_MAX_ESSID_LENGTH: usize = 32;
pub const HCCAPX_MAX_EAPOL_LENGTH: usize = 256;
pub const HCCAPX_RECORD_LENGTH: usize = 393;

// hashcat message pair codes
pub const MESSAGE_PAIR_M1_M2: u8 = 0;
pub const MESSAGE_PAIR_M1_M4: u8 = 1;
pub const MESSAGE_PAIR_M3_M2: u8 = 2;
pub const MESSAGE_PAIR_M3_M4: u8 = 5;
