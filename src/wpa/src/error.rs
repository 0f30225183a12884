use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HccapxError {
    #[error("no handshake session started")]
    NoSession,

    #[error("ESSID too long: {0} bytes (max 32)")]
    EssidTooLong(usize),

    #[error("EAPOL too long: {0} bytes (max 256)")]
    EapolTooLong(usize),

    #[error(
        "frame from station {} but session is bound to {}",
        aux::mac_to_string(.got),
        aux::mac_to_string(.bound)
    )]
    WrongStation { bound: [u8; 6], got: [u8; 6] },

    #[error("not a 4-way handshake message")]
    NotHandshakeMessage,

    #[error("unsupported key descriptor version {0}")]
    UnsupportedKeyVersion(u8),

    #[error("invalid hccapx record: {0}")]
    InvalidRecord(&'static str),
}

pub type Result<T> = std::result::Result<T, HccapxError>;
