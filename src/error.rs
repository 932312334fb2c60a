use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("buffer ran out while reading a field")]
    Truncated,

    #[error("VLU would require a 5th continuation byte")]
    VluOverflow,

    #[error("VLU value {0} exceeds 2^28 - 1")]
    VluOutOfRange(u32),

    #[error("user data option list exhausted declared length")]
    CorruptedUserData,

    #[error("reassembly buffer for packet {packet_id} exceeded max_fragments")]
    TooManyFragments { packet_id: u32 },

    #[error("reassembly buffer for packet {packet_id} exceeded max_fragments_size")]
    TooLargeReassembly { packet_id: u32 },

    #[error("reassembly buffer for packet {packet_id} exceeded max_fragmentation_gap")]
    FragmentationGap { packet_id: u32 },

    #[error("a fragment chunk was found inside a reassembled packet")]
    NestedFragment,

    #[error("chunk type {0:#04x} is not permitted by the current session type")]
    UnexpectedChunk(u8),

    #[error("packet mode {0} is below the gating floor for this session")]
    ModeNotPermitted(u8),

    #[error("checksum verification failed")]
    BadChecksum,

    #[error("crypto profile used before a key was set")]
    CryptoUninitialized,

    #[error("encryption key must be 16 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("io error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_strings_are_stable_per_variant_family() {
        assert_eq!(Error::Truncated.to_string(), "buffer ran out while reading a field");
        assert_eq!(
            Error::VluOverflow.to_string(),
            "VLU would require a 5th continuation byte"
        );
        assert_eq!(
            Error::VluOutOfRange(1 << 28).to_string(),
            "VLU value 268435456 exceeds 2^28 - 1"
        );
        assert_eq!(
            Error::CorruptedUserData.to_string(),
            "user data option list exhausted declared length"
        );
        assert_eq!(
            Error::TooManyFragments { packet_id: 7 }.to_string(),
            "reassembly buffer for packet 7 exceeded max_fragments"
        );
        assert_eq!(
            Error::TooLargeReassembly { packet_id: 7 }.to_string(),
            "reassembly buffer for packet 7 exceeded max_fragments_size"
        );
        assert_eq!(
            Error::FragmentationGap { packet_id: 7 }.to_string(),
            "reassembly buffer for packet 7 exceeded max_fragmentation_gap"
        );
        assert_eq!(
            Error::NestedFragment.to_string(),
            "a fragment chunk was found inside a reassembled packet"
        );
        assert_eq!(
            Error::UnexpectedChunk(0x01).to_string(),
            "chunk type 0x01 is not permitted by the current session type"
        );
        assert_eq!(
            Error::ModeNotPermitted(0).to_string(),
            "packet mode 0 is below the gating floor for this session"
        );
        assert_eq!(Error::BadChecksum.to_string(), "checksum verification failed");
        assert_eq!(
            Error::CryptoUninitialized.to_string(),
            "crypto profile used before a key was set"
        );
        assert_eq!(
            Error::InvalidKeyLength(10).to_string(),
            "encryption key must be 16 bytes, got 10"
        );
        assert_eq!(
            Error::Io("disk full".to_string()).to_string(),
            "io error: disk full"
        );
        assert_eq!(Error::Other("custom".to_string()).to_string(), "custom");
    }

    #[test]
    fn test_io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
