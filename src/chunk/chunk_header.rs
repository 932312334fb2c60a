use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Shared prefix of every chunk: a one-byte type opcode and a big-endian
/// 16-bit length of the payload that follows (excluding the type byte and
/// the length field itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub typ: u8,
    pub payload_len: u16,
}

pub const CHUNK_HEADER_SIZE: usize = 3;

impl ChunkHeader {
    pub fn marshal_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.typ);
        buf.put_u16(self.payload_len);
    }

    /// Unmarshals a header whose type byte has already been consumed by the
    /// dispatcher; `typ` is passed in separately.
    pub fn unmarshal_payload_len<B: Buf>(typ: u8, buf: &mut B) -> Result<Self> {
        if buf.remaining() < 2 {
            return Err(Error::Truncated);
        }
        let payload_len = buf.get_u16();
        Ok(ChunkHeader { typ, payload_len })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::{Bytes, BytesMut};

    #[test]
    fn test_chunk_header_round_trip() {
        let header = ChunkHeader {
            typ: 0x01,
            payload_len: 6,
        };
        let mut buf = BytesMut::new();
        header.marshal_to(&mut buf);
        assert_eq!(buf.len(), CHUNK_HEADER_SIZE);
        let mut bytes: Bytes = buf.freeze();
        let typ = bytes[0];
        bytes.advance(1);
        let decoded = ChunkHeader::unmarshal_payload_len(typ, &mut bytes).unwrap();
        assert_eq!(decoded, header);
    }
}
