use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::FRAGMENT;
use crate::error::Result;
use crate::vlu::Vlu;

/// Carries one slice of a packet that was too large to send whole.
///
/// The flags byte has a single meaningful bit (7 = `more_fragments`); the
/// rest are reserved and written zero, ignored on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentChunk {
    pub more_fragments: bool,
    pub packet_id: Vlu,
    pub fragment_num: Vlu,
    pub fragment: Vec<u8>,
}

impl FragmentChunk {
    pub fn payload_len(&self) -> u16 {
        (1 + self.packet_id.byte_length() + self.fragment_num.byte_length() + self.fragment.len())
            as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(FRAGMENT);
        buf.put_u16(self.payload_len());
        buf.put_u8(if self.more_fragments { 0x80 } else { 0x00 });
        self.packet_id.write_to(buf)?;
        self.fragment_num.write_to(buf)?;
        buf.put_slice(&self.fragment);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        if !payload.has_remaining() {
            return Err(crate::error::Error::Truncated);
        }
        let flags = payload.get_u8();
        let more_fragments = flags & 0x80 != 0;
        let packet_id = Vlu::read_from(payload)?;
        let fragment_num = Vlu::read_from(payload)?;
        let fragment = payload.copy_to_bytes(payload.remaining()).to_vec();

        Ok(FragmentChunk {
            more_fragments,
            packet_id,
            fragment_num,
            fragment,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fragment_flags_byte_only_uses_top_bit() {
        let chunk = FragmentChunk {
            more_fragments: true,
            packet_id: Vlu(1),
            fragment_num: Vlu(0),
            fragment: vec![1, 2, 3],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        assert_eq!(buf[3], 0x80);
    }
}
