use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::INITIATOR_HELLO;
use crate::error::Result;
use crate::vlu::{self, Vlu};

/// Initiates the handshake in startup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatorHelloChunk {
    pub epd: Vec<u8>,
    pub tag: Vec<u8>,
}

impl InitiatorHelloChunk {
    pub fn payload_len(&self) -> u16 {
        (Vlu::from(self.epd.len()).byte_length() + self.epd.len() + self.tag.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(INITIATOR_HELLO);
        buf.put_u16(self.payload_len());
        vlu::write_vlu_bytes(buf, &self.epd)?;
        buf.put_slice(&self.tag);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let (_, epd) = vlu::read_vlu_bytes(payload)?;
        let tag = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(InitiatorHelloChunk { epd, tag })
    }
}
