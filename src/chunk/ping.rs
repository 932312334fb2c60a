use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::PING;
use crate::error::Result;

/// A liveness probe carrying an arbitrary message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingChunk {
    pub message: Vec<u8>,
}

impl PingChunk {
    pub fn payload_len(&self) -> u16 {
        self.message.len() as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(PING);
        buf.put_u16(self.payload_len());
        buf.put_slice(&self.message);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let message = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(PingChunk { message })
    }
}
