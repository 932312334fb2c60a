use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::PING_REPLY;
use crate::error::Result;

/// Echo of a [`super::ping::PingChunk`] message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReplyChunk {
    pub message_echo: Vec<u8>,
}

impl PingReplyChunk {
    pub fn payload_len(&self) -> u16 {
        self.message_echo.len() as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(PING_REPLY);
        buf.put_u16(self.payload_len());
        buf.put_slice(&self.message_echo);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let message_echo = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(PingReplyChunk { message_echo })
    }
}
