use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::RESPONDER_HELLO;
use crate::error::Result;
use crate::vlu::{self, Vlu};

/// Sent in response to an `InitiatorHello`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderHelloChunk {
    pub tag_echo: Vec<u8>,
    pub cookie: Vec<u8>,
    pub responder_certificate: Vec<u8>,
}

impl ResponderHelloChunk {
    pub fn payload_len(&self) -> u16 {
        (Vlu::from(self.tag_echo.len()).byte_length()
            + self.tag_echo.len()
            + Vlu::from(self.cookie.len()).byte_length()
            + self.cookie.len()
            + self.responder_certificate.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(RESPONDER_HELLO);
        buf.put_u16(self.payload_len());
        vlu::write_vlu_bytes(buf, &self.tag_echo)?;
        vlu::write_vlu_bytes(buf, &self.cookie)?;
        buf.put_slice(&self.responder_certificate);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let (_, tag_echo) = vlu::read_vlu_bytes(payload)?;
        let (_, cookie) = vlu::read_vlu_bytes(payload)?;
        let responder_certificate = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(ResponderHelloChunk {
            tag_echo,
            cookie,
            responder_certificate,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_responder_hello_round_trip() {
        let chunk = ResponderHelloChunk {
            tag_echo: vec![0x11; 16],
            cookie: vec![0x22; 64],
            responder_certificate: vec![0x33; 20],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(ResponderHelloChunk::read_from(&mut payload).unwrap(), chunk);
    }
}
