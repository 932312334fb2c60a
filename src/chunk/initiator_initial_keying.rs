use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::INITIATOR_INITIAL_KEYING;
use crate::error::Result;
use crate::vlu::{self, Vlu};

/// Sent in response to a `ResponderHello`, carrying the initiator's half of
/// the key exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatorInitialKeyingChunk {
    pub initiator_session_id: u32,
    pub cookie_echo: Vec<u8>,
    pub initiator_certificate: Vec<u8>,
    pub session_key_initiator_component: Vec<u8>,
    pub signature: Vec<u8>,
}

impl InitiatorInitialKeyingChunk {
    pub fn payload_len(&self) -> u16 {
        (4 + Vlu::from(self.cookie_echo.len()).byte_length()
            + self.cookie_echo.len()
            + Vlu::from(self.initiator_certificate.len()).byte_length()
            + self.initiator_certificate.len()
            + Vlu::from(self.session_key_initiator_component.len()).byte_length()
            + self.session_key_initiator_component.len()
            + self.signature.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(INITIATOR_INITIAL_KEYING);
        buf.put_u16(self.payload_len());
        buf.put_u32(self.initiator_session_id);
        vlu::write_vlu_bytes(buf, &self.cookie_echo)?;
        vlu::write_vlu_bytes(buf, &self.initiator_certificate)?;
        vlu::write_vlu_bytes(buf, &self.session_key_initiator_component)?;
        buf.put_slice(&self.signature);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        if payload.remaining() < 4 {
            return Err(crate::error::Error::Truncated);
        }
        let initiator_session_id = payload.get_u32();
        let (_, cookie_echo) = vlu::read_vlu_bytes(payload)?;
        let (_, initiator_certificate) = vlu::read_vlu_bytes(payload)?;
        let (_, session_key_initiator_component) = vlu::read_vlu_bytes(payload)?;
        let signature = payload.copy_to_bytes(payload.remaining()).to_vec();

        Ok(InitiatorInitialKeyingChunk {
            initiator_session_id,
            cookie_echo,
            initiator_certificate,
            session_key_initiator_component,
            signature,
        })
    }
}
