use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::RESPONDER_INITIAL_KEYING;
use crate::error::{Error, Result};
use crate::vlu::{self, Vlu};

/// Sent in response to `InitiatorInitialKeying`, completing the key
/// exchange, in startup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderInitialKeyingChunk {
    pub responder_session_id: u32,
    pub session_key_responder_component: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ResponderInitialKeyingChunk {
    pub fn payload_len(&self) -> u16 {
        (4 + Vlu::from(self.session_key_responder_component.len()).byte_length()
            + self.session_key_responder_component.len()
            + self.signature.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(RESPONDER_INITIAL_KEYING);
        buf.put_u16(self.payload_len());
        buf.put_u32(self.responder_session_id);
        vlu::write_vlu_bytes(buf, &self.session_key_responder_component)?;
        buf.put_slice(&self.signature);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        if payload.remaining() < 4 {
            return Err(Error::Truncated);
        }
        let responder_session_id = payload.get_u32();
        let (_, session_key_responder_component) = vlu::read_vlu_bytes(payload)?;
        let signature = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(ResponderInitialKeyingChunk {
            responder_session_id,
            session_key_responder_component,
            signature,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_responder_initial_keying_round_trip() {
        let chunk = ResponderInitialKeyingChunk {
            responder_session_id: 0xcafe_babe,
            session_key_responder_component: vec![1; 8],
            signature: vec![2; 32],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(
            ResponderInitialKeyingChunk::read_from(&mut payload).unwrap(),
            chunk
        );
    }
}
