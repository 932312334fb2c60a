use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::RESPONDER_REDIRECT;
use crate::error::Result;
use crate::peer_address::PeerAddress;
use crate::vlu::{self, Vlu};

/// Sent as a response to `InitiatorHello`/`ForwardedHello` to redirect the
/// initiator towards a different set of addresses, in startup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderRedirectChunk {
    pub tag_echo: Vec<u8>,
    pub redirect_destinations: Vec<PeerAddress>,
}

impl ResponderRedirectChunk {
    pub fn payload_len(&self) -> u16 {
        let destinations_len: usize = self
            .redirect_destinations
            .iter()
            .map(PeerAddress::length)
            .sum();
        (Vlu::from(self.tag_echo.len()).byte_length() + self.tag_echo.len() + destinations_len)
            as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(RESPONDER_REDIRECT);
        buf.put_u16(self.payload_len());
        vlu::write_vlu_bytes(buf, &self.tag_echo)?;
        for destination in &self.redirect_destinations {
            destination.write_to(buf)?;
        }
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let (_, tag_echo) = vlu::read_vlu_bytes(payload)?;
        let mut redirect_destinations = Vec::new();
        while payload.has_remaining() {
            redirect_destinations.push(PeerAddress::read_from(payload)?);
        }
        Ok(ResponderRedirectChunk {
            tag_echo,
            redirect_destinations,
        })
    }
}
