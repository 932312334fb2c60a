use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::FORWARDED_HELLO;
use crate::error::Result;
use crate::peer_address::PeerAddress;
use crate::vlu::{self, Vlu};

/// A forwarded `InitiatorHello`, relayed by a rendezvous peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedHelloChunk {
    pub epd: Vec<u8>,
    pub reply_address: PeerAddress,
    pub tag: Vec<u8>,
}

impl ForwardedHelloChunk {
    pub fn payload_len(&self) -> u16 {
        (Vlu::from(self.epd.len()).byte_length()
            + self.epd.len()
            + self.reply_address.length()
            + self.tag.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(FORWARDED_HELLO);
        buf.put_u16(self.payload_len());
        vlu::write_vlu_bytes(buf, &self.epd)?;
        self.reply_address.write_to(buf)?;
        buf.put_slice(&self.tag);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let (_, epd) = vlu::read_vlu_bytes(payload)?;
        let reply_address = PeerAddress::read_from(payload)?;
        let tag = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(ForwardedHelloChunk {
            epd,
            reply_address,
            tag,
        })
    }
}
