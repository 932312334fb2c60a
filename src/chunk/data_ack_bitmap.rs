use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::DATA_ACKNOWLEDGEMENT_BITMAP;
use crate::error::Result;
use crate::vlu::Vlu;

/// Indicates which `UserData` fragment sequence numbers have been received,
/// as a bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAcknowledgementBitmapChunk {
    pub flow_id: Vlu,
    pub buffer_blocks_available: Vlu,
    pub cumulative_ack: Vlu,
    pub acknowledgement: Vec<u8>,
}

impl DataAcknowledgementBitmapChunk {
    pub fn payload_len(&self) -> u16 {
        (self.flow_id.byte_length()
            + self.buffer_blocks_available.byte_length()
            + self.cumulative_ack.byte_length()
            + self.acknowledgement.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(DATA_ACKNOWLEDGEMENT_BITMAP);
        buf.put_u16(self.payload_len());
        self.flow_id.write_to(buf)?;
        self.buffer_blocks_available.write_to(buf)?;
        self.cumulative_ack.write_to(buf)?;
        buf.put_slice(&self.acknowledgement);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let flow_id = Vlu::read_from(payload)?;
        let buffer_blocks_available = Vlu::read_from(payload)?;
        let cumulative_ack = Vlu::read_from(payload)?;
        let acknowledgement = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(DataAcknowledgementBitmapChunk {
            flow_id,
            buffer_blocks_available,
            cumulative_ack,
            acknowledgement,
        })
    }
}
