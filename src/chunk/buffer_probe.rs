use bytes::{BufMut, Bytes, BytesMut};

use super::chunk_type::BUFFER_PROBE;
use crate::error::Result;
use crate::vlu::Vlu;

/// Requests available receive buffer for a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferProbeChunk {
    pub flow_id: Vlu,
}

impl BufferProbeChunk {
    pub fn payload_len(&self) -> u16 {
        self.flow_id.byte_length() as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(BUFFER_PROBE);
        buf.put_u16(self.payload_len());
        self.flow_id.write_to(buf)?;
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let flow_id = Vlu::read_from(payload)?;
        Ok(BufferProbeChunk { flow_id })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_buffer_probe_round_trip() {
        let chunk = BufferProbeChunk { flow_id: Vlu(14180) };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(BufferProbeChunk::read_from(&mut payload).unwrap(), chunk);
    }
}
