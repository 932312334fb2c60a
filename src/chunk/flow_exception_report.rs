use bytes::{BufMut, Bytes, BytesMut};

use super::chunk_type::FLOW_EXCEPTION_REPORT;
use crate::error::Result;
use crate::vlu::Vlu;

/// Sent to close a flow with an exception code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowExceptionReportChunk {
    pub flow_id: Vlu,
    pub exception: Vlu,
}

impl FlowExceptionReportChunk {
    pub fn payload_len(&self) -> u16 {
        (self.flow_id.byte_length() + self.exception.byte_length()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(FLOW_EXCEPTION_REPORT);
        buf.put_u16(self.payload_len());
        self.flow_id.write_to(buf)?;
        self.exception.write_to(buf)?;
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let flow_id = Vlu::read_from(payload)?;
        let exception = Vlu::read_from(payload)?;
        Ok(FlowExceptionReportChunk { flow_id, exception })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flow_exception_report_round_trip() {
        let chunk = FlowExceptionReportChunk {
            flow_id: Vlu(3),
            exception: Vlu(14180),
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(
            FlowExceptionReportChunk::read_from(&mut payload).unwrap(),
            chunk
        );
    }
}
