use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::DATA_ACKNOWLEDGEMENT_RANGES;
use crate::error::Result;
use crate::vlu::Vlu;

/// One `(holes, received)` pair inside a [`DataAcknowledgementRangesChunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataAcknowledgementRange {
    pub holes_minus_one: Vlu,
    pub received_minus_one: Vlu,
}

/// Indicates which `UserData` fragments have been received for one flow, as
/// a run-length list of gaps and receipts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAcknowledgementRangesChunk {
    pub flow_id: Vlu,
    pub buffer_blocks_available: Vlu,
    pub cumulative_ack: Vlu,
    pub ranges: Vec<DataAcknowledgementRange>,
}

impl DataAcknowledgementRangesChunk {
    pub fn payload_len(&self) -> u16 {
        let ranges_len: usize = self
            .ranges
            .iter()
            .map(|r| r.holes_minus_one.byte_length() + r.received_minus_one.byte_length())
            .sum();
        (self.flow_id.byte_length()
            + self.buffer_blocks_available.byte_length()
            + self.cumulative_ack.byte_length()
            + ranges_len) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(DATA_ACKNOWLEDGEMENT_RANGES);
        buf.put_u16(self.payload_len());
        self.flow_id.write_to(buf)?;
        self.buffer_blocks_available.write_to(buf)?;
        self.cumulative_ack.write_to(buf)?;
        for range in &self.ranges {
            range.holes_minus_one.write_to(buf)?;
            range.received_minus_one.write_to(buf)?;
        }
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let flow_id = Vlu::read_from(payload)?;
        let buffer_blocks_available = Vlu::read_from(payload)?;
        let cumulative_ack = Vlu::read_from(payload)?;

        let mut ranges = Vec::new();
        while payload.has_remaining() {
            let holes_minus_one = Vlu::read_from(payload)?;
            let received_minus_one = Vlu::read_from(payload)?;
            ranges.push(DataAcknowledgementRange {
                holes_minus_one,
                received_minus_one,
            });
        }

        Ok(DataAcknowledgementRangesChunk {
            flow_id,
            buffer_blocks_available,
            cumulative_ack,
            ranges,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_data_acknowledgement_ranges_round_trip() {
        let chunk = DataAcknowledgementRangesChunk {
            flow_id: Vlu(2),
            buffer_blocks_available: Vlu(10),
            cumulative_ack: Vlu(5),
            ranges: vec![
                DataAcknowledgementRange {
                    holes_minus_one: Vlu(0),
                    received_minus_one: Vlu(3),
                },
                DataAcknowledgementRange {
                    holes_minus_one: Vlu(1),
                    received_minus_one: Vlu(0),
                },
            ],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(
            DataAcknowledgementRangesChunk::read_from(&mut payload).unwrap(),
            chunk
        );
    }
}
