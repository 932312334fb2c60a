use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{trace, warn};

use crate::chunk::{Chunk, FragmentChunk};
use crate::error::{Error, Result};
use crate::vlu::Vlu;

/// Gates which chunk types a packet may legally carry, per the session type
/// collaborator in `session_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Forbidden = 0,
    Initiator = 1,
    Responder = 2,
    Startup = 3,
}

impl Mode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => Mode::Initiator,
            2 => Mode::Responder,
            3 => Mode::Startup,
            _ => Mode::Forbidden,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

/// One datagram's worth of chunks, with the timestamp/mode header that
/// precedes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub time_critical: bool,
    pub time_critical_reserve: bool,
    pub mode: Mode,
    pub timestamp: Option<u16>,
    pub timestamp_echo: Option<u16>,
    pub chunks: Vec<Chunk>,
}

impl Packet {
    fn flags_byte(&self) -> u8 {
        let mut b = self.mode.bits();
        if self.time_critical {
            b |= 0x80;
        }
        if self.time_critical_reserve {
            b |= 0x40;
        }
        if self.timestamp.is_some() {
            b |= 0x08;
        }
        if self.timestamp_echo.is_some() {
            b |= 0x04;
        }
        b
    }

    /// Byte length of the flag byte plus any present timestamp fields.
    pub fn header_len(&self) -> usize {
        1 + if self.timestamp.is_some() { 2 } else { 0 }
            + if self.timestamp_echo.is_some() { 2 } else { 0 }
    }

    /// Sum of each chunk's full wire size (type byte + length field + payload).
    pub fn chunks_len(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| 3 + c.payload_len() as usize)
            .sum()
    }

    /// Total length before padding: `header_len() + chunks_len()`. Used to
    /// decide whether a packet needs fragmenting against an mtu.
    pub fn serialized_len(&self) -> usize {
        self.header_len() + self.chunks_len()
    }

    fn padding_len(&self) -> usize {
        let total = self.serialized_len();
        (total + 16 - 1) % 16
    }

    fn write_header_and_chunks(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.flags_byte());
        if let Some(ts) = self.timestamp {
            buf.put_u16(ts);
        }
        if let Some(ts_echo) = self.timestamp_echo {
            buf.put_u16(ts_echo);
        }
        for chunk in &self.chunks {
            chunk.write_to(buf)?;
        }
        Ok(())
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.write_header_and_chunks(buf)?;
        for _ in 0..self.padding_len() {
            buf.put_u8(0xff);
        }
        Ok(())
    }

    pub fn read_from(buf: &mut Bytes) -> Result<Self> {
        if !buf.has_remaining() {
            return Err(Error::Truncated);
        }
        let flags = buf.get_u8();
        let time_critical = flags & 0x80 != 0;
        let time_critical_reserve = flags & 0x40 != 0;
        let timestamp_present = flags & 0x08 != 0;
        let timestamp_echo_present = flags & 0x04 != 0;
        let mode = Mode::from_bits(flags);

        if timestamp_present && buf.remaining() < 2 {
            return Err(Error::Truncated);
        }
        let timestamp = if timestamp_present {
            Some(buf.get_u16())
        } else {
            None
        };

        if timestamp_echo_present && buf.remaining() < 2 {
            return Err(Error::Truncated);
        }
        let timestamp_echo = if timestamp_echo_present {
            Some(buf.get_u16())
        } else {
            None
        };

        let mut chunks = Vec::new();
        while buf.has_remaining() {
            let type_byte = buf[0];
            match Chunk::read_from(buf)? {
                Some(chunk) => {
                    trace!("dispatched chunk type {:#04x}", type_byte);
                    chunks.push(chunk);
                }
                None => {
                    if type_byte != 0x00 && type_byte != 0xff {
                        warn!("unknown chunk type {:#04x} encountered mid-packet", type_byte);
                    }
                    break;
                }
            }
        }

        Ok(Packet {
            time_critical,
            time_critical_reserve,
            mode,
            timestamp,
            timestamp_echo,
            chunks,
        })
    }

    /// Splits this packet's serialized header+chunks into `FragmentChunk`s no
    /// larger than `mtu` bytes each, per the outbound fragmentation rule.
    pub fn into_fragments(&self, mtu: u16, packet_id: u32) -> Result<Vec<FragmentChunk>> {
        let mut scratch = BytesMut::new();
        self.write_header_and_chunks(&mut scratch)?;
        let data = scratch.freeze();

        let mtu = mtu as usize;
        let total = data.len();
        let n = if total == 0 { 1 } else { (total + mtu - 1) / mtu };

        let mut fragments = Vec::with_capacity(n);
        for i in 0..n {
            let start = i * mtu;
            let end = usize::min((i + 1) * mtu, total);
            fragments.push(FragmentChunk {
                more_fragments: i < n - 1,
                packet_id: Vlu::new(packet_id)?,
                fragment_num: Vlu::new(i as u32)?,
                fragment: data[start..end].to_vec(),
            });
        }
        Ok(fragments)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chunk::PingChunk;

    fn ping(n: usize) -> Chunk {
        Chunk::Ping(PingChunk {
            message: vec![0xab; n],
        })
    }

    #[test]
    fn test_packet_round_trip_no_timestamps() {
        let packet = Packet {
            time_critical: false,
            time_critical_reserve: false,
            mode: Mode::Responder,
            timestamp: None,
            timestamp_echo: None,
            chunks: vec![ping(4)],
        };
        let mut buf = BytesMut::new();
        packet.write_to(&mut buf).unwrap();
        let mut bytes = buf.freeze();
        let decoded = Packet::read_from(&mut bytes).unwrap();
        assert_eq!(decoded.chunks, packet.chunks);
        assert_eq!(decoded.mode, Mode::Responder);
    }

    #[test]
    fn test_packet_round_trip_with_timestamps() {
        let packet = Packet {
            time_critical: true,
            time_critical_reserve: false,
            mode: Mode::Startup,
            timestamp: Some(0x1234),
            timestamp_echo: Some(0x5678),
            chunks: vec![ping(2)],
        };
        let mut buf = BytesMut::new();
        packet.write_to(&mut buf).unwrap();
        let mut bytes = buf.freeze();
        let decoded = Packet::read_from(&mut bytes).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_padding_bytes_are_all_0xff() {
        let packet = Packet {
            time_critical: false,
            time_critical_reserve: false,
            mode: Mode::Responder,
            timestamp: None,
            timestamp_echo: None,
            chunks: vec![ping(4)],
        };
        let mut buf = BytesMut::new();
        packet.write_to(&mut buf).unwrap();
        // header_len=1, chunks_len=7: padding_len() = (8 + 16 - 1) % 16 = 7.
        assert_eq!(buf.len(), 15);
        assert!(buf[8..].iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_fragmentation_splits_on_mtu_boundary() {
        let packet = Packet {
            time_critical: false,
            time_critical_reserve: false,
            mode: Mode::Startup,
            timestamp: None,
            timestamp_echo: None,
            chunks: vec![ping(0); 3]
                .into_iter()
                .enumerate()
                .map(|(i, _)| {
                    Chunk::Ping(PingChunk {
                        message: vec![i as u8; 8],
                    })
                })
                .collect(),
        };
        let fragments = packet.into_fragments(20, 7).unwrap();
        assert!(fragments.len() >= 2);
        assert!(fragments.iter().rev().skip(1).all(|f| f.more_fragments));
        assert!(!fragments.last().unwrap().more_fragments);
        for f in &fragments {
            assert_eq!(f.packet_id, Vlu(7));
        }
    }
}
