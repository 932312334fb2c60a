use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::{NEXT_USER_DATA, USER_DATA};
use crate::error::{Error, Result};
use crate::vlu::Vlu;

/// Position of a `UserData` payload within its flow's fragmented stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentControl {
    Whole = 0,
    Begin = 1,
    End = 2,
    Middle = 3,
}

impl FragmentControl {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => FragmentControl::Whole,
            1 => FragmentControl::Begin,
            2 => FragmentControl::End,
            _ => FragmentControl::Middle,
        }
    }
}

/// One `(type, value)` entry in a `UserData` option list, terminated by a
/// zero-length entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataOption {
    pub option_type: Vlu,
    pub value: Vec<u8>,
}

/// Known `UserDataOption` type codes. Not exhaustive; unrecognized values
/// round-trip unchanged.
pub const OPTION_PER_FLOW_METADATA: u32 = 0x00;
pub const OPTION_RETURN_FLOW_ASSOCIATION: u32 = 0x0a;

impl UserDataOption {
    fn length(&self) -> usize {
        self.option_type.byte_length() + self.value.len()
    }

    fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        Vlu::new(self.length() as u32)?.write_to(buf)?;
        self.option_type.write_to(buf)?;
        buf.put_slice(&self.value);
        Ok(())
    }

    /// Reads one option entry, or `None` if the terminating zero-length
    /// marker was read.
    fn read_from(payload: &mut Bytes) -> Result<Option<Self>> {
        let length = Vlu::read_from(payload)?;
        if length.value() == 0 {
            return Ok(None);
        }
        let option_type = Vlu::read_from(payload)?;
        let value_length = length
            .value()
            .checked_sub(option_type.byte_length() as u32)
            .ok_or(Error::CorruptedUserData)? as usize;
        if payload.remaining() < value_length {
            return Err(Error::Truncated);
        }
        let value = payload.copy_to_bytes(value_length).to_vec();
        Ok(Some(UserDataOption { option_type, value }))
    }
}

/// A slice of application data on a reliable flow, optionally carrying
/// per-flow or return-flow options on its first fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataChunk {
    pub options_present: bool,
    pub fragment_control: FragmentControl,
    pub abandon: bool,
    pub is_final: bool,
    pub flow_id: Vlu,
    pub sequence_number: Vlu,
    pub fsn_offset: Vlu,
    pub options: Vec<UserDataOption>,
    pub user_data: Vec<u8>,
}

impl UserDataChunk {
    fn flags_byte(&self) -> u8 {
        let mut b = 0u8;
        if self.options_present {
            b |= 0x80;
        }
        b |= (self.fragment_control as u8) << 4;
        if self.abandon {
            b |= 0x02;
        }
        if self.is_final {
            b |= 0x01;
        }
        b
    }

    fn options_len(&self) -> usize {
        let mut len: usize = self.options.iter().map(|o| {
            let body_len = o.length();
            Vlu(body_len as u32).byte_length() + body_len
        }).sum();
        if self.options_present {
            len += 1; // terminating zero-length marker
        }
        len
    }

    pub fn payload_len(&self) -> u16 {
        (1 + self.flow_id.byte_length()
            + self.sequence_number.byte_length()
            + self.fsn_offset.byte_length()
            + self.options_len()
            + self.user_data.len()) as u16
    }

    fn write_next_to(&self, buf: &mut BytesMut, type_byte: u8) -> Result<()> {
        buf.put_u8(type_byte);
        buf.put_u16(self.payload_len());
        buf.put_u8(self.flags_byte());
        self.flow_id.write_to(buf)?;
        self.sequence_number.write_to(buf)?;
        self.fsn_offset.write_to(buf)?;
        if self.options_present {
            for option in &self.options {
                option.write_to(buf)?;
            }
            Vlu(0).write_to(buf)?;
        }
        buf.put_slice(&self.user_data);
        Ok(())
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.write_next_to(buf, USER_DATA)
    }

    fn read_next_from(payload: &mut Bytes) -> Result<Self> {
        if !payload.has_remaining() {
            return Err(Error::Truncated);
        }
        let flags = payload.get_u8();
        let options_present = flags & 0x80 != 0;
        let fragment_control = FragmentControl::from_bits(flags >> 4);
        let abandon = flags & 0x02 != 0;
        let is_final = flags & 0x01 != 0;

        let flow_id = Vlu::read_from(payload)?;
        let sequence_number = Vlu::read_from(payload)?;
        let fsn_offset = Vlu::read_from(payload)?;

        let mut options = Vec::new();
        if options_present {
            while let Some(option) = UserDataOption::read_from(payload)? {
                options.push(option);
            }
        }
        let user_data = payload.copy_to_bytes(payload.remaining()).to_vec();

        Ok(UserDataChunk {
            options_present,
            fragment_control,
            abandon,
            is_final,
            flow_id,
            sequence_number,
            fsn_offset,
            options,
            user_data,
        })
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        Self::read_next_from(payload)
    }
}

/// Identical wire format to [`UserDataChunk`] under a different opcode,
/// used to carry the data for a flow's next expected sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextUserDataChunk(pub UserDataChunk);

impl NextUserDataChunk {
    pub fn payload_len(&self) -> u16 {
        self.0.payload_len()
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        self.0.write_next_to(buf, NEXT_USER_DATA)
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        Ok(NextUserDataChunk(UserDataChunk::read_next_from(payload)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_user_data_flags_byte_layout() {
        let chunk = UserDataChunk {
            options_present: true,
            fragment_control: FragmentControl::Begin,
            abandon: false,
            is_final: true,
            flow_id: Vlu(1),
            sequence_number: Vlu(0),
            fsn_offset: Vlu(0),
            options: vec![],
            user_data: vec![],
        };
        assert_eq!(chunk.flags_byte(), 0b1001_0001);
    }

    #[test]
    fn test_user_data_round_trip_with_options() {
        let chunk = UserDataChunk {
            options_present: true,
            fragment_control: FragmentControl::Whole,
            abandon: false,
            is_final: true,
            flow_id: Vlu(3),
            sequence_number: Vlu(42),
            fsn_offset: Vlu(0),
            options: vec![UserDataOption {
                option_type: Vlu(OPTION_RETURN_FLOW_ASSOCIATION),
                value: vec![9, 9],
            }],
            user_data: vec![1, 2, 3, 4],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.split_off(3).freeze();
        let decoded = UserDataChunk::read_from(&mut payload).unwrap();
        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_user_data_round_trip_without_options() {
        let chunk = UserDataChunk {
            options_present: false,
            fragment_control: FragmentControl::Middle,
            abandon: true,
            is_final: false,
            flow_id: Vlu(1),
            sequence_number: Vlu(7),
            fsn_offset: Vlu(2),
            options: vec![],
            user_data: vec![0xaa, 0xbb],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.split_off(3).freeze();
        let decoded = UserDataChunk::read_from(&mut payload).unwrap();
        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_next_user_data_uses_distinct_opcode() {
        let chunk = NextUserDataChunk(UserDataChunk {
            options_present: false,
            fragment_control: FragmentControl::Whole,
            abandon: false,
            is_final: true,
            flow_id: Vlu(1),
            sequence_number: Vlu(1),
            fsn_offset: Vlu(0),
            options: vec![],
            user_data: vec![],
        });
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        assert_eq!(buf[0], NEXT_USER_DATA);
    }
}
