use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Largest value representable by a 4-byte VLU.
pub const MAX_VALUE: u32 = (1 << 28) - 1;

/// A variable-length unsigned integer in `[0, 2^28 - 1]`.
///
/// Each encoded byte carries 7 value bits plus a continuation bit in the
/// high position; groups are emitted most-significant-first and the final
/// byte has its continuation bit clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vlu(pub u32);

impl Vlu {
    pub fn new(value: u32) -> Result<Self> {
        if value > MAX_VALUE {
            return Err(Error::VluOutOfRange(value));
        }
        Ok(Vlu(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Number of bytes this value encodes to, per the closed ranges in §4.1.
    pub fn byte_length(self) -> usize {
        match self.0 {
            0..=0x7f => 1,
            0x80..=0x3fff => 2,
            0x4000..=0x1f_ffff => 3,
            _ => 4,
        }
    }

    pub fn write_to<B: BufMut>(self, buf: &mut B) -> Result<()> {
        if self.0 > MAX_VALUE {
            return Err(Error::VluOutOfRange(self.0));
        }

        if self.0 == 0 {
            buf.put_u8(0);
            return Ok(());
        }

        // Leading all-zero groups are skipped; once the first non-zero
        // group is emitted every later group (including a zero one) is
        // still written, since the recipient recovers length from the VLU
        // bit pattern, not from context.
        let mut started = false;
        for i in (0..4).rev() {
            let group = ((self.0 >> (7 * i)) & 0x7f) as u8;
            if group != 0 {
                started = true;
            }
            if started {
                if i == 0 {
                    buf.put_u8(group);
                } else {
                    buf.put_u8(group | 0x80);
                }
            }
        }

        Ok(())
    }

    /// Reads a VLU from `buf`, returning the decoded value. Consumes at most
    /// 4 bytes; a 5th continuation bit is `VluOverflow`.
    pub fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        let mut value: u32 = 0;

        for total in 0..=3 {
            if !buf.has_remaining() {
                return Err(Error::Truncated);
            }
            let byte = buf.get_u8();
            let continued = byte & 0x80 != 0;
            let group = byte & 0x7f;

            value = (value << 7) | u32::from(group);

            if !continued {
                return Ok(Vlu(value));
            } else if total == 3 {
                return Err(Error::VluOverflow);
            }
        }

        unreachable!()
    }
}

impl From<usize> for Vlu {
    fn from(v: usize) -> Self {
        Vlu(v as u32)
    }
}

impl From<Vlu> for usize {
    fn from(v: Vlu) -> Self {
        v.0 as usize
    }
}

/// Writes `encode(len(data))` followed by the raw bytes of `data`.
pub fn write_vlu_bytes<B: BufMut>(buf: &mut B, data: &[u8]) -> Result<()> {
    Vlu::new(data.len() as u32)?.write_to(buf)?;
    buf.put_slice(data);
    Ok(())
}

/// Reads a VLU length prefix followed by that many raw bytes.
///
/// Returns `(byte_length_of_vlu_prefix, data)` so callers can subtract the
/// combined field length from a declared container length.
pub fn read_vlu_bytes<B: Buf>(buf: &mut B) -> Result<(usize, Vec<u8>)> {
    let len = Vlu::read_from(buf)?;
    let prefix_len = len.byte_length();
    let n = len.value() as usize;
    if buf.remaining() < n {
        return Err(Error::Truncated);
    }
    let mut data = vec![0u8; n];
    buf.copy_to_slice(&mut data);
    Ok((prefix_len, data))
}
