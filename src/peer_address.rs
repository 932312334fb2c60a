use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Where a peer address was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Unknown = 0,
    Local = 1,
    Remote = 2,
    Proxy = 3,
}

impl Origin {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => Origin::Local,
            2 => Origin::Remote,
            3 => Origin::Proxy,
            _ => Origin::Unknown,
        }
    }
}

/// `(origin, ip, port)` triple, encoded as one flag byte, 4 or 16 address
/// bytes, and a big-endian port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAddress {
    pub origin: Origin,
    pub ip: Vec<u8>,
    pub port: u16,
}

impl PeerAddress {
    /// Total encoded length: `1 + len(ip) + 2`.
    pub fn length(&self) -> usize {
        1 + self.ip.len() + 2
    }

    pub fn write_to<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let mut flags = self.origin as u8;
        if self.ip.len() == 16 {
            flags |= 1 << 7;
        }
        buf.put_u8(flags);
        buf.put_slice(&self.ip);
        buf.put_u16(self.port);
        Ok(())
    }

    pub fn read_from<B: Buf>(buf: &mut B) -> Result<Self> {
        if !buf.has_remaining() {
            return Err(Error::Truncated);
        }
        let flags = buf.get_u8();
        let origin = Origin::from_bits(flags);
        let ip_len = if flags & 0x80 != 0 { 16 } else { 4 };

        if buf.remaining() < ip_len + 2 {
            return Err(Error::Truncated);
        }

        let mut ip = vec![0u8; ip_len];
        buf.copy_to_slice(&mut ip);
        let port = buf.get_u16();

        Ok(PeerAddress { origin, ip, port })
    }
}
