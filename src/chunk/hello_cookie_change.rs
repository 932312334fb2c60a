use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::HELLO_COOKIE_CHANGE;
use crate::error::Result;
use crate::vlu::{self, Vlu};

/// Changes the cookie used by an in-flight `InitiatorInitialKeying`, in
/// startup mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloCookieChangeChunk {
    pub old_cookie: Vec<u8>,
    pub new_cookie: Vec<u8>,
}

impl HelloCookieChangeChunk {
    pub fn payload_len(&self) -> u16 {
        (Vlu::from(self.old_cookie.len()).byte_length()
            + self.old_cookie.len()
            + self.new_cookie.len()) as u16
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(HELLO_COOKIE_CHANGE);
        buf.put_u16(self.payload_len());
        vlu::write_vlu_bytes(buf, &self.old_cookie)?;
        buf.put_slice(&self.new_cookie);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let (_, old_cookie) = vlu::read_vlu_bytes(payload)?;
        let new_cookie = payload.copy_to_bytes(payload.remaining()).to_vec();
        Ok(HelloCookieChangeChunk {
            old_cookie,
            new_cookie,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hello_cookie_change_round_trip() {
        let chunk = HelloCookieChangeChunk {
            old_cookie: vec![1, 2, 3, 4],
            new_cookie: vec![5; 64],
        };
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(
            HelloCookieChangeChunk::read_from(&mut payload).unwrap(),
            chunk
        );
    }
}
