use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::chunk_type::{SESSION_CLOSE_ACKNOWLEDGEMENT, SESSION_CLOSE_REQUEST};
use crate::error::Result;

/// Requests that a session be terminated. Empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCloseRequestChunk;

impl SessionCloseRequestChunk {
    pub fn payload_len(&self) -> u16 {
        0
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(SESSION_CLOSE_REQUEST);
        buf.put_u16(0);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let _ = payload.remaining();
        Ok(SessionCloseRequestChunk)
    }
}

/// Sent in response to a [`SessionCloseRequestChunk`]. Empty payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCloseAcknowledgementChunk;

impl SessionCloseAcknowledgementChunk {
    pub fn payload_len(&self) -> u16 {
        0
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(SESSION_CLOSE_ACKNOWLEDGEMENT);
        buf.put_u16(0);
        Ok(())
    }

    pub fn read_from(payload: &mut Bytes) -> Result<Self> {
        let _ = payload.remaining();
        Ok(SessionCloseAcknowledgementChunk)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_session_close_acknowledgement_scenario() {
        let chunk = SessionCloseAcknowledgementChunk;
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x4C, 0x00, 0x00]);
    }

    #[test]
    fn test_session_close_request_is_empty() {
        let chunk = SessionCloseRequestChunk;
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x0C, 0x00, 0x00]);
        let mut payload = buf.freeze().slice(3..);
        assert_eq!(
            SessionCloseRequestChunk::read_from(&mut payload).unwrap(),
            chunk
        );
    }
}
