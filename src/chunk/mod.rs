//! Chunk codecs: the 17 typed records that a packet's body is built from.

mod buffer_probe;
mod chunk_header;
mod chunk_type;
mod data_ack_bitmap;
mod data_ack_ranges;
mod flow_exception_report;
mod forwarded_hello;
mod fragment;
mod hello_cookie_change;
mod initiator_hello;
mod initiator_initial_keying;
mod ping;
mod ping_reply;
mod responder_hello;
mod responder_initial_keying;
mod responder_redirect;
mod session_close;
mod user_data;

pub use buffer_probe::BufferProbeChunk;
pub use chunk_header::{ChunkHeader, CHUNK_HEADER_SIZE};
pub use chunk_type::{
    ChunkType, BUFFER_PROBE, CLOSING_TYPES, DATA_ACKNOWLEDGEMENT_BITMAP,
    DATA_ACKNOWLEDGEMENT_RANGES, ESTABLISHED_TYPES, FLOW_EXCEPTION_REPORT, FORWARDED_HELLO,
    FRAGMENT, HANDSHAKE_TYPES, HELLO_COOKIE_CHANGE, INITIATOR_HELLO, INITIATOR_INITIAL_KEYING,
    NEXT_USER_DATA, PING, PING_REPLY, RESPONDER_HELLO, RESPONDER_INITIAL_KEYING,
    RESPONDER_REDIRECT, SESSION_CLOSE_ACKNOWLEDGEMENT, SESSION_CLOSE_REQUEST, USER_DATA,
};
pub use data_ack_bitmap::DataAcknowledgementBitmapChunk;
pub use data_ack_ranges::{DataAcknowledgementRange, DataAcknowledgementRangesChunk};
pub use flow_exception_report::FlowExceptionReportChunk;
pub use forwarded_hello::ForwardedHelloChunk;
pub use fragment::FragmentChunk;
pub use hello_cookie_change::HelloCookieChangeChunk;
pub use initiator_hello::InitiatorHelloChunk;
pub use initiator_initial_keying::InitiatorInitialKeyingChunk;
pub use ping::PingChunk;
pub use ping_reply::PingReplyChunk;
pub use responder_hello::ResponderHelloChunk;
pub use responder_initial_keying::ResponderInitialKeyingChunk;
pub use responder_redirect::ResponderRedirectChunk;
pub use session_close::{SessionCloseAcknowledgementChunk, SessionCloseRequestChunk};
pub use user_data::{FragmentControl, NextUserDataChunk, UserDataChunk, UserDataOption};

use bytes::{Buf, Bytes, BytesMut};

use crate::error::Result;

/// Whether `typ` is one of the recognized chunk opcodes.
fn is_known_type(typ: u8) -> bool {
    matches!(
        typ,
        PING
            | PING_REPLY
            | SESSION_CLOSE_REQUEST
            | SESSION_CLOSE_ACKNOWLEDGEMENT
            | FORWARDED_HELLO
            | USER_DATA
            | NEXT_USER_DATA
            | BUFFER_PROBE
            | INITIATOR_HELLO
            | INITIATOR_INITIAL_KEYING
            | DATA_ACKNOWLEDGEMENT_BITMAP
            | DATA_ACKNOWLEDGEMENT_RANGES
            | FLOW_EXCEPTION_REPORT
            | RESPONDER_HELLO
            | RESPONDER_REDIRECT
            | RESPONDER_INITIAL_KEYING
            | HELLO_COOKIE_CHANGE
            | FRAGMENT
    )
}

/// Any one of the 17 chunk types a packet body may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Ping(PingChunk),
    PingReply(PingReplyChunk),
    SessionCloseRequest(SessionCloseRequestChunk),
    SessionCloseAcknowledgement(SessionCloseAcknowledgementChunk),
    ForwardedHello(ForwardedHelloChunk),
    UserData(UserDataChunk),
    NextUserData(NextUserDataChunk),
    BufferProbe(BufferProbeChunk),
    InitiatorHello(InitiatorHelloChunk),
    InitiatorInitialKeying(InitiatorInitialKeyingChunk),
    DataAcknowledgementBitmap(DataAcknowledgementBitmapChunk),
    DataAcknowledgementRanges(DataAcknowledgementRangesChunk),
    FlowExceptionReport(FlowExceptionReportChunk),
    ResponderHello(ResponderHelloChunk),
    ResponderRedirect(ResponderRedirectChunk),
    ResponderInitialKeying(ResponderInitialKeyingChunk),
    HelloCookieChange(HelloCookieChangeChunk),
    Fragment(FragmentChunk),
}

impl Chunk {
    pub fn chunk_type(&self) -> u8 {
        match self {
            Chunk::Ping(_) => PING,
            Chunk::PingReply(_) => PING_REPLY,
            Chunk::SessionCloseRequest(_) => SESSION_CLOSE_REQUEST,
            Chunk::SessionCloseAcknowledgement(_) => SESSION_CLOSE_ACKNOWLEDGEMENT,
            Chunk::ForwardedHello(_) => FORWARDED_HELLO,
            Chunk::UserData(_) => USER_DATA,
            Chunk::NextUserData(_) => NEXT_USER_DATA,
            Chunk::BufferProbe(_) => BUFFER_PROBE,
            Chunk::InitiatorHello(_) => INITIATOR_HELLO,
            Chunk::InitiatorInitialKeying(_) => INITIATOR_INITIAL_KEYING,
            Chunk::DataAcknowledgementBitmap(_) => DATA_ACKNOWLEDGEMENT_BITMAP,
            Chunk::DataAcknowledgementRanges(_) => DATA_ACKNOWLEDGEMENT_RANGES,
            Chunk::FlowExceptionReport(_) => FLOW_EXCEPTION_REPORT,
            Chunk::ResponderHello(_) => RESPONDER_HELLO,
            Chunk::ResponderRedirect(_) => RESPONDER_REDIRECT,
            Chunk::ResponderInitialKeying(_) => RESPONDER_INITIAL_KEYING,
            Chunk::HelloCookieChange(_) => HELLO_COOKIE_CHANGE,
            Chunk::Fragment(_) => FRAGMENT,
        }
    }

    /// The on-wire payload length field (payload bytes only, excluding the
    /// type byte and the length field itself).
    pub fn payload_len(&self) -> u16 {
        match self {
            Chunk::Ping(c) => c.payload_len(),
            Chunk::PingReply(c) => c.payload_len(),
            Chunk::SessionCloseRequest(c) => c.payload_len(),
            Chunk::SessionCloseAcknowledgement(c) => c.payload_len(),
            Chunk::ForwardedHello(c) => c.payload_len(),
            Chunk::UserData(c) => c.payload_len(),
            Chunk::NextUserData(c) => c.payload_len(),
            Chunk::BufferProbe(c) => c.payload_len(),
            Chunk::InitiatorHello(c) => c.payload_len(),
            Chunk::InitiatorInitialKeying(c) => c.payload_len(),
            Chunk::DataAcknowledgementBitmap(c) => c.payload_len(),
            Chunk::DataAcknowledgementRanges(c) => c.payload_len(),
            Chunk::FlowExceptionReport(c) => c.payload_len(),
            Chunk::ResponderHello(c) => c.payload_len(),
            Chunk::ResponderRedirect(c) => c.payload_len(),
            Chunk::ResponderInitialKeying(c) => c.payload_len(),
            Chunk::HelloCookieChange(c) => c.payload_len(),
            Chunk::Fragment(c) => c.payload_len(),
        }
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        match self {
            Chunk::Ping(c) => c.write_to(buf),
            Chunk::PingReply(c) => c.write_to(buf),
            Chunk::SessionCloseRequest(c) => c.write_to(buf),
            Chunk::SessionCloseAcknowledgement(c) => c.write_to(buf),
            Chunk::ForwardedHello(c) => c.write_to(buf),
            Chunk::UserData(c) => c.write_to(buf),
            Chunk::NextUserData(c) => c.write_to(buf),
            Chunk::BufferProbe(c) => c.write_to(buf),
            Chunk::InitiatorHello(c) => c.write_to(buf),
            Chunk::InitiatorInitialKeying(c) => c.write_to(buf),
            Chunk::DataAcknowledgementBitmap(c) => c.write_to(buf),
            Chunk::DataAcknowledgementRanges(c) => c.write_to(buf),
            Chunk::FlowExceptionReport(c) => c.write_to(buf),
            Chunk::ResponderHello(c) => c.write_to(buf),
            Chunk::ResponderRedirect(c) => c.write_to(buf),
            Chunk::ResponderInitialKeying(c) => c.write_to(buf),
            Chunk::HelloCookieChange(c) => c.write_to(buf),
            Chunk::Fragment(c) => c.write_to(buf),
        }
    }

    /// Reads one chunk from the front of `buf`: a type byte, a u16 length,
    /// then exactly that many payload bytes handed to the matching decoder.
    ///
    /// Returns `Ok(None)` without consuming anything when the leading byte
    /// is not a recognized opcode. Padding bytes (`0x00`/`0xFF`) and any
    /// future opcode this codec doesn't know about both look like this to
    /// the caller, which is exactly the forward-compatible stop condition:
    /// peeking first means we never misread padding as a bogus length field.
    pub fn read_from(buf: &mut Bytes) -> Result<Option<Self>> {
        if !buf.has_remaining() {
            return Err(crate::error::Error::Truncated);
        }
        let typ = buf[0];
        if !is_known_type(typ) {
            return Ok(None);
        }
        buf.advance(1);
        let header = ChunkHeader::unmarshal_payload_len(typ, buf)?;
        let len = header.payload_len as usize;
        if buf.remaining() < len {
            return Err(crate::error::Error::Truncated);
        }
        let mut payload = buf.copy_to_bytes(len);

        let chunk = match typ {
            PING => Chunk::Ping(PingChunk::read_from(&mut payload)?),
            PING_REPLY => Chunk::PingReply(PingReplyChunk::read_from(&mut payload)?),
            SESSION_CLOSE_REQUEST => {
                Chunk::SessionCloseRequest(SessionCloseRequestChunk::read_from(&mut payload)?)
            }
            SESSION_CLOSE_ACKNOWLEDGEMENT => Chunk::SessionCloseAcknowledgement(
                SessionCloseAcknowledgementChunk::read_from(&mut payload)?,
            ),
            FORWARDED_HELLO => Chunk::ForwardedHello(ForwardedHelloChunk::read_from(&mut payload)?),
            USER_DATA => Chunk::UserData(UserDataChunk::read_from(&mut payload)?),
            NEXT_USER_DATA => Chunk::NextUserData(NextUserDataChunk::read_from(&mut payload)?),
            BUFFER_PROBE => Chunk::BufferProbe(BufferProbeChunk::read_from(&mut payload)?),
            INITIATOR_HELLO => Chunk::InitiatorHello(InitiatorHelloChunk::read_from(&mut payload)?),
            INITIATOR_INITIAL_KEYING => Chunk::InitiatorInitialKeying(
                InitiatorInitialKeyingChunk::read_from(&mut payload)?,
            ),
            DATA_ACKNOWLEDGEMENT_BITMAP => Chunk::DataAcknowledgementBitmap(
                DataAcknowledgementBitmapChunk::read_from(&mut payload)?,
            ),
            DATA_ACKNOWLEDGEMENT_RANGES => Chunk::DataAcknowledgementRanges(
                DataAcknowledgementRangesChunk::read_from(&mut payload)?,
            ),
            FLOW_EXCEPTION_REPORT => {
                Chunk::FlowExceptionReport(FlowExceptionReportChunk::read_from(&mut payload)?)
            }
            RESPONDER_HELLO => Chunk::ResponderHello(ResponderHelloChunk::read_from(&mut payload)?),
            RESPONDER_REDIRECT => {
                Chunk::ResponderRedirect(ResponderRedirectChunk::read_from(&mut payload)?)
            }
            RESPONDER_INITIAL_KEYING => Chunk::ResponderInitialKeying(
                ResponderInitialKeyingChunk::read_from(&mut payload)?,
            ),
            HELLO_COOKIE_CHANGE => {
                Chunk::HelloCookieChange(HelloCookieChangeChunk::read_from(&mut payload)?)
            }
            FRAGMENT => Chunk::Fragment(FragmentChunk::read_from(&mut payload)?),
            _ => return Ok(None),
        };

        Ok(Some(chunk))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chunk_dispatch_round_trip() {
        let chunk = Chunk::Ping(PingChunk {
            message: vec![1, 2, 3],
        });
        let mut buf = BytesMut::new();
        chunk.write_to(&mut buf).unwrap();
        let mut bytes = buf.freeze();
        let decoded = Chunk::read_from(&mut bytes).unwrap().unwrap();
        assert_eq!(decoded, chunk);
    }

    #[test]
    fn test_chunk_dispatch_unknown_type_returns_none() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&[0xff, 0x00, 0x00]);
        let mut bytes = buf.freeze();
        assert!(Chunk::read_from(&mut bytes).unwrap().is_none());
    }
}
