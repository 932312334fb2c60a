use std::fmt;

/// Chunk type opcodes, matching the wire table in §3.
pub const PING: u8 = 0x01;
pub const SESSION_CLOSE_REQUEST: u8 = 0x0c;
pub const FORWARDED_HELLO: u8 = 0x0f;
pub const USER_DATA: u8 = 0x10;
pub const NEXT_USER_DATA: u8 = 0x11;
pub const BUFFER_PROBE: u8 = 0x18;
pub const INITIATOR_HELLO: u8 = 0x30;
pub const INITIATOR_INITIAL_KEYING: u8 = 0x38;
pub const PING_REPLY: u8 = 0x41;
pub const SESSION_CLOSE_ACKNOWLEDGEMENT: u8 = 0x4c;
pub const DATA_ACKNOWLEDGEMENT_BITMAP: u8 = 0x50;
pub const DATA_ACKNOWLEDGEMENT_RANGES: u8 = 0x51;
pub const FLOW_EXCEPTION_REPORT: u8 = 0x5e;
pub const RESPONDER_HELLO: u8 = 0x70;
pub const RESPONDER_REDIRECT: u8 = 0x71;
pub const RESPONDER_INITIAL_KEYING: u8 = 0x78;
pub const HELLO_COOKIE_CHANGE: u8 = 0x79;
pub const FRAGMENT: u8 = 0x7f;

/// A chunk type opcode, kept as a newtype so `Display` can render a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub u8);

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            PING => "Ping",
            SESSION_CLOSE_REQUEST => "SessionCloseRequest",
            FORWARDED_HELLO => "ForwardedHello",
            USER_DATA => "UserData",
            NEXT_USER_DATA => "NextUserData",
            BUFFER_PROBE => "BufferProbe",
            INITIATOR_HELLO => "InitiatorHello",
            INITIATOR_INITIAL_KEYING => "InitiatorInitialKeying",
            PING_REPLY => "PingReply",
            SESSION_CLOSE_ACKNOWLEDGEMENT => "SessionCloseAcknowledgement",
            DATA_ACKNOWLEDGEMENT_BITMAP => "DataAcknowledgementBitmap",
            DATA_ACKNOWLEDGEMENT_RANGES => "DataAcknowledgementRanges",
            FLOW_EXCEPTION_REPORT => "FlowExceptionReport",
            RESPONDER_HELLO => "ResponderHello",
            RESPONDER_REDIRECT => "ResponderRedirect",
            RESPONDER_INITIAL_KEYING => "ResponderInitialKeying",
            HELLO_COOKIE_CHANGE => "HelloCookieChange",
            FRAGMENT => "Fragment",
            _ => "Unknown",
        };
        write!(f, "{name} ({:#04x})", self.0)
    }
}

/// Types permitted during the handshake ("startup mode") phase, per §4.8.
pub const HANDSHAKE_TYPES: &[u8] = &[
    FORWARDED_HELLO,
    INITIATOR_HELLO,
    INITIATOR_INITIAL_KEYING,
    RESPONDER_HELLO,
    RESPONDER_REDIRECT,
    RESPONDER_INITIAL_KEYING,
    HELLO_COOKIE_CHANGE,
    FRAGMENT,
];

/// Types permitted once a session is established.
pub const ESTABLISHED_TYPES: &[u8] = &[
    PING,
    PING_REPLY,
    USER_DATA,
    NEXT_USER_DATA,
    BUFFER_PROBE,
    DATA_ACKNOWLEDGEMENT_BITMAP,
    DATA_ACKNOWLEDGEMENT_RANGES,
    FLOW_EXCEPTION_REPORT,
    FRAGMENT,
];

/// Types permitted while a session is closing.
pub const CLOSING_TYPES: &[u8] = &[SESSION_CLOSE_REQUEST, SESSION_CLOSE_ACKNOWLEDGEMENT, FRAGMENT];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType(PING).to_string(), "Ping (0x01)");
        assert_eq!(ChunkType(0x99).to_string(), "Unknown (0x99)");
    }
}
