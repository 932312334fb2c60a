use crate::chunk::{CLOSING_TYPES, ESTABLISHED_TYPES, HANDSHAKE_TYPES};

/// Which phase of a session's lifecycle is currently gating chunk dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTypeTag {
    Handshake,
    Established,
    Closing,
}

/// The session-type collaborator from the handshake/established/closing
/// redesign: a tagged value replacing a virtual-dispatch hierarchy, since
/// the set of phases is closed and known up front.
pub trait SessionType {
    fn tag(&self) -> SessionTypeTag;
    fn is_valid_chunk_type(&self, type_byte: u8) -> bool;
    /// Called after a chunk of `type_byte` is successfully parsed; may
    /// record state used by a later `next_type` call.
    fn got_chunk_type(&mut self, type_byte: u8);
    /// Returns the `SessionType` to use for the next packet, which may
    /// differ from `self` if this packet completed a phase transition.
    fn next_type(self: Box<Self>) -> Box<dyn SessionType + Send>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HandshakeType {
    keying_seen: bool,
}

impl SessionType for HandshakeType {
    fn tag(&self) -> SessionTypeTag {
        SessionTypeTag::Handshake
    }

    fn is_valid_chunk_type(&self, type_byte: u8) -> bool {
        HANDSHAKE_TYPES.contains(&type_byte)
    }

    fn got_chunk_type(&mut self, type_byte: u8) {
        use crate::chunk::{INITIATOR_INITIAL_KEYING, RESPONDER_INITIAL_KEYING};
        if type_byte == INITIATOR_INITIAL_KEYING || type_byte == RESPONDER_INITIAL_KEYING {
            self.keying_seen = true;
        }
    }

    fn next_type(self: Box<Self>) -> Box<dyn SessionType + Send> {
        if self.keying_seen {
            Box::new(EstablishedType::default())
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EstablishedType {
    close_requested: bool,
}

impl SessionType for EstablishedType {
    fn tag(&self) -> SessionTypeTag {
        SessionTypeTag::Established
    }

    fn is_valid_chunk_type(&self, type_byte: u8) -> bool {
        ESTABLISHED_TYPES.contains(&type_byte)
    }

    fn got_chunk_type(&mut self, type_byte: u8) {
        use crate::chunk::SESSION_CLOSE_REQUEST;
        if type_byte == SESSION_CLOSE_REQUEST {
            self.close_requested = true;
        }
    }

    fn next_type(self: Box<Self>) -> Box<dyn SessionType + Send> {
        if self.close_requested {
            Box::new(ClosingType::default())
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClosingType;

impl SessionType for ClosingType {
    fn tag(&self) -> SessionTypeTag {
        SessionTypeTag::Closing
    }

    fn is_valid_chunk_type(&self, type_byte: u8) -> bool {
        CLOSING_TYPES.contains(&type_byte)
    }

    fn got_chunk_type(&mut self, _type_byte: u8) {}

    fn next_type(self: Box<Self>) -> Box<dyn SessionType + Send> {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chunk::{INITIATOR_INITIAL_KEYING, PING, SESSION_CLOSE_REQUEST, USER_DATA};

    #[test]
    fn test_handshake_rejects_established_only_types() {
        let handshake = HandshakeType::default();
        assert!(!handshake.is_valid_chunk_type(USER_DATA));
        assert!(handshake.is_valid_chunk_type(INITIATOR_INITIAL_KEYING));
    }

    #[test]
    fn test_handshake_transitions_to_established_after_keying() {
        let mut handshake = Box::new(HandshakeType::default());
        handshake.got_chunk_type(INITIATOR_INITIAL_KEYING);
        let next = handshake.next_type();
        assert_eq!(next.tag(), SessionTypeTag::Established);
    }

    #[test]
    fn test_established_transitions_to_closing_after_close_request() {
        let mut established = Box::new(EstablishedType::default());
        established.got_chunk_type(SESSION_CLOSE_REQUEST);
        let next = established.next_type();
        assert_eq!(next.tag(), SessionTypeTag::Closing);
    }

    #[test]
    fn test_closing_only_permits_close_types() {
        let closing = ClosingType::default();
        assert!(!closing.is_valid_chunk_type(PING));
        assert!(closing.is_valid_chunk_type(SESSION_CLOSE_REQUEST));
    }
}
