//! Session codec support for a UDP real-time transport in the RTMFP family.
//!
//! This crate implements the wire-level codec: VLU integers, the packet
//! header and padding discipline, the fixed set of chunk records, outbound
//! fragmentation and inbound reassembly, and the session glue that ties a
//! scrambled session id to a pluggable block cipher. It does not open UDP
//! sockets, schedule retransmissions, or interpret the handshake chunks it
//! parses.

#![warn(rust_2018_idioms)]

mod buffer;
pub mod chunk;
mod checksum;
mod config;
mod crypto;
mod error;
mod fragments_buffer;
mod packet;
mod peer_address;
mod session;
mod session_type;
mod vlu;

pub use buffer::ByteBuffer;
pub use checksum::checksum;
pub use config::SessionConfig;
pub use crypto::{CryptoProfile, DefaultProfile, DEFAULT_KEY};
pub use error::{Error, Result};
pub use fragments_buffer::FragmentsBuffer;
pub use packet::{Mode, Packet};
pub use peer_address::{Origin, PeerAddress};
pub use session::Session;
pub use session_type::{ClosingType, EstablishedType, HandshakeType, SessionType, SessionTypeTag};
pub use vlu::Vlu;
