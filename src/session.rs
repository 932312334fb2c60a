use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use log::{debug, trace, warn};

use crate::buffer::ByteBuffer;
use crate::checksum;
use crate::chunk::{Chunk, FragmentChunk};
use crate::config::SessionConfig;
use crate::crypto::{CryptoProfile, DefaultProfile, DEFAULT_KEY};
use crate::error::{Error, Result};
use crate::fragments_buffer::FragmentsBuffer;
use crate::packet::{Mode, Packet};
use crate::peer_address::PeerAddress;
use crate::session_type::{HandshakeType, SessionType, SessionTypeTag};

/// Per-connection glue: scrambled id, block-cipher regions, outbound
/// fragmentation, inbound reassembly, and session-type chunk gating.
///
/// Everything here is CPU-bound; the session never blocks or performs I/O.
/// A single session must not be driven by more than one reader thread at a
/// time (see the crate-level concurrency notes); `write_packet` may be
/// called concurrently by multiple writers, which is why `packet_counter`
/// is an atomic rather than a plain field.
pub struct Session {
    pub id: u32,
    pub initiator: Option<PeerAddress>,
    pub responder: Option<PeerAddress>,
    pub has_checksums: bool,
    pub established: bool,
    profile: Box<dyn CryptoProfile>,
    packet_counter: AtomicU32,
    config: SessionConfig,
    reassembly: HashMap<u32, FragmentsBuffer>,
    session_type: Option<Box<dyn SessionType + Send>>,
}

impl Session {
    pub fn new(
        id: u32,
        profile: Box<dyn CryptoProfile>,
        session_type: Box<dyn SessionType + Send>,
        config: SessionConfig,
        has_checksums: bool,
    ) -> Self {
        Session {
            id,
            initiator: None,
            responder: None,
            has_checksums,
            established: false,
            profile,
            packet_counter: AtomicU32::new(0),
            config,
            reassembly: HashMap::new(),
            session_type: Some(session_type),
        }
    }

    /// A session keyed with the well-known default key (`DEFAULT_KEY`),
    /// starting in the handshake phase, with checksums enabled and default
    /// fragmentation limits. The common case for a newly accepted peer.
    pub fn with_defaults(id: u32) -> Result<Self> {
        let mut profile = DefaultProfile::new();
        profile.init(&DEFAULT_KEY)?;
        Ok(Session::new(
            id,
            Box::new(profile),
            Box::new(HandshakeType::default()),
            SessionConfig::default(),
            true,
        ))
    }

    pub fn set_encryption_key(&mut self, key: &[u8]) -> Result<()> {
        self.profile.init(key)
    }

    pub fn session_type_tag(&self) -> SessionTypeTag {
        self.session_type
            .as_ref()
            .expect("session_type is always present between calls")
            .tag()
    }

    fn next_packet_id(&self) -> u32 {
        self.packet_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Serializes `packet` into `out`, fragmenting it first if it would
    /// otherwise exceed the configured mtu, then scrambling the id and
    /// encrypting everything after it.
    pub fn write_packet(&mut self, mut packet: Packet, out: &mut ByteBuffer) -> Result<()> {
        let id_offset = out.len();
        out.write_u32(0);
        let checksum_offset = out.len();
        if self.has_checksums {
            out.write_u16(0);
        }

        if packet.serialized_len() > self.config.mtu as usize {
            let packet_id = self.next_packet_id();
            let fragments = packet.into_fragments(self.config.mtu, packet_id)?;
            trace!(
                "packet {} exceeds mtu {}, split into {} fragments",
                packet_id,
                self.config.mtu,
                fragments.len()
            );
            packet.chunks = fragments.into_iter().map(Chunk::Fragment).collect();
        }

        let mut scratch = BytesMut::new();
        packet.write_to(&mut scratch)?;
        out.write_slice(&scratch);

        let body_start = id_offset + 4;

        if self.has_checksums {
            let sum = checksum::checksum(&out.as_slice()[body_start..]);
            out.patch_u16_at(checksum_offset, sum)?;
        }

        self.profile
            .encrypt_at(out.as_mut_slice(), body_start)?;

        let ct = out.slice_at(body_start, 2)?;
        let scrambled = self.id ^ u32::from(ct[0]) ^ u32::from(ct[1]);
        out.patch_u32_at(id_offset, scrambled)?;

        Ok(())
    }

    /// Unscrambles the id, decrypts the remainder, verifies the checksum if
    /// present, parses the header and chunks, and drives fragment
    /// reassembly for any `Fragment` chunks encountered.
    pub fn read_packet(&mut self, in_buf: &mut ByteBuffer) -> Result<Packet> {
        let scrambled = in_buf.read_u32()?;
        let ct = in_buf.peek(2)?;
        let id = scrambled ^ u32::from(ct[0]) ^ u32::from(ct[1]);
        debug!("read_packet: unscrambled session id {:#010x}", id);

        let body_start = in_buf.position();
        self.profile.decrypt_at(in_buf.as_mut_slice(), body_start)?;

        let checksum_region = if self.has_checksums {
            Some(in_buf.as_slice()[body_start..].to_vec())
        } else {
            None
        };
        if self.has_checksums {
            let _ = in_buf.read_u16()?;
        }

        let mut tail = in_buf.tail();
        let mut packet = Packet::read_from(&mut tail)?;

        if (packet.mode as u8) < (Mode::Responder as u8)
            && self.session_type_tag() != SessionTypeTag::Handshake
        {
            return Err(Error::ModeNotPermitted(packet.mode as u8));
        }

        let mut resolved = Vec::with_capacity(packet.chunks.len());
        let chunks = std::mem::take(&mut packet.chunks);
        self.dispatch_chunks(chunks, &mut resolved)?;
        packet.chunks = resolved;

        if let Some(region) = checksum_region {
            if checksum::checksum(&region) != 0 {
                warn!("read_packet: checksum mismatch, discarding packet");
                return Err(Error::BadChecksum);
            }
        }

        if let Some(st) = self.session_type.take() {
            self.session_type = Some(st.next_type());
        }

        Ok(packet)
    }

    /// Validates each chunk against the current session type, reassembling
    /// `Fragment` chunks as they complete and splicing their contents into
    /// `out` in place of the fragment.
    fn dispatch_chunks(&mut self, chunks: Vec<Chunk>, out: &mut Vec<Chunk>) -> Result<()> {
        for chunk in chunks {
            let type_byte = chunk.chunk_type();
            if !self
                .session_type
                .as_ref()
                .expect("session_type is always present between calls")
                .is_valid_chunk_type(type_byte)
            {
                return Err(Error::UnexpectedChunk(type_byte));
            }

            match chunk {
                Chunk::Fragment(fragment) => {
                    self.session_type
                        .as_mut()
                        .expect("session_type is always present between calls")
                        .got_chunk_type(type_byte);
                    let reassembled = self.process_fragment(fragment)?;
                    self.dispatch_chunks(reassembled, out)?;
                }
                other => {
                    self.session_type
                        .as_mut()
                        .expect("session_type is always present between calls")
                        .got_chunk_type(type_byte);
                    out.push(other);
                }
            }
        }
        Ok(())
    }

    /// Deposits `fragment` into its packet id's reassembly buffer. Returns
    /// the reassembled packet's chunks once the buffer is complete, or an
    /// empty vector while it's still partial.
    fn process_fragment(&mut self, fragment: FragmentChunk) -> Result<Vec<Chunk>> {
        let packet_id = fragment.packet_id.value();

        if !self.reassembly.contains_key(&packet_id) {
            if self.reassembly.len() >= self.config.max_reassembling_packets {
                warn!(
                    "dropping fragment for packet {packet_id}: too many concurrent reassemblies"
                );
                return Ok(Vec::new());
            }
            debug!("process_fragment: opening reassembly buffer for packet {packet_id}");
            self.reassembly.insert(
                packet_id,
                FragmentsBuffer::new(
                    packet_id,
                    self.config.max_fragments,
                    self.config.max_fragments_size,
                    self.config.max_fragmentation_gap,
                ),
            );
        }

        let buffer = self
            .reassembly
            .get_mut(&packet_id)
            .expect("just inserted or already present");

        if let Err(e) = buffer.add(fragment) {
            warn!("process_fragment: discarding reassembly buffer for packet {packet_id}: {e}");
            self.reassembly.remove(&packet_id);
            return Err(e);
        }

        if !self.reassembly[&packet_id].is_complete() {
            return Ok(Vec::new());
        }

        debug!("process_fragment: reassembly complete for packet {packet_id}");
        let bytes = self.reassembly.remove(&packet_id).unwrap().reassemble();
        let mut reassembled = bytes::Bytes::from(bytes);
        let inner = Packet::read_from(&mut reassembled)?;

        if inner.chunks.iter().any(|c| matches!(c, Chunk::Fragment(_))) {
            return Err(Error::NestedFragment);
        }

        Ok(inner.chunks)
    }
}
