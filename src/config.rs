/// Recognised session configuration options (§6 of the design document).
///
/// There is no file/env/CLI parsing here; callers construct this directly or
/// start from [`SessionConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum fragment payload size before outbound fragmentation kicks in.
    pub mtu: u16,
    /// Max distance between any two present fragment indices in an
    /// incomplete reassembly buffer.
    pub max_fragmentation_gap: u16,
    /// Max number of distinct fragments tracked per packet id.
    pub max_fragments: u16,
    /// Max accumulated byte size of a reassembly buffer.
    pub max_fragments_size: u32,
    /// Max number of packet ids concurrently tracked for reassembly.
    pub max_reassembling_packets: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mtu = 768u16;
        let max_fragments = 4u16;
        SessionConfig {
            mtu,
            max_fragmentation_gap: 3,
            max_fragments,
            max_fragments_size: u32::from(mtu) * u32::from(max_fragments),
            max_reassembling_packets: 64,
        }
    }
}
