use crate::chunk::FragmentChunk;
use crate::error::{Error, Result};

/// Reassembles one packet's worth of [`FragmentChunk`]s, received in any
/// order, into the original serialized packet bytes.
///
/// Fragments are kept in a sparse vector indexed by `fragment_num`; the
/// buffer is complete once every index up to the last fragment is filled
/// and the last fragment has `more_fragments == false`.
#[derive(Debug, Clone)]
pub struct FragmentsBuffer {
    packet_id: u32,
    slots: Vec<Option<FragmentChunk>>,
    /// Sum of each inserted fragment's wire length (`3 + payload_len()`),
    /// matching the units `max_fragments_size` is expressed in.
    size: u32,
    last_fragment_num: Option<usize>,
    max_fragments: u16,
    max_fragments_size: u32,
    max_fragmentation_gap: u16,
}

impl FragmentsBuffer {
    pub fn new(
        packet_id: u32,
        max_fragments: u16,
        max_fragments_size: u32,
        max_fragmentation_gap: u16,
    ) -> Self {
        FragmentsBuffer {
            packet_id,
            slots: Vec::new(),
            size: 0,
            last_fragment_num: None,
            max_fragments,
            max_fragments_size,
            max_fragmentation_gap,
        }
    }

    pub fn packet_id(&self) -> u32 {
        self.packet_id
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a fragment. Duplicate indices are dropped silently
    /// (first-writer-wins), matching at-least-once delivery semantics.
    pub fn add(&mut self, fragment: FragmentChunk) -> Result<()> {
        let index = fragment.fragment_num.value() as usize;

        if index >= self.slots.len() {
            let gap = index + 1 - self.slots.len();
            if gap > self.max_fragmentation_gap as usize {
                return Err(Error::FragmentationGap {
                    packet_id: self.packet_id,
                });
            }
            self.slots.resize(index + 1, None);
        }

        if self.slots[index].is_some() {
            return Ok(());
        }

        if self.len() + 1 > self.max_fragments as usize {
            return Err(Error::TooManyFragments {
                packet_id: self.packet_id,
            });
        }

        let wire_length = 3 + fragment.payload_len() as u32;
        let new_size = self.size + wire_length;
        if new_size > self.max_fragments_size {
            return Err(Error::TooLargeReassembly {
                packet_id: self.packet_id,
            });
        }
        self.size = new_size;

        if !fragment.more_fragments {
            self.last_fragment_num = Some(index);
        }

        self.slots[index] = Some(fragment);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        match self.last_fragment_num {
            None => false,
            Some(last) => (0..=last).all(|i| self.slots.get(i).map_or(false, Option::is_some)),
        }
    }

    /// Concatenates fragments `0..=last` in order. Panics if called before
    /// [`Self::is_complete`] returns `true`.
    pub fn reassemble(&self) -> Vec<u8> {
        assert!(self.is_complete(), "reassemble called on incomplete buffer");
        let mut out = Vec::with_capacity(self.size as usize);
        for slot in &self.slots {
            if let Some(fragment) = slot {
                out.extend_from_slice(&fragment.fragment);
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vlu::Vlu;

    fn fragment(num: u32, more: bool, data: &[u8]) -> FragmentChunk {
        FragmentChunk {
            more_fragments: more,
            packet_id: Vlu(1),
            fragment_num: Vlu(num),
            fragment: data.to_vec(),
        }
    }

    #[test]
    fn test_reassembly_in_reverse_order() {
        let mut buffer = FragmentsBuffer::new(1, 4, 4096, 3);
        buffer.add(fragment(1, false, b"world")).unwrap();
        assert!(!buffer.is_complete());
        buffer.add(fragment(0, true, b"hello")).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(buffer.reassemble(), b"helloworld".to_vec());
    }

    #[test]
    fn test_duplicate_fragment_is_ignored() {
        let mut buffer = FragmentsBuffer::new(1, 4, 4096, 3);
        buffer.add(fragment(0, false, b"first")).unwrap();
        buffer.add(fragment(0, false, b"second")).unwrap();
        assert_eq!(buffer.reassemble(), b"first".to_vec());
    }

    #[test]
    fn test_too_many_fragments_errors() {
        let mut buffer = FragmentsBuffer::new(1, 1, 4096, 3);
        buffer.add(fragment(0, true, b"a")).unwrap();
        assert!(matches!(
            buffer.add(fragment(1, false, b"b")),
            Err(Error::TooManyFragments { .. })
        ));
    }

    #[test]
    fn test_too_large_reassembly_errors() {
        let mut buffer = FragmentsBuffer::new(1, 4, 4, 3);
        assert!(matches!(
            buffer.add(fragment(0, false, b"abcde")),
            Err(Error::TooLargeReassembly { .. })
        ));
    }

    #[test]
    fn test_size_cap_counts_wire_length_not_just_payload() {
        // One byte of fragment payload is 4 bytes on the wire (3-byte chunk
        // header + 1 payload byte), so a cap of 3 must reject it even
        // though the payload alone would fit.
        let mut buffer = FragmentsBuffer::new(1, 4, 3, 3);
        assert!(matches!(
            buffer.add(fragment(0, false, b"a")),
            Err(Error::TooLargeReassembly { .. })
        ));
    }

    #[test]
    fn test_fragmentation_gap_errors() {
        let mut buffer = FragmentsBuffer::new(1, 8, 4096, 2);
        assert!(matches!(
            buffer.add(fragment(10, false, b"x")),
            Err(Error::FragmentationGap { .. })
        ));
    }
}
