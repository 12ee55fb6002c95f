//! Bitmap of instruction start offsets.
//!
//! After a method body has been decoded, every branch and switch target must land on the
//! first byte of an instruction. [`BoundaryMap`] stores one bit per byte of the body so
//! that check is a constant-time lookup per target.

/// Tracks which byte offsets of a method body start an instruction.
pub struct BoundaryMap {
    data: Vec<usize>,
    elements: usize,
}

const BITFIELD_SIZE: usize = usize::BITS as usize;

impl BoundaryMap {
    /// Create a map for a body of `elements` bytes with no boundary marked
    #[must_use]
    pub fn new(elements: usize) -> BoundaryMap {
        BoundaryMap {
            data: vec![0_usize; elements.div_ceil(BITFIELD_SIZE)],
            elements,
        }
    }

    /// Mark `offset` as the start of an instruction. Offsets outside the body are ignored.
    pub fn mark(&mut self, offset: usize) {
        if offset >= self.elements {
            return;
        }

        if let Some(bitfield) = self.data.get_mut(offset / BITFIELD_SIZE) {
            *bitfield |= 1_usize << (offset % BITFIELD_SIZE);
        }
    }

    /// `true` if an instruction starts at `target`.
    ///
    /// Negative targets and targets at or beyond the end of the body are never boundaries.
    #[must_use]
    pub fn is_boundary(&self, target: i64) -> bool {
        let Ok(offset) = usize::try_from(target) else {
            return false;
        };
        if offset >= self.elements {
            return false;
        }

        self.data
            .get(offset / BITFIELD_SIZE)
            .is_some_and(|bitfield| (bitfield >> (offset % BITFIELD_SIZE)) & 1 != 0)
    }
}
