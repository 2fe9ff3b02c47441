// --- IN: src/null_handling/validity.rs ---

//! The per-element missingness buffer paired with every `NumericArray`.
//!
//! Bits are stored in a `BitVec<u8, Lsb0>`, the same bit numbering Arrow uses
//! for its validity bitmaps, but with the opposite polarity: a set bit means
//! the slot is **missing**. Conversions to and from Arrow's `NullBuffer`
//! perform the inversion explicitly.

use arrow::buffer::{BooleanBuffer, NullBuffer};
use bitvec::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidityMask {
    bits: BitVec<u8, Lsb0>,
}

impl ValidityMask {
    //==================================================================================
    // 1. Construction
    //==================================================================================

    /// A mask of `len` slots, none missing.
    pub fn all_present(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    /// A mask of `len` slots, all missing.
    pub fn all_missing(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 1; len],
        }
    }

    /// Builds a mask from booleans where `true` means missing.
    pub fn from_bools(missing: &[bool]) -> Self {
        missing.iter().copied().collect()
    }

    /// Builds a mask from Arrow's validity convention (`true` means valid).
    ///
    /// `None` means the Arrow array had no null buffer, so nothing is missing.
    pub fn from_null_buffer(nulls: Option<&NullBuffer>, len: usize) -> Self {
        match nulls {
            Some(nb) => (0..len).map(|i| nb.is_null(i)).collect(),
            None => Self::all_present(len),
        }
    }

    /// Concatenates masks in order.
    pub fn concat<'a>(masks: impl IntoIterator<Item = &'a ValidityMask>) -> Self {
        let mut bits = BitVec::<u8, Lsb0>::new();
        for mask in masks {
            bits.extend_from_bitslice(&mask.bits);
        }
        Self { bits }
    }

    //==================================================================================
    // 2. Queries
    //==================================================================================

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn is_missing(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    pub fn count_missing(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn any_missing(&self) -> bool {
        self.bits.any()
    }

    pub fn all_set(&self) -> bool {
        self.bits.all()
    }

    /// Iterates the slots, yielding `true` for missing ones.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    pub fn to_vec(&self) -> Vec<bool> {
        self.iter().collect()
    }

    //==================================================================================
    // 3. Mutation (only on freshly built, not-yet-shared masks)
    //==================================================================================

    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn set(&mut self, idx: usize, missing: bool) {
        self.bits.set(idx, missing);
    }

    /// Marks every slot missing.
    pub fn fill_missing(&mut self) {
        self.bits.fill(true);
    }

    /// Elementwise `self |= other`: a slot is missing if it is missing in either.
    ///
    /// # Panics
    /// Panics if the two masks differ in length.
    pub fn or_assign(&mut self, other: &ValidityMask) {
        assert_eq!(
            self.len(),
            other.len(),
            "validity masks must have equal length to combine"
        );
        for idx in other.bits.iter_ones() {
            self.bits.set(idx, true);
        }
    }

    /// Returns a new mask `self | other`.
    pub fn or(&self, other: &ValidityMask) -> ValidityMask {
        let mut out = self.clone();
        out.or_assign(other);
        out
    }

    /// Clears the missing bit wherever `present` returns `true`.
    pub fn clear_where(&mut self, mut present: impl FnMut(usize) -> bool) {
        for idx in self.bits.iter_ones().collect::<Vec<_>>() {
            if present(idx) {
                self.bits.set(idx, false);
            }
        }
    }

    //==================================================================================
    // 4. Arrow Interop
    //==================================================================================

    /// Converts to Arrow's validity convention. Returns `None` when nothing is
    /// missing, matching how Arrow arrays omit the buffer.
    pub fn to_null_buffer(&self) -> Option<NullBuffer> {
        if !self.any_missing() {
            return None;
        }
        let validity = BooleanBuffer::from_iter(self.iter().map(|missing| !missing));
        Some(NullBuffer::new(validity))
    }
}

impl FromIterator<bool> for ValidityMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}
