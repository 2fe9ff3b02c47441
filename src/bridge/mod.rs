// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the columnar interchange boundary of the maskarray library. It
// converts Arrow arrays into `NumericArray`s and back. Nothing else in the crate
// touches Arrow array types.
//
// Data Flow (Import):
//
//   1. [NumericArray::from_arrow_chunks]   -> Receives `&[ArrayRef]` (a chunked array)
//         |
//         `-> for each chunk, in order ->
//
//   2. [arrow_impl::chunk_to_numeric]      -> Receives `&dyn Array`
//         |
//         `-> a. Casts the chunk to the requested dtype if its type differs
//         |
//         `-> b. Copies the values and inverts the validity buffer into a mask
//
//   3. [Assembly]                          -> 0 chunks: empty array
//                                             1 chunk:  that array
//                                             n chunks: NumericArray::concat
//
// Data Flow (Export):
//
//   1. [NumericArray::to_arrow]            -> arrow_impl::numeric_to_arrow
//         |
//         `-> Returns an `ArrayRef` holding a `PrimitiveArray` of the same dtype
//
// ====================================================================================
pub(crate) mod arrow_impl;

use arrow::array::{Array, ArrayRef};

use crate::array::NumericArray;
use crate::error::Result;
use crate::types::NumericDtype;

impl NumericArray {
    /// Builds an array of `dtype` from one Arrow array.
    ///
    /// # Errors
    /// * `TypeMismatch` if the Arrow type is neither integer nor floating point.
    /// * `Arrow` if a value does not fit `dtype`.
    pub fn from_arrow(array: &dyn Array, dtype: NumericDtype) -> Result<Self> {
        arrow_impl::chunk_to_numeric(array, dtype)
    }

    /// Builds one array of `dtype` from the chunks of a chunked Arrow array,
    /// preserving chunk order. Zero chunks give an empty array.
    ///
    /// # Errors
    /// See [`NumericArray::from_arrow`].
    pub fn from_arrow_chunks(chunks: &[ArrayRef], dtype: NumericDtype) -> Result<Self> {
        log::debug!("from_arrow_chunks: {} chunk(s) into {}", chunks.len(), dtype);
        let mut results = chunks
            .iter()
            .map(|chunk| arrow_impl::chunk_to_numeric(chunk.as_ref(), dtype))
            .collect::<Result<Vec<_>>>()?;

        match results.len() {
            0 => Ok(NumericArray::empty(dtype)),
            1 => Ok(results.remove(0)),
            _ => NumericArray::concat(&results),
        }
    }

    /// Exports to an Arrow primitive array.
    ///
    /// # Errors
    /// Returns `Arrow` if Arrow rejects the buffers.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        arrow_impl::numeric_to_arrow(self)
    }
}

#[cfg(test)]
mod tests;
