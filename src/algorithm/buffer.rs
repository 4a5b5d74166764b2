//! Growable byte storage for concatenated gram patterns

use crate::io::error::{Result, SynthesisError, out_of_memory};
use std::ops::Range;

/// Capacity granularity in bytes
const CAPACITY_ALIGNMENT: usize = 8;
/// Growth factor applied until a write fits
const GROWTH_FACTOR: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Storage {
    Empty,
    Allocated(Vec<u8>),
    Taken,
}

/// Untyped byte buffer that grows on demand
///
/// Capacity is always 0 or a positive multiple of 8. A write past the current
/// capacity quadruples it until the write fits; bytes already stored are kept.
/// Nothing zero-fills on behalf of the caller beyond what the allocation
/// itself provides, so callers write contiguous or overlapping ranges.
///
/// Once the storage is moved out with [`GrowableBuffer::take`] the buffer can
/// no longer be written to. Releasing is done by value, so a buffer cannot be
/// released twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowableBuffer {
    storage: Storage,
}

impl Default for GrowableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowableBuffer {
    /// Create the canonical empty buffer without allocating
    pub const fn new() -> Self {
        Self {
            storage: Storage::Empty,
        }
    }

    /// Create a buffer holding at least `initial_len` bytes
    ///
    /// The capacity is `initial_len` rounded up to the next multiple of 8.
    /// A zero length yields the empty buffer.
    ///
    /// # Errors
    ///
    /// Returns `OutOfMemory` if the rounded capacity overflows or cannot be
    /// reserved
    pub fn allocate(initial_len: usize) -> Result<Self> {
        if initial_len == 0 {
            return Ok(Self::new());
        }
        let capacity = aligned_capacity(initial_len)?;
        Ok(Self {
            storage: Storage::Allocated(reserve_zeroed(capacity)?),
        })
    }

    /// Current capacity in bytes
    pub const fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Allocated(bytes) => bytes.len(),
            Storage::Empty | Storage::Taken => 0,
        }
    }

    /// Whether the storage has been moved out
    pub const fn is_taken(&self) -> bool {
        matches!(self.storage, Storage::Taken)
    }

    /// Copy `data` into the buffer at `offset`, growing capacity if needed
    ///
    /// # Errors
    ///
    /// Returns `BufferInvalidState` if the storage was taken, and
    /// `OutOfMemory` if the required capacity overflows or cannot be reserved
    pub fn write(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let required = offset
            .checked_add(data.len())
            .ok_or_else(|| out_of_memory("buffer write", usize::MAX))?;

        match &mut self.storage {
            Storage::Taken => {
                return Err(SynthesisError::BufferInvalidState {
                    offset,
                    len: data.len(),
                });
            }
            Storage::Empty => {
                if required == 0 {
                    return Ok(());
                }
                let capacity = aligned_capacity(required)?;
                self.storage = Storage::Allocated(reserve_zeroed(capacity)?);
            }
            Storage::Allocated(bytes) => {
                let mut capacity = bytes.len();
                while capacity < required {
                    capacity = capacity
                        .checked_mul(GROWTH_FACTOR)
                        .ok_or_else(|| out_of_memory("buffer growth", usize::MAX))?;
                }
                if capacity > bytes.len() {
                    let additional = capacity - bytes.len();
                    if bytes.try_reserve_exact(additional).is_err() {
                        return Err(out_of_memory("buffer growth", capacity));
                    }
                    bytes.resize(capacity, 0);
                }
            }
        }

        if let Storage::Allocated(bytes) = &mut self.storage {
            if let Some(target) = bytes.get_mut(offset..required) {
                target.copy_from_slice(data);
            }
        }
        Ok(())
    }

    /// All bytes up to the current capacity
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Allocated(bytes) => bytes,
            Storage::Empty | Storage::Taken => &[],
        }
    }

    /// Bytes in `range`, or `None` if it extends past the capacity
    pub fn get(&self, range: Range<usize>) -> Option<&[u8]> {
        self.as_bytes().get(range)
    }

    /// Move the storage out, leaving a buffer that rejects further writes
    pub fn take(&mut self) -> Vec<u8> {
        match std::mem::replace(&mut self.storage, Storage::Taken) {
            Storage::Allocated(bytes) => bytes,
            Storage::Empty | Storage::Taken => Vec::new(),
        }
    }

    /// Free the underlying allocation
    pub fn release(self) {
        drop(self);
    }
}

fn aligned_capacity(len: usize) -> Result<usize> {
    len.checked_next_multiple_of(CAPACITY_ALIGNMENT)
        .ok_or_else(|| out_of_memory("buffer allocation", len))
}

fn reserve_zeroed(capacity: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if bytes.try_reserve_exact(capacity).is_err() {
        return Err(out_of_memory("buffer allocation", capacity));
    }
    bytes.resize(capacity, 0);
    Ok(bytes)
}
