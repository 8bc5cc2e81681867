//! Single-component scratch buffer for the repacking stage.
//!
//! [`ScratchBuffer`] owns the padded 3D buffer one component is gathered
//! into, exchanged in, and scattered back from. The backing allocation
//! is reused across components (and across calls when held by a
//! [`HaloExchanger`](crate::HaloExchanger)) and released on drop, so
//! every exit path, early error returns included, gives the memory back.

use crate::error::ExchangeError;

/// Reusable padded scratch storage for one field component.
///
/// Contents after [`acquire`](Self::acquire) are unspecified: the gather
/// step overwrites every element before the exchange reads any.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    /// Backing storage. Grows on demand, never shrinks until `release`.
    data: Vec<f64>,
}

impl ScratchBuffer {
    /// Create an empty scratch buffer. Nothing is allocated until first use.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Borrow `len` elements, growing the allocation if needed.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn acquire(&mut self, len: usize) -> Result<&mut [f64], ExchangeError> {
        if len > self.data.len() {
            let additional = len - self.data.len();
            self.data
                .try_reserve_exact(additional)
                .map_err(|_| ExchangeError::AllocationFailed { requested: len })?;
            self.data.resize(len, 0.0);
        }
        Ok(&mut self.data[..len])
    }

    /// Drop the backing allocation.
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    /// Elements currently backed by the allocation.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Memory held by the backing allocation, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.capacity() * std::mem::size_of::<f64>()
    }
}
