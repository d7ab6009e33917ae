//! AutoGrowVec: implicitly-zero array over a signed index space
//!
//! Double-array arithmetic (`base[id] + symbol`) routinely lands far past the
//! current end of an array. `AutoGrowVec` is the single place that deals with
//! it: reads beyond the extent return `T::default()`, writes beyond the extent
//! grow the backing storage first, so callers index freely.

use crate::NodeId;
use std::fmt;
use std::mem;

/// Growable array with defined zero for never-written slots
///
/// Growth policy: the new extent is `max(2 * extent, 2 * (index + 1))`,
/// which keeps extension amortized O(1) and tolerates sparse writes.
/// There is no shrink operation.
///
/// # Examples
///
/// ```rust
/// use datrie::containers::AutoGrowVec;
///
/// let mut base: AutoGrowVec<i32> = AutoGrowVec::new();
/// assert_eq!(base.get(1000), 0);
///
/// base.set(1000, 7);
/// assert_eq!(base.get(1000), 7);
/// assert!(base.extent() >= 1001);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AutoGrowVec<T> {
    data: Vec<T>,
}

impl<T: Copy + Default> AutoGrowVec<T> {
    /// Create an empty array
    #[inline]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an array whose first `extent` slots are preallocated
    pub fn with_capacity(extent: usize) -> Self {
        Self {
            data: vec![T::default(); extent],
        }
    }

    /// Wrap an existing buffer; its length becomes the extent
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Read slot `index`; anything outside the extent reads as zero
    #[inline]
    pub fn get(&self, index: NodeId) -> T {
        if index < 0 {
            return T::default();
        }
        self.data.get(index as usize).copied().unwrap_or_default()
    }

    /// Write slot `index`, growing the backing storage when needed
    ///
    /// # Panics
    ///
    /// Panics if `index` is negative; the engine never produces one.
    #[inline]
    pub fn set(&mut self, index: NodeId, value: T) {
        assert!(index >= 0, "negative index {} written to AutoGrowVec", index);
        let index = index as usize;
        if index >= self.data.len() {
            self.grow(index);
        }
        self.data[index] = value;
    }

    fn grow(&mut self, index: usize) {
        let new_extent = std::cmp::max(self.data.len() * 2, (index + 1) * 2);
        self.data.resize(new_extent, T::default());
    }

    /// Current backing extent
    #[inline]
    pub fn extent(&self) -> usize {
        self.data.len()
    }

    /// Backing storage in index order
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Backing storage with trailing zero slots removed
    pub fn trimmed(&self) -> &[T]
    where
        T: PartialEq,
    {
        let zero = T::default();
        let used = self
            .data
            .iter()
            .rposition(|v| *v != zero)
            .map_or(0, |pos| pos + 1);
        &self.data[..used]
    }

    /// Heap bytes held by the backing storage
    pub fn memory_usage(&self) -> usize {
        self.data.capacity() * mem::size_of::<T>()
    }
}

impl<T: Copy + Default> Default for AutoGrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AutoGrowVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoGrowVec")
            .field("extent", &self.data.len())
            .finish()
    }
}
