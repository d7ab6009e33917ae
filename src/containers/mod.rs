//! Container types backing the trie arrays
//!
//! - **`AutoGrowVec<T>`** - Signed-index array that reads zero past its extent
//!   and grows by doubling on out-of-range writes

mod auto_grow_vec;

pub use auto_grow_vec::AutoGrowVec;
