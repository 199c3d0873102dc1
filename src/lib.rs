//! Digitree: an in-memory sorted collection backed by a B+ tree.
//!
//! Entries live in leaves, branches only route. All reads and writes go
//! through [`Path`] values that carry the tree version they were taken at;
//! any mutation makes older paths stale.
//!
//! ```
//! use digitree::{DigiTree, Direction, KeyBound, KeyRange};
//!
//! # fn main() -> digitree::Result<()> {
//! let mut tree = DigiTree::new();
//! for value in [3u32, 1, 2] {
//!     tree.insert(value)?;
//! }
//! let range = KeyRange::new(
//!     Some(KeyBound::inclusive(1)),
//!     Some(KeyBound::exclusive(3)),
//!     Direction::Ascending,
//! );
//! let hits = tree
//!     .range(&range)?
//!     .entries(&tree)
//!     .collect::<digitree::Result<Vec<_>>>()?;
//! assert_eq!(hits, vec![&1, &2]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod tree;
pub mod types;

pub use tree::{
    Cursor, DigiTree, Direction, Entries, KeyBound, KeyRange, Path, TreeOptions, TreeStats,
    TreeStatsSnapshot, VerifyCounts, VerifyFinding, VerifyReport, VerifySeverity,
    NODE_CAPACITY,
};
pub use types::{Result, TreeError};
