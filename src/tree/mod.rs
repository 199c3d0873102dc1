#![forbid(unsafe_code)]

//! In-memory B+ tree with version-stamped paths.

mod cursor;
mod definition;
mod node;
mod ordering;
mod path;
mod stats;
mod verify;

pub use cursor::{Cursor, Direction, Entries, KeyBound, KeyRange};
pub use definition::{DigiTree, TreeOptions};
pub use node::NODE_CAPACITY;
pub use path::Path;
pub use stats::{TreeStats, TreeStatsSnapshot};
pub use verify::{VerifyCounts, VerifyFinding, VerifyReport, VerifySeverity};
