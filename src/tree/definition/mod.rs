use std::cmp::Ordering;

use super::cursor::{Cursor, Direction, KeyRange};
use super::node::{BranchNode, LeafNode, Node, NodeArena, NodeId, MIN_FILL, NODE_CAPACITY};
use super::ordering::{CompareFn, KeyFn, KeyOrder};
use super::path::{Path, PathBranch};
use super::stats::{TreeStats, TreeStatsSnapshot};
use crate::types::{Result, TreeError};

include!("types.rs");
include!("api.rs");
include!("navigate.rs");
include!("leaf.rs");
include!("internal.rs");
include!("maintenance.rs");
