use std::cmp::Ordering;

use serde::Serialize;

use super::definition::DigiTree;
use super::node::{Node, NodeId, MIN_FILL, NODE_CAPACITY};
use crate::types::Result;

const MAX_FINDINGS: usize = 32;

/// Indicates the severity level of a verification finding.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifySeverity {
    /// Non-critical issue, such as an unexpected fill level.
    Warning,
    /// Broken ordering or routing; lookups may return wrong answers.
    Error,
}

/// Represents a single issue discovered during verification.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyFinding {
    /// The severity level of this finding.
    pub severity: VerifySeverity,
    /// Arena slot of the offending node.
    pub node: usize,
    /// Human-readable description of the issue.
    pub message: String,
}

/// Statistics collected during the verification walk.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyCounts {
    /// Entries reachable from the root.
    pub entries: u64,
    /// Leaf nodes reachable from the root.
    pub leaves: u64,
    /// Branch nodes reachable from the root.
    pub branches: u64,
    /// Number of levels, counting the leaf level.
    pub height: u64,
    /// Node slots currently allocated in the arena.
    pub allocated: u64,
}

/// Complete report of a structural verification.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyReport {
    /// Whether verification passed without finding any issues.
    pub success: bool,
    /// Issues discovered, capped at a fixed number.
    pub findings: Vec<VerifyFinding>,
    /// Statistics about the nodes examined.
    pub counts: VerifyCounts,
}

struct Walk<'k, K> {
    findings: Vec<VerifyFinding>,
    counts: VerifyCounts,
    leaf_depth: Option<usize>,
    lower: Option<&'k K>,
}

impl<K> Walk<'_, K> {
    fn push(&mut self, severity: VerifySeverity, node: NodeId, message: impl Into<String>) {
        if self.findings.len() < MAX_FINDINGS {
            self.findings.push(VerifyFinding {
                severity,
                node: node.0,
                message: message.into(),
            });
        }
    }
}

impl<K: Clone, E> DigiTree<K, E> {
    /// Walks every reachable node and checks the structural invariants.
    ///
    /// Checks that entries are sorted without duplicates, fill bounds hold,
    /// partitions strictly increase and equal the smallest key of the child
    /// they introduce, keys stay inside the bounds their ancestors route them
    /// by, all leaves sit at the same depth, and no arena slot is leaked.
    /// Returns an error only when the walk itself cannot continue, such as a
    /// dangling node id or an inconsistent comparator.
    pub fn verify(&self) -> Result<VerifyReport> {
        let mut walk = Walk {
            findings: Vec::new(),
            counts: VerifyCounts::default(),
            leaf_depth: None,
            lower: None,
        };
        self.verify_node(self.root, 0, None, None, &mut walk)?;
        walk.counts.height = walk.leaf_depth.map_or(0, |depth| depth as u64 + 1);
        walk.counts.allocated = self.arena.live() as u64;
        let reachable = walk.counts.leaves + walk.counts.branches;
        if walk.counts.allocated != reachable {
            walk.push(
                VerifySeverity::Warning,
                self.root,
                format!(
                    "{} nodes allocated but {reachable} reachable from the root",
                    walk.counts.allocated
                ),
            );
        }
        let report = VerifyReport {
            success: walk.findings.is_empty(),
            findings: walk.findings,
            counts: walk.counts,
        };
        tracing::debug!(
            target: "digitree::verify",
            success = report.success,
            findings = report.findings.len(),
            entries = report.counts.entries,
            "verification finished"
        );
        Ok(report)
    }

    /// Checks the subtree at `id`, whose keys must lie in `[low, high)`.
    fn verify_node<'t>(
        &'t self,
        id: NodeId,
        depth: usize,
        low: Option<&'t K>,
        high: Option<&'t K>,
        walk: &mut Walk<'t, K>,
    ) -> Result<()> {
        let is_root = depth == 0;
        match self.arena.get(id)? {
            Node::Leaf(leaf) => {
                walk.counts.leaves += 1;
                walk.counts.entries += leaf.entries.len() as u64;
                let expected = *walk.leaf_depth.get_or_insert(depth);
                if expected != depth {
                    walk.push(
                        VerifySeverity::Error,
                        id,
                        format!("leaf at depth {depth}, expected {expected}"),
                    );
                }
                let len = leaf.entries.len();
                if len > NODE_CAPACITY || (!is_root && len < MIN_FILL) {
                    walk.push(
                        VerifySeverity::Warning,
                        id,
                        format!("leaf holds {len} entries"),
                    );
                }
                for entry in &leaf.entries {
                    let key = (self.key_of)(entry);
                    if let Some(previous) = walk.lower {
                        if self.order.compare(previous, key)? != Ordering::Less {
                            walk.push(VerifySeverity::Error, id, "entries out of order");
                        }
                    }
                    if let Some(low) = low {
                        if self.order.compare(key, low)? == Ordering::Less {
                            walk.push(VerifySeverity::Error, id, "entry below its partition");
                        }
                    }
                    if let Some(high) = high {
                        if self.order.compare(key, high)? != Ordering::Less {
                            walk.push(VerifySeverity::Error, id, "entry at or above next partition");
                        }
                    }
                    walk.lower = Some(key);
                }
                if let (Some(low), Some(first)) = (low, leaf.entries.first()) {
                    if self.order.compare((self.key_of)(first), low)? != Ordering::Equal {
                        walk.push(
                            VerifySeverity::Error,
                            id,
                            "partition does not match first entry of its child",
                        );
                    }
                }
            }
            Node::Branch(branch) => {
                walk.counts.branches += 1;
                let children = branch.nodes.len();
                if branch.partitions.len() + 1 != children {
                    walk.push(
                        VerifySeverity::Error,
                        id,
                        format!(
                            "{} partitions for {children} children",
                            branch.partitions.len()
                        ),
                    );
                    return Ok(());
                }
                let min = if is_root { 2 } else { MIN_FILL };
                if children > NODE_CAPACITY || children < min {
                    walk.push(
                        VerifySeverity::Warning,
                        id,
                        format!("branch holds {children} children"),
                    );
                }
                for pair in branch.partitions.windows(2) {
                    if self.order.compare(&pair[0], &pair[1])? != Ordering::Less {
                        walk.push(VerifySeverity::Error, id, "partitions not strictly increasing");
                    }
                }
                for (index, child) in branch.nodes.iter().enumerate() {
                    let child_low = match index {
                        0 => low,
                        _ => Some(&branch.partitions[index - 1]),
                    };
                    let child_high = branch.partitions.get(index).or(high);
                    self.verify_node(*child, depth + 1, child_low, child_high, walk)?;
                    if walk.findings.len() >= MAX_FINDINGS {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
