//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Nodes are stored in an arena and carry a balance factor along with a link to their parent, so
//! rebalancing walks upward from the changed node and stops as soon as a subtree's height is
//! unchanged.

mod map;
mod node;
mod tree;

pub use self::map::{AvlMap, AvlMapIntoIter, AvlMapIter, AvlMapIterMut, NodeRef};
