//! An ordered map backed by an AVL tree whose nodes carry balance factors and parent links, plus a small utility for checking the leaf depths of plain binary trees.
//!
//! # Examples
//!
//! ```
//! use avl_collections::avl_tree::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for key in 1..=7 {
//!     map.insert(key, key * 10);
//! }
//!
//! assert_eq!(map.root().map(|node| *node.key()), Some(4));
//! assert_eq!(map.get(&6), Some(&60));
//! assert!(map.is_balanced());
//! ```

mod arena;
mod entry;
pub mod avl_tree;
pub mod leaf_depth;
