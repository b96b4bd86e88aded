use crate::arena::{Handle, TypedArena};
use crate::avl_tree::node::Node;
use crate::entry::Entry;
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// The arena-backed structure behind `AvlMap`.
///
/// Nodes are owned by `arena`. Child and parent links are handles into it, so parent links never
/// own their target.
pub struct Tree<T, U> {
    pub arena: TypedArena<Node<T, U>>,
    pub root: Option<Handle>,
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            arena: TypedArena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: TypedArena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn node(&self, handle: Handle) -> &Node<T, U> {
        &self.arena[handle]
    }

    pub fn node_mut(&mut self, handle: Handle) -> &mut Node<T, U> {
        &mut self.arena[handle]
    }

    // Points `parent` (or the root if there is no parent) at `new` instead of `old`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    // Promotes the right child of `handle` and returns it.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let child = self.arena[handle]
            .right
            .expect("Expected right child node to be `Some`.");
        let parent = self.arena[handle].parent;
        let inner = self.arena[child].left;

        self.arena[handle].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }
        self.arena[child].left = Some(handle);
        self.arena[handle].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, handle, Some(child));

        if self.arena[child].balance == 0 {
            self.arena[handle].balance = 1;
            self.arena[child].balance = -1;
        } else {
            self.arena[handle].balance = 0;
            self.arena[child].balance = 0;
        }

        trace!("rotated left at node {}", handle.index());
        child
    }

    // Promotes the left child of `handle` and returns it.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let child = self.arena[handle]
            .left
            .expect("Expected left child node to be `Some`.");
        let parent = self.arena[handle].parent;
        let inner = self.arena[child].right;

        self.arena[handle].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(handle);
        }
        self.arena[child].right = Some(handle);
        self.arena[handle].parent = Some(child);
        self.arena[child].parent = parent;
        self.replace_child(parent, handle, Some(child));

        if self.arena[child].balance == 0 {
            self.arena[handle].balance = -1;
            self.arena[child].balance = 1;
        } else {
            self.arena[handle].balance = 0;
            self.arena[child].balance = 0;
        }

        trace!("rotated right at node {}", handle.index());
        child
    }

    // The single rotation rule does not hold for the inner rotation, so the three balances are
    // recomputed from the pivot's balance before rotating.
    fn rotate_left_right(&mut self, handle: Handle) -> Handle {
        let left = self.arena[handle]
            .left
            .expect("Expected left child node to be `Some`.");
        let pivot = self.arena[left]
            .right
            .expect("Expected right grandchild node to be `Some`.");
        let pivot_balance = self.arena[pivot].balance;

        self.rotate_left(left);
        self.rotate_right(handle);

        self.arena[handle].balance = if pivot_balance < 0 { 1 } else { 0 };
        self.arena[left].balance = if pivot_balance > 0 { -1 } else { 0 };
        self.arena[pivot].balance = 0;
        pivot
    }

    fn rotate_right_left(&mut self, handle: Handle) -> Handle {
        let right = self.arena[handle]
            .right
            .expect("Expected right child node to be `Some`.");
        let pivot = self.arena[right]
            .left
            .expect("Expected left grandchild node to be `Some`.");
        let pivot_balance = self.arena[pivot].balance;

        self.rotate_right(right);
        self.rotate_left(handle);

        self.arena[handle].balance = if pivot_balance > 0 { -1 } else { 0 };
        self.arena[right].balance = if pivot_balance < 0 { 1 } else { 0 };
        self.arena[pivot].balance = 0;
        pivot
    }

    // Only called during insertion, once a balance reaches -2 or 2.
    fn rebalance(&mut self, handle: Handle) {
        let balance = self.arena[handle].balance;
        if balance < -1 {
            let left = self.arena[handle]
                .left
                .expect("Expected left child node to be `Some`.");
            if self.arena[left].balance > 0 {
                self.rotate_left_right(handle);
            } else {
                self.rotate_right(handle);
            }
        } else if balance > 1 {
            let right = self.arena[handle]
                .right
                .expect("Expected right child node to be `Some`.");
            if self.arena[right].balance < 0 {
                self.rotate_right_left(handle);
            } else {
                self.rotate_left(handle);
            }
        }
    }

    fn rebalance_after_insert(&mut self, mut child: Handle) {
        while let Some(parent) = self.arena[child].parent {
            let diff = if self.arena[parent].left == Some(child) { -1 } else { 1 };
            self.arena[parent].update_balance(diff);
            match self.arena[parent].balance {
                0 => break,
                -2 | 2 => {
                    trace!("rebalancing node {} after insert", parent.index());
                    self.rebalance(parent);
                    break;
                },
                _ => child = parent,
            }
        }
    }

    // `diff` is +1 when the left subtree of `handle` shrank and -1 when the right one did.
    fn rebalance_after_remove(&mut self, handle: Handle, mut diff: i8) {
        let mut curr = Some(handle);
        while let Some(handle) = curr {
            self.arena[handle].update_balance(diff);

            // root of the subtree whose height just decreased by one
            let shrunk = match self.arena[handle].balance {
                -2 => {
                    trace!("rebalancing node {} after remove", handle.index());
                    let left = self.arena[handle]
                        .left
                        .expect("Expected left child node to be `Some`.");
                    let left_balance = self.arena[left].balance;
                    if left_balance > 0 {
                        self.rotate_left_right(handle)
                    } else {
                        let promoted = self.rotate_right(handle);
                        if left_balance == 0 {
                            break;
                        }
                        promoted
                    }
                },
                2 => {
                    trace!("rebalancing node {} after remove", handle.index());
                    let right = self.arena[handle]
                        .right
                        .expect("Expected right child node to be `Some`.");
                    let right_balance = self.arena[right].balance;
                    if right_balance < 0 {
                        self.rotate_right_left(handle)
                    } else {
                        let promoted = self.rotate_left(handle);
                        if right_balance == 0 {
                            break;
                        }
                        promoted
                    }
                },
                0 => handle,
                _ => break,
            };

            curr = self.arena[shrunk].parent;
            if let Some(parent) = curr {
                diff = if self.arena[parent].left == Some(shrunk) { 1 } else { -1 };
            }
        }
    }

    pub fn insert(&mut self, key: T, value: U) -> Option<Entry<T, U>>
    where
        T: Ord,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.arena.allocate(Node::new(key, value, None)));
                return None;
            },
        };

        let inserted = loop {
            let ordering = key.cmp(&self.arena[curr].entry.key);
            let next = match ordering {
                Ordering::Less => self.arena[curr].left,
                Ordering::Greater => self.arena[curr].right,
                Ordering::Equal => {
                    let node = &mut self.arena[curr];
                    return Some(mem::replace(&mut node.entry, Entry { key, value }));
                },
            };
            match next {
                Some(child) => curr = child,
                None => {
                    let handle = self.arena.allocate(Node::new(key, value, Some(curr)));
                    if ordering == Ordering::Less {
                        self.arena[curr].left = Some(handle);
                    } else {
                        self.arena[curr].right = Some(handle);
                    }
                    break handle;
                },
            }
        };

        self.rebalance_after_insert(inserted);
        None
    }

    fn swap_entries(&mut self, first: Handle, second: Handle) {
        let (first, second) = self
            .arena
            .get_pair_mut(&first, &second)
            .expect("Expected two distinct nodes.");
        mem::swap(&mut first.entry, &mut second.entry);
    }

    pub fn remove<V>(&mut self, key: &V) -> Option<Entry<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut handle = self.find(key)?;

        if let (Some(left), Some(_)) = (self.arena[handle].left, self.arena[handle].right) {
            let predecessor = self.max_from(left);
            debug!(
                "node {} has two children, swapping entry with predecessor {}",
                handle.index(),
                predecessor.index(),
            );
            self.swap_entries(handle, predecessor);
            handle = predecessor;
        }

        let (parent, child) = {
            let node = &self.arena[handle];
            (node.parent, node.left.or(node.right))
        };
        let diff = match parent {
            Some(parent) if self.arena[parent].left == Some(handle) => 1,
            Some(_) => -1,
            None => 0,
        };

        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, handle, child);
        let Node { entry, .. } = self.arena.free(&handle);

        if let Some(parent) = parent {
            self.rebalance_after_remove(parent, diff);
        }
        Some(entry)
    }

    pub fn find<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub fn floor<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut ret = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => {
                    ret = Some(handle);
                    node.right
                },
                Ordering::Equal => return Some(handle),
            };
        }
        ret
    }

    pub fn ceil<V>(&self, key: &V) -> Option<Handle>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut ret = None;
        while let Some(handle) = curr {
            let node = &self.arena[handle];
            curr = match key.cmp(node.entry.key.borrow()) {
                Ordering::Less => {
                    ret = Some(handle);
                    node.left
                },
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(handle),
            };
        }
        ret
    }

    pub fn min_from(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.arena[handle].left {
            handle = left;
        }
        handle
    }

    pub fn max_from(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.arena[handle].right {
            handle = right;
        }
        handle
    }

    pub fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.min_from(root))
    }

    pub fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.max_from(root))
    }

    pub fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.arena[handle].left {
            return Some(self.max_from(left));
        }
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].right == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    pub fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.arena[handle].right {
            return Some(self.min_from(right));
        }
        let mut curr = handle;
        while let Some(parent) = self.arena[curr].parent {
            if self.arena[parent].left == Some(curr) {
                return Some(parent);
            }
            curr = parent;
        }
        None
    }

    /// Returns the handles of every node in key order.
    pub fn in_order(&self) -> Vec<Handle> {
        let mut ret = Vec::with_capacity(self.len());
        let mut curr = self.first();
        while let Some(handle) = curr {
            ret.push(handle);
            curr = self.successor(handle);
        }
        ret
    }

    // Follows the taller child at each level, so only the balance factors are needed.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut curr = self.root;
        while let Some(handle) = curr {
            height += 1;
            let node = &self.arena[handle];
            curr = if node.balance < 0 {
                node.left
            } else {
                node.right.or(node.left)
            };
        }
        height
    }

    fn checked_height(&self, handle: Handle) -> Option<usize> {
        let node = &self.arena[handle];
        let mut heights = [0; 2];
        for (index, child) in [node.left, node.right].iter().enumerate() {
            if let Some(child) = *child {
                if self.arena.get(&child)?.parent != Some(handle) {
                    return None;
                }
                heights[index] = self.checked_height(child)?;
            }
        }

        let diff = heights[1] as isize - heights[0] as isize;
        if diff.abs() > 1 || diff != isize::from(node.balance) {
            return None;
        }
        Some(cmp::max(heights[0], heights[1]) + 1)
    }

    /// Checks ordering, parent links, and that every balance matches the real height difference.
    pub fn is_balanced(&self) -> bool
    where
        T: Ord,
    {
        let root = match self.root {
            Some(root) => root,
            None => return self.arena.is_empty(),
        };
        if self.arena[root].parent.is_some() || self.checked_height(root).is_none() {
            return false;
        }

        let handles = self.in_order();
        handles.len() == self.len()
            && handles
                .windows(2)
                .all(|pair| self.arena[pair[0]].entry.key < self.arena[pair[1]].entry.key)
    }
}
