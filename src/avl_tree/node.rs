use crate::arena::Handle;
use crate::entry::Entry;

/// A struct representing an internal node of an avl tree.
///
/// `balance` is the height of the right subtree minus the height of the left subtree. It is only
/// ever `-2` or `2` while the tree is being rebalanced.
pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub balance: i8,
    pub parent: Option<Handle>,
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U, parent: Option<Handle>) -> Self {
        Node {
            entry: Entry { key, value },
            balance: 0,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn update_balance(&mut self, diff: i8) {
        self.balance += diff;
    }
}
