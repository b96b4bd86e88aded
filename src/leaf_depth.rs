//! Checks whether every leaf of a plain binary tree sits at the same depth.
//!
//! # Examples
//!
//! ```
//! use avl_collections::leaf_depth::{all_leaves_equal_depth, Node};
//!
//! let balanced = Node::branch(1, Node::leaf(0), Node::leaf(2));
//! assert!(all_leaves_equal_depth(&balanced));
//!
//! let lopsided = Node::branch(1, Node::branch(0, Node::leaf(-1), None), Node::leaf(2));
//! assert!(!all_leaves_equal_depth(&lopsided));
//! ```

/// A node of an unbalanced binary tree with no ordering requirements.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<T> {
    pub value: T,
    pub left: Tree<T>,
    pub right: Tree<T>,
}

pub type Tree<T> = Option<Box<Node<T>>>;

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
        }
    }

    /// Returns a tree consisting of a single node.
    pub fn leaf(value: T) -> Tree<T> {
        Some(Box::new(Node::new(value)))
    }

    /// Returns a tree rooted at a node with the given subtrees.
    pub fn branch(value: T, left: Tree<T>, right: Tree<T>) -> Tree<T> {
        Some(Box::new(Node { value, left, right }))
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Returns `true` if every leaf of `tree` is at the same depth. An empty tree has no leaves and
/// trivially satisfies this.
pub fn all_leaves_equal_depth<T>(tree: &Tree<T>) -> bool {
    let mut leaf_depth = None;
    let mut stack = Vec::new();
    if let Some(root) = tree.as_ref() {
        stack.push((&**root, 0usize));
    }

    while let Some((node, depth)) = stack.pop() {
        if node.is_leaf() {
            match leaf_depth {
                None => leaf_depth = Some(depth),
                Some(expected) if expected != depth => return false,
                Some(_) => {},
            }
            continue;
        }
        if let Some(ref right) = node.right {
            stack.push((&**right, depth + 1));
        }
        if let Some(ref left) = node.left {
            stack.push((&**left, depth + 1));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::{all_leaves_equal_depth, Node, Tree};

    fn perfect(depth: usize, value: &mut u32) -> Tree<u32> {
        if depth == 0 {
            *value += 1;
            return Node::leaf(*value);
        }
        let left = perfect(depth - 1, value);
        *value += 1;
        let root = *value;
        let right = perfect(depth - 1, value);
        Node::branch(root, left, right)
    }

    #[test]
    fn test_empty() {
        let tree: Tree<u32> = None;
        assert!(all_leaves_equal_depth(&tree));
    }

    #[test]
    fn test_single_node() {
        assert!(all_leaves_equal_depth(&Node::leaf(1)));
    }

    #[test]
    fn test_perfect() {
        for depth in 0..8 {
            assert!(all_leaves_equal_depth(&perfect(depth, &mut 0)));
        }
    }

    #[test]
    fn test_leaves_at_depth_two_and_three() {
        let tree = Node::branch(
            4,
            Node::branch(2, Node::leaf(1), Node::leaf(3)),
            Node::branch(6, Node::leaf(5), Node::branch(7, None, Node::leaf(8))),
        );
        assert!(!all_leaves_equal_depth(&tree));
    }

    #[test]
    fn test_one_sided_chain() {
        let tree = Node::branch(1, None, Node::branch(2, None, Node::leaf(3)));
        assert!(all_leaves_equal_depth(&tree));
    }

    #[test]
    fn test_unequal_with_one_child() {
        let tree = Node::branch(1, Node::leaf(0), Node::branch(2, None, Node::leaf(3)));
        assert!(!all_leaves_equal_depth(&tree));
    }

    #[test]
    fn test_degenerate_deep_tree() {
        let mut tree = Node::leaf(0u32);
        for value in 1..100_000 {
            tree = Node::branch(value, tree, None);
        }
        assert!(all_leaves_equal_depth(&tree));

        // dropping a deep chain recursively would overflow the stack
        let mut curr = tree;
        while let Some(mut node) = curr {
            curr = node.left.take();
        }
    }
}
