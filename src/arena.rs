//! Slot storage that owns the nodes of a tree.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle {
    index: usize,
}

impl Handle {
    pub fn index(self) -> usize {
        self.index
    }
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator for a single type of object backed by one `Vec`.
///
/// The arena is the only owner of the objects it stores. Freed blocks are threaded onto a free
/// list and reused by later allocations, so a handle to a freed object may later refer to a
/// different object. Everything still stored is dropped with the arena.
pub struct TypedArena<T> {
    head: Option<usize>,
    blocks: Vec<Block<T>>,
    len: usize,
}

impl<T> TypedArena<T> {
    pub fn new() -> Self {
        TypedArena {
            head: None,
            blocks: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TypedArena {
            head: None,
            blocks: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.head = None;
        self.blocks.clear();
        self.len = 0;
    }

    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.blocks.push(Block::Occupied(value));
                Handle {
                    index: self.blocks.len() - 1,
                }
            },
            Some(index) => {
                let vacant_block = mem::replace(&mut self.blocks[index], Block::Occupied(value));
                match vacant_block {
                    Block::Vacant(next) => {
                        self.head = next;
                        Handle { index }
                    },
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
            },
        }
    }

    /// Deallocates an object and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `handle` refers to an out of bounds or vacant block.
    pub fn free(&mut self, handle: &Handle) -> T {
        if handle.index >= self.blocks.len() {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(&mut self.blocks[handle.index], Block::Vacant(self.head));
        match old_block {
            Block::Vacant(next) => {
                self.blocks[handle.index] = Block::Vacant(next);
                panic!("Error: attempting to free vacant block.");
            },
            Block::Occupied(value) => {
                self.len -= 1;
                self.head = Some(handle.index);
                value
            },
        }
    }

    pub fn get(&self, handle: &Handle) -> Option<&T> {
        match self.blocks.get(handle.index) {
            Some(Block::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: &Handle) -> Option<&mut T> {
        match self.blocks.get_mut(handle.index) {
            Some(Block::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns mutable references to two distinct occupied objects.
    pub fn get_pair_mut(&mut self, first: &Handle, second: &Handle) -> Option<(&mut T, &mut T)> {
        if first.index == second.index
            || first.index >= self.blocks.len()
            || second.index >= self.blocks.len()
        {
            return None;
        }
        let swapped = first.index > second.index;
        let (low, high) = if swapped {
            (second.index, first.index)
        } else {
            (first.index, second.index)
        };
        let (head, tail) = self.blocks.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Block::Occupied(ref mut low_value), Block::Occupied(ref mut high_value)) => {
                if swapped {
                    Some((high_value, low_value))
                } else {
                    Some((low_value, high_value))
                }
            },
            _ => None,
        }
    }

    /// Returns one slot per block in index order, `None` for vacant blocks.
    pub fn slots_mut(&mut self) -> Vec<Option<&mut T>> {
        self.blocks
            .iter_mut()
            .map(|block| match block {
                Block::Occupied(ref mut value) => Some(value),
                Block::Vacant(_) => None,
            })
            .collect()
    }
}

impl<T> Default for TypedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for TypedArena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(&handle).expect("Error: handle out of bounds.")
    }
}

impl<T> IndexMut<Handle> for TypedArena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(&handle).expect("Error: handle out of bounds.")
    }
}
