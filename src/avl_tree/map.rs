use crate::arena::Handle;
use crate::avl_tree::node::Node;
use crate::avl_tree::tree::Tree;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::cmp;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::vec;

/// An ordered map implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Every node stores the height
/// of its right subtree minus the height of its left subtree, and those balance factors are
/// updated incrementally on insertion and removal. Nodes also keep a link to their parent, which
/// makes in-order traversal from any node possible through `predecessor` and `successor`.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::AvlMap;
///
/// let mut map = AvlMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// map[&0] = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct AvlMap<T, U> {
    tree: Tree<T, U>,
}

impl<T, U> AvlMap<T, U> {
    /// Constructs a new, empty `AvlMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        AvlMap { tree: Tree::new() }
    }

    /// Constructs a new, empty `AvlMap<T, U>` with room for `capacity` entries before the node
    /// storage has to grow.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::with_capacity(1024);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        AvlMap {
            tree: Tree::with_capacity(capacity),
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in the map, it will return
    /// and replace the old key-value pair without changing the shape of the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)>
    where
        T: Ord,
    {
        self.tree.insert(key, value).map(|entry| entry.into_pair())
    }

    /// Removes a key-value pair from the map. If the key exists in the map, it will return the
    /// associated key-value pair. Otherwise it will return `None` and leave the map untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.remove(key).map(|entry| entry.into_pair())
    }

    /// Returns the node holding a particular key. Returns `None` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 2);
    /// map.insert(3, 4);
    ///
    /// let node = map.find(&1).unwrap();
    /// assert_eq!(node.value(), &2);
    /// assert_eq!(node.successor().map(|node| node.key()), Some(&3));
    /// assert!(map.find(&2).is_none());
    /// ```
    pub fn find<V>(&self, key: &V) -> Option<NodeRef<T, U>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).map(|handle| NodeRef::new(&self.tree, handle))
    }

    /// Returns the root node of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 1..4 {
    ///     map.insert(key, ());
    /// }
    ///
    /// let root = map.root().unwrap();
    /// assert_eq!(root.key(), &2);
    /// assert_eq!(root.left().map(|node| node.key()), Some(&1));
    /// assert_eq!(root.right().map(|node| node.key()), Some(&3));
    /// ```
    pub fn root(&self) -> Option<NodeRef<T, U>> {
        self.tree.root.map(|handle| NodeRef::new(&self.tree, handle))
    }

    /// Returns the node with the minimum key. Returns `None` if the map is empty.
    pub fn first(&self) -> Option<NodeRef<T, U>> {
        self.tree.first().map(|handle| NodeRef::new(&self.tree, handle))
    }

    /// Returns the node with the maximum key. Returns `None` if the map is empty.
    pub fn last(&self) -> Option<NodeRef<T, U>> {
        self.tree.last().map(|handle| NodeRef::new(&self.tree, handle))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.find(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<V>(&self, key: &V) -> Option<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .find(key)
            .map(|handle| &self.tree.node(handle).entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<V>(&mut self, key: &V) -> Option<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.tree.find(key) {
            Some(handle) => Some(&mut self.tree.node_mut(handle).entry.value),
            None => None,
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the height of the tree. An empty map has a height of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 0..7 {
    ///     map.insert(key, key);
    /// }
    /// assert_eq!(map.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns `true` if the keys are in order, every parent link matches its child link, and
    /// every stored balance factor is the real height difference of its subtrees and at most one
    /// in magnitude. This visits every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// assert!(map.is_balanced());
    /// ```
    pub fn is_balanced(&self) -> bool
    where
        T: Ord,
    {
        self.tree.is_balanced()
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .floor(key)
            .map(|handle| &self.tree.node(handle).entry.key)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .ceil(key)
            .map(|handle| &self.tree.node(handle).entry.key)
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree
            .first()
            .map(|handle| &self.tree.node(handle).entry.key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree
            .last()
            .map(|handle| &self.tree.node(handle).entry.key)
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<T, U> {
        AvlMapIter {
            tree: &self.tree,
            next: self.tree.first(),
            remaining: self.len(),
        }
    }

    /// Returns a mutable iterator over the map. The iterator will yield key-value pairs using
    /// in-order traversal.
    ///
    /// Unlike `iter`, which allocates nothing, each call allocates a vector with one slot per node
    /// the map has ever held at once (freed slots included) and a vector of the in-order handles.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// for (key, value) in &mut map {
    ///     *value += 1;
    /// }
    ///
    /// let mut iterator = map.iter_mut();
    /// assert_eq!(iterator.next(), Some((&1, &mut 2)));
    /// assert_eq!(iterator.next(), Some((&2, &mut 3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter_mut(&mut self) -> AvlMapIterMut<T, U> {
        let order = self.tree.in_order().into_iter();
        AvlMapIterMut {
            slots: self.tree.arena.slots_mut(),
            order,
        }
    }
}

/// A borrowed node of an `AvlMap<T, U>`.
///
/// A `NodeRef` borrows the map, so it can not outlive an insertion or removal.
pub struct NodeRef<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    tree: &'a Tree<T, U>,
    handle: Handle,
}

impl<'a, T, U> NodeRef<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn new(tree: &'a Tree<T, U>, handle: Handle) -> Self {
        NodeRef { tree, handle }
    }

    fn wrap(&self, handle: Option<Handle>) -> Option<NodeRef<'a, T, U>> {
        let tree = self.tree;
        handle.map(|handle| NodeRef::new(tree, handle))
    }

    fn node(&self) -> &'a Node<T, U> {
        self.tree.node(self.handle)
    }

    pub fn key(&self) -> &'a T {
        &self.node().entry.key
    }

    pub fn value(&self) -> &'a U {
        &self.node().entry.value
    }

    /// The height of the right subtree minus the height of the left subtree.
    pub fn balance(&self) -> i8 {
        self.node().balance
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T, U>> {
        self.wrap(self.node().parent)
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, U>> {
        self.wrap(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, U>> {
        self.wrap(self.node().right)
    }

    /// Returns the node with the next lower key. Returns `None` at the minimum key.
    pub fn predecessor(&self) -> Option<NodeRef<'a, T, U>> {
        self.wrap(self.tree.predecessor(self.handle))
    }

    /// Returns the node with the next higher key. Returns `None` at the maximum key.
    pub fn successor(&self) -> Option<NodeRef<'a, T, U>> {
        self.wrap(self.tree.successor(self.handle))
    }
}

impl<'a, T, U> Clone for NodeRef<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn clone(&self) -> Self {
        NodeRef::new(self.tree, self.handle)
    }
}

impl<'a, T, U> Copy for NodeRef<'a, T, U>
where
    T: 'a,
    U: 'a,
{
}

impl<'a, T, U> fmt::Debug for NodeRef<'a, T, U>
where
    T: 'a + fmt::Debug,
    U: 'a + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("balance", &self.balance())
            .finish()
    }
}

impl<T, U> IntoIterator for AvlMap<T, U> {
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        let order = self.tree.in_order().into_iter();
        Self::IntoIter {
            tree: self.tree,
            order,
        }
    }
}

impl<'a, T, U> IntoIterator for &'a AvlMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, U> IntoIterator for &'a mut AvlMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = AvlMapIterMut<'a, T, U>;
    type Item = (&'a T, &'a mut U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct AvlMapIntoIter<T, U> {
    tree: Tree<T, U>,
    order: vec::IntoIter<Handle>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        let AvlMapIntoIter {
            ref mut tree,
            ref mut order,
        } = self;
        order
            .next()
            .map(|handle| tree.arena.free(&handle).entry.into_pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order by following successor links and
/// yields immutable references.
pub struct AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    tree: &'a Tree<T, U>,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let handle = self.next?;
        self.next = tree.successor(handle);
        self.remaining -= 1;
        let entry = &tree.node(handle).entry;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// A mutable iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields mutable references.
pub struct AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    slots: Vec<Option<&'a mut Node<T, U>>>,
    order: vec::IntoIter<Handle>,
}

impl<'a, T, U> Iterator for AvlMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a mut U);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.order.next()?;
        let node = self.slots[handle.index()].take()?;
        let entry = &mut node.entry;
        Some((&entry.key, &mut entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T, U> Default for AvlMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> FromIterator<(T, U)> for AvlMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = AvlMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<T, U> PartialEq for AvlMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &AvlMap<T, U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> fmt::Debug for AvlMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T, U, V> Index<&'a V> for AvlMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    type Output = U;

    fn index(&self, key: &V) -> &Self::Output {
        self.get(key).expect("Error: key does not exist.")
    }
}

impl<'a, T, U, V> IndexMut<&'a V> for AvlMap<T, U>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    fn index_mut(&mut self, key: &V) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<T, U> Serialize for AvlMap<T, U>
where
    T: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// size hints come from the input, so they are not trusted past this
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

struct AvlMapVisitor<T, U> {
    marker: PhantomData<fn() -> AvlMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for AvlMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = AvlMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let capacity = cmp::min(access.size_hint().unwrap_or(0), MAX_PREALLOCATED_ENTRIES);
        let mut map = AvlMap::with_capacity(capacity);
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for AvlMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlMap;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert!(map.is_empty());
        assert!(map.root().is_none());
        assert_eq!(map.height(), 0);
    }

    #[test]
    fn test_min_max_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = AvlMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = AvlMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.insert(1, 3), Some((1, 1)));
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.len(), 1);
    }

    fn layout(map: &AvlMap<u32, u32>) -> Vec<(u32, i8, Option<u32>)> {
        let mut ret = Vec::new();
        let mut curr = map.first();
        while let Some(node) = curr {
            ret.push((*node.key(), node.balance(), node.parent().map(|parent| *parent.key())));
            curr = node.successor();
        }
        ret
    }

    #[test]
    fn test_insert_replace_keeps_shape() {
        let mut map: AvlMap<u32, u32> = (0..7).map(|key| (key, key)).collect();
        let before = layout(&map);
        assert_eq!(map.insert(5, 50), Some((5, 5)));
        assert_eq!(map.len(), 7);
        assert_eq!(layout(&map), before);
        assert_eq!(map.get(&5), Some(&50));
    }

    #[test]
    fn test_remove() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(!map.contains_key(&1));
        assert!(map.root().is_none());
    }

    #[test]
    fn test_remove_absent() {
        let mut map: AvlMap<u32, u32> = (0..10).map(|key| (key, key * 2)).collect();
        assert_eq!(map.remove(&10), None);
        assert_eq!(map.len(), 10);
        assert_eq!(
            map.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(u32, u32)>>(),
            (0..10).map(|key| (key, key * 2)).collect::<Vec<(u32, u32)>>(),
        );
        assert!(map.is_balanced());
    }

    #[test]
    fn test_remove_root_of_two_nodes() {
        let mut map = AvlMap::new();
        map.insert(2, 2);
        map.insert(1, 1);
        assert_eq!(map.remove(&2), Some((2, 2)));

        let root = map.root().unwrap();
        assert_eq!(root.key(), &1);
        assert!(root.left().is_none());
        assert!(root.right().is_none());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_insert_increasing_shape() {
        let mut map = AvlMap::new();
        for key in 1..=5 {
            map.insert(key, ());
        }

        let root = map.root().unwrap();
        assert_eq!(root.key(), &2);
        assert_eq!(root.balance(), 1);
        assert_eq!(root.left().map(|node| *node.key()), Some(1));
        let right = root.right().unwrap();
        assert_eq!(right.key(), &4);
        assert_eq!(right.left().map(|node| *node.key()), Some(3));
        assert_eq!(right.right().map(|node| *node.key()), Some(5));
        assert_eq!(right.parent().map(|node| *node.key()), Some(2));

        map.insert(6, ());
        map.insert(7, ());

        let root = map.root().unwrap();
        assert_eq!(root.key(), &4);
        assert_eq!(root.balance(), 0);
        let left = root.left().unwrap();
        let right = root.right().unwrap();
        assert_eq!(
            (left.key(), left.left().map(|node| *node.key()), left.right().map(|node| *node.key())),
            (&2, Some(1), Some(3)),
        );
        assert_eq!(
            (right.key(), right.left().map(|node| *node.key()), right.right().map(|node| *node.key())),
            (&6, Some(5), Some(7)),
        );
    }

    #[test]
    fn test_predecessor_successor() {
        let map: AvlMap<u32, u32> = (0..20).map(|key| (key * 2, key)).collect();

        let node = map.find(&10).unwrap();
        assert_eq!(node.predecessor().map(|node| *node.key()), Some(8));
        assert_eq!(node.successor().map(|node| *node.key()), Some(12));

        assert!(map.first().unwrap().predecessor().is_none());
        assert!(map.last().unwrap().successor().is_none());
        assert_eq!(map.first().map(|node| *node.key()), Some(0));
        assert_eq!(map.last().map(|node| *node.key()), Some(38));

        let mut keys = Vec::new();
        let mut curr = map.last();
        while let Some(node) = curr {
            keys.push(*node.key());
            curr = node.predecessor();
        }
        assert_eq!(keys, (0..20).rev().map(|key| key * 2).collect::<Vec<u32>>());
    }

    #[test]
    fn test_min_max() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_get_mut() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_index() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map[&1] += 1;
        assert_eq!(map[&1], 2);
    }

    #[test]
    #[should_panic]
    fn test_index_missing_key() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_clear() {
        let mut map: AvlMap<u32, u32> = (0..10).map(|key| (key, key)).collect();
        map.clear();
        assert!(map.is_empty());
        assert!(map.root().is_none());
        map.insert(1, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_into_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_into_iter_partial() {
        let map: AvlMap<u32, String> = (0..10).map(|key| (key, key.to_string())).collect();
        let mut iterator = map.into_iter();
        assert_eq!(iterator.next(), Some((0, String::from("0"))));
        assert_eq!(iterator.size_hint(), (9, Some(9)));
    }

    #[test]
    fn test_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
        assert_eq!(map.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn test_iter_mut() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        for (_, value) in &mut map {
            *value += 1;
        }

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &3), (&3, &5), (&5, &7)],
        );
    }

    #[test]
    fn test_iter_mut_after_remove() {
        let mut map = AvlMap::new();
        for key in 0..16 {
            map.insert(key, key);
        }
        for key in (0..16).filter(|key| key % 2 == 0) {
            assert_eq!(map.remove(&key), Some((key, key)));
        }

        let keys: Vec<u32> = map.iter_mut().map(|(key, value)| {
            *value *= 10;
            *key
        }).collect();
        assert_eq!(keys, vec![1, 3, 5, 7, 9, 11, 13, 15]);

        map.insert(4, 4);
        for (key, value) in &mut map {
            *value += *key;
        }
        assert_eq!(
            map.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(u32, u32)>>(),
            vec![(1, 11), (3, 33), (4, 8), (5, 55), (7, 77), (9, 99), (11, 121), (13, 143), (15, 165)],
        );
        assert!(map.is_balanced());
    }

    #[test]
    fn test_eq_debug() {
        let first: AvlMap<u32, u32> = vec![(2, 2), (1, 1)].into_iter().collect();
        let second: AvlMap<u32, u32> = vec![(1, 1), (2, 2)].into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(format!("{:?}", first), "{1: 1, 2: 2}");
    }

    #[test]
    fn test_serde() {
        let map: AvlMap<u32, u32> = vec![(3, 4), (1, 2)].into_iter().collect();
        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::U32(3),
                Token::U32(4),
                Token::MapEnd,
            ],
        );
    }
}
