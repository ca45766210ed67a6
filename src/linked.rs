//! A link-based BST storing a multiset of ordered items. Similar in spirit to the standard
//! library's `BTreeSet` except keeping two children per parent, allowing duplicate items, and
//! never balancing itself — callers request balance explicitly with [`Tree::rebalance`].
//!
//! Every algorithm here is iterative. A tree built from ascending inserts is a linear chain,
//! and chains must not be able to overflow the call stack during search, mutation, traversal,
//! or drop.
//!
//! # Examples
//!
//! ```
//! use linked_bst::linked::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.find(&1), None);
//!
//! tree.add(1);
//! assert_eq!(tree.find(&1), Some(&1));
//!
//! // Duplicates are allowed; each `add` stores another copy.
//! tree.add(1);
//! assert_eq!(tree.len(), 2);
//!
//! // Removing a stored item returns it.
//! assert_eq!(tree.remove(&1), Ok(1));
//! assert_eq!(tree.len(), 1);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::vec;

/// The error returned by [`Tree::remove`] when no stored item matches the one to remove.
///
/// `remove` is the only operation that treats absence as a failure. The lookup family
/// ([`Tree::find`], [`Tree::replace`], [`Tree::successor`], [`Tree::predecessor`]) reports
/// absence with `None` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("item not in tree")
    }
}

impl std::error::Error for NotFound {}

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    item: T,
    left: Link<T>,
    right: Link<T>,
}

impl<T> Node<T> {
    fn new(item: T) -> Box<Self> {
        Box::new(Node {
            item,
            left: None,
            right: None,
        })
    }
}

/// A Binary Search Tree over a single ordered item type. This can be used for inserting,
/// finding, and deleting items, for traversing them in several orders, and for rebuilding
/// the tree at minimal height on demand.
///
/// Items in a node's left subtree compare less than the node's item; items in its right
/// subtree compare greater *or equal*. Equal items therefore chain into the right subtree
/// and the tree behaves as a multiset.
pub struct Tree<T> {
    root: Link<T>,
    size: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        drop_subtree(self.root.take());
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone + Ord,
{
    fn clone(&self) -> Self {
        // Re-inserting a BST's preorder sequence into an empty tree reproduces its exact
        // shape under the same `>=` tie-break.
        let mut tree = Self::new();
        tree.extend(self.iter().cloned());
        tree
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Returns how many items are stored in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree stores no items.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Removes every item from the tree.
    pub fn clear(&mut self) {
        drop_subtree(self.root.take());
        self.size = 0;
    }

    /// Adds an item to the tree. Every call stores a new copy — equal items accumulate in
    /// the right subtree rather than being deduplicated or overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.add(2);
    /// tree.add(2);
    ///
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn add(&mut self, item: T)
    where
        T: Ord,
    {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if item < node.item {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Node::new(item));
        self.size += 1;
    }

    /// Potentially finds an item in this tree equal to the given one. The reference returned
    /// points at the *stored* copy, not the queried instance. If no item matches, `None` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.add(1);
    ///
    /// assert_eq!(tree.find(&1), Some(&1));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match item.cmp(&n.item) {
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Equal => return Some(&n.item),
                Ordering::Greater => node = n.right.as_deref(),
            }
        }
        None
    }

    /// Returns `true` if an equal item is stored in the tree.
    pub fn contains(&self, item: &T) -> bool
    where
        T: Ord,
    {
        self.find(item).is_some()
    }

    /// Removes one item equal to the given one and returns it. If duplicates exist, the
    /// topmost matching node is the one removed.
    ///
    /// Unlike the lookup methods, an absent item here is an error, not a `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::{NotFound, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.add(1);
    ///
    /// assert_eq!(tree.remove(&1), Ok(1));
    /// assert_eq!(tree.remove(&1), Err(NotFound));
    /// ```
    pub fn remove(&mut self, item: &T) -> Result<T, NotFound>
    where
        T: Ord,
    {
        // Descend over the *owning* parent-to-child links rather than node references. The
        // tree's `root` field is the parent slot of the root node, so removing the root
        // needs no special case.
        let mut link = &mut self.root;
        loop {
            let ordering = match link.as_deref() {
                None => return Err(NotFound),
                Some(node) => item.cmp(&node.item),
            };
            match ordering {
                Ordering::Less => link = &mut link.as_mut().expect("compared against a node").left,
                Ordering::Greater => {
                    link = &mut link.as_mut().expect("compared against a node").right
                }
                Ordering::Equal => break,
            }
        }

        let has_two_children = {
            let node = link.as_deref().expect("the descent stopped on a node");
            node.left.is_some() && node.right.is_some()
        };

        let removed = if has_two_children {
            // Lift the maximum item of the left subtree into the target's slot, then splice
            // the maximum node's left child (its only possible child) into its place. The
            // maximum is strictly less than the target because duplicates never descend left.
            let node = link.as_deref_mut().expect("the descent stopped on a node");
            let mut pred_link = &mut node.left;
            while pred_link
                .as_deref()
                .expect("two-children case implies a left child")
                .right
                .is_some()
            {
                pred_link = &mut pred_link.as_deref_mut().expect("checked in the loop").right;
            }
            let mut pred = pred_link.take().expect("the descent stopped on a node");
            *pred_link = pred.left.take();
            mem::replace(&mut node.item, pred.item)
        } else {
            // Zero or one child: the surviving child (if any) takes over the owning link.
            let mut node = link.take().expect("the descent stopped on a node");
            *link = node.left.take().or(node.right.take());
            node.item
        };

        self.size -= 1;
        Ok(removed)
    }

    /// Overwrites the stored item equal to `item` with `new_item` and returns the old item,
    /// or returns `None` if no item matches.
    ///
    /// The node is overwritten *in place*; the tree is not re-sorted. It is the caller's
    /// responsibility that `new_item` compares the same way as `item` against the rest of
    /// the tree — otherwise the ordering invariant is silently broken and later searches
    /// may miss items.
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T>
    where
        T: Ord,
    {
        let mut node = self.root.as_deref_mut();
        while let Some(n) = node {
            match item.cmp(&n.item) {
                Ordering::Less => node = n.left.as_deref_mut(),
                Ordering::Equal => return Some(mem::replace(&mut n.item, new_item)),
                Ordering::Greater => node = n.right.as_deref_mut(),
            }
        }
        None
    }

    /// Returns an iterator over the items in preorder (node, left subtree, right subtree).
    /// This is also the order used by the `IntoIterator` impls.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Returns an iterator over the items in preorder. Alias for [`Tree::iter`], named for
    /// symmetry with the other traversal orders.
    pub fn preorder(&self) -> Iter<'_, T> {
        self.iter()
    }

    /// Returns an iterator over the items in ascending order (left subtree, node, right
    /// subtree). The walk is lazy; nothing is materialized up front.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let tree: Tree<i32> = vec![5, 3, 8, 1].into_iter().collect();
    /// let sorted: Vec<&i32> = tree.inorder().collect();
    ///
    /// assert_eq!(sorted, [&1, &3, &5, &8]);
    /// ```
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder {
            stack: Vec::new(),
            next: self.root.as_deref(),
        }
    }

    /// Returns an iterator over the items in postorder (left subtree, right subtree, node).
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder {
            stack: self
                .root
                .as_deref()
                .map(|root| (root, false))
                .into_iter()
                .collect(),
        }
    }

    /// Returns an iterator over the items level by level, top to bottom and left to right
    /// within each level.
    pub fn levelorder(&self) -> Levelorder<'_, T> {
        Levelorder {
            queue: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Returns the height of the tree: the number of links on the longest path from the root
    /// down to a leaf. An empty tree has height `-1`, so a single-node tree has height `0`.
    pub fn height(&self) -> isize {
        let mut height = -1;
        let mut stack: Vec<(&Node<T>, isize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }
        height
    }

    /// Returns `true` if the tree's height is within the balance bound
    /// `height < 2 * log2(size + 1) - 1`.
    ///
    /// A single-node tree (height `0`) always reports `false`. That inherited quirk is kept
    /// as observable behavior rather than corrected.
    pub fn is_balanced(&self) -> bool {
        let height = self.height();
        if height == 0 {
            return false;
        }
        (height as f64) < 2.0 * ((self.size + 1) as f64).log2() - 1.0
    }

    /// Rebuilds the tree at minimal height, `⌈log2(n + 1)⌉ - 1` for `n` items. Every
    /// existing node is discarded; only the items survive. The middle of the sorted item
    /// sequence becomes the new root, recursively.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// // Ascending inserts build a chain of height 6...
    /// let mut tree: Tree<i32> = (0..7).collect();
    /// assert_eq!(tree.height(), 6);
    ///
    /// // ...which rebalancing collapses to the minimal height 2.
    /// tree.rebalance();
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn rebalance(&mut self)
    where
        T: Ord,
    {
        // Consuming in-order flatten: nodes are dismantled as their items move out, so the
        // old structure is released without recursive drop glue. The result is already
        // sorted by the tree invariant.
        let mut items = Vec::with_capacity(self.size);
        let mut stack: Vec<Box<Node<T>>> = Vec::new();
        let mut next = self.root.take();
        loop {
            while let Some(mut node) = next {
                next = node.left.take();
                stack.push(node);
            }
            match stack.pop() {
                Some(mut node) => {
                    next = node.right.take();
                    items.push(node.item);
                }
                None => break,
            }
        }

        self.size = 0;
        let len = items.len();
        let mut cursor = items.into_iter();
        self.root = Self::build(&mut cursor, len, &mut self.size);
    }

    /// Builds a minimal-height subtree from the next `len` items of an ascending cursor:
    /// the middle item becomes the subtree root. Recursion depth is `O(log n)`.
    fn build(cursor: &mut vec::IntoIter<T>, len: usize, size: &mut usize) -> Link<T> {
        if len == 0 {
            return None;
        }
        let half = len / 2;
        let left = Self::build(cursor, half, size);
        let mut node = Node::new(cursor.next().expect("cursor holds exactly `len` items"));
        node.left = left;
        node.right = Self::build(cursor, len - half - 1, size);
        *size += 1;
        Some(node)
    }

    /// Returns the items between `low` and `high` inclusive, in ascending order.
    ///
    /// Both bounds must themselves be stored in the tree: if either is absent the result is
    /// empty, even when items inside the range exist. Inverted bounds (`low > high`) also
    /// yield an empty result. Neither case is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::linked::Tree;
    ///
    /// let tree: Tree<i32> = (1..=6).collect();
    ///
    /// assert_eq!(tree.range_find(&2, &5), [&2, &3, &4, &5]);
    /// // 10 is not stored, so the range is empty despite 2..=6 existing.
    /// assert!(tree.range_find(&2, &10).is_empty());
    /// ```
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T>
    where
        T: Ord,
    {
        let items: Vec<&T> = self.inorder().collect();
        let low_position = items.iter().position(|stored| *stored == low);
        let high_position = items.iter().position(|stored| *stored == high);
        match (low_position, high_position) {
            (Some(low), Some(high)) => items
                .get(low..=high)
                .map(|range| range.to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Returns the item immediately after `item` in ascending order.
    ///
    /// Empty and single-node trees return `None`. If `item` is not stored, the *maximum*
    /// stored item is returned — not `None`. That inherited quirk (and its asymmetry with
    /// [`Tree::predecessor`]) is kept as observable behavior.
    pub fn successor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        if self.size <= 1 {
            return None;
        }
        let items: Vec<&T> = self.inorder().collect();
        match items.iter().position(|stored| *stored == item) {
            None => items.last().copied(),
            Some(position) => items.get(position + 1).copied(),
        }
    }

    /// Returns the item immediately before `item` in ascending order.
    ///
    /// Empty and single-node trees return `None`, as does an absent `item` — unlike
    /// [`Tree::successor`], there is no fallback to an extreme item.
    pub fn predecessor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        if self.size <= 1 {
            return None;
        }
        let items: Vec<&T> = self.inorder().collect();
        let position = items.iter().position(|stored| *stored == item)?;
        position
            .checked_sub(1)
            .and_then(|previous| items.get(previous))
            .copied()
    }
}

impl<T: Ord> Extend<T> for Tree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            stack: self.root.take().into_iter().collect(),
        }
    }
}

/// Tears a subtree down with an explicit stack. `Box`'s drop glue would recurse once per
/// level, which is exactly the chain-shaped tree this crate promises to survive.
fn drop_subtree<T>(root: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        if let Some(left) = node.left.take() {
            stack.push(left);
        }
        if let Some(right) = node.right.take() {
            stack.push(right);
        }
    }
}

/// A lazy preorder iterator over a [`Tree`], created by [`Tree::iter`].
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        // Push right before left so left comes back off the stack first.
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.item)
    }
}

/// A lazy ascending-order iterator over a [`Tree`], created by [`Tree::inorder`].
pub struct Inorder<'a, T> {
    stack: Vec<&'a Node<T>>,
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Inorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(node) = self.next {
            self.next = node.left.as_deref();
            self.stack.push(node);
        }
        let node = self.stack.pop()?;
        self.next = node.right.as_deref();
        Some(&node.item)
    }
}

/// A lazy postorder iterator over a [`Tree`], created by [`Tree::postorder`].
pub struct Postorder<'a, T> {
    // The flag marks nodes whose children are already on the stack and which should be
    // yielded the next time they are popped.
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(&node.item);
            }
            self.stack.push((node, true));
            if let Some(right) = node.right.as_deref() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left.as_deref() {
                self.stack.push((left, false));
            }
        }
        None
    }
}

/// A lazy level-order (breadth-first) iterator over a [`Tree`], created by
/// [`Tree::levelorder`].
pub struct Levelorder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

impl<'a, T> Iterator for Levelorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.left.as_deref() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.right.as_deref() {
            self.queue.push_back(right);
        }
        Some(&node.item)
    }
}

/// A consuming preorder iterator over a [`Tree`], created by its `IntoIterator` impl.
pub struct IntoIter<T> {
    stack: Vec<Box<Node<T>>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut node = self.stack.pop()?;
        if let Some(right) = node.right.take() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.take() {
            self.stack.push(left);
        }
        Some(node.item)
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Dismantle whatever wasn't consumed instead of letting the remaining subtrees drop
        // recursively.
        while let Some(mut node) = self.stack.pop() {
            if let Some(left) = node.left.take() {
                self.stack.push(left);
            }
            if let Some(right) = node.right.take() {
                self.stack.push(right);
            }
        }
    }
}
