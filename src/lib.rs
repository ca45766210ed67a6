//! This crate exposes a link-based Binary Search Tree (BST) that stores a
//! multiset of comparable items and rebalances only when asked to.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored items. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores one item and
//! sometimes has child `Node`s. The most important invariants of this BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have an item
//!    less than its own item.
//! 2. For every `Node`, all the `Node`s in its right subtree have an item
//!    greater than *or equal to* its own item. Equal items are allowed and
//!    always chain into the right subtree, so the tree behaves as a multiset.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! items in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! ## Rebalancing
//!
//! Unlike an AVL or red-black tree, this tree never restructures itself on
//! insert or delete. Inserting items in ascending order produces a
//! linear-chain tree whose height is `N - 1`. Callers decide when to pay for
//! balance by calling [`linked::Tree::rebalance`], which rebuilds a tree of
//! minimal height over the same items. Every algorithm in the crate is
//! iterative, so even a pathological chain cannot overflow the call stack.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod linked;
