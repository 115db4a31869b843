//! The tree access contract and ready-made tree implementations.
//!
//! The layout engine never owns or mutates the caller's tree. It only reads
//! it through [`TreeSource`], a small interface whose operations are all
//! expected to run in constant time. [`DefaultTree`] is an arena-backed
//! implementation for callers that do not already have a tree structure of
//! their own, and [`Identity`] is a node handle for callers that want
//! reference-identity rather than value-equality node comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;

/// Read-only access to a rooted tree.
///
/// Implementations are expected to answer every operation in O(1); the
/// engine's linear-time guarantee depends on it. A slower implementation
/// degrades the overall complexity but not the correctness of the layout.
///
/// `Node` is an opaque handle chosen by the implementor: an index, an id, or
/// a reference. The engine keys all of its internal state by `Node`, so the
/// handle's `Eq`/`Hash` decide whether two sightings are "the same node".
/// Use [`Identity`] as the handle type for reference-identity semantics.
pub trait TreeSource {
    /// Node handle type. Cheap to copy, compared by `Eq`/`Hash`.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Returns the root of the tree.
    fn root(&self) -> Self::Node;

    /// Tells if a node has no children.
    fn is_leaf(&self, node: Self::Node) -> bool;

    /// Tells if `node` is a direct child of `parent`.
    fn is_child_of(&self, node: Self::Node, parent: Self::Node) -> bool;

    /// Returns the children of `parent` in order, first to last.
    ///
    /// The iterator is double-ended; `.rev()` yields last-to-first order.
    /// Empty exactly when `parent` is a leaf.
    fn children(&self, parent: Self::Node) -> impl DoubleEndedIterator<Item = Self::Node>;

    /// Returns the first child of `parent`, or `None` on a leaf.
    fn first_child(&self, parent: Self::Node) -> Option<Self::Node> {
        self.children(parent).next()
    }

    /// Returns the last child of `parent`, or `None` on a leaf.
    fn last_child(&self, parent: Self::Node) -> Option<Self::Node> {
        self.children(parent).next_back()
    }
}

impl<T: TreeSource> TreeSource for &T {
    type Node = T::Node;

    fn root(&self) -> Self::Node {
        (**self).root()
    }

    fn is_leaf(&self, node: Self::Node) -> bool {
        (**self).is_leaf(node)
    }

    fn is_child_of(&self, node: Self::Node, parent: Self::Node) -> bool {
        (**self).is_child_of(node, parent)
    }

    fn children(&self, parent: Self::Node) -> impl DoubleEndedIterator<Item = Self::Node> {
        (**self).children(parent)
    }

    fn first_child(&self, parent: Self::Node) -> Option<Self::Node> {
        (**self).first_child(parent)
    }

    fn last_child(&self, parent: Self::Node) -> Option<Self::Node> {
        (**self).last_child(parent)
    }
}

/// A node handle compared by reference identity instead of value equality.
///
/// Wrapping `&T` in `Identity` makes two handles equal only when they point
/// at the very same object, regardless of what `T::eq` would say. Choosing it
/// as a tree's `Node` type threads identity semantics through every internal
/// table of a layout run.
pub struct Identity<'a, T>(pub &'a T);

impl<'a, T> Identity<'a, T> {
    /// Returns the referenced value.
    pub fn get(self) -> &'a T {
        self.0
    }
}

impl<T> Clone for Identity<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Identity<'_, T> {}

impl<T> PartialEq for Identity<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl<T> Eq for Identity<'_, T> {}

impl<T> Hash for Identity<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.0, state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Identity<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Index of a node inside a [`DefaultTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData<V> {
    value: V,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A straightforward arena-backed tree satisfying [`TreeSource`].
///
/// Nodes are addressed by [`NodeId`] handles; the root is created together
/// with the tree and further nodes are appended with [`add_child`]. Parent
/// links are stored per node so `is_child_of` is O(1).
///
/// [`add_child`]: DefaultTree::add_child
#[derive(Debug, Clone)]
pub struct DefaultTree<V> {
    nodes: Vec<NodeData<V>>,
}

impl<V> DefaultTree<V> {
    /// Creates a tree consisting of a single root node.
    pub fn new(root_value: V) -> Self {
        Self {
            nodes: vec![NodeData {
                value: root_value,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Returns the handle of the root node.
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new child under `parent` and returns its handle.
    ///
    /// The child becomes the last child of `parent`.
    ///
    /// # Panics
    /// Panics if `parent` is not a handle of this tree.
    pub fn add_child(&mut self, parent: NodeId, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the value stored at a node.
    pub fn value(&self, node: NodeId) -> &V {
        &self.nodes[node.0].value
    }

    /// Returns the parent of a node, or `None` for the root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<V> TreeSource for DefaultTree<V> {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node.0].children.is_empty()
    }

    fn is_child_of(&self, node: NodeId, parent: NodeId) -> bool {
        self.nodes[node.0].parent == Some(parent)
    }

    fn children(&self, parent: NodeId) -> impl DoubleEndedIterator<Item = NodeId> {
        self.nodes[parent.0].children.iter().copied()
    }

    fn first_child(&self, parent: NodeId) -> Option<NodeId> {
        self.nodes[parent.0].children.first().copied()
    }

    fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        self.nodes[parent.0].children.last().copied()
    }
}
