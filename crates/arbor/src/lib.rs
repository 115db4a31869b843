//! Arbor - linear-time tidy tree layout.
//!
//! Given a rooted tree, a per-node size provider and an orientation/spacing
//! policy, arbor computes a non-overlapping rectangle for every node. The
//! engine is a port of the Buchheim-Junger-Leipert refinement of the
//! Reingold-Tilford algorithm and runs in O(n) time and O(n) auxiliary space
//! for any tree shape.
//!
//! The caller supplies three contracts: a [`TreeSource`] describing the tree,
//! an [`ExtentProvider`] measuring nodes, and a [`LayoutConfig`] with the
//! orientation, in-level alignment and gap policy. The result is a
//! [`TreeLayout`] mapping every node to its rectangle, normalized so the
//! overall bounding box starts at (0, 0). Painting boxes and edges from that
//! mapping is left to the consumer.
//!
//! # Examples
//!
//! ```
//! use arbor::{DefaultConfiguration, DefaultTree, FixedExtent, TreeLayout};
//! use arbor_core::geometry::Size;
//!
//! let mut tree = DefaultTree::new("root");
//! let root = tree.root_id();
//! tree.add_child(root, "left");
//! tree.add_child(root, "right");
//!
//! let layout = TreeLayout::new(
//!     tree,
//!     FixedExtent::new(Size::new(40.0, 20.0)),
//!     DefaultConfiguration::new(10.0, 10.0),
//! )
//! .expect("the tree is well formed");
//!
//! assert_eq!(layout.level_count(), 2);
//! for (node, rect) in layout.node_bounds() {
//!     println!("{node:?} -> {rect:?}");
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extent;
pub mod layout;
pub mod tree;

pub use arbor_core::geometry;

pub use config::{Alignment, DefaultConfiguration, LayoutConfig, RootEdge};
pub use diagnostics::{DumpConfig, check_tree};
pub use error::LayoutError;
pub use extent::{ExtentProvider, FixedExtent};
pub use layout::TreeLayout;
pub use tree::{DefaultTree, Identity, NodeId, TreeSource};
