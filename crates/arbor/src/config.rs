//! Layout configuration: orientation, in-level alignment and spacing policy.
//!
//! # Overview
//!
//! - [`RootEdge`] - Which side of the drawing the root is placed on.
//! - [`Alignment`] - How a node sits inside its level band when it is thinner
//!   than the level's thickest node.
//! - [`LayoutConfig`] - The full policy contract consumed by the engine,
//!   including the two gap functions.
//! - [`DefaultConfiguration`] - A ready-made implementation with constant
//!   gaps.

use serde::Deserialize;

/// The side of the drawing the root node is placed on.
///
/// The root edge decides which physical axis carries tree depth and the sign
/// of depth growth: `Bottom` and `Right` grow in the negative direction of
/// their axis relative to `Top` and `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum RootEdge {
    #[default]
    Top,
    Left,
    Bottom,
    Right,
}

impl RootEdge {
    /// True when levels stack along the y-axis (root at top or bottom).
    pub(crate) fn levels_stack_vertically(self) -> bool {
        matches!(self, RootEdge::Top | RootEdge::Bottom)
    }

    /// Sign of depth growth along the stacking axis.
    pub(crate) fn depth_sign(self) -> f32 {
        match self {
            RootEdge::Top | RootEdge::Left => 1.0,
            RootEdge::Bottom | RootEdge::Right => -1.0,
        }
    }
}

/// Placement of a node inside its level band when the node is thinner than
/// the level's maximum thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Alignment {
    /// Centered inside the band.
    #[default]
    Center,
    /// Flush with the band edge facing the root.
    TowardsRoot,
    /// Flush with the band edge facing away from the root.
    AwayFromRoot,
}

/// The layout policy consumed by the engine.
///
/// The gap functions must return non-negative values; a negative gap aborts
/// the layout run with a configuration error. There is no silent clamping.
pub trait LayoutConfig<N> {
    /// Returns the side of the drawing the root is placed on.
    fn root_edge(&self) -> RootEdge;

    /// Returns the alignment of thinner nodes within a level.
    fn alignment(&self) -> Alignment;

    /// Returns the gap between level `next_level - 1` and `next_level`.
    /// `[next_level > 0, result >= 0]`
    fn gap_between_levels(&self, next_level: usize) -> f32;

    /// Returns the minimal gap between two nodes that end up adjacent along
    /// the sibling axis, siblings or not. `[result >= 0]`
    fn gap_between_nodes(&self, a: N, b: N) -> f32;
}

impl<N, C: LayoutConfig<N>> LayoutConfig<N> for &C {
    fn root_edge(&self) -> RootEdge {
        (**self).root_edge()
    }

    fn alignment(&self) -> Alignment {
        (**self).alignment()
    }

    fn gap_between_levels(&self, next_level: usize) -> f32 {
        (**self).gap_between_levels(next_level)
    }

    fn gap_between_nodes(&self, a: N, b: N) -> f32 {
        (**self).gap_between_nodes(a, b)
    }
}

fn default_gap() -> f32 {
    10.0
}

/// A [`LayoutConfig`] with constant gaps between levels and between nodes.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultConfiguration {
    /// Side of the drawing the root is placed on.
    #[serde(default)]
    root_edge: RootEdge,

    /// Alignment of thinner nodes within their level band.
    #[serde(default)]
    alignment: Alignment,

    /// Constant gap between subsequent levels.
    #[serde(default = "default_gap")]
    gap_between_levels: f32,

    /// Constant gap between adjacent nodes.
    #[serde(default = "default_gap")]
    gap_between_nodes: f32,
}

impl DefaultConfiguration {
    /// Creates a configuration with the given gaps, root at the top and
    /// centered in-level alignment.
    pub fn new(gap_between_levels: f32, gap_between_nodes: f32) -> Self {
        Self {
            root_edge: RootEdge::default(),
            alignment: Alignment::default(),
            gap_between_levels,
            gap_between_nodes,
        }
    }

    /// Sets the root edge (builder style).
    pub fn with_root_edge(mut self, root_edge: RootEdge) -> Self {
        self.root_edge = root_edge;
        self
    }

    /// Sets the in-level alignment (builder style).
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the constant gap between levels (builder style).
    pub fn with_gap_between_levels(mut self, gap: f32) -> Self {
        self.gap_between_levels = gap;
        self
    }

    /// Sets the constant gap between nodes (builder style).
    pub fn with_gap_between_nodes(mut self, gap: f32) -> Self {
        self.gap_between_nodes = gap;
        self
    }
}

impl Default for DefaultConfiguration {
    fn default() -> Self {
        Self::new(default_gap(), default_gap())
    }
}

impl<N> LayoutConfig<N> for DefaultConfiguration {
    fn root_edge(&self) -> RootEdge {
        self.root_edge
    }

    fn alignment(&self) -> Alignment {
        self.alignment
    }

    fn gap_between_levels(&self, _next_level: usize) -> f32 {
        self.gap_between_levels
    }

    fn gap_between_nodes(&self, _a: N, _b: N) -> f32 {
        self.gap_between_nodes
    }
}
