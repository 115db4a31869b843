//! The tidy tree layout engine.
//!
//! Implements the Buchheim-Junger-Leipert refinement of the Reingold-Tilford
//! tree drawing algorithm ("Improving Walker's Algorithm to Run in Linear
//! Time", 2002). For a tree with n nodes the layout takes O(n) time and O(n)
//! auxiliary space regardless of tree shape, provided the [`TreeSource`]
//! operations are O(1).
//!
//! # Algorithm Overview
//!
//! 1. **Validation traversal:** every node is interned into a slot table and
//!    checked once; duplicate reachability and contract violations abort
//!    construction before any layout work.
//! 2. **First walk (post-order):** assigns a preliminary coordinate along the
//!    sibling axis to every node, resolving overlap between neighboring
//!    subtrees by walking their facing contours. Threads substitute for
//!    missing child pointers so each contour step is O(1) amortized, and
//!    overlap corrections are recorded as deferred shifts instead of moving
//!    whole subtrees.
//! 3. **Level thickness pass (pre-order):** records, per depth, the thickest
//!    node of that depth.
//! 4. **Second walk (pre-order):** sums the deferred displacements into
//!    absolute positions, maps the depth axis according to the configured
//!    root edge and alignment, and tracks the global bounds.
//!
//! The final node rectangles are translated so the overall bounding box
//! starts at (0, 0).

use std::fmt;

use indexmap::IndexMap;
use log::{debug, info};

use arbor_core::geometry::{Bounds, Point, Rect, Size};

use crate::{
    config::{Alignment, LayoutConfig},
    diagnostics::DumpConfig,
    error::LayoutError,
    extent::ExtentProvider,
    tree::TreeSource,
};

/// A computed tree layout.
///
/// Construction runs the complete algorithm; afterwards the instance is
/// immutable and only serves lookups. A new input tree requires a new
/// instance. The engine never mutates the caller's tree; all auxiliary state
/// lives in tables owned by the layout run, so independent instances may be
/// used from different threads without synchronization.
pub struct TreeLayout<T, E, C>
where
    T: TreeSource,
    E: ExtentProvider<T::Node>,
    C: LayoutConfig<T::Node>,
{
    tree: T,
    extents: E,
    config: C,
    level_thickness: Vec<f32>,
    bounds: Bounds,
    node_bounds: IndexMap<T::Node, Rect>,
}

impl<T, E, C> TreeLayout<T, E, C>
where
    T: TreeSource,
    E: ExtentProvider<T::Node>,
    C: LayoutConfig<T::Node>,
{
    /// Computes the layout of `tree`.
    ///
    /// The whole computation happens eagerly within this call; there is no
    /// partial or streaming mode.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Structure`] when a node is reachable from the
    /// root more than once, [`LayoutError::Contract`] when the tree access
    /// interface or extent provider misbehaves, and [`LayoutError::Config`]
    /// when a gap function returns a negative value. In every case no
    /// partial layout is exposed.
    pub fn new(tree: T, extents: E, config: C) -> Result<Self, LayoutError> {
        info!("Computing tree layout");

        let root = tree.root();
        let mut walker = Walker::new(&tree, &extents, &config);

        walker.validate(root)?;
        debug!(nodes = walker.slots.len(); "Tree validated");

        walker.first_walk(root, None)?;
        debug!("First walk complete");

        walker.measure_levels(root, 0);
        walker.resolve_level_gaps()?;

        let root_prelim = walker.prelim_of(root);
        walker.second_walk(root, -root_prelim, 0, 0.0);
        debug!(levels = walker.level_thickness.len(); "Second walk complete");

        let node_bounds = walker.normalized_node_bounds();
        let level_thickness = std::mem::take(&mut walker.level_thickness);
        let bounds = walker.bounds;

        info!(
            nodes = node_bounds.len(),
            levels = level_thickness.len();
            "Layout complete",
        );

        Ok(Self {
            tree,
            extents,
            config,
            level_thickness,
            bounds,
            node_bounds,
        })
    }

    /// Maps every node of the tree to its final rectangle.
    ///
    /// For each rectangle x and y are >= 0. At least one rectangle touches
    /// x = 0 and at least one touches y = 0. Iteration follows the
    /// validation traversal's pre-order.
    pub fn node_bounds(&self) -> &IndexMap<T::Node, Rect> {
        &self.node_bounds
    }

    /// Returns the smallest rectangle containing every node rectangle.
    ///
    /// It always starts at (0, 0).
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.bounds.width(), self.bounds.height())
    }

    /// Returns the number of levels of the tree. `[result > 0]`
    pub fn level_count(&self) -> usize {
        self.level_thickness.len()
    }

    /// Returns the thickness of a level: the maximal extent along the
    /// level-stacking axis among the nodes of that level.
    ///
    /// # Panics
    /// Panics if `level >= level_count()`.
    pub fn level_thickness(&self, level: usize) -> f32 {
        self.level_thickness[level]
    }

    /// Returns the tree the layout was created for.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Returns the extent provider used by this layout.
    pub fn extent_provider(&self) -> &E {
        &self.extents
    }

    /// Returns the configuration used by this layout.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Writes an indented, line-per-node description of the tree.
    pub fn dump(&self, out: &mut dyn fmt::Write, config: &DumpConfig) -> fmt::Result {
        self.dump_subtree(out, self.tree.root(), 0, config)
    }

    fn dump_subtree(
        &self,
        out: &mut dyn fmt::Write,
        node: T::Node,
        depth: usize,
        config: &DumpConfig,
    ) -> fmt::Result {
        for _ in 0..depth {
            out.write_str(config.indent())?;
        }
        write!(out, "{node:?}")?;
        if config.include_extent() {
            write!(
                out,
                " (size: {}x{})",
                self.extents.width(node),
                self.extents.height(node)
            )?;
        }
        writeln!(out)?;

        for child in self.tree.children(node) {
            self.dump_subtree(out, child, depth + 1, config)?;
        }
        Ok(())
    }
}

/// One layout run over a borrowed tree.
///
/// All per-node algorithm state lives here, keyed by a dense slot index that
/// is assigned to each node on first encounter during validation. Caller
/// nodes are never touched.
struct Walker<'a, T, E, C>
where
    T: TreeSource,
    E: ExtentProvider<T::Node>,
    C: LayoutConfig<T::Node>,
{
    tree: &'a T,
    extents: &'a E,
    config: &'a C,

    /// Levels stack along the y-axis (root edge Top or Bottom).
    vertical: bool,
    /// Sign of depth growth along the stacking axis.
    sign: f32,

    slots: IndexMap<T::Node, usize>,

    // Per-node state, indexed by slot.
    modifier: Vec<f32>,
    thread: Vec<Option<T::Node>>,
    prelim: Vec<f32>,
    change: Vec<f32>,
    shift: Vec<f32>,
    ancestor: Vec<Option<T::Node>>,
    number: Vec<usize>,
    position: Vec<Point>,

    level_thickness: Vec<f32>,
    /// `level_gaps[l]` is the validated gap between level `l - 1` and `l`.
    level_gaps: Vec<f32>,
    bounds: Bounds,
}

impl<'a, T, E, C> Walker<'a, T, E, C>
where
    T: TreeSource,
    E: ExtentProvider<T::Node>,
    C: LayoutConfig<T::Node>,
{
    fn new(tree: &'a T, extents: &'a E, config: &'a C) -> Self {
        let root_edge = config.root_edge();
        Self {
            tree,
            extents,
            config,
            vertical: root_edge.levels_stack_vertically(),
            sign: root_edge.depth_sign(),
            slots: IndexMap::new(),
            modifier: Vec::new(),
            thread: Vec::new(),
            prelim: Vec::new(),
            change: Vec::new(),
            shift: Vec::new(),
            ancestor: Vec::new(),
            number: Vec::new(),
            position: Vec::new(),
            level_thickness: Vec::new(),
            level_gaps: Vec::new(),
            bounds: Bounds::empty(),
        }
    }

    /// Interns every reachable node and checks the input contracts.
    ///
    /// Fails on the second sighting of a node, on a negative extent, and on
    /// an `is_leaf` answer that disagrees with `children`.
    fn validate(&mut self, v: T::Node) -> Result<(), LayoutError> {
        let slot = self.slots.len();
        if self.slots.insert(v, slot).is_some() {
            return Err(LayoutError::Structure(format!(
                "node used more than once in tree: {v:?}"
            )));
        }
        self.modifier.push(0.0);
        self.thread.push(None);
        self.prelim.push(0.0);
        self.change.push(0.0);
        self.shift.push(0.0);
        self.ancestor.push(None);
        self.number.push(0);
        self.position.push(Point::default());

        let width = self.extents.width(v);
        let height = self.extents.height(v);
        if width < 0.0 || height < 0.0 {
            return Err(LayoutError::Contract(format!(
                "extent provider returned a negative size {width}x{height} for {v:?}"
            )));
        }

        let tree = self.tree;
        let mut child_count = 0usize;
        for child in tree.children(v) {
            child_count += 1;
            self.validate(child)?;
        }
        if tree.is_leaf(v) != (child_count == 0) {
            return Err(LayoutError::Contract(format!(
                "is_leaf disagrees with children for {v:?}"
            )));
        }
        Ok(())
    }

    fn slot(&self, v: T::Node) -> usize {
        self.slots[&v]
    }

    fn modifier_of(&self, v: T::Node) -> f32 {
        self.modifier[self.slot(v)]
    }

    fn set_modifier(&mut self, v: T::Node, value: f32) {
        let slot = self.slot(v);
        self.modifier[slot] = value;
    }

    fn thread_of(&self, v: T::Node) -> Option<T::Node> {
        self.thread[self.slot(v)]
    }

    fn set_thread(&mut self, v: T::Node, thread: T::Node) {
        let slot = self.slot(v);
        self.thread[slot] = Some(thread);
    }

    fn prelim_of(&self, v: T::Node) -> f32 {
        self.prelim[self.slot(v)]
    }

    fn set_prelim(&mut self, v: T::Node, value: f32) {
        let slot = self.slot(v);
        self.prelim[slot] = value;
    }

    fn change_of(&self, v: T::Node) -> f32 {
        self.change[self.slot(v)]
    }

    fn set_change(&mut self, v: T::Node, value: f32) {
        let slot = self.slot(v);
        self.change[slot] = value;
    }

    fn shift_of(&self, v: T::Node) -> f32 {
        self.shift[self.slot(v)]
    }

    fn set_shift(&mut self, v: T::Node, value: f32) {
        let slot = self.slot(v);
        self.shift[slot] = value;
    }

    /// Contour tracking pointer; defaults to the node itself.
    fn ancestor_of(&self, v: T::Node) -> T::Node {
        self.ancestor[self.slot(v)].unwrap_or(v)
    }

    fn set_ancestor(&mut self, v: T::Node, ancestor: T::Node) {
        let slot = self.slot(v);
        self.ancestor[slot] = Some(ancestor);
    }

    /// Extent along the sibling axis; enters the distance between nodes.
    fn size_of(&self, v: T::Node) -> f32 {
        if self.vertical {
            self.extents.width(v)
        } else {
            self.extents.height(v)
        }
    }

    /// Extent along the level-stacking axis; enters the level thickness.
    fn thickness_of(&self, v: T::Node) -> f32 {
        if self.vertical {
            self.extents.height(v)
        } else {
            self.extents.width(v)
        }
    }

    /// Minimum permissible separation of the centers of two adjacent nodes:
    /// half of both sizes plus the configured gap.
    fn distance(&self, v: T::Node, w: T::Node) -> Result<f32, LayoutError> {
        let gap = self.config.gap_between_nodes(v, w);
        if gap < 0.0 {
            return Err(LayoutError::Config(format!(
                "gap_between_nodes returned {gap} for {v:?} and {w:?}"
            )));
        }
        Ok((self.size_of(v) + self.size_of(w)) / 2.0 + gap)
    }

    /// Next node on the left contour below `v`.
    fn next_left(&self, v: T::Node) -> Option<T::Node> {
        if self.tree.is_leaf(v) {
            self.thread_of(v)
        } else {
            self.tree.first_child(v)
        }
    }

    /// Next node on the right contour below `v`.
    fn next_right(&self, v: T::Node) -> Option<T::Node> {
        if self.tree.is_leaf(v) {
            self.thread_of(v)
        } else {
            self.tree.last_child(v)
        }
    }

    /// 1-based index of `node` among the children of `parent`.
    ///
    /// Computed for all siblings at once the first time any child of
    /// `parent` is queried, then served from the cache.
    fn number_of(&mut self, node: T::Node, parent: T::Node) -> Result<usize, LayoutError> {
        if self.number[self.slot(node)] == 0 {
            let tree = self.tree;
            for (index, child) in tree.children(parent).enumerate() {
                let slot = self.slot(child);
                self.number[slot] = index + 1;
            }
        }

        match self.number[self.slot(node)] {
            0 => Err(LayoutError::Contract(format!(
                "{node:?} is not a child of {parent:?}"
            ))),
            n => Ok(n),
        }
    }

    /// The greatest distinct ancestor of `v_i_minus` and its right neighbor
    /// `v`: the recorded ancestor when it is a sibling of `v`, otherwise the
    /// current default ancestor.
    fn greatest_distinct_ancestor(
        &self,
        v_i_minus: T::Node,
        parent_of_v: T::Node,
        default_ancestor: T::Node,
    ) -> T::Node {
        let ancestor = self.ancestor_of(v_i_minus);
        if self.tree.is_child_of(ancestor, parent_of_v) {
            ancestor
        } else {
            default_ancestor
        }
    }

    /// Moves the subtree rooted at `w_plus` right by `shift`, spreading the
    /// correction evenly across the sibling subtrees between `w_minus` and
    /// `w_plus` through the deferred change/shift counters.
    fn move_subtree(
        &mut self,
        w_minus: T::Node,
        w_plus: T::Node,
        parent: T::Node,
        shift: f32,
    ) -> Result<(), LayoutError> {
        let subtrees =
            self.number_of(w_plus, parent)? as f32 - self.number_of(w_minus, parent)? as f32;
        self.set_change(w_plus, self.change_of(w_plus) - shift / subtrees);
        self.set_shift(w_plus, self.shift_of(w_plus) + shift);
        self.set_change(w_minus, self.change_of(w_minus) + shift / subtrees);
        self.set_prelim(w_plus, self.prelim_of(w_plus) + shift);
        self.set_modifier(w_plus, self.modifier_of(w_plus) + shift);
        Ok(())
    }

    /// Resolves overlap between the subtree of `v` and the subtrees placed
    /// to its left, by walking the two facing contours in lock step.
    ///
    /// "minus" refers to the left subtree, "plus" to the right one; "i" to
    /// the inside and "o" to the outside contour. When one contour ends
    /// before the other, the exhausted outside contour node is threaded to
    /// the surviving inside contour node so later traversals can continue
    /// past the gap.
    ///
    /// Besides `v` this takes the left sibling and the parent of `v`, which
    /// the caller has at hand anyway; this keeps parent/sibling lookups out
    /// of the [`TreeSource`] contract.
    fn apportion(
        &mut self,
        v: T::Node,
        mut default_ancestor: T::Node,
        left_sibling: Option<T::Node>,
        parent_of_v: T::Node,
    ) -> Result<T::Node, LayoutError> {
        let Some(w) = left_sibling else {
            return Ok(default_ancestor);
        };

        let mut v_o_plus = v;
        let mut v_i_plus = v;
        let mut v_i_minus = w;
        // The leftmost sibling of v is the first child of v's parent.
        let mut v_o_minus = self.first_child_checked(parent_of_v)?;

        let mut s_i_plus = self.modifier_of(v_i_plus);
        let mut s_o_plus = self.modifier_of(v_o_plus);
        let mut s_i_minus = self.modifier_of(v_i_minus);
        let mut s_o_minus = self.modifier_of(v_o_minus);

        let mut next_right_v_i_minus = self.next_right(v_i_minus);
        let mut next_left_v_i_plus = self.next_left(v_i_plus);

        while let (Some(next_i_minus), Some(next_i_plus)) =
            (next_right_v_i_minus, next_left_v_i_plus)
        {
            v_i_minus = next_i_minus;
            v_i_plus = next_i_plus;
            v_o_minus = self.contour_step(self.next_left(v_o_minus), v_o_minus)?;
            v_o_plus = self.contour_step(self.next_right(v_o_plus), v_o_plus)?;
            self.set_ancestor(v_o_plus, v);

            let shift = (self.prelim_of(v_i_minus) + s_i_minus)
                - (self.prelim_of(v_i_plus) + s_i_plus)
                + self.distance(v_i_minus, v_i_plus)?;
            if shift > 0.0 {
                let ancestor =
                    self.greatest_distinct_ancestor(v_i_minus, parent_of_v, default_ancestor);
                self.move_subtree(ancestor, v, parent_of_v, shift)?;
                s_i_plus += shift;
                s_o_plus += shift;
            }

            s_i_minus += self.modifier_of(v_i_minus);
            s_i_plus += self.modifier_of(v_i_plus);
            s_o_minus += self.modifier_of(v_o_minus);
            s_o_plus += self.modifier_of(v_o_plus);

            next_right_v_i_minus = self.next_right(v_i_minus);
            next_left_v_i_plus = self.next_left(v_i_plus);
        }

        if let Some(next) = next_right_v_i_minus {
            if self.next_right(v_o_plus).is_none() {
                self.set_thread(v_o_plus, next);
                self.set_modifier(v_o_plus, self.modifier_of(v_o_plus) + s_i_minus - s_o_plus);
            }
        }
        if let Some(next) = next_left_v_i_plus {
            if self.next_left(v_o_minus).is_none() {
                self.set_thread(v_o_minus, next);
                self.set_modifier(v_o_minus, self.modifier_of(v_o_minus) + s_i_plus - s_o_minus);
                default_ancestor = v;
            }
        }

        Ok(default_ancestor)
    }

    /// Advances an outside contour. The outside contours can never run out
    /// before the inside contours driving the loop; a missing step means the
    /// tree changed underneath the layout run.
    fn contour_step(
        &self,
        next: Option<T::Node>,
        at: T::Node,
    ) -> Result<T::Node, LayoutError> {
        next.ok_or_else(|| {
            LayoutError::Contract(format!("contour ended unexpectedly below {at:?}"))
        })
    }

    fn first_child_checked(&self, parent: T::Node) -> Result<T::Node, LayoutError> {
        self.tree.first_child(parent).ok_or_else(|| {
            LayoutError::Contract(format!("first_child returned None for non-leaf {parent:?}"))
        })
    }

    fn last_child_checked(&self, parent: T::Node) -> Result<T::Node, LayoutError> {
        self.tree.last_child(parent).ok_or_else(|| {
            LayoutError::Contract(format!("last_child returned None for non-leaf {parent:?}"))
        })
    }

    /// Applies the deferred shifts of the children of `v`, last to first.
    fn execute_shifts(&mut self, v: T::Node) {
        let tree = self.tree;
        let mut shift = 0.0;
        let mut change = 0.0;
        for w in tree.children(v).rev() {
            change += self.change_of(w);
            self.set_prelim(w, self.prelim_of(w) + shift);
            self.set_modifier(w, self.modifier_of(w) + shift);
            shift += self.shift_of(w) + change;
        }
    }

    /// Post-order pass computing preliminary coordinates and modifiers.
    fn first_walk(&mut self, v: T::Node, left_sibling: Option<T::Node>) -> Result<(), LayoutError> {
        let tree = self.tree;
        if tree.is_leaf(v) {
            if let Some(w) = left_sibling {
                let distance = self.distance(v, w)?;
                self.set_prelim(v, self.prelim_of(w) + distance);
            }
            return Ok(());
        }

        let first_child = self.first_child_checked(v)?;
        let mut default_ancestor = first_child;
        let mut previous_child = None;
        for w in tree.children(v) {
            self.first_walk(w, previous_child)?;
            default_ancestor = self.apportion(w, default_ancestor, previous_child, v)?;
            previous_child = Some(w);
        }
        self.execute_shifts(v);

        let last_child = self.last_child_checked(v)?;
        let midpoint = (self.prelim_of(first_child) + self.prelim_of(last_child)) / 2.0;
        if let Some(w) = left_sibling {
            let distance = self.distance(v, w)?;
            self.set_prelim(v, self.prelim_of(w) + distance);
            self.set_modifier(v, self.prelim_of(v) - midpoint);
        } else {
            self.set_prelim(v, midpoint);
        }
        Ok(())
    }

    /// Pre-order pass recording the maximal thickness per level.
    fn measure_levels(&mut self, v: T::Node, level: usize) {
        if self.level_thickness.len() <= level {
            self.level_thickness.push(0.0);
        }
        let thickness = self.thickness_of(v);
        if self.level_thickness[level] < thickness {
            self.level_thickness[level] = thickness;
        }

        let tree = self.tree;
        for child in tree.children(v) {
            self.measure_levels(child, level + 1);
        }
    }

    /// Fetches and validates the gap before each level once.
    fn resolve_level_gaps(&mut self) -> Result<(), LayoutError> {
        self.level_gaps = Vec::with_capacity(self.level_thickness.len());
        self.level_gaps.push(0.0); // no gap above the root level
        for next_level in 1..self.level_thickness.len() {
            let gap = self.config.gap_between_levels(next_level);
            if gap < 0.0 {
                return Err(LayoutError::Config(format!(
                    "gap_between_levels returned {gap} for level {next_level}"
                )));
            }
            self.level_gaps.push(gap);
        }
        Ok(())
    }

    /// Pre-order pass turning preliminary coordinates into final positions.
    ///
    /// `m` is the accumulated modifier of all ancestors and `level_start`
    /// the coordinate at which the current level's band begins along the
    /// stacking axis.
    fn second_walk(&mut self, v: T::Node, m: f32, level: usize, level_start: f32) {
        let level_size = self.level_thickness[level];

        let x = self.prelim_of(v) + m;
        let y = match self.config.alignment() {
            Alignment::Center => level_start + self.sign * (level_size / 2.0),
            Alignment::TowardsRoot => level_start + self.sign * (self.thickness_of(v) / 2.0),
            Alignment::AwayFromRoot => {
                level_start + self.sign * (level_size - self.thickness_of(v) / 2.0)
            }
        };
        // The prelim axis is the x-axis only while levels stack vertically.
        let (x, y) = if self.vertical { (x, y) } else { (y, x) };

        let slot = self.slot(v);
        self.position[slot] = Point::new(x, y);
        let size = Size::new(self.extents.width(v), self.extents.height(v));
        self.bounds.include_centered(Point::new(x, y), size);

        if !self.tree.is_leaf(v) {
            let next_level_start =
                level_start + (level_size + self.level_gaps[level + 1]) * self.sign;
            let modifier = self.modifier_of(v);
            let tree = self.tree;
            for w in tree.children(v) {
                self.second_walk(w, m + modifier, level + 1, next_level_start);
            }
        }
    }

    /// Builds the node rectangles, translated so the minimal corner over all
    /// of them lands at the origin.
    fn normalized_node_bounds(&self) -> IndexMap<T::Node, Rect> {
        let mut node_bounds = IndexMap::with_capacity(self.slots.len());
        for (&node, &slot) in &self.slots {
            let center = self.position[slot];
            let size = Size::new(self.extents.width(node), self.extents.height(node));
            let rect = center
                .to_rect(size)
                .translate(-self.bounds.min_x(), -self.bounds.min_y());
            node_bounds.insert(node, rect);
        }
        node_bounds
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use arbor_core::geometry::Size;

    use super::*;
    use crate::{
        config::{DefaultConfiguration, RootEdge},
        extent::FixedExtent,
        tree::{DefaultTree, NodeId},
    };

    fn uniform_layout(
        tree: DefaultTree<&'static str>,
        config: DefaultConfiguration,
    ) -> TreeLayout<DefaultTree<&'static str>, FixedExtent, DefaultConfiguration> {
        TreeLayout::new(tree, FixedExtent::new(Size::new(40.0, 20.0)), config)
            .expect("valid tree")
    }

    fn rect_of<T, E, C>(layout: &TreeLayout<T, E, C>, node: T::Node) -> Rect
    where
        T: TreeSource,
        E: ExtentProvider<T::Node>,
        C: LayoutConfig<T::Node>,
    {
        *layout.node_bounds().get(&node).expect("node was laid out")
    }

    #[test]
    fn test_single_node() {
        let tree = DefaultTree::new("root");
        let root = tree.root_id();
        let layout = uniform_layout(tree, DefaultConfiguration::new(10.0, 10.0));

        assert_eq!(layout.node_bounds().len(), 1);
        assert_eq!(layout.level_count(), 1);
        assert_approx_eq!(f32, layout.level_thickness(0), 20.0);

        let rect = rect_of(&layout, root);
        assert_approx_eq!(f32, rect.x(), 0.0);
        assert_approx_eq!(f32, rect.y(), 0.0);
        assert_approx_eq!(f32, rect.width(), 40.0);
        assert_approx_eq!(f32, rect.height(), 20.0);

        let bounds = layout.bounds();
        assert_approx_eq!(f32, bounds.width(), 40.0);
        assert_approx_eq!(f32, bounds.height(), 20.0);
    }

    #[test]
    fn test_two_leaves_under_root() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");
        let layout = uniform_layout(tree, DefaultConfiguration::new(10.0, 10.0));

        let rect_a = rect_of(&layout, a);
        let rect_b = rect_of(&layout, b);
        let rect_root = rect_of(&layout, root);

        // Siblings sit in the second level band, size + gap apart.
        assert_approx_eq!(f32, rect_a.x(), 0.0);
        assert_approx_eq!(f32, rect_a.y(), 30.0);
        assert_approx_eq!(f32, rect_b.x(), 50.0);
        assert_approx_eq!(f32, rect_b.y(), 30.0);

        // The root is centered over its children.
        assert_approx_eq!(f32, rect_root.x(), 25.0);
        assert_approx_eq!(f32, rect_root.y(), 0.0);

        let bounds = layout.bounds();
        assert_approx_eq!(f32, bounds.width(), 90.0);
        assert_approx_eq!(f32, bounds.height(), 50.0);
    }

    #[test]
    fn test_star_tree_even_spacing() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let kids: Vec<NodeId> = (0..4).map(|_| tree.add_child(root, "kid")).collect();
        let layout = uniform_layout(tree, DefaultConfiguration::new(10.0, 10.0));

        // All children share the band that starts below the root thickness
        // plus the level gap, and their centers are exactly size + gap apart.
        for window in kids.windows(2) {
            let left = rect_of(&layout, window[0]);
            let right = rect_of(&layout, window[1]);
            assert_approx_eq!(
                f32,
                right.center().x() - left.center().x(),
                50.0,
                epsilon = 1e-4
            );
        }
        for &kid in &kids {
            assert_approx_eq!(f32, rect_of(&layout, kid).y(), 30.0, epsilon = 1e-4);
        }

        let root_rect = rect_of(&layout, root);
        let first = rect_of(&layout, kids[0]);
        let last = rect_of(&layout, kids[3]);
        assert_approx_eq!(
            f32,
            root_rect.center().x(),
            (first.center().x() + last.center().x()) / 2.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_chain_tree_levels() {
        let mut tree = DefaultTree::new("root");
        let mut parent = tree.root_id();
        let mut chain = vec![parent];
        for _ in 0..3 {
            parent = tree.add_child(parent, "link");
            chain.push(parent);
        }
        let layout = uniform_layout(tree, DefaultConfiguration::new(10.0, 10.0));

        assert_eq!(layout.level_count(), 4);
        for (level, &node) in chain.iter().enumerate() {
            let rect = rect_of(&layout, node);
            assert_approx_eq!(f32, rect.x(), 0.0, epsilon = 1e-4);
            assert_approx_eq!(f32, rect.y(), level as f32 * 30.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_subtree_boundary_spacing() {
        // Two subtrees of two leaves each; the apportion step must keep the
        // leaves evenly spaced across the subtree boundary.
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let left = tree.add_child(root, "left");
        let right = tree.add_child(root, "right");
        let leaves = [
            tree.add_child(left, "l1"),
            tree.add_child(left, "l2"),
            tree.add_child(right, "r1"),
            tree.add_child(right, "r2"),
        ];

        let layout = TreeLayout::new(
            tree,
            FixedExtent::new(Size::new(20.0, 20.0)),
            DefaultConfiguration::new(5.0, 5.0),
        )
        .expect("valid tree");

        let centers: Vec<f32> = leaves
            .iter()
            .map(|&leaf| rect_of(&layout, leaf).center().x())
            .collect();
        for pair in centers.windows(2) {
            assert_approx_eq!(f32, pair[1] - pair[0], 25.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_threads_bridge_unequal_depths() {
        // A deep subtree, a single leaf, and another deep subtree: the
        // contour of the middle leaf is continued through a thread.
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let a = tree.add_child(root, "a");
        let a1 = tree.add_child(a, "a1");
        tree.add_child(a1, "a2");
        tree.add_child(root, "b");
        let c = tree.add_child(root, "c");
        let c1 = tree.add_child(c, "c1");
        tree.add_child(c1, "c2");

        let layout = TreeLayout::new(
            tree,
            FixedExtent::new(Size::new(20.0, 20.0)),
            DefaultConfiguration::new(5.0, 5.0),
        )
        .expect("valid tree");

        let rects: Vec<Rect> = layout.node_bounds().values().copied().collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                if let Some(overlap) = a.intersection(*b) {
                    assert!(
                        overlap.width() * overlap.height() < 1e-3,
                        "rectangles overlap: {a:?} vs {b:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_normalization_touches_origin() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let a = tree.add_child(root, "a");
        tree.add_child(a, "a1");
        tree.add_child(a, "a2");
        tree.add_child(root, "b");
        let layout = uniform_layout(tree, DefaultConfiguration::new(10.0, 10.0));

        let rects: Vec<Rect> = layout.node_bounds().values().copied().collect();
        let min_x = rects.iter().map(|r| r.x()).fold(f32::INFINITY, f32::min);
        let min_y = rects.iter().map(|r| r.y()).fold(f32::INFINITY, f32::min);

        assert!(rects.iter().all(|r| r.x() >= -1e-4 && r.y() >= -1e-4));
        assert_approx_eq!(f32, min_x, 0.0, epsilon = 1e-4);
        assert_approx_eq!(f32, min_y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_left_orientation_swaps_axes() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");

        let layout = uniform_layout(
            tree,
            DefaultConfiguration::new(10.0, 10.0).with_root_edge(RootEdge::Left),
        );

        // Depth now runs along the x-axis: the root sits at x = 0 and the
        // children share a band to its right. Width is the thickness here.
        let rect_root = rect_of(&layout, root);
        let rect_a = rect_of(&layout, a);
        let rect_b = rect_of(&layout, b);

        assert_approx_eq!(f32, rect_root.x(), 0.0);
        assert_approx_eq!(f32, rect_a.x(), 50.0); // 40 thickness + 10 gap
        assert_approx_eq!(f32, rect_b.x(), 50.0);
        assert_approx_eq!(f32, rect_a.y(), 0.0);
        assert_approx_eq!(f32, rect_b.y(), 30.0); // 20 size + 10 gap
    }

    #[test]
    fn test_top_bottom_mirror() {
        fn build() -> (DefaultTree<&'static str>, Vec<NodeId>) {
            let mut tree = DefaultTree::new("root");
            let root = tree.root_id();
            let a = tree.add_child(root, "a");
            let a1 = tree.add_child(a, "a1");
            let a2 = tree.add_child(a, "a2");
            let b = tree.add_child(root, "b");
            (tree, vec![root, a, a1, a2, b])
        }

        let (tree_top, nodes) = build();
        let (tree_bottom, _) = build();
        let top = uniform_layout(tree_top, DefaultConfiguration::new(10.0, 10.0));
        let bottom = uniform_layout(
            tree_bottom,
            DefaultConfiguration::new(10.0, 10.0).with_root_edge(RootEdge::Bottom),
        );

        let height = top.bounds().height();
        assert_approx_eq!(f32, height, bottom.bounds().height(), epsilon = 1e-4);

        for &node in &nodes {
            let rect_top = rect_of(&top, node);
            let rect_bottom = rect_of(&bottom, node);
            assert_approx_eq!(f32, rect_top.x(), rect_bottom.x(), epsilon = 1e-4);
            assert_approx_eq!(f32, rect_top.width(), rect_bottom.width());
            assert_approx_eq!(f32, rect_top.height(), rect_bottom.height());
            assert_approx_eq!(
                f32,
                rect_top.y(),
                height - rect_bottom.y() - rect_bottom.height(),
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_alignment_moves_only_depth_axis() {
        fn build() -> (DefaultTree<Size>, NodeId, NodeId) {
            let mut tree = DefaultTree::new(Size::new(20.0, 20.0));
            let root = tree.root_id();
            let thin = tree.add_child(root, Size::new(20.0, 10.0));
            let thick = tree.add_child(root, Size::new(20.0, 30.0));
            (tree, thin, thick)
        }

        let mut layouts = Vec::new();
        for alignment in [
            Alignment::Center,
            Alignment::TowardsRoot,
            Alignment::AwayFromRoot,
        ] {
            let (tree, thin, thick) = build();
            let config = DefaultConfiguration::new(10.0, 10.0).with_alignment(alignment);
            let layout = TreeLayout::new(&tree, &tree, config).expect("valid tree");
            let rect_thin = rect_of(&layout, thin);
            let rect_thick = rect_of(&layout, thick);
            layouts.push((rect_thin, rect_thick));
        }

        let &[(center_thin, center_thick), (towards_thin, towards_thick), (away_thin, away_thick)] =
            &layouts[..]
        else {
            unreachable!()
        };

        // The sibling-axis coordinate never moves.
        for rect in [towards_thin, away_thin] {
            assert_approx_eq!(f32, rect.x(), center_thin.x(), epsilon = 1e-4);
        }
        for rect in [towards_thick, away_thick] {
            assert_approx_eq!(f32, rect.x(), center_thick.x(), epsilon = 1e-4);
        }

        // Level 1 band is [30, 60]: thickness 30 below the root's 20 + gap 10.
        assert_approx_eq!(f32, center_thin.y(), 40.0, epsilon = 1e-4);
        assert_approx_eq!(f32, center_thick.y(), 30.0, epsilon = 1e-4);

        assert_approx_eq!(f32, towards_thin.y(), 30.0, epsilon = 1e-4);
        assert_approx_eq!(f32, towards_thick.y(), 30.0, epsilon = 1e-4);

        assert_approx_eq!(f32, away_thin.y() + away_thin.height(), 60.0, epsilon = 1e-4);
        assert_approx_eq!(
            f32,
            away_thick.y() + away_thick.height(),
            60.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_level_thickness_accessors() {
        let mut tree = DefaultTree::new(Size::new(20.0, 20.0));
        let root = tree.root_id();
        tree.add_child(root, Size::new(20.0, 10.0));
        tree.add_child(root, Size::new(20.0, 30.0));

        let layout =
            TreeLayout::new(&tree, &tree, DefaultConfiguration::new(10.0, 10.0))
                .expect("valid tree");

        assert_eq!(layout.level_count(), 2);
        assert_approx_eq!(f32, layout.level_thickness(0), 20.0);
        assert_approx_eq!(f32, layout.level_thickness(1), 30.0);
    }

    #[test]
    fn test_duplicate_node_fails() {
        struct SharedLeaf;

        impl TreeSource for SharedLeaf {
            type Node = u32;

            fn root(&self) -> u32 {
                0
            }

            fn is_leaf(&self, node: u32) -> bool {
                node == 3
            }

            fn is_child_of(&self, node: u32, parent: u32) -> bool {
                matches!((parent, node), (0, 1) | (0, 2) | (1, 3) | (2, 3))
            }

            fn children(&self, parent: u32) -> impl DoubleEndedIterator<Item = u32> {
                let kids: &[u32] = match parent {
                    0 => &[1, 2],
                    1 | 2 => &[3],
                    _ => &[],
                };
                kids.iter().copied()
            }
        }

        let result = TreeLayout::new(
            SharedLeaf,
            FixedExtent::new(Size::new(10.0, 10.0)),
            DefaultConfiguration::default(),
        );
        assert!(matches!(result, Err(LayoutError::Structure(_))));
    }

    #[test]
    fn test_negative_extent_fails() {
        struct BadExtent;

        impl ExtentProvider<NodeId> for BadExtent {
            fn width(&self, _node: NodeId) -> f32 {
                -1.0
            }

            fn height(&self, _node: NodeId) -> f32 {
                10.0
            }
        }

        let tree = DefaultTree::new("root");
        let result = TreeLayout::new(tree, BadExtent, DefaultConfiguration::default());
        assert!(matches!(result, Err(LayoutError::Contract(_))));
    }

    #[test]
    fn test_inconsistent_is_leaf_fails() {
        struct Lying;

        impl TreeSource for Lying {
            type Node = u32;

            fn root(&self) -> u32 {
                0
            }

            // Claims the root is a leaf while also reporting children.
            fn is_leaf(&self, _node: u32) -> bool {
                true
            }

            fn is_child_of(&self, node: u32, parent: u32) -> bool {
                parent == 0 && node == 1
            }

            fn children(&self, parent: u32) -> impl DoubleEndedIterator<Item = u32> {
                let kids: &[u32] = if parent == 0 { &[1] } else { &[] };
                kids.iter().copied()
            }
        }

        let result = TreeLayout::new(
            Lying,
            FixedExtent::new(Size::new(10.0, 10.0)),
            DefaultConfiguration::default(),
        );
        assert!(matches!(result, Err(LayoutError::Contract(_))));
    }

    #[test]
    fn test_negative_node_gap_fails() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        tree.add_child(root, "a");
        tree.add_child(root, "b");

        let result = TreeLayout::new(
            tree,
            FixedExtent::new(Size::new(10.0, 10.0)),
            DefaultConfiguration::new(10.0, -1.0),
        );
        assert!(matches!(result, Err(LayoutError::Config(_))));
    }

    #[test]
    fn test_negative_level_gap_fails() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        tree.add_child(root, "a");

        let result = TreeLayout::new(
            tree,
            FixedExtent::new(Size::new(10.0, 10.0)),
            DefaultConfiguration::new(-1.0, 10.0),
        );
        assert!(matches!(result, Err(LayoutError::Config(_))));
    }

    #[test]
    fn test_dump() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        let a = tree.add_child(root, "a");
        tree.add_child(a, "a1");
        tree.add_child(root, "b");
        let layout = uniform_layout(tree, DefaultConfiguration::default());

        let mut out = String::new();
        layout
            .dump(&mut out, &DumpConfig::new("  ", true))
            .expect("writing to a String cannot fail");

        let expected = "\
NodeId(0) (size: 40x20)
  NodeId(1) (size: 40x20)
    NodeId(2) (size: 40x20)
  NodeId(3) (size: 40x20)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_layout_by_reference_inputs() {
        let mut tree = DefaultTree::new("root");
        let root = tree.root_id();
        tree.add_child(root, "a");

        let extents = FixedExtent::new(Size::new(40.0, 20.0));
        let config = DefaultConfiguration::default();
        let layout = TreeLayout::new(&tree, &extents, &config).expect("valid tree");

        assert_eq!(layout.node_bounds().len(), 2);
        assert_eq!(layout.tree().len(), 2);
    }
}
