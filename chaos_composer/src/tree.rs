// The event tree: hierarchical structure discovered in a flat sample run.
//
// Construction scans each level left to right, tracking whether the values
// are rising or falling. Every time a falling run turns back upward, the
// elements scanned so far close into a group, and the group is promoted to
// a new node one level up whose value duplicates the group's dominant
// element (the rightmost maximum). The promoted nodes form the next level's
// input, so the tree grows until an entire level is one monotonic run.
//
// Nodes live in an arena indexed by EventId; parent links are explicit ids
// rather than back-pointers. Sibling order is never touched, so a leaf
// traversal reproduces the original sample order exactly.
//
// Construction is fully deterministic — all randomness in the system lives
// in the later melody/rhythm passes.

use crate::compose::ComposeError;
use crate::scale::{NoteLength, Pitch, ScaleMask};
use serde::{Deserialize, Serialize};

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub usize);

/// Direction of motion between consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Increasing,
    Decreasing,
}

impl Motion {
    /// Classify the step from `previous` to `current`. Equal values carry
    /// the prior motion forward (which is None at the start of a scan).
    pub fn classify(current: f64, previous: f64, carried: Option<Motion>) -> Option<Motion> {
        if current > previous {
            Some(Motion::Increasing)
        } else if current < previous {
            Some(Motion::Decreasing)
        } else {
            carried
        }
    }
}

/// One node of the event tree.
///
/// Leaves hold the raw samples; internal nodes duplicate their dominant
/// child's value one depth level up. `scale`, `pitch`, and `duration` start
/// unset and are filled by the later passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub value: f64,
    /// Construction level this node was created at (0 = original samples).
    pub depth: u32,
    /// True iff this node was chosen as the dominant element of its
    /// sibling group during promotion.
    pub is_dominant: bool,
    pub parent: Option<EventId>,
    /// The full sibling group, in original left-to-right order. Empty for
    /// leaves. The dominant child sits in place among its siblings.
    pub children: Vec<EventId>,
    pub scale: Option<ScaleMask>,
    pub pitch: Option<Pitch>,
    pub duration: Option<NoteLength>,
}

impl Event {
    fn leaf(value: f64) -> Event {
        Event {
            value,
            depth: 0,
            is_dominant: false,
            parent: None,
            children: Vec::new(),
            scale: None,
            pitch: None,
            duration: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-allocated event tree with a single root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTree {
    nodes: Vec<Event>,
    root: EventId,
}

impl EventTree {
    /// Build the tree from a sample run.
    ///
    /// A single sample yields a childless root; otherwise levels of groups
    /// are promoted until a whole level forms one monotonic run and closes
    /// into the root.
    pub fn build(samples: &[f64]) -> Result<EventTree, ComposeError> {
        if samples.is_empty() {
            return Err(ComposeError::EmptyInput);
        }

        let mut tree = EventTree {
            nodes: Vec::with_capacity(samples.len() * 2),
            root: EventId(0),
        };
        let mut level: Vec<EventId> = samples
            .iter()
            .map(|&v| tree.push(Event::leaf(v)))
            .collect();

        if level.len() == 1 {
            tree.root = level[0];
            return Ok(tree);
        }

        loop {
            let cuts = cut_points(&tree, &level);
            if cuts.is_empty() {
                // Base case: the whole level is one run.
                tree.root = tree.promote(level);
                return Ok(tree);
            }
            let mut next = Vec::with_capacity(cuts.len() + 1);
            let mut start = 0;
            for cut in cuts {
                next.push(tree.promote(level[start..cut].to_vec()));
                start = cut;
            }
            // The trailing group is never empty: a cut starts a new group
            // at the element it was detected on.
            next.push(tree.promote(level[start..].to_vec()));
            level = next;
        }
    }

    fn push(&mut self, event: Event) -> EventId {
        let id = EventId(self.nodes.len());
        self.nodes.push(event);
        id
    }

    /// Promote a sibling group to a new internal node one level up.
    ///
    /// The rightmost maximum-valued member is flagged dominant; the new
    /// node copies its value and sits one depth level above it.
    fn promote(&mut self, group: Vec<EventId>) -> EventId {
        assert!(!group.is_empty(), "cannot promote an empty group");
        let mut dominant = group[0];
        for &id in &group[1..] {
            if self.node(id).value >= self.node(dominant).value {
                dominant = id;
            }
        }
        self.nodes[dominant.0].is_dominant = true;

        let value = self.node(dominant).value;
        let depth = self.node(dominant).depth + 1;
        let parent = self.push(Event {
            value,
            depth,
            is_dominant: false,
            parent: None,
            children: group.clone(),
            scale: None,
            pitch: None,
            duration: None,
        });
        for &child in &group {
            self.nodes[child.0].parent = Some(parent);
        }
        parent
    }

    pub fn root(&self) -> EventId {
        self.root
    }

    pub fn node(&self, id: EventId) -> &Event {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: EventId) -> &mut Event {
        &mut self.nodes[id.0]
    }

    /// The tree-wide complexity level: the root's construction depth.
    ///
    /// Every node reports the same value — this is deliberately a global
    /// constant, not a per-node depth. It drives both scale sparsification
    /// and rhythm jump sizes.
    pub fn global_level(&self) -> u32 {
        self.node(self.root).depth
    }

    /// Index of the dominant child within an internal node's children.
    pub fn dominant_index(&self, id: EventId) -> Option<usize> {
        self.node(id)
            .children
            .iter()
            .position(|&c| self.node(c).is_dominant)
    }

    /// Depth-first leaf traversal, descending into children before
    /// reporting. Yields the leaves in original input order.
    pub fn leaf_order(&self) -> Vec<EventId> {
        let mut leaves = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        leaves
    }

    /// The leaf values in traversal order.
    pub fn leaf_values(&self) -> Vec<f64> {
        self.leaf_order()
            .into_iter()
            .map(|id| self.node(id).value)
            .collect()
    }

    /// Assign a scale mask to a node, broadcasting it up the dominant
    /// spine: each ancestor is written in turn for as long as the node
    /// below it was flagged dominant. The first non-dominant node written
    /// terminates the walk; a non-dominant node's assignment is local.
    pub fn set_scale(&mut self, id: EventId, mask: ScaleMask) {
        let mut current = id;
        loop {
            self.nodes[current.0].scale = Some(mask);
            let node = &self.nodes[current.0];
            match node.parent {
                Some(parent) if node.is_dominant => current = parent,
                _ => return,
            }
        }
    }
}

/// Find the cut points of one level: indices where a decreasing run turns
/// increasing. Each cut index starts a new group.
fn cut_points(tree: &EventTree, level: &[EventId]) -> Vec<usize> {
    let mut cuts = Vec::new();
    let mut previous_motion: Option<Motion> = None;
    for i in 1..level.len() {
        let motion = Motion::classify(
            tree.node(level[i]).value,
            tree.node(level[i - 1]).value,
            previous_motion,
        );
        if previous_motion == Some(Motion::Decreasing) && motion == Some(Motion::Increasing) {
            cuts.push(i);
        }
        previous_motion = motion;
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            EventTree::build(&[]),
            Err(ComposeError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_sample_is_childless_root() {
        let tree = EventTree::build(&[3.5]).unwrap();
        let root = tree.node(tree.root());
        assert!(root.is_leaf());
        assert_eq!(root.depth, 0);
        assert!(!root.is_dominant);
        assert_eq!(tree.global_level(), 0);
        assert_eq!(tree.leaf_values(), vec![3.5]);
    }

    #[test]
    fn test_worked_example() {
        // Motions: -, inc, dec, inc, dec. The decreasing→increasing
        // transition at the 5 cuts [1,3,2] | [5,4]; a second level over
        // the two promoted nodes (values 3, 5) is monotonic, so it closes
        // into the root.
        let tree = EventTree::build(&[1.0, 3.0, 2.0, 5.0, 4.0]).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.depth, 2);
        assert_eq!(tree.global_level(), 2);

        let first = tree.node(root.children[0]);
        let second = tree.node(root.children[1]);
        assert_eq!(first.value, 3.0);
        assert_eq!(second.value, 5.0);
        assert_eq!(first.children.len(), 3);
        assert_eq!(second.children.len(), 2);

        // Dominant leaves: the 3 in the first group, the 5 in the second.
        assert_eq!(tree.dominant_index(root.children[0]), Some(1));
        assert_eq!(tree.dominant_index(root.children[1]), Some(0));

        // Root value duplicates its dominant child (the 5-node).
        assert_eq!(root.value, 5.0);
        assert_eq!(tree.dominant_index(tree.root()), Some(1));

        assert_eq!(tree.leaf_values(), vec![1.0, 3.0, 2.0, 5.0, 4.0]);
    }

    #[test]
    fn test_monotonic_run_collapses_in_one_level() {
        let tree = EventTree::build(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.depth, 1);
        assert_eq!(root.children.len(), 5);
        // Dominant is the maximum, at the right end.
        assert_eq!(tree.dominant_index(tree.root()), Some(4));
    }

    #[test]
    fn test_all_equal_degrades_to_base_case() {
        let tree = EventTree::build(&[2.0, 2.0, 2.0, 2.0]).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.depth, 1);
        assert_eq!(root.children.len(), 4);
        // Rightmost of the tied maxima wins.
        assert_eq!(tree.dominant_index(tree.root()), Some(3));
    }

    #[test]
    fn test_rightmost_maximum_tie_break() {
        // Every group's dominant is its rightmost maximum: nothing to the
        // right of a dominant child may reach the group maximum.
        let tree = EventTree::build(&[5.0, 1.0, 5.0, 1.0, 0.5]).unwrap();
        for id in (0..tree.nodes.len()).map(EventId) {
            let node = tree.node(id);
            if node.is_leaf() {
                continue;
            }
            let dominant = tree.dominant_index(id).expect("dominant child");
            let max = node
                .children
                .iter()
                .map(|&c| tree.node(c).value)
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(tree.node(node.children[dominant]).value, max);
            // Nothing to the right of the dominant matches the max.
            for &c in &node.children[dominant + 1..] {
                assert!(tree.node(c).value < max);
            }
        }
    }

    #[test]
    fn order_preserved_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 1..=120 {
            let samples: Vec<f64> = (0..n).map(|_| rng.random_range(-50.0..50.0)).collect();
            let tree = EventTree::build(&samples).unwrap();
            assert_eq!(tree.leaf_values(), samples, "n = {n}");
        }
    }

    #[test]
    fn exactly_one_dominant_per_group() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples: Vec<f64> = (0..200).map(|_| rng.random_range(0.0..100.0)).collect();
        let tree = EventTree::build(&samples).unwrap();
        for id in (0..tree.nodes.len()).map(EventId) {
            let node = tree.node(id);
            if node.is_leaf() {
                continue;
            }
            let dominant_count = node
                .children
                .iter()
                .filter(|&&c| tree.node(c).is_dominant)
                .count();
            assert_eq!(dominant_count, 1);
        }
    }

    #[test]
    fn parent_links_cover_all_non_root_nodes() {
        let tree = EventTree::build(&[1.0, 3.0, 2.0, 5.0, 4.0, 1.0, 6.0]).unwrap();
        for id in (0..tree.nodes.len()).map(EventId) {
            let node = tree.node(id);
            if id == tree.root() {
                assert!(node.parent.is_none());
            } else {
                let parent = node.parent.expect("non-root node must have a parent");
                assert!(tree.node(parent).children.contains(&id));
            }
        }
    }

    #[test]
    fn height_is_bounded_and_levels_shrink() {
        let mut rng = StdRng::seed_from_u64(11);
        let samples: Vec<f64> = (0..500).map(|_| rng.random_range(0.0..1.0)).collect();
        let tree = EventTree::build(&samples).unwrap();
        // Count nodes per depth: each level must be no larger than the one
        // below it.
        let mut per_depth = vec![0usize; tree.global_level() as usize + 1];
        for node in &tree.nodes {
            per_depth[node.depth as usize] += 1;
        }
        assert!(per_depth.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(per_depth[tree.global_level() as usize], 1);
    }

    #[test]
    fn scale_broadcast_follows_dominant_spine() {
        let tree_samples = [1.0, 3.0, 2.0, 5.0, 4.0];
        let mut tree = EventTree::build(&tree_samples).unwrap();
        let leaves = tree.leaf_order();
        let mask = ScaleMask::major();

        // Leaf 3 (the 5.0) is dominant; its parent group-node is the
        // root's dominant child, so the mask must reach the root.
        tree.set_scale(leaves[3], mask);
        assert_eq!(tree.node(leaves[3]).scale, Some(mask));
        let group = tree.node(leaves[3]).parent.unwrap();
        assert_eq!(tree.node(group).scale, Some(mask));
        assert_eq!(tree.node(tree.root()).scale, Some(mask));

        // Leaf 0 (the 1.0) is not dominant: assignment stays local.
        let other = ScaleMask::chromatic();
        tree.set_scale(leaves[0], other);
        assert_eq!(tree.node(leaves[0]).scale, Some(other));
        let group0 = tree.node(leaves[0]).parent.unwrap();
        assert_eq!(tree.node(group0).scale, None);
    }

    #[test]
    fn scale_broadcast_stops_after_first_non_dominant_ancestor() {
        // [1,3,2,5,4]: leaf 1 (the 3.0) is dominant in the first group,
        // but its group node (value 3) is not the root's dominant child.
        // The group node receives the mask; the root does not.
        let mut tree = EventTree::build(&[1.0, 3.0, 2.0, 5.0, 4.0]).unwrap();
        let leaves = tree.leaf_order();
        let mask = ScaleMask::major();
        tree.set_scale(leaves[1], mask);
        let group = tree.node(leaves[1]).parent.unwrap();
        assert_eq!(tree.node(group).scale, Some(mask));
        assert_eq!(tree.node(tree.root()).scale, None);
    }
}
