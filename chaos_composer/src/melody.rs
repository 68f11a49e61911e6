// Scale assignment and melodic pitch selection over the event tree.
//
// Two passes. First, every leaf receives its own sparsified copy of the
// root scale, derived by `global_level` rounds of random restriction;
// assignments broadcast up the dominant spine, so internal nodes end up
// carrying the scale of their dominant descendants. Second, a depth-first
// recursion picks a reference pitch for each group from its dominant
// child's scale and fans the remaining siblings out from that reference
// along the combined (leaf ∨ group) scale, with offsets that grow with
// distance from the dominant element.
//
// Pitch motion uses walk_scale: offsets step through the admissible pitch
// list at a stride of half the octave count, wrapping modulo the list
// length. The halved stride is the scale-stepping convention that decides
// how far one scale-degree offset travels — do not simplify it.

use crate::scale::{OCTAVES, Pitch, ScaleMask};
use crate::tree::{EventId, EventTree};
use rand::Rng;

/// Assign every leaf a sparsified sub-scale of the root scale.
///
/// Each leaf's mask is derived independently, restricted once per tree
/// level (the global level, a tree-wide constant). Dominant leaves
/// broadcast their mask up the dominant spine.
pub fn assign_scales(tree: &mut EventTree, root_scale: ScaleMask, rng: &mut impl Rng) {
    let level = tree.global_level();
    for leaf in tree.leaf_order() {
        let mask = root_scale.sub_mask(level, rng);
        tree.set_scale(leaf, mask);
    }
}

/// Run the full melody pass: scale assignment, then pitch recursion from
/// the root.
pub fn assign_melody(tree: &mut EventTree, root_scale: ScaleMask, rng: &mut impl Rng) {
    assign_scales(tree, root_scale, rng);
    recurse_melody(tree, tree.root(), rng);
}

/// Depth-first pitch assignment for one internal node and its children.
///
/// A childless node returns immediately — its pitch was fixed by its
/// parent, or stays unset for a single-leaf tree.
fn recurse_melody(tree: &mut EventTree, id: EventId, rng: &mut impl Rng) {
    if tree.node(id).is_leaf() {
        return;
    }

    let children = tree.node(id).children.clone();
    let dominant_index = tree
        .dominant_index(id)
        .expect("internal node must have a dominant child");
    let dominant = children[dominant_index];

    let dominant_scale = tree
        .node(dominant)
        .scale
        .expect("scales are assigned before melody");
    let reference = pick_reference(dominant_scale, rng);
    tree.node_mut(id).pitch = Some(reference);
    tree.node_mut(dominant).pitch = Some(reference);

    let node_scale = tree
        .node(id)
        .scale
        .expect("scales are assigned before melody");

    let before = &children[..dominant_index];
    if !before.is_empty() {
        let delta = rng.random_range(-6i64..=6);
        for (i, &event) in before.iter().enumerate() {
            // Multipliers count backward: the element next to the dominant
            // moves by one delta, the leftmost by |before| deltas.
            let multiplier = (before.len() - i) as i64;
            let combined = combined_scale(tree, event, node_scale);
            tree.node_mut(event).pitch = Some(walk_scale(combined, reference, delta * multiplier));
        }
    }

    let after = &children[dominant_index + 1..];
    if !after.is_empty() {
        let delta = rng.random_range(-6i64..=6);
        for (i, &event) in after.iter().enumerate() {
            let combined = combined_scale(tree, event, node_scale);
            tree.node_mut(event).pitch =
                Some(walk_scale(combined, reference, delta * (i as i64 + 1)));
        }
    }

    for child in children {
        recurse_melody(tree, child, rng);
    }
}

fn combined_scale(tree: &EventTree, event: EventId, node_scale: ScaleMask) -> ScaleMask {
    tree.node(event)
        .scale
        .expect("scales are assigned before melody")
        .or(node_scale)
}

/// Pick a reference pitch uniformly from a scale's admissible pitch set.
fn pick_reference(scale: ScaleMask, rng: &mut impl Rng) -> Pitch {
    let pitches = scale.admissible_pitches();
    pitches[rng.random_range(0..pitches.len())]
}

/// Step `offset` scale degrees away from a reference pitch within a mask's
/// admissible pitch list.
///
/// The admissible list is the mask replicated over every octave; the new
/// index is `reference + offset × (OCTAVES / 2)` (integer division),
/// wrapped with a Euclidean modulo so negative offsets walk downward.
pub fn walk_scale(mask: ScaleMask, reference: Pitch, offset: i64) -> Pitch {
    let pitches = mask.admissible_pitches();
    let start = pitches
        .iter()
        .position(|&p| p == reference)
        .expect("reference pitch must be admissible under the combined scale")
        as i64;
    let stride = (OCTAVES / 2) as i64;
    let index = (start + offset * stride).rem_euclid(pitches.len() as i64);
    pitches[index as usize]
}
