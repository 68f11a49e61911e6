// Duration assignment: a bounded random walk over the duration vocabulary.
//
// One left-to-right pass over the linearized leaves. Dominant leaves steer:
// rising motion jumps the walk toward longer durations, falling motion
// toward shorter ones, with jump sizes scaled by the tree's global level.
// Each dominant leaf also re-rolls whether the walk holds steady and which
// way it drifts until the next dominant leaf. Non-dominant leaves just take
// the current duration and drift one step, reflecting at the vocabulary
// boundaries.
//
// The walk index provably never leaves [0, category count): jumps clamp or
// reseed, and the drift step reverses direction instead of stepping out.

use crate::scale::NoteLength;
use crate::tree::{EventTree, Motion};
use rand::Rng;

/// Assign a duration category to every leaf.
pub fn assign_rhythm(tree: &mut EventTree, rng: &mut impl Rng) {
    let leaves = tree.leaf_order();
    let level = tree.global_level() as usize;
    let count = NoteLength::ALL.len();

    let mut index = rng.random_range(0..count) / 2;
    let mut direction: isize = 1;
    let mut constant = false;
    let mut previous_motion: Option<Motion> = None;
    let mut previous_value = tree.node(leaves[0]).value;

    for &leaf in &leaves {
        if tree.node(leaf).is_dominant {
            let value = tree.node(leaf).value;
            let motion = Motion::classify(value, previous_value, previous_motion);
            previous_value = value;
            previous_motion = motion;

            // A dominant leaf implies at least one promotion happened, so
            // the global level is at least 1 and the jump range is valid.
            if motion == Some(Motion::Increasing) {
                index += rng.random_range(1..=level) * 2;
                if index >= count {
                    index = count - 1;
                }
            } else {
                let jump = rng.random_range(1..=level) * 2;
                if index > jump {
                    index -= jump;
                } else if index == jump {
                    // Landing exactly on zero reseeds the walk instead.
                    index = rng.random_range(0..count);
                }
            }

            constant = rng.random_range(0..3) == 0;
            direction = if rng.random_bool(0.5) { -1 } else { 1 };
        }

        tree.node_mut(leaf).duration = Some(NoteLength::ALL[index]);

        if !constant {
            let next = index as isize + direction;
            if (0..count as isize).contains(&next) {
                index = next as usize;
            } else {
                // Reflect at the boundary without moving this step.
                direction = -direction;
            }
        }
    }
}
