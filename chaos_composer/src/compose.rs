// The composition pipeline: samples in, phrase out.
//
// compose() chains the stages — event tree construction, scale + melody
// assignment, rhythm assignment — then linearizes the leaves and zips
// durations with pitches. Either a complete phrase comes back or an error;
// no partial results.
//
// control() is the comparison path: the same output shape produced by
// direct modular mapping of an integer sequence, with no tree structure at
// all. Experiment batches pair the two to measure what the event tree
// contributes.

use crate::melody::assign_melody;
use crate::rhythm::assign_rhythm;
use crate::scale::{MASTER_SCALE, NoteLength, Pitch, ScaleMask};
use crate::tree::EventTree;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the composition boundary.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The input sample sequence was empty; no tree can be built.
    #[error("input sample sequence is empty")]
    EmptyInput,
    /// The root scale mask was malformed.
    #[error("invalid root scale: {0}")]
    InvalidScale(String),
}

/// The final product: an ordered list of (duration, pitch) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub notes: Vec<(NoteLength, Pitch)>,
}

impl Phrase {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Compose a phrase from a chaotic sample run.
///
/// Every sample normally yields one note. The single-sample degenerate
/// tree has no group to pick a reference pitch from, so it yields an
/// empty phrase.
pub fn compose(
    samples: &[f64],
    root_scale: &ScaleMask,
    rng: &mut impl Rng,
) -> Result<Phrase, ComposeError> {
    let mut tree = EventTree::build(samples)?;
    assign_melody(&mut tree, *root_scale, rng);
    assign_rhythm(&mut tree, rng);

    let notes = tree
        .leaf_order()
        .into_iter()
        .filter_map(|id| {
            let event = tree.node(id);
            event.pitch.map(|pitch| {
                let duration = event
                    .duration
                    .expect("rhythm pass covers every leaf");
                (duration, pitch)
            })
        })
        .collect();
    Ok(Phrase { notes })
}

/// The control path: map arbitrary integers straight onto the pitch and
/// duration tables by Euclidean modulo, one note per value.
pub fn control(values: &[i64]) -> Phrase {
    let notes = values
        .iter()
        .map(|&v| {
            let duration = NoteLength::ALL[v.rem_euclid(NoteLength::ALL.len() as i64) as usize];
            let pitch = Pitch(v.rem_euclid(MASTER_SCALE.len() as i64) as usize);
            (duration, pitch)
        })
        .collect();
    Phrase { notes }
}
