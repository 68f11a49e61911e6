// Chaos Composer
//
// Turns flat numeric sample runs from chaotic equations into melodic
// phrases: ordered (duration, pitch) pairs. The interesting part is the
// middle of the pipeline — a flat sequence has no structure to hang music
// on, so the composer first discovers one: runs of monotonic motion group
// around local peaks, recursively, into an event tree. Pitches then flow
// down the tree through scale-restricted recursion, and durations come
// from a bounded random walk steered by the same peak structure.
//
// Architecture:
// - scale.rs: pitch space (12 steps × 4 octaves), duration vocabulary,
//   scale masks with random sparsification
// - tree.rs: event tree construction (arena nodes, dominant elements,
//   scale broadcast along the dominant spine)
// - melody.rs: scale assignment + recursive reference-pitch melody
// - rhythm.rs: duration random walk keyed off dominant leaves
// - compose.rs: the pipeline boundary (compose/control, Phrase, errors)
// - midi.rs: Standard MIDI File output
// - note_list.rs: plain-text note list output
// - stats.rs: control-vs-event-tree run statistics
//
// Randomness is always injected (`rng: &mut impl Rng`), so every pass is
// independently seedable and the whole pipeline is deterministic given a
// seed. The sample sources live in the `chaos_generators` crate.

pub mod compose;
pub mod melody;
pub mod midi;
pub mod note_list;
pub mod rhythm;
pub mod scale;
pub mod stats;
pub mod tree;
