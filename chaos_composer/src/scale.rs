// The pitch space and duration vocabulary.
//
// Twelve chromatic step names replicated across four octaves form the master
// scale: the complete ordered list of pitch names the composer can emit. A
// ScaleMask marks which of the twelve degrees are admissible; masks are
// replicated across the octaves the same way when resolving concrete pitches.
//
// Durations are a flat nine-entry vocabulary from sixteenth to whole note —
// no meter, no tempo semantics beyond the MIDI tick values.

use crate::compose::ComposeError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of octaves the master scale spans.
pub const OCTAVES: usize = 4;

/// Number of chromatic degrees per octave.
pub const DEGREES: usize = 12;

/// The full ordered pitch space: 12 chromatic steps × 4 octaves.
/// Index 0 = C1 = MIDI note 24.
pub const MASTER_SCALE: [&str; DEGREES * OCTAVES] = [
    "C1", "C#1", "D1", "Eb1", "E1", "F1", "F#1", "G1", "Ab1", "A1", "Bb1", "B1", //
    "C2", "C#2", "D2", "Eb2", "E2", "F2", "F#2", "G2", "Ab2", "A2", "Bb2", "B2", //
    "C3", "C#3", "D3", "Eb3", "E3", "F3", "F#3", "G3", "Ab3", "A3", "Bb3", "B3", //
    "C4", "C#4", "D4", "Eb4", "E4", "F4", "F#4", "G4", "Ab4", "A4", "Bb4", "B4",
];

/// MIDI note number of master-scale index 0 (C1).
pub const MIDI_BASE: u8 = 24;

/// A pitch, stored as an index into [`MASTER_SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch(pub usize);

impl Pitch {
    pub fn name(self) -> &'static str {
        MASTER_SCALE[self.0]
    }

    pub fn midi(self) -> u8 {
        MIDI_BASE + self.0 as u8
    }

    /// Chromatic degree within the octave (0 = C, 11 = B).
    pub fn degree(self) -> usize {
        self.0 % DEGREES
    }

    /// Look up a pitch by master-scale name.
    pub fn from_name(name: &str) -> Option<Pitch> {
        MASTER_SCALE.iter().position(|&n| n == name).map(Pitch)
    }
}

/// The nine rhythmic duration categories, shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteLength {
    Sixteenth,
    DottedSixteenth,
    Eighth,
    DottedEighth,
    Quarter,
    DottedQuarter,
    Half,
    DottedHalf,
    Whole,
}

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u32 = 480;

impl NoteLength {
    pub const ALL: [NoteLength; 9] = [
        NoteLength::Sixteenth,
        NoteLength::DottedSixteenth,
        NoteLength::Eighth,
        NoteLength::DottedEighth,
        NoteLength::Quarter,
        NoteLength::DottedQuarter,
        NoteLength::Half,
        NoteLength::DottedHalf,
        NoteLength::Whole,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoteLength::Sixteenth => "sixteenth",
            NoteLength::DottedSixteenth => "dotted_sixteenth",
            NoteLength::Eighth => "eighth",
            NoteLength::DottedEighth => "dotted_eighth",
            NoteLength::Quarter => "quarter",
            NoteLength::DottedQuarter => "dotted_quarter",
            NoteLength::Half => "half",
            NoteLength::DottedHalf => "dotted_half",
            NoteLength::Whole => "whole",
        }
    }

    /// Duration in MIDI ticks at 480 ticks per quarter.
    pub fn ticks(self) -> u32 {
        match self {
            NoteLength::Sixteenth => TICKS_PER_QUARTER / 4,
            NoteLength::DottedSixteenth => TICKS_PER_QUARTER * 3 / 8,
            NoteLength::Eighth => TICKS_PER_QUARTER / 2,
            NoteLength::DottedEighth => TICKS_PER_QUARTER * 3 / 4,
            NoteLength::Quarter => TICKS_PER_QUARTER,
            NoteLength::DottedQuarter => TICKS_PER_QUARTER * 3 / 2,
            NoteLength::Half => TICKS_PER_QUARTER * 2,
            NoteLength::DottedHalf => TICKS_PER_QUARTER * 3,
            NoteLength::Whole => TICKS_PER_QUARTER * 4,
        }
    }
}

/// Admissibility mask over the twelve chromatic degrees.
///
/// Degree 0 (the scale root) is always admissible — every constructor
/// maintains this, so a mask can never produce an empty pitch set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleMask {
    degrees: [bool; DEGREES],
}

impl ScaleMask {
    /// Build a mask from 0/1 bits. Fails if the length is not twelve or
    /// the first degree is not admissible.
    pub fn from_bits(bits: &[u8]) -> Result<ScaleMask, ComposeError> {
        if bits.len() != DEGREES {
            return Err(ComposeError::InvalidScale(format!(
                "expected {} degrees, got {}",
                DEGREES,
                bits.len()
            )));
        }
        if bits[0] == 0 {
            return Err(ComposeError::InvalidScale(
                "first scale degree must be admissible".to_string(),
            ));
        }
        let mut degrees = [false; DEGREES];
        for (d, &bit) in degrees.iter_mut().zip(bits) {
            *d = bit != 0;
        }
        Ok(ScaleMask { degrees })
    }

    /// All twelve degrees admissible.
    pub fn chromatic() -> ScaleMask {
        ScaleMask {
            degrees: [true; DEGREES],
        }
    }

    /// The major scale: 1 0 1 0 1 1 0 1 0 1 0 1.
    pub fn major() -> ScaleMask {
        let mut degrees = [false; DEGREES];
        for d in [0, 2, 4, 5, 7, 9, 11] {
            degrees[d] = true;
        }
        ScaleMask { degrees }
    }

    pub fn admits(self, degree: usize) -> bool {
        self.degrees[degree % DEGREES]
    }

    /// Elementwise OR: a degree is admissible if either mask admits it.
    pub fn or(self, other: ScaleMask) -> ScaleMask {
        let mut degrees = [false; DEGREES];
        for (i, d) in degrees.iter_mut().enumerate() {
            *d = self.degrees[i] || other.degrees[i];
        }
        ScaleMask { degrees }
    }

    /// Apply `levels` rounds of random sparsification.
    ///
    /// Each round keeps degree 0 admissible and independently retains every
    /// other admissible degree iff either of two coin flips lands true
    /// (probability 3/4). A cleared degree stays cleared, so deeper trees
    /// get progressively sparser leaf scales.
    pub fn sub_mask(self, levels: u32, rng: &mut impl Rng) -> ScaleMask {
        if levels == 0 {
            return self;
        }
        let mut degrees = self.degrees;
        for d in degrees.iter_mut().skip(1) {
            if *d {
                *d = rng.random_bool(0.5) || rng.random_bool(0.5);
            }
        }
        degrees[0] = true;
        ScaleMask { degrees }.sub_mask(levels - 1, rng)
    }

    /// The admissible pitch names, mask replicated across every octave of
    /// the master scale, in pitch-space order.
    pub fn admissible_pitches(self) -> Vec<Pitch> {
        (0..MASTER_SCALE.len())
            .filter(|&i| self.degrees[i % DEGREES])
            .map(Pitch)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pitch_names_and_midi() {
        assert_eq!(Pitch(0).name(), "C1");
        assert_eq!(Pitch(0).midi(), 24);
        assert_eq!(Pitch(47).name(), "B4");
        assert_eq!(Pitch(47).midi(), 71);
        assert_eq!(Pitch::from_name("F#2"), Some(Pitch(18)));
        assert_eq!(Pitch::from_name("H3"), None);
    }

    #[test]
    fn test_note_length_ordering_and_ticks() {
        // Shortest to longest, strictly increasing tick values.
        let ticks: Vec<u32> = NoteLength::ALL.iter().map(|l| l.ticks()).collect();
        assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(NoteLength::Quarter.ticks(), 480);
        assert_eq!(NoteLength::Whole.ticks(), 1920);
    }

    #[test]
    fn test_from_bits_validation() {
        assert!(ScaleMask::from_bits(&[1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1]).is_ok());
        assert!(ScaleMask::from_bits(&[1, 0, 1]).is_err());
        assert!(ScaleMask::from_bits(&[]).is_err());
        assert!(ScaleMask::from_bits(&[0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]).is_err());
    }

    #[test]
    fn test_major_matches_bits() {
        let from_bits = ScaleMask::from_bits(&[1, 0, 1, 0, 1, 1, 0, 1, 0, 1, 0, 1]).unwrap();
        assert_eq!(ScaleMask::major(), from_bits);
    }

    #[test]
    fn test_or_masks() {
        let major = ScaleMask::major();
        let sparse = ScaleMask::from_bits(&[1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let combined = sparse.or(major);
        assert!(combined.admits(0));
        assert!(combined.admits(1)); // from sparse
        assert!(combined.admits(2)); // from major
        assert!(!combined.admits(3)); // in neither
    }

    #[test]
    fn sub_mask_never_sets_cleared_degrees() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = ScaleMask::major();
        for levels in 0..6 {
            let sub = base.sub_mask(levels, &mut rng);
            assert!(sub.admits(0));
            for d in 0..DEGREES {
                if !base.admits(d) {
                    assert!(!sub.admits(d), "level {levels} set cleared degree {d}");
                }
            }
        }
    }

    #[test]
    fn sub_mask_zero_levels_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = ScaleMask::major();
        assert_eq!(base.sub_mask(0, &mut rng), base);
    }

    #[test]
    fn test_admissible_pitches_replication() {
        let sparse = ScaleMask::from_bits(&[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
        let pitches = sparse.admissible_pitches();
        // Two degrees × four octaves.
        assert_eq!(pitches.len(), 2 * OCTAVES);
        assert_eq!(pitches[0].name(), "C1");
        assert_eq!(pitches[1].name(), "G1");
        assert_eq!(pitches[7].name(), "G4");
    }

    #[test]
    fn chromatic_admits_whole_master_scale() {
        assert_eq!(
            ScaleMask::chromatic().admissible_pitches().len(),
            MASTER_SCALE.len()
        );
    }
}
