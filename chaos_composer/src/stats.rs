// Run statistics: how event-tree phrases differ from control phrases.
//
// Per-phrase measures (interval sizes between consecutive notes, duration
// change sizes) and aggregate histograms (absolute pitch frequency over the
// master scale, scale-position frequency over the twelve degrees). The
// data-set writer emits one CSV-ish report per experiment batch, pairing
// each control run with its event-tree run so the two distributions can be
// compared directly.

use crate::compose::Phrase;
use crate::scale::{DEGREES, MASTER_SCALE};
use std::io::Write;
use std::path::Path;

/// Degree labels for the scale-position histogram, root to leading tone.
pub const SCALE_POSITIONS: [&str; DEGREES] = [
    "1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// Absolute interval (in semitones) between each consecutive note pair.
pub fn relative_pitch_changes(phrase: &Phrase) -> Vec<u32> {
    phrase
        .notes
        .windows(2)
        .map(|w| (w[1].1.midi() as i32 - w[0].1.midi() as i32).unsigned_abs())
        .collect()
}

/// Absolute duration change (in ticks) between each consecutive note pair.
pub fn relative_rhythm_changes(phrase: &Phrase) -> Vec<u32> {
    phrase
        .notes
        .windows(2)
        .map(|w| w[1].0.ticks().abs_diff(w[0].0.ticks()))
        .collect()
}

/// Note counts per master-scale pitch, in pitch-space order.
pub fn pitch_histogram(phrase: &Phrase) -> Vec<(&'static str, usize)> {
    let mut counts = vec![0usize; MASTER_SCALE.len()];
    for &(_, pitch) in &phrase.notes {
        counts[pitch.0] += 1;
    }
    MASTER_SCALE.iter().copied().zip(counts).collect()
}

/// Note counts per chromatic degree, octaves folded together.
pub fn scale_position_histogram(phrase: &Phrase) -> Vec<(&'static str, usize)> {
    let mut counts = [0usize; DEGREES];
    for &(_, pitch) in &phrase.notes {
        counts[pitch.degree()] += 1;
    }
    SCALE_POSITIONS.into_iter().zip(counts).collect()
}

/// An experiment batch: (control, event-tree) phrase pairs, one per run.
pub struct DataSet {
    pub runs: Vec<(Phrase, Phrase)>,
}

impl DataSet {
    pub fn new() -> DataSet {
        DataSet { runs: Vec::new() }
    }

    pub fn push(&mut self, control: Phrase, experiment: Phrase) {
        self.runs.push((control, experiment));
    }

    /// Write the full report: per-run change sequences, then aggregate
    /// histograms over all runs concatenated.
    pub fn write_csv(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = std::fs::File::create(path)?;

        for (index, (control, experiment)) in self.runs.iter().enumerate() {
            write_change_lines(&mut file, "relative pitch changes", index, control, experiment, relative_pitch_changes)?;
            write_change_lines(&mut file, "relative rhythm changes", index, control, experiment, relative_rhythm_changes)?;
        }

        let all_control = concat_phrases(self.runs.iter().map(|(c, _)| c));
        let all_experiment = concat_phrases(self.runs.iter().map(|(_, e)| e));

        write_histogram(&mut file, "absolute pitch frequency", &all_control, &all_experiment, pitch_histogram)?;
        write_histogram(&mut file, "scale positions", &all_control, &all_experiment, scale_position_histogram)?;

        Ok(())
    }
}

impl Default for DataSet {
    fn default() -> Self {
        DataSet::new()
    }
}

fn concat_phrases<'a>(phrases: impl Iterator<Item = &'a Phrase>) -> Phrase {
    let mut notes = Vec::new();
    for phrase in phrases {
        notes.extend(phrase.notes.iter().copied());
    }
    Phrase { notes }
}

fn write_change_lines(
    file: &mut std::fs::File,
    label: &str,
    run: usize,
    control: &Phrase,
    experiment: &Phrase,
    measure: fn(&Phrase) -> Vec<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(file, "{label} Control Run: {run}, {}", join(&measure(control)))?;
    writeln!(
        file,
        "{label} Event Tree Run: {run}, {}",
        join(&measure(experiment))
    )?;
    Ok(())
}

fn write_histogram(
    file: &mut std::fs::File,
    label: &str,
    control: &Phrase,
    experiment: &Phrase,
    measure: fn(&Phrase) -> Vec<(&'static str, usize)>,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(file, "{label} Control")?;
    for (name, count) in measure(control) {
        writeln!(file, "{name},{count}")?;
    }
    writeln!(file)?;
    writeln!(file, "{label} Event Tree")?;
    for (name, count) in measure(experiment) {
        writeln!(file, "{name},{count}")?;
    }
    writeln!(file)?;
    Ok(())
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
