// Plain-text note list output.
//
// One line per note: `Note <start> <end> <midi>`, with start/end in ticks
// accumulated across the phrase. A simple format for diffing runs and
// feeding external analysis scripts.

use crate::compose::Phrase;
use std::io::Write;
use std::path::Path;

/// Render a phrase as note-list lines.
pub fn note_list_lines(phrase: &Phrase) -> Vec<String> {
    let mut start: u64 = 0;
    phrase
        .notes
        .iter()
        .map(|&(duration, pitch)| {
            let end = start + duration.ticks() as u64;
            let line = format!("Note {} {} {}", start, end, pitch.midi());
            start = end;
            line
        })
        .collect()
}

/// Write a phrase to a note-list file.
pub fn write_note_list(phrase: &Phrase, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = std::fs::File::create(path)?;
    for line in note_list_lines(phrase) {
        writeln!(file, "{line}")?;
    }
    Ok(())
}
