// Chaos Composer — CLI entry point.
//
// Runs an experiment batch: N control sequences (scaled integers mapped
// straight onto the pitch/duration tables) and N event-tree compositions
// from the same chaotic equation, then writes MIDI + note-list files for
// every third run and an aggregate statistics report.
//
// Usage:
//   cargo run -p chaos_composer -- [out_dir] [--equation NAME] [--runs N]
//     [--notes N] [--seed N] [--tempo BPM]
//
// Equations: henon, lorenz, rossler, chua

use chaos_composer::compose::{compose, control};
use chaos_composer::midi::write_midi;
use chaos_composer::note_list::write_note_list;
use chaos_composer::scale::{MASTER_SCALE, ScaleMask};
use chaos_composer::stats::DataSet;
use chaos_generators::{Attractor, AttractorKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let out_dir = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or("data");
    let runs: usize = parse_flag(&args, "--runs").unwrap_or(10);
    let notes: usize = parse_flag(&args, "--notes").unwrap_or(100);
    let seed: Option<u64> = parse_flag(&args, "--seed");
    let tempo: u16 = parse_flag(&args, "--tempo").unwrap_or(120);
    let equation_name: String =
        parse_flag(&args, "--equation").unwrap_or_else(|| "rossler".to_string());

    let kind = match AttractorKind::parse(&equation_name) {
        Some(kind) => kind,
        None => {
            eprintln!("Unknown equation '{}'. Using rossler.", equation_name);
            AttractorKind::Rossler
        }
    };

    println!("=== Chaos Composer ===");
    println!("Equation: {}", kind.name());
    println!("Runs: {} x {} notes", runs, notes);
    println!("Tempo: {} BPM", tempo);
    println!("Output: {}/{}", out_dir, kind.name());
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    let mut rng = if let Some(s) = seed {
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    println!("[1/3] Generating sequences...");
    let mut control_eq = Attractor::standard(kind);
    let mut experiment_eq = Attractor::standard(kind);
    let control_runs: Vec<Vec<i64>> = (0..runs)
        .map(|_| control_eq.scaled_run(notes, MASTER_SCALE.len() as i64 - 1))
        .collect();
    let experiment_runs: Vec<Vec<f64>> = (0..runs)
        .map(|_| experiment_eq.raw_run(notes))
        .collect();

    let base = PathBuf::from(out_dir).join(kind.name());
    let midi_dir = base.join("midi");
    let note_list_dir = base.join("note_list");
    if let Err(e) = std::fs::create_dir_all(&midi_dir)
        .and_then(|_| std::fs::create_dir_all(&note_list_dir))
    {
        eprintln!("Error creating output directories: {}", e);
        std::process::exit(1);
    }

    println!("[2/3] Composing {} runs...", runs);
    let root_scale = ScaleMask::major();
    let mut data_set = DataSet::new();
    for index in 0..runs {
        let control_phrase = control(&control_runs[index]);
        let experiment_phrase = match compose(&experiment_runs[index], &root_scale, &mut rng) {
            Ok(phrase) => phrase,
            Err(e) => {
                eprintln!("Error composing run {}: {}", index, e);
                std::process::exit(1);
            }
        };

        if index % 3 == 0 {
            let write = || -> Result<(), Box<dyn std::error::Error>> {
                let tag = kind.name();
                write_midi(
                    &control_phrase,
                    tempo,
                    &midi_dir.join(format!("{tag}_control_run_{index}.mid")),
                )?;
                write_midi(
                    &experiment_phrase,
                    tempo,
                    &midi_dir.join(format!("{tag}_event_tree_run_{index}.mid")),
                )?;
                write_note_list(
                    &control_phrase,
                    &note_list_dir.join(format!("{tag}_control_run_{index}.note_list")),
                )?;
                write_note_list(
                    &experiment_phrase,
                    &note_list_dir.join(format!("{tag}_event_tree_run_{index}.note_list")),
                )?;
                Ok(())
            };
            if let Err(e) = write() {
                eprintln!("Error writing run {} files: {}", index, e);
                std::process::exit(1);
            }
            println!("  Run {}: wrote MIDI and note lists.", index);
        }

        data_set.push(control_phrase, experiment_phrase);
    }

    println!("[3/3] Writing statistics...");
    let csv_path = PathBuf::from(out_dir).join(format!("{}_data_set.csv", kind.name()));
    match data_set.write_csv(&csv_path) {
        Ok(()) => println!("  Done! Report at {}", csv_path.display()),
        Err(e) => {
            eprintln!("Error writing data set: {}", e);
            std::process::exit(1);
        }
    }

    println!();
    println!("Play with: timidity {}/*.mid (or any MIDI player)", midi_dir.display());
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
