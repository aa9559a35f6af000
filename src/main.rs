mod block;
mod csv;
mod enrich;
mod fields;
mod header;
mod normalize;
mod scanner;
mod tracks;
mod types;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use types::RunnerRecord;

const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "form_extract", about = "Greyhound race-form extraction")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse every form text file under a directory → output/runners.{json,csv}
    Extract {
        /// Directory holding PDF-extracted form text files
        #[arg(default_value = "data")]
        data: PathBuf,
    },
    /// Parse a single form text file and print its rows as JSON
    Parse {
        /// Path to one form text file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Extract { data }) => run_extract(&data),
        Some(Command::Parse { file }) => run_parse(&file),
        // Default: extract from the conventional data directory
        None => run_extract(Path::new("data")),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT FILE HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn output_path(name: &str) -> PathBuf {
    Path::new(OUTPUT_DIR).join(name)
}

fn write_json<T: serde::Serialize>(name: &str, data: &T) {
    let path = output_path(name);
    let json = serde_json::to_string_pretty(data).expect("JSON serialization failed");
    std::fs::write(&path, &json).unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
    eprintln!("  {} ({} bytes)", path.display(), json.len());
}

fn write_text(name: &str, contents: &str) {
    let path = output_path(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
    eprintln!("  {} ({} bytes)", path.display(), contents.len());
}

// ═══════════════════════════════════════════════════════════════════════
//  PARSE MODE: one document → JSON rows on stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(file: &Path) {
    let raw = std::fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", file.display());
        std::process::exit(1);
    });

    let rows = enrich::parse_document(&raw);
    eprintln!("Parsed {} runners from {}", rows.len(), file.display());

    let json = serde_json::to_string_pretty(&rows).expect("JSON serialization");
    println!("{json}");
}

// ═══════════════════════════════════════════════════════════════════════
//  EXTRACT MODE: full batch → output/*.json + output/*.csv
// ═══════════════════════════════════════════════════════════════════════

fn run_extract(root: &Path) {
    eprintln!("Scanning forms at: {}", root.display());

    let files = scanner::scan_forms(root);
    eprintln!("Found {} form text files", files.len());

    let mut all_rows: Vec<RunnerRecord> = Vec::new();
    let mut unreadable: Vec<String> = Vec::new();
    let mut document_count = 0usize;

    for path in &files {
        // One bad document never takes the batch down.
        let raw = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Cannot read {}: {e}", path.display());
                unreadable.push(path.display().to_string());
                continue;
            }
        };

        eprintln!("\nParsing {}", path.display());
        let rows = enrich::parse_document(&raw);
        let races: HashSet<Option<u32>> = rows.iter().map(|r| r.race_number).collect();
        eprintln!("  {} runners across {} races", rows.len(), races.len());

        document_count += 1;
        all_rows.extend(rows);
    }

    // ── Print statistics ───────────────────────────────────────────
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  EXTRACTION STATISTICS");
    eprintln!("══════════════════════════════════════════");

    eprintln!("\nParsed {} runners from {document_count} documents", all_rows.len());

    let mut by_track: HashMap<&str, usize> = HashMap::new();
    for r in &all_rows {
        *by_track
            .entry(r.track.as_deref().unwrap_or("UNKNOWN"))
            .or_insert(0usize) += 1;
    }
    eprintln!("\nBy track:");
    let mut track_counts: Vec<_> = by_track.iter().collect();
    track_counts.sort_by_key(|(_, c)| std::cmp::Reverse(**c));
    for (track, count) in &track_counts {
        eprintln!("  {track}: {count} runners");
    }

    let with_owner = all_rows
        .iter()
        .filter(|r| r.details.owner.is_some())
        .count();
    let with_runs = all_rows
        .iter()
        .filter(|r| !r.details.recent_runs.is_empty())
        .count();
    eprintln!("\nDetail coverage:");
    eprintln!("  Owner present:       {with_owner}/{}", all_rows.len());
    eprintln!("  Recent runs present: {with_runs}/{}", all_rows.len());

    if !unreadable.is_empty() {
        eprintln!("\n══════════════════════════════════════════");
        eprintln!("  UNREADABLE FILES ({} total)", unreadable.len());
        eprintln!("══════════════════════════════════════════");
        for f in &unreadable {
            eprintln!("  {f}");
        }
    }

    // ── Write output files ──────────────────────────────────────────
    eprintln!("\n══════════════════════════════════════════");
    eprintln!("  WRITING OUTPUT FILES");
    eprintln!("══════════════════════════════════════════\n");

    std::fs::create_dir_all(OUTPUT_DIR).expect("cannot create output/");

    write_json("runners.json", &all_rows);
    write_text("runners.csv", &csv::to_csv_string(&all_rows));

    eprintln!("\nDone. Inspect a single document with:");
    eprintln!("  cargo run -- parse <form.txt>");
}
