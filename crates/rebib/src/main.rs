use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use rebib::FormatSpec;

#[derive(Parser)]
#[command(name = "rebib", author, version, about = "Convert BibTeX between dialects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a BibTeX file with a named format
    Convert {
        /// Path to the input .bib file
        input: PathBuf,

        /// Format name, resolved to <formats-dir>/<name>.json
        #[arg(short, long)]
        format: String,

        /// Directory holding format specification files
        #[arg(long, default_value = "formats")]
        formats_dir: PathBuf,

        /// Emit the outcome (outputs plus failures) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a format specification file
    Check {
        /// Path to the specification JSON file
        path: PathBuf,
    },
    /// Parse a BibTeX file and print its entries as JSON
    Parse {
        /// Path to the input .bib file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            format,
            formats_dir,
            json,
        } => {
            let outcome = match rebib::convert_file(&input, &formats_dir, &format) {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            if json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error serializing outcome: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                for block in &outcome.outputs {
                    println!("{}", block);
                }
                for failure in &outcome.failures {
                    eprintln!("Warning: {}", failure.error);
                }
            }
            if !outcome.failures.is_empty() {
                std::process::exit(2);
            }
        }
        Commands::Check { path } => {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error reading {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = FormatSpec::from_str(&text) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            println!("{}: ok", path.display());
        }
        Commands::Parse { input } => {
            let text = match fs::read_to_string(&input) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error reading {}: {}", input.display(), e);
                    std::process::exit(1);
                }
            };
            let parsed = match rebib::parse_entries(&text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            match serde_json::to_string_pretty(&parsed.entries) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing entries: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
