//! Print the facts of one netmap document as JSON.
//!
//! Exit status: 0 when every line was understood, 1 when some lines were
//! skipped (they are listed on stderr), 2 on usage or I/O errors.

use std::path::PathBuf;
use std::process::ExitCode;

use netmap_dsl::{scan_document, Scan};

const USAGE: &str = "usage: netmap_parse <file.net>";

fn input_path() -> Result<PathBuf, String> {
    let mut args = std::env::args_os().skip(1);
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(PathBuf::from(path)),
        _ => Err(USAGE.to_string()),
    }
}

fn parse_file() -> Result<Scan, String> {
    let path = input_path()?;
    let text = std::fs::read_to_string(&path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    Ok(scan_document(&text, None))
}

fn main() -> ExitCode {
    let scan = match parse_file() {
        Ok(scan) => scan,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    for skipped in &scan.skipped {
        eprintln!("skipped line {}: {} ({})", skipped.index, skipped.text, skipped.reason);
    }
    match serde_json::to_string_pretty(&scan.facts) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    }

    if scan.skipped.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
