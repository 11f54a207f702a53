//! Command-line tool that shows the components of LexIDs read from stdin or a file.

use std::io::{self, BufRead, BufReader, Write as _};
use std::{env, fs::File, process::ExitCode};

use chrono::{DateTime, SecondsFormat};
use lexid::{LexId, ParseError};
use serde::Serialize;

enum Command {
    Inspect(Option<String>),
    Help,
}

/// The components of an identifier prepared for JSON rendering.
///
/// The numeric fields are reported as decimal strings so that consumers that read every JSON
/// number as a double do not lose precision.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Inspection {
    input: String,
    canonical: String,
    timestamp_iso: String,
    timestamp: String,
    counter_hi: String,
    counter_lo: String,
    entropy: String,
    fields_hex: [String; 4],
}

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let program = program.as_deref().unwrap_or("lexid-inspect");

    let file = match parse_args(args) {
        Ok(Command::Inspect(file)) => file,
        Ok(Command::Help) => {
            println!("Usage: {} [file]", program);
            println!();
            println!("Show components of LexIDs read from stdin or a file.");
            println!("Print a human-readable JSON object for each valid line read.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} [file]", program);
            return Ok(ExitCode::FAILURE);
        }
    };

    let reader: Box<dyn BufRead> = match file.as_deref() {
        None | Some("-") => Box::new(io::stdin().lock()),
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match inspect(line) {
            Ok(fields) => writeln!(out, "{}", serde_json::to_string_pretty(&fields)?)?,
            Err(err) => {
                out.flush()?;
                eprintln!("warning: skipped invalid identifier: {:?} ({})", line, err);
            }
        }
    }
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut file = None;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unrecognized argument '{}'", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("too many file arguments".to_owned());
                }
                file = Some(arg);
            }
        }
    }
    Ok(Command::Inspect(file))
}

fn inspect(input: &str) -> Result<Inspection, ParseError> {
    let id: LexId = input.parse()?;
    let timestamp_iso = DateTime::from_timestamp_millis(id.timestamp() as i64)
        .expect("48-bit timestamps are in range of chrono::DateTime")
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    Ok(Inspection {
        input: input.to_owned(),
        canonical: id.encode().into(),
        timestamp_iso,
        timestamp: id.timestamp().to_string(),
        counter_hi: id.counter_hi().to_string(),
        counter_lo: id.counter_lo().to_string(),
        entropy: id.entropy().to_string(),
        fields_hex: [
            format!("{:012x}", id.timestamp()),
            format!("{:06x}", id.counter_hi()),
            format!("{:06x}", id.counter_lo()),
            format!("{:08x}", id.entropy()),
        ],
    })
}
