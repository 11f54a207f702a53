//! Command-line tool that prints one or `-n count` LexID strings.

use std::{env, io, io::Write, process::ExitCode};

enum Command {
    Generate(usize),
    Help,
}

fn main() -> io::Result<ExitCode> {
    let mut args = env::args();
    let program = args.next();
    let program = program.as_deref().unwrap_or("lexid");

    let count = match parse_args(args) {
        Ok(Command::Generate(count)) => count,
        Ok(Command::Help) => {
            println!("Usage: {} [-n count]", program);
            println!();
            println!("Generate LexIDs, one per line.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} [-n count]", program);
            return Ok(ExitCode::FAILURE);
        }
    };

    let stdout = io::stdout();
    let mut buf = io::BufWriter::new(stdout.lock());
    for _ in 0..count {
        writeln!(buf, "{}", lexid::lexid())?;
    }
    buf.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let mut count = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-n" => {
                if count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let Some(n_arg) = args.next() else {
                    return Err("argument to option 'n' missing".to_owned());
                };
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                count = Some(c);
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }
    Ok(Command::Generate(count.unwrap_or(1)))
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Command};

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|e| e.to_string()))
    }

    /// Parses count option
    #[test]
    fn parses_count_option() {
        assert!(matches!(parse(&[]), Ok(Command::Generate(1))));
        assert!(matches!(parse(&["-n", "42"]), Ok(Command::Generate(42))));
        assert!(matches!(parse(&["-h"]), Ok(Command::Help)));
        assert!(matches!(parse(&["--help"]), Ok(Command::Help)));
    }

    /// Rejects malformed arguments
    #[test]
    fn rejects_malformed_arguments() {
        assert!(parse(&["-n"]).is_err());
        assert!(parse(&["-n", "x"]).is_err());
        assert!(parse(&["-n", "1", "-n", "2"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
