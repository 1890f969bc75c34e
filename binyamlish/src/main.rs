//! Command-line tool converting indentation-structured YAML documents to JSON.
//!
//! Usage: yamlish [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (json, events) [default: json]
//!   -o, --output <FILE>    Write output to specified file
//!   --pretty               Indent JSON output
//!   --strict               Fail on the first unrecognized line
//!   --defer-dedent         Close nested structures only at end of input
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! With no FILE, or when FILE is `-`, read standard input. With `-o`, the
//! output file is only replaced once conversion succeeds.

use libyamlish::{run, DedentMode, JsonStyle, Options, Output, Report};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn parse_output(s: &str) -> Option<Output> {
    match s {
        "json" => Some(Output::Json),
        "events" => Some(Output::Events),
        _ => None,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut options = Options::new();
    let mut output_file: Option<&str> = None;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("yamlish {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                match parse_output(&args[i]) {
                    Some(output) => options = options.output(output),
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--pretty" => options = options.style(JsonStyle::Pretty),
            "--strict" => options = options.strict(true),
            "--defer-dedent" => options = options.dedent(DedentMode::Defer),
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if let Some(path) = input_path {
        options = options.filename(path);
    }

    let reader: Box<dyn BufRead> = match input_path {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let exit_code = match output_file {
        Some(path) => convert_to_file(reader, path, &options),
        None => convert(reader, BufWriter::new(io::stdout()), &options),
    };
    process::exit(exit_code);
}

/// Path the output is staged at until conversion succeeds.
fn staging_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Convert into `path`, which is left untouched unless conversion succeeds.
fn convert_to_file(reader: Box<dyn BufRead>, path: &str, options: &Options) -> i32 {
    let staging = staging_path(path);
    let file = match File::create(&staging) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error writing {}: {}", path, e);
            return 1;
        }
    };

    let code = convert(reader, BufWriter::new(file), options);
    if code != 0 {
        let _ = fs::remove_file(&staging);
        return code;
    }
    if let Err(e) = fs::rename(&staging, path) {
        eprintln!("Error writing {}: {}", path, e);
        let _ = fs::remove_file(&staging);
        return 1;
    }
    0
}

/// Run the pipeline and report the outcome. Returns the exit code.
fn convert<W: Write + Send>(reader: Box<dyn BufRead>, mut writer: W, options: &Options) -> i32 {
    let report = match run(reader, &mut writer, options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Err(e) = finish_output(&mut writer, &report, options) {
        eprintln!("Error: {}", e);
        return 1;
    }

    for diagnostic in &report.diagnostics {
        eprintln!("Warning: {}", diagnostic);
    }
    0
}

/// End JSON output with a newline so it reads well in a terminal.
fn finish_output<W: Write>(writer: &mut W, report: &Report, options: &Options) -> io::Result<()> {
    if options.output == Output::Json && report.bytes > 0 {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn print_help() {
    println!(
        "yamlish - convert indentation-structured YAML to JSON

Usage: yamlish [OPTIONS] [FILE]

Arguments:
  [FILE]  Input file (reads stdin if omitted or -)

Options:
  -t, --to <FORMAT>      Output format (json, events) [default: json]
  -o, --output <FILE>    Write output to specified file
      --pretty           Indent JSON output
      --strict           Fail on the first unrecognized line
      --defer-dedent     Close nested structures only at end of input
  -h, --help             Print help
  -V, --version          Print version

With -o, FILE is replaced only when conversion succeeds. Output written to
standard output is streamed, so a failed conversion may leave it partial.

Set RUST_LOG=debug to trace parser decisions on stderr."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn reader(input: &'static str) -> Box<dyn BufRead> {
        Box::new(input.as_bytes())
    }

    #[test]
    fn test_output_file_written_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path = path.to_str().unwrap();

        assert_eq!(convert_to_file(reader("a: 1"), path, &Options::new()), 0);
        assert_eq!(fs::read_to_string(path).unwrap(), "{\"a\":1}\n");
        assert!(!staging_path(path).exists());
    }

    #[test]
    fn test_failed_conversion_keeps_existing_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "previous").unwrap();
        let path = path.to_str().unwrap();

        let options = Options::new().strict(true);
        assert_eq!(convert_to_file(reader("a: 1\nb\nc: 2"), path, &options), 1);
        assert_eq!(fs::read_to_string(path).unwrap(), "previous");
        assert!(!staging_path(path).exists());
    }

    #[test]
    fn test_staging_path_is_a_sibling() {
        assert_eq!(staging_path("dir/out.json"), Path::new("dir/out.json.partial"));
    }
}
