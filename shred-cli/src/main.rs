//! Shred CLI - Command-line tool for Iglu JSON shredding
//!
//! This binary provides command-line interfaces for:
//! - contexts: shred a contexts envelope into per-schema arrays
//! - unstruct: shred an unstructured-event envelope into a single field
//! - key: print the derived field name for a schema URI

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Map, Value};
use shred_format::{derive_field_name, Limits, ShredError, ShredKind, ShredOptions, Shredder};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser)]
#[command(name = "shred")]
#[command(about = "Iglu JSON shredding CLI tool")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); SHRED_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shred a contexts envelope into per-schema arrays
    ///
    /// Examples:
    ///   shred contexts envelope.json
    ///   shred contexts events.ndjson --ndjson -o shredded.ndjson
    Contexts(ShredArgs),
    /// Shred an unstructured-event envelope into a single field
    ///
    /// Examples:
    ///   shred unstruct event.json --pretty
    ///   cat events.ndjson | shred unstruct - --ndjson
    Unstruct(ShredArgs),
    /// Print the derived field name for a schema URI
    Key {
        /// Schema URI (iglu:vendor/name/format/model-revision-addition)
        uri: String,
        /// Field-name prefix to apply
        #[arg(long, value_enum, default_value_t = KeyKind::Contexts)]
        kind: KeyKind,
    },
}

#[derive(Args)]
struct ShredArgs {
    /// Input file, or '-' for stdin
    input: PathBuf,
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Treat input as one envelope per line
    #[arg(long)]
    ndjson: bool,
    /// Pretty-print output
    #[arg(long, conflicts_with = "ndjson")]
    pretty: bool,
    /// Maximum envelope size in bytes
    #[arg(long)]
    max_input_bytes: Option<usize>,
    /// Maximum sub-documents per contexts envelope
    #[arg(long)]
    max_entries: Option<usize>,
    /// Show progress spinner while shredding NDJSON input
    #[arg(long)]
    progress: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum KeyKind {
    Contexts,
    #[value(name = "unstruct")]
    Unstruct,
}

impl From<KeyKind> for ShredKind {
    fn from(kind: KeyKind) -> Self {
        match kind {
            KeyKind::Contexts => ShredKind::Contexts,
            KeyKind::Unstruct => ShredKind::UnstructEvent,
        }
    }
}

/// Outcome of an NDJSON batch
#[derive(Debug, Default, PartialEq, Eq)]
struct BatchSummary {
    envelopes: usize,
    failed: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Contexts(args) => handle_shred(ShredKind::Contexts, args),
        Commands::Unstruct(args) => handle_shred(ShredKind::UnstructEvent, args),
        Commands::Key { uri, kind } => handle_key(&uri, kind.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("SHRED_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_key(uri: &str, kind: ShredKind) -> Result<(), Box<dyn Error>> {
    let field_name = derive_field_name(kind, uri)?;
    println!("{}", field_name);
    Ok(())
}

fn handle_shred(kind: ShredKind, args: ShredArgs) -> Result<(), Box<dyn Error>> {
    let shredder = build_shredder(args.max_input_bytes, args.max_entries)?;
    let mut output = open_output(args.output.as_deref())?;

    if args.ndjson {
        let input = open_input(&args.input)?;
        let start = Instant::now();
        let mut progress_bar = args.progress.then(|| create_spinner("Shredding envelopes"));
        let summary = shred_ndjson(
            &shredder,
            kind,
            BufReader::new(input),
            &mut output,
            progress_bar.as_ref(),
        )?;
        let elapsed = start.elapsed();
        if let Some(pb) = progress_bar.take() {
            pb.finish_with_message(format!(
                "Shredded {} envelopes in {:.2?} ({} failed)",
                summary.envelopes, elapsed, summary.failed
            ));
        }
        info!(
            envelopes = summary.envelopes,
            failed = summary.failed,
            "ndjson batch complete"
        );
        output.flush()?;
        if summary.failed > 0 {
            return Err(format!(
                "{} of {} envelopes failed to shred",
                summary.failed, summary.envelopes
            )
            .into());
        }
        return Ok(());
    }

    let text = read_envelope(
        open_input(&args.input)?,
        shredder.options().limits.max_input_bytes,
    )?;
    let fields = shredder.shred_to_json(kind, &text)?;
    let value = Value::Object(fields);
    if args.pretty {
        serde_json::to_writer_pretty(&mut output, &value)?;
    } else {
        serde_json::to_writer(&mut output, &value)?;
    }
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Read a single envelope, stopping one byte past `max_input_bytes`.
fn read_envelope<R: Read>(reader: R, max_input_bytes: usize) -> Result<String, Box<dyn Error>> {
    let mut text = String::new();
    reader
        .take(max_input_bytes as u64 + 1)
        .read_to_string(&mut text)?;
    if text.len() > max_input_bytes {
        return Err(ShredError::LimitExceeded(format!(
            "input exceeds max_input_bytes {}",
            max_input_bytes
        ))
        .into());
    }
    Ok(text)
}

fn build_shredder(
    max_input_bytes: Option<usize>,
    max_entries: Option<usize>,
) -> Result<Shredder, ShredError> {
    let defaults = Limits::default();
    let limits = Limits {
        max_input_bytes: max_input_bytes.unwrap_or(defaults.max_input_bytes),
        max_entries: max_entries.unwrap_or(defaults.max_entries),
    };
    debug!(?limits, "configured limits");
    Shredder::new(ShredOptions { limits })
}

/// Shred each non-blank line, writing one output line per envelope.
///
/// Failed envelopes become `{"line": n, "errors": [...]}` records so output
/// lines stay aligned with input lines.
fn shred_ndjson<R: BufRead, W: Write>(
    shredder: &Shredder,
    kind: ShredKind,
    reader: R,
    writer: &mut W,
    progress: Option<&ProgressBar>,
) -> Result<BatchSummary, Box<dyn Error>> {
    let mut summary = BatchSummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        summary.envelopes += 1;

        let record = match shredder.shred_to_json(kind, &line) {
            Ok(fields) => Value::Object(fields),
            Err(err) => {
                summary.failed += 1;
                warn!(line = line_no, error = %err, "envelope failed to shred");
                error_record(line_no, &err)
            }
        };
        serde_json::to_writer(&mut *writer, &record)?;
        writeln!(writer)?;

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(summary)
}

fn error_record(line_no: usize, err: &ShredError) -> Value {
    let errors: Vec<Value> = match err {
        ShredError::Shredding { messages } => {
            messages.iter().map(|m| Value::String(m.clone())).collect()
        }
        other => vec![Value::String(other.to_string())],
    };
    let mut record = Map::new();
    record.insert("line".to_string(), json!(line_no));
    record.insert("errors".to_string(), Value::Array(errors));
    Value::Object(record)
}

fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {pos} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
