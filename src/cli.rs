// Command-line front end for mmkv-reader.
//
// Subcommands read a container from disk (raw or hex text), decode it with
// the configured header layout and print the value history of every key,
// reinterpreted under a chosen type.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::container::header::{DEFAULT_FALLBACK_BOUND, HeaderLayout};
use crate::container::scanner::ScanReport;
use crate::container::{ContainerHeader, DecodedStore};
use crate::engine::{self, ScanOptions};
use crate::hex;
use crate::io::{self as input, InputError, InputFormat, LoadedContainer};
use crate::value::{Decoded, Interpretation, ValueView};

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_KEY_NOT_FOUND: i32 = 2;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Best-effort decoder for MMKV key-value containers.
#[derive(Parser, Debug)]
#[command(
    name = "mmkv-reader",
    version,
    about = "Decode MMKV key-value containers",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress warnings).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print output as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,

    #[command(flatten)]
    decode: DecodeArgs,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print every key with its full value history.
    Dump(DumpArgs),
    /// Print the container header and scan summary.
    Header(InputArgs),
    /// Print the value history of one key.
    Get(GetArgs),
    /// List the available value interpretations.
    Kinds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Auto,
    Raw,
    Hex,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Header layout preceding the first record: `size-varint` (4-byte size
    /// then one varint) or `fixedN` (N opaque bytes, N >= 4).
    #[arg(long, global = true, default_value_t = HeaderLayout::SizeThenVarint)]
    layout: HeaderLayout,

    /// Scan bound used when the declared size is zero.
    #[arg(long = "fallback-bound", global = true, default_value_t = DEFAULT_FALLBACK_BOUND)]
    fallback_bound: usize,

    /// Input encoding (auto-detects hex text by default).
    #[arg(long, value_enum, global = true, default_value_t = FormatArg::Auto)]
    format: FormatArg,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// MMKV container file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// MMKV container file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Interpretation applied to every value (see `kinds`).
    #[arg(long = "as", default_value_t = Interpretation::HexString)]
    kind: Interpretation,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// MMKV container file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Key to look up.
    key: String,

    /// Interpretation applied to each value (see `kinds`).
    #[arg(long = "as", default_value_t = Interpretation::HexString)]
    kind: Interpretation,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dump,
    Header,
    Get,
    Kinds,
}

#[derive(Debug)]
struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    input_file: Option<PathBuf>,
    key: Option<String>,
    kind: Interpretation,
    format: InputFormat,
    scan: ScanOptions,
}

fn input_format(format: FormatArg) -> InputFormat {
    match format {
        FormatArg::Auto => InputFormat::Auto,
        FormatArg::Raw => InputFormat::Raw,
        FormatArg::Hex => InputFormat::Hex,
    }
}

fn resolve_options(cli: Cli) -> Options {
    let scan = ScanOptions {
        layout: cli.decode.layout,
        fallback_bound: cli.decode.fallback_bound,
    };
    let (command, input_file, key, kind) = match cli.command {
        Cmd::Dump(args) => (Command::Dump, Some(args.input), None, args.kind),
        Cmd::Header(args) => (
            Command::Header,
            Some(args.input),
            None,
            Interpretation::HexString,
        ),
        Cmd::Get(args) => (Command::Get, Some(args.input), Some(args.key), args.kind),
        Cmd::Kinds => (Command::Kinds, None, None, Interpretation::HexString),
    };

    Options {
        command,
        quiet: cli.quiet,
        verbose: cli.verbose.min(3),
        json_output: cli.json_output,
        input_file,
        key,
        kind,
        format: input_format(cli.decode.format),
        scan,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("mmkv-reader".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Shared decode step
// ---------------------------------------------------------------------------

struct Scanned {
    loaded: LoadedContainer,
    header: ContainerHeader,
    report: ScanReport,
}

fn load_and_scan(opts: &Options) -> Result<Scanned, InputError> {
    let path = opts
        .input_file
        .as_deref()
        .ok_or_else(|| InputError::Io(io::Error::new(io::ErrorKind::InvalidInput, "no input file")))?;
    let loaded = input::load_container(path, opts.format)?;
    let (header, report) = engine::inspect_container(&loaded.bytes, &opts.scan)?;
    if !report.outcome.is_clean() {
        log::warn!(
            "{}: scan stopped early at offset {} ({})",
            path.display(),
            report.end_offset,
            report.outcome
        );
    }
    Ok(Scanned {
        loaded,
        header,
        report,
    })
}

fn value_json(bytes: &[u8], kind: Interpretation) -> serde_json::Value {
    let view = ValueView::new(bytes, kind);
    let value = match view.decode() {
        Ok(Decoded::Hex(s)) => serde_json::json!(s),
        Ok(Decoded::Utf8(s)) => serde_json::json!(s),
        Ok(Decoded::Int32(v)) => serde_json::json!(v),
        Ok(Decoded::UInt32(v)) => serde_json::json!(v),
        Ok(Decoded::Int64(v)) => serde_json::json!(v),
        Ok(Decoded::UInt64(v)) => serde_json::json!(v),
        Ok(Decoded::Bytes(b)) => serde_json::json!(hex::encode(b)),
        Ok(Decoded::Float64(v)) => serde_json::json!(v),
        Ok(Decoded::Bool(v)) => serde_json::json!(v),
        Err(e) => {
            return serde_json::json!({
                "raw": hex::encode(bytes),
                "error": e.to_string(),
            });
        }
    };
    serde_json::json!({
        "raw": hex::encode(bytes),
        "value": value,
    })
}

fn history_json(values: &[Vec<u8>], kind: Interpretation) -> serde_json::Value {
    serde_json::Value::Array(values.iter().map(|v| value_json(v, kind)).collect())
}

fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            EXIT_OK
        }
        Err(e) => {
            eprintln!("mmkv-reader: json: {e}");
            EXIT_FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn write_dump<W: Write>(out: &mut W, store: &DecodedStore, kind: Interpretation) -> io::Result<()> {
    for (key, values) in store {
        writeln!(out, "{key}")?;
        for (i, value) in values.iter().enumerate() {
            writeln!(out, "  [{i}] {}", ValueView::new(value, kind))?;
        }
    }
    Ok(())
}

fn cmd_dump(opts: &Options) -> i32 {
    let decoded = match load_and_scan(opts) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("mmkv-reader: dump: {e}");
            return EXIT_FAILURE;
        }
    };
    let store = &decoded.report.store;

    if opts.json_output {
        let keys: Vec<_> = store
            .iter()
            .map(|(key, values)| {
                serde_json::json!({
                    "key": key,
                    "values": history_json(values, opts.kind),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "as": opts.kind.name(),
            "outcome": decoded.report.outcome.describe(),
            "keys": keys,
        }));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_dump(&mut out, store, opts.kind) {
        eprintln!("mmkv-reader: dump: write: {e}");
        return EXIT_FAILURE;
    }
    EXIT_OK
}

// ---------------------------------------------------------------------------
// Header command
// ---------------------------------------------------------------------------

fn cmd_header(opts: &Options) -> i32 {
    let Scanned {
        loaded,
        header,
        report,
    } = match load_and_scan(opts) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("mmkv-reader: header: {e}");
            return EXIT_FAILURE;
        }
    };
    let sha256 = loaded.sha256.map(|d| hex::encode(&d));

    if opts.json_output {
        return print_json(&serde_json::json!({
            "declared_size": header.declared_size,
            "header_length": header.header_length,
            "layout": opts.scan.layout.to_string(),
            "reserved": header.reserved,
            "scan_bound": report.bound,
            "outcome": report.outcome.describe(),
            "keys": report.store.len(),
            "entries": report.entries,
            "tombstones": report.tombstones,
            "end_offset": report.end_offset,
            "input_size": loaded.bytes.len(),
            "sha256": sha256,
        }));
    }

    println!("MMKV declared size:           {}", header.declared_size);
    println!("MMKV header length:           {}", header.header_length);
    println!("MMKV header layout:           {}", opts.scan.layout);
    if let Some(reserved) = header.reserved {
        println!("MMKV reserved varint:         {reserved:#010x}");
    }
    if header.is_size_degenerate() {
        println!("MMKV scan bound:              {} (fallback)", report.bound);
    } else {
        println!("MMKV scan bound:              {}", report.bound);
    }
    println!("Scan outcome:                 {}", report.outcome);
    println!("Keys:                         {}", report.store.len());
    println!("Entries:                      {}", report.entries);
    println!("Tombstones:                   {}", report.tombstones);
    println!("End offset:                   {}", report.end_offset);
    println!("Input size:                   {}", loaded.bytes.len());
    if let Some(digest) = sha256 {
        println!("SHA-256:                      {digest}");
    }
    EXIT_OK
}

// ---------------------------------------------------------------------------
// Get command
// ---------------------------------------------------------------------------

fn cmd_get(opts: &Options) -> i32 {
    let decoded = match load_and_scan(opts) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("mmkv-reader: get: {e}");
            return EXIT_FAILURE;
        }
    };
    let key = opts.key.as_deref().unwrap_or_default();
    let Some(values) = decoded.report.store.get(key) else {
        if !opts.quiet {
            eprintln!("mmkv-reader: get: key not found: {key}");
        }
        return EXIT_KEY_NOT_FOUND;
    };

    if opts.json_output {
        return print_json(&serde_json::json!({
            "key": key,
            "as": opts.kind.name(),
            "values": history_json(values, opts.kind),
        }));
    }

    for (i, value) in values.iter().enumerate() {
        println!("[{i}] {}", ValueView::new(value, opts.kind));
    }
    EXIT_OK
}

// ---------------------------------------------------------------------------
// Kinds command
// ---------------------------------------------------------------------------

fn cmd_kinds(opts: &Options) -> i32 {
    if opts.json_output {
        let names: Vec<_> = Interpretation::ALL.iter().map(|k| k.name()).collect();
        return print_json(&serde_json::json!(names));
    }
    for kind in Interpretation::ALL {
        println!("{kind}");
    }
    EXIT_OK
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(opts: &Options) -> &'static str {
    if opts.quiet {
        return "error";
    }
    match opts.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Dump => cmd_dump(&opts),
        Command::Header => cmd_header(&opts),
        Command::Get => cmd_get(&opts),
        Command::Kinds => cmd_kinds(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
