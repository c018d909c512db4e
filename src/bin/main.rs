use clap::error::ErrorKind;
use clap::Parser;
use recordlist_core::config::{
    GlyphFormat, RunConfig, DEBUG_RECORD_LIST, DEFAULT_LIBRARY_PATH, DEFAULT_OUTPUT_DIR,
};
use recordlist_core::ConvertError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

const USAGE: &str = "Usage: recordlist_converter {recordlist}\n\tExample: > recordlist_converter riskuCVVC_1016.txt";

/// Converts the pinyin tokens of a record list into hanzi, one file per token.
#[derive(Parser, Debug)]
#[command(name = "recordlist_converter", version)]
struct Args {
    /// Record list whose whitespace-separated tokens are converted
    #[arg(value_name = "RECORDLIST")]
    record_list: Option<PathBuf>,

    /// Pinyin library: fixed-width glyph followed by its pinyin, one per line
    #[arg(long, value_name = "PATH", env = "RECORDLIST_LIBRARY", default_value = DEFAULT_LIBRARY_PATH)]
    library: PathBuf,

    /// Directory receiving `<token>.txt` files
    #[arg(long, value_name = "DIR", env = "RECORDLIST_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Encoding of the library glyphs and of the record list
    #[arg(long, value_name = "LABEL", env = "RECORDLIST_ENCODING", default_value = "utf-8")]
    encoding: String,

    /// Bytes per glyph field (defaults to 3 for UTF-8, 2 for GBK and friends)
    #[arg(long, value_name = "BYTES", env = "RECORDLIST_GLYPH_WIDTH")]
    glyph_width: Option<usize>,

    /// Development mode: RECORDLIST may be omitted and defaults to riskuCVVC_1016.txt
    #[arg(long, env = "RECORDLIST_DEBUG")]
    debug: bool,

    /// Write a JSON summary of the run
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Also write a line-by-line rendering of the record list, unknown
    /// pinyin kept as [run]
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => return usage(),
    };

    setup_tracing(args.verbose);

    let record_list = match (args.record_list, args.debug) {
        (Some(path), _) => path,
        (None, true) => {
            debug!(path = DEBUG_RECORD_LIST, "debug mode, using default record list");
            PathBuf::from(DEBUG_RECORD_LIST)
        }
        (None, false) => return usage(),
    };

    let glyph = match GlyphFormat::from_label(&args.encoding, args.glyph_width) {
        Ok(glyph) => glyph,
        Err(e) => return fail(&e),
    };

    let config = RunConfig {
        record_list,
        library: args.library,
        output_dir: args.output_dir,
        glyph,
        report: args.report,
        preview: args.preview,
    };

    match recordlist_core::run(&config) {
        Ok(summary) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = summary.print(&mut stdout).and_then(|_| stdout.flush()) {
                error!(error = %e, "failed to print summary");
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn usage() -> ExitCode {
    println!("{}", USAGE);
    ExitCode::from(1)
}

fn fail(e: &ConvertError) -> ExitCode {
    match e {
        // Operator guidance goes to stdout alongside the usage text.
        ConvertError::LibraryNotFound { .. } => println!("{}", e),
        _ => eprintln!("ERROR: {}", e),
    }
    ExitCode::from(1)
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("recordlist_core=debug,recordlist_converter=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
