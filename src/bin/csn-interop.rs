//! CSN Interop CLI
//!
//! Command-line interface for turning effective CSN into interop CSN.
//!
//! Logs go to stderr; `RUST_LOG` overrides the `-v`/`-q` flags.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use csn_interop::{
    derive_meta, load_csn_auto, to_interop, I18nFolder, InteropError, LocaleBundles, NoBundles,
    DEFAULT_BASENAME,
};

#[derive(Parser)]
#[command(name = "csn-interop")]
#[command(about = "Transform effective CSN into interop CSN")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform an effective CSN document into its interop variant
    Transform {
        /// CSN source: file path or URL (http:// or https://)
        csn: String,

        /// Folder with i18n bundles (i18n.json, i18n_<locale>.properties)
        #[arg(long)]
        i18n: Option<PathBuf>,

        /// File basename of the i18n bundles
        #[arg(long, default_value = DEFAULT_BASENAME)]
        i18n_basename: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the interop meta block derived from a CSN document
    Meta {
        /// CSN source: file path or URL (http:// or https://)
        csn: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let result = match cli.command {
        Commands::Transform {
            csn,
            i18n,
            i18n_basename,
            output,
            pretty,
        } => run_transform(&csn, i18n, i18n_basename, output, pretty),

        Commands::Meta { csn, pretty } => run_meta(&csn, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(args: &GlobalArgs) {
    let level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csn_interop={level}")));

    // A second init (tests in one process) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_transform(
    csn_source: &str,
    i18n: Option<PathBuf>,
    i18n_basename: String,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let mut csn = load_csn_auto(csn_source).map_err(report)?;

    let bundles: Box<dyn LocaleBundles> = match i18n {
        Some(dir) => {
            let folder = I18nFolder::new(dir).basename(i18n_basename);
            tracing::info!(dir = %folder.dir().display(), "reading i18n bundles");
            Box::new(folder)
        }
        None => Box::new(NoBundles),
    };

    to_interop(&mut csn, bundles.as_ref()).map_err(report)?;
    tracing::info!(source = %csn_source, "transformed CSN");

    let json_output = to_json(&csn, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_meta(csn_source: &str, pretty: bool) -> Result<(), u8> {
    let mut csn = load_csn_auto(csn_source).map_err(report)?;
    derive_meta(&mut csn).map_err(report)?;

    let meta = csn.get("meta").cloned().unwrap_or(Value::Null);
    println!("{}", to_json(&meta, pretty)?);
    Ok(())
}

fn to_json(value: &Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

/// Print an error and map it to its exit code.
fn report(e: InteropError) -> u8 {
    tracing::debug!(error = ?e, "command failed");
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}
