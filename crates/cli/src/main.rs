mod render;
mod source;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use preset_diff_core::{
    CommandSequence, DEFAULT_ITEM_LIST_VERSION, DEFAULT_SEQUENCE, DecodeConfig, DecodedPreset,
    DisplayResolver, ReportOptions, ResolveConfig, TableCache, build_report, decode_preset,
};
use tracing_subscriber::EnvFilter;

use crate::render::{DecodeFormat, RenderOptions, ReportFormat};

/// Parameter tables consulted when `--tables` is not given, highest priority
/// first.
const DEFAULT_TABLES: [&str; 3] = [
    "data/minifreak_vst_params.json",
    "data/minifreak_internal_params.json",
    "data/minifreak_fx_presets_params.json",
];

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "preset-diff",
    version,
    about = "Decode synthesizer preset dumps and show how they differ from a default preset"
)]
struct Cli {
    /// Log decoding and table activity to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a preset and report the parameters that differ from the default
    /// preset.
    Diff(DiffArgs),

    /// Decode a preset and print its metadata and raw parameters.
    Decode {
        #[command(flatten)]
        input: InputArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Yaml)]
        format: DecodeFormat,
    },
}

/// Where the preset comes from and how its header is laid out.
#[derive(Args, Debug)]
struct InputArgs {
    /// Preset dump, or a zip archive containing one.
    file: PathBuf,
    /// Command sequence describing the header layout.
    #[arg(long, default_value = DEFAULT_SEQUENCE)]
    sequence: String,
    /// Directory inside a zip archive that holds the preset.
    #[arg(long, default_value = "MiniFreak/")]
    directory_path: String,
}

#[derive(Args, Debug)]
struct DiffArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Reference preset the report is computed against.
    #[arg(long, alias = "default_file", default_value = "data/Default")]
    default_file: PathBuf,
    /// Parameter table, repeatable; earlier tables take priority.
    #[arg(long = "tables", value_name = "PATH", default_values = DEFAULT_TABLES)]
    tables: Vec<PathBuf>,
    /// Version suffix used to look up item lists (`<param>_V<version>`).
    #[arg(long, default_value = DEFAULT_ITEM_LIST_VERSION)]
    item_list_version: String,
    /// Show every parameter, not only those that differ from the default.
    #[arg(long)]
    show_all: bool,
    /// Leave default values and percent change out of the output.
    #[arg(long)]
    hide_default_value: bool,
    /// Include raw values in the output.
    #[arg(long)]
    debug: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
    format: ReportFormat,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Diff(args) => cmd_diff(&args)?,
        Cmd::Decode { input, format } => cmd_decode(&input, format)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_diff(args: &DiffArgs) -> Result<()> {
    let sequence = parse_sequence(&args.input.sequence)?;
    let decode = DecodeConfig::default();

    let cache = TableCache::new();
    let resolver = DisplayResolver::from_paths(
        &cache,
        &args.tables,
        ResolveConfig::with_version(&args.item_list_version),
    )
    .context("failed to load parameter tables")?;

    let default_bytes = source::read_plain(&args.default_file)?;
    let defaults = decode_or_render(&default_bytes, &args.default_file, &sequence, &decode)?;

    let preset_bytes = source::read_preset(&args.input.file, &args.input.directory_path)?;
    let preset = decode_or_render(&preset_bytes, &args.input.file, &sequence, &decode)?;

    let options = ReportOptions::default().show_all(args.show_all);
    let report = build_report(&preset.params, &defaults.params, &resolver, &options);
    tracing::debug!(
        lines = report.lines.len(),
        skipped = report.skipped.len(),
        tables = cache.len(),
        "built report"
    );

    let render = RenderOptions {
        debug: args.debug,
        hide_default_value: args.hide_default_value,
    };
    print!(
        "{}",
        render::render_diff(&preset.metadata, &report, args.format, render)?
    );
    Ok(())
}

fn cmd_decode(input: &InputArgs, format: DecodeFormat) -> Result<()> {
    let sequence = parse_sequence(&input.sequence)?;
    let bytes = source::read_preset(&input.file, &input.directory_path)?;
    let decoded = decode_or_render(&bytes, &input.file, &sequence, &DecodeConfig::default())?;
    print!("{}", render::render_decoded(&decoded, format)?);
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn parse_sequence(text: &str) -> Result<CommandSequence> {
    text.parse()
        .with_context(|| format!("invalid command sequence {text:?}"))
}

/// Decode `bytes`, rendering the failing region to stderr on error.
fn decode_or_render(
    bytes: &[u8],
    path: &Path,
    sequence: &CommandSequence,
    config: &DecodeConfig,
) -> Result<DecodedPreset> {
    decode_preset(bytes, sequence, config).map_err(|e| {
        let name = path.display().to_string();
        render::render_decode_error(bytes, &name, &e);
        anyhow::Error::new(e).context(format!("failed to decode {name}"))
    })
}
