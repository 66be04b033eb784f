//! nub: smart context compression for AI agents.
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::Parser;
use nub::config::Config;
use nub::dom::Node;
use nub::engine::{compress, CharBudget, Options};
use nub::error::Error;
use nub::formats::{folder::FolderFormat, Format, Registry};
use nub::input::{read_input, Input};
use nub::output::{apply_limit, join_lines};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nub")]
#[command(about = "Smart context compression for AI agents", long_about = None)]
struct Args {
    /// Input file or directory (reads from stdin if not provided)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Output shape as WIDTH:HEIGHT (e.g., 120:100 for 120 chars x 100 lines)
    #[arg(long, short = 's', default_value = "120:100")]
    shape: String,

    /// Line range (supports fractional ends: 100:200, 50.0:80.5)
    #[arg(long, short = 'r')]
    range: Option<String>,

    /// Regex pattern to boost matching content
    #[arg(long, short = 'g')]
    grep: Option<String>,

    /// Wrap long lines at this width, creating fractional line addresses
    #[arg(long, short = 'w')]
    wrap: Option<usize>,

    /// Remove lines whose word 3-grams all appeared earlier
    #[arg(long, short = 'd')]
    deduplicate: bool,

    /// Disable line numbers (shown by default)
    #[arg(
        long = "no-line-numbers",
        short = 'N',
        action = clap::ArgAction::SetFalse,
        default_value_t = true
    )]
    line_numbers: bool,

    /// Maximum output characters; 0 disables the cap
    #[arg(long, default_value_t = 10_000)]
    limit: usize,

    /// Force format type (e.g., text, python, markdown, mindmap)
    #[arg(long = "type", value_name = "FMT")]
    format_type: Option<String>,

    /// Softmax temperature override
    #[arg(long, hide = true)]
    temperature: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            match e.downcast_ref::<Error>() {
                Some(Error::InvalidOption(_)) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let cfg = Config::load();
    let (width, height) = parse_shape(&args.shape)?;
    let budget = CharBudget::new(width, height);

    let mut options = Options::from_config(&cfg);
    options.grep_pattern = args.grep.clone();
    options.line_numbers = args.line_numbers;
    options.wrap_width = args.wrap;
    options.deduplicate = options.deduplicate || args.deduplicate;
    if let Some(t) = args.temperature {
        options.temperature = t;
    }

    let input = read_input(args.path.as_deref(), &cfg).context("reading input")?;

    let folder = FolderFormat::new(&cfg);
    let registry = Registry::with_defaults(&cfg);

    let is_directory = matches!(input, Input::Directory(_));
    let (tree, format): (Node, &dyn Format) = match input {
        Input::Directory(path) => (folder.parse_path(&path)?, &folder),
        Input::Content { text, filename } => {
            let format = match &args.format_type {
                Some(name) => registry
                    .by_name(name)
                    .or_else(|| registry.by_extension(name))
                    .ok_or_else(|| Error::InvalidOption(format!("unknown format: {name}")))?,
                None => registry.select(&text, filename.as_deref()),
            };
            // Parse failures fall back to the text format rather than failing.
            match format.parse(&text) {
                Ok(tree) => (tree, format),
                Err(_) => {
                    let fallback = registry
                        .by_name("text")
                        .ok_or_else(|| Error::Parse("no text fallback".to_string()))?;
                    (fallback.parse(&text)?, fallback)
                }
            }
        }
    };

    let tree = match &args.range {
        Some(raw) => {
            let (start, end) = parse_range(raw)?;
            let mut pruned = tree
                .prune_range(start, end)
                .ok_or_else(|| Error::Parse("no content after range selection".to_string()))?;
            pruned.seal();
            pruned
        }
        None => tree,
    };

    let mut lines = compress(&tree, budget, &options, format)?;

    // Directory listings honor the height as a line count as well.
    if is_directory && lines.len() > height as usize {
        lines.truncate(height as usize);
    }

    Ok(apply_limit(join_lines(&lines), args.limit))
}

/// Parse `WIDTH:HEIGHT` into positive dimensions.
fn parse_shape(shape: &str) -> Result<(u32, u32), Error> {
    let invalid = || {
        Error::InvalidOption(format!(
            "invalid shape: {shape}. Use WIDTH:HEIGHT (e.g., 120:100)"
        ))
    };
    let (w, h) = shape.split_once(':').ok_or_else(invalid)?;
    let width: u32 = w.parse().map_err(|_| invalid())?;
    let height: u32 = h.parse().map_err(|_| invalid())?;
    if width < 1 || height < 1 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Parse `START:END` with fractional endpoints allowed.
fn parse_range(range: &str) -> Result<(f64, f64), Error> {
    let invalid = || {
        Error::InvalidOption(format!(
            "invalid range: {range}. Use START:END (e.g., 1.0:5.0 or 100:200)"
        ))
    };
    let (s, e) = range.split_once(':').ok_or_else(invalid)?;
    let start: f64 = s.parse().map_err(|_| invalid())?;
    let end: f64 = e.parse().map_err(|_| invalid())?;
    if start < 1.0 {
        return Err(Error::InvalidOption(format!(
            "start line must be >= 1.0, got {start}"
        )));
    }
    if end < start {
        return Err(Error::InvalidOption(format!(
            "end line must be >= start line, got {range}"
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
#[path = "tests/cli.rs"]
mod tests;
