//! sectionize: wrap a markdown document's headings into nested sections.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use sectionize::config::Config;
use sectionize::sectionize::{SectionizeError, Sectionizer};
use sectionize::{formats, input};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sectionize")]
#[command(about = "Nest flat heading-ranked documents into sections", long_about = None)]
struct Args {
    /// Markdown file to sectionize (reads stdin if omitted)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Load settings from this TOML file instead of sectionize.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit the rank-0 root section as the single output node
    #[arg(long)]
    root_section: bool,

    /// Metadata key for section ranks
    #[arg(long, value_name = "KEY")]
    rank_property: Option<String>,

    /// Metadata key for promoted section identifiers
    #[arg(long, value_name = "KEY")]
    id_property: Option<String>,

    /// Static property merged into every section
    #[arg(long, short = 'p', value_name = "KEY=VALUE", value_parser = parse_property)]
    property: Vec<(String, String)>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

/// Config file settings with command line overrides applied on top.
fn build_sectionizer(args: &Args, cfg: &Config) -> Result<Sectionizer, SectionizeError> {
    let mut options = cfg.to_options();
    if args.root_section {
        options.enable_root_section = true;
    }
    if let Some(key) = &args.rank_property {
        options.rank_property_name.clone_from(key);
    }
    if let Some(key) = &args.id_property {
        options.id_property_name.clone_from(key);
    }
    for (key, value) in &args.property {
        options
            .properties
            .insert(key.clone(), Value::from(value.as_str()));
    }
    Sectionizer::new(options)
}

/// `RUST_LOG` directives when set and valid, otherwise warnings only.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| "warn".into())
}

fn main() -> io::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref()).map_err(io::Error::other)?;
    let sectionizer = build_sectionizer(&args, &cfg).map_err(io::Error::other)?;

    let format = formats::markdown::MarkdownFormat;
    let fragment = match &args.path {
        Some(path) => input::read_fragment(path, &format),
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            input::parse_fragment(&source, &format)
        }
    }
    .map_err(io::Error::other)?;

    let result = sectionizer.run(fragment).map_err(io::Error::other)?;

    let json = if args.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{json}")
}

#[cfg(test)]
#[path = "tests/main.rs"]
mod tests;
