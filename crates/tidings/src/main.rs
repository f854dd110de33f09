//! The `tidings` binary: load a template and a fact snapshot, render once
//! to stdout. Data collection happens elsewhere; this end only formats.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tidings_render::{render, ColorChoice, InfoStore, RenderOptions, TemplateConfig};

#[derive(Parser, Debug)]
#[command(name = "tidings")]
#[command(about = "Renders a templated message-of-the-day from collected host facts")]
struct Args {
    /// Template JSON; the built-in layout is used when omitted
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Collected facts as a JSON array of {"id", "value"} objects
    #[arg(short, long)]
    info: PathBuf,

    /// When to emit ANSI colors
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorArg,

    /// Log dropped items and unresolved placeholders to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Auto,
    Always,
    Never,
    /// Echo color specs as literal [color:...] markers
    Debug,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => ColorChoice::Auto,
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
            ColorArg::Debug => ColorChoice::Debug,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    print!("{}", run(&args)?);
    Ok(())
}

fn run(args: &Args) -> Result<String> {
    let config = match &args.template {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading template {}", path.display()))?;
            TemplateConfig::from_json(&json)
                .with_context(|| format!("parsing template {}", path.display()))?
        }
        None => TemplateConfig::default(),
    };

    let json = fs::read_to_string(&args.info)
        .with_context(|| format!("reading snapshot {}", args.info.display()))?;
    let store = InfoStore::from_json(&json)
        .with_context(|| format!("parsing snapshot {}", args.info.display()))?;

    let options = RenderOptions {
        color: args.color.into(),
    };
    Ok(render(&config, &store, &options)?)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "tidings_render=debug,tidings_markup=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
