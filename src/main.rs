#![deny(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use text_config::config::page::key_to_env_var;
use text_config::{ConfigPage, ConfigStore, TextConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Prc,
    Json,
}

#[derive(Parser)]
#[command(name = "text-config")]
#[command(version)]
#[command(about = "Resolve and print the text rendering configuration", long_about = None)]
struct Cli {
    /// Extra config page to load after the discovered ones (.prc or .json)
    #[arg(long = "prc", value_name = "FILE")]
    pages: Vec<PathBuf>,

    /// Explicit override, highest precedence
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    overrides: Vec<(String, String)>,

    /// Ignore TEXT_* environment variables
    #[arg(long)]
    no_env: bool,

    /// Do not scan the config directory
    #[arg(long)]
    no_default_files: bool,

    /// Fail on malformed values instead of falling back to defaults
    #[arg(long)]
    strict: bool,

    /// Output format for the effective configuration
    #[arg(long, value_enum, default_value_t = Format::Prc)]
    format: Format,

    /// List every variable with its type, default, environment name and description
    #[arg(long)]
    list: bool,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Expected KEY=VALUE, found '{}'", arg)),
    }
}

fn build_store(cli: &Cli) -> Result<ConfigStore> {
    let mut store = ConfigStore::new();

    if !cli.no_default_files {
        store.load_dir(&ConfigStore::default_dir())?;
    }
    for path in &cli.pages {
        if !path.is_file() {
            bail!("Config page {:?} does not exist", path);
        }
        store.add_page(ConfigPage::load(path)?);
    }
    if !cli.no_env {
        store = store.with_environment();
    }
    for (key, value) in &cli.overrides {
        store.set(key.as_str(), value.as_str());
    }

    Ok(store)
}

fn write_listing<W: Write>(mut out: W) -> io::Result<()> {
    for variable in TextConfig::variables() {
        writeln!(out, "{} ({})", variable.name, variable.type_name)?;
        writeln!(out, "    default: {:?}", variable.default)?;
        writeln!(out, "    env: {}", key_to_env_var(variable.name))?;
        writeln!(out, "    {}", variable.description)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a loadable page
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout().lock();

    if cli.list {
        return write_listing(stdout).context("Failed to write variable listing");
    }

    let store = build_store(&cli)?;
    let config = if cli.strict {
        TextConfig::from_store_strict(&store)?
    } else {
        TextConfig::from_store(&store)
    };

    match cli.format {
        Format::Prc => config
            .write_prc(stdout)
            .context("Failed to write prc output")?,
        Format::Json => {
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize config to JSON")?;
            let mut stdout = stdout;
            writeln!(stdout, "{}", json).context("Failed to write JSON output")?;
        }
    }

    Ok(())
}
