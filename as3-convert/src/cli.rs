use std::path::PathBuf;

use as3_convert::DeviceVersion;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "as3-convert")]
#[command(about = "Compile AS3 declarations into BIG-IP REST objects")]
pub struct Cli {
    /// Log pipeline stages to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compile an already-defaulted declaration into REST objects.
    Compile(CompileArgs),
    /// Classify a declaration and list what the parser found.
    Inspect(InspectArgs),
    /// Generate a field table from the vendor property file.
    FieldTable(FieldTableArgs),
}

#[derive(Parser, Debug)]
pub struct CompileArgs {
    pub input: PathBuf,
    /// Write the object set as JSON to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// TOML settings file.
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Target device version; overrides the settings file.
    #[arg(long)]
    pub device_version: Option<DeviceVersion>,
    /// Field table file; overrides the settings file.
    #[arg(long)]
    pub field_table: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print per-namespace counts only.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct FieldTableArgs {
    /// Vendor property JSON.
    pub vendor: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
    /// Replace an existing output file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
