//! CLI command definitions

use crate::render::OutputFormat;
use clap::Args;

/// Render a pipeline document
#[derive(Debug, Args, Clone)]
pub struct RenderCommand {
    /// Path to generator YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Yaml)]
    pub format: FormatArg,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Fail when two different definitions share a name
    #[arg(long)]
    pub strict: bool,
}

/// Validate a generator configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to generator YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Output format argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
