//! scriptlet CLI — transpile `<% %>` templates into executable scripts.
//!
//! Provides four commands: `transpile`, `check`, `presets`, and `init`.
//!
//! Wrapper strings come from, in order of precedence: the per-field flags, an
//! explicit `--preset`, the config file, the template's file extension, and
//! finally the default `embedded-javascript` preset.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scriptlet",
    about = "Transpile <% %> templates into executable scripts",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to scriptlet.config.json (default: ./scriptlet.config.json)
    #[arg(long, global = true, default_value = "scriptlet.config.json")]
    config: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile a template into a script
    Transpile {
        /// Template file, or `-` for stdin
        input: PathBuf,

        #[command(flatten)]
        wrappers: WrapperArgs,

        /// Write the script here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Abort if transpiling takes longer than this many milliseconds
        #[arg(long, env = "SCRIPTLET_TIMEOUT_MS")]
        timeout_ms: Option<u64>,
    },

    /// Check that templates transpile without errors
    Check {
        /// Template files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        wrappers: WrapperArgs,
    },

    /// List the built-in delimiter presets
    Presets {
        /// Print the presets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default scriptlet.config.json
    Init,
}

/// Wrapper selection shared by commands that transpile.
///
/// Backslash escapes (`\n`, `\t`, `\r`, `\\`, `\"`) in the per-field flags are
/// interpreted, so `--output-end '");\n'` ends each statement with a newline.
#[derive(Args, Clone, Debug, Default)]
pub struct WrapperArgs {
    /// Delimiter preset
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,

    /// Text that opens an emit-literal statement
    #[arg(long, allow_hyphen_values = true)]
    output_start: Option<String>,

    /// Text that closes an emit-literal statement
    #[arg(long, allow_hyphen_values = true)]
    output_end: Option<String>,

    /// Text that opens an emit-expression statement
    #[arg(long, allow_hyphen_values = true)]
    expr_start: Option<String>,

    /// Text that closes an emit-expression statement
    #[arg(long, allow_hyphen_values = true)]
    expr_end: Option<String>,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum PresetChoice {
    EmbeddedJavascript,
    Print,
    Markers,
}

impl PresetChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmbeddedJavascript => "embedded-javascript",
            Self::Print => "print",
            Self::Markers => "markers",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Transpile {
            input,
            wrappers,
            output,
            timeout_ms,
        } => {
            commands::transpile::run(&cli.config, &input, &wrappers, output.as_deref(), timeout_ms)
                .await?;
        }
        Commands::Check { files, wrappers } => {
            commands::check::run(&cli.config, &files, &wrappers)?;
        }
        Commands::Presets { json } => {
            commands::presets::run(json)?;
        }
        Commands::Init => {
            commands::init::run(&cli.config)?;
        }
    }

    Ok(())
}
