//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use payloadforge_core::{PipelineConfig, input, pipeline};
use payloadforge_shared::{
    AppConfig, PayloadForgeError, UpstreamItem, init_config, load_config, load_config_from,
    render_config,
};
use serde_json::Value;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// payloadforge — turn agent output into PayloadCMS-ready records.
#[derive(Parser)]
#[command(
    name = "payloadforge",
    version,
    about = "Extract the JSON object from language-model output and normalize it for PayloadCMS.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.payloadforge/payloadforge.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the full transform and print the one-element output array.
    Parse {
        /// Input file (reads stdin when omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Treat the input as raw agent text instead of upstream items.
        #[arg(long)]
        raw: bool,

        /// Pretty-print the output.
        #[arg(long)]
        pretty: bool,
    },

    /// Only extract the JSON object from raw agent text.
    Extract {
        /// Input file (reads stdin when omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// only command output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "payloadforge=info",
        1 => "payloadforge=debug",
        _ => "payloadforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { input, raw, pretty } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_parse(&config, input.as_deref(), raw, pretty)
        }
        Command::Extract { input } => cmd_extract(input.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
    }
}

/// Load the config from an explicit path, or from the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Read the whole input from a file, or from stdin when no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| PayloadForgeError::io(path, e))?;
            Ok(content)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| PayloadForgeError::io("<stdin>", e))?;
            Ok(buf)
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_parse(config: &AppConfig, path: Option<&Path>, raw: bool, pretty: bool) -> Result<()> {
    let content = read_input(path)?;
    let pipeline_config = PipelineConfig::from(config);

    let outcome = if raw {
        pipeline::run_text(&content, &pipeline_config.normalize)
    } else {
        let items = parse_items(&content)?;
        info!(items = items.len(), "read upstream items");
        pipeline::run(&items, &pipeline_config)
    };

    if let Err(error) = &outcome {
        info!(error = %error.error, "transform produced an error record");
    }

    let output = pipeline::to_output(&outcome);
    println!("{}", render_json(&Value::Array(output), pretty)?);
    Ok(())
}

fn cmd_extract(path: Option<&Path>) -> Result<()> {
    let content = read_input(path)?;
    let value = payloadforge_extract::parse_json_object(&content)
        .map_err(PayloadForgeError::from)?;
    println!("{}", render_json(&value, true)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    println!("{}", render_config(&config)?);
    Ok(())
}

/// Parse upstream items from a JSON document.
fn parse_items(content: &str) -> Result<Vec<UpstreamItem>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| eyre!("input is not valid JSON (use --raw for agent text): {e}"))?;
    Ok(input::items_from_value(value)?)
}

fn render_json(value: &Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommand_flags() {
        let cli = Cli::try_parse_from(["payloadforge", "parse", "--raw", "--pretty", "-i", "out.txt"])
            .expect("parse args");
        match cli.command {
            Command::Parse { input, raw, pretty } => {
                assert_eq!(input, Some(PathBuf::from("out.txt")));
                assert!(raw);
                assert!(pretty);
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["payloadforge", "extract", "-vv", "--log-format", "json"])
            .expect("parse args");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }

    #[test]
    fn parse_items_accepts_array_and_object() {
        assert_eq!(parse_items(r#"[{"output": "a"}, {"text": "b"}]"#).unwrap().len(), 2);
        assert_eq!(parse_items(r#"{"output": "a"}"#).unwrap().len(), 1);
    }

    #[test]
    fn parse_items_rejects_plain_text() {
        let err = parse_items("Sure! {\"title\": \"x\"}").unwrap_err();
        assert!(err.to_string().contains("--raw"));
    }
}
