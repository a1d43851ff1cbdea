mod config;
mod logging;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use config::{LogFormat, load_settings};
use logging::init_logging;
use safeconv_core::{ConverterRegistry, Outcome, load_json_map, parse_color_with, safe_divide};
use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "safeconv", version, about = "Conversions with graceful fallback")]
struct Cli {
    /// Settings file (defaults to ./safeconv.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log output format, overriding settings.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Divide two numbers, falling back to 0.
    Divide(DivideArgs),
    /// Load a JSON object from a file, falling back to {}.
    LoadJson(LoadJsonArgs),
    /// Parse a color descriptor, falling back to black.
    Color(ColorArgs),
    /// Run a registered converter by name.
    Convert(ConvertArgs),
    /// List registered converters and palette names.
    List,
    /// Print the JSON Schema of the output envelope.
    Schema,
}

#[derive(Args, Debug)]
struct DivideArgs {
    #[arg(allow_hyphen_values = true)]
    numerator: String,
    #[arg(allow_hyphen_values = true)]
    denominator: String,
}

#[derive(Args, Debug)]
struct LoadJsonArgs {
    path: PathBuf,
}

#[derive(Args, Debug)]
struct ColorArgs {
    /// Hex (#RRGGBB, #RGB), name, rgb(r, g, b) or a JSON array/object.
    #[arg(allow_hyphen_values = true)]
    descriptor: String,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    name: String,
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        settings.log.format = format;
    }
    if let Some(file) = cli.log_file {
        settings.log.file = Some(file);
    }
    init_logging(&settings.log)?;

    tracing::debug!(
        event = "settings_loaded",
        extra_colors = settings.colors.len(),
        log_format = ?settings.log.format
    );

    let registry = ConverterRegistry::new(settings.palette());
    let name = command_name(&cli.command);
    let timer = Instant::now();

    let report = execute(cli.command, &registry)?;
    println!("{}", serde_json::to_string_pretty(&report.output)?);

    tracing::info!(
        event = "command_finished",
        command = name,
        status = if report.recovered { "fallback" } else { "success" },
        duration_ms = timer.elapsed().as_millis()
    );

    Ok(())
}

struct Report {
    output: Value,
    recovered: bool,
}

impl Report {
    fn from_outcome<T: Serialize>(outcome: Outcome<T>) -> CliResult<Self> {
        let recovered = !outcome.is_success();
        Ok(Self {
            output: serde_json::to_value(&outcome)?,
            recovered,
        })
    }

    fn plain(output: Value) -> Self {
        Self {
            output,
            recovered: false,
        }
    }
}

fn execute(command: Command, registry: &ConverterRegistry) -> CliResult<Report> {
    match command {
        Command::Divide(args) => Report::from_outcome(safe_divide(
            &parse_arg(&args.numerator),
            &parse_arg(&args.denominator),
        )),
        Command::LoadJson(args) => Report::from_outcome(load_json_map(&args.path)),
        Command::Color(args) => Report::from_outcome(parse_color_with(
            registry.palette(),
            &parse_arg(&args.descriptor),
        )),
        Command::Convert(args) => {
            let values: Vec<Value> = args.args.iter().map(|raw| parse_arg(raw)).collect();
            Report::from_outcome(registry.convert(&args.name, &values))
        }
        Command::List => {
            let converters: Vec<Value> = registry
                .names()
                .into_iter()
                .map(|name| {
                    serde_json::json!({
                        "name": name,
                        "arity": registry.arity(name),
                    })
                })
                .collect();
            let colors: Vec<&str> = registry.palette().names().collect();
            Ok(Report::plain(serde_json::json!({
                "converters": converters,
                "colors": colors,
            })))
        }
        Command::Schema => {
            let schema = schema_for!(Outcome<Value>);
            Ok(Report::plain(serde_json::to_value(&schema)?))
        }
    }
}

/// Read a positional argument as JSON, or as a plain string when it is not JSON.
fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Divide(_) => "divide",
        Command::LoadJson(_) => "load-json",
        Command::Color(_) => "color",
        Command::Convert(_) => "convert",
        Command::List => "list",
        Command::Schema => "schema",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(argv: &[&str]) -> Report {
        let cli = Cli::try_parse_from(argv).expect("parse args");
        execute(cli.command, &ConverterRegistry::default()).expect("execute")
    }

    #[test]
    fn arguments_parse_as_json_or_text() {
        assert_eq!(parse_arg("3"), json!(3));
        assert_eq!(parse_arg("null"), Value::Null);
        assert_eq!(parse_arg("[300,-5,10]"), json!([300, -5, 10]));
        assert_eq!(parse_arg("blue"), json!("blue"));
        assert_eq!(parse_arg("#FF0000"), json!("#FF0000"));
    }

    #[test]
    fn divide_reports_value_and_diagnostic() {
        let report = run(&["safeconv", "divide", "-9", "3"]);
        assert!(!report.recovered);
        assert_eq!(report.output["value"], json!(-3.0));
        assert_eq!(report.output["diagnostic"], Value::Null);

        let report = run(&["safeconv", "divide", "1", "0"]);
        assert!(report.recovered);
        assert_eq!(report.output["value"], json!(0.0));
        assert_eq!(report.output["diagnostic"]["category"], json!("divide_by_zero"));
    }

    #[test]
    fn color_uses_json_descriptors() {
        let report = run(&["safeconv", "color", "[300,-5,10]"]);
        assert_eq!(report.output["value"], json!({"r": 255, "g": 0, "b": 10}));

        let report = run(&["safeconv", "color", "not a color"]);
        assert!(report.recovered);
        assert_eq!(report.output["diagnostic"]["category"], json!("unexpected_error"));
    }

    #[test]
    fn convert_dispatches_through_registry() {
        let report = run(&["safeconv", "convert", "to_bool", "yes"]);
        assert_eq!(report.output["value"], json!(true));

        let report = run(&["safeconv", "convert", "exec", "1"]);
        assert_eq!(report.output["value"], Value::Null);
        assert_eq!(report.output["diagnostic"]["category"], json!("unexpected_error"));
    }

    #[test]
    fn missing_json_file_is_recovered() {
        let path = std::env::temp_dir().join(format!("safeconv_cli_{}.json", uuid::Uuid::new_v4()));
        let path = path.display().to_string();
        let report = run(&["safeconv", "load-json", path.as_str()]);
        assert!(report.recovered);
        assert_eq!(report.output["value"], json!({}));
        assert_eq!(report.output["diagnostic"]["category"], json!("not_found"));
    }

    #[test]
    fn list_includes_converters_and_colors() {
        let report = run(&["safeconv", "list"]);
        let converters = report.output["converters"].as_array().expect("converters");
        assert_eq!(converters.len(), 6);
        assert_eq!(converters[0], json!({"name": "divide", "arity": 2}));
        let colors = report.output["colors"].as_array().expect("colors");
        assert!(colors.contains(&json!("blue")));
    }

    #[test]
    fn schema_describes_envelope() {
        let report = run(&["safeconv", "schema"]);
        assert!(report.output["properties"]["diagnostic"].is_object());
        assert!(report.output["properties"].get("value").is_some());
    }
}
