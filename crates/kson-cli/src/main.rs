//! `kson` CLI — format, check, validate and transcode KSON from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Reformat a document (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | kson fmt
//!
//! # Reformat in the delimited style with 4-space indents
//! kson fmt --style delimited --indent 4 -i config.kson
//!
//! # Check a document (parse + indent + duplicate keys)
//! kson check -i config.kson
//!
//! # Validate against a schema
//! kson validate --schema schema.kson -i config.kson
//!
//! # Transcode
//! kson to-json -i config.kson
//! kson to-yaml -i config.kson
//! ```
//!
//! Exit codes: 0 on success, 1 on parse/validation errors, 2 on usage
//! errors (the latter produced by clap).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kson_core::{analyze, format, FormatOptions, IndentStyle, Severity, Style};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(name = "kson", version, about = "KSON (JSON for humans) CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Plain,
    Delimited,
    Compact,
}

impl From<StyleArg> for Style {
    fn from(s: StyleArg) -> Style {
        match s {
            StyleArg::Plain => Style::Plain,
            StyleArg::Delimited => Style::Delimited,
            StyleArg::Compact => Style::Compact,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat a KSON document
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output style
        #[arg(long, value_enum, default_value = "plain")]
        style: StyleArg,
        /// Spaces per indent level
        #[arg(long, default_value_t = 2, conflicts_with = "tabs")]
        indent: usize,
        /// Indent with tabs instead of spaces
        #[arg(long)]
        tabs: bool,
    },
    /// Parse and report every diagnostic (syntax, indentation, duplicates)
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Validate a document against a JSON Schema (Draft-07) in KSON form
    Validate {
        /// Schema file
        #[arg(long)]
        schema: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Transcode KSON to JSON
    ToJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Transcode KSON to YAML
    ToYaml {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt {
            input,
            output,
            style,
            indent,
            tabs,
        } => {
            let text = read_input(input.as_deref())?;
            let analysis = analyze(&text);
            if analysis.value.is_none() {
                report_messages(&analysis.messages);
                process::exit(1);
            }
            let options = FormatOptions {
                indent: if tabs {
                    IndentStyle::Tabs
                } else {
                    IndentStyle::Spaces(indent)
                },
                style: style.into(),
            };
            write_output(output.as_deref(), &format(&text, &options))?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let analysis = analyze(&text);
            report_messages(&analysis.messages);
            if analysis
                .messages
                .iter()
                .any(|m| m.severity == Severity::Error)
            {
                process::exit(1);
            }
            eprintln!("ok");
        }
        Commands::Validate { schema, input } => {
            let schema_text = std::fs::read_to_string(&schema)
                .with_context(|| format!("Failed to read schema file: {schema}"))?;
            let parsed = kson_core::parse_schema(&schema_text);
            report_messages(&parsed.messages);
            let validator = match parsed.validator {
                Some(v) => v,
                None => process::exit(1),
            };
            let text = read_input(input.as_deref())?;
            let messages = validator.validate(&text);
            report_messages(&messages);
            if messages.iter().any(|m| m.severity == Severity::Error) {
                process::exit(1);
            }
            eprintln!("ok");
        }
        Commands::ToJson {
            input,
            output,
            pretty,
        } => {
            let text = read_input(input.as_deref())?;
            match kson_core::to_json(&text) {
                Ok(json) => {
                    let rendered = if pretty {
                        let value: serde_json::Value =
                            serde_json::from_str(&json).context("Internal JSON emission")?;
                        serde_json::to_string_pretty(&value)?
                    } else {
                        json
                    };
                    write_output(output.as_deref(), &rendered)?;
                }
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
        Commands::ToYaml { input, output } => {
            let text = read_input(input.as_deref())?;
            match kson_core::to_yaml(&text) {
                Ok(yaml) => write_output(output.as_deref(), &yaml)?,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Read from a file or stdin.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(p) => {
            std::fs::read_to_string(p).with_context(|| format!("Failed to read input file: {p}"))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Write to a file or stdout, newline-terminated.
fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            let mut owned = content.to_string();
            if !owned.ends_with('\n') {
                owned.push('\n');
            }
            std::fs::write(p, owned).with_context(|| format!("Failed to write output file: {p}"))
        }
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn report_messages(messages: &[kson_core::Message]) {
    for m in messages {
        let tag = match m.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("{tag}: {m}");
    }
}
