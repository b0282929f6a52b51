mod batch;
mod error;
mod logs;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use fgd_core::lexer::Tokenizer;

use crate::batch::BatchOptions;
use crate::error::CliError;

/// Output format for diagnostics and the token dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Forge Game Data (FGD) parser.
#[derive(Parser)]
#[command(name = "fgd", version, about = "Convert Forge Game Data files to JSON")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Only log errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse FGD files into JSON documents
    Parse {
        /// Files or directories (searched recursively)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for `<name>.json` outputs (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
        /// File extension selected inside directories
        #[arg(long, default_value = "fgd")]
        ext: String,
        /// Prefix removed from file names to form the document name
        #[arg(long)]
        strip_prefix: Option<String>,
        /// Suffix removed from file names (default: `.<ext>`)
        #[arg(long)]
        strip_suffix: Option<String>,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the token stream of one file
    Tokens {
        /// Path to the .fgd source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logs::init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Parse {
            inputs,
            out,
            ext,
            strip_prefix,
            strip_suffix,
            pretty,
        } => {
            let opts = BatchOptions {
                out: out.as_deref(),
                ext: ext.trim_start_matches('.'),
                strip_prefix: strip_prefix.as_deref(),
                strip_suffix: strip_suffix.as_deref(),
                pretty,
            };
            cmd_parse(&inputs, &opts, cli.output, cli.quiet);
        }
        Commands::Tokens { file } => {
            cmd_tokens(&file, cli.output, cli.quiet);
        }
    }
}

fn cmd_parse(inputs: &[PathBuf], opts: &BatchOptions<'_>, output: OutputFormat, quiet: bool) {
    match batch::run(inputs, opts) {
        Ok(summary) if summary.failed == 0 => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    }
}

fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) {
    if let Err(e) = dump_tokens(file, output) {
        report_error(&e, output, quiet);
        process::exit(1);
    }
}

fn dump_tokens(file: &Path, output: OutputFormat) -> Result<(), CliError> {
    let src = std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    let mut rows = Vec::new();
    for token in Tokenizer::new(&src) {
        let token = token.map_err(|source| CliError::Parse {
            path: file.to_path_buf(),
            source,
        })?;
        match output {
            OutputFormat::Text => {
                println!("{} {} {}", token.kind, token.span, token.text(&src));
            }
            OutputFormat::Json => rows.push(serde_json::json!({
                "kind": token.kind.as_str(),
                "span": token.span.to_string(),
                "text": token.text(&src),
            })),
        }
    }
    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

pub(crate) fn report_error(err: &CliError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", err),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&err.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err));
            eprintln!("{}", json);
        }
    }
}
