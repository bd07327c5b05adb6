use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use querylens::config::{self, AppConfig};
use querylens::decorate::decorate;
use querylens::highlight::{hover_at, project};
use querylens::output;
use querylens::query::{PatternKind, ScanOptions, Sequence, parse, scan};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "QUERYLENS_LOG";

#[derive(Parser)]
#[command(name = "querylens")]
#[command(about = "Scan, parse and highlight search queries", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Treat `//` as the start of a line comment
    #[arg(long, global = true)]
    comments: bool,

    /// Pattern type for scanned patterns (literal, regexp, structural)
    #[arg(long, global = true, value_name = "TYPE")]
    pattern_type: Option<PatternKind>,

    /// Skip meta-decoration of regexp and structural patterns
    #[arg(long, global = true)]
    no_decorate: bool,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scanned token sequence
    Scan {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the parse tree as S-expressions
    Parse {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the token sequence after meta-decoration
    Decorate {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Print highlight scopes as `offset scope` pairs
    Tokens {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the query with syntax highlighting
    Highlight { query: String },
    /// Print the hover text at a column
    Hover {
        query: String,
        /// 1-based column of the cursor
        #[arg(long)]
        column: usize,
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration and the config file location
    Config,
    /// Live query playground
    #[cfg(feature = "interactive")]
    Interactive {
        /// Initial query
        query: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self, is_terminal: bool) -> ColorChoice {
        match self {
            ColorMode::Auto if is_terminal => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    #[cfg(feature = "interactive")]
    let interactive = matches!(cli.command, Commands::Interactive { .. });
    #[cfg(not(feature = "interactive"))]
    let interactive = false;

    // A subscriber writing to the terminal would corrupt the playground
    if !interactive {
        init_tracing();
    }

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if cli.comments {
        config.interpret_comments = true;
    }
    if let Some(kind) = cli.pattern_type {
        config.pattern_type = kind;
    }
    if cli.no_decorate {
        config.decorate = false;
    }

    let mut stdout = StandardStream::stdout(cli.color.choice(io::stdout().is_terminal()));
    let mut stderr = StandardStream::stderr(cli.color.choice(io::stderr().is_terminal()));

    run(cli.command, &config, &mut stdout, &mut stderr)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(
    command: Commands,
    config: &AppConfig,
    stdout: &mut StandardStream,
    stderr: &mut StandardStream,
) -> Result<ExitCode> {
    let options = config.scan_options();

    match command {
        Commands::Scan { query, json } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            if json {
                write_json(stdout, &sequence)?;
            } else {
                output::print_tokens(stdout, &query, &sequence)?;
            }
        }
        Commands::Parse { query, json } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            let nodes = match parse(&sequence) {
                Ok(nodes) => nodes,
                Err(err) => {
                    output::print_error(stderr, &query, None, &err.to_string())?;
                    return Ok(ExitCode::FAILURE);
                }
            };
            if json {
                write_json(stdout, &nodes)?;
            } else {
                output::print_nodes(stdout, &nodes)?;
            }
        }
        Commands::Decorate { query, json } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            let decorated = decorate_if(config, sequence);
            if json {
                write_json(stdout, &decorated)?;
            } else {
                output::print_tokens(stdout, &query, &decorated)?;
            }
        }
        Commands::Tokens { query, json } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            let scoped = project(&decorate_if(config, sequence));
            if json {
                write_json(stdout, &scoped)?;
            } else {
                output::print_scoped(stdout, &scoped)?;
            }
        }
        Commands::Highlight { query } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            let scoped = project(&decorate_if(config, sequence));
            output::print_highlighted(stdout, &query, &scoped)?;
        }
        Commands::Hover {
            query,
            column,
            json,
        } => {
            let Some(sequence) = scan_query(stderr, &query, &options)? else {
                return Ok(ExitCode::FAILURE);
            };
            let hover = hover_at(&decorate_if(config, sequence), column);
            match (hover, json) {
                (hover, true) => write_json(stdout, &hover)?,
                (Some(hover), false) => output::print_hover(stdout, &query, &hover)?,
                (None, false) => {}
            }
        }
        Commands::Config => {
            let path = config::get_config_path()?;
            writeln!(stdout, "# {}", path.display())?;
            write_json(stdout, config)?;
        }
        #[cfg(feature = "interactive")]
        Commands::Interactive { query } => {
            querylens::tui::run(config.clone(), query)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Scan, reporting a failure on stderr
fn scan_query(
    stderr: &mut StandardStream,
    query: &str,
    options: &ScanOptions,
) -> Result<Option<Sequence>> {
    match scan(query, options) {
        Ok(sequence) => Ok(Some(sequence)),
        Err(err) => {
            output::print_error(stderr, query, Some(err.at), &err.to_string())?;
            Ok(None)
        }
    }
}

fn decorate_if(config: &AppConfig, sequence: Sequence) -> Sequence {
    if config.decorate {
        decorate(&sequence)
    } else {
        sequence
    }
}

fn write_json<T: Serialize + ?Sized>(stdout: &mut StandardStream, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *stdout, value).context("Failed to serialize output")?;
    writeln!(stdout)?;
    Ok(())
}
