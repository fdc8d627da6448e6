// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use srtstream::app_config::{self, Config};
use srtstream::app_controller::{Controller, EventFraming};
use srtstream::providers::ApiKey;
use srtstream::translation::{PipelineState, TranslationRequestContext};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Credentials and per-request overrides shared by model-calling commands
#[derive(Args, Debug)]
struct RequestArgs {
    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model name, overrides the configured default
    #[arg(short, long)]
    model: Option<String>,

    /// File holding a prompt template with a {chunk} placeholder
    #[arg(short, long, value_name = "FILE")]
    prompt_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum DictionaryCommand {
    /// Print the dictionary
    Show,

    /// Add or replace a term
    Set {
        term: String,
        value: String,
    },

    /// Remove a term
    Remove {
        term: String,
    },

    /// Replace the dictionary with the contents of a JSON file
    Import {
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT file, streaming one event per block to stdout
    Translate {
        /// Subtitle file to translate
        #[arg(value_name = "FILE")]
        input_path: PathBuf,

        #[command(flatten)]
        request: RequestArgs,

        /// Pause after each block in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Frame events as server-sent events instead of JSON lines
        #[arg(long)]
        sse: bool,

        /// Emit an event for every block that fails to parse
        #[arg(long)]
        report_skipped: bool,
    },

    /// Translate a single block of text again
    Retry {
        /// Original block text
        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        request: RequestArgs,
    },

    /// Inspect or edit the terminology dictionary
    Dictionary {
        #[command(subcommand)]
        command: DictionaryCommand,
    },

    /// Check the API key and model with a minimal request
    Check {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Generate shell completions for srtstream
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtstream - Streaming SRT subtitle translation
///
/// Translates SRT files block by block through Google Gemini, applying a
/// terminology dictionary and streaming progress as it goes.
#[derive(Parser, Debug)]
#[command(name = "srtstream")]
#[command(version)]
#[command(about = "Streaming SRT subtitle translator")]
#[command(long_about = "srtstream translates SRT subtitle files block by block with a language model.

EXAMPLES:
    srtstream translate movie.srt                      # Translate using default config
    srtstream translate -m gemini-1.5-pro movie.srt    # Use a specific model
    srtstream translate --sse --delay-ms 0 movie.srt   # SSE frames, no pacing
    srtstream retry --text \"Hello there\"               # Translate one block again
    srtstream dictionary set Jedi Jedi                 # Pin a term
    srtstream completions bash > srtstream.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The API key is read from --api-key or the
    GEMINI_API_KEY environment variable and is never stored.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    // Stdout carries the event stream, so every log line goes to stderr
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(2);
        }
    }
}

// @returns: Whether the command succeeded
async fn run(cli: CommandLineOptions) -> Result<bool> {
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtstream", &mut std::io::stdout());
        return Ok(true);
    }

    let mut config = Config::load_or_create(&cli.config)?;

    // Command line overrides
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Commands::Translate { delay_ms, report_skipped, .. } = &cli.command {
        if let Some(delay_ms) = delay_ms {
            config.translation.inter_block_delay_ms = *delay_ms;
        }
        if *report_skipped {
            config.translation.report_skipped_blocks = true;
        }
    }

    config.validate()
        .context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Translate { input_path, request, sse, .. } => {
            let request = build_request(&controller, request)?;
            let framing = if sse { EventFraming::Sse } else { EventFraming::JsonLines };
            let report = controller.translate(&input_path, request, framing, &mut stdout).await?;
            Ok(report.state == PipelineState::Done)
        }
        Commands::Retry { text, request } => {
            let request = build_request(&controller, request)?;
            controller.retry(&text, &request, &mut stdout).await
        }
        Commands::Dictionary { command } => {
            match command {
                DictionaryCommand::Show => controller.show_dictionary(&mut stdout)?,
                DictionaryCommand::Set { term, value } => controller.set_dictionary_entry(&term, &value)?,
                DictionaryCommand::Remove { term } => {
                    if !controller.remove_dictionary_entry(&term)? {
                        return Ok(false);
                    }
                }
                DictionaryCommand::Import { file } => {
                    controller.import_dictionary(&file)?;
                }
            }
            Ok(true)
        }
        Commands::Check { request } => {
            let request = build_request(&controller, request)?;
            controller.check_connection(&request).await?;
            Ok(true)
        }
        Commands::Completions { .. } => Ok(true),
    }
}

fn build_request(controller: &Controller, args: RequestArgs) -> Result<TranslationRequestContext> {
    controller.request_context(ApiKey::new(args.api_key), args.model, args.prompt_file.as_deref())
}
