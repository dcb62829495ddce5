// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// The binary only drives the inspection surface; the rest of the library
// compiles here too because the modules are shared with lib.rs
#![allow(dead_code)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;
use timecode::TimeCode;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod markup;
mod negotiation;
mod script;
mod store;
mod timecode;

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

fn level_filter(level: app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect a subtitle script (default command)
    #[command(alias = "inspect")]
    Inspect(InspectArgs),

    /// Check every subtitle script under a directory
    Check {
        /// Directory to scan for .srt files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(short, long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Generate shell completions for subburn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Subtitle script file to inspect
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: PathBuf,

    /// Print the entries active at this timecode (HH:MM:SS,mmm)
    #[arg(short, long)]
    at: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subburn - subtitle burn-in core
///
/// Parses SubRip-style subtitle scripts into a time-indexed store of styled
/// entries and reports what a renderer would draw at any playback instant.
#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(version = "0.3.0")]
#[command(about = "Subtitle script inspection tool")]
#[command(long_about = "subburn parses SubRip-style subtitle scripts into a time-indexed store
of styled entries and reports what a renderer would draw at any playback instant.

EXAMPLES:
    subburn movie.srt                          # Parse and summarize a script
    subburn movie.srt --at 00:01:02,500        # Show entries active at a timecode
    subburn check /subtitles/                  # Validate every script in a folder
    subburn --log-level debug movie.srt        # Inspect with debug logging
    subburn completions bash > subburn.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. It carries the high/standard bit depth
    format classes used by the pipeline negotiation stage and the script parse
    policy (strict or lenient).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle script file to inspect
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: Option<PathBuf>,

    /// Print the entries active at this timecode (HH:MM:SS,mmm)
    #[arg(short, long)]
    at: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subburn", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Check {
            dir,
            config_path,
            log_level,
        }) => {
            let config = load_config(&config_path, log_level)?;
            let controller = Controller::with_config(config)?;
            controller.check_folder(dir)?;
            Ok(())
        }
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let script_path = cli
                .script_path
                .ok_or_else(|| anyhow!("SCRIPT_PATH is required when no subcommand is specified"))?;

            let inspect_args = InspectArgs {
                script_path,
                at: cli.at,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_inspect(inspect_args)
        }
    }
}

fn run_inspect(options: InspectArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level)?;

    let at = options
        .at
        .as_deref()
        .map(TimeCode::parse)
        .transpose()
        .map_err(|e| anyhow!("Invalid --at timecode: {}", e))?;

    let controller = Controller::with_config(config)?;
    controller.inspect(options.script_path, at)
}

// Load the configuration, creating a default file when none exists, and
// apply the effective log level
fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli_log_level {
        log::set_max_level(level_filter(cmd_log_level.clone().into()));
    }

    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        config
            .save(config_path)
            .context("Failed to write default config")?;
        config
    };

    // Override config with CLI options if provided
    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.into();
    } else {
        // If log level was not set via command line, update it from config now
        log::set_max_level(level_filter(config.log_level));
    }

    Ok(config)
}
