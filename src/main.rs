// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use doctrans::app_config::{Config, LogLevel};
use doctrans::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for doctrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// doctrans - Incremental documentation translation
///
/// Translates the source-language documentation tree into every configured
/// target language with an OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "doctrans")]
#[command(version)]
#[command(about = "Incremental AI-powered documentation translation")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "doctrans translates Markdown/MDX documentation from the source-language
directory into one directory per target language.

EXAMPLES:
    doctrans                                   # Translate every changed or missing page
    doctrans content/docs/zh/guide/intro.md    # Translate a single page
    doctrans --force                           # Retranslate everything except manual edits
    doctrans --no-incremental                  # Only fill in missing translations
    doctrans --workers 5 --log-level debug     # More concurrency, verbose output
    doctrans completions bash > doctrans.bash  # Generate bash completions

CONFIGURATION:
    Configuration is read from the environment. OPENAI_API_KEY is required;
    OPENAI_BASE_URL, OPENAI_MODEL, MAX_RETRIES, RETRY_DELAY, RETRY_BACKOFF,
    MAX_WORKERS, FORCE_TRANSLATE, INCREMENTAL_TRANSLATE, DOCS_DIR,
    SOURCE_LANGUAGE, TARGET_LANGUAGES, REQUEST_TIMEOUT_SECS, VCS_DIFF_BASE,
    VCS_DIFF_HEAD and LOG_LEVEL are optional. Command line flags take
    precedence over the environment.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source documents to translate (default: the whole source tree)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Retranslate existing translations (manual translations are kept)
    #[arg(short, long)]
    force: bool,

    /// Disable change detection; only missing translations are created
    #[arg(long)]
    no_incremental: bool,

    /// Number of tasks translated concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Directory holding one subdirectory per language
    #[arg(short = 'd', long)]
    content_root: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    // @applies: Command line overrides on top of the environment
    fn apply_to(&self, config: &mut Config) {
        if self.force {
            config.force_translate = true;
        }
        if self.no_incremental {
            config.incremental_translate = false;
        }
        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if let Some(content_root) = &self.content_root {
            config.content_root = content_root.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone().into();
        }
    }
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

    // @returns: Symbol and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("✗", "1;31"),
            Level::Warn => ("!", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("·", "1;36"),
            Level::Trace => ("…", "1;35"),
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
            let (symbol, colour) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                symbol,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set via max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "doctrans", &mut std::io::stdout());
        return Ok(());
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config);
    if let Err(e) = controller.run(&cli.files).await {
        error!("Translation run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

// @loads: Environment configuration with command line overrides, validated
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::from_env_unvalidated()?;
    cli.apply_to(&mut config);
    config.validate()?;

    let working_dir = std::env::current_dir()?;
    config.resolve_paths(&working_dir);
    Ok(config)
}
