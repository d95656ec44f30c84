// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use kbp2ass::app_config::{self, LogLevel, OptionOverrides, Settings};
use kbp2ass::file_utils::{FileManager, FileType, STDIO_PATH};
use kbp2ass::{convert_to_ass, Fade};

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
    /// Generate shell completions for kbp2ass
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// kbp2ass - Karaoke Builder Studio to SubStation Alpha converter
///
/// Converts a KBS project file (.kbp) to an .ass subtitle with karaoke wipes.
#[derive(Parser, Debug)]
#[command(name = "kbp2ass")]
#[command(version)]
#[command(about = "Convert file from KBS project format (.kbp) to SubStation Alpha subtitle (.ass)")]
#[command(override_usage = "kbp2ass [OPTIONS] [infile [outfile]]
       kbp2ass [OPTIONS] infile minimum-progression-duration [--] [outfile]")]
#[command(long_about = "Convert file from KBS project format (.kbp) to SubStation Alpha subtitle (.ass)

infile:  input file in .kbp format (stdin if not specified)
outfile: output file in .ass format (stdout if not specified)

For compatibility with older releases, minimum-progression-duration can be specified as a
positional parameter instead of an option (if both are specified, the positional wins). If
your output file name happens to be a number, use -- before the second positional parameter
to disable this functionality.

Disable any boolean option with --no-[option].")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// infile, optional legacy threshold, outfile
    #[arg(value_name = "FILES")]
    files: Vec<String>,

    /// Files given after --
    #[arg(last = true, value_name = "FILES", hide = true)]
    trailing_files: Vec<String>,

    /// Highlight syllables individually instead of combining lines into a single string.
    /// Disabling this is not recommended.
    #[arg(short = 's', long, overrides_with = "no_syllable_precision")]
    syllable_precision: bool,

    #[arg(long, overrides_with = "syllable_precision", hide = true)]
    no_syllable_precision: bool,

    /// Threshold of syllable display time in milliseconds before using progressive wipe effect
    #[arg(short = 'm', long, alias = "wipe-threshold", value_name = "MS")]
    minimum_progression_duration: Option<String>,

    /// Enable processing of all positional and style information in the KBS project file
    /// (-w, -p, -b, -c, -t). Unset any of them with --no-{option}, e.g. "-f --no-border".
    #[arg(short = 'f', long, overrides_with = "no_full_mode")]
    full_mode: bool,

    #[arg(long, overrides_with = "full_mode", hide = true)]
    no_full_mode: bool,

    /// Set the virtual resolution of the destination file to that of CDG graphics, enabling
    /// positioning, alignment, and font size to work as they do in KBS.
    #[arg(short = 'c', long, overrides_with = "no_cdg")]
    cdg: bool,

    #[arg(long, overrides_with = "cdg", hide = true)]
    no_cdg: bool,

    /// Use wipe setting from project file (progressive wipe effect unless wiping is set to
    /// word by word). Sets -m to 0 if not otherwise set.
    #[arg(short = 'w', long, overrides_with = "no_wipe")]
    wipe: bool,

    #[arg(long, overrides_with = "wipe", hide = true)]
    no_wipe: bool,

    /// Use position data from project file. This includes alignment as well as
    /// vertical/horizontal offset. Strongly recommended to use with -c.
    #[arg(short = 'p', long, overrides_with = "no_position")]
    position: bool,

    #[arg(long, overrides_with = "position", hide = true)]
    no_position: bool,

    /// Use default CDG border (12 pixels from top of screen). If -c is used, these are
    /// virtual pixels.
    #[arg(short = 'b', long, overrides_with = "no_border")]
    border: bool,

    #[arg(long, overrides_with = "border", hide = true)]
    no_border: bool,

    /// Make the background colour (palette index 0) fully transparent
    #[arg(short = 't', long, overrides_with = "no_transparency")]
    transparency: bool,

    #[arg(long, overrides_with = "transparency", hide = true)]
    no_transparency: bool,

    /// Fade in/out in milliseconds as "in,out" or a single value for both ("0,0" disables)
    #[arg(long, value_name = "IN,OUT")]
    fade: Option<String>,

    /// Time offset in seconds applied to every timestamp (default from the settings file)
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    offset: Option<String>,

    /// Settings file path
    #[arg(long, value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    fn overrides(&self) -> Result<OptionOverrides> {
        Ok(OptionOverrides {
            full_mode: self.full_mode && !self.no_full_mode,
            wipe: flag(self.wipe, self.no_wipe),
            position: flag(self.position, self.no_position),
            border: flag(self.border, self.no_border),
            cdg: flag(self.cdg, self.no_cdg),
            transparency: flag(self.transparency, self.no_transparency),
            minimum_progression_duration: self
                .minimum_progression_duration
                .as_deref()
                .map(app_config::parse_threshold)
                .transpose()?,
            fade: self.fade.as_deref().map(str::parse::<Fade>).transpose()?,
            offset_ms: self.offset.as_deref().map(app_config::parse_offset).transpose()?,
            syllable_precision: flag(self.syllable_precision, self.no_syllable_precision),
        })
    }
}

// `--x` / `--no-x` pair to "given or not"
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
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
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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
    // Quiet until the settings file has been read
    CustomLogger::init(LevelFilter::Warn)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "kbp2ass", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level((&LogLevel::from(level.clone())).into());
    }

    run(cli)
}

fn run(cli: CommandLineOptions) -> Result<()> {
    // Options are fully validated before anything is read
    let positionals = app_config::split_positionals(&cli.files, &cli.trailing_files)?;
    let mut overrides = cli.overrides()?;
    if let Some(threshold) = positionals.minimum_progression_duration {
        overrides.minimum_progression_duration = Some(threshold);
    }

    let settings = match cli.config_path.clone().or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if cli.log_level.is_none() {
        log::set_max_level((&settings.log_level).into());
    }

    let options = overrides.resolve(&settings);
    debug!("Conversion options: {:?}", options);

    if positionals.infile != STDIO_PATH {
        if !FileManager::file_exists(&positionals.infile) {
            anyhow::bail!("Input file not found: {}", positionals.infile);
        }
        match FileManager::detect_file_type(&positionals.infile) {
            Ok(FileType::KaraokeProject) => {}
            Ok(other) => warn!("{} does not look like a KBP project ({:?})", positionals.infile, other),
            Err(e) => debug!("Could not detect file type: {}", e),
        }
    }

    let source = FileManager::read_input(&positionals.infile)?;
    let output = convert_to_ass(&source, &options)
        .with_context(|| format!("Failed to convert {}", positionals.infile))?;
    FileManager::write_output(&positionals.outfile, &output)?;

    if positionals.outfile != STDIO_PATH {
        info!("Success: {}", positionals.outfile);
    }
    Ok(())
}
