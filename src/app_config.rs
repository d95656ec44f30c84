use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::ConfigError;
use crate::file_utils::STDIO_PATH;

/// Application configuration module
/// This module holds the immutable option record handed to the converter,
/// the fade specification, and the optional on-disk settings file that
/// supplies a default time offset.
/// Options recognised by the conversion entry point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Prefer the wipe mode declared in the project file
    #[serde(default)]
    pub wipe: bool,

    /// Emit absolute \pos tags
    #[serde(default)]
    pub position: bool,

    /// Assume the authoring tool's default on-screen border
    #[serde(default)]
    pub border: bool,

    /// Use the CDG virtual resolution
    #[serde(default)]
    pub cdg: bool,

    /// Render palette index 0 fully transparent
    #[serde(default)]
    pub transparency: bool,

    /// Syllables must last longer than this (ms) to get a progressive wipe
    #[serde(default = "default_minimum_progression_duration")]
    pub minimum_progression_duration: u32,

    // @field: Fade in/out applied to every animated line
    #[serde(default)]
    pub fade: Fade,

    // @field: Signed offset added to every timestamp before clamping
    #[serde(default)]
    pub offset_ms: i64,

    // @field: Keep per-syllable timing instead of one block per line
    #[serde(default = "default_true")]
    pub syllable_precision: bool,
}

impl ConversionOptions {
    /// Options with every positional and style feature of the project enabled
    pub fn full_mode() -> Self {
        Self {
            wipe: true,
            position: true,
            border: true,
            cdg: true,
            transparency: true,
            ..Self::default()
        }
    }

    /// Threshold in hundredths of a second, the unit used by karaoke tags
    pub fn progression_threshold_cs(&self) -> u32 {
        self.minimum_progression_duration / 10
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            wipe: false,
            position: false,
            border: false,
            cdg: false,
            transparency: false,
            minimum_progression_duration: default_minimum_progression_duration(),
            fade: Fade::default(),
            offset_ms: 0,
            syllable_precision: true,
        }
    }
}

/// Fade in/out durations in milliseconds
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    pub fade_in: u32,
    pub fade_out: u32,
}

impl Fade {
    pub fn new(fade_in: u32, fade_out: u32) -> Self {
        Self { fade_in, fade_out }
    }

    /// No fade at all
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn is_disabled(&self) -> bool {
        self.fade_in == 0 && self.fade_out == 0
    }

    /// Override tag for the animated line, empty when disabled
    pub fn tag(&self) -> String {
        if self.is_disabled() {
            String::new()
        } else {
            format!("\\fad({},{})", self.fade_in, self.fade_out)
        }
    }
}

impl Default for Fade {
    fn default() -> Self {
        Self::new(300, 200)
    }
}

impl fmt::Display for Fade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.fade_in, self.fade_out)
    }
}

// A single value applies to both directions
impl FromStr for Fade {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| ConfigError::InvalidFade(format!("'{}' is not a non-negative integer", part)))
        };

        match parts.as_slice() {
            [both] => {
                let value = parse(*both)?;
                Ok(Self::new(value, value))
            }
            [fade_in, fade_out] => Ok(Self::new(parse(*fade_in)?, parse(*fade_out)?)),
            _ => Err(ConfigError::InvalidFade(format!(
                "expected \"in,out\" or a single value, got '{}'",
                s
            ))),
        }
    }
}

/// Settings file read by the command line front end
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Settings {
    /// Default time offset in seconds, used when --offset is not given
    #[serde(default)]
    pub offset: f64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Settings {
    /// Load settings from a JSON file; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open settings file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let settings: Settings = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Platform location of the settings file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kbp2ass").join("settings.json"))
    }

    /// Validate the settings for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offset.is_finite() {
            return Err(ConfigError::Settings(format!(
                "offset must be a finite number of seconds, got {}",
                self.offset
            )));
        }
        Ok(())
    }

    pub fn offset_ms(&self) -> i64 {
        seconds_to_ms(self.offset)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Convert a signed offset in seconds to whole milliseconds (floored)
pub fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0).floor() as i64
}

fn default_minimum_progression_duration() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

/// Options as given on the command line, before defaults are applied.
///
/// `None` means "not given"; `full_mode` only supplies defaults, so an
/// explicit option or its negation always wins over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionOverrides {
    pub full_mode: bool,
    pub wipe: Option<bool>,
    pub position: Option<bool>,
    pub border: Option<bool>,
    pub cdg: Option<bool>,
    pub transparency: Option<bool>,
    pub minimum_progression_duration: Option<u32>,
    pub fade: Option<Fade>,
    pub offset_ms: Option<i64>,
    pub syllable_precision: Option<bool>,
}

impl OptionOverrides {
    /// Resolve against the defaults and the settings file
    pub fn resolve(&self, settings: &Settings) -> ConversionOptions {
        let defaults = ConversionOptions::default();
        let wipe = self.wipe.unwrap_or(self.full_mode);

        // Trusting the project's wipe mode means no duration floor
        let minimum_progression_duration = match self.minimum_progression_duration {
            Some(threshold) => threshold,
            None if wipe => 0,
            None => defaults.minimum_progression_duration,
        };

        ConversionOptions {
            wipe,
            position: self.position.unwrap_or(self.full_mode),
            border: self.border.unwrap_or(self.full_mode),
            cdg: self.cdg.unwrap_or(self.full_mode),
            transparency: self.transparency.unwrap_or(self.full_mode),
            minimum_progression_duration,
            fade: self.fade.unwrap_or(defaults.fade),
            offset_ms: self.offset_ms.unwrap_or_else(|| settings.offset_ms()),
            syllable_precision: self.syllable_precision.unwrap_or(defaults.syllable_precision),
        }
    }
}

/// Input/output files and the legacy positional threshold
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalArgs {
    pub infile: String,
    pub outfile: String,
    pub minimum_progression_duration: Option<u32>,
}

/// Sort out `infile [threshold] [outfile]`.
///
/// Older releases took the threshold as the second positional argument.
/// It is still accepted there when it is an integer, but only before
/// `--`; everything in `trailing` is a file name.
pub fn split_positionals(positional: &[String], trailing: &[String]) -> Result<PositionalArgs, ConfigError> {
    let mut files: Vec<String> = Vec::new();
    let mut minimum_progression_duration = None;

    for (i, arg) in positional.iter().enumerate() {
        if i == 1 {
            if let Ok(threshold) = arg.parse::<u32>() {
                minimum_progression_duration = Some(threshold);
                continue;
            }
        }
        files.push(arg.clone());
    }
    files.extend(trailing.iter().cloned());

    if files.len() > 2 {
        return Err(ConfigError::TooManyFiles(files.len()));
    }

    let mut files = files.into_iter();
    Ok(PositionalArgs {
        infile: files.next().unwrap_or_else(|| STDIO_PATH.to_string()),
        outfile: files.next().unwrap_or_else(|| STDIO_PATH.to_string()),
        minimum_progression_duration,
    })
}

/// Parse the --minimum-progression-duration value
pub fn parse_threshold(value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        option: "minimum-progression-duration",
        value: value.to_string(),
    })
}

/// Parse the --offset value (seconds) into milliseconds
pub fn parse_offset(value: &str) -> Result<i64, ConfigError> {
    let seconds: f64 = value
        .trim()
        .parse()
        .ok()
        .filter(|s: &f64| s.is_finite())
        .ok_or_else(|| ConfigError::InvalidNumber {
            option: "offset",
            value: value.to_string(),
        })?;
    Ok(seconds_to_ms(seconds))
}
