/*!
 * Error types for the kbp2ass converter.
 *
 * This module contains custom error types for the different stages of a
 * conversion, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while reading a KBP project
#[derive(Error, Debug, PartialEq)]
pub enum ConversionError {
    /// The text contains no syllable timing line at all
    #[error("Invalid KaraokeBuilder file")]
    InvalidFormat,

    /// A display line references a style slot that was never declared
    #[error("Line {line}: style '{letter}' (slot {index}) is not defined")]
    UndefinedStyle {
        /// Style letter as written in the header
        letter: char,
        /// Slot the letter maps to
        index: usize,
        /// 1-based source line
        line: usize,
    },

    /// A style definition appeared before any palette
    #[error("Line {line}: style defined before the palette")]
    MissingPalette {
        /// 1-based source line
        line: usize,
    },

    /// A style refers to a palette entry that does not exist
    #[error("Line {line}: palette index {index} is out of range")]
    PaletteIndex {
        /// Requested palette index
        index: usize,
        /// 1-based source line
        line: usize,
    },

    /// A directive that carries its value on the following line(s) is cut short
    #[error("Line {line}: '{directive}' is missing its value line")]
    MissingDirectiveLine {
        /// Directive name
        directive: &'static str,
        /// 1-based source line of the directive
        line: usize,
    },

    /// A numeric field could not be read
    #[error("Line {line}: invalid number '{value}' for {field}")]
    InvalidNumber {
        /// Field being read
        field: &'static str,
        /// Raw text
        value: String,
        /// 1-based source line
        line: usize,
    },
}

/// Errors in user-supplied options, reported before any conversion starts
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric option has a non-numeric value
    #[error("--{option} must be a number, got '{value}'")]
    InvalidNumber {
        /// Option name without leading dashes
        option: &'static str,
        /// Raw value
        value: String,
    },

    /// The fade option is not "in,out" or a single duration
    #[error("Invalid fade specification: {0}")]
    InvalidFade(String),

    /// More positional files than infile and outfile
    #[error("Maximum of 2 files may be specified (infile and outfile), got {0}")]
    TooManyFiles(usize),

    /// The settings file could not be used
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from option handling
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the conversion itself
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
