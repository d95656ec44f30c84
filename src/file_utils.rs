use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::kbp::parser::looks_like_kbp;

// @module: Input/output helpers for the command line front end

/// Path that stands for standard input or standard output
pub const STDIO_PATH: &str = "-";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Read the whole input, from stdin when `path` is "-"
    pub fn read_input(path: &str) -> Result<String> {
        if path == STDIO_PATH {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read standard input")?;
            return Ok(content);
        }
        Self::read_to_string(path)
    }

    /// Write the whole output, to stdout when `path` is "-"
    pub fn write_output(path: &str, content: &str) -> Result<()> {
        if path == STDIO_PATH {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write standard output")?;
            return Ok(());
        }
        Self::write_to_file(path, content)
    }

    /// Guess the kind of a file from its extension, then its content
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            match ext.to_string_lossy().to_lowercase().as_str() {
                "kbp" => return Ok(FileType::KaraokeProject),
                "ass" | "ssa" => return Ok(FileType::Subtitle),
                _ => {}
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = fs::read_to_string(path) {
            if looks_like_kbp(&content) {
                return Ok(FileType::KaraokeProject);
            }
            if content.trim_start().starts_with("[Script Info]") {
                return Ok(FileType::Subtitle);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Karaoke Builder Studio project (.kbp)
    KaraokeProject,
    /// SubStation Alpha subtitle (.ass/.ssa)
    Subtitle,
    /// Unknown file type
    Unknown,
}
