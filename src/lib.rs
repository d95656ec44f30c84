/*!
 * # kbp2ass
 *
 * Convert Karaoke Builder Studio project files (.kbp) to SubStation Alpha
 * subtitles (.ass) with syllable-level karaoke wipes.
 *
 * ## Features
 *
 * - Rebuilds lines, syllables, styles, palette and layout from a project
 * - Progressive (`\kf`) or instant (`\k`) wipes per syllable, with an
 *   optional minimum duration for progressive wipes
 * - Palette to ASS colour conversion, optional transparent background
 * - CDG-compatible positioning, borders and play resolution
 * - Configurable fade and global time offset
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Conversion options and the settings file
 * - `kbp`: Project parsing:
 *   - `kbp::model`: Styles, syllables and sentences
 *   - `kbp::parser`: Line classifier and parse state machine
 * - `ass`: Subtitle generation:
 *   - `ass::karaoke`: Karaoke line encoding
 *   - `ass::template`: Fixed document boilerplate
 *   - `ass::document`: Document model and serializer
 * - `color`: Palette colour conversion
 * - `geometry`: Alignment and on-screen position
 * - `file_utils`: File and stdio operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod ass;
pub mod color;
pub mod errors;
pub mod file_utils;
pub mod geometry;
pub mod kbp;

// Re-export main types for easier usage
pub use app_config::{ConversionOptions, Fade, Settings};
pub use ass::convert_to_ass;
pub use errors::{AppError, ConfigError, ConversionError};
pub use kbp::{KaraokeProject, KbpParser};
