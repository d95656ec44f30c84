/*!
 * Karaoke Builder Studio project (.kbp) reading.
 *
 * - `model`: styles, syllables and sentences reconstructed from a project
 * - `parser`: the line classifier and parse state machine
 */

pub mod model;
pub mod parser;

pub use model::{
    KaraokeProject, Sentence, SentenceBody, Style, StyleId, StyleTable, Syllable, WipeMode,
};
pub use parser::KbpParser;
