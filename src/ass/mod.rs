/*!
 * SubStation Alpha (.ass) generation.
 *
 * - `document`: section/record model and serializer
 * - `template`: boilerplate sections, default style and fade macro
 * - `karaoke`: per-sentence karaoke encoding
 */

pub mod document;
pub mod karaoke;
pub mod template;

use log::{debug, info};

use crate::app_config::ConversionOptions;
use crate::errors::ConversionError;
use crate::geometry::Layout;
use crate::kbp::model::{KaraokeProject, Style};
use crate::kbp::KbpParser;

pub use document::{Document, Entry, EventKind, EventRecord, Record, Section, StyleRecord};
pub use karaoke::{EncodedLine, KaraokeEncoder};

/// Merge a project style over the default style record
pub fn style_record(style: &Style) -> StyleRecord {
    let defaults = template::default_style();
    StyleRecord {
        name: style.name.clone(),
        font_name: style.font_name.clone(),
        font_size: style.font_size,
        primary_colour: style.primary_colour.clone(),
        secondary_colour: style.secondary_colour.clone(),
        outline_colour: style.outline_colour.clone(),
        back_colour: style.back_colour.clone(),
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        strike_out: style.strike_out,
        outline: style.outline as f64,
        shadow: style.shadow as f64,
        alignment: style.alignment.map_or(defaults.alignment, |a| a.ass_code()),
        encoding: style.encoding,
        ..defaults
    }
}

/// Encode a parsed project into a document
pub fn build_document(project: &KaraokeProject, options: &ConversionOptions) -> Document {
    let layout = Layout::new(options.border);
    let encoder = KaraokeEncoder::new(options);

    let mut styles = template::styles();
    if project.styles.is_empty() {
        styles.push(Entry::Style(template::default_style()));
    } else {
        for (_, style) in project.styles.iter() {
            styles.push(Entry::Style(style_record(style)));
        }
    }

    let mut comments = vec![template::fade_script_event()];
    let mut dialogues = Vec::with_capacity(project.sentences.len());
    for sentence in &project.sentences {
        let line = encoder.encode(project, sentence);
        comments.push(line.reference);
        dialogues.push(line.animated);
    }

    // Stable: equal start times keep sentence order
    comments.sort_by_key(|event| event.start_ms);
    dialogues.sort_by_key(|event| event.start_ms);

    let mut events = template::events();
    events
        .entries
        .extend(comments.into_iter().chain(dialogues).map(Entry::Event));

    debug!(
        "Document with {} style(s) and {} event(s)",
        styles.entries.len() - 1,
        events.entries.len() - 1
    );

    Document {
        sections: vec![template::script_info(options.cdg, &layout), styles, events],
    }
}

/// Convert the text of a KBP project to the text of an ASS document
pub fn convert_to_ass(text: &str, options: &ConversionOptions) -> Result<String, ConversionError> {
    let project = KbpParser::new(options).parse(text)?;
    info!(
        "Converted {} line(s) using {} style(s)",
        project.sentences.len(),
        project.styles.len()
    );
    Ok(build_document(&project, options).to_string())
}
