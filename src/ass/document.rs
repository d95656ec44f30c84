/*!
 * SubStation Alpha document model and serializer.
 *
 * A document is a list of sections. Each section holds entries; a `Format`
 * entry declares the field order that every following record in the same
 * section is written in.
 */

use std::fmt;

/// A record whose fields are looked up by their `Format` name
pub trait Record {
    /// Line key, e.g. "Style" or "Dialogue"
    fn key(&self) -> &'static str;

    /// Rendered value of `field`; unknown fields render empty
    fn value(&self, field: &str) -> String;
}

/// Style line of the `[V4+ Styles]` section
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRecord {
    pub name: String,
    pub font_name: String,
    pub font_size: f64,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: i64,
    pub outline: f64,
    pub shadow: f64,
    pub alignment: i64,
    pub margin_l: i64,
    pub margin_r: i64,
    pub margin_v: i64,
    pub encoding: i64,
}

// ASS booleans are -1 / 0
fn flag(value: bool) -> String {
    if value { "-1".to_string() } else { "0".to_string() }
}

impl Record for StyleRecord {
    fn key(&self) -> &'static str {
        "Style"
    }

    fn value(&self, field: &str) -> String {
        match field {
            "Name" => self.name.clone(),
            "Fontname" => self.font_name.clone(),
            "Fontsize" => self.font_size.to_string(),
            "PrimaryColour" => self.primary_colour.clone(),
            "SecondaryColour" => self.secondary_colour.clone(),
            "OutlineColour" => self.outline_colour.clone(),
            "BackColour" => self.back_colour.clone(),
            "Bold" => flag(self.bold),
            "Italic" => flag(self.italic),
            "Underline" => flag(self.underline),
            "StrikeOut" => flag(self.strike_out),
            "ScaleX" => self.scale_x.to_string(),
            "ScaleY" => self.scale_y.to_string(),
            "Spacing" => self.spacing.to_string(),
            "Angle" => self.angle.to_string(),
            "BorderStyle" => self.border_style.to_string(),
            "Outline" => self.outline.to_string(),
            "Shadow" => self.shadow.to_string(),
            "Alignment" => self.alignment.to_string(),
            "MarginL" => self.margin_l.to_string(),
            "MarginR" => self.margin_r.to_string(),
            "MarginV" => self.margin_v.to_string(),
            "Encoding" => self.encoding.to_string(),
            _ => String::new(),
        }
    }
}

/// Whether an event is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Dialogue,
    /// Kept in the file but never drawn
    Comment,
}

/// Line of the `[Events]` section
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub layer: i64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub style: String,
    pub name: String,
    pub margin_l: i64,
    pub margin_r: i64,
    pub margin_v: i64,
    pub effect: String,
    pub text: String,
}

impl Record for EventRecord {
    fn key(&self) -> &'static str {
        match self.kind {
            EventKind::Dialogue => "Dialogue",
            EventKind::Comment => "Comment",
        }
    }

    fn value(&self, field: &str) -> String {
        match field {
            "Layer" => self.layer.to_string(),
            "Start" => format_timestamp(self.start_ms),
            "End" => format_timestamp(self.end_ms),
            "Style" => self.style.clone(),
            "Name" => self.name.clone(),
            "MarginL" => self.margin_l.to_string(),
            "MarginR" => self.margin_r.to_string(),
            "MarginV" => self.margin_v.to_string(),
            "Effect" => self.effect.clone(),
            "Text" => self.text.clone(),
            _ => String::new(),
        }
    }
}

/// One line of a section
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `;text`
    Comment(String),
    /// `key: value`
    Raw { key: &'static str, value: String },
    /// `Format: a, b, c`
    Format(Vec<&'static str>),
    Style(StyleRecord),
    Event(EventRecord),
}

/// A `[Name]` block
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: &'static str,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)?;

        let mut format: &[&str] = &[];
        for entry in &self.entries {
            f.write_str("\n")?;
            match entry {
                Entry::Comment(text) => write!(f, ";{}", text)?,
                Entry::Raw { key, value } => write!(f, "{}: {}", key, value)?,
                Entry::Format(fields) => {
                    format = fields;
                    write!(f, "Format: {}", fields.join(", "))?;
                }
                Entry::Style(record) => write_record(f, record, format)?,
                Entry::Event(record) => write_record(f, record, format)?,
            }
        }
        Ok(())
    }
}

fn write_record(f: &mut fmt::Formatter<'_>, record: &impl Record, format: &[&str]) -> fmt::Result {
    let values: Vec<String> = format.iter().map(|field| record.value(field)).collect();
    write!(f, "{}: {}", record.key(), values.join(","))
}

/// A complete ASS document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", section)?;
        }
        f.write_str("\n")
    }
}

/// Format milliseconds as an ASS timestamp `H:MM:SS.CC` (centiseconds truncated)
pub fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let centis = (ms % 1_000) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}
