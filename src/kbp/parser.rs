/*!
 * Line-oriented parser for Karaoke Builder Studio project files.
 *
 * A project interleaves several small grammars: directives whose value sits
 * on the next line, three-line style blocks, page markers, display line
 * headers, syllable timing lines and blank lines that close a display line.
 * The parser classifies each line once and advances a single cursor by the
 * number of lines the matching handler consumed.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::mem;

use crate::app_config::ConversionOptions;
use crate::color;
use crate::errors::ConversionError;
use crate::geometry::{Alignment, Layout};
use crate::kbp::model::{
    KaraokeProject, Sentence, SentenceBody, Style, StyleId, StyleTable, Syllable,
    WipeMode,
};

// @const: Syllable timing line, e.g. "ZA/ 592/622/0"
static SYLLABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(.*)/ *([0-9]+)/([0-9]+)/([0-9]+)").unwrap()
});

// @const: Display line header, e.g. "C/A/592/700/0/0/0"
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[LCR]/[A-Za-z]").unwrap()
});

// @const: First line of a style block
static STYLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Style([0-1][0-9])").unwrap()
});

const BLOCK_MARKER: &str = "PAGEV2";
const MARGINS_DIRECTIVE: &str = "'Margins";
const OTHER_DIRECTIVE: &str = "'Other";
const PALETTE_DIRECTIVE: &str = "'Palette Colours";

/// Wipe field value in the 'Other directive meaning "word by word"
const NON_PROGRESSIVE_DEFAULT: &str = "5";

// Defaults used by KBS until a 'Margins directive replaces them
const DEFAULT_LEFT_MARGIN: i64 = 2;
const DEFAULT_RIGHT_MARGIN: i64 = 2;
const DEFAULT_TOP_MARGIN: i64 = 7;
const DEFAULT_LINE_SPACING: i64 = 12;

/// KBP sizes are cap heights, ASS sizes are body heights
const FONT_SIZE_RATIO: f64 = 1.4;

/// Category of a single source line
#[derive(Debug, PartialEq)]
enum LineKind<'a> {
    BlockMarker,
    Margins,
    DefaultWipe,
    Palette,
    StyleDefinition(usize),
    Header,
    Blank,
    Syllable {
        text: &'a str,
        start: &'a str,
        end: &'a str,
        wipe: &'a str,
    },
    Ignored,
}

/// Classify a line (already stripped of trailing whitespace).
///
/// Directives and styles are honoured everywhere; everything else is
/// ignored until the first block marker has been seen.
fn classify(line: &str, in_preamble: bool) -> LineKind<'_> {
    if line == BLOCK_MARKER {
        return LineKind::BlockMarker;
    }
    if line.starts_with(MARGINS_DIRECTIVE) {
        return LineKind::Margins;
    }
    if line.starts_with(OTHER_DIRECTIVE) {
        return LineKind::DefaultWipe;
    }
    if line.starts_with(PALETTE_DIRECTIVE) {
        return LineKind::Palette;
    }
    if let Some(caps) = STYLE_REGEX.captures(line) {
        // Two captured digits always fit
        let index = caps[1].parse().unwrap_or_default();
        return LineKind::StyleDefinition(index);
    }
    if in_preamble {
        return LineKind::Ignored;
    }
    if HEADER_REGEX.is_match(line) {
        return LineKind::Header;
    }
    if is_decorative(line) {
        return LineKind::Ignored;
    }
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = SYLLABLE_REGEX.captures(line) {
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        return LineKind::Syllable {
            text: field(1),
            start: field(2),
            end: field(3),
            wipe: field(4),
        };
    }
    LineKind::Ignored
}

/// Separators and effect lines with no meaning for the conversion
fn is_decorative(line: &str) -> bool {
    line.starts_with("--------") || line.starts_with("FX/") || line == BLOCK_MARKER || line == "MODS"
}

/// Whether the text looks like a KBP project at all
pub fn looks_like_kbp(text: &str) -> bool {
    SYLLABLE_REGEX.is_match(text)
}

/// Read a leading integer the way KBS writes them (surrounding blanks allowed)
fn parse_int(value: &str, field: &'static str, line: usize) -> Result<i64, ConversionError> {
    let trimmed = value.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();

    trimmed[..sign_len + digits_len]
        .parse()
        .map_err(|_| ConversionError::InvalidNumber {
            field,
            value: value.to_string(),
            line,
        })
}

/// Display line being accumulated until the next blank line
#[derive(Debug, Default)]
struct OpenSentence {
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    style: Option<StyleId>,
    vertical_position: i64,
    horizontal_position: i64,
    alignment: Alignment,
    /// Lowercase style letter: shown without wiping
    fixed: bool,
    syllables: Vec<Syllable>,
}

/// Running parse state
#[derive(Debug)]
struct ParseState {
    blocks: usize,
    left_margin: i64,
    right_margin: i64,
    top_margin: i64,
    line_spacing: i64,
    cursor: Option<i64>,
    palette: Option<Vec<String>>,
    styles: StyleTable,
    default_wipe_progressive: Option<bool>,
    current: OpenSentence,
    next_id: usize,
    sentences: Vec<Sentence>,
}

impl ParseState {
    fn new(layout: &Layout) -> Self {
        Self {
            blocks: 0,
            left_margin: DEFAULT_LEFT_MARGIN,
            right_margin: DEFAULT_RIGHT_MARGIN,
            top_margin: layout.top_margin(DEFAULT_TOP_MARGIN),
            line_spacing: layout.line_spacing(DEFAULT_LINE_SPACING),
            cursor: None,
            palette: None,
            styles: StyleTable::new(),
            default_wipe_progressive: None,
            current: OpenSentence::default(),
            next_id: 1,
            sentences: Vec::new(),
        }
    }
}

/// KBP project parser
pub struct KbpParser<'a> {
    options: &'a ConversionOptions,
    layout: Layout,
}

impl<'a> KbpParser<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            layout: Layout::new(options.border),
        }
    }

    /// Parse a complete project text
    pub fn parse(&self, text: &str) -> Result<KaraokeProject, ConversionError> {
        if !looks_like_kbp(text) {
            return Err(ConversionError::InvalidFormat);
        }

        let normalized = text.replace('\r', "");
        let lines: Vec<&str> = normalized.split('\n').collect();
        let mut state = ParseState::new(&self.layout);

        let mut index = 0;
        while index < lines.len() {
            let line = lines[index].trim_end();
            let consumed = match classify(line, state.blocks == 0) {
                LineKind::BlockMarker => {
                    state.blocks += 1;
                    // The next header adds the spacing back
                    state.cursor = Some(state.top_margin.saturating_sub(state.line_spacing));
                    1
                }
                LineKind::Margins => self.read_margins(&mut state, &lines, index)?,
                LineKind::DefaultWipe => self.read_default_wipe(&mut state, &lines, index)?,
                LineKind::Palette => self.read_palette(&mut state, &lines, index)?,
                LineKind::StyleDefinition(slot) => self.read_style(&mut state, &lines, index, slot)?,
                LineKind::Header => {
                    self.read_header(&mut state, line, index + 1)?;
                    1
                }
                LineKind::Blank => {
                    self.close_sentence(&mut state);
                    1
                }
                LineKind::Syllable { text, start, end, wipe } => {
                    self.read_syllable(&mut state, text, start, end, wipe, index + 1)?;
                    1
                }
                LineKind::Ignored => 1,
            };
            index += consumed;
        }

        if !state.current.syllables.is_empty() {
            warn!(
                "Project ends without a blank line; {} trailing syllable(s) dropped",
                state.current.syllables.len()
            );
        }

        debug!(
            "Parsed {} style(s) and {} sentence(s) from {} block(s)",
            state.styles.len(),
            state.sentences.len(),
            state.blocks
        );

        Ok(KaraokeProject {
            styles: state.styles,
            sentences: state.sentences,
            default_wipe_progressive: state.default_wipe_progressive,
        })
    }

    /// Centiseconds from the file to offset milliseconds, clamped at 0
    fn to_ms(&self, raw: &str, field: &'static str, line: usize) -> Result<i64, ConversionError> {
        parse_int(raw, field, line)?
            .checked_mul(10)
            .and_then(|ms| ms.checked_add(self.options.offset_ms))
            .map(|ms| ms.max(0))
            .ok_or_else(|| ConversionError::InvalidNumber {
                field,
                value: raw.to_string(),
                line,
            })
    }

    /// `'Margins` followed by "left,right,top,spacing"
    fn read_margins(&self, state: &mut ParseState, lines: &[&str], index: usize) -> Result<usize, ConversionError> {
        let value = value_line(lines, index, 1, "Margins")?;
        let line = index + 2;
        let fields: Vec<&str> = value.trim().split(',').collect();
        let field = |i: usize| -> Result<i64, ConversionError> {
            parse_int(fields.get(i).copied().unwrap_or(""), "margin", line)
        };

        state.left_margin = field(0)?;
        state.right_margin = field(1)?;
        state.top_margin = self.layout.top_margin(field(2)?);
        state.line_spacing = self.layout.line_spacing(field(3)?);
        Ok(2)
    }

    /// `'Other` followed by a line whose second field is the default wipe
    fn read_default_wipe(&self, state: &mut ParseState, lines: &[&str], index: usize) -> Result<usize, ConversionError> {
        let value = value_line(lines, index, 1, "Other")?;
        let wipe = value.trim().split(',').nth(1);
        state.default_wipe_progressive = Some(wipe != Some(NON_PROGRESSIVE_DEFAULT));
        Ok(2)
    }

    /// `'Palette Colours` followed by comma separated RGB triplets
    fn read_palette(&self, state: &mut ParseState, lines: &[&str], index: usize) -> Result<usize, ConversionError> {
        let value = value_line(lines, index, 1, "Palette Colours")?;
        let palette: Vec<String> = value.trim().split(',').map(str::to_string).collect();
        debug!("Palette with {} colour(s)", palette.len());
        state.palette = Some(palette);
        Ok(2)
    }

    /// Three-line style block:
    ///   StyleNN,Name,secondary,outline,primary,back
    ///   Font,size,weight,encoding
    ///   outline,_,_,_,shadow
    fn read_style(
        &self,
        state: &mut ParseState,
        lines: &[&str],
        index: usize,
        slot: usize,
    ) -> Result<usize, ConversionError> {
        let header_line = index + 1;
        let palette = state
            .palette
            .as_deref()
            .ok_or(ConversionError::MissingPalette { line: header_line })?;

        let header: Vec<&str> = lines[index].trim_end().split(',').collect();
        let colour = |i: usize| -> Result<String, ConversionError> {
            let raw = header.get(i).copied().unwrap_or("");
            let palette_index = parse_int(raw, "style colour", header_line)?;
            usize::try_from(palette_index)
                .ok()
                .and_then(|pi| color::palette_color(palette, pi, self.options.transparency))
                .ok_or(ConversionError::PaletteIndex {
                    index: usize::try_from(palette_index).unwrap_or(usize::MAX),
                    line: header_line,
                })
        };

        let name = format!(
            "{}_{}",
            header.first().copied().unwrap_or(""),
            header.get(1).copied().unwrap_or("")
        );
        let secondary_colour = colour(2)?;
        let outline_colour = colour(3)?;
        let primary_colour = colour(4)?;
        let back_colour = colour(5)?;

        let font_line = index + 2;
        let font: Vec<&str> = value_line(lines, index, 1, "Style")?.trim().split(',').collect();
        let font_field = |i: usize| font.get(i).copied().unwrap_or("");
        let weight = font_field(2);

        let spacing_line = index + 3;
        let spacing: Vec<&str> = value_line(lines, index, 2, "Style")?.trim().split(',').collect();
        let spacing_field = |i: usize| spacing.get(i).copied().unwrap_or("");

        let style = Style {
            name,
            primary_colour,
            secondary_colour,
            outline_colour,
            back_colour,
            font_name: font_field(0).to_string(),
            font_size: parse_int(font_field(1), "font size", font_line)? as f64 * FONT_SIZE_RATIO,
            bold: weight == "B",
            italic: weight == "I",
            underline: weight == "U",
            strike_out: weight == "S",
            encoding: parse_int(font_field(3), "font encoding", font_line)?,
            outline: parse_int(spacing_field(0), "outline", spacing_line)?,
            shadow: parse_int(spacing_field(4), "shadow", spacing_line)?,
            alignment: None,
        };

        debug!("Style {:02}: {} ({} {})", slot, style.name, style.font_name, style.font_size);
        state.styles.insert(slot, style);
        Ok(3)
    }

    /// `align/style/start/end/x/y[/rotation]`
    fn read_header(&self, state: &mut ParseState, line: &str, line_no: usize) -> Result<(), ConversionError> {
        let fields: Vec<&str> = line.split('/').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        state.cursor = Some(match state.cursor {
            Some(cursor) => cursor.saturating_add(state.line_spacing),
            None => state.line_spacing,
        });

        let alignment = Alignment::from_code(field(0));
        let style_field = field(1);
        let raw_start = field(2);
        let raw_end = field(3);
        let horizontal_offset = parse_int(field(4), "horizontal offset", line_no)?;
        let vertical_offset = parse_int(field(5), "vertical offset", line_no)?;

        if raw_start != "0" && raw_end != "0" {
            let id = self.resolve_style(&state.styles, style_field, line_no)?;
            if let Some(style) = state.styles.get_mut(id) {
                style.alignment = Some(alignment);
            }
            state.current.style = Some(id);
        }

        let current = &mut state.current;
        current.alignment = alignment;
        current.horizontal_position = self.layout.horizontal_position(
            alignment,
            horizontal_offset,
            state.left_margin,
            state.right_margin,
        );
        current.vertical_position = state.cursor.unwrap_or_default().saturating_add(vertical_offset);
        current.fixed = style_field.to_lowercase() == style_field;
        current.start_ms = Some(self.to_ms(raw_start, "line start", line_no)?);
        current.end_ms = Some(self.to_ms(raw_end, "line end", line_no)?);
        Ok(())
    }

    /// Map a style letter (A = slot 0) to a declared style
    fn resolve_style(&self, styles: &StyleTable, field: &str, line: usize) -> Result<StyleId, ConversionError> {
        let letter = field.chars().next().unwrap_or('?');
        let index = (letter.to_ascii_uppercase() as usize).checked_sub('A' as usize);

        index
            .and_then(|index| styles.lookup(index))
            .ok_or(ConversionError::UndefinedStyle {
                letter,
                index: index.unwrap_or(usize::MAX),
                line,
            })
    }

    fn read_syllable(
        &self,
        state: &mut ParseState,
        text: &str,
        start: &str,
        end: &str,
        wipe: &str,
        line_no: usize,
    ) -> Result<(), ConversionError> {
        let current = &mut state.current;

        // A leading space only survives rendering as a hard space
        let text = match text.strip_prefix(' ') {
            Some(rest) if current.syllables.is_empty() => format!("\\h{}", rest),
            _ => text.to_string(),
        };

        // Fixed lines never wipe: every syllable sits at the line end
        let (start_ms, end_ms) = if current.fixed {
            let at = current.end_ms.unwrap_or_default().max(0);
            (at, at)
        } else {
            (
                self.to_ms(start, "syllable start", line_no)?,
                self.to_ms(end, "syllable end", line_no)?,
            )
        };
        let wipe = WipeMode::from_code(parse_int(wipe, "wipe type", line_no)?);

        if start_ms == 0 && end_ms == 0 {
            return Ok(());
        }

        current.syllables.push(Syllable {
            text,
            start_ms,
            end_ms,
            wipe,
        });
        Ok(())
    }

    /// Blank line: emit the open sentence, if it has any syllables
    fn close_sentence(&self, state: &mut ParseState) {
        let current = &mut state.current;
        let (Some(first), Some(last)) = (current.syllables.first(), current.syllables.last()) else {
            return;
        };

        let start_ms = current.start_ms.take().unwrap_or(first.start_ms);
        let end_ms = current.end_ms.take().unwrap_or(last.end_ms);
        let syllables = mem::take(&mut current.syllables);

        let body = if self.options.syllable_precision {
            SentenceBody::Syllables(syllables)
        } else {
            SentenceBody::Text(syllables.iter().map(|s| s.text.as_str()).collect())
        };

        let sentence = Sentence {
            id: state.next_id,
            start_ms,
            end_ms,
            style: current.style,
            vertical_position: current.vertical_position,
            horizontal_position: current.horizontal_position,
            alignment: current.alignment,
            body,
        };
        debug!(
            "Sentence {}: {}ms-{}ms \"{}\"",
            sentence.id,
            sentence.start_ms,
            sentence.end_ms,
            sentence.text()
        );

        state.next_id += 1;
        state.sentences.push(sentence);
    }
}

/// Line `offset` lines after the directive at `index`
fn value_line<'l>(
    lines: &[&'l str],
    index: usize,
    offset: usize,
    directive: &'static str,
) -> Result<&'l str, ConversionError> {
    lines
        .get(index + offset)
        .copied()
        .ok_or(ConversionError::MissingDirectiveLine {
            directive,
            line: index + 1,
        })
}
