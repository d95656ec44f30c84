/*!
 * Timeline model reconstructed from a KBP project.
 */

use serde::Serialize;

use crate::geometry::Alignment;

/// Index of a style inside a [`StyleTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StyleId(pub usize);

/// A project style, already converted to ASS colour codes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    // @field: "<number>_<display name>"
    pub name: String,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
    pub font_name: String,
    // @field: Body height, 1.4 times the KBP cap height
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub encoding: i64,
    pub outline: i64,
    pub shadow: i64,
    /// Last alignment written by a display line using this style
    pub alignment: Option<Alignment>,
}

/// Sparse, slot-indexed style arena.
///
/// Sentences hold a [`StyleId`] rather than a copy, so an alignment written
/// by a later display line is what every sentence sharing the style sees.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleTable {
    slots: Vec<Option<Style>>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the style in `index`
    pub fn insert(&mut self, index: usize, style: Style) -> StyleId {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(style);
        StyleId(index)
    }

    /// Id of the style in `index`, if one was declared
    pub fn lookup(&self, index: usize) -> Option<StyleId> {
        self.slots
            .get(index)
            .and_then(|slot| slot.as_ref())
            .map(|_| StyleId(index))
    }

    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: StyleId) -> Option<&mut Style> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Declared styles in slot order
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|style| (StyleId(index), style)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-syllable wipe setting.
///
/// `Inherit` is only resolved at encode time, because the project-wide
/// default may be declared after the syllables that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WipeMode {
    Progressive,
    NonProgressive,
    Inherit,
}

impl WipeMode {
    /// Map a KBP wipe code: 0 inherits, 1-4 wipe progressively, 5+ word by word
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Inherit,
            code if code >= 5 => Self::NonProgressive,
            _ => Self::Progressive,
        }
    }

    /// Whether the syllable wipes progressively.
    ///
    /// An inherited mode with no declared project default counts as not
    /// progressive.
    pub fn is_progressive(self, document_default: Option<bool>) -> bool {
        match self {
            Self::Progressive => true,
            Self::NonProgressive => false,
            Self::Inherit => document_default.unwrap_or(false),
        }
    }
}

/// One timed fragment of a display line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Syllable {
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub wipe: WipeMode,
}

impl Syllable {
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Content of a sentence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SentenceBody {
    Syllables(Vec<Syllable>),
    /// Syllable text joined together, used when syllable precision is off
    Text(String),
}

/// One displayed subtitle line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentence {
    pub id: usize,
    pub start_ms: i64,
    pub end_ms: i64,
    pub style: Option<StyleId>,
    pub vertical_position: i64,
    pub horizontal_position: i64,
    pub alignment: Alignment,
    pub body: SentenceBody,
}

impl Sentence {
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Syllables, or an empty slice for flattened sentences
    pub fn syllables(&self) -> &[Syllable] {
        match &self.body {
            SentenceBody::Syllables(syllables) => syllables,
            SentenceBody::Text(_) => &[],
        }
    }

    /// Displayed text without timing
    pub fn text(&self) -> String {
        match &self.body {
            SentenceBody::Syllables(syllables) => {
                syllables.iter().map(|s| s.text.as_str()).collect()
            }
            SentenceBody::Text(text) => text.clone(),
        }
    }
}

/// Everything the parser extracts from a project
#[derive(Debug, Clone, Default, Serialize)]
pub struct KaraokeProject {
    pub styles: StyleTable,
    pub sentences: Vec<Sentence>,
    /// Project-wide wipe default from the 'Other directive, if present
    pub default_wipe_progressive: Option<bool>,
}

impl KaraokeProject {
    /// Name of the style a sentence uses
    pub fn style_name(&self, sentence: &Sentence) -> Option<&str> {
        sentence
            .style
            .and_then(|id| self.styles.get(id))
            .map(|style| style.name.as_str())
    }
}
