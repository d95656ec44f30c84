/*!
 * Karaoke line encoding.
 *
 * Each sentence becomes two events sharing its timing and style: a comment
 * holding the bare karaoke text for reference, and the dialogue that is
 * actually rendered, prefixed with alignment, optional position, the
 * pre-roll wipe and the fade.
 */

use std::fmt::Write;

use crate::app_config::ConversionOptions;
use crate::ass::document::{EventKind, EventRecord};
use crate::ass::template::{self, FX_EFFECT, KARAOKE_EFFECT};
use crate::geometry::Alignment;
use crate::kbp::model::{KaraokeProject, Sentence, SentenceBody, WipeMode};

/// Gaps between syllables longer than this (ms) get their own wipe
const GAP_THRESHOLD_MS: i64 = 10;

/// The two events produced for one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedLine {
    pub reference: EventRecord,
    pub animated: EventRecord,
}

/// `{\kNN}` / `{\kfNN}` for a duration in hundredths of a second
pub fn wipe_tag(progressive: bool, duration_cs: i64) -> String {
    format!("{{\\k{}{}}}", if progressive { "f" } else { "" }, duration_cs)
}

/// Sentence encoder for one conversion
pub struct KaraokeEncoder<'a> {
    options: &'a ConversionOptions,
    fade_tag: String,
}

impl<'a> KaraokeEncoder<'a> {
    pub fn new(options: &'a ConversionOptions) -> Self {
        Self {
            options,
            fade_tag: options.fade.tag(),
        }
    }

    /// Whether a fragment of `duration_ms` wipes progressively.
    ///
    /// It must last longer than the threshold, and with `wipe` set the
    /// project's own mode may still veto it.
    pub fn is_progressive(&self, duration_ms: i64, wipe: WipeMode, document_default: Option<bool>) -> bool {
        if duration_ms / 10 <= i64::from(self.options.progression_threshold_cs()) {
            return false;
        }
        !(self.options.wipe && !wipe.is_progressive(document_default))
    }

    /// Karaoke text of a sentence: gap fillers plus one wipe per syllable
    pub fn karaoke_text(&self, sentence: &Sentence, document_default: Option<bool>) -> String {
        let mut text = String::new();

        match &sentence.body {
            SentenceBody::Syllables(syllables) => {
                let mut last_end: Option<i64> = None;
                for syllable in syllables {
                    if let Some(gap) = last_end.map(|end| syllable.start_ms - end) {
                        if gap > GAP_THRESHOLD_MS {
                            text.push_str(&wipe_tag(false, gap / 10));
                        }
                    }

                    let duration = syllable.duration_ms();
                    let progressive = self.is_progressive(duration, syllable.wipe, document_default);
                    text.push_str(&wipe_tag(progressive, duration / 10));
                    text.push_str(&syllable.text);
                    last_end = Some(syllable.end_ms);
                }
            }
            SentenceBody::Text(line) => {
                let duration = sentence.duration_ms();
                let progressive = self.is_progressive(duration, WipeMode::Inherit, document_default);
                text.push_str(&wipe_tag(progressive, duration / 10));
                text.push_str(line);
            }
        }
        text
    }

    /// `{\anN[\pos(x,y)]\kPRE<fade>}`
    fn override_prefix(&self, sentence: &Sentence) -> String {
        let mut prefix = format!("{{\\an{}", sentence.alignment.ass_code());

        if self.options.position {
            // A horizontal offset only means something against a known width
            let x = if self.options.cdg || sentence.alignment != Alignment::Center {
                sentence.horizontal_position
            } else {
                0
            };
            let _ = write!(prefix, "\\pos({},{})", x, sentence.vertical_position);
        }

        let first_start = sentence
            .syllables()
            .first()
            .map_or(sentence.start_ms, |s| s.start_ms);
        let _ = write!(prefix, "\\k{}{}}}", (first_start - sentence.start_ms) / 10, self.fade_tag);
        prefix
    }

    /// Reference comment and rendered dialogue for a sentence
    pub fn encode(&self, project: &KaraokeProject, sentence: &Sentence) -> EncodedLine {
        let karaoke = self.karaoke_text(sentence, project.default_wipe_progressive);
        let style = project.style_name(sentence).unwrap_or_default().to_string();

        let base = EventRecord {
            start_ms: sentence.start_ms,
            end_ms: sentence.end_ms,
            style,
            ..template::default_event(EventKind::Dialogue)
        };

        let reference = EventRecord {
            kind: EventKind::Comment,
            effect: KARAOKE_EFFECT.to_string(),
            text: karaoke.clone(),
            ..base.clone()
        };

        let animated = EventRecord {
            effect: FX_EFFECT.to_string(),
            text: format!("{}{}", self.override_prefix(sentence), karaoke),
            ..base
        };

        EncodedLine { reference, animated }
    }
}
