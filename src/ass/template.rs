/*!
 * Fixed parts of every generated document.
 */

use crate::ass::document::{Entry, EventKind, EventRecord, Section, StyleRecord};
use crate::geometry::Layout;

pub const SCRIPT_INFO_SECTION: &str = "Script Info";
pub const STYLES_SECTION: &str = "V4+ Styles";
pub const EVENTS_SECTION: &str = "Events";

pub const STYLE_FORMAT: [&str; 23] = [
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

pub const EVENT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// Effect of the reference copy of each line
pub const KARAOKE_EFFECT: &str = "karaoke";
/// Effect of the rendered line
pub const FX_EFFECT: &str = "fx";

/// Effect field of the fade macro line
pub const SCRIPT_FX: &str = "template pre-line all keeptags";
/// Player-side fade-in macro, copied verbatim
pub const FADE_SCRIPT: &str = r#"!retime("line",$start < 900 and -$start or -900,200)!{!$start < 900 and "\\k" .. ($start/10) or "\\k90"!\fad(!$start < 900 and $start or 300!,200)}"#;

const CONVERTER_BANNER: &str = "Converted using kbp2ass : https://github.com/Aeden-B/kbp2ass";

/// `[Script Info]`, with the CDG play resolution when requested
pub fn script_info(cdg: bool, layout: &Layout) -> Section {
    let mut section = Section::new(SCRIPT_INFO_SECTION);
    section.push(Entry::Comment(CONVERTER_BANNER.to_string()));
    section.push(Entry::Raw { key: "Title", value: String::new() });
    section.push(Entry::Raw { key: "ScriptType", value: "v4.00+".to_string() });
    section.push(Entry::Raw { key: "WrapStyle", value: "0".to_string() });
    section.push(Entry::Raw { key: "ScaledBorderAndShadow", value: "yes".to_string() });
    section.push(Entry::Raw { key: "Collisions", value: "Normal".to_string() });

    if cdg {
        section.push(Entry::Raw { key: "PlayResX", value: layout.total_width().to_string() });
        section.push(Entry::Raw { key: "PlayResY", value: layout.total_height().to_string() });
    }
    section
}

/// `[V4+ Styles]` with only its format line
pub fn styles() -> Section {
    let mut section = Section::new(STYLES_SECTION);
    section.push(Entry::Format(STYLE_FORMAT.to_vec()));
    section
}

/// `[Events]` with only its format line
pub fn events() -> Section {
    let mut section = Section::new(EVENTS_SECTION);
    section.push(Entry::Format(EVENT_FORMAT.to_vec()));
    section
}

/// Values every project style starts from
pub fn default_style() -> StyleRecord {
    StyleRecord {
        name: "Default".to_string(),
        font_name: "Arial".to_string(),
        font_size: 24.0,
        primary_colour: "&H00FFFFFF".to_string(),
        secondary_colour: "&H000088EF".to_string(),
        outline_colour: "&H00000000".to_string(),
        back_colour: "&H00666666".to_string(),
        bold: true,
        italic: false,
        underline: false,
        strike_out: false,
        scale_x: 100.0,
        scale_y: 100.0,
        spacing: 0.0,
        angle: 0.0,
        border_style: 1,
        outline: 1.5,
        shadow: 0.0,
        alignment: 8,
        margin_l: 0,
        margin_r: 0,
        margin_v: 20,
        encoding: 1,
    }
}

/// Values every event starts from
pub fn default_event(kind: EventKind) -> EventRecord {
    EventRecord {
        kind,
        layer: 1,
        start_ms: 0,
        end_ms: 0,
        style: "Default".to_string(),
        name: String::new(),
        margin_l: 0,
        margin_r: 0,
        margin_v: 0,
        effect: String::new(),
        text: String::new(),
    }
}

/// Comment line carrying the fade macro
pub fn fade_script_event() -> EventRecord {
    EventRecord {
        effect: SCRIPT_FX.to_string(),
        text: FADE_SCRIPT.to_string(),
        ..default_event(EventKind::Comment)
    }
}
