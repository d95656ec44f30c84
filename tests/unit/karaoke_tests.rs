/*!
 * Tests for karaoke line encoding
 */

use kbp2ass::ass::document::EventKind;
use kbp2ass::ass::karaoke::wipe_tag;
use kbp2ass::ass::KaraokeEncoder;
use kbp2ass::geometry::Alignment;
use kbp2ass::kbp::{KaraokeProject, Sentence, SentenceBody, Syllable, WipeMode};
use kbp2ass::{ConversionOptions, Fade, KbpParser};

use crate::common;

fn sample(options: &ConversionOptions) -> KaraokeProject {
    KbpParser::new(options)
        .parse(&common::sample_project())
        .expect("sample should parse")
}

fn syllable(text: &str, start_ms: i64, end_ms: i64) -> Syllable {
    Syllable {
        text: text.to_string(),
        start_ms,
        end_ms,
        wipe: WipeMode::Inherit,
    }
}

fn sentence(start_ms: i64, end_ms: i64, syllables: Vec<Syllable>) -> Sentence {
    Sentence {
        id: 1,
        start_ms,
        end_ms,
        style: None,
        vertical_position: 0,
        horizontal_position: 0,
        alignment: Alignment::Center,
        body: SentenceBody::Syllables(syllables),
    }
}

#[test]
fn test_wipeTag_shouldSelectTagByMode() {
    assert_eq!(wipe_tag(true, 30), r"{\kf30}");
    assert_eq!(wipe_tag(false, 5), r"{\k5}");
}

/// Only fragments longer than the threshold wipe progressively
#[test]
fn test_isProgressive_withDefaultThreshold_shouldCompareDuration() {
    let options = ConversionOptions::default();
    let encoder = KaraokeEncoder::new(&options);

    assert!(encoder.is_progressive(300, WipeMode::Inherit, None));
    assert!(encoder.is_progressive(110, WipeMode::Inherit, None));
    assert!(!encoder.is_progressive(100, WipeMode::Inherit, None));
    assert!(!encoder.is_progressive(50, WipeMode::Progressive, Some(true)));

    // Without the wipe option the project's own mode is ignored
    assert!(encoder.is_progressive(300, WipeMode::NonProgressive, Some(false)));
}

#[test]
fn test_isProgressive_withWipeOption_shouldHonourProjectMode() {
    let options = ConversionOptions {
        wipe: true,
        minimum_progression_duration: 0,
        ..ConversionOptions::default()
    };
    let encoder = KaraokeEncoder::new(&options);

    assert!(encoder.is_progressive(300, WipeMode::Progressive, None));
    assert!(!encoder.is_progressive(300, WipeMode::NonProgressive, Some(true)));
    assert!(encoder.is_progressive(300, WipeMode::Inherit, Some(true)));
    assert!(!encoder.is_progressive(300, WipeMode::Inherit, Some(false)));
    assert!(!encoder.is_progressive(300, WipeMode::Inherit, None));
}

#[test]
fn test_karaokeText_withSampleLine_shouldInsertGapWipe() {
    let options = ConversionOptions::default();
    let project = sample(&options);
    let encoder = KaraokeEncoder::new(&options);

    assert_eq!(
        encoder.karaoke_text(&project.sentences[0], project.default_wipe_progressive),
        r"{\kf30}He{\kf28}llo{\k10}{\kf40} world"
    );
    assert_eq!(
        encoder.karaoke_text(&project.sentences[2], project.default_wipe_progressive),
        r"{\kf90}Last{\kf100} line"
    );
}

/// Gaps of at most 10ms are absorbed, longer ones are truncated to centiseconds
#[test]
fn test_karaokeText_withSmallGaps_shouldOnlyTagLongerGaps() {
    let options = ConversionOptions::default();
    let encoder = KaraokeEncoder::new(&options);

    let tight = sentence(0, 1010, vec![syllable("a", 0, 500), syllable("b", 510, 1010)]);
    assert_eq!(encoder.karaoke_text(&tight, None), r"{\kf50}a{\kf50}b");

    let loose = sentence(0, 1015, vec![syllable("a", 0, 500), syllable("b", 515, 1015)]);
    assert_eq!(encoder.karaoke_text(&loose, None), r"{\kf50}a{\k1}{\kf50}b");
}

#[test]
fn test_karaokeText_withWipeOption_shouldUseInstantWipeForWordByWord() {
    let options = ConversionOptions {
        wipe: true,
        minimum_progression_duration: 0,
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let encoder = KaraokeEncoder::new(&options);

    assert_eq!(
        encoder.karaoke_text(&project.sentences[1], project.default_wipe_progressive),
        r"{\kf40}Sec{\k50}ond"
    );
}

#[test]
fn test_karaokeText_withFlattenedSentence_shouldUseSingleWipe() {
    let options = ConversionOptions {
        syllable_precision: false,
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let encoder = KaraokeEncoder::new(&options);

    assert_eq!(
        encoder.karaoke_text(&project.sentences[0], project.default_wipe_progressive),
        r"{\kf108}Hello world"
    );
}

#[test]
fn test_encode_withDefaults_shouldProduceCommentAndDialogue() {
    let options = ConversionOptions::default();
    let project = sample(&options);
    let line = KaraokeEncoder::new(&options).encode(&project, &project.sentences[0]);

    assert_eq!(line.reference.kind, EventKind::Comment);
    assert_eq!(line.reference.effect, "karaoke");
    assert_eq!(line.reference.text, r"{\kf30}He{\kf28}llo{\k10}{\kf40} world");

    assert_eq!(line.animated.kind, EventKind::Dialogue);
    assert_eq!(line.animated.effect, "fx");
    assert_eq!(
        line.animated.text,
        r"{\an8\k0\fad(300,200)}{\kf30}He{\kf28}llo{\k10}{\kf40} world"
    );

    for event in [&line.reference, &line.animated] {
        assert_eq!((event.start_ms, event.end_ms), (5920, 7000));
        assert_eq!(event.style, "Style00_Default");
        assert_eq!(event.layer, 1);
    }
}

/// The pre-roll wipe covers the time before the first syllable
#[test]
fn test_encode_withLateFirstSyllable_shouldAddPreRoll() {
    let options = ConversionOptions::default();
    let project = sample(&options);
    let line = KaraokeEncoder::new(&options).encode(&project, &project.sentences[1]);

    assert_eq!(line.animated.text, r"{\an7\k10\fad(300,200)}{\kf40}Sec{\kf50}ond");
    assert_eq!(line.animated.style, "Style01_Duet");
}

#[test]
fn test_encode_withPositionOnly_shouldZeroCentredX() {
    let options = ConversionOptions {
        position: true,
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let encoder = KaraokeEncoder::new(&options);

    let centred = encoder.encode(&project, &project.sentences[0]);
    assert!(centred.animated.text.starts_with(r"{\an8\pos(0,7)\k0"));

    let left = encoder.encode(&project, &project.sentences[1]);
    assert!(left.animated.text.starts_with(r"{\an7\pos(6,40)\k10"));

    // The reference copy never carries override tags
    assert!(!centred.reference.text.contains(r"\pos"));
}

#[test]
fn test_encode_withPositionAndCdg_shouldKeepCentredX() {
    let options = ConversionOptions {
        position: true,
        cdg: true,
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let line = KaraokeEncoder::new(&options).encode(&project, &project.sentences[0]);

    assert!(line.animated.text.starts_with(r"{\an8\pos(144,7)\k0"));
}

#[test]
fn test_encode_withFadeDisabled_shouldOmitFadeTag() {
    let options = ConversionOptions {
        fade: Fade::disabled(),
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let line = KaraokeEncoder::new(&options).encode(&project, &project.sentences[0]);

    assert!(line.animated.text.starts_with(r"{\an8\k0}{\kf30}"));
    assert!(!line.animated.text.contains(r"\fad"));
}

#[test]
fn test_encode_withCustomFade_shouldUseGivenDurations() {
    let options = ConversionOptions {
        fade: Fade::new(250, 250),
        ..ConversionOptions::default()
    };
    let project = sample(&options);
    let line = KaraokeEncoder::new(&options).encode(&project, &project.sentences[0]);

    assert!(line.animated.text.starts_with(r"{\an8\k0\fad(250,250)}"));
}

/// Sentences without a style fall back to an empty style name
#[test]
fn test_encode_withoutStyle_shouldLeaveStyleEmpty() {
    let options = ConversionOptions::default();
    let project = KaraokeProject::default();
    let line = KaraokeEncoder::new(&options).encode(&project, &sentence(0, 500, vec![syllable("x", 0, 500)]));

    assert_eq!(line.animated.style, "");
    assert_eq!(line.animated.text, r"{\an8\k0\fad(300,200)}{\kf50}x");
}
