/*!
 * Tests for conversion options and the settings file
 */

use kbp2ass::app_config::{
    parse_offset, parse_threshold, seconds_to_ms, split_positionals, LogLevel, OptionOverrides,
};
use kbp2ass::{ConfigError, ConversionOptions, Fade, Settings};

use crate::common;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Test default option values
#[test]
fn test_defaultOptions_withNoParameters_shouldHaveCorrectDefaults() {
    let options = ConversionOptions::default();

    assert!(!options.wipe && !options.position && !options.border);
    assert!(!options.cdg && !options.transparency);
    assert_eq!(options.minimum_progression_duration, 100);
    assert_eq!(options.progression_threshold_cs(), 10);
    assert_eq!(options.fade, Fade::new(300, 200));
    assert_eq!(options.offset_ms, 0);
    assert!(options.syllable_precision);
}

#[test]
fn test_fullModeOptions_shouldEnableEveryProjectFeature() {
    let options = ConversionOptions::full_mode();

    assert!(options.wipe && options.position && options.border && options.cdg && options.transparency);
    assert!(options.syllable_precision);
}

#[test]
fn test_optionsDeserialize_withPartialJson_shouldFillDefaults() {
    let options: ConversionOptions = serde_json::from_str(r#"{"cdg": true}"#).unwrap();

    assert!(options.cdg);
    assert_eq!(options.minimum_progression_duration, 100);
    assert!(options.syllable_precision);
    assert_eq!(options.fade, Fade::default());
}

#[test]
fn test_fadeParse_withPairOrSingleValue_shouldReadDurations() {
    assert_eq!("300,200".parse::<Fade>().unwrap(), Fade::new(300, 200));
    assert_eq!("250".parse::<Fade>().unwrap(), Fade::new(250, 250));
    assert_eq!(" 10 , 20 ".parse::<Fade>().unwrap(), Fade::new(10, 20));
    assert!("0,0".parse::<Fade>().unwrap().is_disabled());
}

#[test]
fn test_fadeParse_withInvalidValues_shouldFail() {
    assert!(matches!("abc".parse::<Fade>(), Err(ConfigError::InvalidFade(_))));
    assert!(matches!("1,2,3".parse::<Fade>(), Err(ConfigError::InvalidFade(_))));
    assert!(matches!("-5".parse::<Fade>(), Err(ConfigError::InvalidFade(_))));
}

#[test]
fn test_fadeTag_shouldBeEmptyWhenDisabled() {
    assert_eq!(Fade::new(300, 200).tag(), r"\fad(300,200)");
    assert_eq!(Fade::disabled().tag(), "");
    assert_eq!(Fade::new(5, 0).to_string(), "5,0");
}

#[test]
fn test_resolve_withNoOverrides_shouldUseDefaultsAndSettingsOffset() {
    let settings = Settings {
        offset: -0.5,
        ..Settings::default()
    };
    let options = OptionOverrides::default().resolve(&settings);

    assert_eq!(
        options,
        ConversionOptions {
            offset_ms: -500,
            ..ConversionOptions::default()
        }
    );
}

/// Full mode only supplies defaults; explicit negations still win
#[test]
fn test_resolve_withFullModeAndNegation_shouldKeepExplicitValue() {
    let overrides = OptionOverrides {
        full_mode: true,
        border: Some(false),
        ..OptionOverrides::default()
    };
    let options = overrides.resolve(&Settings::default());

    assert!(options.wipe && options.position && options.cdg && options.transparency);
    assert!(!options.border);
}

#[test]
fn test_resolve_withWipe_shouldDropThresholdUnlessGiven() {
    let wipe_only = OptionOverrides {
        wipe: Some(true),
        ..OptionOverrides::default()
    };
    assert_eq!(wipe_only.resolve(&Settings::default()).minimum_progression_duration, 0);

    let explicit = OptionOverrides {
        wipe: Some(true),
        minimum_progression_duration: Some(250),
        ..OptionOverrides::default()
    };
    assert_eq!(explicit.resolve(&Settings::default()).minimum_progression_duration, 250);
}

#[test]
fn test_resolve_withExplicitOffset_shouldIgnoreSettings() {
    let settings = Settings {
        offset: 3.0,
        ..Settings::default()
    };
    let overrides = OptionOverrides {
        offset_ms: Some(-1000),
        ..OptionOverrides::default()
    };

    assert_eq!(overrides.resolve(&settings).offset_ms, -1000);
}

#[test]
fn test_splitPositionals_withLegacyThreshold_shouldExtractIt() {
    let args = split_positionals(&strings(&["in.kbp", "150", "out.ass"]), &[]).unwrap();

    assert_eq!(args.infile, "in.kbp");
    assert_eq!(args.outfile, "out.ass");
    assert_eq!(args.minimum_progression_duration, Some(150));
}

#[test]
fn test_splitPositionals_withNumericNameAfterSeparator_shouldTreatAsFile() {
    let args = split_positionals(&strings(&["in.kbp"]), &strings(&["150"])).unwrap();

    assert_eq!(args.outfile, "150");
    assert_eq!(args.minimum_progression_duration, None);
}

#[test]
fn test_splitPositionals_withoutFiles_shouldUseStdio() {
    let args = split_positionals(&[], &[]).unwrap();
    assert_eq!((args.infile.as_str(), args.outfile.as_str()), ("-", "-"));

    let only_input = split_positionals(&strings(&["song.kbp"]), &[]).unwrap();
    assert_eq!(only_input.outfile, "-");
}

#[test]
fn test_splitPositionals_withTooManyFiles_shouldFail() {
    let result = split_positionals(&strings(&["a", "b", "c"]), &[]);
    assert_eq!(result.unwrap_err(), ConfigError::TooManyFiles(3));
}

#[test]
fn test_parseThreshold_withNonNumber_shouldFail() {
    assert_eq!(parse_threshold("200"), Ok(200));
    assert!(matches!(
        parse_threshold("fast"),
        Err(ConfigError::InvalidNumber { option: "minimum-progression-duration", .. })
    ));
}

#[test]
fn test_parseOffset_withFractionalSeconds_shouldFloorToMilliseconds() {
    assert_eq!(parse_offset("1.5"), Ok(1500));
    assert_eq!(parse_offset("-1"), Ok(-1000));
    assert_eq!(parse_offset("-0.0005"), Ok(-1));
    assert!(parse_offset("soon").is_err());
    assert!(parse_offset("inf").is_err());
    assert_eq!(seconds_to_ms(0.0019), 1);
}

#[test]
fn test_settingsLoad_withMissingFile_shouldReturnDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let settings = Settings::load(temp_dir.path().join("absent.json")).unwrap();

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.log_level, LogLevel::Warn);
}

#[test]
fn test_settingsLoad_withJsonFile_shouldReadValues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "settings.json",
        r#"{"offset": 1.25, "log_level": "debug"}"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.offset_ms(), 1250);
    assert_eq!(settings.log_level, LogLevel::Debug);
}

#[test]
fn test_settingsLoad_withMalformedJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "settings.json", "{offset: }").unwrap();

    assert!(Settings::load(&path).is_err());
}

#[test]
fn test_settingsValidate_withNonFiniteOffset_shouldFail() {
    let settings = Settings {
        offset: f64::NAN,
        ..Settings::default()
    };
    assert!(matches!(settings.validate(), Err(ConfigError::Settings(_))));
}

#[test]
fn test_logLevel_shouldConvertToLevelFilter() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(&LogLevel::Trace), log::LevelFilter::Trace);
}
