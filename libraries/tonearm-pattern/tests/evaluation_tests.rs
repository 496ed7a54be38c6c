use std::path::{Path, PathBuf};
use tonearm_core::TrackMetadata;
use tonearm_pattern::{PatternContext, PatternOptions, Template, TemplatePreset};

fn eagles() -> TrackMetadata {
    TrackMetadata::builder()
        .artist("Eagles")
        .album("Hotel California")
        .title("Hotel California")
        .year(1976)
        .track_number(1)
        .build()
}

#[test]
fn with_year_layout() {
    let template = Template::parse(TemplatePreset::WithYear.template()).unwrap();
    let metadata = eagles();
    let context = PatternContext::new(&metadata, Path::new("/in/track01.mp3"));

    let path = template.evaluate_path(&context);
    assert_eq!(
        path,
        PathBuf::from("Eagles/[1976] Hotel California/01 - Hotel California.mp3")
    );
}

#[test]
fn standard_layout_with_absent_fields() {
    let template = Template::parse(TemplatePreset::Standard.template()).unwrap();
    let metadata = TrackMetadata::default();
    let context = PatternContext::new(&metadata, Path::new("/in/mystery.ogg"));

    let segments = template.evaluate(&context);
    assert_eq!(segments, ["Unknown", "Unknown", "00 - Unknown.ogg"]);
}

#[test]
fn classical_falls_back_from_composer_to_artist() {
    let template = Template::parse(TemplatePreset::Classical.template()).unwrap();
    let metadata = TrackMetadata::builder()
        .artist("Berliner Philharmoniker")
        .album("Symphony No. 9")
        .title("Ode to Joy")
        .year(1962)
        .track_number(4)
        .build();
    let context = PatternContext::new(&metadata, Path::new("/in/d.flac"));

    let segments = template.evaluate(&context);
    assert_eq!(segments[0], "Classical");
    assert_eq!(segments[1], "Berliner Philharmoniker");
    assert_eq!(segments[2], "1962 - Symphony No. 9");
    assert_eq!(segments[3], "04 - Ode to Joy.flac");
}

#[test]
fn compilation_prefers_album_artist() {
    let template = Template::parse(TemplatePreset::Compilation.template()).unwrap();
    let metadata = TrackMetadata::builder()
        .artist("Freddie Mercury")
        .album_artist("Various Artists")
        .album("Greatest Duets")
        .title("Barcelona")
        .year(1988)
        .track_number(7)
        .build();
    let context = PatternContext::new(&metadata, Path::new("/in/07.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments[0], "Various Artists");
    assert_eq!(segments[2], "07 - Freddie Mercury - Barcelona.mp3");
}

#[test]
fn literal_fallback_is_used_verbatim() {
    let template = Template::parse("{album_artist?Compilations}/{title}.{ext}").unwrap();
    let metadata = TrackMetadata::builder().title("Track").build();
    let context = PatternContext::new(&metadata, Path::new("/in/a.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments, ["Compilations", "Track.mp3"]);
}

#[test]
fn year4_is_empty_when_absent() {
    let template = Template::parse("{artist}/[{year4}] {album}/{title}.{ext}").unwrap();
    let metadata = TrackMetadata::builder()
        .artist("Eagles")
        .album("Hotel California")
        .title("New Kid in Town")
        .build();
    let context = PatternContext::new(&metadata, Path::new("/in/a.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments[1], "[] Hotel California");
}

#[test]
fn segments_are_sanitized_independently() {
    let template = Template::parse(TemplatePreset::Standard.template()).unwrap();
    let metadata = TrackMetadata::builder()
        .artist("AC/DC")
        .album("Back in Black?")
        .title("What: A Song")
        .track_number(2)
        .build();
    let context = PatternContext::new(&metadata, Path::new("/in/a.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments[0], "AC_DC");
    assert_eq!(segments[1], "Back in Black");
    assert_eq!(segments[2], "02 - What_ A Song.mp3");
    for segment in &segments {
        assert!(!segment.contains('/'));
        assert!(!segment.is_empty());
    }
}

#[test]
fn traversal_segments_are_neutralized() {
    let template = Template::parse("{artist}/{title}.{ext}").unwrap();
    let metadata = TrackMetadata::builder().artist("..").title("x").build();
    let context = PatternContext::new(&metadata, Path::new("/in/a.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments[0], "Unknown");
    assert!(segments.iter().all(|segment| segment != ".."));
}

#[test]
fn evaluation_always_emits_at_least_one_segment() {
    let template = Template::parse("{title}").unwrap();
    let metadata = TrackMetadata::default();
    let context = PatternContext::new(&metadata, Path::new("/in/a.mp3"));

    let segments = template.evaluate(&context);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0], "Unknown");
}

#[test]
fn custom_unknown_replacement_and_segment_limit() {
    let template = Template::parse("{artist}/{title}.{ext}").unwrap();
    let metadata = TrackMetadata::builder()
        .title("t".repeat(400))
        .build();
    let options = PatternOptions {
        unknown_replacement: "No Artist".to_string(),
        max_segment_length: 32,
    };
    let context = PatternContext::with_options(&metadata, Path::new("/in/a.mp3"), options);

    let segments = template.evaluate(&context);
    assert_eq!(segments[0], "No Artist");
    assert!(segments[1].chars().count() <= 32);
}
