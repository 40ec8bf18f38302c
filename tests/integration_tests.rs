//! Integration tests for the CD+G encoder
//!
//! Tests the full pipeline from display events to packet bytes.

use cdg::{
    assemble, encode, encode_timing_json, read_stream, write_stream, CdgError, ColorEntry,
    DisplayEvent, EncoderConfig, Instruction, PaletteHalf, PACKET_LEN,
};

fn hello_world() -> Vec<DisplayEvent> {
    vec![DisplayEvent::new(0, "HELLO"), DisplayEvent::new(2000, "WORLD")]
}

#[test]
fn test_hello_world_end_to_end() {
    let stream = assemble(&hello_world(), &EncoderConfig::default()).unwrap();
    let decoded: Vec<Instruction> = stream
        .packets()
        .iter()
        .map(|p| p.decode().unwrap())
        .collect();

    assert_eq!(decoded.len(), 606);
    assert_eq!(decoded[0], Instruction::MemoryPreset { color: 0, repeat: 0 });
    assert!(matches!(
        decoded[1],
        Instruction::LoadColorTable { half: PaletteHalf::Low, .. }
    ));
    assert!(matches!(
        decoded[2],
        Instruction::LoadColorTable { half: PaletteHalf::High, .. }
    ));

    let hello_columns: Vec<u8> = decoded[3..8]
        .iter()
        .map(|i| match i {
            Instruction::TileBlock { row: 8, column, .. } => *column,
            other => panic!("Expected TileBlock on row 8, got {:?}", other),
        })
        .collect();
    assert_eq!(hello_columns, vec![1, 2, 3, 4, 5]);

    assert!(decoded[8..600].iter().all(|i| *i == Instruction::NoOp));
    assert_eq!(decoded[600], Instruction::MemoryPreset { color: 0, repeat: 0 });
    assert!(decoded[601..]
        .iter()
        .all(|i| matches!(i, Instruction::TileBlock { .. })));
}

#[test]
fn test_output_is_reproducible() {
    let config = EncoderConfig::default();
    let first = encode(&hello_world(), &config).unwrap();
    let second = encode(&hello_world(), &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 606 * PACKET_LEN);
}

#[test]
fn test_palette_in_stream() {
    let config = EncoderConfig::from_yaml(r##"palette: ["#000", "#FFF", "#0F0"]"##).unwrap();
    let stream = assemble(&[], &config).unwrap();
    match stream.get(1).unwrap().decode().unwrap() {
        Instruction::LoadColorTable { half, entries } => {
            assert_eq!(half, PaletteHalf::Low);
            assert_eq!(entries[2], ColorEntry::from_rgb4(0, 15, 0));
            assert_eq!(entries[3], ColorEntry::BLACK);
        }
        other => panic!("Expected LoadColorTable, got {:?}", other),
    }
}

#[test]
fn test_timing_export_pipeline() {
    let json = r#"[
        {"time": 0.0, "text": "Welcome to karaoke"},
        {"time": 2.0, "text": "Sing along with me"},
        {"time": 4.0, "text": "Follow the bouncing ball"},
        {"time": 6.0, "text": "Let's begin..."}
    ]"#;
    let bytes = encode_timing_json(json, &EncoderConfig::default()).unwrap();
    let packets = read_stream(&bytes).unwrap();

    // last line starts at index 1800 with a clear, then 13 tiles (spaces skipped)
    assert_eq!(packets[1800].decode().unwrap(), Instruction::MemoryPreset { color: 0, repeat: 0 });
    assert_eq!(packets.len(), 1800 + 1 + 13);
}

#[test]
fn test_write_and_read_file_format() {
    let stream = assemble(&hello_world(), &EncoderConfig::default()).unwrap();
    let mut sink = Vec::new();
    write_stream(&stream, &mut sink).unwrap();

    let packets = read_stream(&sink).unwrap();
    assert_eq!(packets.len(), stream.len());
    assert!(packets.iter().all(|p| p.verify()));
}

#[test]
fn test_lowercase_matches_uppercase() {
    let config = EncoderConfig::default();
    let lower = encode(&[DisplayEvent::new(0, "hello")], &config).unwrap();
    let upper = encode(&[DisplayEvent::new(0, "HELLO")], &config).unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn test_unsupported_characters_do_not_fail() {
    let events = vec![DisplayEvent::new(0, "\u{266a} la la \u{266a}")];
    let stream = assemble(&events, &EncoderConfig::default()).unwrap();
    assert_eq!(stream.len(), 3 + 6);
}

#[test]
fn test_strict_mode_from_config() {
    let config = EncoderConfig::from_yaml("strict-order: true").unwrap();
    let events = vec![DisplayEvent::new(5000, "LATE"), DisplayEvent::new(0, "EARLY")];
    let result = assemble(&events, &config);
    assert!(matches!(
        result,
        Err(CdgError::UnsortedInputRejected { position: 1, .. })
    ));
}

#[test]
fn test_custom_packet_rate() {
    let config = EncoderConfig::from_yaml("packet-rate: 75").unwrap();
    let stream = assemble(&[DisplayEvent::new(2000, "X")], &config).unwrap();
    assert_eq!(stream.len(), 151);
    assert!(matches!(
        stream.get(150).unwrap().decode().unwrap(),
        Instruction::TileBlock { .. }
    ));
}

#[test]
fn test_huge_timestamp_returns_error() {
    let events = vec![DisplayEvent::new(u64::MAX, "X")];
    let result = encode(&events, &EncoderConfig::default());
    assert!(matches!(result, Err(CdgError::StreamTooLong { .. })));
}

#[test]
fn test_timing_export_typo_returns_error() {
    let json = r#"[{"time": 1e30, "text": "X"}]"#;
    let result = encode_timing_json(json, &EncoderConfig::default());
    assert!(matches!(
        result,
        Err(CdgError::InvalidTimestamp { position: 0, .. })
    ));
}

#[test]
fn test_timing_export_past_max_duration() {
    let config = EncoderConfig::from_yaml("max-duration: 60").unwrap();
    let json = r#"[{"time": 0.0, "text": "INTRO"}, {"time": 61.0, "text": "TOO LATE"}]"#;
    let result = encode_timing_json(json, &config);
    assert!(matches!(
        result,
        Err(CdgError::StreamTooLong { index: 18_300, limit: 18_000 })
    ));
}
