//! Integration tests for Teleinfo frame decoding
//!
//! End-to-end decoding of realistic frames through the public API.

use teleinfo_codec::{
    is_valid_record, parse_frame, seal_message, unknown_keys, FieldValue, ProtocolError,
    MESSAGE_SEPARATOR,
};

/// Frame of a base-option meter, as handed over by the serial reader
fn base_option_frame() -> Vec<u8> {
    [
        seal_message("ADCO", "020830087360"),
        seal_message("OPTARIF", "BASE"),
        seal_message("ISOUSC", "30"),
        seal_message("BASE", "001234567"),
        seal_message("PTEC", "TH.."),
        seal_message("IINST", "008"),
        seal_message("IMAX", "029"),
        seal_message("PAPP", "01900"),
        seal_message("HHPHC", "A"),
        seal_message("MOTDETAT", "000000"),
    ]
    .join(MESSAGE_SEPARATOR)
}

/// Frame of an off-peak option meter
fn off_peak_frame() -> Vec<u8> {
    [
        &b"ADCO 020830087360 <"[..],
        b"OPTARIF HC.. <",
        b"ISOUSC 45 ?",
        b"HCHC 012345678 *",
        b"HCHP 023456789 ?",
        b"PTEC HP..  ",
        b"IINST 008 _",
        b"IMAX 029 J",
        b"PAPP 01900 +",
        b"HHPHC A ,",
        b"MOTDETAT 000000 B",
    ]
    .join(MESSAGE_SEPARATOR)
}

#[test]
fn test_complete_base_frame() {
    let record = parse_frame(&base_option_frame()).expect("valid frame");

    assert_eq!(record.len(), 10);
    assert_eq!(record.get_text("ADCO"), Some("020830087360"));
    assert_eq!(record.get_integer("BASE"), Some(1_234_567));
    assert_eq!(record.get_integer("PAPP"), Some(1900));
    assert_eq!(record.get_text("MOTDETAT"), Some("000000"));
    assert!(is_valid_record(&record));
}

#[test]
fn test_complete_off_peak_frame() {
    let record = parse_frame(&off_peak_frame()).expect("valid frame");

    assert_eq!(record.get_text("OPTARIF"), Some("HC.."));
    assert_eq!(record.get_integer("HCHC"), Some(12_345_678));
    assert_eq!(record.get_integer("HCHP"), Some(23_456_789));
    assert_eq!(record.get_text("PTEC"), Some("HP.."));
    assert_eq!(record.get_integer("ISOUSC"), Some(45));
    assert!(is_valid_record(&record));
}

#[test]
fn test_single_bit_error_anywhere_rejects_frame() {
    let frame = base_option_frame();

    for position in 0..frame.len() {
        if frame[position] == b'\n' {
            continue;
        }
        let mut corrupted = frame.clone();
        // flip the lowest bit: changes the byte sum by exactly one
        corrupted[position] ^= 0x01;

        match parse_frame(&corrupted) {
            Err(err) => assert!(err.is_checksum_error(), "byte {position}: {err}"),
            Ok(record) => panic!("byte {position}: corrupted frame accepted as {record:?}"),
        }
    }
}

#[test]
fn test_unknown_field_passes_checksum_but_not_shape() {
    let frame = [seal_message("BASE", "001234"), b"FOO 42 J".to_vec()].join(MESSAGE_SEPARATOR);

    let record = parse_frame(&frame).expect("checksums are valid");
    assert_eq!(record.get("FOO"), Some(&FieldValue::Text("42".to_string())));
    assert!(!is_valid_record(&record));
    assert_eq!(unknown_keys(&record), vec!["FOO"]);
}

#[test]
fn test_parsed_record_validity_matches_catalog() {
    let frames = [
        base_option_frame(),
        seal_message("IINST1", "003"),
        [seal_message("PAPP", "00450"), seal_message("PPOT", "00")].join(MESSAGE_SEPARATOR),
    ];

    for frame in frames {
        let record = parse_frame(&frame).expect("valid checksums");
        let all_known = record
            .keys()
            .all(|key| teleinfo_codec::FieldCatalog::contains(key));
        assert_eq!(is_valid_record(&record), all_known);
    }
}

#[test]
fn test_trailing_separator_is_rejected() {
    let mut frame = base_option_frame();
    frame.extend_from_slice(MESSAGE_SEPARATOR);

    let err = parse_frame(&frame).unwrap_err();
    assert!(matches!(err, ProtocolError::ChecksumMismatch { index: 10, received: None, .. }));
}
