//! Property tests for the message checksum

use proptest::prelude::*;
use teleinfo_codec::{checksum, checksum_of_payload, is_valid_message, parse_frame, seal_message};

proptest! {
    #[test]
    fn valid_iff_last_byte_matches_checksum(
        payload in "[A-Z]{1,8} [0-9A-Z.]{1,12}",
        last in 0x20u8..0x7F,
    ) {
        let mut message = payload.clone().into_bytes();
        message.push(b' ');
        message.push(last);

        prop_assert_eq!(is_valid_message(&message), last == checksum_of_payload(payload.as_bytes()));
        prop_assert_eq!(is_valid_message(&message), last == checksum(&message));
    }

    #[test]
    fn checksum_is_printable(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
        let value = checksum_of_payload(&payload);
        prop_assert!((0x20..0x60).contains(&value));
    }

    #[test]
    fn sealed_integer_fields_decode(value in 0u32..1_000_000_000) {
        let message = seal_message("BASE", &format!("{value:09}"));
        let record = parse_frame(&message).unwrap();
        prop_assert_eq!(record.get_integer("BASE"), Some(i64::from(value)));
    }
}
