//! Record shape validation
//!
//! Cheap structural check performed after checksum validation: a frame
//! whose messages are all intact may still carry fields this decoder does
//! not know, for instance when read from an unsupported meter variant.

use crate::catalog::FieldCatalog;
use crate::record::Record;

/// True iff every key of the record is a known field
pub fn is_valid_record(record: &Record) -> bool {
    record.keys().all(FieldCatalog::contains)
}

/// Keys of the record missing from the field catalog
pub fn unknown_keys(record: &Record) -> Vec<&str> {
    record
        .keys()
        .filter(|key| !FieldCatalog::contains(key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DATETIME_KEY;

    #[test]
    fn test_known_fields_are_valid() {
        let mut record = Record::new();
        record.insert("ADCO", "020830087360");
        record.insert("BASE", 1234i64);
        assert!(is_valid_record(&record));
        assert!(unknown_keys(&record).is_empty());
    }

    #[test]
    fn test_empty_record_is_valid() {
        assert!(is_valid_record(&Record::new()));
    }

    #[test]
    fn test_unknown_field_is_invalid() {
        let mut record = Record::new();
        record.insert("BASE", 1234i64);
        record.insert("FOO", "42");
        record.insert("IINST1", 3i64);
        assert!(!is_valid_record(&record));
        assert_eq!(unknown_keys(&record), vec!["FOO", "IINST1"]);
    }

    #[test]
    fn test_datetime_is_not_a_catalog_field() {
        let mut record = Record::new();
        record.insert(DATETIME_KEY, "2024-01-01 00:00:00");
        assert!(!is_valid_record(&record));
    }
}
