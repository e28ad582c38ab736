//! Energy cost estimate derived from an index field

use super::Processor;
use crate::error::ProcessorError;
use teleinfo_codec::{FieldValue, Record};

/// Cost of the energy consumed since a reference index
///
/// The result is an integer amount in thousandths of the currency unit:
/// `(index - reference_index) Wh × price_per_kwh_millis / 1000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostProcessor {
    index_key: String,
    reference_index: i64,
    price_per_kwh_millis: i64,
}

impl CostProcessor {
    pub fn new(index_key: impl Into<String>, reference_index: i64, price_per_kwh_millis: i64) -> Self {
        Self {
            index_key: index_key.into(),
            reference_index,
            price_per_kwh_millis,
        }
    }
}

impl Processor for CostProcessor {
    fn process(&mut self, record: &Record) -> Result<FieldValue, ProcessorError> {
        let value = record
            .get(&self.index_key)
            .ok_or_else(|| ProcessorError::MissingField(self.index_key.clone()))?;
        let index = value.as_integer().ok_or_else(|| ProcessorError::UnexpectedType {
            key: self.index_key.clone(),
            expected: "integer",
            found: value.type_name(),
        })?;

        let consumed_wh = i128::from(index) - i128::from(self.reference_index);
        let cost = consumed_wh * i128::from(self.price_per_kwh_millis) / 1000;
        i64::try_from(cost)
            .map(FieldValue::Integer)
            .map_err(|_| ProcessorError::Other(format!("cost {cost} overflows")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_since_reference() {
        let mut processor = CostProcessor::new("BASE", 1_000_000, 2516);
        let mut record = Record::new();
        record.insert("BASE", 1_010_000i64);

        // 10 kWh at 2.516 per kWh
        assert_eq!(processor.process(&record).unwrap(), FieldValue::Integer(25_160));
    }

    #[test]
    fn test_missing_index() {
        let mut processor = CostProcessor::new("HCHC", 0, 1800);
        let err = processor.process(&Record::new()).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingField(key) if key == "HCHC"));
    }

    #[test]
    fn test_text_index_is_rejected() {
        let mut processor = CostProcessor::new("PTEC", 0, 1800);
        let mut record = Record::new();
        record.insert("PTEC", "TH..");

        let err = processor.process(&record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field PTEC is text, expected integer"
        );
    }
}
