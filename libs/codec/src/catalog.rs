//! # Field Catalog - Teleinfo Field Registry
//!
//! ## Purpose
//!
//! Static registry of the field codes a historic single-phase meter emits,
//! with the primitive type each value is coerced to. The table is the de
//! facto protocol schema: the parser uses it for type coercion and the
//! record validator uses it to reject unknown fields.
//!
//! ## Architecture Role
//!
//! ```text
//! Raw Message → [Field Catalog] → Typed Value
//!      ↓              ↓               ↓
//!  "PAPP 01900"   PAPP: Integer   Integer(1900)
//! ```
//!
//! Three-phase and professional meter fields are not part of the table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Primitive type of a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
}

/// Static description of one known field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
}

const fn text(key: &'static str, description: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        field_type: FieldType::Text,
        description,
    }
}

const fn integer(key: &'static str, description: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key,
        field_type: FieldType::Integer,
        description,
    }
}

/// Every field recognized by the decoder, in meter emission order
pub const FIELDS: &[FieldDescriptor] = &[
    text("ADCO", "Meter address"),
    text("OPTARIF", "Selected tariff option"),
    integer("ISOUSC", "Subscribed current (A)"),
    integer("BASE", "Base option index (Wh)"),
    // Off-peak option
    integer("HCHP", "Peak hours index (Wh)"),
    integer("HCHC", "Off-peak hours index (Wh)"),
    // EJP option
    integer("EJPHN", "EJP normal hours index (Wh)"),
    integer("EJPHPM", "EJP mobile peak hours index (Wh)"),
    integer("PEJP", "EJP period notice (min)"),
    // Tempo option
    integer("BBRHCJB", "Tempo blue day off-peak index (Wh)"),
    integer("BBRHPJB", "Tempo blue day peak index (Wh)"),
    integer("BBRHCJW", "Tempo white day off-peak index (Wh)"),
    integer("BBRHPJW", "Tempo white day peak index (Wh)"),
    integer("BBRHCJR", "Tempo red day off-peak index (Wh)"),
    integer("BBRHPJR", "Tempo red day peak index (Wh)"),
    text("PTEC", "Current tariff period"),
    text("DEMAIN", "Tomorrow's Tempo color"),
    integer("IINST", "Instantaneous current (A)"),
    integer("ADPS", "Subscribed power exceeded warning (A)"),
    integer("IMAX", "Maximum current drawn (A)"),
    integer("PAPP", "Apparent power (VA)"),
    text("HHPHC", "Peak/off-peak hours schedule"),
    text("MOTDETAT", "Meter status word"),
];

static INDEX: Lazy<HashMap<&'static str, &'static FieldDescriptor>> =
    Lazy::new(|| FIELDS.iter().map(|field| (field.key, field)).collect());

/// Lookup facade over [`FIELDS`]
pub struct FieldCatalog;

impl FieldCatalog {
    /// Declared type of a field, `None` when the key is unknown
    pub fn lookup(key: &str) -> Option<FieldType> {
        INDEX.get(key).map(|field| field.field_type)
    }

    /// Full descriptor of a field
    pub fn descriptor(key: &str) -> Option<&'static FieldDescriptor> {
        INDEX.get(key).copied()
    }

    pub fn contains(key: &str) -> bool {
        INDEX.contains_key(key)
    }

    /// Known keys in emission order
    pub fn keys() -> impl Iterator<Item = &'static str> {
        FIELDS.iter().map(|field| field.key)
    }

    pub fn len() -> usize {
        FIELDS.len()
    }
}
