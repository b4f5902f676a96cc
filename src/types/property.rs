//! The Property Tree: a typed, recursive metadata node.
//!
//! `PropertyValue` is a tagged union over every `(type, arity)` combination
//! a module may record. There are no cycles and no shared subtrees: a
//! `Property` of `property` arity owns its children outright, the same way
//! the rest of this crate prefers an owned tree over reference-counted
//! shared structure.

use serde::{Deserialize, Serialize};

use crate::core::rational::{Rational, SRational};

/// Scalar or compound payload a [`Property`] carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    IntegerArray(Vec<i64>),
    Float(f64),
    FloatArray(Vec<f64>),
    Rational(Rational),
    RationalArray(Vec<Rational>),
    SRational(SRational),
    SRationalArray(Vec<SRational>),
    /// Interpreted text, or a raw byte string percent-escaped on non-ASCII.
    Text(String),
    TextArray(Vec<String>),
    Date(chrono::DateTime<chrono::Utc>),
    /// A generic subtree: list of named child Properties, e.g. an
    /// enumerated-bitmask label list.
    PropertyList(Vec<Property>),
    /// The `nisoImageMetadata` composite: a distinct subtree variant so a
    /// consumer can match on "this is the NISO Z39.87 image-technical-
    /// metadata composite" rather than an undistinguished generic subtree.
    NisoImageMetadata(Vec<Property>),
}

/// A named, typed node in the metadata tree.
///
/// Invariants: `value` must agree with the declared `(type, arity)` the
/// constructor was called for (enforced by construction — there is no
/// public way to build a `Property` with a mismatched value); raw-vs-
/// interpreted is decided once at construction and never re-derived by a
/// consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self { name: name.into(), value }
    }

    pub fn integer(name: impl Into<String>, v: i64) -> Self {
        Self::new(name, PropertyValue::Integer(v))
    }

    pub fn integer_array(name: impl Into<String>, v: Vec<i64>) -> Self {
        Self::new(name, PropertyValue::IntegerArray(v))
    }

    pub fn text(name: impl Into<String>, v: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::Text(v.into()))
    }

    pub fn text_array(name: impl Into<String>, v: Vec<String>) -> Self {
        Self::new(name, PropertyValue::TextArray(v))
    }

    pub fn rational(name: impl Into<String>, v: Rational) -> Self {
        Self::new(name, PropertyValue::Rational(v))
    }

    pub fn rational_array(name: impl Into<String>, v: Vec<Rational>) -> Self {
        Self::new(name, PropertyValue::RationalArray(v))
    }

    /// A labeled enumeration value in interpreted mode, or the raw integer
    /// in raw mode — the caller (the module, honoring `ModuleOptions::raw`)
    /// chooses which to build; this constructor does not itself branch on
    /// a global raw flag.
    pub fn labeled_or_raw(name: impl Into<String>, raw: i64, label: Option<&str>, want_raw: bool) -> Self {
        match (want_raw, label) {
            (false, Some(l)) => Self::text(name, l),
            _ => Self::integer(name, raw),
        }
    }

    /// A bitmask value decomposed into every label it carries, in
    /// interpreted mode, or the raw integer in raw mode — the bitmask
    /// counterpart to [`Property::labeled_or_raw`]'s single-choice
    /// enumeration.
    pub fn labels_or_raw(name: impl Into<String>, raw: i64, labels: Vec<&str>, want_raw: bool) -> Self {
        if want_raw || labels.is_empty() {
            Self::integer(name, raw)
        } else {
            Self::text_array(name, labels.into_iter().map(str::to_string).collect())
        }
    }

    pub fn subtree(name: impl Into<String>, children: Vec<Property>) -> Self {
        Self::new(name, PropertyValue::PropertyList(children))
    }

    /// A `nisoImageMetadata` composite node (NISO Z39.87 technical metadata
    /// for still images), distinct from a generic [`PropertyValue::PropertyList`]
    /// subtree.
    pub fn niso_image_metadata(name: impl Into<String>, children: Vec<Property>) -> Self {
        Self::new(name, PropertyValue::NisoImageMetadata(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_or_raw_respects_raw_mode() {
        let interpreted = Property::labeled_or_raw("Compression", 1, Some("Uncompressed"), false);
        assert_eq!(interpreted.value, PropertyValue::Text("Uncompressed".into()));

        let raw = Property::labeled_or_raw("Compression", 1, Some("Uncompressed"), true);
        assert_eq!(raw.value, PropertyValue::Integer(1));
    }

    #[test]
    fn labeled_or_raw_falls_back_to_raw_on_unknown_label() {
        let prop = Property::labeled_or_raw("Compression", 999, None, false);
        assert_eq!(prop.value, PropertyValue::Integer(999));
    }

    #[test]
    fn labels_or_raw_emits_text_array_unless_raw_mode_or_empty() {
        let interpreted = Property::labels_or_raw("Flash", 0x01, vec!["Flash fired"], false);
        assert_eq!(interpreted.value, PropertyValue::TextArray(vec!["Flash fired".to_string()]));

        let raw = Property::labels_or_raw("Flash", 0x01, vec!["Flash fired"], true);
        assert_eq!(raw.value, PropertyValue::Integer(0x01));

        let empty = Property::labels_or_raw("Flash", 0, vec![], false);
        assert_eq!(empty.value, PropertyValue::Integer(0));
    }

    #[test]
    fn niso_image_metadata_is_distinct_from_generic_property_list() {
        let children = vec![Property::integer("ImageWidth", 100)];
        let niso = Property::niso_image_metadata("NisoImageMetadata", children.clone());
        let generic = Property::subtree("Foo", children);
        assert!(matches!(niso.value, PropertyValue::NisoImageMetadata(_)));
        assert!(matches!(generic.value, PropertyValue::PropertyList(_)));
        assert_ne!(niso.value, generic.value);
    }
}
