//! RepInfo: the per-file result container.
//!
//! A container only — no logic beyond accessors and the invariant that
//! well-formed/valid use the three-valued enum below rather than a
//! nullable `bool`. RepInfo exclusively owns its Properties and Messages;
//! both are insertion-ordered, matching the discovery order of the parse
//! that produced them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::message::{Message, Severity};
use crate::types::property::Property;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriState {
    True,
    False,
    Undetermined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepInfo {
    pub uri: String,
    /// Producing module's `(name, release)` identity, once one has parsed.
    pub module: Option<(String, String)>,
    pub format: Option<String>,
    pub version: Option<String>,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub well_formed: TriState,
    pub valid: TriState,
    /// Names of modules whose signature matched, in rank order.
    pub sig_match: Vec<String>,
    pub properties: Vec<Property>,
    pub messages: Vec<Message>,
    pub checksums: BTreeMap<String, String>,
}

impl RepInfo {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            module: None,
            format: None,
            version: None,
            mime_type: None,
            size: None,
            created: None,
            last_modified: None,
            well_formed: TriState::Undetermined,
            valid: TriState::Undetermined,
            sig_match: Vec::new(),
            properties: Vec::new(),
            messages: Vec::new(),
            checksums: BTreeMap::new(),
        }
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Records a message and folds its severity into `well_formed`/`valid`
    /// per the Error Handling Design: Fatal clears well-formed, any
    /// non-fatal Error clears valid, Info/Warning affect neither.
    pub fn add_message(&mut self, message: Message) {
        match message.severity {
            Severity::Fatal => self.well_formed = TriState::False,
            Severity::Error => {
                if self.valid != TriState::False {
                    self.valid = TriState::False;
                }
            }
            Severity::Info | Severity::Warning => {}
        }
        self.messages.push(message);
    }

    pub fn has_fatal(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Fatal)
    }

    pub fn has_error_or_fatal(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.severity, Severity::Error | Severity::Fatal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_message_clears_well_formed() {
        let mut info = RepInfo::new("mem://test");
        info.well_formed = TriState::True;
        info.add_message(Message::fatal("TIFF-HUL-4", "odd offset"));
        assert_eq!(info.well_formed, TriState::False);
        assert!(info.has_fatal());
    }

    #[test]
    fn error_message_clears_valid_but_not_well_formed() {
        let mut info = RepInfo::new("mem://test");
        info.well_formed = TriState::True;
        info.valid = TriState::True;
        info.add_message(Message::error("TIFF-HUL-2", "out of order tag"));
        assert_eq!(info.well_formed, TriState::True);
        assert_eq!(info.valid, TriState::False);
    }

    #[test]
    fn info_and_warning_do_not_affect_status() {
        let mut info = RepInfo::new("mem://test");
        info.well_formed = TriState::True;
        info.valid = TriState::True;
        info.add_message(Message::info("TIFF-HUL-4", "downgraded odd offset"));
        info.add_message(Message::warning("TIFF-HUL-9", "deprecated tag"));
        assert_eq!(info.well_formed, TriState::True);
        assert_eq!(info.valid, TriState::True);
    }
}
