//! The Property/Message/RepInfo data model every module records findings in.

pub mod message;
pub mod property;
pub mod rep_info;

pub use message::{Message, Severity};
pub use property::{Property, PropertyValue};
pub use rep_info::{RepInfo, TriState};
