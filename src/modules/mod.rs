//! Concrete format modules. TIFF is the exemplar, specified in full depth;
//! JPEG, JPEG2000 and EPUB are thinner siblings built on the same
//! `Module` contract.

pub mod epub;
pub mod jpeg;
pub mod jpeg2000;
pub mod tiff;

/// Registers every module this crate ships. Call once during startup
/// before the dispatcher runs.
pub fn register_all() {
    tiff::register();
    jpeg::register();
    jpeg2000::register();
    epub::register();
}
