//! Module registry: the one piece of shared mutable state in the crate.
//!
//! Populated at startup, read-only thereafter — the same
//! `LazyLock<RwLock<..>>` singleton shape as the teacher's conversion-
//! function registry (`examples/photostructure-exif-oxide/src/registry.rs`),
//! generalized from function pointers to boxed `Module` factories.

use std::sync::{LazyLock, RwLock};

use crate::module::Module;

/// A registered module: its construction closure plus its declared name,
/// stored so the dispatcher can report registration order for signature
/// tie-breaking.
pub struct ModuleEntry {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn Module + Send>,
}

static REGISTRY: LazyLock<RwLock<Vec<ModuleEntry>>> = LazyLock::new(|| RwLock::new(Vec::new()));

/// Registers a module factory under `name`. Intended to be called during
/// process startup (e.g. from `main` or a `ctor`-free explicit
/// initialization routine) before any dispatch begins; the registry is
/// read-only once dispatch is underway.
pub fn register_module(name: &'static str, factory: fn() -> Box<dyn Module + Send>) {
    let mut registry = REGISTRY.write().expect("module registry lock poisoned");
    registry.push(ModuleEntry { name, factory });
}

/// Returns a fresh instance of every registered module, in registration
/// order, for one dispatch pass.
pub fn registered_modules() -> Vec<(usize, &'static str, Box<dyn Module + Send>)> {
    let registry = REGISTRY.read().expect("module registry lock poisoned");
    registry
        .iter()
        .enumerate()
        .map(|(i, entry)| (i, entry.name, (entry.factory)()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::Reader;
    use crate::error::Result;
    use crate::module::{ModuleDescriptor, ModuleOptions, ParseOutcome};
    use crate::signature::Signature;
    use crate::types::rep_info::RepInfo;

    struct NoopModule;

    impl Module for NoopModule {
        fn descriptor(&self) -> ModuleDescriptor {
            ModuleDescriptor {
                name: "NOOP",
                release: "1.0",
                date: "2026-01-01",
                formats: &[],
                mime_types: &[],
                vendor: "test",
                specifications: &[],
                note: "",
                rights: "",
                is_random_access: false,
            }
        }
        fn signatures(&self) -> &[Signature] {
            &[]
        }
        fn check_signatures(&mut self, _: &mut dyn Reader, _: Option<&str>, _: ModuleOptions, _: &mut RepInfo) -> Result<bool> {
            Ok(false)
        }
        fn parse_random_access(&mut self, _: &mut dyn Reader, _: ModuleOptions, _: &mut RepInfo) -> Result<ParseOutcome> {
            Ok(ParseOutcome::Done)
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn registers_and_lists_in_order() {
        register_module("noop-registry-test", || Box::new(NoopModule));
        let modules = registered_modules();
        assert!(modules.iter().any(|(_, name, _)| *name == "noop-registry-test"));
    }
}
