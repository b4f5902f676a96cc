//! Dispatcher: drives signature → parse → checksum → emit for a file or
//! directory tree.
//!
//! Directory recursion is depth-first and explicitly name-sorted (so the
//! ordering guarantee in the concurrency model holds regardless of what
//! order the filesystem happens to hand back entries in) using `walkdir`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::core::reader::{Reader, SliceReader};
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::hash::{ChecksumAlgorithm, TeeHasher};
use crate::module::{ensure_random_access, registered_modules, ModuleOptions};
use crate::signature::{evaluate_module_signatures, rank_candidates};
use crate::types::message::Message;
use crate::types::rep_info::RepInfo;

pub const MSG_NO_MODULE_MATCHED: &str = "CURATOR-1";

/// Cooperative abort flag, checked between files and between parse passes —
/// never mid-read. Cloning shares the same underlying flag.
#[derive(Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Dispatcher {
    pub options: ModuleOptions,
    pub checksum_algorithms: Vec<ChecksumAlgorithm>,
    pub abort: AbortFlag,
    /// If set, only this module name is considered.
    pub pinned_module: Option<String>,
    /// Run signature matching only; never invoke a module's `parse`.
    pub signature_only: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            options: ModuleOptions::new(),
            checksum_algorithms: vec![ChecksumAlgorithm::Crc32, ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1],
            abort: AbortFlag::new(),
            pinned_module: None,
            signature_only: false,
        }
    }
}

impl Dispatcher {
    /// Processes a single path (file or directory), driving `handler`
    /// through the `startDirectory`/`show*`/`endDirectory` lifecycle.
    pub fn process_path(&self, path: &Path, handler: &mut dyn Handler) -> Result<()> {
        if path.is_dir() {
            self.process_directory(path, handler)
        } else {
            let mut info = self.process_file(path)?;
            handler.analyze(&mut info);
            handler.show_rep_info(&info).map_err(Error::Io)
        }
    }

    fn process_directory(&self, dir: &Path, handler: &mut dyn Handler) -> Result<()> {
        handler
            .start_directory(&dir.to_string_lossy())
            .map_err(Error::Io)?;

        let mut entries: Vec<_> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .collect();
        entries.sort_by_key(|e| e.file_name().to_os_string());

        for entry in entries {
            if self.abort.is_set() {
                tracing::info!(dir = %dir.display(), "abort observed; halting directory traversal");
                break;
            }
            let child = entry.path();
            if !handler.ok_to_process(&child.to_string_lossy()) {
                continue;
            }
            if child.is_dir() {
                self.process_directory(child, handler)?;
            } else {
                let mut info = self.process_file(child)?;
                handler.analyze(&mut info);
                handler.show_rep_info(&info).map_err(Error::Io)?;
            }
        }

        handler.end_directory().map_err(Error::Io)
    }

    /// Runs signature match → parse → checksum for one file.
    ///
    /// The whole file is read exactly once, through a [`TeeHasher`] that
    /// feeds every byte into the configured checksum algorithms as it
    /// streams past; the resulting in-memory buffer is then what both
    /// signature ranking and the selected module's `parse_random_access`
    /// read from via a [`SliceReader`]. There is no second `File::open` —
    /// the checksum pass and the parse pass share one read of the file.
    fn process_file(&self, path: &Path) -> Result<RepInfo> {
        let _span = tracing::info_span!("process_file", path = %path.display()).entered();

        let mut info = RepInfo::new(format!("file://{}", path.display()));
        let extension = path.extension().and_then(|e| e.to_str());

        let file = File::open(path)?;
        let metadata = file.metadata()?;
        info.size = Some(metadata.len());
        if let Ok(modified) = metadata.modified() {
            info.last_modified = Some(chrono::DateTime::<chrono::Utc>::from(modified));
        }

        let mut tee = TeeHasher::new(file, &self.checksum_algorithms);
        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        tee.read_to_end(&mut bytes)?;
        info.checksums = tee.finalize();

        let mut reader = SliceReader::new(&bytes);

        let candidates = self.rank_modules(&mut reader, extension)?;

        for candidate in candidates {
            if let Some(name) = &self.pinned_module {
                if &candidate != name {
                    continue;
                }
            }
            let mut modules = registered_modules();
            if let Some((_, _, mut module)) = modules.drain(..).find(|(_, name, _)| *name == candidate) {
                let descriptor = module.descriptor();
                // A candidate that fails its own signature check is not
                // this file's verdict — only a scratch copy absorbs the
                // Fatal message `check_signatures` records on mismatch, so
                // a later candidate's success isn't shadowed by an earlier
                // one's rejection.
                let mut scratch = info.clone();
                let matched = module.check_signatures(&mut reader, extension, self.options, &mut scratch)?;
                if !matched {
                    continue;
                }
                info = scratch;
                tracing::info!(module = descriptor.name, "module selected");
                info.module = Some((descriptor.name.to_string(), descriptor.release.to_string()));
                info.sig_match = vec![descriptor.name.to_string()];

                if self.signature_only {
                    return Ok(info);
                }

                ensure_random_access(&descriptor, &reader)?;
                module.parse_random_access(&mut reader, self.options, &mut info)?;
                tracing::info!(well_formed = ?info.well_formed, valid = ?info.valid, "parse exited");
                return Ok(info);
            }
        }

        info.add_message(self.options.maybe_suppress(Message::fatal(
            MSG_NO_MODULE_MATCHED,
            "no registered module recognized this file",
        )));
        Ok(info)
    }

    fn rank_modules(&self, reader: &mut dyn Reader, extension: Option<&str>) -> Result<Vec<String>> {
        let mut candidates = Vec::new();
        for (order, name, module) in registered_modules() {
            if let Some(c) =
                evaluate_module_signatures(name, order, module.signatures(), extension, reader)?
            {
                candidates.push(c);
            }
        }
        Ok(rank_candidates(candidates).into_iter().map(|c| c.module_name).collect())
    }
}
