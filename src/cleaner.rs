use crate::protection::ProtectionRules;
use crate::scanner::{self, ScanError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    /// Looks at the entry as it is now. Symlinks are never followed, and an
    /// entry that has vanished counts as `Other`.
    pub fn probe(path: &Path) -> EntryKind {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_file() => EntryKind::File,
            Ok(meta) if meta.file_type().is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Removed(EntryKind),
    Protected,
    AccessDenied,
    Failed(String),
    /// Neither a regular file nor a directory.
    Skipped,
}

impl Outcome {
    pub fn from_io_error(err: &io::Error) -> Outcome {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Outcome::AccessDenied
        } else {
            Outcome::Failed(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Disposal {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub files_removed: usize,
    pub folders_removed: usize,
}

impl CleanReport {
    pub fn total(&self) -> usize {
        self.files_removed + self.folders_removed
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Removed(EntryKind::File) => self.files_removed += 1,
            Outcome::Removed(EntryKind::Directory) => self.folders_removed += 1,
            _ => {}
        }
    }
}

pub fn remove_file(path: &Path) -> Outcome {
    match fs::remove_file(path) {
        Ok(()) => Outcome::Removed(EntryKind::File),
        Err(e) => Outcome::from_io_error(&e),
    }
}

/// Removes the whole subtree. The caller checks protection first.
///
/// Not transactional: on failure part of the subtree may already be gone.
pub fn remove_dir(path: &Path) -> Outcome {
    match fs::remove_dir_all(path) {
        Ok(()) => Outcome::Removed(EntryKind::Directory),
        Err(e) => Outcome::from_io_error(&e),
    }
}

/// Deletes an already classified entry with the matching primitive.
pub fn remove_entry(path: &Path, kind: EntryKind) -> Outcome {
    match kind {
        EntryKind::File => remove_file(path),
        EntryKind::Directory => remove_dir(path),
        EntryKind::Other => Outcome::Skipped,
    }
}

pub fn dispose<R>(path: &Path, protection: &ProtectionRules, mut remove: R) -> Disposal
where
    R: FnMut(&Path, EntryKind) -> Outcome,
{
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = match EntryKind::probe(path) {
        EntryKind::Directory if protection.is_protected(&name) => Outcome::Protected,
        EntryKind::Other => Outcome::Skipped,
        kind => remove(path, kind),
    };

    match &outcome {
        Outcome::AccessDenied => warn!(path = %path.display(), "access denied"),
        Outcome::Failed(reason) => warn!(path = %path.display(), %reason, "deletion failed"),
        other => debug!(path = %path.display(), outcome = ?other, "disposed"),
    }

    Disposal { name, outcome }
}

/// Runs one pass over `root`, handing every disposal to `on_item` as it
/// happens.
///
/// Only a failure to list `root` is returned as an error, and nothing is
/// deleted in that case. Per-entry failures are reported through `on_item`.
pub fn clean<F>(
    root: &Path,
    protection: &ProtectionRules,
    on_item: F,
) -> Result<CleanReport, ScanError>
where
    F: FnMut(&Disposal),
{
    clean_with(root, protection, scanner::list_entries, remove_entry, on_item)
}

/// [`clean`] with the listing and the deletion supplied by the caller.
pub fn clean_with<L, R, F>(
    root: &Path,
    protection: &ProtectionRules,
    list: L,
    mut remove: R,
    mut on_item: F,
) -> Result<CleanReport, ScanError>
where
    L: FnOnce(&Path) -> Result<Vec<PathBuf>, ScanError>,
    R: FnMut(&Path, EntryKind) -> Outcome,
    F: FnMut(&Disposal),
{
    let entries = list(root)?;
    info!(root = %root.display(), entries = entries.len(), "starting cleanup pass");

    let mut report = CleanReport::default();
    for path in entries {
        let disposal = dispose(&path, protection, &mut remove);
        report.record(&disposal.outcome);
        on_item(&disposal);
    }

    info!(
        files = report.files_removed,
        folders = report.folders_removed,
        "cleanup pass finished"
    );
    Ok(report)
}
