use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("access denied while listing '{}'", path.display())]
    AccessDenied { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot list '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            ScanError::AccessDenied {
                path: path.to_path_buf(),
            }
        } else {
            ScanError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn from_walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        match err.into_io_error() {
            Some(source) => ScanError::from_io(&path, source),
            None => ScanError::Unreadable {
                path,
                source: io::Error::other("filesystem loop detected"),
            },
        }
    }
}

/// Immediate children of `root`, in whatever order the filesystem yields them.
///
/// Failing to open `root` itself is an error. A single child that cannot be
/// read is logged and left out.
pub fn list_entries(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let metadata = fs::metadata(root).map_err(|e| {
        let err = ScanError::from_io(root, e);
        warn!("{err}");
        err
    })?;
    if !metadata.is_dir() {
        let err = ScanError::NotADirectory {
            path: root.to_path_buf(),
        };
        warn!("{err}");
        return Err(err);
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        match entry {
            Ok(entry) => entries.push(entry.into_path()),
            // The root could not be opened at all.
            Err(e) if e.depth() == 0 => {
                let err = ScanError::from_walk(root, e);
                warn!("{err}");
                return Err(err);
            }
            Err(e) => warn!("skipping unreadable entry: {e}"),
        }
    }

    Ok(entries)
}
