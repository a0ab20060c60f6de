#[cfg(test)]
mod tests;

use crate::{Error, Result};

use std::fmt::{self, Display, Formatter};
use std::fs::{self, ReadDir};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const OWNER_READ: u32 = 0o400;
const OWNER_EXEC: u32 = 0o100;

/// Whether `path` exists and has the owner-read bit set.
///
/// This looks at the static permission bits only, it does not try the read
/// and does not compare the owner against the process credentials.
pub fn can_access<P: AsRef<Path>>(path: P) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.permissions().mode() & OWNER_READ != 0,
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    ExecutableFile,
    RegularFile,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use EntryKind::*;
        match self {
            Directory => write!(f, "[Dir]"),
            ExecutableFile => write!(f, "[Exec]"),
            RegularFile => write!(f, "[File]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Level below the root, the root's own children are at 0.
    pub depth: usize,
}

impl Display for DirectoryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} {}",
            "",
            self.kind,
            self.name,
            indent = self.depth * 4
        )
    }
}

struct Frame {
    path: PathBuf,
    entries: ReadDir,
    level: usize,
    depth: i32,
}

/// Lazy depth-first walk over a directory tree.
///
/// Errors are per directory: an `Err` item means one listing was abandoned,
/// the walk carries on with the remaining branches.
pub struct Walk {
    stack: Vec<Frame>,
    pending: Option<(PathBuf, usize, i32)>,
}

/// Walks `root` listing entries down to level `max_depth`.
///
/// The root's children are at level 0, so a `max_depth` of 0 lists them
/// without descending and a negative one lists nothing.
pub fn walk<P: AsRef<Path>>(root: P, max_depth: i32) -> Walk {
    Walk {
        stack: vec![],
        pending: Some((root.as_ref().to_path_buf(), 0, max_depth)),
    }
}

impl Walk {
    fn open(&mut self, path: PathBuf, level: usize, depth: i32) -> Result<()> {
        if depth < 0 || !can_access(&path) {
            return Ok(());
        }
        match fs::read_dir(&path) {
            Ok(entries) => {
                self.stack.push(Frame {
                    path,
                    entries,
                    level,
                    depth,
                });
                Ok(())
            }
            Err(source) => Err(Error::Listing { path, source }),
        }
    }
}

fn classify(path: &Path) -> io::Result<Option<EntryKind>> {
    let meta = fs::metadata(path)?;
    let kind = if meta.is_dir() {
        Some(EntryKind::Directory)
    } else if meta.is_file() && meta.permissions().mode() & OWNER_EXEC != 0 {
        Some(EntryKind::ExecutableFile)
    } else if meta.is_file() {
        Some(EntryKind::RegularFile)
    } else {
        None
    };
    Ok(kind)
}

impl Iterator for Walk {
    type Item = Result<DirectoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, level, depth)) = self.pending.take() {
                if let Err(e) = self.open(path, level, depth) {
                    return Some(Err(e));
                }
            }

            let frame = self.stack.last_mut()?;
            let (level, depth) = (frame.level, frame.depth);
            let next = frame.entries.next();
            let entry = match next {
                None => {
                    self.stack.pop();
                    continue;
                }
                Some(Err(source)) => {
                    // give up on this directory, the handle is closed on drop
                    let path = self.stack.pop().map(|f| f.path).unwrap_or_default();
                    return Some(Err(Error::Listing { path, source }));
                }
                Some(Ok(entry)) => entry,
            };

            let path = entry.path();
            let kind = match classify(&path) {
                Ok(Some(kind)) => kind,
                Ok(None) => continue,
                // vanished or a dangling symlink
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Some(Err(Error::Inspect { path, source })),
            };

            if kind == EntryKind::Directory {
                self.pending = Some((path.clone(), level + 1, depth - 1));
            }

            return Some(Ok(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
                depth: level,
            }));
        }
    }
}
