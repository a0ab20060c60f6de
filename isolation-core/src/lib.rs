pub mod capability;
pub mod environ;
pub mod namespace;
pub mod net;
pub mod process;
pub mod walk;

mod system;
pub use system::System;

use std::error;
use std::ffi::OsString;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

use caps::errors::CapsError;

use nix::unistd::{Gid, Pid, Uid};

pub use capability::CapabilitySets;
pub use namespace::{NamespaceKind, NamespaceRecord};
pub use net::{InterfaceRecord, RecordAddress};
pub use walk::{can_access, walk, DirectoryEntry, EntryKind, Walk};

pub type Result<T> = std::result::Result<T, Error>;

/// Effective credentials of the current process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    pub pid: Pid,
    pub uid: Uid,
    pub gid: Gid,
}

/// The OS facts the report is built from.
///
/// Every method is a one-shot read. Implementations must release whatever
/// handle they acquire before returning, on the error paths as well.
pub trait Host {
    fn identity(&self) -> Identity;

    fn capabilities(&self) -> Result<CapabilitySets>;

    /// Raw interface-address records, unfiltered.
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>>;

    /// Names of the entries under the live-process listing, unfiltered.
    fn process_entries(&self) -> Result<Vec<OsString>>;

    /// Environment entries in the order the process image stores them.
    fn environment(&self) -> Vec<(OsString, OsString)>;

    fn namespace_inode(&self, pid: Pid, kind: NamespaceKind) -> Result<u64>;
}

#[derive(Debug)]
pub enum Error {
    Sys(nix::Error),
    Caps(CapsError),
    Listing { path: PathBuf, source: io::Error },
    Inspect { path: PathBuf, source: io::Error },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            Sys(e) => write!(f, "system call failed: {}", e),
            Caps(e) => write!(f, "failed to read capabilities: {}", e),
            Listing { path, source } => {
                write!(f, "directory listing failed for {}: {}", path.display(), source)
            }
            Inspect { path, source } => {
                write!(f, "cannot inspect {}: {}", path.display(), source)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use Error::*;
        match self {
            Sys(e) => Some(e),
            Caps(e) => Some(e),
            Listing { source, .. } | Inspect { source, .. } => Some(source),
        }
    }
}

impl From<nix::Error> for Error {
    fn from(e: nix::Error) -> Self {
        Error::Sys(e)
    }
}

impl From<CapsError> for Error {
    fn from(e: CapsError) -> Self {
        Error::Caps(e)
    }
}
