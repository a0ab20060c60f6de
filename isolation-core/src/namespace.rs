
use crate::Host;

use std::fmt::{self, Display, Formatter};

use log::{debug, warn};

use nix::unistd::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    Mount,
    Pid,
    Network,
    Ipc,
    Uts,
    User,
    Cgroup,
}

impl NamespaceKind {
    pub const ALL: [NamespaceKind; 7] = [
        NamespaceKind::Mount,
        NamespaceKind::Pid,
        NamespaceKind::Network,
        NamespaceKind::Ipc,
        NamespaceKind::Uts,
        NamespaceKind::User,
        NamespaceKind::Cgroup,
    ];

    /// Name of the handle under `/proc/<pid>/ns`.
    pub fn handle_name(self) -> &'static str {
        use NamespaceKind::*;
        match self {
            Mount => "mnt",
            Pid => "pid",
            Network => "net",
            Ipc => "ipc",
            Uts => "uts",
            User => "user",
            Cgroup => "cgroup",
        }
    }
}

impl Display for NamespaceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.handle_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceRecord {
    pub kind: NamespaceKind,
    /// `None` when the handle could not be resolved.
    pub inode: Option<u64>,
}

impl Display for NamespaceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inode {
            Some(inode) => write!(f, "{} namespace inode: {}", self.kind, inode),
            None => write!(f, "{} namespace: unavailable", self.kind),
        }
    }
}

/// Resolves every namespace kind of `pid`.
///
/// A kind that fails is logged and recorded without an inode, the other
/// kinds are still resolved.
pub fn namespaces<H: Host + ?Sized>(host: &H, pid: Pid) -> Vec<NamespaceRecord> {
    NamespaceKind::ALL
        .iter()
        .map(|&kind| {
            let inode = match host.namespace_inode(pid, kind) {
                Ok(inode) => Some(inode),
                Err(e) => {
                    warn!("namespace info unavailable for {} of pid {}: {}", kind, pid, e);
                    None
                }
            };
            debug!("{} namespace of {}: {:?}", kind, pid, inode);
            NamespaceRecord { kind, inode }
        })
        .collect()
}
