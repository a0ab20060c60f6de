
use crate::capability::CapabilitySets;
use crate::namespace::NamespaceKind;
use crate::net::{InterfaceRecord, RecordAddress};
use crate::{environ, Error, Host, Identity, Result};

use std::ffi::OsString;
use std::fs;
use std::net::{SocketAddr, SocketAddrV4, SocketAddrV6};
use std::path::{Path, PathBuf};

use log::debug;

use nix::ifaddrs::{self, InterfaceAddress};
use nix::sys::socket::{SockaddrLike, SockaddrStorage};
use nix::sys::stat;
use nix::unistd::{self, Pid};

const PROC_ROOT: &str = "/proc";

/// `Host` backed by the running Linux kernel.
#[derive(Debug, Clone)]
pub struct System {
    proc_root: PathBuf,
}

impl Default for System {
    fn default() -> Self {
        Self::with_proc_root(PROC_ROOT)
    }
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads processes and namespace handles from a procfs mounted at `root`.
    pub fn with_proc_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            proc_root: root.as_ref().to_path_buf(),
        }
    }

    fn namespace_handle(&self, pid: Pid, kind: NamespaceKind) -> PathBuf {
        self.proc_root
            .join(pid.to_string())
            .join("ns")
            .join(kind.handle_name())
    }
}

fn to_record(ifaddr: InterfaceAddress) -> InterfaceRecord {
    InterfaceRecord {
        name: ifaddr.interface_name,
        address: ifaddr.address.as_ref().map(to_record_address),
    }
}

fn to_record_address(addr: &SockaddrStorage) -> RecordAddress {
    if let Some(sin) = addr.as_sockaddr_in() {
        RecordAddress::Inet(SocketAddr::V4(SocketAddrV4::from(*sin)))
    } else if let Some(sin6) = addr.as_sockaddr_in6() {
        RecordAddress::Inet(SocketAddr::V6(SocketAddrV6::from(*sin6)))
    } else {
        match addr.family() {
            Some(family) => RecordAddress::Unsupported(format!("{:?}", family)),
            None => RecordAddress::Unsupported(String::from("unknown")),
        }
    }
}

impl Host for System {
    fn identity(&self) -> Identity {
        Identity {
            pid: unistd::getpid(),
            uid: unistd::geteuid(),
            gid: unistd::getegid(),
        }
    }

    fn capabilities(&self) -> Result<CapabilitySets> {
        CapabilitySets::current()
    }

    fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
        // the list is freed when the iterator drops
        let records: Vec<InterfaceRecord> = ifaddrs::getifaddrs()?.map(to_record).collect();
        debug!("read {} interface-address records", records.len());
        Ok(records)
    }

    fn process_entries(&self) -> Result<Vec<OsString>> {
        let listing = |source| Error::Listing {
            path: self.proc_root.clone(),
            source,
        };
        let mut names = vec![];
        for entry in fs::read_dir(&self.proc_root).map_err(listing)? {
            names.push(entry.map_err(listing)?.file_name());
        }
        debug!("{} entries under {}", names.len(), self.proc_root.display());
        Ok(names)
    }

    fn environment(&self) -> Vec<(OsString, OsString)> {
        environ::vars()
    }

    fn namespace_inode(&self, pid: Pid, kind: NamespaceKind) -> Result<u64> {
        // follow the link, its target is the namespace itself
        let handle = self.namespace_handle(pid, kind);
        let st = stat::stat(&handle)?;
        Ok(st.st_ino)
    }
}
