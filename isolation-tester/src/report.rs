
use std::io::{self, Write};
use std::path::PathBuf;

use isolation_core::process::{self, Census};
use isolation_core::{environ, namespace, net, walk, Host, NamespaceKind, NamespaceRecord};

use log::{debug, warn};

use nix::unistd::Pid;

/// Section titles, in the order they are written.
pub const SECTIONS: [&str; 7] = [
    "User/PID info",
    "Files & Directories Tree",
    "Capabilities",
    "Network interfaces",
    "Running processes",
    "Environment Variables",
    "Namespace Information",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root of the tree walk.
    pub root: PathBuf,
    pub max_depth: i32,
    /// Process whose namespaces are inspected, ourselves when `None`.
    pub target: Option<Pid>,
    /// Process ids printed before the rest are summarised.
    pub process_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            max_depth: 0,
            target: None,
            process_limit: process::DEFAULT_LISTED,
        }
    }
}

/// Gathers every section and writes the report to `out`.
///
/// Read failures end up as text in their section; only a failure to write
/// is returned.
pub fn run<H, W>(host: &H, config: &Config, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    let me = identity(host, out)?;
    tree(config, out)?;
    capabilities(host, out)?;
    interfaces(host, out)?;
    processes(host, config.process_limit, out)?;
    environment(host, out)?;
    namespaces(host, config.target.unwrap_or(me), me, out)?;
    out.flush()
}

fn section<W: Write>(out: &mut W, idx: usize) -> io::Result<()> {
    debug!("gathering: {}", SECTIONS[idx]);
    writeln!(out, "\n=== {} ===", SECTIONS[idx])
}

fn unavailable<W: Write>(out: &mut W, what: &str, e: &isolation_core::Error) -> io::Result<()> {
    warn!("{} unavailable: {}", what, e);
    writeln!(out, "{} unavailable: {}", what, e)
}

fn identity<H, W>(host: &H, out: &mut W) -> io::Result<Pid>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 0)?;
    let id = host.identity();
    writeln!(out, "uid: {}", id.uid)?;
    writeln!(out, "gid: {}", id.gid)?;
    writeln!(out, "pid: {}", id.pid)?;
    Ok(id.pid)
}

fn tree<W: Write>(config: &Config, out: &mut W) -> io::Result<()> {
    section(out, 1)?;
    writeln!(out, "Root: {}", config.root.display())?;
    writeln!(out, "Max depth: {}", config.max_depth)?;
    for entry in walk(&config.root, config.max_depth) {
        match entry {
            Ok(entry) => writeln!(out, "{}", entry)?,
            Err(e) => warn!("{}", e),
        }
    }
    Ok(())
}

fn capabilities<H, W>(host: &H, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 2)?;
    match host.capabilities() {
        Ok(sets) => writeln!(out, "{}", sets.describe()),
        Err(e) => unavailable(out, "capabilities", &e),
    }
}

fn interfaces<H, W>(host: &H, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 3)?;
    match host.interfaces() {
        Ok(records) => write!(out, "{}", net::group(records)),
        Err(e) => unavailable(out, "network interfaces", &e),
    }
}

fn processes<H, W>(host: &H, limit: usize, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 4)?;
    match host.process_entries() {
        Ok(entries) => write!(out, "{}", Census::take(entries, limit)),
        Err(e) => unavailable(out, "process listing", &e),
    }
}

fn environment<H, W>(host: &H, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 5)?;
    for (name, value) in host.environment() {
        environ::write_entry(out, &name, &value)?;
    }
    Ok(())
}

fn comparison(target: &NamespaceRecord, own: Option<u64>) -> &'static str {
    match (target.inode, own) {
        (Some(t), Some(o)) if t == o => " (shared with self)",
        (Some(_), Some(_)) => " (isolated from self)",
        (Some(_), None) => " (own namespace unavailable)",
        (None, _) => "",
    }
}

/// Our own inodes, looked up without the per-kind warnings.
fn own_inodes<H: Host + ?Sized>(host: &H, me: Pid) -> Vec<Option<u64>> {
    NamespaceKind::ALL
        .iter()
        .map(|&kind| match host.namespace_inode(me, kind) {
            Ok(inode) => Some(inode),
            Err(e) => {
                debug!("own {} namespace: {}", kind, e);
                None
            }
        })
        .collect()
}

fn namespaces<H, W>(host: &H, target: Pid, me: Pid, out: &mut W) -> io::Result<()>
where
    H: Host + ?Sized,
    W: Write,
{
    section(out, 6)?;
    writeln!(out, "Target pid: {}", target)?;
    let records = namespace::namespaces(host, target);
    let own = if target != me {
        Some(own_inodes(host, me))
    } else {
        None
    };
    for (i, record) in records.iter().enumerate() {
        let note = match &own {
            Some(own) => comparison(record, own[i]),
            None => "",
        };
        writeln!(out, "{}{}", record, note)?;
    }
    Ok(())
}
