
use std::ffi::OsStr;
use std::fmt::{self, Display, Formatter};

pub const DEFAULT_LISTED: usize = 10;

/// Visible process ids, of which only the first `limit` are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Census {
    pub listed: Vec<u32>,
    pub total: usize,
}

/// Parses a process-listing entry name as a positive pid.
pub fn parse_pid(name: &OsStr) -> Option<u32> {
    let pid: u32 = name.to_str()?.parse().ok()?;
    if pid > 0 {
        Some(pid)
    } else {
        None
    }
}

impl Census {
    /// Counts the entries that are pids, in the order given.
    pub fn take<I, S>(entries: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut listed = Vec::with_capacity(limit);
        let mut total = 0;
        for pid in entries.into_iter().filter_map(|e| parse_pid(e.as_ref())) {
            if listed.len() < limit {
                listed.push(pid);
            }
            total += 1;
        }
        Self { listed, total }
    }

    pub fn unlisted(&self) -> usize {
        self.total - self.listed.len()
    }
}

impl Display for Census {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for pid in &self.listed {
            writeln!(f, "{}", pid)?;
        }
        if self.unlisted() > 0 {
            writeln!(f, "... and {} more processes", self.unlisted())?;
        }
        writeln!(f, "Total processes: {}", self.total)
    }
}
