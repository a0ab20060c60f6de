
use caps::{CapSet, Capability, CapsHashSet};

pub const NO_CAPABILITIES: &str = "No capabilities";

const EMPTY_SET: &str = "=";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilitySets {
    pub effective: CapsHashSet,
    pub permitted: CapsHashSet,
    pub inheritable: CapsHashSet,
}

impl CapabilitySets {
    /// Reads the sets of the calling thread.
    pub fn current() -> crate::Result<Self> {
        Ok(Self {
            effective: caps::read(None, CapSet::Effective)?,
            permitted: caps::read(None, CapSet::Permitted)?,
            inheritable: caps::read(None, CapSet::Inheritable)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.effective.is_empty() && self.permitted.is_empty() && self.inheritable.is_empty()
    }

    fn flags(&self, cap: Capability) -> String {
        let mut flags = String::new();
        for (set, flag) in [
            (&self.effective, 'e'),
            (&self.inheritable, 'i'),
            (&self.permitted, 'p'),
        ]
        .iter()
        {
            if set.contains(&cap) {
                flags.push(*flag);
            }
        }
        flags
    }

    /// Text in the shape of libcap's `cap_to_text`, e.g.
    /// `cap_chown,cap_kill=ep cap_net_raw=p`. The empty set is `=`.
    pub fn to_text(&self) -> String {
        let mut held: Vec<Capability> = self
            .effective
            .iter()
            .chain(self.permitted.iter())
            .chain(self.inheritable.iter())
            .copied()
            .collect::<CapsHashSet>()
            .into_iter()
            .collect();
        held.sort_by_key(|c| c.index());

        let mut groups: Vec<(String, Vec<Capability>)> = vec![];
        for cap in held {
            let flags = self.flags(cap);
            match groups.iter_mut().find(|(f, _)| *f == flags) {
                Some((_, members)) => members.push(cap),
                None => groups.push((flags, vec![cap])),
            }
        }

        if groups.is_empty() {
            return EMPTY_SET.to_string();
        }

        let known = caps::all().len();
        groups
            .iter()
            .map(|(flags, members)| {
                if members.len() == known {
                    format!("={}", flags)
                } else {
                    let names: Vec<String> = members
                        .iter()
                        .map(|c| c.to_string().to_lowercase())
                        .collect();
                    format!("{}={}", names.join(","), flags)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Like `to_text`, with the bare empty-set symbol replaced by
    /// `NO_CAPABILITIES`.
    pub fn describe(&self) -> String {
        let text = self.to_text();
        if text == EMPTY_SET {
            NO_CAPABILITIES.to_string()
        } else {
            text
        }
    }
}
