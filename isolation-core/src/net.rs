
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

/// Address half of an interface-address record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordAddress {
    Inet(SocketAddr),
    /// Any other family, by name.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRecord {
    pub name: String,
    pub address: Option<RecordAddress>,
}

impl InterfaceRecord {
    /// The numeric form of an IPv4 or IPv6 address, `None` for anything else.
    ///
    /// Scoped IPv6 addresses get a `%interface` suffix.
    pub fn numeric_host(&self) -> Option<String> {
        match &self.address {
            Some(RecordAddress::Inet(SocketAddr::V4(addr))) => Some(addr.ip().to_string()),
            Some(RecordAddress::Inet(SocketAddr::V6(addr))) if addr.scope_id() != 0 => {
                Some(format!("{}%{}", addr.ip(), self.name))
            }
            Some(RecordAddress::Inet(SocketAddr::V6(addr))) => Some(addr.ip().to_string()),
            _ => None,
        }
    }
}

/// IP addresses grouped under their interface, ordered by interface name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceGroups(BTreeMap<String, Vec<String>>);

impl InterfaceGroups {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

/// Drops records without an IPv4/IPv6 address and groups the rest.
pub fn group<I>(records: I) -> InterfaceGroups
where
    I: IntoIterator<Item = InterfaceRecord>,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in records {
        if let Some(host) = record.numeric_host() {
            groups.entry(record.name).or_default().push(host);
        }
    }
    InterfaceGroups(groups)
}

impl Display for InterfaceGroups {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, addrs) in self.iter() {
            writeln!(f, "{}", name)?;
            for addr in addrs {
                writeln!(f, "\t{}", addr)?;
            }
        }
        Ok(())
    }
}
