
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;

/// The process environment as name/value pairs, in the order stored.
pub fn vars() -> Vec<(OsString, OsString)> {
    env::vars_os().collect()
}

/// Writes `NAME=value` and a newline with the bytes exactly as held.
pub fn write_entry<W: Write>(out: &mut W, name: &OsStr, value: &OsStr) -> io::Result<()> {
    out.write_all(name.as_bytes())?;
    out.write_all(b"=")?;
    out.write_all(value.as_bytes())?;
    out.write_all(b"\n")
}
