use crate::error::AllocationFailure;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// Initial number of argument slots; storage doubles from here.
pub const ARG_CHUNK: usize = 128;

/// Bytes that separate tokens.
pub const DELIMITERS: &[u8] = b" \t\r\n\x0b\x0c";

/// Splits the input command line into an argument vector.
///
/// Any run of delimiters separates two tokens, so the result never contains
/// empty strings. An empty or all-delimiter line yields an empty vector.
/// There is no quoting, escaping or globbing: every token borrows the raw
/// bytes of `line`, whatever their encoding.
///
/// Storage is grown with fallible reservation; running out of memory drops
/// whatever was collected and returns `AllocationFailure`.
pub fn tokenize(line: &[u8]) -> Result<Vec<&OsStr>, AllocationFailure> {
    let mut argv: Vec<&OsStr> = Vec::new();
    for token in line
        .split(|b| DELIMITERS.contains(b))
        .filter(|token| !token.is_empty())
    {
        if argv.len() == argv.capacity() {
            argv.try_reserve(argv.capacity().max(ARG_CHUNK))?;
        }
        argv.push(OsStr::from_bytes(token));
    }
    Ok(argv)
}
