use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use crate::common::error::Result;

/// Open a file for read-only access.
pub fn open_ro<P: AsRef<Path>>(path: P) -> Result<File> {
    Ok(File::open(path)?)
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes actually read.
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Total length of a seekable stream. Leaves the position at the end.
pub fn stream_len<R: Seek + ?Sized>(reader: &mut R) -> Result<u64> {
    Ok(reader.seek(SeekFrom::End(0))?)
}

/// Trim the trailing NUL and space padding used by fixed-width and
/// null-terminated text fields.
pub fn trim_padding(s: &str) -> &str {
    s.trim_end_matches(['\0', ' '])
}
