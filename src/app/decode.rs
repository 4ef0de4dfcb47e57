use std::fs;
use std::io;
use std::path::Path;

/// Counts the characters of `bytes` decoded as UTF-8.
///
/// Invalid byte sequences are dropped. A `\r\n` pair counts as a single
/// newline, the same length a universal-newline text reader reports.
pub fn count_chars(bytes: &[u8]) -> u64 {
    let mut chars = bytes.utf8_chunks().flat_map(|chunk| chunk.valid().chars()).peekable();
    let mut count = 0;
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        count += 1;
    }
    count
}

/// Reads a whole file and counts its characters. The handle is closed before returning.
pub fn count_file_chars(path: &Path) -> io::Result<u64> {
    let bytes = fs::read(path)?;
    Ok(count_chars(&bytes))
}
