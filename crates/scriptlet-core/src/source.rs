//! Character stream over any [`Read`] implementation.
//!
//! Decodes UTF-8 one scalar value at a time so the scanner never needs the whole
//! template in memory. Decoding errors are reported as
//! [`io::ErrorKind::InvalidData`] items rather than ending the stream, and the
//! iterator is fused after the first error.

use std::io::{self, BufRead, BufReader, Read};

/// Iterator of `io::Result<char>` decoded from a byte reader.
pub struct CharSource<R> {
    reader: BufReader<R>,
    offset: u64,
    failed: bool,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            offset: 0,
            failed: false,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let b = buf[0];
                    self.reader.consume(1);
                    self.offset += 1;
                    return Ok(Some(b));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn decode(&mut self, first: u8) -> io::Result<char> {
        let start = self.offset - 1;
        let width = utf8_width(first).ok_or_else(|| invalid_utf8(start))?;

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("truncated UTF-8 sequence at byte {start}"),
                )
            })?;
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| invalid_utf8(start))
    }
}

impl<R: Read> Iterator for CharSource<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = match self.read_byte() {
            Ok(None) => return None,
            Ok(Some(b)) => self.decode(b),
            Err(e) => Err(e),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Sequence length implied by a UTF-8 leading byte.
fn utf8_width(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_utf8(at: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid UTF-8 sequence at byte {at}"),
    )
}
