//! `std::io` adapters.
//!
//! `Hasher` is a sink (`Write`); `OutputReader` is an infinite, seekable
//! source (`Read + Seek`).

use std::io;

use crate::{
  hasher::Hasher,
  output::{OutputReader, SeekFrom},
};

impl io::Write for Hasher {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
    self.update(buf);
    Ok(())
  }

  #[inline]
  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl io::Read for OutputReader {
  #[inline]
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    OutputReader::read(self, buf);
    Ok(buf.len())
  }
}

impl io::Seek for OutputReader {
  fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
    let pos = match pos {
      io::SeekFrom::Start(n) => SeekFrom::Start(n),
      io::SeekFrom::Current(d) => SeekFrom::Current(d),
      io::SeekFrom::End(d) => SeekFrom::End(d),
    };
    Ok(OutputReader::seek(self, pos)?)
  }

  #[inline]
  fn stream_position(&mut self) -> io::Result<u64> {
    Ok(self.position())
  }
}

#[cfg(test)]
mod tests {
  use std::io::{Read, Seek, Write};

  use super::*;

  #[test]
  fn copy_into_hasher() {
    let data = [0x5au8; 10_000];
    let mut h = Hasher::new();
    io::copy(&mut &data[..], &mut h).unwrap();
    assert_eq!(h.finalize(), crate::hash(&data));
  }

  #[test]
  fn read_and_seek_agree_with_inherent_api() {
    let mut h = Hasher::new();
    h.write_all(b"io adapters").unwrap();

    let mut expected = [0u8; 96];
    h.finalize_xof().read_exact(&mut expected).unwrap();

    let mut reader = h.finalize_xof();
    assert_eq!(Seek::seek(&mut reader, io::SeekFrom::Start(40)).unwrap(), 40);
    let mut tail = [0u8; 56];
    reader.read_exact(&mut tail).unwrap();
    assert_eq!(tail[..], expected[40..]);
    assert_eq!(reader.stream_position().unwrap(), 96);
  }

  #[test]
  fn seek_errors_are_invalid_input() {
    let mut reader = Hasher::new().finalize_xof();
    let err = Seek::seek(&mut reader, io::SeekFrom::End(0)).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    let err = Seek::seek(&mut reader, io::SeekFrom::Current(-1)).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert_eq!(reader.position(), 0);
  }
}
