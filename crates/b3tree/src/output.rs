//! Output descriptors and the seekable extendable-output reader.

#![allow(clippy::indexing_slicing)] // Offsets are bounded by BLOCK_LEN.

use core::cmp::min;

use traits::{SeekError, Xof};

use crate::{
  BLOCK_LEN, OUT_LEN, codec,
  compress::{compress, compress_cv},
  flags::{PARENT, ROOT},
};

/// Everything needed to run the final compression of a node.
///
/// A descriptor yields either a chaining value (no `ROOT`) for merging into the
/// tree, or, if it is the root, any number of output blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputState {
  input_chaining_value: [u32; 8],
  block_words: [u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
}

impl OutputState {
  #[inline]
  pub(crate) const fn new(
    input_chaining_value: [u32; 8],
    block_words: [u32; 16],
    counter: u64,
    block_len: u32,
    flags: u32,
  ) -> Self {
    Self { input_chaining_value, block_words, counter, block_len, flags }
  }

  /// Parent node over two child chaining values.
  #[inline]
  #[must_use]
  pub fn parent(left: &[u32; 8], right: &[u32; 8], key: &[u32; 8], flags: u32) -> Self {
    let mut block_words = [0u32; 16];
    block_words[..8].copy_from_slice(left);
    block_words[8..].copy_from_slice(right);
    Self::new(*key, block_words, 0, BLOCK_LEN as u32, flags | PARENT)
  }

  /// The chaining value this node contributes to its parent.
  #[inline]
  #[must_use]
  pub fn chaining_value(&self) -> [u32; 8] {
    compress_cv(
      &self.input_chaining_value,
      &self.block_words,
      self.counter,
      self.block_len,
      self.flags,
    )
  }

  /// The chaining value entering this node's final compression.
  #[inline]
  #[must_use]
  pub fn input_chaining_value(&self) -> [u32; 8] {
    self.input_chaining_value
  }

  #[inline]
  #[must_use]
  pub fn flags(&self) -> u32 {
    self.flags
  }

  /// Root output block number `block_counter`.
  #[inline]
  #[must_use]
  pub fn root_block(&self, block_counter: u64) -> [u8; BLOCK_LEN] {
    let words = compress(
      &self.input_chaining_value,
      &self.block_words,
      block_counter,
      self.block_len,
      self.flags | ROOT,
    );
    let mut out = [0u8; BLOCK_LEN];
    codec::store_words(&words, &mut out);
    out
  }

  /// The default 32-byte digest.
  #[inline]
  #[must_use]
  pub fn root_hash(&self) -> [u8; OUT_LEN] {
    let mut out = [0u8; OUT_LEN];
    out.copy_from_slice(&self.root_block(0)[..OUT_LEN]);
    out
  }
}

/// Reposition target for [`OutputReader::seek`].
///
/// Mirrors `std::io::SeekFrom`; the output stream is unbounded, so `End` is
/// always rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekFrom {
  Start(u64),
  Current(i64),
  End(i64),
}

/// Seekable reader over the unbounded root output stream.
///
/// Byte `p` of the stream is byte `p % 64` of the root compression with
/// counter `p / 64`. Reads never fail; only seeks can be rejected.
#[derive(Clone)]
pub struct OutputReader {
  output: OutputState,
  position: u64,
  block: [u8; BLOCK_LEN],
  cached: Option<u64>,
}

impl OutputReader {
  #[inline]
  #[must_use]
  pub fn new(output: OutputState) -> Self {
    Self { output, position: 0, block: [0u8; BLOCK_LEN], cached: None }
  }

  /// Fill `buf` completely with the next bytes of output.
  pub fn read(&mut self, mut buf: &mut [u8]) {
    while !buf.is_empty() {
      let index = self.position / BLOCK_LEN as u64;
      let offset = (self.position % BLOCK_LEN as u64) as usize;
      if self.cached != Some(index) {
        self.block = self.output.root_block(index);
        self.cached = Some(index);
      }
      let take = min(BLOCK_LEN - offset, buf.len());
      let (head, rest) = core::mem::take(&mut buf).split_at_mut(take);
      head.copy_from_slice(&self.block[offset..offset + take]);
      self.position = self.position.wrapping_add(take as u64);
      buf = rest;
    }
  }

  /// Move the read position. On error the position is unchanged.
  pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, SeekError> {
    let target = match pos {
      SeekFrom::Start(offset) => offset,
      SeekFrom::Current(delta) => self.position.checked_add_signed(delta).ok_or(if delta < 0 {
        SeekError::BeforeStart
      } else {
        SeekError::Overflow
      })?,
      SeekFrom::End(_) => return Err(SeekError::FromEnd),
    };
    self.position = target;
    Ok(target)
  }

  /// Current byte offset into the output stream.
  #[inline]
  #[must_use]
  pub fn position(&self) -> u64 {
    self.position
  }
}

impl Xof for OutputReader {
  #[inline]
  fn squeeze(&mut self, out: &mut [u8]) {
    self.read(out);
  }
}

impl core::fmt::Debug for OutputReader {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("OutputReader").field("position", &self.position).finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{IV, chunk::chunk_output};

  fn reader() -> OutputReader {
    OutputReader::new(chunk_output(&IV, 0, 0, b"output reader"))
  }

  #[test]
  fn split_reads_match_one_read() {
    let mut whole = [0u8; 300];
    reader().read(&mut whole);

    let mut r = reader();
    let mut pieced = [0u8; 300];
    for piece in pieced.chunks_mut(37) {
      r.read(piece);
    }
    assert_eq!(whole, pieced);
    assert_eq!(r.position(), 300);
  }

  #[test]
  fn seek_then_read_matches_offset() {
    let mut whole = [0u8; 256];
    reader().read(&mut whole);

    let mut r = reader();
    assert_eq!(r.seek(SeekFrom::Start(130)), Ok(130));
    let mut tail = [0u8; 100];
    r.read(&mut tail);
    assert_eq!(tail[..], whole[130..230]);

    assert_eq!(r.seek(SeekFrom::Current(-200)), Ok(30));
    let mut mid = [0u8; 10];
    r.read(&mut mid);
    assert_eq!(mid[..], whole[30..40]);
  }

  #[test]
  fn rejected_seeks_leave_position() {
    let mut r = reader();
    r.seek(SeekFrom::Start(10)).unwrap();
    assert_eq!(r.seek(SeekFrom::Current(-11)), Err(SeekError::BeforeStart));
    assert_eq!(r.seek(SeekFrom::End(0)), Err(SeekError::FromEnd));
    r.seek(SeekFrom::Start(u64::MAX)).unwrap();
    assert_eq!(r.seek(SeekFrom::Current(1)), Err(SeekError::Overflow));
    assert_eq!(r.position(), u64::MAX);
  }

  #[test]
  fn first_32_bytes_are_root_hash() {
    let out = chunk_output(&IV, 0, 0, b"");
    let mut r = OutputReader::new(out);
    let mut buf = [0u8; 32];
    r.read(&mut buf);
    assert_eq!(buf, out.root_hash());
  }
}
