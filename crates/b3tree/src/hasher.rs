//! Incremental hasher with an 8-chunk staging buffer.

#![allow(clippy::indexing_slicing)] // Buffer offsets are bounded by BATCH_LEN.

use core::cmp::min;

use traits::Digest;

use crate::{
  BATCH_LEN, BLOCK_LEN, CHUNK_LEN, IV, KEY_LEN, OUT_LEN, chunk, codec, dispatch,
  flags::{DERIVE_KEY_CONTEXT, DERIVE_KEY_MATERIAL, KEYED_HASH},
  forest::Forest,
  kernels::{self, BatchBackend, CvLanes, KernelId, LANES, Portable},
  output::{OutputReader, OutputState},
};

/// Streaming BLAKE3 hasher.
///
/// Input is staged in an 8192-byte buffer and hashed eight chunks at a time.
/// A full buffer is only hashed once more input arrives, because the last
/// chunk of the message must be finished differently. Finalizing does not
/// consume or modify the hasher.
///
/// # Examples
///
/// ```
/// use b3tree::Hasher;
///
/// let mut h = Hasher::new();
/// h.update(b"some ");
/// h.update(b"data");
/// assert_eq!(h.finalize(), b3tree::hash(b"some data"));
/// ```
#[derive(Clone)]
pub struct Hasher {
  forest: Forest,
  chunks: u64,
  buf: [u8; BATCH_LEN],
  buf_len: usize,
  output_len: usize,
}

impl Default for Hasher {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Hasher {
  /// Hasher for the default (unkeyed) hash function.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::new_internal(IV, 0)
  }

  /// Hasher for the keyed hash function.
  #[inline]
  #[must_use]
  pub fn new_keyed(key: &[u8; KEY_LEN]) -> Self {
    Self::new_internal(codec::load_words(key), KEYED_HASH)
  }

  /// Hasher for key derivation under `context`.
  ///
  /// `context` should be hardcoded, globally unique, and application-specific.
  #[must_use]
  pub fn new_derive_key(context: &str) -> Self {
    let mut context_hasher = Self::new_internal(IV, DERIVE_KEY_CONTEXT);
    context_hasher.update(context.as_bytes());
    let context_key = context_hasher.root_output().root_hash();
    Self::new_internal(codec::load_words(&context_key), DERIVE_KEY_MATERIAL)
  }

  #[inline]
  fn new_internal(key: [u32; 8], flags: u32) -> Self {
    Self {
      forest: Forest::new(dispatch::active(), key, flags),
      chunks: 0,
      buf: [0u8; BATCH_LEN],
      buf_len: 0,
      output_len: OUT_LEN,
    }
  }

  /// Set the number of bytes [`Hasher::sum`] appends.
  #[inline]
  #[must_use]
  pub fn with_output_len(mut self, len: usize) -> Self {
    self.output_len = len;
    self
  }

  /// Number of bytes [`Hasher::sum`] appends. Defaults to 32.
  #[inline]
  #[must_use]
  pub fn output_len(&self) -> usize {
    self.output_len
  }

  /// Use the batch backend `id`, or the best slower tier the CPU supports.
  #[inline]
  #[must_use]
  pub fn with_kernel(mut self, id: KernelId) -> Self {
    self.forest.kernel = kernels::resolve(id);
    self
  }

  /// The batch backend in use.
  #[inline]
  #[must_use]
  pub fn kernel_id(&self) -> KernelId {
    self.forest.kernel.id()
  }

  /// Preferred update granularity in bytes.
  #[inline]
  #[must_use]
  pub const fn block_size() -> usize {
    BATCH_LEN
  }

  /// Absorb `input`.
  pub fn update(&mut self, mut input: &[u8]) {
    while !input.is_empty() {
      if self.buf_len == BATCH_LEN {
        // More input follows, so every chunk in the buffer is complete.
        ingest(&mut self.forest, &mut self.chunks, &self.buf);
        self.buf_len = 0;
      }

      if self.buf_len == 0 && input.len() > BATCH_LEN {
        let (batch, rest) = input.split_at(BATCH_LEN);
        ingest(&mut self.forest, &mut self.chunks, batch);
        input = rest;
        continue;
      }

      let take = min(BATCH_LEN - self.buf_len, input.len());
      self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&input[..take]);
      self.buf_len += take;
      input = &input[take..];
    }
  }

  /// Return to the freshly constructed state, keeping key, mode and backend.
  pub fn reset(&mut self) {
    self.chunks = 0;
    self.buf_len = 0;
    self.forest.clear();
  }

  /// Root output descriptor for everything absorbed so far.
  fn root_output(&self) -> OutputState {
    let key = &self.forest.key;
    let flags = self.forest.flags;
    let input = &self.buf[..self.buf_len];

    if self.chunks == 0 && input.len() <= CHUNK_LEN {
      return chunk::chunk_output(key, 0, flags, input);
    }
    debug_assert!(!input.is_empty(), "completed chunks imply a retained tail");

    let mut forest = self.forest.clone();
    let last = input.len().saturating_sub(1) / CHUNK_LEN;
    let chain = if input.len() > BLOCK_LEN {
      let mut cvs = CvLanes::ZERO;
      let tail = if input.len() <= 2 * CHUNK_LEN {
        Portable.hash_chunks(input, self.chunks, key, flags, &mut cvs)
      } else {
        forest.kernel.hash_chunks(input, self.chunks, key, flags, &mut cvs)
      };
      forest.push_chunks(&cvs, last);
      tail
    } else {
      *key
    };

    let output = chunk::resume(&chain, self.chunks.wrapping_add(last as u64), flags, &input[last * CHUNK_LEN..]);
    forest.root(output)
  }

  /// Write `out.len()` bytes of output. Repeatable; the hasher is unchanged.
  #[inline]
  pub fn finalize_into(&self, out: &mut [u8]) {
    OutputReader::new(self.root_output()).read(out);
  }

  /// The default 32-byte digest.
  #[inline]
  #[must_use]
  pub fn finalize(&self) -> [u8; OUT_LEN] {
    self.root_output().root_hash()
  }

  /// Seekable extendable output for everything absorbed so far.
  #[inline]
  #[must_use]
  pub fn finalize_xof(&self) -> OutputReader {
    OutputReader::new(self.root_output())
  }

  /// Append [`Hasher::output_len`] bytes of output to `buf`.
  #[cfg(feature = "alloc")]
  pub fn sum(&self, buf: &mut alloc::vec::Vec<u8>) {
    let start = buf.len();
    buf.resize(start + self.output_len, 0);
    self.finalize_into(&mut buf[start..]);
  }
}

/// Hash one full batch of eight chunks into the forest.
#[inline]
fn ingest(forest: &mut Forest, chunks: &mut u64, batch: &[u8]) {
  debug_assert_eq!(batch.len(), BATCH_LEN);
  let mut cvs = CvLanes::ZERO;
  forest.kernel.hash_chunks(batch, *chunks, &forest.key, forest.flags, &mut cvs);
  forest.push_chunks(&cvs, LANES);
  *chunks = chunks.wrapping_add(LANES as u64);
}

impl Digest for Hasher {
  const OUTPUT_SIZE: usize = OUT_LEN;
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Hasher::new()
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Hasher::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    self.root_output().root_hash()
  }

  #[inline]
  fn reset(&mut self) {
    Hasher::reset(self);
  }
}

impl core::fmt::Debug for Hasher {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Hasher")
      .field("kernel", &self.kernel_id())
      .field("chunks", &self.chunks)
      .field("buffered", &self.buf_len)
      .finish_non_exhaustive()
  }
}
