//! Chunk processor: folds up to 1024 bytes into an output descriptor.

use crate::{
  BLOCK_LEN, CHUNK_LEN, codec,
  compress::compress_cv,
  flags::{CHUNK_END, CHUNK_START},
  output::OutputState,
};

/// Hash one chunk of `0..=1024` bytes with chunk index `counter`.
///
/// All blocks except the last are compressed; the last (zero padded) block is
/// retained in the returned descriptor with `CHUNK_END` set, so the caller can
/// derive either a plain chaining value or root output from it.
#[must_use]
pub fn chunk_output(key: &[u32; 8], counter: u64, flags: u32, input: &[u8]) -> OutputState {
  debug_assert!(input.len() <= CHUNK_LEN);
  let (head, last) = split_last_block(input);
  let (blocks, _) = head.as_chunks::<BLOCK_LEN>();

  let mut cv = *key;
  for (i, block) in blocks.iter().enumerate() {
    let start = if i == 0 { CHUNK_START } else { 0 };
    cv = compress_cv(&cv, &codec::block_words(block), counter, BLOCK_LEN as u32, flags | start);
  }
  final_block(cv, counter, flags, blocks.is_empty(), last)
}

/// Finish a chunk whose chaining value entering the final block is known.
///
/// `chunk` is the complete chunk input; only its final block is read.
#[must_use]
pub(crate) fn resume(chain: &[u32; 8], counter: u64, flags: u32, chunk: &[u8]) -> OutputState {
  debug_assert!(chunk.len() <= CHUNK_LEN);
  let (head, last) = split_last_block(chunk);
  final_block(*chain, counter, flags, head.is_empty(), last)
}

/// Split off the final block. The empty chunk has one empty final block.
#[inline]
fn split_last_block(input: &[u8]) -> (&[u8], &[u8]) {
  let full = input.len().saturating_sub(1) / BLOCK_LEN;
  input.split_at(full * BLOCK_LEN)
}

#[inline]
fn final_block(chain: [u32; 8], counter: u64, flags: u32, first: bool, block: &[u8]) -> OutputState {
  let start = if first { CHUNK_START } else { 0 };
  OutputState::new(
    chain,
    codec::load_words(block),
    counter,
    block.len() as u32,
    flags | start | CHUNK_END,
  )
}
