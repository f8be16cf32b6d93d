//! Little-endian byte <-> word codec.
//!
//! Every byte/word conversion in the crate goes through here so the word
//! order never depends on the host endianness.

use crate::BLOCK_LEN;

/// Load a full 64-byte block as 16 little-endian words.
#[inline(always)]
pub(crate) fn block_words(bytes: &[u8; BLOCK_LEN]) -> [u32; 16] {
  let (words, _) = bytes.as_chunks::<4>();
  let mut out = [0u32; 16];
  for (dst, src) in out.iter_mut().zip(words) {
    *dst = u32::from_le_bytes(*src);
  }
  out
}

/// Load up to `4 * N` bytes as little-endian words, zero padding the rest.
///
/// Used for the final (possibly partial) block of a chunk and for keys.
#[inline]
pub(crate) fn load_words<const N: usize>(bytes: &[u8]) -> [u32; N] {
  debug_assert!(bytes.len() <= 4 * N);
  let mut out = [0u32; N];
  for (dst, src) in out.iter_mut().zip(bytes.chunks(4)) {
    let mut le = [0u8; 4];
    for (d, s) in le.iter_mut().zip(src) {
      *d = *s;
    }
    *dst = u32::from_le_bytes(le);
  }
  out
}

/// Store words little-endian into `out`, truncating to `out.len()`.
#[inline]
pub(crate) fn store_words(words: &[u32], out: &mut [u8]) {
  debug_assert!(out.len() <= 4 * words.len());
  for (dst, word) in out.chunks_mut(4).zip(words) {
    let le = word.to_le_bytes();
    for (d, s) in dst.iter_mut().zip(le) {
      *d = s;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn words_are_little_endian() {
    let mut block = [0u8; BLOCK_LEN];
    block[..4].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    block[60..].copy_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd]);
    let words = block_words(&block);
    assert_eq!(words[0], 0x0403_0201);
    assert_eq!(words[15], 0xddcc_bbaa);
    assert!(words[1..15].iter().all(|&w| w == 0));
  }

  #[test]
  fn partial_load_zero_pads() {
    let words: [u32; 16] = load_words(&[0x11, 0x22, 0x33, 0x44, 0x55]);
    assert_eq!(words[0], 0x4433_2211);
    assert_eq!(words[1], 0x0000_0055);
    assert!(words[2..].iter().all(|&w| w == 0));

    let full: [u8; BLOCK_LEN] = core::array::from_fn(|i| i as u8);
    assert_eq!(load_words::<16>(&full), block_words(&full));
  }

  #[test]
  fn store_truncates() {
    let mut out = [0u8; 6];
    store_words(&[0x0403_0201, 0x0807_0605], &mut out);
    assert_eq!(out, [1, 2, 3, 4, 5, 6]);
  }
}
