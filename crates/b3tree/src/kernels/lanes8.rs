//! Word-major 8-lane backend in plain Rust.
//!
//! State and message words are held as `[u32; 8]` rows, one element per lane,
//! the same layout the SIMD backends use in vector registers. The compiler is
//! free to autovectorize the row operations.

#![allow(clippy::indexing_slicing)] // Fixed-size rows; offsets bounded by BATCH_LEN.

use super::{BatchBackend, CvLanes, KernelId, LANES};
use crate::{
  BATCH_LEN, BLOCK_LEN, CHUNK_LEN, IV,
  compress::MSG_SCHEDULE,
  flags::{CHUNK_END, CHUNK_START, PARENT},
};

type Row = [u32; LANES];

const BLOCKS_PER_CHUNK: usize = CHUNK_LEN / BLOCK_LEN;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lanes8;

#[inline(always)]
fn splat(x: u32) -> Row {
  [x; LANES]
}

#[inline(always)]
fn add(a: Row, b: Row) -> Row {
  core::array::from_fn(|i| a[i].wrapping_add(b[i]))
}

#[inline(always)]
fn xor_rot(a: Row, b: Row, n: u32) -> Row {
  core::array::from_fn(|i| (a[i] ^ b[i]).rotate_right(n))
}

#[inline(always)]
fn g(v: &mut [Row; 16], a: usize, b: usize, c: usize, d: usize, mx: Row, my: Row) {
  v[a] = add(add(v[a], v[b]), mx);
  v[d] = xor_rot(v[d], v[a], 16);
  v[c] = add(v[c], v[d]);
  v[b] = xor_rot(v[b], v[c], 12);
  v[a] = add(add(v[a], v[b]), my);
  v[d] = xor_rot(v[d], v[a], 8);
  v[c] = add(v[c], v[d]);
  v[b] = xor_rot(v[b], v[c], 7);
}

/// Eight compressions at once, returning the eight next chaining values.
#[inline(always)]
fn compress8(h: &[Row; 8], m: &[Row; 16], counter_lo: Row, counter_hi: Row, block_len: u32, flags: u32) -> [Row; 8] {
  let mut v = [
    h[0],
    h[1],
    h[2],
    h[3],
    h[4],
    h[5],
    h[6],
    h[7],
    splat(IV[0]),
    splat(IV[1]),
    splat(IV[2]),
    splat(IV[3]),
    counter_lo,
    counter_hi,
    splat(block_len),
    splat(flags),
  ];
  for s in &MSG_SCHEDULE {
    g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
    g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
    g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
    g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
    g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
    g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
    g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
    g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
  }
  core::array::from_fn(|w| core::array::from_fn(|lane| v[w][lane] ^ v[w + 8][lane]))
}

/// Transpose block `block` of every lane's chunk into 16 message rows.
#[inline(always)]
fn load_block(batch: &[u8; BATCH_LEN], block: usize) -> [Row; 16] {
  core::array::from_fn(|w| {
    core::array::from_fn(|lane| {
      let at = lane * CHUNK_LEN + block * BLOCK_LEN + 4 * w;
      u32::from_le_bytes([batch[at], batch[at + 1], batch[at + 2], batch[at + 3]])
    })
  })
}

impl BatchBackend for Lanes8 {
  #[inline]
  fn id(self) -> KernelId {
    KernelId::Lanes8
  }

  fn hash_chunks(self, input: &[u8], counter: u64, key: &[u32; 8], flags: u32, out: &mut CvLanes) -> [u32; 8] {
    debug_assert!(input.len() <= BATCH_LEN);
    if input.is_empty() {
      *out = CvLanes::ZERO;
      return *key;
    }

    let mut padded = [0u8; BATCH_LEN];
    padded[..input.len()].copy_from_slice(input);

    let last = input.len() - 1;
    let tail_lane = last / CHUNK_LEN;
    let tail_block = (last % CHUNK_LEN) / BLOCK_LEN;

    let counters: [u64; LANES] = core::array::from_fn(|lane| counter.wrapping_add(lane as u64));
    let counter_lo: Row = core::array::from_fn(|lane| counters[lane] as u32);
    let counter_hi: Row = core::array::from_fn(|lane| (counters[lane] >> 32) as u32);

    let mut h: [Row; 8] = core::array::from_fn(|w| splat(key[w]));
    let mut tail = *key;
    for block in 0..BLOCKS_PER_CHUNK {
      if block == tail_block {
        tail = core::array::from_fn(|w| h[w][tail_lane]);
      }
      let mut block_flags = flags;
      if block == 0 {
        block_flags |= CHUNK_START;
      }
      if block + 1 == BLOCKS_PER_CHUNK {
        block_flags |= CHUNK_END;
      }
      let m = load_block(&padded, block);
      h = compress8(&h, &m, counter_lo, counter_hi, BLOCK_LEN as u32, block_flags);
    }

    out.words = h;
    out.clear_from(input.len() / CHUNK_LEN);
    tail
  }

  fn hash_parents(self, left: &CvLanes, right: &CvLanes, n: usize, key: &[u32; 8], flags: u32, out: &mut CvLanes) {
    debug_assert!(n <= LANES);
    let h: [Row; 8] = core::array::from_fn(|w| splat(key[w]));
    let m: [Row; 16] = core::array::from_fn(|w| if w < 8 { left.words[w] } else { right.words[w - 8] });
    out.words = compress8(&h, &m, splat(0), splat(0), BLOCK_LEN as u32, flags | PARENT);
    out.clear_from(n);
  }
}
