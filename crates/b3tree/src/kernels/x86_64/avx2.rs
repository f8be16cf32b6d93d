//! AVX2 8-lane chunk and parent compression.
//!
//! One `__m256i` holds the same state word for all eight lanes, so the
//! chaining values come out word-major and are stored into [`CvLanes`]
//! without a final transpose.

#![allow(clippy::inline_always)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::undocumented_unsafe_blocks)]

use core::arch::x86_64::*;

use crate::{
  BATCH_LEN, BLOCK_LEN, CHUNK_LEN, IV,
  compress::MSG_SCHEDULE,
  flags::{CHUNK_END, CHUNK_START, PARENT},
  kernels::{CvLanes, LANES},
};

const BLOCKS_PER_CHUNK: usize = CHUNK_LEN / BLOCK_LEN;

#[inline(always)]
unsafe fn loadu(src: *const u8) -> __m256i {
  unsafe { _mm256_loadu_si256(src.cast()) }
}

#[inline(always)]
unsafe fn storeu(src: __m256i, dest: *mut u8) {
  unsafe { _mm256_storeu_si256(dest.cast(), src) }
}

#[inline(always)]
unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
  unsafe { _mm256_add_epi32(a, b) }
}

#[inline(always)]
unsafe fn xor(a: __m256i, b: __m256i) -> __m256i {
  unsafe { _mm256_xor_si256(a, b) }
}

#[inline(always)]
unsafe fn set1(x: u32) -> __m256i {
  unsafe { _mm256_set1_epi32(x as i32) }
}

// Byte-granular rotations are a single shuffle.
#[inline(always)]
unsafe fn rot16(x: __m256i) -> __m256i {
  unsafe {
    let mask = _mm256_setr_epi8(
      2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13, 2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13,
    );
    _mm256_shuffle_epi8(x, mask)
  }
}

#[inline(always)]
unsafe fn rot12(x: __m256i) -> __m256i {
  unsafe { _mm256_or_si256(_mm256_srli_epi32(x, 12), _mm256_slli_epi32(x, 20)) }
}

#[inline(always)]
unsafe fn rot8(x: __m256i) -> __m256i {
  unsafe {
    let mask = _mm256_setr_epi8(
      1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12, 1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12,
    );
    _mm256_shuffle_epi8(x, mask)
  }
}

#[inline(always)]
unsafe fn rot7(x: __m256i) -> __m256i {
  unsafe { _mm256_or_si256(_mm256_srli_epi32(x, 7), _mm256_slli_epi32(x, 25)) }
}

#[inline(always)]
unsafe fn g(v: &mut [__m256i; 16], a: usize, b: usize, c: usize, d: usize, mx: __m256i, my: __m256i) {
  unsafe {
    v[a] = add(add(v[a], v[b]), mx);
    v[d] = rot16(xor(v[d], v[a]));
    v[c] = add(v[c], v[d]);
    v[b] = rot12(xor(v[b], v[c]));
    v[a] = add(add(v[a], v[b]), my);
    v[d] = rot8(xor(v[d], v[a]));
    v[c] = add(v[c], v[d]);
    v[b] = rot7(xor(v[b], v[c]));
  }
}

#[inline(always)]
unsafe fn compress8(
  h: &[__m256i; 8],
  m: &[__m256i; 16],
  counter_lo: __m256i,
  counter_hi: __m256i,
  block_len: u32,
  flags: u32,
) -> [__m256i; 8] {
  unsafe {
    let mut v = [
      h[0],
      h[1],
      h[2],
      h[3],
      h[4],
      h[5],
      h[6],
      h[7],
      set1(IV[0]),
      set1(IV[1]),
      set1(IV[2]),
      set1(IV[3]),
      counter_lo,
      counter_hi,
      set1(block_len),
      set1(flags),
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
    [
      xor(v[0], v[8]),
      xor(v[1], v[9]),
      xor(v[2], v[10]),
      xor(v[3], v[11]),
      xor(v[4], v[12]),
      xor(v[5], v[13]),
      xor(v[6], v[14]),
      xor(v[7], v[15]),
    ]
  }
}

/// 8x8 transpose of 32-bit words: lane-major rows in, word-major rows out.
#[inline(always)]
unsafe fn transpose8(rows: &mut [__m256i; 8]) {
  unsafe {
    let ab_lo = _mm256_unpacklo_epi32(rows[0], rows[1]);
    let ab_hi = _mm256_unpackhi_epi32(rows[0], rows[1]);
    let cd_lo = _mm256_unpacklo_epi32(rows[2], rows[3]);
    let cd_hi = _mm256_unpackhi_epi32(rows[2], rows[3]);
    let ef_lo = _mm256_unpacklo_epi32(rows[4], rows[5]);
    let ef_hi = _mm256_unpackhi_epi32(rows[4], rows[5]);
    let gh_lo = _mm256_unpacklo_epi32(rows[6], rows[7]);
    let gh_hi = _mm256_unpackhi_epi32(rows[6], rows[7]);

    let abcd_0 = _mm256_unpacklo_epi64(ab_lo, cd_lo);
    let abcd_1 = _mm256_unpackhi_epi64(ab_lo, cd_lo);
    let abcd_2 = _mm256_unpacklo_epi64(ab_hi, cd_hi);
    let abcd_3 = _mm256_unpackhi_epi64(ab_hi, cd_hi);
    let efgh_0 = _mm256_unpacklo_epi64(ef_lo, gh_lo);
    let efgh_1 = _mm256_unpackhi_epi64(ef_lo, gh_lo);
    let efgh_2 = _mm256_unpacklo_epi64(ef_hi, gh_hi);
    let efgh_3 = _mm256_unpackhi_epi64(ef_hi, gh_hi);

    // Low 128-bit halves hold words 0..4, high halves words 4..8.
    rows[0] = _mm256_permute2x128_si256(abcd_0, efgh_0, 0x20);
    rows[1] = _mm256_permute2x128_si256(abcd_1, efgh_1, 0x20);
    rows[2] = _mm256_permute2x128_si256(abcd_2, efgh_2, 0x20);
    rows[3] = _mm256_permute2x128_si256(abcd_3, efgh_3, 0x20);
    rows[4] = _mm256_permute2x128_si256(abcd_0, efgh_0, 0x31);
    rows[5] = _mm256_permute2x128_si256(abcd_1, efgh_1, 0x31);
    rows[6] = _mm256_permute2x128_si256(abcd_2, efgh_2, 0x31);
    rows[7] = _mm256_permute2x128_si256(abcd_3, efgh_3, 0x31);
  }
}

/// Load block `block` from each of the eight chunks as 16 message rows.
#[inline(always)]
unsafe fn load_msg(batch: &[u8; BATCH_LEN], block: usize) -> [__m256i; 16] {
  unsafe {
    let base = batch.as_ptr().add(block * BLOCK_LEN);
    let mut lo = [_mm256_setzero_si256(); LANES];
    let mut hi = [_mm256_setzero_si256(); LANES];
    for lane in 0..LANES {
      let src = base.add(lane * CHUNK_LEN);
      lo[lane] = loadu(src);
      hi[lane] = loadu(src.add(32));
    }
    transpose8(&mut lo);
    transpose8(&mut hi);
    [
      lo[0], lo[1], lo[2], lo[3], lo[4], lo[5], lo[6], lo[7], hi[0], hi[1], hi[2], hi[3], hi[4], hi[5], hi[6], hi[7],
    ]
  }
}

#[inline(always)]
unsafe fn load_counters(counter: u64) -> (__m256i, __m256i) {
  let mut lo = [0u32; LANES];
  let mut hi = [0u32; LANES];
  for (lane, (l, h)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
    let c = counter.wrapping_add(lane as u64);
    *l = c as u32;
    *h = (c >> 32) as u32;
  }
  unsafe { (loadu(lo.as_ptr().cast()), loadu(hi.as_ptr().cast())) }
}

#[inline(always)]
unsafe fn store_rows(rows: &[__m256i; 8], out: &mut CvLanes) {
  for (row, dst) in rows.iter().zip(out.words.iter_mut()) {
    unsafe { storeu(*row, dst.as_mut_ptr().cast()) };
  }
}

/// Hash eight full chunks of `batch` with counters `counter..counter + 8`.
///
/// `snapshot` receives the chaining values entering block `snapshot_block`.
///
/// # Safety
/// Caller must ensure AVX2 is available.
#[target_feature(enable = "avx2")]
pub(super) unsafe fn hash_chunks8(
  batch: &[u8; BATCH_LEN],
  counter: u64,
  key: &[u32; 8],
  flags: u32,
  snapshot_block: usize,
  out: &mut CvLanes,
  snapshot: &mut CvLanes,
) {
  unsafe {
    let (counter_lo, counter_hi) = load_counters(counter);
    let mut h = [
      set1(key[0]),
      set1(key[1]),
      set1(key[2]),
      set1(key[3]),
      set1(key[4]),
      set1(key[5]),
      set1(key[6]),
      set1(key[7]),
    ];
    for block in 0..BLOCKS_PER_CHUNK {
      if block == snapshot_block {
        store_rows(&h, snapshot);
      }
      let mut block_flags = flags;
      if block == 0 {
        block_flags |= CHUNK_START;
      }
      if block + 1 == BLOCKS_PER_CHUNK {
        block_flags |= CHUNK_END;
      }
      let m = load_msg(batch, block);
      h = compress8(&h, &m, counter_lo, counter_hi, BLOCK_LEN as u32, block_flags);
    }
    store_rows(&h, out);
  }
}

/// Hash eight parent nodes.
///
/// # Safety
/// Caller must ensure AVX2 is available.
#[target_feature(enable = "avx2")]
pub(super) unsafe fn hash_parents8(left: &CvLanes, right: &CvLanes, key: &[u32; 8], flags: u32, out: &mut CvLanes) {
  unsafe {
    let h = [
      set1(key[0]),
      set1(key[1]),
      set1(key[2]),
      set1(key[3]),
      set1(key[4]),
      set1(key[5]),
      set1(key[6]),
      set1(key[7]),
    ];
    let mut m = [_mm256_setzero_si256(); 16];
    for (w, row) in left.words.iter().chain(right.words.iter()).enumerate() {
      m[w] = loadu(row.as_ptr().cast());
    }
    let zero = _mm256_setzero_si256();
    let rows = compress8(&h, &m, zero, zero, BLOCK_LEN as u32, flags | PARENT);
    store_rows(&rows, out);
  }
}
