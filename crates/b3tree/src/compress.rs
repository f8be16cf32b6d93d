//! The BLAKE3 compression function.

#![allow(clippy::indexing_slicing)] // Fixed-size state and schedule arrays.

use crate::IV;

/// Message word permutation applied between rounds.
const PERMUTATION: [usize; 16] = [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8];

/// Message schedule for all 7 rounds.
///
/// `MSG_SCHEDULE[round][i]` is the index of the original message word consumed
/// in position `i` of that round. Row `r + 1` is row `r` permuted once more.
pub(crate) const MSG_SCHEDULE: [[usize; 16]; 7] = build_schedule();

const fn build_schedule() -> [[usize; 16]; 7] {
  let mut schedule = [[0usize; 16]; 7];
  let mut i = 0;
  while i < 16 {
    schedule[0][i] = i;
    i += 1;
  }
  let mut r = 1;
  while r < 7 {
    let mut i = 0;
    while i < 16 {
      schedule[r][i] = schedule[r - 1][PERMUTATION[i]];
      i += 1;
    }
    r += 1;
  }
  schedule
}

macro_rules! g {
  ($v:ident, $a:literal, $b:literal, $c:literal, $d:literal, $mx:expr, $my:expr) => {{
    $v[$a] = $v[$a].wrapping_add($v[$b]).wrapping_add($mx);
    $v[$d] = ($v[$d] ^ $v[$a]).rotate_right(16);
    $v[$c] = $v[$c].wrapping_add($v[$d]);
    $v[$b] = ($v[$b] ^ $v[$c]).rotate_right(12);
    $v[$a] = $v[$a].wrapping_add($v[$b]).wrapping_add($my);
    $v[$d] = ($v[$d] ^ $v[$a]).rotate_right(8);
    $v[$c] = $v[$c].wrapping_add($v[$d]);
    $v[$b] = ($v[$b] ^ $v[$c]).rotate_right(7);
  }};
}

/// Compress one 64-byte block into the full 16-word output.
///
/// Words `0..8` are the next chaining value; all 16 words form one block of
/// root output when `flags` contains `ROOT`.
#[inline]
#[must_use]
pub fn compress(cv: &[u32; 8], block: &[u32; 16], counter: u64, block_len: u32, flags: u32) -> [u32; 16] {
  let mut v = [
    cv[0],
    cv[1],
    cv[2],
    cv[3],
    cv[4],
    cv[5],
    cv[6],
    cv[7],
    IV[0],
    IV[1],
    IV[2],
    IV[3],
    counter as u32,
    (counter >> 32) as u32,
    block_len,
    flags,
  ];

  for s in &MSG_SCHEDULE {
    // Columns.
    g!(v, 0, 4, 8, 12, block[s[0]], block[s[1]]);
    g!(v, 1, 5, 9, 13, block[s[2]], block[s[3]]);
    g!(v, 2, 6, 10, 14, block[s[4]], block[s[5]]);
    g!(v, 3, 7, 11, 15, block[s[6]], block[s[7]]);
    // Diagonals.
    g!(v, 0, 5, 10, 15, block[s[8]], block[s[9]]);
    g!(v, 1, 6, 11, 12, block[s[10]], block[s[11]]);
    g!(v, 2, 7, 8, 13, block[s[12]], block[s[13]]);
    g!(v, 3, 4, 9, 14, block[s[14]], block[s[15]]);
  }

  for i in 0..8 {
    v[i] ^= v[i + 8];
    v[i + 8] ^= cv[i];
  }
  v
}

/// Compress and keep only the chaining value.
#[inline(always)]
#[must_use]
pub(crate) fn compress_cv(cv: &[u32; 8], block: &[u32; 16], counter: u64, block_len: u32, flags: u32) -> [u32; 8] {
  let out = compress(cv, block, counter, block_len, flags);
  [out[0], out[1], out[2], out[3], out[4], out[5], out[6], out[7]]
}
