//! x86_64 batch backends.

#![allow(unsafe_code)]

use platform::caps::x86;

use super::{BatchBackend, CvLanes, KernelId, LANES};
use crate::{BATCH_LEN, BLOCK_LEN, CHUNK_LEN};

mod avx2;

/// AVX2 backend. Holding a value proves AVX2 was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Avx2 {
  _detected: (),
}

impl Avx2 {
  /// Returns the backend if the CPU supports AVX2.
  #[inline]
  #[must_use]
  pub fn new() -> Option<Self> {
    platform::caps().has(x86::AVX2).then_some(Self { _detected: () })
  }
}

impl BatchBackend for Avx2 {
  #[inline]
  fn id(self) -> KernelId {
    KernelId::Avx2
  }

  fn hash_chunks(self, input: &[u8], counter: u64, key: &[u32; 8], flags: u32, out: &mut CvLanes) -> [u32; 8] {
    debug_assert!(input.len() <= BATCH_LEN);
    if input.is_empty() {
      *out = CvLanes::ZERO;
      return *key;
    }

    let last = input.len() - 1;
    let tail_lane = last / CHUNK_LEN;
    let tail_block = (last % CHUNK_LEN) / BLOCK_LEN;

    let padded;
    let batch: &[u8; BATCH_LEN] = match input.try_into() {
      Ok(full) => full,
      Err(_) => {
        let mut buf = [0u8; BATCH_LEN];
        if let Some(dst) = buf.get_mut(..input.len()) {
          dst.copy_from_slice(input);
        }
        padded = buf;
        &padded
      }
    };

    let mut snapshot = CvLanes::ZERO;
    // SAFETY: `Avx2` values only exist after AVX2 support was detected.
    unsafe { avx2::hash_chunks8(batch, counter, key, flags, tail_block, out, &mut snapshot) };
    out.clear_from(input.len() / CHUNK_LEN);
    snapshot.lane(tail_lane)
  }

  fn hash_parents(self, left: &CvLanes, right: &CvLanes, n: usize, key: &[u32; 8], flags: u32, out: &mut CvLanes) {
    debug_assert!(n <= LANES);
    // SAFETY: `Avx2` values only exist after AVX2 support was detected.
    unsafe { avx2::hash_parents8(left, right, key, flags, out) };
    out.clear_from(n);
  }
}
