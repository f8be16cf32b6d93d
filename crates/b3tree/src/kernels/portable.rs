//! Scalar reference backend.

use super::{BatchBackend, CvLanes, KernelId, LANES};
use crate::{BATCH_LEN, CHUNK_LEN, chunk::chunk_output, output::OutputState};

/// One chunk or parent at a time through the scalar compression function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Portable;

impl BatchBackend for Portable {
  #[inline]
  fn id(self) -> KernelId {
    KernelId::Portable
  }

  fn hash_chunks(self, input: &[u8], counter: u64, key: &[u32; 8], flags: u32, out: &mut CvLanes) -> [u32; 8] {
    debug_assert!(input.len() <= BATCH_LEN);
    *out = CvLanes::ZERO;
    let mut tail = *key;
    for (lane, chunk) in input.chunks(CHUNK_LEN).enumerate() {
      let output = chunk_output(key, counter.wrapping_add(lane as u64), flags, chunk);
      if chunk.len() == CHUNK_LEN {
        out.set_lane(lane, &output.chaining_value());
      }
      tail = output.input_chaining_value();
    }
    tail
  }

  fn hash_parents(self, left: &CvLanes, right: &CvLanes, n: usize, key: &[u32; 8], flags: u32, out: &mut CvLanes) {
    debug_assert!(n <= LANES);
    *out = CvLanes::ZERO;
    for lane in 0..n.min(LANES) {
      let parent = OutputState::parent(&left.lane(lane), &right.lane(lane), key, flags);
      out.set_lane(lane, &parent.chaining_value());
    }
  }
}
