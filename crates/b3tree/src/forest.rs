//! Sparse subtree forest with a batched merge buffer.
//!
//! The forest holds at most one chaining value per tree level, tracked by an
//! occupancy mask. Pushing onto an occupied level does not merge immediately:
//! the pair is queued in a word-major pending buffer and merged eight at a
//! time through the batch backend's `hash_parents`.

#![allow(clippy::indexing_slicing)] // Levels < 64, pending slots < LANES.

use crate::{
  kernels::{BatchBackend, CvLanes, Kernel, LANES, Portable},
  output::OutputState,
};

/// Maximum tree depth: a `u64` chunk counter cannot need more levels.
const MAX_DEPTH: usize = 64;

#[derive(Clone)]
pub(crate) struct Forest {
  pub(crate) kernel: Kernel,
  pub(crate) key: [u32; 8],
  pub(crate) flags: u32,
  occupied: u64,
  levels: [[u32; 8]; MAX_DEPTH],
  left: CvLanes,
  right: CvLanes,
  origin: [u8; LANES],
  pending: usize,
}

impl Forest {
  pub(crate) const fn new(kernel: Kernel, key: [u32; 8], flags: u32) -> Self {
    Self {
      kernel,
      key,
      flags,
      occupied: 0,
      levels: [[0; 8]; MAX_DEPTH],
      left: CvLanes::ZERO,
      right: CvLanes::ZERO,
      origin: [0; LANES],
      pending: 0,
    }
  }

  /// Drop every stored and pending chaining value. Key, flags and backend stay.
  pub(crate) fn clear(&mut self) {
    self.occupied = 0;
    self.pending = 0;
  }

  /// Levels currently holding a chaining value, as a bitmask.
  #[cfg(test)]
  pub(crate) fn occupancy(&self) -> u64 {
    self.occupied
  }

  #[cfg(test)]
  pub(crate) fn pending(&self) -> usize {
    self.pending
  }

  /// Add `cv` at `level`, queueing a merge if the level is taken.
  pub(crate) fn push(&mut self, level: u8, cv: &[u32; 8]) {
    debug_assert!((level as usize) < MAX_DEPTH);
    let bit = 1u64 << level;
    if self.occupied & bit == 0 {
      self.levels[level as usize] = *cv;
      self.occupied |= bit;
      return;
    }

    self.occupied &= !bit;
    let slot = self.pending;
    self.left.set_lane(slot, &self.levels[level as usize]);
    self.right.set_lane(slot, cv);
    self.origin[slot] = level;
    self.pending += 1;
    if self.pending == LANES {
      self.flush();
    }
  }

  /// Push the first `n` lanes of a chunk batch at level 0, in lane order.
  pub(crate) fn push_chunks(&mut self, cvs: &CvLanes, n: usize) {
    debug_assert!(n <= LANES);
    for lane in 0..n {
      self.push(0, &cvs.lane(lane));
    }
  }

  /// Merge everything in the pending buffer and re-push the parents one
  /// level above their children, in buffer order.
  pub(crate) fn flush(&mut self) {
    let n = self.pending;
    if n == 0 {
      return;
    }
    let mut parents = CvLanes::ZERO;
    if n < 2 {
      Portable.hash_parents(&self.left, &self.right, n, &self.key, self.flags, &mut parents);
    } else {
      self.kernel.hash_parents(&self.left, &self.right, n, &self.key, self.flags, &mut parents);
    }
    let origin = self.origin;
    self.pending = 0;
    for lane in 0..n {
      self.push(origin[lane] + 1, &parents.lane(lane));
    }
  }

  /// Fold the forest onto `output`, the rightmost node of the tree, and
  /// return the root descriptor.
  pub(crate) fn root(mut self, mut output: OutputState) -> OutputState {
    while self.pending > 0 {
      self.flush();
    }
    let mut occupied = self.occupied;
    while occupied != 0 {
      let level = occupied.trailing_zeros() as usize;
      occupied &= occupied - 1;
      output = OutputState::parent(&self.levels[level], &output.chaining_value(), &self.key, self.flags);
    }
    output
  }
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;
  use crate::{IV, chunk::chunk_output, kernels::Lanes8};

  fn leaf(i: u64) -> [u32; 8] {
    chunk_output(&IV, i, 0, &[i as u8; 1024]).chaining_value()
  }

  /// Reference: the classic merge-on-push stack.
  fn stack_root(n: u64) -> OutputState {
    let mut stack: Vec<[u32; 8]> = Vec::new();
    for i in 0..n - 1 {
      let mut cv = leaf(i);
      let mut total = i + 1;
      while total & 1 == 0 {
        let left = stack.pop().unwrap();
        cv = OutputState::parent(&left, &cv, &IV, 0).chaining_value();
        total >>= 1;
      }
      stack.push(cv);
    }
    let mut output = chunk_output(&IV, n - 1, 0, &[(n - 1) as u8; 1024]);
    while let Some(left) = stack.pop() {
      output = OutputState::parent(&left, &output.chaining_value(), &IV, 0);
    }
    output
  }

  fn forest_root(n: u64, kernel: Kernel) -> OutputState {
    let mut forest = Forest::new(kernel, IV, 0);
    for i in 0..n - 1 {
      forest.push(0, &leaf(i));
    }
    forest.root(chunk_output(&IV, n - 1, 0, &[(n - 1) as u8; 1024]))
  }

  #[test]
  fn matches_merge_on_push_stack() {
    for n in 1..=70u64 {
      assert_eq!(forest_root(n, Kernel::Lanes8(Lanes8)), stack_root(n), "{n} chunks");
    }
  }

  #[test]
  fn batch_backend_does_not_change_root() {
    for n in [9u64, 17, 33, 64] {
      assert_eq!(forest_root(n, Kernel::Portable(Portable)), forest_root(n, Kernel::Lanes8(Lanes8)));
    }
  }

  #[test]
  fn pending_flushes_at_eight_pairs() {
    let mut forest = Forest::new(Kernel::Portable(Portable), IV, 0);
    for i in 0..15 {
      forest.push(0, &leaf(i));
    }
    // Seven pairs queued, one leaf waiting at level 0.
    assert_eq!(forest.pending(), 7);
    assert_eq!(forest.occupancy(), 0b1);
    forest.push(0, &leaf(15));
    // The eighth pair triggers a flush; eight level-1 parents cascade to
    // four queued pairs at level 1.
    assert_eq!(forest.pending(), 4);
    assert_eq!(forest.occupancy(), 0);
  }

  #[test]
  fn clear_keeps_configuration() {
    let mut forest = Forest::new(Kernel::Portable(Portable), [7; 8], 16);
    forest.push(0, &leaf(0));
    forest.clear();
    assert_eq!(forest.occupancy(), 0);
    assert_eq!(forest.pending(), 0);
    assert_eq!((forest.key, forest.flags), ([7; 8], 16));
  }
}
