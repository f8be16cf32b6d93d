//! CPU capability representation.
//!
//! [`Caps`] answers the question "what instructions can I legally run on this
//! machine?". Each bit corresponds to one ISA extension that a kernel in this
//! workspace requires.
//!
//! # Bit Layout
//!
//! - Bit 0: AVX
//! - Bit 1: AVX2
//! - Bits 2-63: reserved

use core::fmt;

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`. It can be freely shared across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self(0);

  /// Every capability bit set. Used as the identity mask for overrides.
  pub const ALL: Self = Self(u64::MAX);

  /// Create a capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit % 64))
  }

  /// Check if all features in `required` are present.
  ///
  /// This is the core dispatch check, marked `#[inline(always)]` for zero overhead.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Iterate over the names of the known features in this set.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    NAMES.iter().filter(move |(caps, _)| self.has(*caps)).map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.feature_names()).finish()
  }
}

/// x86/x86_64 feature bits.
pub mod x86 {
  use super::Caps;

  pub const AVX: Caps = Caps::bit(0);
  /// AVX2 implies AVX on every CPU we dispatch to; both are required.
  pub const AVX2: Caps = Caps::bit(1).union(AVX);
}

const NAMES: &[(Caps, &str)] = &[(x86::AVX, "avx"), (Caps::bit(1), "avx2")];
