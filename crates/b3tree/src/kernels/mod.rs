//! Batch backends: 8-lane chunk and parent hashing.
//!
//! Every backend implements [`BatchBackend`] with identical results; they
//! differ only in how the eight lanes are computed. [`Kernel`] is the
//! runtime-selected backend, built only after the CPU capabilities it needs
//! have been verified.

#![allow(clippy::indexing_slicing)] // Lane indices are bounded by LANES.

use platform::Caps;

pub mod lanes8;
pub mod portable;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

pub use lanes8::Lanes8;
pub use portable::Portable;
#[cfg(target_arch = "x86_64")]
pub use x86_64::Avx2;

/// Number of lanes a batch backend processes at once.
pub const LANES: usize = 8;

/// Eight chaining values in word-major ("transposed") layout.
///
/// `words[w][lane]` is word `w` of the chaining value in `lane`, which is the
/// layout SIMD backends load and store directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C, align(32))]
pub struct CvLanes {
  pub words: [[u32; LANES]; 8],
}

impl CvLanes {
  pub const ZERO: Self = Self { words: [[0; LANES]; 8] };

  /// Gather the chaining value in `lane`.
  #[inline]
  #[must_use]
  pub fn lane(&self, lane: usize) -> [u32; 8] {
    debug_assert!(lane < LANES);
    core::array::from_fn(|w| self.words[w][lane])
  }

  /// Scatter `cv` into `lane`.
  #[inline]
  pub fn set_lane(&mut self, lane: usize, cv: &[u32; 8]) {
    debug_assert!(lane < LANES);
    for (row, &word) in self.words.iter_mut().zip(cv) {
      row[lane] = word;
    }
  }

  /// Zero every lane at index `n` and above.
  #[inline]
  pub fn clear_from(&mut self, n: usize) {
    for row in &mut self.words {
      for word in row.iter_mut().skip(n) {
        *word = 0;
      }
    }
  }
}

/// The batch contract shared by every backend.
pub trait BatchBackend: Copy {
  /// Identifier of this backend.
  fn id(self) -> KernelId;

  /// Hash up to eight consecutive chunks.
  ///
  /// Lane `i` covers `input[1024 * i..1024 * (i + 1)]` with chunk counter
  /// `counter + i`. Lanes holding a complete chunk receive its chaining value;
  /// all other lanes are zero. Returns the chaining value entering the final
  /// block of the chunk containing the last byte of `input` (`key` when
  /// `input` is empty).
  fn hash_chunks(self, input: &[u8], counter: u64, key: &[u32; 8], flags: u32, out: &mut CvLanes) -> [u32; 8];

  /// Hash `n <= 8` parent nodes.
  ///
  /// Lane `i < n` receives the chaining value of the parent over
  /// `left.lane(i) || right.lane(i)` keyed by `key`, with `PARENT` added to
  /// `flags`. Lanes `>= n` are zero.
  fn hash_parents(self, left: &CvLanes, right: &CvLanes, n: usize, key: &[u32; 8], flags: u32, out: &mut CvLanes);
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernel identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Batch backend identifiers, ordered from slowest to fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum KernelId {
  Portable = 0,
  Lanes8 = 1,
  #[cfg(target_arch = "x86_64")]
  Avx2 = 2,
}

pub const ALL: &[KernelId] = &[
  KernelId::Portable,
  KernelId::Lanes8,
  #[cfg(target_arch = "x86_64")]
  KernelId::Avx2,
];

impl KernelId {
  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Portable => "portable",
      Self::Lanes8 => "lanes8",
      #[cfg(target_arch = "x86_64")]
      Self::Avx2 => "x86_64/avx2",
    }
  }

  /// The next slower tier, if any.
  #[inline]
  #[must_use]
  pub const fn fallback(self) -> Option<Self> {
    match self {
      Self::Portable => None,
      Self::Lanes8 => Some(Self::Portable),
      #[cfg(target_arch = "x86_64")]
      Self::Avx2 => Some(Self::Lanes8),
    }
  }
}

impl core::fmt::Display for KernelId {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Parse a backend name as accepted by the `B3TREE_BACKEND` variable.
#[must_use]
pub fn id_from_name(name: &str) -> Option<KernelId> {
  match name {
    "portable" => Some(KernelId::Portable),
    "lanes8" => Some(KernelId::Lanes8),
    #[cfg(target_arch = "x86_64")]
    "avx2" | "x86_64/avx2" => Some(KernelId::Avx2),
    _ => None,
  }
}

#[inline]
#[must_use]
pub const fn required_caps(id: KernelId) -> Caps {
  match id {
    KernelId::Portable | KernelId::Lanes8 => Caps::NONE,
    #[cfg(target_arch = "x86_64")]
    KernelId::Avx2 => platform::caps::x86::AVX2,
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime kernel
// ─────────────────────────────────────────────────────────────────────────────

/// A batch backend whose CPU requirements have been checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kernel {
  Portable(Portable),
  Lanes8(Lanes8),
  #[cfg(target_arch = "x86_64")]
  Avx2(Avx2),
}

/// Build the kernel for `id` if the current CPU supports it.
#[must_use]
pub fn kernel(id: KernelId) -> Option<Kernel> {
  if !platform::caps().has(required_caps(id)) {
    return None;
  }
  match id {
    KernelId::Portable => Some(Kernel::Portable(Portable)),
    KernelId::Lanes8 => Some(Kernel::Lanes8(Lanes8)),
    #[cfg(target_arch = "x86_64")]
    KernelId::Avx2 => Avx2::new().map(Kernel::Avx2),
  }
}

/// Build the kernel for `id`, stepping down tiers until one is supported.
#[must_use]
pub fn resolve(id: KernelId) -> Kernel {
  let mut next = Some(id);
  while let Some(id) = next {
    if let Some(k) = kernel(id) {
      return k;
    }
    next = id.fallback();
  }
  Kernel::Portable(Portable)
}

impl BatchBackend for Kernel {
  #[inline]
  fn id(self) -> KernelId {
    match self {
      Self::Portable(k) => k.id(),
      Self::Lanes8(k) => k.id(),
      #[cfg(target_arch = "x86_64")]
      Self::Avx2(k) => k.id(),
    }
  }

  #[inline]
  fn hash_chunks(self, input: &[u8], counter: u64, key: &[u32; 8], flags: u32, out: &mut CvLanes) -> [u32; 8] {
    match self {
      Self::Portable(k) => k.hash_chunks(input, counter, key, flags, out),
      Self::Lanes8(k) => k.hash_chunks(input, counter, key, flags, out),
      #[cfg(target_arch = "x86_64")]
      Self::Avx2(k) => k.hash_chunks(input, counter, key, flags, out),
    }
  }

  #[inline]
  fn hash_parents(self, left: &CvLanes, right: &CvLanes, n: usize, key: &[u32; 8], flags: u32, out: &mut CvLanes) {
    match self {
      Self::Portable(k) => k.hash_parents(left, right, n, key, flags, out),
      Self::Lanes8(k) => k.hash_parents(left, right, n, key, flags, out),
      #[cfg(target_arch = "x86_64")]
      Self::Avx2(k) => k.hash_parents(left, right, n, key, flags, out),
    }
  }
}
