//! BLAKE3 built on a sparse subtree forest and 8-lane batch backends.
//!
//! Input is staged eight chunks (8 KiB) at a time and handed to a batch
//! backend that hashes all eight chunks in parallel lanes. Completed chunk
//! chaining values enter a forest of subtrees indexed by tree level; merges
//! are queued and also performed eight at a time. Results are
//! bit-identical to the reference BLAKE3 for every backend.
//!
//! # Quick Start
//!
//! ```
//! use b3tree::Hasher;
//!
//! let digest = b3tree::hash(b"some data");
//!
//! let mut h = Hasher::new();
//! h.update(b"some ");
//! h.update(b"data");
//! assert_eq!(h.finalize(), digest);
//!
//! // Extendable output, with seeking.
//! let mut out = [0u8; 100];
//! h.finalize_xof().read(&mut out);
//! assert_eq!(out[..32], digest);
//! ```
//!
//! # Backends
//!
//! | Backend | Requirement |
//! |---------|-------------|
//! | `portable` | none |
//! | `lanes8` | none (word-major, autovectorizable) |
//! | `x86_64/avx2` | AVX2 |
//!
//! The fastest supported backend is chosen once per process. With `std`, the
//! `B3TREE_BACKEND` environment variable can cap the choice, and
//! [`Hasher::with_kernel`] selects one explicitly.
//!
//! # Features
//!
//! - `std` (default): runtime CPU detection, `std::io` adapters.
//! - `alloc`: [`Hasher::sum`].
//! - `tracing`: a debug event when the backend is chosen.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod chunk;
mod codec;
mod compress;
pub mod dispatch;
mod forest;
mod hasher;
#[cfg(feature = "std")]
mod io;
pub mod kernels;
mod output;

pub use chunk::chunk_output;
pub use compress::compress;
pub use hasher::Hasher;
pub use kernels::KernelId;
pub use output::{OutputReader, OutputState, SeekFrom};
pub use traits::{Digest, SeekError, Xof};

/// Default digest length in bytes.
pub const OUT_LEN: usize = 32;
/// Key length for keyed hashing.
pub const KEY_LEN: usize = 32;
/// Compression block length.
pub const BLOCK_LEN: usize = 64;
/// Chunk length: the leaves of the hash tree.
pub const CHUNK_LEN: usize = 1024;
/// Bytes hashed per batch: one chunk per lane.
pub const BATCH_LEN: usize = kernels::LANES * CHUNK_LEN;

/// Initial chaining value (shared with SHA-256).
pub const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

/// Domain separation flags.
pub mod flags {
  pub const CHUNK_START: u32 = 1 << 0;
  pub const CHUNK_END: u32 = 1 << 1;
  pub const PARENT: u32 = 1 << 2;
  pub const ROOT: u32 = 1 << 3;
  pub const KEYED_HASH: u32 = 1 << 4;
  pub const DERIVE_KEY_CONTEXT: u32 = 1 << 5;
  pub const DERIVE_KEY_MATERIAL: u32 = 1 << 6;
}

/// Hash `input` with the default hash function.
#[inline]
#[must_use]
pub fn hash(input: &[u8]) -> [u8; OUT_LEN] {
  let mut h = Hasher::new();
  h.update(input);
  h.finalize()
}

/// Keyed hash (MAC) of `input`.
#[inline]
#[must_use]
pub fn keyed_hash(key: &[u8; KEY_LEN], input: &[u8]) -> [u8; OUT_LEN] {
  let mut h = Hasher::new_keyed(key);
  h.update(input);
  h.finalize()
}

/// Derive `out.len()` bytes of key material from `material` under `context`.
#[inline]
pub fn derive_key(context: &str, material: &[u8], out: &mut [u8]) {
  let mut h = Hasher::new_derive_key(context);
  h.update(material);
  h.finalize_into(out);
}
