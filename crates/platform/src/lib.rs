//! CPU detection and capabilities for the b3tree workspace.
//!
//! This crate is the **single source of truth** for CPU feature detection.
//! Hash kernels query [`caps()`] instead of doing ad-hoc detection, then check
//! the features they require with [`Caps::has`].
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::AVX2) {
//!     // Use the 8-lane AVX2 kernel
//! }
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: Algorithms query `platform::caps()` instead of probing themselves.
//! 2. **Zero-cost when possible**: Compile-time features are detected via `cfg!`.
//! 3. **Cached otherwise**: Runtime detection is cached in a `OnceLock` (std).
//! 4. **Restrict-only overrides**: An override can hide features, never invent them.
//! 5. **Miri-safe**: Under Miri, always returns portable-only caps.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;

/// Get the detected CPU capabilities, restricted by any active override.
///
/// # Caching
///
/// - With `std`: runtime detection runs once and is cached in a `OnceLock`.
/// - Without `std`: only compile-time features are reported, so there is
///   nothing to cache.
///
/// # Miri
///
/// Under Miri this always returns [`Caps::NONE`] to avoid interpreting SIMD
/// intrinsics.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Capabilities detected on this machine, ignoring any override.
#[inline]
#[must_use]
pub fn detected() -> Caps {
  detect::detected()
}

/// Restrict the reported capabilities to `mask`, or clear the restriction.
///
/// The result of [`caps()`] is always `detected() & mask`, so an override can
/// force portable fallbacks in tests but can never enable a feature the CPU
/// lacks.
///
/// # Example
///
/// ```ignore
/// platform::set_caps_override(Some(platform::Caps::NONE));
/// // ... exercise portable fallbacks ...
/// platform::set_caps_override(None);
/// ```
#[inline]
pub fn set_caps_override(mask: Option<Caps>) {
  detect::set_caps_override(mask);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
