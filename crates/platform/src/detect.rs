//! Capability detection, caching, and the restrict-only override mask.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;
#[cfg(target_arch = "x86_64")]
use crate::caps::x86;

// ─────────────────────────────────────────────────────────────────────────────
// Override Mask
// ─────────────────────────────────────────────────────────────────────────────

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_MASK: AtomicU64 = AtomicU64::new(u64::MAX);

#[cold]
pub(crate) fn set_caps_override(mask: Option<Caps>) {
  match mask {
    Some(mask) => {
      OVERRIDE_MASK.store(mask.0, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => {
      OVERRIDE_SET.store(false, Ordering::Release);
      OVERRIDE_MASK.store(u64::MAX, Ordering::Release);
    }
  }
}

#[inline]
pub(crate) fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

#[inline]
pub(crate) fn caps() -> Caps {
  let detected = detected();
  if has_override() {
    detected.intersection(Caps(OVERRIDE_MASK.load(Ordering::Acquire)))
  } else {
    detected
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(miri)]
#[inline]
pub(crate) fn detected() -> Caps {
  Caps::NONE
}

#[cfg(all(feature = "std", not(miri)))]
#[inline]
pub(crate) fn detected() -> Caps {
  use std::sync::OnceLock;
  static CACHED: OnceLock<Caps> = OnceLock::new();
  *CACHED.get_or_init(detect_runtime)
}

#[cfg(all(not(feature = "std"), not(miri)))]
#[inline]
pub(crate) fn detected() -> Caps {
  compile_time()
}

/// Features enabled at compile time via `-C target-feature` or `target-cpu`.
#[cfg(not(miri))]
#[inline]
const fn compile_time() -> Caps {
  #[allow(unused_mut)]
  let mut caps = Caps::NONE;
  #[cfg(target_arch = "x86_64")]
  {
    if cfg!(target_feature = "avx2") {
      caps = caps.union(x86::AVX2);
    }
  }
  caps
}

#[cfg(all(feature = "std", not(miri)))]
#[cold]
fn detect_runtime() -> Caps {
  #[allow(unused_mut)]
  let mut caps = compile_time();
  #[cfg(target_arch = "x86_64")]
  {
    if std::arch::is_x86_feature_detected!("avx2") {
      caps |= x86::AVX2;
    }
  }
  caps
}
