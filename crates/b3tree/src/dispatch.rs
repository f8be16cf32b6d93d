//! Process-wide batch backend selection.
//!
//! The choice depends only on CPU capabilities (and, with `std`, the
//! `B3TREE_BACKEND` variable), so it is made once and cached. Without `std`
//! capabilities are compile-time constants and selection is recomputed.

use platform::Caps;

use crate::kernels::{self, Kernel, KernelId};

/// Environment variable that caps the selected backend tier.
pub const BACKEND_ENV: &str = "B3TREE_BACKEND";

/// The backend new hashers use.
#[inline]
#[must_use]
pub fn active() -> Kernel {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static ACTIVE: OnceLock<Kernel> = OnceLock::new();
    *ACTIVE.get_or_init(select)
  }

  #[cfg(not(feature = "std"))]
  {
    select()
  }
}

/// Fastest tier the capabilities allow.
#[inline]
#[must_use]
pub fn best_for(caps: Caps) -> KernelId {
  kernels::ALL
    .iter()
    .copied()
    .filter(|&id| caps.has(kernels::required_caps(id)))
    .max()
    .unwrap_or(KernelId::Portable)
}

/// Lower `best` to the tier named by `request`, if it names a slower one.
#[inline]
#[must_use]
pub fn cap_tier(best: KernelId, request: Option<&str>) -> KernelId {
  match request.map(str::trim).and_then(kernels::id_from_name) {
    Some(requested) => best.min(requested),
    None => best,
  }
}

#[cold]
fn select() -> Kernel {
  let caps = platform::caps();

  #[cfg(feature = "std")]
  let id = cap_tier(best_for(caps), std::env::var(BACKEND_ENV).ok().as_deref());
  #[cfg(not(feature = "std"))]
  let id = best_for(caps);

  let kernel = kernels::resolve(id);

  #[cfg(feature = "tracing")]
  tracing::debug!(backend = kernels::BatchBackend::id(kernel).as_str(), caps = ?caps, "b3tree batch backend selected");

  kernel
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kernels::BatchBackend;

  #[test]
  fn no_caps_means_lanes8() {
    assert_eq!(best_for(Caps::NONE), KernelId::Lanes8);
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn avx2_caps_pick_avx2() {
    assert_eq!(best_for(platform::caps::x86::AVX2), KernelId::Avx2);
  }

  #[test]
  fn request_only_lowers_the_tier() {
    assert_eq!(cap_tier(KernelId::Lanes8, Some("portable")), KernelId::Portable);
    assert_eq!(cap_tier(KernelId::Portable, Some("lanes8")), KernelId::Portable);
    assert_eq!(cap_tier(KernelId::Lanes8, Some(" lanes8\n")), KernelId::Lanes8);
    assert_eq!(cap_tier(KernelId::Lanes8, Some("bogus")), KernelId::Lanes8);
    assert_eq!(cap_tier(KernelId::Lanes8, None), KernelId::Lanes8);
  }

  #[test]
  fn active_is_supported() {
    let id = active().id();
    assert!(platform::caps().has(kernels::required_caps(id)) || platform::has_override());
  }
}
