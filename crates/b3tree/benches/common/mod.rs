use core::hint::black_box;

/// Splitmix-style generator: fast, deterministic, not cryptographic.
#[inline]
fn next(state: &mut u64) -> u64 {
  *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
  let mut z = *state;
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut state = seed ^ len as u64;
  let mut out = vec![0u8; len];
  for word in out.chunks_mut(8) {
    let bytes = next(&mut state).to_le_bytes();
    word.copy_from_slice(&bytes[..word.len()]);
  }
  black_box(&out);
  out
}

/// Sizes around the chunk and batch boundaries plus a few bulk sizes.
pub fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  [0usize, 64, 1024, 2048, 8192, 8193, 16 * 1024, 64 * 1024, 1024 * 1024]
    .into_iter()
    .map(|len| (len, random_bytes(len, 0xB3B3_7EE5_0000_0001)))
    .collect()
}

pub fn set_throughput(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, len: usize) {
  if len == 0 {
    group.throughput(criterion::Throughput::Elements(1));
  } else {
    group.throughput(criterion::Throughput::Bytes(len as u64));
  }
}
