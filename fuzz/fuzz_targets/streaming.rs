//! Arbitrary update splits, backend choice and XOF seeks.

#![no_main]

use arbitrary::Arbitrary;
use b3tree::{Hasher, SeekFrom, kernels};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Update lengths, cycled; 0 means one byte.
  splits: Vec<u16>,
  backend: u8,
  /// Seek offsets into the output stream.
  seeks: Vec<(u32, u8)>,
}

fuzz_target!(|input: Input| {
  let id = kernels::ALL[usize::from(input.backend) % kernels::ALL.len()];
  let mut h = Hasher::new().with_kernel(id);

  let mut offset = 0;
  let mut i = 0;
  while offset < input.data.len() {
    let step = input.splits.get(i % input.splits.len().max(1)).map_or(1, |&s| usize::from(s).max(1));
    let end = (offset + step).min(input.data.len());
    h.update(&input.data[offset..end]);
    offset = end;
    i += 1;
  }
  assert_eq!(h.finalize(), *blake3::hash(&input.data).as_bytes(), "backend {id}");

  let mut reference = blake3::Hasher::new();
  reference.update(&input.data);
  let mut ours = h.finalize_xof();
  for &(pos, len) in input.seeks.iter().take(16) {
    let pos = u64::from(pos);
    assert_eq!(ours.seek(SeekFrom::Start(pos)), Ok(pos));
    let mut got = vec![0u8; usize::from(len)];
    ours.read(&mut got);

    let mut theirs = reference.finalize_xof();
    theirs.set_position(pos);
    let mut want = vec![0u8; usize::from(len)];
    theirs.fill(&mut want);
    assert_eq!(got, want, "seek {pos}");
  }
});
