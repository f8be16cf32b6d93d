//! One-shot hash, keyed hash, key derivation and XOF against `blake3`.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  assert_eq!(b3tree::hash(data), *blake3::hash(data).as_bytes());

  let mut key = [0u8; 32];
  let key_src = data.get(..32).unwrap_or(data);
  key[..key_src.len()].copy_from_slice(key_src);
  assert_eq!(b3tree::keyed_hash(&key, data), *blake3::keyed_hash(&key, data).as_bytes());

  // ASCII context keeps the `&str` valid.
  let ctx_len = usize::from(data.first().copied().unwrap_or(0)) % 65;
  let context: String = data.iter().skip(32).take(ctx_len).map(|&b| char::from(b'a' + b % 26)).collect();
  let mut ours = [0u8; 32];
  b3tree::derive_key(&context, data, &mut ours);
  assert_eq!(ours, blake3::derive_key(&context, data));

  let out_len = usize::from(u16::from_le_bytes([
    data.get(1).copied().unwrap_or(0),
    data.get(2).copied().unwrap_or(0),
  ])) % 2049;
  let mut ours = vec![0u8; out_len];
  let mut h = b3tree::Hasher::new();
  h.update(data);
  h.finalize_into(&mut ours);

  let mut expected = vec![0u8; out_len];
  let mut reference = blake3::Hasher::new();
  reference.update(data);
  reference.finalize_xof().fill(&mut expected);
  assert_eq!(ours, expected);
});
