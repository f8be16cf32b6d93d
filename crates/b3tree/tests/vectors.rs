//! Known-answer tests and the official input pattern.

use b3tree::{Hasher, SeekFrom};

const KEY: &[u8; 32] = b"whats the Elvish word for friend";
const CONTEXT: &str = "BLAKE3 2019-12-27 16:29:52 test vectors context";

/// Lengths used by the official BLAKE3 test vectors.
const OFFICIAL_LENS: &[usize] = &[
  0, 1, 1023, 1024, 1025, 2048, 2049, 3072, 3073, 4096, 4097, 5120, 5121, 6144, 6145, 7168, 7169, 8192, 8193, 16384,
  31744, 102400,
];

const BOUNDARY_LENS: &[usize] = &[0, 1, 63, 64, 65, 1023, 1024, 1025, 8191, 8192, 8193];

fn hex(s: &str) -> Vec<u8> {
  assert!(s.len().is_multiple_of(2));
  (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap()).collect()
}

fn pattern(len: usize) -> Vec<u8> {
  (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn empty_input() {
  assert_eq!(
    b3tree::hash(b"")[..],
    hex("af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262")
  );
}

#[test]
fn some_data() {
  assert_eq!(
    b3tree::hash(b"some data")[..],
    hex("b224a1da2bf5e72b337dc6dde457a05265a06dec8875be379e2ad2be5edb3bf2")
  );
}

#[test]
fn ten_chunks_of_a() {
  let input = vec![b'a'; 10240];
  assert_eq!(
    b3tree::hash(&input)[..],
    hex("9afd0ba102b2cc68be10ba4d383b3139b97ed36d425b82631a7a1e2424088f7e")
  );
}

#[test]
fn keyed_empty() {
  assert_eq!(
    b3tree::keyed_hash(&[b'a'; 32], b"")[..],
    hex("cbf50f0463d68fd443cdb0826f387a6f57ba6dc4983ba2460fe822552d15d2f4")
  );
  assert_eq!(
    b3tree::keyed_hash(KEY, b"")[..],
    hex("92b2b75604ed3c761f9d6f62392c8a9227ad0ea3f09573e783f1498a4ed60d26")
  );
}

#[test]
fn derive_key_empty() {
  let mut out = [0u8; 32];
  b3tree::derive_key(CONTEXT, b"", &mut out);
  assert_eq!(
    out[..],
    hex("2cc39783c223154fea8dfb7c1b1660f2ac2dcbd1c1de8277b0b0dd39b7e50d7d")
  );
}

#[test]
fn empty_extended_output() {
  let expected = hex(concat!(
    "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
    "e00f03e7b69af26b7faaf09fcd333050338ddfe085b8cc869ca98b206c08243a",
    "26f5487789e8f660afe6c99ef9e0c52b92e7393024a80459cf91f476f9ffdbda",
    "7001c22e159b402631f277ca96f2defdf1078282314e763699a31c5363165421",
    "cce14d30f8a03e49ee25d2ea3cd48a568957b378a65af65fc35fb3e9e12b81ca",
    "2d82cdee16c68908a6772f827564336933c89e6908b2f9c7d1811c0eb795cbd5",
    "898fe6f5e8af763319ca863718a59aff3d99660ef642483e217ef0c878582728",
    "4fea90d42225e3cdd6a179bee852fd24e7d45b38c27b9c2f9469ea8dbdb893f0",
  ));
  let mut out = vec![0u8; expected.len()];
  Hasher::new().finalize_into(&mut out);
  assert_eq!(out, expected);

  // Same bytes from the middle of the stream.
  let mut reader = Hasher::new().finalize_xof();
  reader.seek(SeekFrom::Start(100)).unwrap();
  let mut mid = [0u8; 77];
  reader.read(&mut mid);
  assert_eq!(mid[..], expected[100..177]);
}

#[test]
fn official_pattern_all_modes() {
  for &len in OFFICIAL_LENS {
    let input = pattern(len);

    let mut expected = [0u8; 131];
    blake3::Hasher::new().update(&input).finalize_xof().fill(&mut expected);
    let mut h = Hasher::new();
    h.update(&input);
    let mut out = [0u8; 131];
    h.finalize_into(&mut out);
    assert_eq!(out, expected, "hash len {len}");

    blake3::Hasher::new_keyed(KEY).update(&input).finalize_xof().fill(&mut expected);
    let mut h = Hasher::new_keyed(KEY);
    h.update(&input);
    h.finalize_into(&mut out);
    assert_eq!(out, expected, "keyed len {len}");

    blake3::Hasher::new_derive_key(CONTEXT).update(&input).finalize_xof().fill(&mut expected);
    b3tree::derive_key(CONTEXT, &input, &mut out);
    assert_eq!(out, expected, "derive len {len}");
  }
}

#[test]
fn boundary_lengths() {
  for &len in BOUNDARY_LENS {
    let input = pattern(len);
    assert_eq!(b3tree::hash(&input), *blake3::hash(&input).as_bytes(), "len {len}");

    // Byte-at-a-time must agree with one-shot.
    let mut h = Hasher::new();
    for b in &input {
      h.update(core::slice::from_ref(b));
    }
    assert_eq!(h.finalize(), b3tree::hash(&input), "bytewise len {len}");
  }
}

#[test]
fn sized_sum_appends() {
  let mut h = Hasher::new().with_output_len(100);
  h.update(b"some data");
  assert_eq!(h.output_len(), 100);

  let mut buf = b"prefix".to_vec();
  h.sum(&mut buf);
  assert_eq!(buf.len(), 106);
  assert_eq!(&buf[..6], b"prefix");

  let mut expected = [0u8; 100];
  blake3::Hasher::new().update(b"some data").finalize_xof().fill(&mut expected);
  assert_eq!(buf[6..], expected);
  assert_eq!(Hasher::block_size(), 8192);
}
