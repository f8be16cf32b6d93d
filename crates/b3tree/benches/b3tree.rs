//! Throughput of the b3tree hasher, per backend, against the `blake3` crate.

use core::{hint::black_box, time::Duration};

use b3tree::{
  BATCH_LEN, Hasher, IV,
  kernels::{self, BatchBackend, CvLanes, LANES},
};
use criterion::{BenchmarkId, Criterion, SamplingMode, Throughput, criterion_group, criterion_main};

mod common;

// ─────────────────────────────────────────────────────────────────────────────
// One-shot
// ─────────────────────────────────────────────────────────────────────────────

fn oneshot(c: &mut Criterion) {
  let inputs = common::sized_inputs();
  let mut group = c.benchmark_group("b3tree/oneshot");
  group.sample_size(40);
  group.warm_up_time(Duration::from_secs(1));
  group.measurement_time(Duration::from_secs(3));
  group.sampling_mode(SamplingMode::Flat);

  for (len, data) in &inputs {
    common::set_throughput(&mut group, *len);
    for &id in kernels::ALL {
      if kernels::kernel(id).is_none() {
        continue;
      }
      group.bench_with_input(BenchmarkId::new(id.as_str(), len), data, |b, d| {
        b.iter(|| {
          let mut h = Hasher::new().with_kernel(id);
          h.update(black_box(d));
          black_box(h.finalize())
        })
      });
    }
    group.bench_with_input(BenchmarkId::new("official", len), data, |b, d| {
      b.iter(|| black_box(*blake3::hash(black_box(d)).as_bytes()))
    });
  }
  group.finish();
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming
// ─────────────────────────────────────────────────────────────────────────────

fn streaming(c: &mut Criterion) {
  let data = common::random_bytes(1024 * 1024, 0xB3B3_7EE5_0000_0002);
  let mut group = c.benchmark_group("b3tree/streaming");
  group.sample_size(20);
  group.throughput(Throughput::Bytes(data.len() as u64));

  for update_len in [64usize, 1024, 4096, 8192, 65536] {
    group.bench_function(format!("b3tree/{update_len}B-updates"), |b| {
      b.iter(|| {
        let mut h = Hasher::new();
        for piece in data.chunks(update_len) {
          h.update(piece);
        }
        black_box(h.finalize())
      })
    });
    group.bench_function(format!("official/{update_len}B-updates"), |b| {
      b.iter(|| {
        let mut h = blake3::Hasher::new();
        for piece in data.chunks(update_len) {
          h.update(piece);
        }
        black_box(*h.finalize().as_bytes())
      })
    });
  }
  group.finish();
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw batch kernels
// ─────────────────────────────────────────────────────────────────────────────

fn batch_kernels(c: &mut Criterion) {
  let data = common::random_bytes(BATCH_LEN, 0xB3B3_7EE5_0000_0003);
  let mut left = CvLanes::ZERO;
  let mut right = CvLanes::ZERO;
  for lane in 0..LANES {
    left.set_lane(lane, &[lane as u32; 8]);
    right.set_lane(lane, &[!(lane as u32); 8]);
  }

  let mut group = c.benchmark_group("b3tree/kernels");
  for &id in kernels::ALL {
    let Some(k) = kernels::kernel(id) else { continue };

    group.throughput(Throughput::Bytes(BATCH_LEN as u64));
    group.bench_function(format!("{}/hash_chunks", id.as_str()), |b| {
      let mut out = CvLanes::ZERO;
      b.iter(|| black_box(k.hash_chunks(black_box(&data), 0, &IV, 0, &mut out)))
    });

    group.throughput(Throughput::Elements(LANES as u64));
    group.bench_function(format!("{}/hash_parents", id.as_str()), |b| {
      let mut out = CvLanes::ZERO;
      b.iter(|| {
        k.hash_parents(black_box(&left), black_box(&right), LANES, &IV, 0, &mut out);
        black_box(out)
      })
    });
  }
  group.finish();
}

criterion_group!(benches, oneshot, streaming, batch_kernels);
criterion_main!(benches);
