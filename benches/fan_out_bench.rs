//! # Fan-Out Benchmark
//!
//! Measures fork and demux throughput when children are pulled in lock-step,
//! so the shared buffer stays small and the cost is dominated by the
//! controller's bookkeeping.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pipeweave::{demux, fork, IterPipe, Pipe};

fn fork_lock_step(count: usize, num_instances: usize) {
  let mut children = fork(IterPipe::new(0..count), num_instances, 16).unwrap();
  loop {
    let mut exhausted = 0;
    for child in &mut children {
      if child.pull().unwrap().is_none() {
        exhausted += 1;
      }
    }
    if exhausted == num_instances {
      break;
    }
  }
}

fn demux_round_robin(count: usize, num_instances: usize) {
  let n = num_instances;
  let mut children = demux(IterPipe::new(0..count), n, move |x: &usize| (x % n) as isize, 16).unwrap();
  let mut received = 0;
  while received < count {
    for child in &mut children {
      if child.pull().unwrap().is_some() {
        received += 1;
      }
    }
  }
}

fn fan_out_benchmark(c: &mut Criterion) {
  let mut group = c.benchmark_group("fan_out");
  group.sample_size(10);
  group.warm_up_time(std::time::Duration::from_secs(1));
  group.measurement_time(std::time::Duration::from_secs(3));

  for size in [1000, 10000, 100000].iter() {
    group.throughput(Throughput::Elements(*size as u64));
    group.bench_with_input(BenchmarkId::new("fork_x4", size), size, |b, &size| {
      b.iter(|| fork_lock_step(size, 4));
    });
    group.bench_with_input(BenchmarkId::new("demux_x4", size), size, |b, &size| {
      b.iter(|| demux_round_robin(size, 4));
    });
  }

  group.finish();
}

criterion_group!(benches, fan_out_benchmark);
criterion_main!(benches);
