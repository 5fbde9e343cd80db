use criterion::{
  black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
  Throughput,
};
use shingle_lsh::{
  build_signatures, extract_candidates, HashFamily, LshBander, LshConfig,
  NearDuplicateFinder,
};

fn generate_documents(count: usize) -> Vec<String> {
  (0..count)
    .map(|i| {
      format!(
        "Document number {} talks about topic {} with enough shared wording to make banding interesting",
        i,
        i % 10
      )
    })
    .collect()
}

fn bench_signatures(c: &mut Criterion) {
  let mut group = c.benchmark_group("signatures");
  let config = LshConfig::default().with_seed(42).with_shingle_size(5);
  let finder = NearDuplicateFinder::new(config.clone()).unwrap();

  for count in [100_usize, 1_000] {
    let docs = generate_documents(count);
    let sets = finder.fingerprint_documents(&docs).unwrap();
    group.throughput(Throughput::Elements(count as u64));
    group.bench_with_input(BenchmarkId::new("build", count), &sets, |b, sets| {
      let family = HashFamily::with_seed(
        config.num_hash_functions,
        config.hash_domain,
        42,
      )
      .unwrap();
      b.iter(|| build_signatures(black_box(sets), &family).unwrap());
    });
  }

  group.finish();
}

fn bench_lsh(c: &mut Criterion) {
  let mut group = c.benchmark_group("lsh");
  let config = LshConfig::default().with_seed(7).with_shingle_size(5);
  let finder = NearDuplicateFinder::new(config).unwrap();
  let docs = generate_documents(1_000);
  let sets = finder.fingerprint_documents(&docs).unwrap();
  let matrix = finder.signatures(&sets).unwrap();
  let bander = LshBander::from_config(finder.config()).unwrap();

  group.bench_function("band_1000", |b| {
    b.iter(|| bander.band(black_box(&matrix)).unwrap());
  });

  let buckets = bander.band(&matrix).unwrap();
  group.bench_function("extract_1000", |b| {
    b.iter(|| extract_candidates(black_box(&buckets)));
  });

  group.bench_function("find_1000", |b| {
    b.iter(|| finder.find(black_box(&docs)).unwrap());
  });

  group.finish();
}

criterion_group!(benches, bench_signatures, bench_lsh);
criterion_main!(benches);
