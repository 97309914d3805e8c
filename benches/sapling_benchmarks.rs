use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sapling::node::SplitRule;
use sapling::splitter::{ScaffoldSplitter, Splitter};
use sapling::tree::Tree;
use sapling::visitor::LeafCounter;
use sapling::TreeBuilder;

fn deep_splitter(depth: usize) -> ScaffoldSplitter {
    let rules = (0..depth)
        .map(|i| SplitRule::new(format!("column_{}", i), i as f64))
        .collect();
    ScaffoldSplitter::new(rules)
}

pub fn tree_benchmarks(c: &mut Criterion) {
    let dataset: Vec<u32> = (0..64).collect();
    let splitter = deep_splitter(500);

    c.bench_function("scaffold split", |b| {
        b.iter(|| splitter.split(black_box(dataset.as_slice())).unwrap())
    });

    c.bench_function("build lifecycle", |b| {
        b.iter(|| {
            let mut builder = TreeBuilder::new(black_box(dataset.clone())).set_splitter(deep_splitter(50));
            builder.start_split().unwrap();
            builder.start_prune().unwrap();
            builder.finish().unwrap()
        })
    });

    let tree: Tree<u32> = splitter.split(dataset.as_slice()).unwrap();
    c.bench_function("depth first walk", |b| b.iter(|| black_box(&tree).dfs().count()));
    c.bench_function("breadth first walk", |b| b.iter(|| black_box(&tree).bfs().count()));
    c.bench_function("count leaves", |b| {
        b.iter(|| {
            let mut counter = LeafCounter::new();
            black_box(&tree).accept(&mut counter);
            counter.leaf_count()
        })
    });
}

criterion_group!(benches, tree_benchmarks);
criterion_main!(benches);
