use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use spreaders_core::{Network, VertexId};
use spreaders_sim::{SirConfig, simulate};

/// Ring lattice where every vertex links to its `k` successors.
fn ring_lattice(n: usize, k: usize) -> Network {
    let names: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
    let mut edges = Vec::with_capacity(n * k);
    for i in 0..n {
        for j in 1..=k {
            edges.push((names[i].as_str(), names[(i + j) % n].as_str()));
        }
    }
    Network::from_edges(false, &edges)
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("sir.simulate");
    let config = SirConfig {
        random_seed: Some(0x5EED),
        ..SirConfig::default()
    };

    for n in [100usize, 1_000, 5_000] {
        let net = ring_lattice(n, 3);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &net, |b, net| {
            b.iter(|| {
                let summary = simulate(net, vec![VertexId::new(0)], &config, 8).expect("simulate");
                black_box(summary.mean_spread)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
