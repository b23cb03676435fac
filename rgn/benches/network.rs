//! Benchmarks pour la validation du réseau et les requêtes par rayon

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rgn::{Order, Poi, Vertex, VertexCollection};

/// Grille régulière de VGs autour de Lisboa, ordres répartis en alternance
fn grid(size: usize) -> VertexCollection {
    let mut vgs = VertexCollection::new();
    for i in 0..size {
        for j in 0..size {
            let order = Order::ALL[(i + j) % Order::ALL.len()];
            let lat = 37.0 + i as f64 * 0.1;
            let lon = -9.5 + j as f64 * 0.1;
            let altitude = ((i * 37 + j * 11) % 900) as f64;
            vgs.add_vertex(Vertex::new(
                Poi::new(format!("VG-{}-{}", i, j), lat, lon),
                order,
                Some(altitude),
                "Marco",
            ));
        }
    }
    for order in Order::ALL {
        vgs.show_order(order);
    }
    vgs
}

fn bench_verify_network(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_network");

    for size in [10, 30, 50] {
        let vgs = grid(size);
        group.throughput(Throughput::Elements(vgs.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(vgs.len()), &vgs, |b, vgs| {
            b.iter(|| black_box(vgs.verify_network().len()))
        });
    }

    group.finish();
}

fn bench_count_within_distance(c: &mut Criterion) {
    let vgs = grid(50);

    let mut group = c.benchmark_group("count_within_distance");
    group.throughput(Throughput::Elements(vgs.len() as u64));

    for radius in [10.0, 60.0, 500.0] {
        group.bench_with_input(
            BenchmarkId::from_parameter(radius),
            &radius,
            |b, &radius| b.iter(|| black_box(vgs.count_within_distance(38.7, -9.1, radius))),
        );
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let vgs = grid(50);
    c.bench_function("compute_statistics", |b| {
        b.iter(|| black_box(vgs.compute_statistics()))
    });
}

criterion_group!(
    benches,
    bench_verify_network,
    bench_count_within_distance,
    bench_statistics
);
criterion_main!(benches);
