//! Benchmark for descriptor rewriting.
//!
//! Every `/api/model` request for a `.gltf` parses and re-serializes the
//! whole descriptor, so this is the per-request cost of text models.
//!
//! Run with: cargo bench --package modelshow_assets --bench rewrite_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use modelshow_assets::ReferenceRewriter;
use serde_json::json;

fn create_descriptor(buffers: usize, meshes: usize) -> String {
    let buffers: Vec<_> = (0..buffers)
        .map(|i| json!({"byteLength": 1024 * (i + 1), "uri": format!("gltf_buffer_{i}.bin")}))
        .collect();
    let meshes: Vec<_> = (0..meshes)
        .map(|i| {
            json!({
                "name": format!("layer_{i}"),
                "primitives": [{"attributes": {"POSITION": i, "NORMAL": i + 1}, "indices": i + 2}]
            })
        })
        .collect();
    json!({
        "asset": {"version": "2.0", "generator": "bench"},
        "buffers": buffers,
        "meshes": meshes,
        "extras": {"origin": [512_000.25, 3_400_000.5, 12.0]}
    })
    .to_string()
}

fn benchmark_rewrite(c: &mut Criterion) {
    let rewriter = ReferenceRewriter::new("model_gltf");
    let mut group = c.benchmark_group("rewrite");

    for (buffers, meshes) in [(1, 10), (16, 200), (64, 2000)] {
        let text = create_descriptor(buffers, meshes);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("{buffers}_buffers_{meshes}_meshes"), |b| {
            b.iter(|| rewriter.rewrite(black_box(&text)));
        });
    }

    group.finish();
}

fn benchmark_rewrite_already_rooted(c: &mut Criterion) {
    let rewriter = ReferenceRewriter::new("model_gltf");
    let rooted = rewriter
        .rewrite(&create_descriptor(16, 200))
        .map(|r| r.text)
        .unwrap_or_default();

    c.bench_function("rewrite_idempotent_pass", |b| {
        b.iter(|| rewriter.rewrite(black_box(&rooted)));
    });
}

criterion_group!(benches, benchmark_rewrite, benchmark_rewrite_already_rooted);
criterion_main!(benches);
