// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use marginalia_footnote::{Footnotes, NoopHost};
use marginalia_registry::Registry;

fn bench_register_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_churn");
    for &n in &[16_usize, 128, 1024] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("register_unregister/{n}"), |b| {
            b.iter(|| {
                let mut registry = Registry::new();
                let mut markers = Vec::with_capacity(n);
                for _ in 0..n {
                    markers.push(registry.register_marker());
                    registry.register_popup();
                }
                // Remove front-to-back: the worst case for index shifting.
                for marker in markers {
                    registry.unregister_marker(black_box(marker));
                }
                black_box(registry.open_index())
            });
        });
    }
    group.finish();
}

fn bench_notify_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify_fanout");
    for &subs in &[1_usize, 16, 256] {
        group.throughput(Throughput::Elements(subs as u64));
        group.bench_function(format!("set_open/{subs}"), |b| {
            let mut registry = Registry::new();
            for _ in 0..8 {
                registry.register_marker();
                registry.register_popup();
            }
            for _ in 0..subs {
                registry.subscribe(Box::new(|view| {
                    black_box(view.open());
                    Ok(())
                }));
            }
            let mut open = false;
            b.iter(|| {
                open = !open;
                registry.set_open_index(open.then_some(3));
            });
        });
    }
    group.finish();
}

fn bench_toggle_sync_pass(c: &mut Criterion) {
    c.bench_function("footnotes_toggle_sync/64", |b| {
        let mut footnotes = Footnotes::new(NoopHost::new());
        let markers: Vec<_> = (0..64).map(|_| footnotes.create_marker()).collect();
        for _ in 0..64 {
            footnotes.create_popup();
        }
        let mut i = 0_usize;
        b.iter(|| {
            footnotes.toggle(markers[i % markers.len()]);
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_register_churn,
    bench_notify_fanout,
    bench_toggle_sync_pass
);
criterion_main!(benches);
