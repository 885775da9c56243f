// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use waymark_canvas::HeadlessMap;
use waymark_events::time::ManualClock;
use waymark_events::{
    Dispatcher, DispatcherConfig, EventType, Feature, InteractiveGroup, LngLat, MapEvent,
    PointerInput,
};

// An n*n grid of 10px features split across `layers` layers, each its own source.
fn grid_map(n: usize, layers: usize) -> HeadlessMap {
    let mut map = HeadlessMap::new(12.0);
    for l in 0..layers {
        map.add_layer(format!("layer-{l}"), format!("source-{l}"));
    }
    for y in 0..n {
        for x in 0..n {
            let i = y * n + x;
            let x0 = x as f64 * 12.0;
            let y0 = y as f64 * 12.0;
            map.place(
                &format!("layer-{}", i % layers),
                Rect::new(x0, y0, x0 + 10.0, y0 + 10.0),
                Feature::new("", "", LngLat::default())
                    .with_id(i as i64)
                    .with_property("tags", "[\"a\",\"b\"]"),
            );
        }
    }
    map
}

fn dispatcher(n: usize, layers: usize) -> Dispatcher<HeadlessMap, ManualClock> {
    let d = Dispatcher::with_clock(
        grid_map(n, layers),
        ManualClock::new(),
        DispatcherConfig::default(),
    );
    for l in 0..layers {
        let group = if l % 2 == 0 {
            InteractiveGroup::vector_tile(format!("source-{l}"), [format!("layer-{l}")])
        } else {
            InteractiveGroup::application_managed(format!("source-{l}"), [format!("layer-{l}")])
        };
        let proxy = d.events(group);
        proxy.on(EventType::Hover, |e| {
            black_box(e.feature);
            Ok(())
        });
        proxy.on(EventType::Click, |e| {
            black_box(e.features.len());
            Ok(())
        });
    }
    d
}

fn sweep(n: usize) -> Vec<MapEvent> {
    (0..n * 12)
        .map(|i| {
            let p = Point::new(i as f64, (i / 3) as f64);
            MapEvent::MouseMove(PointerInput::new(p, LngLat::default()))
        })
        .collect()
}

fn bench_pointer_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_move");
    for &n in &[16usize, 64] {
        let events = sweep(n);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(format!("sweep_n{}", n), |b| {
            b.iter_batched(
                || dispatcher(n, 4),
                |mut d| {
                    for e in &events {
                        d.handle(e);
                    }
                    black_box(d.hovered().is_some());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("click");
    let clicks: Vec<MapEvent> = (0..64)
        .map(|i| {
            let p = Point::new(f64::from(i) * 12.0 + 5.0, 5.0);
            MapEvent::Click(PointerInput::new(p, LngLat::default()))
        })
        .collect();
    group.throughput(Throughput::Elements(clicks.len() as u64));
    group.bench_function("row_n64", |b| {
        b.iter_batched(
            || dispatcher(64, 2),
            |mut d| {
                for e in &clicks {
                    d.handle(e);
                }
                black_box(d.clicked().is_some());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_pointer_move, bench_click);
criterion_main!(benches);
