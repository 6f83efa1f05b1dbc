//! Benchmark tests for tracksel-core operations
//!
//! Run with: cargo bench -p tracksel-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use tracksel_core::{
    AudioTrackCoordinator, CoordinatorConfig, Dialog, DialogPresenter, DialogRequest, Event,
    EventBus, EventKind, SimulatedPlayback, TrackLabelResolver,
};

// ============================================================================
// Helpers
// ============================================================================

struct SilentPresenter;

impl DialogPresenter for SilentPresenter {
    fn build_and_show(&self, request: &DialogRequest) -> Dialog {
        Dialog::from_request(request)
    }
}

fn create_coordinator(bus: &EventBus) -> AudioTrackCoordinator {
    let coordinator = AudioTrackCoordinator::new(
        bus.clone(),
        Arc::new(SimulatedPlayback::new(true)),
        Arc::new(SilentPresenter),
        CoordinatorConfig::default(),
    );
    bus.emit(&Event::AudioTracks {
        tracks: vec!["en-au".into(), "en".into(), "ja".into()],
        selected: Some("ja".into()),
    });
    coordinator
}

// ============================================================================
// Bus Benchmarks
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus_emit");

    for listeners in [1usize, 8, 64] {
        let bus = EventBus::new();
        for _ in 0..listeners {
            bus.on(EventKind::ConfigurationChanged, |event| {
                black_box(event);
            });
        }

        group.bench_with_input(BenchmarkId::from_parameter(listeners), &listeners, |b, _| {
            b.iter(|| bus.emit(black_box(&Event::ConfigurationChanged)))
        });
    }

    group.finish();
}

fn bench_once_register_and_fire(c: &mut Criterion) {
    let bus = EventBus::new();
    c.bench_function("bus_once_register_fire", |b| {
        b.iter(|| {
            bus.once(EventKind::DialogConfirmed, |_| {});
            bus.emit(&Event::DialogConfirmed)
        })
    });
}

// ============================================================================
// Resolver Benchmarks
// ============================================================================

fn bench_resolve_all(c: &mut Criterion) {
    let resolver = TrackLabelResolver::default();
    let codes = vec!["en-au".to_string(), "en".to_string(), "ja".to_string()];
    c.bench_function("resolver_resolve_all", |b| {
        b.iter(|| resolver.resolve_all(black_box(&codes)))
    });
}

// ============================================================================
// Coordinator Benchmarks
// ============================================================================

fn bench_launch_confirm_cycle(c: &mut Criterion) {
    let bus = EventBus::new();
    let coordinator = create_coordinator(&bus);

    c.bench_function("coordinator_launch_confirm", |b| {
        b.iter(|| {
            coordinator.launch().ok();
            bus.emit(&Event::DialogConfirmed)
        })
    });
}

fn bench_launch_rotation_cycle(c: &mut Criterion) {
    let bus = EventBus::new();
    let coordinator = create_coordinator(&bus);

    c.bench_function("coordinator_launch_rotation", |b| {
        b.iter(|| {
            coordinator.launch().ok();
            bus.emit(&Event::DialogSettings);
            bus.emit(&Event::ActivityResumed)
        })
    });
}

criterion_group!(bus_benches, bench_emit, bench_once_register_and_fire);

criterion_group!(resolver_benches, bench_resolve_all);

criterion_group!(
    coordinator_benches,
    bench_launch_confirm_cycle,
    bench_launch_rotation_cycle,
);

criterion_main!(bus_benches, resolver_benches, coordinator_benches);
