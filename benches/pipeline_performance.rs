use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qualigraph::alignment::align_telemetry;
use qualigraph::ranking::extract_ranking;
use qualigraph::session::{DriverResult, Lap, RawSample, SessionHandle};
use std::time::Duration;

fn create_sample_session(drivers: usize, samples_per_lap: usize) -> SessionHandle {
    let results: Vec<DriverResult> = (0..drivers)
        .map(|i| DriverResult {
            abbreviation: format!("D{i:02}"),
            team_color: "3671C6".to_string(),
            q1: Some(Some(81.0)),
            q2: Some(Some(80.0)),
            q3: Some(Some(78.0 + (i as f64 * 7.3) % 2.0)),
        })
        .collect();

    let laps = results
        .iter()
        .map(|r| Lap {
            driver: r.abbreviation.clone(),
            lap_number: 5,
            lap_time_s: r.q3.flatten(),
            samples: (0..samples_per_lap)
                .map(|i| {
                    let t = i as f64 * 0.1;
                    RawSample {
                        session_time_s: t,
                        world_position_x: t * 55.0,
                        world_position_y: (t * 0.3).sin() * 10.0,
                        speed_kmh: 200.0 + (t * 0.7).sin() * 60.0,
                        throttle: 0.5 + (t * 0.7).sin() * 0.5,
                        brake: 0.0,
                    }
                })
                .collect(),
        })
        .collect();

    SessionHandle {
        location: "Monza".to_string(),
        year: 2024,
        results,
        laps,
    }
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    let session = create_sample_session(20, 0);

    group.bench_function("extract_ranking_top10", |b| {
        b.iter(|| black_box(extract_ranking(black_box(&session.results), 10).unwrap()));
    });

    group.finish();
}

fn bench_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("alignment");

    let small = create_sample_session(20, 100);
    group.bench_function("align_telemetry_100_samples", |b| {
        b.iter(|| black_box(align_telemetry(black_box(&small.results), 3, &small).unwrap()));
    });

    let large = create_sample_session(20, 5000);
    group.bench_function("align_telemetry_5000_samples", |b| {
        b.iter(|| black_box(align_telemetry(black_box(&large.results), 3, &large).unwrap()));
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let session = create_sample_session(20, 500);

    group.bench_function("serialize_session", |b| {
        b.iter(|| black_box(serde_json::to_string(&session).unwrap()));
    });

    let json = serde_json::to_string(&session).unwrap();
    group.bench_function("deserialize_session", |b| {
        b.iter(|| black_box(serde_json::from_str::<SessionHandle>(&json).unwrap()));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_ranking, bench_alignment, bench_serialization
}
criterion_main!(benches);
