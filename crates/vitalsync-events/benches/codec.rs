//! Codec benchmarks for vitalsync-events.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;
use vitalsync_events::{envelope, ActivityKind, ActivityRecord, ClientEvent, Envelope};

fn bench_encode_activity(c: &mut Criterion) {
    let record = ActivityRecord::new(ActivityKind::View)
        .with_content_id(42)
        .with_metadata("duration", 0)
        .with_metadata("element", "article");
    let env = ClientEvent::track_activity(record).into_envelope().unwrap();
    let size = envelope::encode(&env).unwrap().len() as u64;

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(size));
    group.bench_function("track_activity", |b| {
        b.iter(|| envelope::encode(black_box(&env)))
    });
    group.finish();
}

fn bench_decode_update(c: &mut Criterion) {
    let env = Envelope::new(
        "recommendations_update",
        json!({
            "ai_recommendations": [
                {"title": "Sleep earlier", "description": "Aim for 8 hours", "category": "lifestyle", "priority": "high", "confidence": 0.9}
            ],
            "content_recommendations": [
                {"id": 3, "title": "Beginner yoga", "category": "fitness", "content_type": "video", "description": "A short routine", "difficulty_level": "beginner", "duration": 20}
            ],
            "timestamp": "2024-05-01T12:00:00.000Z"
        }),
    );
    let encoded = envelope::encode(&env).unwrap();

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("recommendations_update", |b| {
        b.iter(|| envelope::decode(black_box(&encoded)))
    });
    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let env = Envelope::new("search_suggestions", json!({ "query": "sleep hygiene" }));

    c.bench_function("roundtrip_suggestions", |b| {
        b.iter(|| {
            let encoded = envelope::encode(black_box(&env)).unwrap();
            envelope::decode(black_box(&encoded)).unwrap()
        })
    });
}

criterion_group!(benches, bench_encode_activity, bench_decode_update, bench_roundtrip);
criterion_main!(benches);
