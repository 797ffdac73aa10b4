//! Request/response codec throughput benchmarks.

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use ignite_core::hash::hash_code;
use ignite_core::protocol::{
    decode_response, encode_request, encode_response, Response, Schema, OP_CACHE_PUT,
};
use ignite_core::serialization::{decode_any, encode_any, BinaryObject, TypeDescriptor, Value};
use ignite_core::Record;

fn put_schema() -> Schema {
    Schema::empty()
        .with("hash_code", TypeDescriptor::Int)
        .with("flag", TypeDescriptor::Byte)
        .with("key", TypeDescriptor::Any)
        .with("value", TypeDescriptor::Any)
}

fn bench_hash_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_code");

    for len in [8usize, 64, 512] {
        let name: String = "cache".chars().cycle().take(len).collect();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("ascii", len), &name, |b, name| {
            b.iter(|| black_box(hash_code(name)))
        });
    }

    group.finish();
}

fn bench_any_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("any_values");

    let samples = [
        ("int", Value::Int(42)),
        ("string", Value::from("the quick brown fox")),
        ("array", Value::from((0..64).collect::<Vec<i32>>())),
        (
            "object",
            Value::Object(
                BinaryObject::new("Person")
                    .with_field("name", "Ann")
                    .with_field("age", 30)
                    .with_field("email", "ann@example.com"),
            ),
        ),
    ];

    for (name, value) in &samples {
        let encoded = encode_any(value).unwrap();
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", name), value, |b, value| {
            b.iter(|| black_box(encode_any(value).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, bytes| {
            b.iter(|| black_box(decode_any(bytes).unwrap()))
        });
    }

    group.finish();
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames");
    let schema = put_schema();

    for size in [16usize, 1024, 65536] {
        let values = [
            Value::Int(hash_code("bench")),
            Value::Byte(0),
            Value::from("key"),
            Value::Bytes(vec![0xAB; size]),
        ];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode_request", size), &values, |b, values| {
            b.iter(|| black_box(encode_request(OP_CACHE_PUT, Some(1), &schema, values).unwrap()))
        });

        let response_schema = Schema::empty().with("value", TypeDescriptor::Any);
        let response = Response::success(1, Record::new().with("value", Value::Bytes(vec![0xAB; size])));
        let bytes = encode_response(&response_schema, &response).unwrap();
        group.bench_with_input(BenchmarkId::new("decode_response", size), &bytes, |b, bytes| {
            b.iter(|| black_box(decode_response(&response_schema, bytes).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hash_code, bench_any_values, bench_frames);
criterion_main!(benches);
