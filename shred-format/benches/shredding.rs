use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shred_format::{parse_contexts, parse_unstruct, SchemaKey};
use shred_test_utils::TestDataGenerator;

fn bench_contexts(c: &mut Criterion) {
    let mut group = c.benchmark_group("contexts");

    for schemas in [1, 10, 100] {
        for count in [10, 1000] {
            let text = TestDataGenerator::large_contexts(count, schemas).to_string();

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}ctx_{}schemas", count, schemas)),
                &text,
                |b, text| {
                    b.iter(|| black_box(parse_contexts(black_box(text)).unwrap()));
                },
            );
        }
    }

    group.finish();
}

fn bench_unstruct(c: &mut Criterion) {
    let text = TestDataGenerator::social_interaction().to_string();
    c.bench_function("unstruct_social_interaction", |b| {
        b.iter(|| black_box(parse_unstruct(black_box(&text)).unwrap()));
    });
}

fn bench_schema_key(c: &mut Criterion) {
    let uri = "iglu:com.snowplowanalytics.snowplow/social_interaction/jsonschema/1-0-0";
    c.bench_function("schema_key_field_fragment", |b| {
        b.iter(|| black_box(SchemaKey::parse(black_box(uri)).unwrap().field_fragment()));
    });
}

criterion_group!(benches, bench_contexts, bench_unstruct, bench_schema_key);
criterion_main!(benches);
