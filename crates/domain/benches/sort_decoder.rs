#![allow(clippy::cast_possible_truncation)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use domain::audit::entity::{AuditCommand, AuditEvent, AuditStatus};
use domain::common::sort::{decode_page_request, decode_sort_spec};

fn make_event(i: u64) -> AuditEvent {
    let action = match i % 3 {
        0 => "CREATE_CUSTOMER",
        1 => "UPDATE_CUSTOMER",
        _ => "DELETE_CUSTOMER",
    };
    AuditEvent::from_command(
        AuditCommand::new(action, AuditStatus::Success)
            .with_entity_id(Some(i))
            .at(1_000_000_000 + (i * 7919) % 100_000),
    )
    .with_id(i + 1)
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_decode");

    let single = r#"[{"field":"timestamp","direction":"DESC"}]"#;
    let multi = r#"[{"field":"type","direction":"asc"},{"field":"timestamp","direction":"desc"},{"field":"id"}]"#;

    group.bench_function("single_key", |b| {
        b.iter(|| decode_sort_spec::<AuditEvent>(black_box(Some(single))));
    });
    group.bench_function("three_keys", |b| {
        b.iter(|| decode_sort_spec::<AuditEvent>(black_box(Some(multi))));
    });
    group.bench_function("malformed", |b| {
        b.iter(|| decode_sort_spec::<AuditEvent>(black_box(Some("{not an array"))));
    });

    group.finish();
}

fn bench_apply_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_apply");
    let raw = r#"[{"field":"type","direction":"asc"},{"field":"timestamp","direction":"desc"}]"#;

    for &n in &[100u64, 1_000, 10_000] {
        let events: Vec<AuditEvent> = (0..n).map(make_event).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || events.clone(),
                |events| {
                    let req = decode_page_request::<AuditEvent>(Some(raw), 3, 100).unwrap();
                    black_box(req.apply(events));
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_apply_page);
criterion_main!(benches);
