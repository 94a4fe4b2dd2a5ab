// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Benchmarks for label classification and matrix aggregation.

use bugstat_core::{Aggregator, Classifier, Issue, Priority, Status};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const PRIORITIES: [&str; 7] = ["Blocker", "High", "U2 Normal", "minor", "Lowest", "P9", "MEDIUM"];
const STATUSES: [&str; 6] = ["Open", "In Progress", "to-do", "Resolved", "Done", "Triage"];

fn issues(count: usize) -> Vec<Issue> {
    (0..count)
        .map(|i| {
            Issue::new(format!("BUG-{i}"))
                .with_priority(PRIORITIES[i % PRIORITIES.len()])
                .with_status(STATUSES[i % STATUSES.len()])
        })
        .collect()
}

fn classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let classifier = Classifier::new().with_priority_alias("P9", Priority::Trivial);

    let labels = [("builtin", "U1 Urgent"), ("alias", "P9"), ("unknown", "whatever")];
    for (name, label) in labels {
        group.bench_with_input(BenchmarkId::new("priority_of", name), label, |b, l| {
            b.iter(|| classifier.priority_of(Some(l)))
        });
    }
    group.bench_function("status_of_builtin", |b| {
        b.iter(|| classifier.status_of(Some("In Progress")))
    });
    group.bench_function("status_of_alias", |b| {
        let classifier = Classifier::new().with_status_alias("Verified", Status::Closed);
        b.iter(|| classifier.status_of(Some("Verified")))
    });
    group.finish();
}

fn aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let aggregator = Aggregator::new(Classifier::new());

    for count in [100, 1_000, 10_000] {
        let batch = issues(count);
        group.bench_with_input(BenchmarkId::new("aggregate", count), &batch, |b, batch| {
            b.iter(|| aggregator.aggregate(batch))
        });
    }
    group.finish();
}

criterion_group!(benches, classification, aggregation);
criterion_main!(benches);
