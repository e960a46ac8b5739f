// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use storemap::history::HistoryStack;
use storemap::model::GraphDocument;

mod fixtures;
mod tuning;

// Benchmark identity (keep stable):
// - Group names in this file: `history.snapshot`, `history.step`
fn filled_history(template: &GraphDocument, entries: usize) -> HistoryStack<GraphDocument> {
    let mut history = HistoryStack::with_capacity(entries);
    for _ in 0..entries {
        history.push(template.clone());
    }
    history
}

fn benches_history(c: &mut Criterion) {
    let cases = [
        ("small", fixtures::store_grid(fixtures::Case::Small)),
        ("medium", fixtures::store_grid(fixtures::Case::Medium)),
        ("large_dense", fixtures::store_grid(fixtures::Case::LargeDense)),
    ];

    let mut snapshot = c.benchmark_group("history.snapshot");
    for (case_id, template) in &cases {
        snapshot.bench_function(*case_id, |b| {
            let mut history = HistoryStack::default();
            b.iter(|| history.push(black_box(template.clone())))
        });
    }
    snapshot.finish();

    let mut step = c.benchmark_group("history.step");
    for (case_id, template) in &cases {
        step.bench_function(*case_id, |b| {
            b.iter_batched(
                || (filled_history(template, 50), template.clone()),
                |(mut history, mut live)| {
                    while history.undo(&mut live) {}
                    while history.redo(&mut live) {}
                    black_box(live.nodes().len())
                },
                BatchSize::LargeInput,
            )
        });
    }
    step.finish();
}

criterion_group! {
    name = benches;
    config = tuning::criterion();
    targets = benches_history
}
criterion_main!(benches);
