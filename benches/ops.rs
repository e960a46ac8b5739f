// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Storemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Storemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use storemap::model::{EdgeId, MetadataValue, NodeId};
use storemap::ops::{apply_ops, ApplyContext, ApplyResult, EditOp, MetadataField};

mod fixtures;
mod tuning;

// Benchmark identity (keep stable):
// - Group name in this file: `ops.apply`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn checksum_apply_result(result: &ApplyResult) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(result.applied as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.updated.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.removed.len() as u64);
    acc
}

fn connect_ops(nodes: &[NodeId], count: usize) -> Vec<EditOp> {
    assert!(nodes.len() >= 2, "fixture must contain >= 2 nodes");

    (0..count)
        .map(|idx| {
            let from_index = idx.wrapping_mul(7) % nodes.len();
            let mut to_index = idx.wrapping_mul(7).wrapping_add(3) % nodes.len();
            if to_index == from_index {
                to_index = (to_index + 1) % nodes.len();
            }
            EditOp::Connect {
                edge_id: EdgeId::new(format!("bench_edge_{idx:06}")).expect("edge id"),
                source: nodes[from_index].clone(),
                target: nodes[to_index].clone(),
            }
        })
        .collect()
}

fn area_ops(nodes: &[NodeId], count: usize) -> Vec<EditOp> {
    (0..count)
        .map(|idx| EditOp::UpdateMetadata {
            node_id: nodes[idx % nodes.len()].clone(),
            field: MetadataField::Area,
            value: MetadataValue::Number(40_000.0 + idx as f64 * 100.0),
        })
        .collect()
}

fn benches_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("ops.apply");
    let ctx = ApplyContext::default();

    let template = fixtures::store_grid(fixtures::Case::Medium);
    let nodes = template
        .nodes()
        .iter()
        .map(|node| node.node_id().clone())
        .collect::<Vec<_>>();

    let cases = [
        ("connect_single", connect_ops(&nodes, 1)),
        ("connect_batch_200", connect_ops(&nodes, 200)),
        ("area_batch_200", area_ops(&nodes, 200)),
        (
            "remove_node_cascade",
            vec![EditOp::RemoveNode {
                node_id: fixtures::node_id(nodes.len() / 2),
            }],
        ),
    ];

    for (case_id, ops) in cases {
        group.throughput(Throughput::Elements(ops.len() as u64));
        group.bench_function(case_id, {
            let template = template.clone();
            move |b| {
                b.iter_batched(
                    || template.clone(),
                    |mut document| {
                        let result =
                            apply_ops(&mut document, black_box(&ops), &ctx).expect("apply_ops");
                        black_box(checksum_apply_result(&result))
                    },
                    BatchSize::SmallInput,
                )
            }
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = tuning::criterion();
    targets = benches_ops
}
criterion_main!(benches);
