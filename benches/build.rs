// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Plantscribe-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Plantscribe and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

mod fixtures;

// Benchmark identity (keep stable):
// - Group names in this file: `build.activity`, `build.sequence`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn benches_build(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("build.activity");

        for (case_id, case) in [
            ("small", fixtures::activity::Case::Small),
            ("long_flat", fixtures::activity::Case::LongFlat),
            ("nested_deep", fixtures::activity::Case::NestedDeep),
        ] {
            group.throughput(Throughput::Elements(case.calls()));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let diagram = fixtures::activity::build(black_box(case)).expect("build");
                    black_box(diagram.as_activity().map_or(0, |ast| ast.nodes().len()))
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("build.sequence");

        for (case_id, params) in [
            ("small", fixtures::sequence::Params::new(3, 12, 4)),
            ("many_participants", fixtures::sequence::Params::new(200, 1_000, 50)),
            ("long_conversation", fixtures::sequence::Params::new(8, 5_000, 25)),
        ] {
            group.throughput(Throughput::Elements(params.messages as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let diagram = fixtures::sequence::build(black_box(params)).expect("build");
                    black_box(diagram.as_sequence().map_or(0, |ast| ast.nodes().len()))
                })
            });
        }

        group.finish();
    }
}

criterion_group!(benches, benches_build);
criterion_main!(benches);
