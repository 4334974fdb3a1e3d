//! # Evaluator Benchmarks
//!
//! Run with: `cargo bench -p grademaster-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use grademaster_core::{
    Grade, GradedUnit, QualificationType, UnitId, UnitKind, UnitTemplate, evaluate,
    merge_units_and_grades, points_for,
};
use std::collections::BTreeMap;
use std::hint::black_box;

/// Units cycling through sizes, kinds and grades.
fn create_units(size: usize) -> Vec<GradedUnit> {
    let sizes = [60, 90, 120, 45, 150];
    (0..size)
        .map(|i| {
            let kind = if i % 3 == 0 {
                UnitKind::External
            } else {
                UnitKind::Internal
            };
            let grade = Grade::ALL[i % Grade::ALL.len()];
            GradedUnit::anonymous(sizes[i % sizes.len()], kind, grade)
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_points(c: &mut Criterion) {
    c.bench_function("points_for_table", |b| {
        b.iter(|| points_for(black_box(120), black_box(UnitKind::External), black_box(Grade::M)));
    });
    c.bench_function("points_for_fallback", |b| {
        b.iter(|| points_for(black_box(75), black_box(UnitKind::Internal), black_box(Grade::D)));
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for size in [4, 18, 100].iter() {
        let units = create_units(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &units, |b, units| {
            b.iter(|| evaluate(black_box(units), QualificationType::ExtendedDiploma));
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let templates: Vec<UnitTemplate> = (0..18)
        .map(|i| UnitTemplate::new(UnitId::new(format!("unit-{i}")), "Unit", 60, UnitKind::Internal))
        .collect();
    let grades: BTreeMap<UnitId, Grade> = templates
        .iter()
        .step_by(2)
        .map(|t| (t.id.clone(), Grade::M))
        .collect();

    c.bench_function("merge_18_units", |b| {
        b.iter(|| merge_units_and_grades(black_box(&templates), black_box(&grades), None));
    });
}

criterion_group!(benches, bench_points, bench_evaluate, bench_merge);
criterion_main!(benches);
