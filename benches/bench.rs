use criterion::{Criterion, criterion_group, criterion_main};
use queens_sat::queens::board::{
    Board, EXAMPLE_EIGHT, EXAMPLE_FIVE, EXAMPLE_SIX, board_from_regions,
};
use queens_sat::queens::solver::QueensSolver;
use queens_sat::sat::formula::Formula;
use queens_sat::sat::variable_selection::VariableSelectionType;
use std::hint::black_box;
use std::time::Duration;

/// Random 3-SAT with a planted model, so every instance is satisfiable.
fn planted_3sat(vars: usize, clauses: usize, seed: u64) -> Formula {
    let mut rng = fastrand::Rng::with_seed(seed);
    let model: Vec<bool> = (0..vars).map(|_| rng.bool()).collect();
    let raw: Vec<Vec<(String, bool)>> = (0..clauses)
        .map(|_| {
            let mut picked: Vec<(usize, bool)> = Vec::with_capacity(3);
            while picked.len() < 3 {
                let var = rng.usize(..vars);
                if picked.iter().all(|&(v, _)| v != var) {
                    picked.push((var, rng.bool()));
                }
            }
            if picked.iter().all(|&(v, value)| model[v] != value) {
                picked[0].1 = model[picked[0].0];
            }
            picked
                .into_iter()
                .map(|(v, value)| (v.to_string(), value))
                .collect()
        })
        .collect();
    Formula::build(raw).unwrap()
}

fn boards() -> Vec<(&'static str, Board)> {
    vec![
        ("five", board_from_regions(&EXAMPLE_FIVE).unwrap()),
        ("six", board_from_regions(&EXAMPLE_SIX).unwrap()),
        ("eight", board_from_regions(&EXAMPLE_EIGHT).unwrap()),
    ]
}

fn bench_queens(c: &mut Criterion) {
    let solver = QueensSolver::default();

    let mut group = c.benchmark_group("queens - region order");
    for (name, board) in boards() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(solver.solve(&board).unwrap()));
        });
    }
    group.finish();

    let board = board_from_regions(&EXAMPLE_EIGHT).unwrap();
    let formula = solver.to_formula(&board).unwrap();

    let mut group = c.benchmark_group("queens eight - heuristic");
    group.measurement_time(Duration::from_secs(10));
    for heuristic in [
        VariableSelectionType::Least,
        VariableSelectionType::Most,
        VariableSelectionType::Fixed,
        VariableSelectionType::Random,
    ] {
        let formula = formula.clone().with_shared_selector(heuristic.to_impl(42));
        group.bench_function(heuristic.to_string(), |b| {
            b.iter(|| black_box(formula.solve().unwrap()));
        });
    }
    group.finish();

    c.bench_function("queens eight - encode", |b| {
        b.iter(|| black_box(solver.to_formula(&board).unwrap()));
    });
}

fn bench_3sat(c: &mut Criterion) {
    let formulas: Vec<Formula> = (0..20).map(|seed| planted_3sat(50, 200, seed)).collect();

    let mut group = c.benchmark_group("planted 3sat - heuristic");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(20));
    for heuristic in [VariableSelectionType::Least, VariableSelectionType::Most] {
        let formulas: Vec<Formula> = formulas
            .iter()
            .map(|f| f.clone().with_shared_selector(heuristic.to_impl(0)))
            .collect();
        group.bench_function(heuristic.to_string(), |b| {
            b.iter(|| {
                for formula in &formulas {
                    black_box(formula.solve().unwrap());
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queens, bench_3sat);

criterion_main!(benches);
