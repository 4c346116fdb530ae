//! Integration tests for tree-level DLC boundary projection.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from validated generators and root
//!   distributions, through boundary estimation and the DLC check at `tau`,
//!   to chainsaw scanning and serialized records.
//! - Exercise the default estimator on generators whose behavior is known in
//!   closed form (first crossing, decaying margins), and a pinned-`tau`
//!   estimator where exact intervals are asserted.
//!
//! Coverage
//! --------
//! - `projection::tree::TreeProjector::project` (sequential and rayon).
//! - `projection::edge::EdgeProjector` with `MinColDeltaEstimator` and a
//!   custom `BoundaryEstimator`.
//! - `EdgeProjection` serialization.
//!
//! Exclusions
//! ----------
//! - Fine-grained checks of the Markov primitives and option validation;
//!   these are covered by unit tests.
use approx::assert_abs_diff_eq;
use ndarray::Array2;
use rust_phylo_limits::{
    markov::{Generator, ModelKind, StateDistribution, col_delta},
    projection::{
        BoundaryEstimator, EdgeProjector, MinColDeltaFit, ProjectionError, ProjectionOptions,
        ProjectionReport, ProjectionResult, ScanOptions, TreeProjector,
    },
};
use std::collections::HashMap;

/// Rate-`rate` cycle `0 → 1 → 2 → 3 → 0`; every exit rate equals `rate`.
fn cyclic(rate: f64) -> Generator {
    Generator::new(Array2::from_shape_fn((4, 4), |(i, j)| {
        if i == j {
            -rate
        } else if j == (i + 1) % 4 {
            rate
        } else {
            0.0
        }
    }))
    .expect("cyclic generator is valid")
}

/// Jukes–Cantor with overall rate `mu`.
fn jukes_cantor(mu: f64) -> Generator {
    Generator::new(Array2::from_shape_fn((4, 4), |(i, j)| if i == j { -mu } else { mu / 3.0 }))
        .expect("JC generator is valid")
}

fn zero() -> Generator {
    Generator::new(Array2::zeros((4, 4))).expect("zero generator is valid")
}

/// Estimator pinned to a fixed `tau`.
struct FixedTau(f64);

impl BoundaryEstimator for FixedTau {
    fn fit(&self, q: &Generator) -> ProjectionResult<MinColDeltaFit> {
        let fitted_q = q.rebalanced();
        let delta = col_delta(&fitted_q.transition_matrix(self.0)?);
        Ok(MinColDeltaFit { tau: self.0, delta, fitted_q, bracket: None, outcome: None })
    }
}

/// Tree inputs where every edge hangs off `"root"` with a uniform root
/// distribution, the calibrated generator doubles as the uncalibrated one,
/// and every branch has length `length`.
struct Fixture {
    edges: Vec<(String, Generator)>,
    roots: HashMap<String, StateDistribution>,
    tree: HashMap<String, String>,
    uncalibrated: HashMap<String, Generator>,
    lengths: HashMap<String, f64>,
}

impl Fixture {
    fn star(edges: Vec<(&str, Generator)>, length: f64) -> Self {
        let edges: Vec<(String, Generator)> =
            edges.into_iter().map(|(n, q)| (n.to_string(), q)).collect();
        Self {
            roots: HashMap::from([("root".to_string(), StateDistribution::uniform(4))]),
            tree: edges.iter().map(|(n, _)| (n.clone(), "root".to_string())).collect(),
            uncalibrated: edges.iter().map(|(n, q)| (n.clone(), q.clone())).collect(),
            lengths: edges.iter().map(|(n, _)| (n.clone(), length)).collect(),
            edges,
        }
    }

    fn run<E: BoundaryEstimator>(
        &self, projector: &TreeProjector<E>, kind: ModelKind,
    ) -> ProjectionReport {
        projector.project(
            &self.edges,
            &self.roots,
            &self.tree,
            kind,
            &self.uncalibrated,
            &self.lengths,
        )
    }
}

fn scan_to(upper: f64) -> ProjectionOptions {
    ProjectionOptions {
        scan: ScanOptions::new(upper, 0.1, 100_000).expect("valid scan options"),
        ..Default::default()
    }
}

#[test]
// Purpose
// -------
// Generators that never violate DLC produce no records with the real
// estimator.
//
// Given
// -----
// - A zero generator (`P(t) = I`) and Jukes–Cantor (`col_delta = e^{-4t/3} > 0`).
//
// Expect
// ------
// - No records and no failures; Jukes–Cantor also under a recovered limit.
fn non_violating_generators_yield_no_records() {
    let both = Fixture::star(vec![("zero", zero()), ("jc", jukes_cantor(1.0))], 1.0);
    let jc_only = Fixture::star(vec![("jc", jukes_cantor(1.0))], 1.0);
    let projector = TreeProjector::from_options(scan_to(20.0));

    let stationary = both.run(&projector, ModelKind::Stationary);
    let recovered = jc_only.run(&projector, ModelKind::from_model_name("GN"));

    for report in [stationary, recovered] {
        assert!(report.records.is_empty(), "records: {:?}", report.records);
        assert!(report.is_clean(), "failures: {:?}", report.failures);
    }
}

#[test]
// Purpose
// -------
// The default estimator records an oscillating generator at its first
// crossing.
//
// Given
// -----
// - The rate-1 cyclic generator (first crossing `t ≈ 1.0384156`), branch
//   length `1`, scanned to `upper = 20`.
//
// Expect
// ------
// - Exactly one record and no failures; `tau` at the first crossing,
//   `ENS = tau` (unit exit rates), and disjoint, ascending chainsaws starting
//   at `tau` inside `[0, 20]`.
fn cyclic_generator_is_recorded_at_first_crossing() {
    let fixture = Fixture::star(vec![("cyc", cyclic(1.0))], 1.0);
    let projector = TreeProjector::from_options(scan_to(20.0));

    let report = fixture.run(&projector, ModelKind::Stationary);

    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_abs_diff_eq!(record.tau, 1.0384156, epsilon = 1e-6);
    assert_abs_diff_eq!(record.ens, record.tau, epsilon = 1e-8);
    assert!(record.delta_col.abs() <= 1e-6);
    assert!(!record.chainsaws.is_empty());
    assert_abs_diff_eq!(record.chainsaws[0].ens_start, record.tau, epsilon = 1e-8);
    for c in &record.chainsaws {
        assert!(c.ens_start <= c.ens_end);
        assert!(c.ens_end <= 20.0 + 1e-8);
    }
    for pair in record.chainsaws.windows(2) {
        assert!(pair[0].ens_end < pair[1].ens_start);
    }
}

#[test]
// Purpose
// -------
// A root distribution with an empty state turns a decaying margin into a
// record whose last chainsaw closes at the scan's upper bound.
//
// Given
// -----
// - Jukes–Cantor (`col_delta` positive but decaying), root `[0.5, 0.5, 0, 0]`,
//   branch length `1`, scanned to `upper = 40`.
//
// Expect
// ------
// - One record; its last chainsaw ends at `ENS(40) = 40`.
fn empty_root_state_closes_last_chainsaw_at_upper() {
    let mut fixture = Fixture::star(vec![("jc", jukes_cantor(1.0))], 1.0);
    let root = StateDistribution::new(ndarray::array![0.5, 0.5, 0.0, 0.0]).expect("valid root");
    fixture.roots.insert("root".to_string(), root);
    let projector = TreeProjector::from_options(scan_to(40.0));

    let report = fixture.run(&projector, ModelKind::Stationary);

    assert!(report.is_clean(), "failures: {:?}", report.failures);
    assert_eq!(report.records.len(), 1);
    let last = report.records[0].chainsaws.last().expect("at least one chainsaw");
    assert_abs_diff_eq!(last.ens_end, 40.0, epsilon = 1e-8);
}

#[test]
// Purpose
// -------
// Identical edges give identical records and repeated runs are idempotent.
//
// Given
// -----
// - Two cyclic edges `x` and `y`, `tau` pinned at `1.5`, branch length `2`,
//   scan to `10`.
//
// Expect
// ------
// - Two records with equal `tau`, ENS, `delta_col` and chainsaws
//   `[3.0, 5.4]`, `[7.1, 10.0]`; a second run returns the same report.
fn identical_edges_give_identical_records() {
    let fixture = Fixture::star(vec![("x", cyclic(1.0)), ("y", cyclic(1.0))], 2.0);
    let projector = TreeProjector::new(EdgeProjector::new(FixedTau(1.5), scan_to(10.0)));

    let first = fixture.run(&projector, ModelKind::Stationary);
    let second = fixture.run(&projector, ModelKind::Stationary);

    assert_eq!(first, second);
    assert_eq!(first.records.len(), 2);
    let (x, y) = (&first.records[0], &first.records[1]);
    assert_eq!((x.edge_name.as_str(), y.edge_name.as_str()), ("x", "y"));
    assert_eq!((x.tau, x.ens, x.delta_col), (y.tau, y.ens, y.delta_col));
    assert_eq!(x.chainsaws, y.chainsaws);
    let bounds: Vec<[f64; 2]> = x.chainsaws.iter().map(|&c| c.into()).collect();
    for (got, want) in bounds.iter().zip([[3.0, 5.4], [7.1, 10.0]]) {
        assert_abs_diff_eq!(got[0], want[0], epsilon = 1e-9);
        assert_abs_diff_eq!(got[1], want[1], epsilon = 1e-9);
    }
}

#[test]
// Purpose
// -------
// Sequential and rayon drivers agree with the real estimator.
//
// Given
// -----
// - Zero, Jukes–Cantor and two cyclic edges, plus one edge without a parent.
//
// Expect
// ------
// - Equal reports; the orphan edge is the only failure.
fn parallel_driver_matches_sequential() {
    let mut fixture = Fixture::star(
        vec![
            ("zero", zero()),
            ("jc", jukes_cantor(0.5)),
            ("cyc1", cyclic(1.0)),
            ("orphan", cyclic(1.0)),
            ("cyc2", cyclic(2.0)),
        ],
        0.5,
    );
    fixture.tree.remove("orphan");
    let sequential = TreeProjector::from_options(scan_to(15.0));
    let parallel =
        TreeProjector::from_options(ProjectionOptions { parallel: true, ..scan_to(15.0) });

    let seq_report = fixture.run(&sequential, ModelKind::Stationary);
    let par_report = fixture.run(&parallel, ModelKind::Stationary);

    assert_eq!(seq_report, par_report);
    assert_eq!(seq_report.failures.len(), 1);
    assert_eq!(seq_report.failures[0].edge_name, "orphan");
    assert!(matches!(seq_report.failures[0].error, ProjectionError::MissingParent { .. }));
}

#[test]
// Purpose
// -------
// Records serialize to the documented JSON shape.
//
// Given
// -----
// - One cyclic edge with `tau` pinned at `1.5`, branch length `2`.
//
// Expect
// ------
// - An object with `edge_name`, `tau`, `ENS`, `delta_col`, and `chainsaws`
//   as a list of two-element arrays.
fn records_serialize_to_documented_shape() {
    let fixture = Fixture::star(vec![("leaf", cyclic(1.0))], 2.0);
    let projector = TreeProjector::new(EdgeProjector::new(FixedTau(1.5), scan_to(10.0)));

    let report = fixture.run(&projector, ModelKind::Stationary);
    let json = serde_json::to_value(&report.records).expect("records serialize");

    let record = &json[0];
    let mut keys: Vec<&str> =
        record.as_object().expect("record is an object").keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["ENS", "chainsaws", "delta_col", "edge_name", "tau"]);
    assert_eq!(record["edge_name"], "leaf");
    let chainsaws = record["chainsaws"].as_array().expect("chainsaws is an array");
    assert_eq!(chainsaws.len(), 2);
    assert!(chainsaws.iter().all(|c| c.as_array().is_some_and(|pair| pair.len() == 2)));
}
