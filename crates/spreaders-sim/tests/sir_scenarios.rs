//! End-to-end SIR scenarios on hand-built networks.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spreaders_core::{Network, VertexId};
use spreaders_rank::pbsi::{detect_spreaders, prepare_communities};
use spreaders_sim::{Sir, SirConfig, epidemic_threshold, simulate};

fn cycle(n: usize) -> Network {
    let names: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
    let edges: Vec<(&str, &str)> = (0..n)
        .map(|i| (names[i].as_str(), names[(i + 1) % n].as_str()))
        .collect();
    Network::from_edges(false, &edges)
}

fn certain(random_seed: Option<u64>) -> SirConfig {
    SirConfig {
        beta: 1.0,
        mu: 1.0,
        num_steps: 1,
        random_seed,
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn ring_of_ten_burns_out_in_six_ticks() {
    let net = cycle(10);
    let mut sir = Sir::new(&net, certain(Some(1)), vec![VertexId::new(0)]).expect("sir");
    let run = sir.run().expect("run");

    let ticks: Vec<usize> = run.trace.iter().map(|r| r.t).collect();
    assert_eq!(ticks, (0..=6).collect::<Vec<_>>());
    let infected: Vec<usize> = run.trace.iter().map(|r| r.infected).collect();
    assert_eq!(infected, vec![1, 2, 2, 2, 2, 1, 0]);
    // everyone has been infected by tick 5
    assert_eq!(run.trace[5].susceptible, 0);
    assert_eq!(run.trace[6].recovered, 10);
    assert!((run.attack_rate - 1.0).abs() < f64::EPSILON);
    assert_eq!(run.peak_time, 1);
}

#[test]
fn unknown_seed_never_starts() {
    let net = cycle(4);
    let mut sir = Sir::new(&net, certain(Some(1)), vec![VertexId::new(42)]).expect("sir");
    let run = sir.run().expect("run");
    assert_eq!(run.trace.len(), 1);
    assert_eq!(run.trace[0].infected, 0);
    assert_eq!(run.final_recovered, 0);
    assert!(run.attack_rate.abs() < f64::EPSILON);
}

#[test]
fn empty_seed_starts_from_one_vertex() {
    let net = cycle(6);
    let mut sir = Sir::new(&net, certain(Some(5)), Vec::new()).expect("sir");
    let run = sir.run().expect("run");
    assert_eq!(run.trace[0].infected, 1);
    assert_eq!(run.final_recovered, 6);
}

#[test]
fn drawn_seed_runs_replay_under_a_fixed_seed() {
    let net = cycle(40);
    let config = SirConfig {
        beta: 0.5,
        mu: 0.5,
        num_steps: 1,
        random_seed: Some(0),
    };
    let mut sir = Sir::new(&net, config.clone(), Vec::new()).expect("sir");
    let first = sir.run().expect("first run");
    let second = sir.run().expect("second run");
    assert_eq!(first, second);

    let summary = simulate(&net, Vec::new(), &config, 3).expect("simulate");
    #[allow(clippy::cast_precision_loss)]
    let expected_spread = first.final_recovered as f64;
    assert!((summary.mean_spread - expected_spread).abs() < 1e-12);
    assert_eq!(summary.trace.len(), first.trace.len());
    for (avg, record) in summary.trace.iter().zip(&first.trace) {
        #[allow(clippy::cast_precision_loss)]
        let recovered = record.recovered as f64;
        assert!((avg.recovered - recovered).abs() < 1e-12);
    }
}

#[test]
fn single_monte_carlo_run_matches_one_realization() {
    let net = cycle(12);
    let config = SirConfig {
        random_seed: Some(2024),
        ..SirConfig::default()
    };
    let seed = vec![VertexId::new(3)];
    let mut sir = Sir::new(&net, config.clone(), seed.clone()).expect("sir");
    let run = sir.run().expect("run");
    let summary = simulate(&net, seed, &config, 1).expect("simulate");

    #[allow(clippy::cast_precision_loss)]
    let expected_spread = run.final_recovered as f64;
    assert!((summary.mean_spread - expected_spread).abs() < 1e-12);
    assert!((summary.mean_spread_normalized - run.attack_rate).abs() < 1e-12);
    assert_eq!(summary.trace.len(), run.trace.len());
    for (avg, record) in summary.trace.iter().zip(&run.trace) {
        #[allow(clippy::cast_precision_loss)]
        let infected = record.infected as f64;
        assert!((avg.infected - infected).abs() < 1e-12);
    }
}

#[test]
fn pbsi_seeds_cover_disjoint_triangles() {
    let mut net = Network::from_edges(
        false,
        &[
            ("x0", "x1"),
            ("x1", "x2"),
            ("x2", "x0"),
            ("y0", "y1"),
            ("y1", "y2"),
            ("y2", "y0"),
            ("z0", "z1"),
            ("z1", "z2"),
            ("z2", "z0"),
        ],
    );
    let handle = prepare_communities(&mut net, None).expect("prepare");
    let seeds: Vec<VertexId> = detect_spreaders(&mut net, 3, &handle)
        .expect("detect")
        .into_iter()
        .map(|s| s.vertex)
        .collect();

    let summary = simulate(&net, seeds, &certain(Some(8)), 3).expect("simulate");
    assert!((summary.mean_spread - 9.0).abs() < 1e-12);
    assert!(epidemic_threshold(&net) > 0.0);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_network() -> impl Strategy<Value = Network> {
    (2usize..30).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..n * 3).prop_map(move |pairs| {
            let names: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let edges: Vec<(&str, &str)> = pairs.iter().map(|&(a, b)| (refs[a], refs[b])).collect();
            Network::with_vertices(false, &refs, &edges)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn compartments_partition_the_network(
        net in arb_network(),
        beta in 0.0f64..=1.0,
        mu in 0.05f64..=1.0,
        rng_seed in any::<u64>(),
    ) {
        let config = SirConfig { beta, mu, num_steps: 1, random_seed: None };
        let mut sir = Sir::new(&net, config, vec![VertexId::new(0)]).expect("sir");
        let run = sir.run_with_rng(&mut StdRng::seed_from_u64(rng_seed)).expect("run");

        for r in &run.trace {
            prop_assert_eq!(r.susceptible + r.infected + r.recovered, net.vertex_count());
        }
        prop_assert!((0.0..=1.0).contains(&run.attack_rate));
        prop_assert_eq!(run.trace.last().map(|r| r.infected), Some(0));
    }

    #[test]
    fn fixed_seed_is_deterministic(net in arb_network(), random_seed in any::<u64>()) {
        let config = SirConfig { random_seed: Some(random_seed), ..SirConfig::default() };
        let mut sir = Sir::new(&net, config, vec![VertexId::new(1)]).expect("sir");
        let first = sir.run().expect("run");
        let second = sir.run().expect("run");
        prop_assert_eq!(first, second);
    }
}
