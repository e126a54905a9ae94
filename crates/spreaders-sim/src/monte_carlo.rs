//! Monte-Carlo averaging over independent realizations.

use anyhow::{Result, ensure};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use spreaders_core::{Network, VertexId};
use tracing::{info, instrument};

use crate::config::SirConfig;
use crate::sir::{Realization, Sir, TraceRecord};

/// Element-wise mean of [`TraceRecord`]s across realizations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AveragedRecord {
    pub t: f64,
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
    pub newly_infected: f64,
    pub newly_recovered: f64,
}

impl AveragedRecord {
    #[allow(clippy::cast_precision_loss)]
    fn accumulate(&mut self, r: &TraceRecord) {
        self.t += r.t as f64;
        self.susceptible += r.susceptible as f64;
        self.infected += r.infected as f64;
        self.recovered += r.recovered as f64;
        self.newly_infected += r.newly_infected as f64;
        self.newly_recovered += r.newly_recovered as f64;
    }

    fn scale(&mut self, factor: f64) {
        self.t *= factor;
        self.susceptible *= factor;
        self.infected *= factor;
        self.recovered *= factor;
        self.newly_infected *= factor;
        self.newly_recovered *= factor;
    }
}

/// Aggregate outcome of `mc` realizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    /// Mean final number of recovered vertices.
    pub mean_spread: f64,
    /// Mean attack rate.
    pub mean_spread_normalized: f64,
    /// Mean trace, as long as the shortest realization's trace.
    pub trace: Vec<AveragedRecord>,
    pub runs: usize,
}

/// Run `mc` realizations from `seed` and average them.
///
/// With a fixed `random_seed` every realization replays the same draws;
/// otherwise one entropy-seeded stream feeds all of them.
///
/// # Errors
///
/// Fails for `mc == 0` or an invalid config.
#[instrument(skip(network, seed, config), fields(vertices = network.vertex_count(), seeds = seed.len()))]
pub fn simulate(network: &Network, seed: Vec<VertexId>, config: &SirConfig, mc: usize) -> Result<MonteCarloSummary> {
    ensure!(mc > 0, "at least one realization is required");
    let mut sir = Sir::new(network, config.clone(), seed)?;

    let mut shared = match config.random_seed {
        Some(_) => None,
        None => Some(StdRng::from_entropy()),
    };
    let mut realizations = Vec::with_capacity(mc);
    for _ in 0..mc {
        let realization = match shared.as_mut() {
            Some(rng) => sir.run_with_rng(rng)?,
            None => sir.run()?,
        };
        realizations.push(realization);
    }

    let summary = summarize(&realizations);
    info!(
        runs = mc,
        mean_spread = summary.mean_spread,
        trace_len = summary.trace.len(),
        "monte carlo finished"
    );
    Ok(summary)
}

#[allow(clippy::cast_precision_loss)]
fn summarize(realizations: &[Realization]) -> MonteCarloSummary {
    let runs = realizations.len();
    let shortest = realizations.iter().map(|r| r.trace.len()).min().unwrap_or(0);
    let mut trace = vec![AveragedRecord::default(); shortest];
    for realization in realizations {
        for (avg, record) in trace.iter_mut().zip(&realization.trace) {
            avg.accumulate(record);
        }
    }

    let factor = if runs == 0 { 0.0 } else { 1.0 / runs as f64 };
    for avg in &mut trace {
        avg.scale(factor);
    }

    let mean_spread = realizations.iter().map(|r| r.final_recovered as f64).sum::<f64>() * factor;
    let mean_spread_normalized = realizations.iter().map(|r| r.attack_rate).sum::<f64>() * factor;

    MonteCarloSummary {
        mean_spread,
        mean_spread_normalized,
        trace,
        runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Network {
        Network::from_edges(false, &[("a", "b"), ("b", "c"), ("c", "d")])
    }

    #[test]
    fn zero_runs_is_a_usage_error() {
        let net = path();
        assert!(simulate(&net, vec![VertexId::new(0)], &SirConfig::default(), 0).is_err());
    }

    #[test]
    fn fixed_seed_runs_are_identical() {
        let net = path();
        let config = SirConfig {
            random_seed: Some(99),
            ..SirConfig::default()
        };
        let mut sir = Sir::new(&net, config.clone(), vec![VertexId::new(1)]).expect("sir");
        let single = sir.run().expect("run");

        let summary = simulate(&net, vec![VertexId::new(1)], &config, 5).expect("simulate");
        #[allow(clippy::cast_precision_loss)]
        let expected = single.final_recovered as f64;
        assert!((summary.mean_spread - expected).abs() < 1e-12);
        assert_eq!(summary.trace.len(), single.trace.len());
        assert_eq!(summary.runs, 5);
    }

    #[test]
    fn averaging_truncates_to_the_shortest_trace() {
        let net = path();
        let mut slow = Sir::new(&net, SirConfig { beta: 1.0, mu: 1.0, num_steps: 1, random_seed: Some(1) }, vec![VertexId::new(0)])
            .expect("sir");
        let mut fast = Sir::new(&net, SirConfig { beta: 0.0, mu: 1.0, num_steps: 1, random_seed: Some(1) }, vec![VertexId::new(0)])
            .expect("sir");
        let long = slow.run().expect("run");
        let short = fast.run().expect("run");
        assert_eq!(long.trace.len(), 5);
        assert_eq!(short.trace.len(), 2);

        let summary = summarize(&[long, short]);
        assert_eq!(summary.trace.len(), 2);
        assert!((summary.mean_spread - 2.5).abs() < 1e-12);
        // tick 1: the slow run has 1 infected, the fast one none
        assert!((summary.trace[1].infected - 0.5).abs() < 1e-12);
    }

    #[test]
    fn summary_serializes_to_json() {
        let net = path();
        let config = SirConfig {
            random_seed: Some(4),
            ..SirConfig::default()
        };
        let summary = simulate(&net, vec![VertexId::new(0)], &config, 2).expect("simulate");
        let json = serde_json::to_string(&summary).expect("json");
        let back: MonteCarloSummary = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.runs, 2);
        assert_eq!(back.trace.len(), summary.trace.len());
    }
}
