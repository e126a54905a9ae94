//! Single SIR realization.
//!
//! # Tick
//!
//! At the start of a tick the infected set is frozen and walked in vertex
//! order. Each infected vertex tries to infect every susceptible neighbor
//! (probability `beta`, one draw per neighbor), then tries to recover
//! (probability `mu`). Vertices infected during the tick only start
//! spreading on the next one.
//!
//! The state is recorded every `num_steps` ticks, starting with tick 0, and
//! the realization ends at the first tick with no infected vertex.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};
use serde::{Deserialize, Serialize};
use spreaders_core::{NeighborMode, Network, VertexId};
use tracing::{debug, instrument, trace, warn};

use crate::config::SirConfig;

/// Epidemic state of one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Health {
    Susceptible,
    Infected,
    Recovered,
}

/// Compartment sizes at a recorded tick, plus this tick's transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub t: usize,
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
    /// S → I transitions during the tick (the seed size at tick 0).
    pub newly_infected: usize,
    /// I → R transitions during the tick.
    pub newly_recovered: usize,
}

/// A [`TraceRecord`] divided by the vertex count (`t` is kept as is).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionRecord {
    pub t: usize,
    pub susceptible: f64,
    pub infected: f64,
    pub recovered: f64,
    pub newly_infected: f64,
    pub newly_recovered: f64,
}

/// Outcome of one realization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realization {
    pub trace: Vec<TraceRecord>,
    /// Final recovered fraction.
    pub attack_rate: f64,
    /// Recorded tick with the most infected vertices (earliest on ties).
    pub peak_time: usize,
    /// Final number of recovered vertices.
    pub final_recovered: usize,
    vertex_count: usize,
}

impl Realization {
    /// The trace divided by the vertex count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn normalized_trace(&self) -> Vec<FractionRecord> {
        let n = self.vertex_count.max(1) as f64;
        self.trace
            .iter()
            .map(|r| FractionRecord {
                t: r.t,
                susceptible: r.susceptible as f64 / n,
                infected: r.infected as f64 / n,
                recovered: r.recovered as f64 / n,
                newly_infected: r.newly_infected as f64 / n,
                newly_recovered: r.newly_recovered as f64 / n,
            })
            .collect()
    }
}

/// Where the initial infection comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Seeding {
    /// Sorted, deduplicated vertices of the network.
    Fixed(Vec<VertexId>),
    /// Draw one vertex on the first run and keep it.
    DrawOne,
}

/// SIR process over a borrowed network.
#[derive(Debug, Clone)]
pub struct Sir<'a> {
    network: &'a Network,
    config: SirConfig,
    seeding: Seeding,
}

impl<'a> Sir<'a> {
    /// Prepare a process starting from `seed`.
    ///
    /// Seed vertices outside the network are dropped with a warning; if all
    /// of them are dropped the epidemic never starts. An empty `seed` draws
    /// one vertex uniformly at the first run and reuses it afterwards.
    ///
    /// # Errors
    ///
    /// Rejects an invalid config.
    pub fn new(network: &'a Network, config: SirConfig, seed: Vec<VertexId>) -> Result<Self> {
        config.validate()?;
        let seeding = if seed.is_empty() {
            Seeding::DrawOne
        } else {
            let requested = seed.len();
            let mut kept: Vec<VertexId> = seed.into_iter().filter(|&v| network.contains(v)).collect();
            kept.sort_unstable();
            kept.dedup();
            if kept.len() < requested {
                warn!(requested, kept = kept.len(), "dropped seed vertices outside the network or repeated");
            }
            Seeding::Fixed(kept)
        };
        Ok(Self {
            network,
            config,
            seeding,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SirConfig {
        &self.config
    }

    /// The seed set, once known (after the first run when it is drawn).
    #[must_use]
    pub fn seed(&self) -> Option<&[VertexId]> {
        match &self.seeding {
            Seeding::Fixed(seed) => Some(seed),
            Seeding::DrawOne => None,
        }
    }

    /// Run with the configured randomness: a fresh `StdRng` from the fixed
    /// seed, or from OS entropy.
    ///
    /// With a fixed seed every call replays the same realization, including
    /// the first one that draws the seed vertex: that draw comes from a
    /// separate stream.
    ///
    /// # Errors
    ///
    /// See [`Sir::run_with_rng`].
    pub fn run(&mut self) -> Result<Realization> {
        match self.config.random_seed {
            Some(seed) => {
                self.draw_seed(&mut StdRng::seed_from_u64(seed));
                self.run_with_rng(&mut StdRng::seed_from_u64(seed))
            }
            None => self.run_with_rng(&mut StdRng::from_entropy()),
        }
    }

    /// Pick the single seed vertex if none was given. No-op afterwards.
    fn draw_seed<R: Rng>(&mut self, rng: &mut R) {
        let n = self.network.vertex_count();
        if self.seeding == Seeding::DrawOne && n > 0 {
            let drawn = VertexId::new(rng.gen_range(0..n));
            debug!(seed = drawn.index(), "drew a random seed vertex");
            self.seeding = Seeding::Fixed(vec![drawn]);
        }
    }

    /// Run one realization drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Fails if the configured probabilities cannot build a Bernoulli
    /// distribution.
    #[instrument(skip(self, rng), fields(vertices = self.network.vertex_count()))]
    pub fn run_with_rng<R: Rng>(&mut self, rng: &mut R) -> Result<Realization> {
        let infect = Bernoulli::new(self.config.beta).context("invalid beta")?;
        let recover = Bernoulli::new(self.config.mu).context("invalid mu")?;
        let n = self.network.vertex_count();

        self.draw_seed(rng);
        let seed: &[VertexId] = match &self.seeding {
            Seeding::Fixed(seed) => seed,
            Seeding::DrawOne => &[],
        };

        let mut health = vec![Health::Susceptible; n];
        let mut infected: Vec<VertexId> = seed.to_vec();
        for v in &infected {
            health[v.index()] = Health::Infected;
        }
        let mut recovered = 0usize;

        let mut trace = vec![TraceRecord {
            t: 0,
            susceptible: n - infected.len(),
            infected: infected.len(),
            recovered: 0,
            newly_infected: infected.len(),
            newly_recovered: 0,
        }];

        let mut t = 0;
        while !infected.is_empty() {
            t += 1;
            let snapshot = std::mem::take(&mut infected);
            let mut newly_infected = Vec::new();
            let mut newly_recovered = 0usize;

            for &i in &snapshot {
                for w in self.network.distinct_neighbors(i, NeighborMode::All) {
                    if health[w.index()] == Health::Susceptible && infect.sample(rng) {
                        health[w.index()] = Health::Infected;
                        newly_infected.push(w);
                    }
                }
                if recover.sample(rng) {
                    health[i.index()] = Health::Recovered;
                    newly_recovered += 1;
                } else {
                    infected.push(i);
                }
            }
            recovered += newly_recovered;
            let new_count = newly_infected.len();
            infected.extend(newly_infected);
            infected.sort_unstable();

            if t % self.config.num_steps == 0 {
                trace.push(TraceRecord {
                    t,
                    susceptible: n - infected.len() - recovered,
                    infected: infected.len(),
                    recovered,
                    newly_infected: new_count,
                    newly_recovered,
                });
            }
            trace!(t, infected = infected.len(), recovered, "tick");
        }

        let peak_time = trace
            .iter()
            .fold(None::<&TraceRecord>, |best, r| match best {
                Some(b) if b.infected >= r.infected => Some(b),
                _ => Some(r),
            })
            .map_or(0, |r| r.t);

        #[allow(clippy::cast_precision_loss)]
        let attack_rate = if n == 0 { 0.0 } else { recovered as f64 / n as f64 };
        debug!(ticks = t, recovered, attack_rate, "realization finished");

        Ok(Realization {
            trace,
            attack_rate,
            peak_time,
            final_recovered: recovered,
            vertex_count: n,
        })
    }
}
