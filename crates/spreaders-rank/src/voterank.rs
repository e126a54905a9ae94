//! Iterative vote ranking.
//!
//! Every vertex starts with voting power 1 and votes for its neighbors
//! (in-neighbors on directed networks). Each round the most voted vertex
//! that has not won yet is elected; it stops voting and its neighbors lose
//! `decay` voting power, so later winners tend to sit away from earlier
//! ones.
//!
//! Ties go to the first vertex in vertex order.

use anyhow::{Result, ensure};
use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use spreaders_core::{AttrKey, NeighborMode, Network, Ranking, VertexId};
use tracing::{debug, instrument};

/// Parameters of one vote ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteRankConfig {
    /// Vote along in-edges instead of all edges.
    pub directed: bool,
    /// Voting power a winner's neighbors lose; `1 / average degree` when
    /// unset.
    pub decay: Option<f64>,
    /// Maximum number of winners.
    pub rounds: usize,
}

impl Default for VoteRankConfig {
    fn default() -> Self {
        Self {
            directed: true,
            decay: None,
            rounds: 1,
        }
    }
}

impl VoteRankConfig {
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite decay.
    pub fn validate(&self) -> Result<()> {
        if let Some(decay) = self.decay {
            ensure!(decay.is_finite() && decay >= 0.0, "decay must be a finite non-negative number, got {decay}");
        }
        Ok(())
    }

    const fn mode(&self) -> NeighborMode {
        if self.directed {
            NeighborMode::In
        } else {
            NeighborMode::All
        }
    }
}

/// An elected vertex with the votes it won with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vote {
    pub vertex: VertexId,
    pub score: f64,
}

/// Round-by-round election state.
#[derive(Debug, Clone)]
pub struct Election<'a> {
    network: &'a Network,
    mode: NeighborMode,
    decay: f64,
    power: Vec<f64>,
    elected: FixedBitSet,
}

impl<'a> Election<'a> {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(network: &'a Network, config: &VoteRankConfig) -> Self {
        let decay = config.decay.unwrap_or_else(|| {
            let degrees = network.degrees(NeighborMode::All);
            let total: usize = degrees.iter().sum();
            if total == 0 {
                0.0
            } else {
                degrees.len() as f64 / total as f64
            }
        });
        Self {
            network,
            mode: config.mode(),
            decay,
            power: vec![1.0; network.vertex_count()],
            elected: FixedBitSet::with_capacity(network.vertex_count()),
        }
    }

    /// Current voting power of every vertex.
    #[must_use]
    pub fn voting_power(&self) -> &[f64] {
        &self.power
    }

    /// Hold one round. `None` once no unelected vertex has a positive score.
    pub fn step(&mut self) -> Option<Vote> {
        let mut winner: Option<Vote> = None;
        for v in self.network.vertices() {
            let score: f64 = self
                .network
                .neighbors(v, self.mode)
                .map(|w| self.power[w.index()])
                .sum();
            let best = winner.map_or(0.0, |w| w.score);
            if score > best && !self.elected.contains(v.index()) {
                winner = Some(Vote { vertex: v, score });
            }
        }

        let vote = winner?;
        self.elected.insert(vote.vertex.index());
        self.power[vote.vertex.index()] = 0.0;
        for w in self.network.neighbors(vote.vertex, self.mode) {
            let p = &mut self.power[w.index()];
            *p = (*p - self.decay).max(0.0);
        }
        Some(vote)
    }
}

/// Elect up to `config.rounds` vertices.
///
/// Winning scores are published under `AttrKey::Score(Ranking::VoteRank)`,
/// 0 for everyone else.
///
/// # Errors
///
/// Rejects an invalid config; propagates attribute store errors.
#[instrument(skip(network))]
pub fn vote_rank(network: &mut Network, config: &VoteRankConfig) -> Result<Vec<Vote>> {
    config.validate()?;

    let votes = {
        let mut election = Election::new(network, config);
        let mut votes = Vec::with_capacity(config.rounds.min(network.vertex_count()));
        while votes.len() < config.rounds {
            let Some(vote) = election.step() else {
                debug!(elected = votes.len(), "no vertex left with positive votes");
                break;
            };
            votes.push(vote);
        }
        votes
    };

    let mut column = vec![0.0; network.vertex_count()];
    for vote in &votes {
        column[vote.vertex.index()] = vote.score;
    }
    network.set_numeric(AttrKey::Score(Ranking::VoteRank), column)?;
    Ok(votes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(rounds: usize) -> VoteRankConfig {
        VoteRankConfig {
            directed: false,
            decay: None,
            rounds,
        }
    }

    #[test]
    fn star_center_wins_first() {
        let mut net = Network::from_edges(false, &[("c", "a"), ("c", "b"), ("c", "d"), ("c", "e")]);
        let votes = vote_rank(&mut net, &undirected(1)).expect("votes");
        assert_eq!(votes.len(), 1);
        assert_eq!(net.name(votes[0].vertex), Some("c"));
        assert!((votes[0].score - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_go_to_first_vertex() {
        let mut net = Network::from_edges(false, &[("a", "b")]);
        let votes = vote_rank(&mut net, &undirected(2)).expect("votes");
        assert_eq!(votes[0].vertex, VertexId::new(0));
        // b's only voter lost all power (decay = 1 / avg degree = 1)
        assert_eq!(votes.len(), 1);
    }

    #[test]
    fn edgeless_network_elects_nobody() {
        let mut net = Network::with_vertices(false, &["x", "y"], &[]);
        let votes = vote_rank(&mut net, &undirected(3)).expect("votes");
        assert!(votes.is_empty());
        assert_eq!(net.numeric(&AttrKey::Score(Ranking::VoteRank)).expect("column"), &[0.0, 0.0]);
    }

    #[test]
    fn directed_votes_follow_in_edges() {
        // a and b both point at c; c receives 2 votes
        let mut net = Network::from_edges(true, &[("a", "c"), ("b", "c")]);
        let config = VoteRankConfig {
            rounds: 1,
            ..VoteRankConfig::default()
        };
        let votes = vote_rank(&mut net, &config).expect("votes");
        assert_eq!(net.name(votes[0].vertex), Some("c"));
    }

    #[test]
    fn winner_neighbors_lose_power() {
        let net = Network::from_edges(false, &[("c", "a"), ("c", "b"), ("a", "b"), ("b", "d")]);
        let config = VoteRankConfig {
            decay: Some(0.25),
            ..undirected(1)
        };
        let mut election = Election::new(&net, &config);
        let before = election.voting_power().to_vec();
        let vote = election.step().expect("winner");
        for w in net.neighbors(vote.vertex, NeighborMode::All) {
            assert!(election.voting_power()[w.index()] < before[w.index()]);
        }
        assert!(election.voting_power()[vote.vertex.index()].abs() < f64::EPSILON);
    }

    #[test]
    fn negative_decay_is_rejected() {
        let mut net = Network::from_edges(false, &[("a", "b")]);
        let config = VoteRankConfig {
            decay: Some(-1.0),
            ..undirected(1)
        };
        assert!(vote_rank(&mut net, &config).is_err());
    }
}
