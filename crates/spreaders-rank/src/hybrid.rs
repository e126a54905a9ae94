//! Hybrid eccentricity × neighbor-coreness score.

use anyhow::Result;
use spreaders_core::{AttrKey, NeighborMode, Network, Ranking};
use tracing::instrument;

/// Second factor of the hybrid score.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HybridInput {
    /// Sum of the neighbors' coreness, computed on the fly.
    #[default]
    NeighborCoreness,
    /// A precomputed numeric column.
    Attribute(AttrKey),
}

/// `eccentricity(v) × input(v)`, following in-edges when `directed`.
///
/// Scores are published under `AttrKey::Score(Ranking::HybridRank)`.
///
/// # Errors
///
/// Fails fast when [`HybridInput::Attribute`] names a missing column.
#[instrument(skip(network))]
#[allow(clippy::cast_precision_loss)]
pub fn hybrid_rank(network: &mut Network, directed: bool, input: &HybridInput) -> Result<Vec<f64>> {
    let mode = if directed { NeighborMode::In } else { NeighborMode::All };

    let factor: Vec<f64> = match input {
        HybridInput::NeighborCoreness => {
            let ks = network.coreness(mode);
            network
                .vertices()
                .map(|v| network.neighbors(v, mode).map(|w| ks[w.index()] as f64).sum())
                .collect()
        }
        HybridInput::Attribute(key) => network.numeric(key)?.to_vec(),
    };

    let scores: Vec<f64> = network
        .vertices()
        .map(|v| network.eccentricity(v, mode) as f64 * factor[v.index()])
        .collect();
    network.set_numeric(AttrKey::Score(Ranking::HybridRank), scores.clone())?;
    Ok(scores)
}
