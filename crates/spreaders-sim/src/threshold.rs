//! Epidemic threshold of a network.

use spreaders_core::{NeighborMode, Network};

/// `⟨k⟩ / ⟨k²⟩` over all-edge degrees.
///
/// Transmission probabilities above this value let an outbreak reach a
/// finite fraction of the network. Returns 0.0 when there are no edges.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn epidemic_threshold(network: &Network) -> f64 {
    let degrees = network.degrees(NeighborMode::All);
    let sum: usize = degrees.iter().sum();
    let sum_sq: usize = degrees.iter().map(|d| d * d).sum();
    if sum_sq == 0 {
        return 0.0;
    }
    sum as f64 / sum_sq as f64
}
