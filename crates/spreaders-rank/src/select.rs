//! Spreader records and score-to-seed-set selection.

use anyhow::Result;
use spreaders_core::{AttrKey, Network, Ranking, VertexId};

/// A selected vertex with its rank priority (higher = better spreader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spreader {
    pub vertex: VertexId,
    pub priority: usize,
}

/// Assign priorities `len, len-1, …, 1` in selection order.
#[must_use]
pub fn assign_priorities(order: &[VertexId]) -> Vec<Spreader> {
    let len = order.len();
    order
        .iter()
        .enumerate()
        .map(|(i, &vertex)| Spreader {
            vertex,
            priority: len - i,
        })
        .collect()
}

/// Publish priorities as the score column of `ranking`; unselected vertices
/// score 0.
///
/// # Errors
///
/// Propagates attribute store errors.
#[allow(clippy::cast_precision_loss)]
pub fn publish_priorities(
    network: &mut Network,
    ranking: Ranking,
    spreaders: &[Spreader],
) -> Result<()> {
    let mut column = vec![0.0; network.vertex_count()];
    for s in spreaders {
        if let Some(slot) = column.get_mut(s.vertex.index()) {
            *slot = s.priority as f64;
        }
    }
    network.set_numeric(AttrKey::Score(ranking), column)?;
    Ok(())
}

/// The `k` vertices with the highest scores, best first.
///
/// Ties keep vertex order. `k` larger than the score count returns every
/// vertex.
#[must_use]
pub fn top_k(scores: &[f64], k: usize) -> Vec<VertexId> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.into_iter().take(k).map(VertexId::new).collect()
}
