//! k-shell entropy selection (IKS).
//!
//! Vertices are grouped by k-shell; within a shell, vertices whose
//! neighbors carry more degree entropy go first. Selection walks the shells
//! round-robin from the innermost one so the seed set covers several shells.

use std::collections::{BTreeMap, VecDeque};

use anyhow::Result;
use spreaders_core::{AttrKey, NeighborMode, Network, Ranking, VertexId};
use tracing::{debug, instrument};

use crate::select::{Spreader, assign_priorities, publish_priorities};

/// Store shell index and neighbor entropy for every vertex.
///
/// # Errors
///
/// Propagates attribute store errors.
#[instrument(skip(network), fields(vertices = network.vertex_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn annotate(network: &mut Network) -> Result<()> {
    let shells: Vec<f64> = network
        .coreness(NeighborMode::All)
        .into_iter()
        .map(|k| k as f64)
        .collect();
    let entropy = neighbor_entropy(network);
    network.set_numeric(AttrKey::IksShell, shells)?;
    network.set_numeric(AttrKey::IksEntropy, entropy)?;
    Ok(())
}

/// `e(v) = -Σ_{w ∈ N(v)} (I(w) + ln I(w))` with `I(w) = deg(w) / Σ deg`.
///
/// Zero-degree terms contribute 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn neighbor_entropy(network: &Network) -> Vec<f64> {
    let degrees = network.degrees(NeighborMode::All);
    let total: usize = degrees.iter().sum();
    let importance = |w: VertexId| -> f64 {
        if total == 0 {
            0.0
        } else {
            degrees[w.index()] as f64 / total as f64
        }
    };

    network
        .vertices()
        .map(|v| {
            -network
                .neighbors(v, NeighborMode::All)
                .map(|w| {
                    let i = importance(w);
                    if i > 0.0 { i + i.ln() } else { 0.0 }
                })
                .sum::<f64>()
        })
        .collect()
}

/// Select up to `n` spreaders from annotated shells.
///
/// Shells are visited from the highest index down, round-robin, each time
/// taking the remaining vertex with the largest entropy. Priorities run
/// `len..=1` and are published under `AttrKey::Score(Ranking::Iks)`.
///
/// # Errors
///
/// Fails fast with `GraphError::MissingAttribute` when [`annotate`] has not
/// run.
#[instrument(skip(network))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn select(network: &mut Network, n: usize) -> Result<Vec<Spreader>> {
    let order = {
        let shells = network.numeric(&AttrKey::IksShell)?;
        let entropy = network.numeric(&AttrKey::IksEntropy)?;

        // BTreeMap keys ascend; pop shells from the back of the vec below.
        let mut by_shell: BTreeMap<usize, Vec<VertexId>> = BTreeMap::new();
        for v in network.vertices() {
            by_shell.entry(shells[v.index()] as usize).or_default().push(v);
        }
        let mut groups: Vec<VecDeque<VertexId>> = by_shell
            .into_values()
            .rev()
            .map(|mut members| {
                members.sort_by(|a, b| entropy[a.index()].total_cmp(&entropy[b.index()]));
                members.into()
            })
            .collect();

        let budget = n.min(network.vertex_count());
        debug!(shells = groups.len(), budget, "iks shells");
        let mut order = Vec::with_capacity(budget);
        while order.len() < budget {
            let before = order.len();
            for group in &mut groups {
                if order.len() == budget {
                    break;
                }
                if let Some(v) = group.pop_back() {
                    order.push(v);
                }
            }
            if order.len() == before {
                break;
            }
        }
        order
    };

    let spreaders = assign_priorities(&order);
    publish_priorities(network, Ranking::Iks, &spreaders)?;
    Ok(spreaders)
}
