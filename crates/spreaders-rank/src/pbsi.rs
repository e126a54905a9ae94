//! Community-proportional spreader identification (PBSI).
//!
//! # Overview
//!
//! Good seed sets are spread across communities: two seeds in the same
//! dense cluster mostly re-infect each other's neighborhood. PBSI therefore
//! splits the budget between communities and ranks vertices inside each
//! community by their local influence.
//!
//! ## Pipeline
//!
//! ```text
//! Network
//!    ↓  prepare_communities()            (phase A, cached per labeling)
//! Community(labeling)      "[component-community(suffix)]" per vertex
//! LocalInfluence(labeling) G over in-community coreness per vertex
//!    ↓  detect_spreaders(k)              (phase B)
//! per-community queues (best first)
//!    ↓  interleave()                     round-robin across communities
//! Vec<Spreader>            priorities len..=1
//! ```
//!
//! ## Quota clamping
//!
//! With at least as many spreaders as communities, each community gets
//! `size · remaining_budget / remaining_vertices` spreaders (at least 1,
//! otherwise rounded). Quotas are clamped to the remaining budget and to the
//! community size, and any budget still unspent after the pass is handed out
//! from the largest community down, so the result always holds exactly
//! `min(k, |V|)` vertices.

use std::collections::{HashMap, VecDeque};

use anyhow::{Context, Result};
use spreaders_core::{AttrKey, LouvainConfig, NeighborMode, Network, Ranking, VertexId};
use tracing::{debug, info, instrument};

use crate::influence::{DEFAULT_RADIUS, local_influence};
use crate::select::{Spreader, assign_priorities, publish_priorities};

/// Labeling name used when the caller does not pick one (multilevel
/// communities).
pub const DEFAULT_LABELING: &str = "MLC";

/// Typed handle to a prepared community labeling.
///
/// Returned by [`prepare_communities`] and required by [`detect_spreaders`],
/// so phase B cannot run against a labeling that was never prepared through
/// this module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommunityHandle {
    labeling: String,
}

impl CommunityHandle {
    #[must_use]
    pub fn labeling(&self) -> &str {
        &self.labeling
    }

    /// Key of the per-vertex community label column.
    #[must_use]
    pub fn community_key(&self) -> AttrKey {
        AttrKey::Community(self.labeling.clone())
    }

    /// Key of the per-vertex local influence column.
    #[must_use]
    pub fn influence_key(&self) -> AttrKey {
        AttrKey::LocalInfluence(self.labeling.clone())
    }
}

// ---------------------------------------------------------------------------
// Phase A: community preparation
// ---------------------------------------------------------------------------

/// Label communities, split disconnected ones, and compute local influence.
///
/// Idempotent: labels already stored under the labeling are reused (and
/// repaired), and local influence is only computed when missing. A repair
/// that splits a community invalidates cached influence.
///
/// # Errors
///
/// Fails if an existing column under the labeling has the wrong kind.
#[instrument(skip(network), fields(vertices = network.vertex_count()))]
pub fn prepare_communities(network: &mut Network, labeling: Option<&str>) -> Result<CommunityHandle> {
    let handle = CommunityHandle {
        labeling: labeling.unwrap_or(DEFAULT_LABELING).to_string(),
    };
    let community_key = handle.community_key();
    let influence_key = handle.influence_key();

    if !network.has_attr(&community_key) {
        let labels = composite_labels(network);
        network.set_text(community_key.clone(), labels)?;
    }

    let splits = repair_communities(network, &community_key)?;
    if splits > 0 {
        network.remove_attr(&influence_key);
    }

    if !network.has_attr(&influence_key) {
        let gks = community_influence(network, &community_key)
            .with_context(|| format!("computing {influence_key}"))?;
        network.set_numeric(influence_key, gks)?;
    }

    Ok(handle)
}

/// `"[component-community]"` per vertex from weak components and a
/// Louvain partition.
fn composite_labels(network: &Network) -> Vec<String> {
    let components = network.connected_components();
    let partition = network.louvain_communities(&LouvainConfig::default());
    debug!(
        communities = partition.community_count,
        modularity = partition.modularity,
        "multilevel partition"
    );
    components
        .iter()
        .zip(&partition.membership)
        .map(|(c, m)| format!("[{c}-{m}]"))
        .collect()
}

/// Split every label whose induced subgraph is disconnected.
///
/// The first piece (the one holding the lowest vertex) keeps its label; the
/// following pieces get suffixes `A`, `B`, … Returns the number of labels
/// that were split.
///
/// # Errors
///
/// Fails if the label column is missing or numeric.
pub fn repair_communities(network: &mut Network, key: &AttrKey) -> Result<usize> {
    let mut labels = network.text(key)?.to_vec();
    let mut splits = 0;

    for (label, members) in group_by_label(&labels) {
        let sub = network.induced_subgraph(&members);
        let pieces = sub.connected_components();
        let piece_count = pieces.iter().max().map_or(0, |&p| p + 1);
        if piece_count <= 1 {
            continue;
        }
        info!(community = %label, pieces = piece_count, "community broken into disconnected pieces");
        splits += 1;

        let mut suffixes = vec![String::new()];
        let mut suffix = "A".to_string();
        for _ in 1..piece_count {
            let next = next_suffix(&suffix);
            suffixes.push(std::mem::replace(&mut suffix, next));
        }

        for v in sub.vertices() {
            let piece = pieces[v.index()];
            if piece == 0 {
                continue;
            }
            if let Some(parent) = sub.name(v).and_then(|name| network.find(name)) {
                labels[parent.index()] = with_suffix(&label, &suffixes[piece]);
            }
        }
    }

    if splits > 0 {
        network.set_text(key.clone(), labels)?;
    }
    Ok(splits)
}

/// Increment a letter suffix with carry: `A → B`, `Z → AA`, `AZ → BA`.
#[must_use]
pub fn next_suffix(suffix: &str) -> String {
    let mut letters: Vec<u8> = suffix.bytes().collect();
    for slot in letters.iter_mut().rev() {
        if *slot < b'Z' {
            *slot += 1;
            return String::from_utf8_lossy(&letters).into_owned();
        }
        *slot = b'A';
    }
    letters.insert(0, b'A');
    String::from_utf8_lossy(&letters).into_owned()
}

fn with_suffix(label: &str, suffix: &str) -> String {
    label.strip_suffix(']').map_or_else(
        || format!("{label}{suffix}"),
        |stem| format!("{stem}{suffix}]"),
    )
}

/// Coreness-based local influence computed inside every community.
#[allow(clippy::cast_precision_loss)]
fn community_influence(network: &Network, key: &AttrKey) -> Result<Vec<f64>> {
    let groups = group_by_label(network.text(key)?);
    let mut gks = vec![0.0; network.vertex_count()];

    for (_, members) in groups {
        let sub = network.induced_subgraph(&members);
        let ks: Vec<f64> = sub
            .coreness(NeighborMode::All)
            .into_iter()
            .map(|k| k as f64)
            .collect();
        let scores = local_influence(&sub, &ks, DEFAULT_RADIUS)?;
        for v in sub.vertices() {
            if let Some(parent) = sub.name(v).and_then(|name| network.find(name)) {
                gks[parent.index()] = scores[v.index()];
            }
        }
    }
    Ok(gks)
}

/// Group vertices by label, communities in order of first appearance and
/// members in vertex order.
fn group_by_label(labels: &[String]) -> Vec<(String, Vec<VertexId>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<VertexId>)> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let slot = *index.entry(label.as_str()).or_insert_with(|| {
            groups.push((label.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(VertexId::new(i));
    }
    groups
}

// ---------------------------------------------------------------------------
// Phase B: selection
// ---------------------------------------------------------------------------

struct Community {
    aggregate: f64,
    /// Members sorted by local influence, best first.
    members: Vec<VertexId>,
}

/// Select up to `k` spreaders from a prepared labeling.
///
/// Priorities are also published under `AttrKey::Score(Ranking::Pbsi)`.
///
/// # Errors
///
/// Fails fast if the labeling's label or influence column is missing.
#[instrument(skip(network, handle), fields(labeling = handle.labeling()))]
#[allow(clippy::cast_precision_loss)]
pub fn detect_spreaders(network: &mut Network, k: usize, handle: &CommunityHandle) -> Result<Vec<Spreader>> {
    let order = {
        let labels = network.text(&handle.community_key())?;
        let gks = network.numeric(&handle.influence_key())?;
        let groups = group_by_label(labels);
        let total = network.vertex_count();
        let budget = k.min(total);
        let by_influence = budget < groups.len();

        let mut communities: Vec<Community> = groups
            .into_iter()
            .map(|(_, mut members)| {
                members.sort_by(|a, b| gks[b.index()].total_cmp(&gks[a.index()]));
                let aggregate = if by_influence {
                    members.first().map_or(0.0, |v| gks[v.index()])
                } else {
                    members.len() as f64
                };
                Community { aggregate, members }
            })
            .collect();
        communities.sort_by(|a, b| a.aggregate.total_cmp(&b.aggregate));

        let queues: Vec<VecDeque<VertexId>> = if budget == 0 {
            Vec::new()
        } else if by_influence {
            communities
                .iter()
                .rev()
                .take(budget)
                .map(|c| c.members.iter().take(1).copied().collect())
                .collect()
        } else {
            proportional_queues(&communities, budget, total)
        };
        debug!(budget, communities = communities.len(), by_influence, "pbsi allocation");
        interleave(queues)
    };

    let spreaders = assign_priorities(&order);
    publish_priorities(network, Ranking::Pbsi, &spreaders)?;
    Ok(spreaders)
}

/// Proportional quotas over communities sorted by ascending size; the
/// returned queues run from the largest community to the smallest.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn proportional_queues(communities: &[Community], budget: usize, total: usize) -> Vec<VecDeque<VertexId>> {
    let mut spread_done = 0usize;
    let mut nodes_done = 0usize;
    let mut queues: Vec<VecDeque<VertexId>> = Vec::with_capacity(communities.len());

    for c in communities {
        let size = c.members.len();
        let remaining = budget - spread_done;
        let share = size as f64 * remaining as f64 / (total - nodes_done) as f64;
        let quota = if share < 1.0 { 1 } else { share.round() as usize };
        let quota = quota.min(remaining).min(size);

        spread_done += quota;
        nodes_done += size;
        queues.push(c.members.iter().take(quota).copied().collect());
    }

    let mut leftover = budget - spread_done;
    while leftover > 0 {
        let mut progressed = false;
        for (c, queue) in communities.iter().zip(queues.iter_mut()).rev() {
            if leftover == 0 {
                break;
            }
            if let Some(&next) = c.members.get(queue.len()) {
                queue.push_back(next);
                leftover -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    queues.reverse();
    queues
}

/// Round-robin merge: take the front of each queue in turn, dropping queues
/// as they run dry.
#[must_use]
pub fn interleave(mut queues: Vec<VecDeque<VertexId>>) -> Vec<VertexId> {
    queues.retain(|q| !q.is_empty());
    let mut out = Vec::with_capacity(queues.iter().map(VecDeque::len).sum());
    let mut cursor = 0;

    while !queues.is_empty() {
        if cursor >= queues.len() {
            cursor = 0;
        }
        if let Some(v) = queues[cursor].pop_front() {
            out.push(v);
        }
        if queues[cursor].is_empty() {
            queues.remove(cursor);
        } else {
            cursor += 1;
        }
    }
    out
}

/// One vertex per community: the one with the highest value under `key`.
///
/// Communities are visited in order of first appearance; ties keep vertex
/// order.
///
/// # Errors
///
/// Fails fast if the label column or `key` is missing.
pub fn best_per_community(network: &Network, handle: &CommunityHandle, key: &AttrKey) -> Result<Vec<VertexId>> {
    let labels = network.text(&handle.community_key())?;
    let values = network.numeric(key)?;
    Ok(group_by_label(labels)
        .into_iter()
        .filter_map(|(_, members)| {
            members
                .into_iter()
                .reduce(|best, v| if values[v.index()] > values[best.index()] { v } else { best })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
