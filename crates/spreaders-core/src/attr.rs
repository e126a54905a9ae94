//! Typed per-vertex attribute columns.
//!
//! Algorithms annotate a [`Network`](crate::Network) with their results
//! instead of returning loose vectors only, so a later stage (a selector,
//! an experiment) can pick the column up again. Every column is keyed by an
//! [`AttrKey`]: community-scoped values carry the labeling name inside the
//! key, never inside a formatted string.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The ranking algorithms that publish a score column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ranking {
    /// Community-proportional spreader identification.
    Pbsi,
    /// k-shell entropy selection.
    Iks,
    /// Iterative vote ranking.
    VoteRank,
    /// Eccentricity × neighbor coreness.
    HybridRank,
    /// Similarity-weighted edge score.
    ScCore,
    /// Plain degree.
    Degree,
}

impl Ranking {
    /// Short tag used in reports and log lines.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pbsi => "PRP",
            Self::Iks => "IKS",
            Self::VoteRank => "VR",
            Self::HybridRank => "HC",
            Self::ScCore => "SC",
            Self::Degree => "DEG",
        }
    }
}

/// Key of a per-vertex attribute column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// k-shell index over the whole network.
    Coreness,
    /// k-shell index as annotated for IKS selection.
    IksShell,
    /// Degree entropy as annotated for IKS selection.
    IksEntropy,
    /// Community label per vertex under the named labeling.
    Community(String),
    /// Local influence (G over in-community coreness) for the named labeling.
    LocalInfluence(String),
    /// Score or priority published by a ranking algorithm.
    Score(Ranking),
    /// Caller-defined column.
    Custom(String),
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coreness => f.write_str("coreness"),
            Self::IksShell => f.write_str("iks_kcore"),
            Self::IksEntropy => f.write_str("iks_e"),
            Self::Community(name) => write!(f, "{name}"),
            Self::LocalInfluence(name) => write!(f, "gks_{name}"),
            Self::Score(ranking) => f.write_str(ranking.tag()),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// One attribute column, one entry per vertex in vertex order.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrColumn {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl AttrColumn {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned map from key to column. Length checks live on
/// [`Network`](crate::Network), which knows the vertex count.
#[derive(Debug, Clone, Default)]
pub(crate) struct AttributeStore {
    columns: HashMap<AttrKey, AttrColumn>,
}

impl AttributeStore {
    pub(crate) fn insert(&mut self, key: AttrKey, column: AttrColumn) {
        self.columns.insert(key, column);
    }

    pub(crate) fn get(&self, key: &AttrKey) -> Option<&AttrColumn> {
        self.columns.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &AttrKey) -> Option<&mut AttrColumn> {
        self.columns.get_mut(key)
    }

    pub(crate) fn contains(&self, key: &AttrKey) -> bool {
        self.columns.contains_key(key)
    }

    pub(crate) fn remove(&mut self, key: &AttrKey) -> Option<AttrColumn> {
        self.columns.remove(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &AttrKey> {
        self.columns.keys()
    }
}
