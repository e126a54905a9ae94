#![forbid(unsafe_code)]
//! spreaders-core library.
//!
//! The network model every ranking algorithm and the epidemic simulator
//! operate on.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`GraphError`] via `thiserror`; higher crates wrap it
//!   in `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Overview
//!
//! ```text
//! Network (petgraph DiGraph + directed flag + name index)
//!   ├─ attr        typed per-vertex attribute columns (AttrKey → column)
//!   ├─ components  weak connected components
//!   ├─ coreness    k-shell decomposition
//!   ├─ community   multilevel Louvain partition
//!   └─ paths       BFS distances, eccentricity, bounded simple paths
//! ```

pub mod attr;
pub mod community;
pub mod components;
pub mod coreness;
pub mod error;
pub mod network;
pub mod paths;

pub use attr::{AttrColumn, AttrKey, Ranking};
pub use community::{LouvainConfig, Partition};
pub use error::GraphError;
pub use network::{NeighborMode, Network, VertexId};
