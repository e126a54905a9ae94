#![forbid(unsafe_code)]
//! spreaders-rank library.
//!
//! Scores vertices by their expected capacity to spread a contagion and
//! selects bounded-size seed sets.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Modules
//!
//! - [`influence`]: radius-bounded, distance-weighted local influence `G`.
//! - [`pbsi`]: community-proportional spreader identification.
//! - [`iks`]: k-shell entropy selection.
//! - [`voterank`]: iterative vote ranking.
//! - [`hybrid`]: eccentricity × neighbor-coreness score.
//! - [`sc_core`]: similarity-weighted edge score.
//! - [`basic`]: degree baseline and seed-set dispersion.
//! - [`select`]: spreader records, priorities, and top-k selection.

pub mod basic;
pub mod hybrid;
pub mod iks;
pub mod influence;
pub mod pbsi;
pub mod sc_core;
pub mod select;
pub mod voterank;

pub use select::{Spreader, top_k};
