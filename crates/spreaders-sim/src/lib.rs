#![forbid(unsafe_code)]
//! spreaders-sim library.
//!
//! Discrete-time stochastic SIR epidemics on a [`Network`], used to measure
//! how far an outbreak started from a seed set eventually reaches.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Overview
//!
//! ```text
//! SirConfig ──┐
//! Network ────┼─▶ Sir::run()  ─▶ Realization (trace, attack rate, peak)
//! seed set ───┘        │
//!                      └─ simulate(mc) ─▶ MonteCarloSummary (mean spread,
//!                                          averaged trace)
//! ```
//!
//! [`Network`]: spreaders_core::Network

pub mod config;
pub mod monte_carlo;
pub mod sir;
pub mod threshold;

pub use config::SirConfig;
pub use monte_carlo::{AveragedRecord, MonteCarloSummary, simulate};
pub use sir::{Health, Realization, Sir, TraceRecord};
pub use threshold::epidemic_threshold;
