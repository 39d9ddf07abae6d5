//! # Mega-Sena Stats
//!
//! Draw-history statistics and a statistics-biased game generator for the
//! Mega-Sena lottery (6 numbers out of 60).
//!
//! ## Architecture
//!
//! - **models**: Core data structures (draws, snapshots, selections)
//! - **calculate**: Frequency, last-seen and hot/cold/overdue rankings
//! - **generate**: Uniform and statistics-biased game generation
//! - **fetch**: Single-attempt HTTP download of the history
//! - **source**: Draw history sources (HTTP, local file)
//! - **provider**: Loading with a degraded fallback mode
//! - **display**: Terminal rendering and ball-by-ball reveal
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod display;
pub mod fetch;
pub mod generate;
pub mod models;
pub mod provider;
pub mod source;

pub use models::*;
