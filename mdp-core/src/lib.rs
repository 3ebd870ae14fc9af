//! Normalization and analytics for Potential Fishing Zone (PFZ) station records.
//!
//! Raw records arrive with inconsistent keys and loosely formatted numbers.
//! This crate turns them into map points, depth scatter series, display rows
//! and CSV, and tracks the fetch lifecycle that supplies them.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod export;
pub mod fallback;
pub mod fetch;
pub mod fields;
pub mod filter;
pub mod map;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod series;
pub mod table;
