#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Deterministic real-estate investment metrics for land parcels.
//!
//! Turns a parcel's area, acquisition price, POT, and CUT into the fixed
//! set of figures shown on every listing screen, and wires that pipeline to
//! zone resolution so a parcel's regulations come from the zone governing
//! it.

pub mod appraisal;
pub mod calculator;
pub mod listing;

use parcel_map_investment_models::CostAssumptions;
use thiserror::Error;

/// Errors that can occur while computing investment metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The inputs cannot produce finite metrics (zero land area, zero usage
    /// coefficient, negative or non-finite values).
    #[error("Degenerate input: {reason}")]
    DegenerateInput {
        /// What made the inputs unusable.
        reason: String,
    },

    /// A cost assumptions file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Parses [`CostAssumptions`] from TOML.
///
/// Missing keys keep their defaults, so an empty document yields
/// [`CostAssumptions::default`].
///
/// # Errors
///
/// Returns [`MetricsError::Config`] if the TOML is malformed or a value has
/// the wrong type.
pub fn assumptions_from_toml(toml_str: &str) -> Result<CostAssumptions, MetricsError> {
    Ok(toml::de::from_str(toml_str)?)
}
