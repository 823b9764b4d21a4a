#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Investment metrics input, output, and cost assumption types.
//!
//! Field names serialize in camelCase so presentation layers receive the
//! same keys the listing screens have always rendered.

use serde::{Deserialize, Serialize};

/// POT applied when neither the operator nor a zone supplies one.
pub const DEFAULT_POT: f64 = 15.0;

/// CUT applied when neither the operator nor a zone supplies one.
pub const DEFAULT_CUT: f64 = 0.2;

/// Raw per-parcel inputs to the metrics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInputs {
    /// Parcel land area in square meters. Must be positive.
    pub area_square_meters: f64,
    /// Acquisition price. Must not be negative.
    pub acquisition_price: f64,
    /// Land-use ratio as a percentage (0-100).
    pub pot: f64,
    /// Floor-area ratio.
    pub cut: f64,
}

impl PropertyInputs {
    /// Inputs with the default POT and CUT.
    #[must_use]
    pub const fn new(area_square_meters: f64, acquisition_price: f64) -> Self {
        Self {
            area_square_meters,
            acquisition_price,
            pot: DEFAULT_POT,
            cut: DEFAULT_CUT,
        }
    }

    /// Overrides the POT.
    #[must_use]
    pub const fn with_pot(mut self, pot: f64) -> Self {
        self.pot = pot;
        self
    }

    /// Overrides the CUT.
    #[must_use]
    pub const fn with_cut(mut self, cut: f64) -> Self {
        self.cut = cut;
        self
    }
}

/// Derived investment figures for one parcel.
///
/// A read-only snapshot, recomputed from [`PropertyInputs`] on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentMetrics {
    /// Parcel land area (m²).
    pub total_land: f64,
    /// Buildable footprint (m²).
    pub land_occupation: f64,
    /// Total permitted built floor area (m²).
    pub usage_coefficient: f64,
    /// Land left unbuilt (m²).
    pub unoccupied_land: f64,
    /// Acquisition price per m² of land.
    pub price_per_square_meter: f64,
    /// Construction cost per m² of floor area.
    pub construction_cost_per_square_meter: f64,
    /// Construction cost for the full permitted floor area.
    pub total_construction_cost: f64,
    /// Construction plus acquisition.
    pub total_investment_cost: f64,
    /// Break-even price per m² including the markup.
    pub selling_price_per_square_meter: f64,
    /// Reference market price per m².
    pub market_selling_price_per_square_meter: f64,
    /// Market price minus computed selling price, per m².
    pub profit_difference: f64,
}

/// Constants of the metrics pipeline.
///
/// Defaults are the figures the business has always used; a TOML file may
/// override any subset of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CostAssumptions {
    /// Construction cost per m² of floor area.
    pub construction_cost_per_square_meter: f64,
    /// Reference market selling price per m².
    pub market_selling_price_per_square_meter: f64,
    /// Multiplier applied to the total investment cost to get the selling
    /// price.
    pub selling_markup: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            construction_cost_per_square_meter: 1000.0,
            market_selling_price_per_square_meter: 2800.0,
            selling_markup: 1.3,
        }
    }
}
