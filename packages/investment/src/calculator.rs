//! The investment metrics pipeline.
//!
//! Every screen that shows parcel figures goes through [`compute`] so the
//! formula exists exactly once. Inputs that would divide by zero or carry a
//! non-finite value are rejected with [`MetricsError::DegenerateInput`]
//! instead of letting `Infinity`/`NaN` reach a display.

use parcel_map_investment_models::{CostAssumptions, InvestmentMetrics, PropertyInputs};

use crate::MetricsError;

/// Computes the metrics with the default [`CostAssumptions`].
///
/// # Errors
///
/// Returns [`MetricsError::DegenerateInput`] if the land area or usage
/// coefficient is zero, POT is outside `0..=100`, or any input is negative
/// or non-finite.
pub fn compute(inputs: &PropertyInputs) -> Result<InvestmentMetrics, MetricsError> {
    compute_with(inputs, &CostAssumptions::default())
}

/// Computes the metrics with explicit cost assumptions.
///
/// # Errors
///
/// Returns [`MetricsError::DegenerateInput`] if the land area or usage
/// coefficient is zero, POT is outside `0..=100`, any input is negative,
/// any input or assumption is non-finite, or any resulting figure
/// overflows.
pub fn compute_with(
    inputs: &PropertyInputs,
    assumptions: &CostAssumptions,
) -> Result<InvestmentMetrics, MetricsError> {
    require_finite("area", inputs.area_square_meters)?;
    require_finite("acquisition price", inputs.acquisition_price)?;
    require_finite("POT", inputs.pot)?;
    require_finite("CUT", inputs.cut)?;
    require_finite(
        "construction cost",
        assumptions.construction_cost_per_square_meter,
    )?;
    require_finite(
        "market selling price",
        assumptions.market_selling_price_per_square_meter,
    )?;
    require_finite("selling markup", assumptions.selling_markup)?;

    if inputs.area_square_meters <= 0.0 {
        return Err(degenerate(format!(
            "land area must be positive, got {}",
            inputs.area_square_meters
        )));
    }
    if inputs.acquisition_price < 0.0 {
        return Err(degenerate(format!(
            "acquisition price must not be negative, got {}",
            inputs.acquisition_price
        )));
    }
    if !(0.0..=100.0).contains(&inputs.pot) {
        return Err(degenerate(format!(
            "POT must be a percentage between 0 and 100, got {}",
            inputs.pot
        )));
    }
    if inputs.cut <= 0.0 {
        return Err(degenerate(format!(
            "usage coefficient is zero or negative (CUT {})",
            inputs.cut
        )));
    }

    let total_land = inputs.area_square_meters;
    let land_occupation = (inputs.pot / 100.0) * total_land;
    let usage_coefficient = inputs.cut * total_land;
    if usage_coefficient == 0.0 {
        return Err(degenerate("usage coefficient is zero".to_string()));
    }
    let unoccupied_land = total_land - land_occupation;
    let price_per_square_meter = inputs.acquisition_price / total_land;
    let construction_cost_per_square_meter = assumptions.construction_cost_per_square_meter;
    let total_construction_cost = construction_cost_per_square_meter * usage_coefficient;
    let total_investment_cost = total_construction_cost + inputs.acquisition_price;
    let selling_price_per_square_meter =
        (total_investment_cost * assumptions.selling_markup) / usage_coefficient;
    let market_selling_price_per_square_meter = assumptions.market_selling_price_per_square_meter;
    let profit_difference = market_selling_price_per_square_meter - selling_price_per_square_meter;

    let metrics = InvestmentMetrics {
        total_land,
        land_occupation,
        usage_coefficient,
        unoccupied_land,
        price_per_square_meter,
        construction_cost_per_square_meter,
        total_construction_cost,
        total_investment_cost,
        selling_price_per_square_meter,
        market_selling_price_per_square_meter,
        profit_difference,
    };

    // Finite inputs can still overflow.
    require_all_finite(&metrics)?;

    Ok(metrics)
}

fn require_all_finite(metrics: &InvestmentMetrics) -> Result<(), MetricsError> {
    for (field, value) in [
        ("total land", metrics.total_land),
        ("land occupation", metrics.land_occupation),
        ("usage coefficient", metrics.usage_coefficient),
        ("unoccupied land", metrics.unoccupied_land),
        ("price per square meter", metrics.price_per_square_meter),
        (
            "construction cost",
            metrics.construction_cost_per_square_meter,
        ),
        ("total construction cost", metrics.total_construction_cost),
        ("total investment cost", metrics.total_investment_cost),
        ("selling price", metrics.selling_price_per_square_meter),
        (
            "market selling price",
            metrics.market_selling_price_per_square_meter,
        ),
        ("profit difference", metrics.profit_difference),
    ] {
        require_finite(field, value)?;
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), MetricsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(degenerate(format!("{field} is not a finite number ({value})")))
    }
}

fn degenerate(reason: String) -> MetricsError {
    MetricsError::DegenerateInput { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn reference_inputs() -> PropertyInputs {
        PropertyInputs {
            area_square_meters: 1000.0,
            acquisition_price: 100_000.0,
            pot: 15.0,
            cut: 0.2,
        }
    }

    #[test]
    fn reference_scenario() {
        let metrics = compute(&reference_inputs()).unwrap();

        close(metrics.total_land, 1000.0);
        close(metrics.land_occupation, 150.0);
        close(metrics.usage_coefficient, 200.0);
        close(metrics.unoccupied_land, 850.0);
        close(metrics.price_per_square_meter, 100.0);
        close(metrics.construction_cost_per_square_meter, 1000.0);
        close(metrics.total_construction_cost, 200_000.0);
        close(metrics.total_investment_cost, 300_000.0);
        close(metrics.selling_price_per_square_meter, 1950.0);
        close(metrics.market_selling_price_per_square_meter, 2800.0);
        close(metrics.profit_difference, 850.0);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let inputs = PropertyInputs {
            area_square_meters: 733.3,
            acquisition_price: 187_654.21,
            pot: 65.0,
            cut: 2.5,
        };
        let first = compute(&inputs).unwrap();
        for _ in 0..5 {
            let again = compute(&inputs).unwrap();
            assert_eq!(
                again.profit_difference.to_bits(),
                first.profit_difference.to_bits()
            );
            assert_eq!(again, first);
        }
    }

    #[test]
    fn zero_area_is_degenerate() {
        let inputs = PropertyInputs {
            area_square_meters: 0.0,
            ..reference_inputs()
        };
        assert!(matches!(
            compute(&inputs),
            Err(MetricsError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn zero_cut_is_degenerate() {
        let inputs = PropertyInputs {
            cut: 0.0,
            ..reference_inputs()
        };
        assert!(matches!(
            compute(&inputs),
            Err(MetricsError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn non_finite_and_negative_inputs_are_degenerate() {
        for inputs in [
            PropertyInputs {
                area_square_meters: f64::NAN,
                ..reference_inputs()
            },
            PropertyInputs {
                acquisition_price: f64::INFINITY,
                ..reference_inputs()
            },
            PropertyInputs {
                area_square_meters: -10.0,
                ..reference_inputs()
            },
            PropertyInputs {
                acquisition_price: -1.0,
                ..reference_inputs()
            },
            PropertyInputs {
                cut: -0.5,
                ..reference_inputs()
            },
        ] {
            assert!(compute(&inputs).is_err(), "{inputs:?} should be rejected");
        }
    }

    #[test]
    fn overflowing_inputs_are_degenerate() {
        let inputs = PropertyInputs {
            area_square_meters: f64::MAX,
            cut: 10.0,
            ..reference_inputs()
        };
        assert!(compute(&inputs).is_err());
    }

    #[test]
    fn pot_outside_percentage_range_is_degenerate() {
        for pot in [150.0, -20.0, 1e305] {
            let inputs = PropertyInputs {
                area_square_meters: 1e10,
                acquisition_price: 0.0,
                pot,
                cut: 0.2,
            };
            assert!(
                matches!(compute(&inputs), Err(MetricsError::DegenerateInput { .. })),
                "POT {pot} should be rejected"
            );
        }
    }

    #[test]
    fn pot_range_endpoints_are_allowed() {
        let empty = compute(&PropertyInputs {
            pot: 0.0,
            ..reference_inputs()
        })
        .unwrap();
        close(empty.land_occupation, 0.0);
        close(empty.unoccupied_land, 1000.0);

        let full = compute(&PropertyInputs {
            pot: 100.0,
            ..reference_inputs()
        })
        .unwrap();
        close(full.land_occupation, 1000.0);
        close(full.unoccupied_land, 0.0);
    }

    #[test]
    fn huge_area_overflowing_any_field_is_degenerate() {
        let inputs = PropertyInputs {
            area_square_meters: f64::MAX,
            acquisition_price: 0.0,
            pot: 100.0,
            cut: 0.2,
        };
        assert!(compute(&inputs).is_err());
    }

    #[test]
    fn zero_price_is_allowed() {
        let inputs = PropertyInputs {
            acquisition_price: 0.0,
            ..reference_inputs()
        };
        let metrics = compute(&inputs).unwrap();
        close(metrics.price_per_square_meter, 0.0);
        close(metrics.selling_price_per_square_meter, 1300.0);
    }

    #[test]
    fn custom_assumptions_replace_constants() {
        let assumptions = CostAssumptions {
            construction_cost_per_square_meter: 1200.0,
            market_selling_price_per_square_meter: 3000.0,
            selling_markup: 1.0,
        };
        let metrics = compute_with(&reference_inputs(), &assumptions).unwrap();
        close(metrics.total_construction_cost, 240_000.0);
        close(metrics.total_investment_cost, 340_000.0);
        close(metrics.selling_price_per_square_meter, 1700.0);
        close(metrics.profit_difference, 1300.0);
    }
}
