//! End-to-end parcel appraisal: zone lookup, regulation merge, metrics.

use parcel_map_investment_models::{
    CostAssumptions, DEFAULT_CUT, DEFAULT_POT, InvestmentMetrics, PropertyInputs,
};
use parcel_map_zoning::resolver::ZoneResolver;
use parcel_map_zoning::{GeoPoint, Zone};
use serde::Serialize;

use crate::calculator::compute_with;

/// A parcel to appraise, as supplied by a listing or validation screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRequest {
    /// Land area in square meters.
    pub area_square_meters: f64,
    /// Acquisition price.
    pub acquisition_price: f64,
    /// Parcel location, if geocoded.
    pub location: Option<GeoPoint>,
    /// Zone name from the listing, used when the location matches no zone
    /// or is unknown.
    pub zone_hint: Option<String>,
    /// Operator-entered POT, used when no zone supplies one.
    pub pot: Option<f64>,
    /// Operator-entered CUT, used when no zone supplies one.
    pub cut: Option<f64>,
}

/// Outcome of [`appraise`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appraisal {
    /// Name of the governing zone, if one was found.
    pub zone: Option<String>,
    /// Inputs after merging the zone's regulations.
    pub inputs: PropertyInputs,
    /// Derived figures, or `None` when the inputs are degenerate.
    pub metrics: Option<InvestmentMetrics>,
    /// Why `metrics` is missing.
    pub unavailable_reason: Option<String>,
}

/// Overlays a zone's POT/CUT onto `inputs`.
///
/// Regulations the zone does not define leave the caller's values in place.
#[must_use]
pub fn apply_zone(inputs: PropertyInputs, zone: &Zone) -> PropertyInputs {
    PropertyInputs {
        pot: zone.pot.unwrap_or(inputs.pot),
        cut: zone.cut.unwrap_or(inputs.cut),
        ..inputs
    }
}

/// Resolves the governing zone, merges its regulations into the request,
/// and computes the metrics.
///
/// Never fails: a missing zone keeps the request's (or default) POT/CUT,
/// and degenerate inputs produce an appraisal without metrics.
#[must_use]
pub fn appraise(
    resolver: &ZoneResolver,
    request: &PropertyRequest,
    assumptions: &CostAssumptions,
) -> Appraisal {
    let hint = request.zone_hint.as_deref();
    let zone = match request.location {
        Some(point) => resolver.resolve_with_hint(point, hint),
        None => hint.and_then(|name| resolver.resolve(name)),
    };

    let base = PropertyInputs {
        area_square_meters: request.area_square_meters,
        acquisition_price: request.acquisition_price,
        pot: request.pot.unwrap_or(DEFAULT_POT),
        cut: request.cut.unwrap_or(DEFAULT_CUT),
    };

    let inputs = match zone {
        Some(zone) => {
            log::debug!("Parcel governed by zone '{}'", zone.name);
            apply_zone(base, zone)
        }
        None => {
            log::debug!("No governing zone found; keeping POT/CUT defaults");
            base
        }
    };

    let (metrics, unavailable_reason) = match compute_with(&inputs, assumptions) {
        Ok(metrics) => (Some(metrics), None),
        Err(e) => {
            log::warn!("Metrics unavailable: {e}");
            (None, Some(e.to_string()))
        }
    };

    Appraisal {
        zone: zone.map(|z| z.name.clone()),
        inputs,
        metrics,
        unavailable_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_map_zoning::catalog::seed_registry;

    fn resolver() -> ZoneResolver {
        ZoneResolver::new(seed_registry())
    }

    #[test]
    fn zone_regulations_override_request_values() {
        let request = PropertyRequest {
            area_square_meters: 1000.0,
            acquisition_price: 100_000.0,
            location: Some(GeoPoint::new(44.4432, 26.0959)),
            pot: Some(10.0),
            cut: Some(0.5),
            ..PropertyRequest::default()
        };

        let appraisal = appraise(&resolver(), &request, &CostAssumptions::default());

        assert_eq!(appraisal.zone.as_deref(), Some("Amzei"));
        assert!((appraisal.inputs.pot - 65.0).abs() < f64::EPSILON);
        assert!((appraisal.inputs.cut - 2.5).abs() < f64::EPSILON);

        let metrics = appraisal.metrics.unwrap();
        assert!((metrics.land_occupation - 650.0).abs() < 1e-9);
        assert!((metrics.usage_coefficient - 2500.0).abs() < 1e-9);
        assert!(appraisal.unavailable_reason.is_none());
    }

    #[test]
    fn falls_back_to_zone_hint() {
        let request = PropertyRequest {
            area_square_meters: 1000.0,
            acquisition_price: 100_000.0,
            location: Some(GeoPoint::new(44.40, 26.00)),
            zone_hint: Some("UCB".to_string()),
            ..PropertyRequest::default()
        };

        let appraisal = appraise(&resolver(), &request, &CostAssumptions::default());
        assert_eq!(appraisal.zone.as_deref(), Some("UCB"));
        assert!((appraisal.inputs.pot - 25.0).abs() < f64::EPSILON);
        assert!((appraisal.inputs.cut - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn name_only_request_resolves_by_name() {
        let request = PropertyRequest {
            area_square_meters: 400.0,
            acquisition_price: 40_000.0,
            zone_hint: Some("Blanc".to_string()),
            ..PropertyRequest::default()
        };

        let appraisal = appraise(&resolver(), &request, &CostAssumptions::default());
        assert_eq!(appraisal.zone.as_deref(), Some("Blanc"));
    }

    #[test]
    fn no_zone_keeps_defaults() {
        let request = PropertyRequest {
            area_square_meters: 1000.0,
            acquisition_price: 100_000.0,
            location: Some(GeoPoint::new(44.40, 26.00)),
            ..PropertyRequest::default()
        };

        let appraisal = appraise(&resolver(), &request, &CostAssumptions::default());
        assert!(appraisal.zone.is_none());
        assert!((appraisal.inputs.pot - DEFAULT_POT).abs() < f64::EPSILON);
        assert!((appraisal.inputs.cut - DEFAULT_CUT).abs() < f64::EPSILON);

        let metrics = appraisal.metrics.unwrap();
        assert!((metrics.profit_difference - 850.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inputs_yield_unavailable_metrics() {
        let request = PropertyRequest {
            area_square_meters: 0.0,
            acquisition_price: 100_000.0,
            ..PropertyRequest::default()
        };

        let appraisal = appraise(&resolver(), &request, &CostAssumptions::default());
        assert!(appraisal.metrics.is_none());
        assert!(appraisal.unavailable_reason.is_some());
    }

    #[test]
    fn apply_zone_keeps_values_the_zone_lacks() {
        let zone = Zone::new("Partial", parcel_map_zoning::GeoPolygon::new(vec![])).with_cut(1.8);
        let merged = apply_zone(PropertyInputs::new(100.0, 0.0).with_pot(30.0), &zone);
        assert!((merged.pot - 30.0).abs() < f64::EPSILON);
        assert!((merged.cut - 1.8).abs() < f64::EPSILON);
    }
}
