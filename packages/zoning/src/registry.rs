//! In-memory catalog of zones keyed by name.
//!
//! The registry keeps zones in registration order. That order is the
//! priority used by [`crate::resolver::ZoneResolver`] when polygons
//! overlap, so replacing a zone keeps the slot of the zone it replaces.

use std::collections::BTreeMap;

use parcel_map_zoning_models::ZoneFilter;

use crate::{Zone, ZoningError};

/// How [`ZoneRegistry::register`] treats a name that is already present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrationMode {
    /// Replace the existing zone, keeping its registration slot.
    #[default]
    Replace,
    /// Fail with [`ZoningError::DuplicateZone`].
    Strict,
}

/// Catalog of zones, looked up by exact name or iterated in registration
/// order.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    index: BTreeMap<String, usize>,
}

impl ZoneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `zone` under its name.
    ///
    /// Returns the zone it replaced, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ZoningError::DuplicateZone`] if the name is taken and
    /// `mode` is [`RegistrationMode::Strict`].
    pub fn register(
        &mut self,
        zone: Zone,
        mode: RegistrationMode,
    ) -> Result<Option<Zone>, ZoningError> {
        if let Some(&slot) = self.index.get(&zone.name) {
            if mode == RegistrationMode::Strict {
                return Err(ZoningError::DuplicateZone { name: zone.name });
            }
            log::warn!("Replacing zone '{}'", zone.name);
            let replaced = std::mem::replace(&mut self.zones[slot], zone);
            return Ok(Some(replaced));
        }

        self.index.insert(zone.name.clone(), self.zones.len());
        self.zones.push(zone);
        Ok(None)
    }

    /// Exact, case-sensitive lookup by zone name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Zone> {
        self.index.get(name).map(|&slot| &self.zones[slot])
    }

    /// Zone at a registration slot.
    pub(crate) fn at(&self, slot: usize) -> Option<&Zone> {
        self.zones.get(slot)
    }

    /// All zones in registration order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &Zone> + '_ {
        self.zones.iter()
    }

    /// Case-insensitive substring search over zone names.
    ///
    /// An empty fragment matches every zone.
    pub fn search<'a>(&'a self, fragment: &str) -> impl Iterator<Item = &'a Zone> + 'a {
        let needle = fragment.trim().to_lowercase();
        self.zones
            .iter()
            .filter(move |zone| zone.name.to_lowercase().contains(&needle))
    }

    /// Zones whose POT and CUT equal the filter's values.
    ///
    /// Zones missing a filtered value never match that filter.
    pub fn filter<'a>(&'a self, filter: &ZoneFilter) -> impl Iterator<Item = &'a Zone> + 'a {
        let filter = *filter;
        self.zones.iter().filter(move |zone| {
            matches_value(filter.pot, zone.pot) && matches_value(filter.cut, zone.cut)
        })
    }

    /// Number of registered zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[allow(clippy::float_cmp)]
fn matches_value(wanted: Option<f64>, actual: Option<f64>) -> bool {
    wanted.is_none_or(|wanted| actual == Some(wanted))
}
