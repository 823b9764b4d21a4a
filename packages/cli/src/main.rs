#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the parcel map toolchain.
//!
//! Lists and exports zones, resolves coordinates to the governing zone,
//! appraises parcels, prefills inputs from listing text, and enriches
//! listing descriptions with the configured LLM.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use parcel_map_enrichment::cache::DescriptionEnrichmentCache;
use parcel_map_enrichment::openai::create_generator_from_env;
use parcel_map_investment::appraisal::{PropertyRequest, appraise};
use parcel_map_investment::listing::{extract_area_square_meters, extract_postal_address};
use parcel_map_investment_models::CostAssumptions;
use parcel_map_zoning::catalog::{load_catalog_json, seed_registry};
use parcel_map_zoning::geojson_export::to_feature_collection;
use parcel_map_zoning::registry::ZoneRegistry;
use parcel_map_zoning::resolver::ZoneResolver;
use parcel_map_zoning::{GeoPoint, Zone};
use parcel_map_zoning_models::ZoneFilter;

#[derive(Parser)]
#[command(name = "parcel_map", about = "Zoning lookup and parcel investment tool")]
struct Cli {
    /// Zone catalog JSON to load instead of the built-in Bucharest catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List zones, optionally filtered by exact POT/CUT or a name fragment
    Zones {
        /// Only zones with exactly this POT
        #[arg(long)]
        pot: Option<f64>,
        /// Only zones with exactly this CUT
        #[arg(long)]
        cut: Option<f64>,
        /// Case-insensitive name fragment
        #[arg(long)]
        search: Option<String>,
        /// Print a `GeoJSON` `FeatureCollection` instead of a table
        #[arg(long)]
        geojson: bool,
    },
    /// Find the zone governing a coordinate, or look one up by name
    Resolve {
        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", conflicts_with = "name")]
        lat: Option<f64>,
        /// Longitude in decimal degrees
        #[arg(long, requires = "lat", conflicts_with = "name")]
        lon: Option<f64>,
        /// Exact zone name
        #[arg(long, required_unless_present = "lat")]
        name: Option<String>,
    },
    /// Compute investment metrics for a parcel
    Appraise {
        /// Land area in square meters
        #[arg(long)]
        area: f64,
        /// Acquisition price
        #[arg(long)]
        price: f64,
        /// POT to use when no zone applies (default 15)
        #[arg(long)]
        pot: Option<f64>,
        /// CUT to use when no zone applies (default 0.2)
        #[arg(long)]
        cut: Option<f64>,
        /// Parcel latitude
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        /// Parcel longitude
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
        /// Zone name from the listing
        #[arg(long)]
        zone: Option<String>,
        /// TOML file overriding construction cost, market price, and markup
        #[arg(long)]
        assumptions: Option<PathBuf>,
    },
    /// Pull the land area and postal address out of a listing description
    Extract {
        /// File holding the listing description (text or HTML)
        file: PathBuf,
    },
    /// Format a listing description as markdown with the configured LLM
    Enrich {
        /// File holding the listing description
        file: PathBuf,
        /// Listing identifier (defaults to the file name)
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Zones {
            pot,
            cut,
            search,
            geojson,
        } => {
            let registry = load_registry(cli.catalog.as_deref())?;
            let filter = ZoneFilter { pot, cut };
            let zones = select_zones(&registry, &filter, search.as_deref());

            if geojson {
                let collection = to_feature_collection(zones);
                println!("{}", serde_json::to_string_pretty(&collection)?);
            } else {
                print_zone_table(&zones);
            }
        }
        Commands::Resolve { lat, lon, name } => {
            let resolver = ZoneResolver::new(load_registry(cli.catalog.as_deref())?);
            let zone = match (lat, lon, name.as_deref()) {
                (Some(lat), Some(lon), _) => resolver.resolve(GeoPoint::new(lat, lon)),
                (_, _, Some(name)) => resolver.resolve(name),
                _ => None,
            };

            match zone {
                Some(zone) => println!("{}", serde_json::to_string_pretty(&zone_summary(zone))?),
                None => println!("No zone matched"),
            }
        }
        Commands::Appraise {
            area,
            price,
            pot,
            cut,
            lat,
            lon,
            zone,
            assumptions,
        } => {
            let resolver = ZoneResolver::new(load_registry(cli.catalog.as_deref())?);
            let assumptions = match assumptions {
                Some(path) => {
                    let toml_str = std::fs::read_to_string(&path)?;
                    log::info!("Loaded cost assumptions from {}", path.display());
                    parcel_map_investment::assumptions_from_toml(&toml_str)?
                }
                None => CostAssumptions::default(),
            };

            let request = PropertyRequest {
                area_square_meters: area,
                acquisition_price: price,
                location: lat.zip(lon).map(|(lat, lon)| GeoPoint::new(lat, lon)),
                zone_hint: zone,
                pot,
                cut,
            };

            let appraisal = appraise(&resolver, &request, &assumptions);
            println!("{}", serde_json::to_string_pretty(&appraisal)?);
        }
        Commands::Extract { file } => {
            let text = std::fs::read_to_string(&file)?;
            let extracted = serde_json::json!({
                "areaSquareMeters": extract_area_square_meters(&text),
                "postalAddress": extract_postal_address(&text),
            });
            println!("{}", serde_json::to_string_pretty(&extracted)?);
        }
        Commands::Enrich { file, id } => {
            let raw = std::fs::read_to_string(&file)?;
            let id = id.unwrap_or_else(|| listing_id_from_path(&file));
            let generator = create_generator_from_env()?;
            let cache = DescriptionEnrichmentCache::new();

            match cache.ensure_enriched(&id, &raw, &generator).await {
                Ok(markdown) => println!("{markdown}"),
                Err(e) => {
                    log::error!("Error generating markdown for {id}: {e}");
                    println!("{}", raw.trim());
                }
            }
        }
    }

    Ok(())
}

fn load_registry(catalog: Option<&Path>) -> Result<ZoneRegistry, Box<dyn std::error::Error>> {
    let Some(path) = catalog else {
        return Ok(seed_registry());
    };

    let json = std::fs::read_to_string(path)?;
    let registry = load_catalog_json(&json)?;
    log::info!("Loaded {} zones from {}", registry.len(), path.display());
    Ok(registry)
}

/// Zones matching both the POT/CUT filter and the name fragment, in
/// registration order.
fn select_zones<'a>(
    registry: &'a ZoneRegistry,
    filter: &ZoneFilter,
    search: Option<&str>,
) -> Vec<&'a Zone> {
    let named: BTreeSet<&str> = registry
        .search(search.unwrap_or_default())
        .map(|zone| zone.name.as_str())
        .collect();

    registry
        .filter(filter)
        .filter(|zone| named.contains(zone.name.as_str()))
        .collect()
}

fn print_zone_table(zones: &[&Zone]) {
    println!("{:<24} {:>6} {:>6}  DOCUMENT", "NAME", "POT", "CUT");
    println!("{}", "-".repeat(60));
    for zone in zones {
        println!(
            "{:<24} {:>6} {:>6}  {}",
            zone.name,
            format_optional(zone.pot),
            format_optional(zone.cut),
            zone.document_ref.as_deref().unwrap_or("-"),
        );
    }
    println!();
    println!("{} zone(s)", zones.len());
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Zone fields without the boundary, for terminal output.
fn zone_summary(zone: &Zone) -> serde_json::Value {
    serde_json::json!({
        "name": zone.name,
        "pot": zone.pot,
        "cut": zone.cut,
        "restrictions": zone.restrictions,
        "documentRef": zone.document_ref,
        "vertices": zone.boundary.vertices().len(),
    })
}

fn listing_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}
