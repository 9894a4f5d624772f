//! Static listing catalogue.
//!
//! The baseline catalogue ships inside the binary (`config/listings.yaml`).
//! At startup it can be replaced wholesale by a previously-persisted snapshot
//! file. After that the collection is read-only and passed explicitly to the
//! reconciler; there is no mutable global.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, SourceTier};
use crate::ConfigError;

/// Display-only placeholder row sometimes present in exported snapshots.
/// It invites shop owners to register and must never reach the reconciler.
pub const PLACEHOLDER_LISTING_NAME: &str = "Your shop here";

const BUNDLED_CATALOG: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/listings.yaml"));

#[derive(Debug, Deserialize)]
struct CatalogFile {
    listings: Vec<CatalogEntry>,
}

/// One catalogue row as stored on disk. Identical to [`Listing`] minus the
/// source tier, which is always `Static` for catalogue data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl CatalogEntry {
    fn into_listing(self) -> Listing {
        Listing {
            id: self.id,
            name: self.name,
            address: self.address,
            city: self.city,
            latitude: self.latitude,
            longitude: self.longitude,
            // Treat empty string as absent.
            place_id: self.place_id.filter(|s| !s.trim().is_empty()),
            source: SourceTier::Static,
        }
    }
}

/// Parse and validate catalogue YAML (a JSON snapshot also parses, since JSON is
/// a YAML subset).
///
/// # Errors
///
/// Returns `ConfigError` if the content cannot be parsed or ids collide.
fn parse_catalog(content: &str) -> Result<Vec<Listing>, ConfigError> {
    let file: CatalogFile = serde_yaml::from_str(content).map_err(ConfigError::CatalogParse)?;
    validate_entries(&file.listings)?;

    let listings = file
        .listings
        .into_iter()
        .filter(|entry| !is_placeholder(&entry.name))
        .map(CatalogEntry::into_listing)
        .collect();
    Ok(listings)
}

fn is_placeholder(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(PLACEHOLDER_LISTING_NAME)
}

fn validate_entries(entries: &[CatalogEntry]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "listing id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(entry.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate listing id: '{}'",
                entry.id
            )));
        }
    }
    Ok(())
}

/// The catalogue bundled at build time.
///
/// # Errors
///
/// Returns `ConfigError` if the bundled file fails to parse: a packaging
/// defect, surfaced at startup rather than papered over.
pub fn bundled_catalog() -> Result<Vec<Listing>, ConfigError> {
    parse_catalog(BUNDLED_CATALOG)
}

/// Load a catalogue (or persisted snapshot) from a file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_catalog(path: &Path) -> Result<Vec<Listing>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog(&content)
}

/// Resolve the static listing set for this process: the persisted snapshot
/// when one is configured and readable, otherwise the bundled catalogue.
///
/// A configured-but-broken snapshot is logged and ignored; the snapshot is
/// an opportunistic cache, and static-only service is the accepted worst
/// case.
///
/// # Errors
///
/// Returns `ConfigError` only if the bundled catalogue itself is invalid.
pub fn resolve_static_listings(snapshot_path: Option<&Path>) -> Result<Vec<Listing>, ConfigError> {
    if let Some(path) = snapshot_path {
        match load_catalog(path) {
            Ok(listings) => {
                tracing::info!(
                    path = %path.display(),
                    count = listings.len(),
                    "static catalogue overridden by persisted snapshot"
                );
                return Ok(listings);
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "snapshot unusable; falling back to bundled catalogue"
                );
            }
        }
    }
    bundled_catalog()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
listings:
  - id: s1
    name: Green Garden
    address: 12 Rue de la Roquette
    city: Paris
    latitude: 48.8558
    longitude: 2.3712
    place_id: ChIJgg111
  - id: s2
    name: Herbal House
    city: Lyon
";

    #[test]
    fn parse_catalog_maps_entries_to_static_listings() {
        let listings = parse_catalog(SAMPLE).expect("sample should parse");
        assert_eq!(listings.len(), 2);
        assert!(listings.iter().all(|l| l.source == SourceTier::Static));
        assert_eq!(listings[0].place_id.as_deref(), Some("ChIJgg111"));
        assert_eq!(listings[1].address, "");
        assert!(listings[1].latitude.is_none());
    }

    #[test]
    fn parse_catalog_rejects_duplicate_ids() {
        let yaml = r"
listings:
  - id: s1
    name: First
  - id: s1
    name: Second
";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate listing id"));
    }

    #[test]
    fn parse_catalog_rejects_empty_id() {
        let yaml = r"
listings:
  - id: ''
    name: Nameless
";
        let err = parse_catalog(yaml).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn parse_catalog_filters_display_only_placeholder() {
        let yaml = r"
listings:
  - id: s1
    name: Green Garden
  - id: promo
    name: YOUR SHOP HERE
";
        let listings = parse_catalog(yaml).expect("should parse");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "s1");
    }

    #[test]
    fn parse_catalog_normalizes_empty_place_id() {
        let yaml = r"
listings:
  - id: s1
    name: Green Garden
    place_id: '  '
";
        let listings = parse_catalog(yaml).expect("should parse");
        assert!(listings[0].place_id.is_none());
    }

    #[test]
    fn bundled_catalog_parses_and_is_non_empty() {
        let listings = bundled_catalog().expect("bundled catalogue must parse");
        assert!(!listings.is_empty());
        let ids: HashSet<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), listings.len(), "bundled ids must be unique");
    }

    #[test]
    fn resolve_without_snapshot_uses_bundled() {
        let bundled = bundled_catalog().expect("bundled");
        let resolved = resolve_static_listings(None).expect("resolve");
        assert_eq!(resolved.len(), bundled.len());
    }

    #[test]
    fn resolve_with_missing_snapshot_falls_back_to_bundled() {
        let resolved =
            resolve_static_listings(Some(Path::new("/nonexistent/leafdex-snapshot.yaml")))
                .expect("resolve should fall back");
        assert_eq!(
            resolved.len(),
            bundled_catalog().expect("bundled").len()
        );
    }

    #[test]
    fn resolve_with_snapshot_overrides_bundled() {
        let path = std::env::temp_dir().join("leafdex-catalog-test-snapshot.yaml");
        std::fs::write(&path, SAMPLE).expect("write temp snapshot");
        let resolved = resolve_static_listings(Some(&path)).expect("resolve");
        std::fs::remove_file(&path).ok();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id, "s1");
    }
}
