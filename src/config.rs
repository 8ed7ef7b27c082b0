//! Host configuration: catalog source, default device and result cap from the environment.

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::TriageError;
use crate::model::Platform;
use crate::rank::MAX_RESULTS;

/// Directory name under the platform config dir
const CONFIG_DIR: &str = "guide-triage";

/// Catalog file name looked up in the config dir
const CATALOG_FILE: &str = "catalog.json";

/// Where the host gets its catalog from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TriageConfig {
    pub catalog: CatalogSource,
    pub default_device: Option<Platform>,
    pub max_results: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSource::Builtin,
            default_device: None,
            max_results: MAX_RESULTS,
        }
    }
}

impl TriageConfig {
    /// Optional:
    /// - `GUIDE_TRIAGE_CATALOG` (path to a catalog JSON file)
    /// - `GUIDE_TRIAGE_DEVICE` (windows, macos, ios, android; anything else is ignored)
    /// - `GUIDE_TRIAGE_MAX_RESULTS` (1..=20)
    ///
    /// Without `GUIDE_TRIAGE_CATALOG`, `<config dir>/guide-triage/catalog.json`
    /// is used when it exists, else the compiled-in catalog.
    pub fn from_env() -> Result<Self, TriageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TriageError> {
        let catalog = match lookup("GUIDE_TRIAGE_CATALOG").filter(|p| !p.trim().is_empty()) {
            Some(path) => CatalogSource::File(PathBuf::from(path)),
            None => default_catalog_path()
                .filter(|p| p.exists())
                .map_or(CatalogSource::Builtin, CatalogSource::File),
        };

        let default_device = lookup("GUIDE_TRIAGE_DEVICE").and_then(|d| Platform::parse_lenient(&d));

        let max_results = match lookup("GUIDE_TRIAGE_MAX_RESULTS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_RESULTS).contains(&n) => n,
                _ => {
                    return Err(TriageError::Config(format!(
                        "GUIDE_TRIAGE_MAX_RESULTS must be between 1 and {}, got {:?}",
                        MAX_RESULTS, raw
                    )))
                }
            },
            None => MAX_RESULTS,
        };

        Ok(Self {
            catalog,
            default_device,
            max_results,
        })
    }

    /// Build the configured catalog
    pub fn load_catalog(&self) -> Result<Catalog, TriageError> {
        match &self.catalog {
            CatalogSource::Builtin => Ok(Catalog::builtin().clone()),
            CatalogSource::File(path) => Catalog::load(path),
        }
    }
}

/// `<config dir>/guide-triage/catalog.json`
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CATALOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_catalog_and_device() {
        let config = TriageConfig::from_lookup(lookup(&[
            ("GUIDE_TRIAGE_CATALOG", "/tmp/guides.json"),
            ("GUIDE_TRIAGE_DEVICE", "macOS"),
            ("GUIDE_TRIAGE_MAX_RESULTS", "5"),
        ]))
        .unwrap();
        assert_eq!(
            config.catalog,
            CatalogSource::File(PathBuf::from("/tmp/guides.json"))
        );
        assert_eq!(config.default_device, Some(Platform::Macos));
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn test_unknown_device_is_no_hint() {
        let config = TriageConfig::from_lookup(lookup(&[("GUIDE_TRIAGE_DEVICE", "amiga")])).unwrap();
        assert_eq!(config.default_device, None);
        assert_eq!(config.max_results, MAX_RESULTS);
    }

    #[test]
    fn test_invalid_max_results() {
        for raw in ["0", "21", "ten", "-1"] {
            let err = TriageConfig::from_lookup(lookup(&[("GUIDE_TRIAGE_MAX_RESULTS", raw)]))
                .unwrap_err();
            assert!(matches!(err, TriageError::Config(_)));
        }
    }

    #[test]
    fn test_builtin_catalog_source() {
        let config = TriageConfig::default();
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), Catalog::builtin().len());
    }
}
