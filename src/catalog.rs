//! Immutable guide registry, its file format, and loading.
//!
//! A [`Catalog`] is validated as a whole before it exists: either every guide
//! and relation checks out, or construction fails and nothing is returned.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::TriageError;
use crate::hybrid::HybridRelations;
use crate::model::Guide;

/// Compiled-in corpus
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

lazy_static! {
    static ref BUILTIN: Catalog =
        Catalog::from_json(BUILTIN_CATALOG).expect("embedded catalog must validate");
}

// ============================================================================
// File Format
// ============================================================================

/// On-disk catalog layout
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,

    /// When the catalog was generated
    #[serde(default)]
    pub generated: String,

    pub guides: Vec<Guide>,

    /// Guide id -> related guide ids, in composition order
    #[serde(default)]
    pub relations: HybridRelations,
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    guides: Vec<Guide>,
    by_id: HashMap<String, usize>,
    categories: Vec<String>,
    relations: HybridRelations,
}

impl Catalog {
    /// Validate and index `guides` with their `relations`.
    ///
    /// Fails on duplicate ids, guides without any non-empty step list, and
    /// relations naming unknown guides.
    pub fn new(
        version: impl Into<String>,
        guides: Vec<Guide>,
        relations: HybridRelations,
    ) -> Result<Self, TriageError> {
        let mut by_id = HashMap::with_capacity(guides.len());
        for (position, guide) in guides.iter().enumerate() {
            if by_id.insert(guide.id.clone(), position).is_some() {
                return Err(TriageError::DuplicateGuide(guide.id.clone()));
            }
            if !guide.steps.entries().any(|(_, steps)| !steps.is_empty()) {
                return Err(TriageError::EmptySteps(guide.id.clone()));
            }
        }

        for (from, related) in relations.iter() {
            if !by_id.contains_key(from) {
                return Err(TriageError::UnknownGuide(from.clone()));
            }
            if let Some(to) = related.iter().find(|to| !by_id.contains_key(*to)) {
                return Err(TriageError::UnknownRelation {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        let categories = guides
            .iter()
            .map(|g| g.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            version: version.into(),
            guides,
            by_id,
            categories,
            relations,
        })
    }

    pub fn from_file(file: CatalogFile) -> Result<Self, TriageError> {
        Self::new(file.version, file.guides, file.relations)
    }

    pub fn from_json(json: &str) -> Result<Self, TriageError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| TriageError::CatalogParse(e.to_string()))?;
        Self::from_file(file)
    }

    /// Read, parse and validate a catalog file
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        if !path.exists() {
            return Err(TriageError::CatalogNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| TriageError::CatalogRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog = Self::from_json(&content)?;
        debug!(
            "Loaded {} guides from {}",
            catalog.guides.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The compiled-in catalog
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Guides in declaration order
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    pub fn get_guide(&self, id: &str) -> Option<&Guide> {
        self.by_id.get(id).map(|&position| &self.guides[position])
    }

    /// Distinct categories, ascending
    pub fn list_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn relations(&self) -> &HybridRelations {
        &self.relations
    }
}
