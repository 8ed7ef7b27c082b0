//! Guide Triage - offline support-request triage
//!
//! Turns a free-text request ("wifi connected but no internet") plus an
//! optional device hint into a ranked list of self-help guides, and composes
//! a device-specific, de-duplicated step list for a chosen guide by appending
//! its related guides' steps.
//!
//! # Pipeline
//! 1. [`normalize`] - lower-case, tokenize, canonicalize synonyms
//! 2. [`intent`] - phrase rules over the raw query
//! 3. [`rank`] - weighted scoring, stable ranking, top 20
//! 4. [`hybrid`] - related-step composition with `(text, copy)` dedupe
//!
//! Every operation is a pure function over an immutable [`Catalog`]. Hosts
//! that reload their corpus swap whole snapshots through [`CatalogHandle`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod hybrid;
pub mod intent;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod snapshot;

pub use catalog::{Catalog, CatalogFile};
pub use config::{CatalogSource, TriageConfig};
pub use error::TriageError;
pub use hybrid::HybridRelations;
pub use model::{
    copy_payloads, joined_copy_payloads, Action, Guide, GuideSummary, Link, Platform,
    PlatformMap, Step, StepKey,
};
pub use rank::{RankedGuide, ScoreWeights, TriageOptions, MAX_RESULTS};
pub use snapshot::{CatalogHandle, Snapshot};

// ============================================================================
// Compiled-in catalog entry points
// ============================================================================

/// Rank compiled-in guides for `query`, best first
pub fn triage(query: &str, device: Option<Platform>) -> Vec<GuideSummary> {
    rank::triage(Catalog::builtin(), query, device)
}

pub fn get_guide(id: &str) -> Option<&'static Guide> {
    Catalog::builtin().get_guide(id)
}

pub fn list_categories() -> &'static [String] {
    Catalog::builtin().list_categories()
}

/// `base` followed by the device steps of `id`'s related guides, de-duplicated
pub fn build_hybrid_steps(id: &str, device: Platform, base: &[Step]) -> Vec<Step> {
    hybrid::build_hybrid_steps(Catalog::builtin(), id, device, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_agree_with_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(list_categories(), catalog.list_categories());
        assert_eq!(get_guide("flush-dns").map(|g| g.title.as_str()), Some("Flush DNS Cache"));
        assert!(get_guide("").is_none());
        assert_eq!(
            triage("printer not showing up", Some(Platform::Windows)),
            rank::triage(catalog, "printer not showing up", Some(Platform::Windows))
        );
    }

    #[test]
    fn test_printer_request_end_to_end() {
        let results = triage("Printer not showing up", Some(Platform::Windows));
        let top: Vec<&str> = results.iter().take(2).map(|r| r.id.as_str()).collect();
        assert_eq!(top, vec!["clear-print-queue", "add-printer"]);

        let guide = get_guide("add-printer").unwrap();
        let base = guide.resolve_steps(Platform::Windows);
        let steps = build_hybrid_steps(&guide.id, Platform::Windows, base);
        assert_eq!(&steps[..base.len()], base);
        assert_eq!(
            joined_copy_payloads(&steps).as_deref(),
            Some("C:\\Windows\\System32\\spool\\PRINTERS")
        );
    }

    #[test]
    fn test_malformed_device_means_no_hint() {
        let hinted = triage("slow laptop", Platform::parse_lenient("toaster"));
        assert_eq!(hinted, triage("slow laptop", None));
    }
}
