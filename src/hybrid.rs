//! Hybrid composition: a guide's steps followed by its related guides' steps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::trace;

use crate::catalog::Catalog;
use crate::model::{Platform, Step};

/// Guide id -> related guide ids, in the order their steps are appended.
///
/// Not required to be symmetric; an empty list behaves like no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HybridRelations(BTreeMap<String, Vec<String>>);

impl HybridRelations {
    pub fn insert(&mut self, id: impl Into<String>, related: Vec<String>) {
        self.0.insert(id.into(), related);
    }

    /// Related ids of `id`, empty when none are declared
    pub fn related(&self, id: &str) -> &[String] {
        self.0.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for HybridRelations {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compose `base` with the device steps of every guide related to `id`.
///
/// Related steps resolve as `steps[device]`, else `steps["all"]`, else none,
/// and are appended in declaration order. The result keeps only the first
/// step for each case-insensitive `(text, copy)` pair. With no relations
/// declared the output equals `base`, as long as `base` has no duplicates.
pub fn build_hybrid_steps(
    catalog: &Catalog,
    id: &str,
    device: Platform,
    base: &[Step],
) -> Vec<Step> {
    let mut merged: Vec<&Step> = base.iter().collect();

    for related_id in catalog.relations().related(id) {
        let Some(related) = catalog.get_guide(related_id) else {
            continue;
        };
        let extra = related.resolve_steps(device);
        trace!("hybrid {}: +{} steps from {}", id, extra.len(), related_id);
        merged.extend(extra);
    }

    dedupe_steps(merged)
}

/// Base steps of `id` for `device` composed with its related guides
pub fn compose(catalog: &Catalog, id: &str, device: Platform) -> Option<Vec<Step>> {
    let guide = catalog.get_guide(id)?;
    Some(build_hybrid_steps(
        catalog,
        id,
        device,
        guide.resolve_steps(device),
    ))
}

/// Order-preserving filter keeping the first step per `(lower(text), lower(copy))`
fn dedupe_steps<'a>(steps: impl IntoIterator<Item = &'a Step>) -> Vec<Step> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    steps
        .into_iter()
        .filter(|step| {
            let key = (
                step.text.to_lowercase(),
                step.copy.as_deref().unwrap_or_default().to_lowercase(),
            );
            seen.insert(key)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(step: &Step) -> (String, String) {
        (
            step.text.to_lowercase(),
            step.copy.clone().unwrap_or_default().to_lowercase(),
        )
    }

    #[test]
    fn test_related_steps_follow_base_in_order() {
        let catalog = Catalog::builtin();
        let guide = catalog.get_guide("wifi-no-internet").unwrap();
        let base = guide.resolve_steps(Platform::Windows);
        let steps = build_hybrid_steps(catalog, "wifi-no-internet", Platform::Windows, base);

        assert_eq!(&steps[..base.len()], base);
        // flush-dns windows step duplicates base's copy payload but not its text
        let tail: Vec<&str> = steps[base.len()..].iter().map(|s| s.text.as_str()).collect();
        assert_eq!(tail, vec!["Run:", "Run:"]);
        assert_eq!(
            steps[base.len()].copy.as_deref(),
            Some("ipconfig /flushdns")
        );
        assert_eq!(
            steps[base.len() + 1].copy.as_deref(),
            Some("ipconfig /release && ipconfig /renew")
        );
    }

    #[test]
    fn test_related_falls_back_to_all_steps() {
        let catalog = Catalog::builtin();
        let base = vec![Step::new("Check the signal.")];
        let steps = build_hybrid_steps(catalog, "wifi-no-internet", Platform::Ios, &base);

        let texts: Vec<&str> = steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Check the signal.",
                "Retry the website after 10–20 seconds.",
                "Reopen your browser/app and test again.",
            ]
        );
    }

    #[test]
    fn test_no_relations_returns_base() {
        let catalog = Catalog::builtin();
        for id in ["teams-mic", "reset-password", "unknown-guide"] {
            let base = vec![
                Step::new("One"),
                Step::with_copy("Two", "cmd"),
                Step::new("Three"),
            ];
            assert_eq!(build_hybrid_steps(catalog, id, Platform::Macos, &base), base);
        }
    }

    #[test]
    fn test_dedupe_is_case_insensitive_and_keeps_first() {
        let catalog = Catalog::builtin();
        let base = vec![
            Step::with_copy("Run:", "IPCONFIG /FLUSHDNS"),
            Step::new("retry THE website after 10–20 seconds."),
        ];
        let steps = build_hybrid_steps(catalog, "wifi-no-internet", Platform::Windows, &base);

        assert_eq!(steps[0], base[0]);
        assert_eq!(steps[1], base[1]);
        let keys: HashSet<_> = steps.iter().map(key).collect();
        assert_eq!(keys.len(), steps.len());
        assert_eq!(steps.len(), 3);
    }

    #[test]
    fn test_repeated_pass_does_not_grow() {
        let catalog = Catalog::builtin();
        for guide in catalog.guides() {
            for device in Platform::ALL {
                let first = compose(catalog, &guide.id, device).unwrap();
                let second = build_hybrid_steps(catalog, &guide.id, device, &first);
                assert_eq!(first, second, "{} on {}", guide.id, device);
            }
        }
    }

    #[test]
    fn test_relations_are_not_transitive() {
        // connect-wifi -> wifi-no-internet, but not on to flush-dns
        let catalog = Catalog::builtin();
        let steps = compose(catalog, "connect-wifi", Platform::Windows).unwrap();
        assert!(steps.iter().all(|s| s.text != "Retry the website after 10–20 seconds."));
        assert!(steps.iter().any(|s| s.text == "Flush DNS:"));
    }

    #[test]
    fn test_compose_unknown_guide() {
        assert!(compose(Catalog::builtin(), "nope", Platform::Windows).is_none());
    }

    #[test]
    fn test_relations_json_shape() {
        let relations: HybridRelations =
            serde_json::from_str(r#"{"a":["b","c"],"d":[]}"#).unwrap();
        assert_eq!(relations.related("a"), &["b", "c"]);
        assert!(relations.related("d").is_empty());
        assert!(relations.related("zzz").is_empty());
    }
}
