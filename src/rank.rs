//! Scoring and ranking of catalog guides against a free-text query.
//!
//! Signals per guide:
//! - token overlap between normalized query and normalized haystack
//! - flat bonus when any guide keyword equals a query token
//! - whole-query substring hit in the haystack
//! - phrase intents (see [`crate::intent`])
//! - device affinity when the guide has steps for the hinted device
//!
//! Ranking is a stable sort by score, so equal scores keep catalog order.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::intent::{intent_boost, matching_rules, IntentRule};
use crate::model::{Guide, GuideSummary, Platform};
use crate::normalize::{normalize, token_set};

/// Maximum number of ranked guides returned
pub const MAX_RESULTS: usize = 20;

// ============================================================================
// Scoring Weights
// ============================================================================

/// Weights for the individual match signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    /// Per distinct query token found in the haystack
    pub token: f64,
    /// Any keyword equal to a query token (applied once)
    pub keyword: f64,
    /// Whole query is a substring of the haystack
    pub phrase: f64,
    /// Guide has steps for the hinted device or for all devices
    pub device: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            token: 1.1,
            keyword: 1.5,
            phrase: 0.8,
            device: 0.5,
        }
    }
}

/// Caller-side refinements applied after scoring
#[derive(Debug, Clone, Default)]
pub struct TriageOptions {
    /// Keep only guides in this category (exact match)
    pub category: Option<String>,
    /// Result cap, clamped to [`MAX_RESULTS`]
    pub limit: Option<usize>,
    pub weights: ScoreWeights,
}

impl TriageOptions {
    fn effective_limit(&self) -> usize {
        self.limit.map_or(MAX_RESULTS, |l| l.min(MAX_RESULTS))
    }
}

// ============================================================================
// Ranked Output
// ============================================================================

/// A ranked guide with its score and the signals that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGuide {
    #[serde(flatten)]
    pub summary: GuideSummary,
    pub score: f64,
    /// What contributed: `token:<t>`, `keyword`, `phrase`, `intent:<label>`, `device:<d>`
    pub evidence: Vec<String>,
}

/// Normalized query shared by every guide's scoring pass
struct Query<'q> {
    lower: String,
    tokens: Vec<String>,
    raw: &'q str,
}

impl<'q> Query<'q> {
    fn parse(raw: &'q str) -> Option<Self> {
        let raw = raw.trim();
        let mut tokens = normalize(raw);
        if tokens.is_empty() {
            return None;
        }
        let mut seen = HashSet::new();
        tokens.retain(|t| seen.insert(t.clone()));
        Some(Self {
            lower: raw.to_lowercase(),
            tokens,
            raw,
        })
    }
}

fn score_guide(
    guide: &Guide,
    query: &Query<'_>,
    fired: &[&'static IntentRule],
    device: Option<Platform>,
    weights: &ScoreWeights,
) -> (f64, Vec<String>) {
    let haystack = guide.haystack();
    let hay_tokens = token_set(&haystack);
    let mut score = 0.0;
    let mut evidence = Vec::new();

    let mut overlap = 0usize;
    for token in query.tokens.iter().filter(|t| hay_tokens.contains(*t)) {
        overlap += 1;
        evidence.push(format!("token:{}", token));
    }
    score += overlap as f64 * weights.token;

    let keyword_hit = guide
        .keywords
        .iter()
        .any(|k| query.tokens.contains(&k.to_lowercase()));
    if keyword_hit {
        score += weights.keyword;
        evidence.push("keyword".to_string());
    }

    if haystack.contains(&query.lower) {
        score += weights.phrase;
        evidence.push("phrase".to_string());
    }

    let (boost, labels) = intent_boost(fired, &haystack);
    score += boost;
    evidence.extend(labels.into_iter().map(|l| format!("intent:{}", l)));

    if let Some(device) = device.filter(|d| guide.supports(*d)) {
        score += weights.device;
        evidence.push(format!("device:{}", device));
    }

    (score, evidence)
}

/// Score every guide and return the ranked matches with evidence
pub fn rank(
    catalog: &Catalog,
    query: &str,
    device: Option<Platform>,
    options: &TriageOptions,
) -> Vec<RankedGuide> {
    let Some(parsed) = Query::parse(query) else {
        return Vec::new();
    };
    let fired = matching_rules(parsed.raw);
    debug!(
        "Ranking {} guides for {} tokens, {} intents fired",
        catalog.len(),
        parsed.tokens.len(),
        fired.len()
    );

    let mut ranked: Vec<RankedGuide> = catalog
        .guides()
        .iter()
        .filter_map(|guide| {
            let (score, evidence) = score_guide(guide, &parsed, &fired, device, &options.weights);
            if score <= 0.0 {
                return None;
            }
            trace!("{} scored {:.2}: {:?}", guide.id, score, evidence);
            Some(RankedGuide {
                summary: guide.summary(),
                score,
                evidence,
            })
        })
        .collect();

    // Stable: equal scores keep catalog declaration order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(MAX_RESULTS);

    if let Some(category) = &options.category {
        ranked.retain(|r| &r.summary.category == category);
    }
    ranked.truncate(options.effective_limit());
    ranked
}

/// Ranked guide summaries for `query`, best first, at most [`MAX_RESULTS`]
pub fn triage(catalog: &Catalog, query: &str, device: Option<Platform>) -> Vec<GuideSummary> {
    triage_with(catalog, query, device, &TriageOptions::default())
}

pub fn triage_with(
    catalog: &Catalog,
    query: &str,
    device: Option<Platform>,
    options: &TriageOptions,
) -> Vec<GuideSummary> {
    rank(catalog, query, device, options)
        .into_iter()
        .map(|r| r.summary)
        .collect()
}
