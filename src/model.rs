//! Guide data model: platforms, steps, and the per-platform step map.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Platform
// ============================================================================

/// Device operating system a step list can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Windows,
        Platform::Macos,
        Platform::Ios,
        Platform::Android,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    /// Parse a device tag, treating anything unrecognised as "no hint".
    ///
    /// Accepts the canonical tags case-insensitively plus a few common
    /// spellings ("mac", "osx", "iphone", "ipad", "win").
    pub fn parse_lenient(raw: &str) -> Option<Platform> {
        match raw.trim().to_lowercase().as_str() {
            "windows" | "win" => Some(Platform::Windows),
            "macos" | "mac" | "osx" => Some(Platform::Macos),
            "ios" | "iphone" | "ipad" => Some(Platform::Ios),
            "android" => Some(Platform::Android),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a [`PlatformMap`] entry: a specific platform or the wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKey {
    All,
    Platform(Platform),
}

// ============================================================================
// Per-platform map
// ============================================================================

/// Partial mapping keyed by platform or the `all` wildcard.
///
/// Serialized as an object with optional `all`, `windows`, `macos`, `ios`
/// and `android` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMap<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macos: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<T>,
}

impl<T> Default for PlatformMap<T> {
    fn default() -> Self {
        Self {
            all: None,
            windows: None,
            macos: None,
            ios: None,
            android: None,
        }
    }
}

impl<T> PlatformMap<T> {
    pub fn get(&self, key: StepKey) -> Option<&T> {
        match key {
            StepKey::All => self.all.as_ref(),
            StepKey::Platform(Platform::Windows) => self.windows.as_ref(),
            StepKey::Platform(Platform::Macos) => self.macos.as_ref(),
            StepKey::Platform(Platform::Ios) => self.ios.as_ref(),
            StepKey::Platform(Platform::Android) => self.android.as_ref(),
        }
    }

    pub fn insert(&mut self, key: StepKey, value: T) -> Option<T> {
        let slot = match key {
            StepKey::All => &mut self.all,
            StepKey::Platform(Platform::Windows) => &mut self.windows,
            StepKey::Platform(Platform::Macos) => &mut self.macos,
            StepKey::Platform(Platform::Ios) => &mut self.ios,
            StepKey::Platform(Platform::Android) => &mut self.android,
        };
        slot.replace(value)
    }

    /// The device entry if present, else the `all` entry
    pub fn resolve(&self, device: Platform) -> Option<&T> {
        self.get(StepKey::Platform(device))
            .or_else(|| self.get(StepKey::All))
    }

    /// Present entries in key order: `all` first, then platforms
    pub fn entries(&self) -> impl Iterator<Item = (StepKey, &T)> {
        std::iter::once(StepKey::All)
            .chain(Platform::ALL.into_iter().map(StepKey::Platform))
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

// ============================================================================
// Guide
// ============================================================================

/// One actionable instruction, optionally carrying a copy-paste payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
}

impl Step {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            copy: None,
        }
    }

    pub fn with_copy(text: impl Into<String>, copy: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            copy: Some(copy.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A self-help how-to entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub steps: PlatformMap<Vec<Step>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    /// Per-platform asset references (image names, URLs)
    #[serde(default, skip_serializing_if = "PlatformMap::is_empty")]
    pub media: PlatformMap<String>,
}

impl Guide {
    /// `steps[device]`, else `steps["all"]`, else nothing
    pub fn resolve_steps(&self, device: Platform) -> &[Step] {
        self.steps.resolve(device).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn resolve_media(&self, device: Platform) -> Option<&str> {
        self.media.resolve(device).map(String::as_str)
    }

    /// Whether the guide defines steps for `device` or for every device
    pub fn supports(&self, device: Platform) -> bool {
        self.steps.resolve(device).is_some()
    }

    /// Lower-cased `title category why keywords...`, skipping a missing `why`
    pub fn haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str(), self.category.as_str()];
        if let Some(why) = self.why.as_deref().filter(|w| !w.is_empty()) {
            parts.push(why);
        }
        parts.extend(self.keywords.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    pub fn summary(&self) -> GuideSummary {
        GuideSummary::from(self)
    }
}

/// Projection of a guide returned by triage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    pub category: String,
}

impl From<&Guide> for GuideSummary {
    fn from(guide: &Guide) -> Self {
        Self {
            id: guide.id.clone(),
            title: guide.title.clone(),
            minutes: guide.minutes,
            why: guide.why.clone(),
            category: guide.category.clone(),
        }
    }
}

// ============================================================================
// Copy payloads
// ============================================================================

/// The `copy` payloads of `steps`, in order
pub fn copy_payloads(steps: &[Step]) -> Vec<&str> {
    steps
        .iter()
        .filter_map(|s| s.copy.as_deref())
        .filter(|c| !c.is_empty())
        .collect()
}

/// All payloads joined by newline, `None` when no step carries one
pub fn joined_copy_payloads(steps: &[Step]) -> Option<String> {
    let payloads = copy_payloads(steps);
    if payloads.is_empty() {
        None
    } else {
        Some(payloads.join("\n"))
    }
}
